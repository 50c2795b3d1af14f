//! Two-tier JWT decode.
//!
//! The upstream platform has issued tokens in two historical formats: a
//! typed access token carrying `token_type: "access"`, and an older untyped
//! format with only the subject and expiry. Both remain valid as long as the
//! signature and expiry check out, so decoding tries the typed shape first
//! and falls back to the untyped one when the first fails structurally.

use crate::error::{AppError, AppResult};
use jsonwebtoken::{decode, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Serialize, Deserialize)]
struct AccessClaims {
    token_type: String,
    user_id: Uuid,
    exp: i64,
}

#[derive(Debug, Serialize, Deserialize)]
struct UntypedClaims {
    user_id: Uuid,
    exp: i64,
}

#[derive(Clone)]
pub struct JwtSecret {
    secret: String,
}

impl JwtSecret {
    pub fn new(secret: String) -> Self {
        Self { secret }
    }

    /// Decode a token to its subject id, trying the access format first and
    /// the untyped format second. Signature and expiry are validated in both
    /// tiers.
    pub fn decode_user_id(&self, token: &str) -> AppResult<Uuid> {
        match self.decode_access(token) {
            Ok(user_id) => Ok(user_id),
            Err(_) => self.decode_untyped(token),
        }
    }

    fn validation(&self) -> Validation {
        let mut validation = Validation::default();
        validation.validate_exp = true;
        validation
    }

    fn decode_access(&self, token: &str) -> AppResult<Uuid> {
        let data = decode::<AccessClaims>(
            token,
            &DecodingKey::from_secret(self.secret.as_bytes()),
            &self.validation(),
        )
        .map_err(|e| AppError::Jwt(e.to_string()))?;
        if data.claims.token_type != "access" {
            return Err(AppError::Jwt(format!(
                "unexpected token_type: {}",
                data.claims.token_type
            )));
        }
        Ok(data.claims.user_id)
    }

    fn decode_untyped(&self, token: &str) -> AppResult<Uuid> {
        let data = decode::<UntypedClaims>(
            token,
            &DecodingKey::from_secret(self.secret.as_bytes()),
            &self.validation(),
        )
        .map_err(|e| AppError::Jwt(e.to_string()))?;
        Ok(data.claims.user_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};
    use jsonwebtoken::{encode, EncodingKey, Header};

    const SECRET: &str = "test-jwt-secret-min-32-chars!!!!";

    fn encode_with(secret: &str, claims: &serde_json::Value) -> String {
        encode(
            &Header::default(),
            claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .unwrap()
    }

    fn exp_in(hours: i64) -> i64 {
        (Utc::now() + Duration::hours(hours)).timestamp()
    }

    #[test]
    fn decodes_access_token() {
        let user_id = Uuid::new_v4();
        let token = encode_with(
            SECRET,
            &serde_json::json!({ "token_type": "access", "user_id": user_id, "exp": exp_in(1) }),
        );
        let secret = JwtSecret::new(SECRET.to_string());
        assert_eq!(secret.decode_user_id(&token).unwrap(), user_id);
    }

    #[test]
    fn falls_back_to_untyped_token() {
        let user_id = Uuid::new_v4();
        let token = encode_with(
            SECRET,
            &serde_json::json!({ "user_id": user_id, "exp": exp_in(1) }),
        );
        let secret = JwtSecret::new(SECRET.to_string());
        assert_eq!(secret.decode_user_id(&token).unwrap(), user_id);
    }

    #[test]
    fn rejects_expired_token_in_both_tiers() {
        let user_id = Uuid::new_v4();
        let secret = JwtSecret::new(SECRET.to_string());

        let typed = encode_with(
            SECRET,
            &serde_json::json!({ "token_type": "access", "user_id": user_id, "exp": exp_in(-1) }),
        );
        assert!(secret.decode_user_id(&typed).is_err());

        let untyped = encode_with(
            SECRET,
            &serde_json::json!({ "user_id": user_id, "exp": exp_in(-1) }),
        );
        assert!(secret.decode_user_id(&untyped).is_err());
    }

    #[test]
    fn rejects_wrong_signature() {
        let user_id = Uuid::new_v4();
        let token = encode_with(
            "another-secret-that-is-not-the-right-one",
            &serde_json::json!({ "token_type": "access", "user_id": user_id, "exp": exp_in(1) }),
        );
        let secret = JwtSecret::new(SECRET.to_string());
        assert!(secret.decode_user_id(&token).is_err());
    }

    #[test]
    fn rejects_garbage() {
        let secret = JwtSecret::new(SECRET.to_string());
        assert!(secret.decode_user_id("not-a-jwt").is_err());
        assert!(secret.decode_user_id("a.b.c").is_err());
    }
}
