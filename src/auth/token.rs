//! Token verifier: credential string in, identity out.

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, warn};

use super::JwtSecret;
use crate::models::Identity;
use crate::stores::IdentityStore;

/// Resolves an optional bearer token to an [`Identity`].
///
/// Never rejects: every failure mode (absent token, decode failure, unknown
/// subject, store error, lookup timeout) degrades to `Identity::Anonymous`.
/// Whether anonymous access is acceptable is decided downstream.
#[derive(Clone)]
pub struct TokenVerifier {
    secret: JwtSecret,
    identities: Arc<dyn IdentityStore>,
    lookup_timeout: Duration,
}

impl TokenVerifier {
    pub fn new(
        secret: JwtSecret,
        identities: Arc<dyn IdentityStore>,
        lookup_timeout: Duration,
    ) -> Self {
        Self {
            secret,
            identities,
            lookup_timeout,
        }
    }

    pub async fn verify(&self, token: Option<&str>) -> Identity {
        let token = match token {
            Some(t) if !t.is_empty() => t,
            _ => return Identity::Anonymous,
        };

        let user_id = match self.secret.decode_user_id(token) {
            Ok(id) => id,
            Err(e) => {
                debug!(error = %e, "token rejected, treating connection as anonymous");
                return Identity::Anonymous;
            }
        };

        match tokio::time::timeout(self.lookup_timeout, self.identities.resolve_identity(user_id))
            .await
        {
            Ok(Ok(Some(user))) => Identity::Authenticated(user),
            Ok(Ok(None)) => {
                debug!(%user_id, "token subject not found in identity store");
                Identity::Anonymous
            }
            Ok(Err(e)) => {
                warn!(%user_id, error = %e, "identity lookup failed, treating connection as anonymous");
                Identity::Anonymous
            }
            Err(_) => {
                warn!(%user_id, "identity lookup timed out, treating connection as anonymous");
                Identity::Anonymous
            }
        }
    }
}
