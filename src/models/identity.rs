//! Connection identity resolved from a bearer token.

use serde::Serialize;
use uuid::Uuid;

/// A user the token verifier resolved from the identity store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuthenticatedUser {
    pub id: Uuid,
    /// Admins bypass restriction checks entirely.
    pub is_admin: bool,
}

/// Identity attached to a connection after the authentication stage.
///
/// Every token failure (malformed, expired, unknown subject, store error)
/// degrades to `Anonymous` rather than rejecting the connection; whether an
/// anonymous connection may ultimately chat is the consumer's decision.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Identity {
    Authenticated(AuthenticatedUser),
    Anonymous,
}

impl Identity {
    pub fn is_authenticated(&self) -> bool {
        matches!(self, Identity::Authenticated(_))
    }

    pub fn user(&self) -> Option<&AuthenticatedUser> {
        match self {
            Identity::Authenticated(user) => Some(user),
            Identity::Anonymous => None,
        }
    }
}
