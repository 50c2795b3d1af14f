//! Store traits consumed by the gateway.
//!
//! The identity and restriction stores are externally-owned; the gateway
//! reads them during admission and performs exactly one kind of write (the
//! lazy-expiry flag write-back). Both are injected as trait objects so tests
//! can substitute in-memory fakes.

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::AppResult;
use crate::models::{AuthenticatedUser, Restriction};

/// Read-only lookup of token subjects against the user store.
#[async_trait]
pub trait IdentityStore: Send + Sync {
    /// Resolve a decoded token subject to a user, or `None` if unknown.
    async fn resolve_identity(&self, user_id: Uuid) -> AppResult<Option<AuthenticatedUser>>;
}

/// Restriction listing and the lazy-expiry write-back.
#[async_trait]
pub trait RestrictionStore: Send + Sync {
    /// All restrictions for `user_id` whose stored `is_active` flag is true.
    async fn list_active_restrictions(&self, user_id: Uuid) -> AppResult<Vec<Restriction>>;

    /// Write back `is_active = false` for a stale restriction.
    ///
    /// Must be idempotent: concurrent evaluations of the same stale record
    /// may both call this, and a record already deactivated is not an error.
    async fn deactivate_restriction(&self, restriction_id: Uuid) -> AppResult<()>;
}
