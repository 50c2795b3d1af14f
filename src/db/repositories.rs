//! Postgres implementations of the identity and restriction stores.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::FromRow;
use tracing::warn;
use uuid::Uuid;

use super::DbPool;
use crate::error::AppResult;
use crate::models::{AuthenticatedUser, Restriction, RestrictionKind};
use crate::stores::{IdentityStore, RestrictionStore};

// ---- Users ----

#[derive(Debug, FromRow)]
struct UserRow {
    id: Uuid,
    is_admin: bool,
}

/// Identity lookups against the platform's `users` table.
#[derive(Clone)]
pub struct PgIdentityStore {
    pool: DbPool,
}

impl PgIdentityStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl IdentityStore for PgIdentityStore {
    async fn resolve_identity(&self, user_id: Uuid) -> AppResult<Option<AuthenticatedUser>> {
        let row = sqlx::query_as::<_, UserRow>("SELECT id, is_admin FROM users WHERE id = $1")
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(|r| AuthenticatedUser {
            id: r.id,
            is_admin: r.is_admin,
        }))
    }
}

// ---- Chat restrictions ----

#[derive(Debug, FromRow)]
struct RestrictionRow {
    id: Uuid,
    user_id: Uuid,
    restriction_type: String,
    expires_at: Option<DateTime<Utc>>,
    is_active: bool,
    created_at: DateTime<Utc>,
}

impl RestrictionRow {
    /// A TEMPORARY row without an expiry neither restricts nor expires;
    /// such rows are skipped rather than modelled.
    fn into_model(self) -> Option<Restriction> {
        let kind = match (self.restriction_type.as_str(), self.expires_at) {
            ("PERMANENT", _) => RestrictionKind::Permanent,
            ("TEMPORARY", Some(expires_at)) => RestrictionKind::Temporary { expires_at },
            ("TEMPORARY", None) => {
                warn!(restriction_id = %self.id, "temporary restriction without expiry, skipping");
                return None;
            }
            (other, _) => {
                warn!(restriction_id = %self.id, restriction_type = %other, "unknown restriction type, skipping");
                return None;
            }
        };
        Some(Restriction {
            id: self.id,
            user_id: self.user_id,
            kind,
            is_active: self.is_active,
            created_at: self.created_at,
        })
    }
}

/// Restriction listing and flag write-back against `chat_restrictions`.
#[derive(Clone)]
pub struct PgRestrictionStore {
    pool: DbPool,
}

impl PgRestrictionStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RestrictionStore for PgRestrictionStore {
    async fn list_active_restrictions(&self, user_id: Uuid) -> AppResult<Vec<Restriction>> {
        let rows = sqlx::query_as::<_, RestrictionRow>(
            r#"
            SELECT id, user_id, restriction_type, expires_at, is_active, created_at
            FROM chat_restrictions
            WHERE user_id = $1 AND is_active = true
            ORDER BY created_at
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().filter_map(RestrictionRow::into_model).collect())
    }

    async fn deactivate_restriction(&self, restriction_id: Uuid) -> AppResult<()> {
        // Zero rows affected means another evaluation got there first; the
        // flag is a cache, last-write-wins is fine.
        sqlx::query("UPDATE chat_restrictions SET is_active = false WHERE id = $1")
            .bind(restriction_id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}
