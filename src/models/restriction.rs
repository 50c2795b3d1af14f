//! Chat restriction records created by moderation actions.

use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Kind of restriction: permanent, or time-bounded with an expiry instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RestrictionKind {
    Permanent,
    Temporary { expires_at: DateTime<Utc> },
}

/// A moderation record limiting a user's chat capability.
///
/// `is_active` is a cache of expiry state and may lag reality: a temporary
/// restriction past its expiry must be treated as inactive even while the
/// stored flag still reads true. The evaluator reconciles such rows by
/// writing the flag back to false when it reads them (lazy expiry); the
/// source of truth is always the expiry comparison against current time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Restriction {
    pub id: Uuid,
    pub user_id: Uuid,
    pub kind: RestrictionKind,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

impl Restriction {
    /// Whether this record blocks chat at instant `now`.
    pub fn blocks_at(&self, now: DateTime<Utc>) -> bool {
        match self.kind {
            RestrictionKind::Permanent => true,
            RestrictionKind::Temporary { expires_at } => expires_at > now,
        }
    }

    /// Whether this record is a stale temporary (expired but still flagged active).
    pub fn is_stale_at(&self, now: DateTime<Utc>) -> bool {
        match self.kind {
            RestrictionKind::Permanent => false,
            RestrictionKind::Temporary { expires_at } => self.is_active && expires_at <= now,
        }
    }
}
