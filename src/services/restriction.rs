//! Restriction evaluator: decides whether chat is currently blocked for a user.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tracing::{debug, warn};

use crate::error::{AppError, AppResult};
use crate::models::AuthenticatedUser;
use crate::stores::RestrictionStore;

/// Outcome of a restriction evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatAccess {
    Allowed,
    Restricted,
}

/// Scans a user's active restrictions, lazily expiring stale ones.
#[derive(Clone)]
pub struct RestrictionEvaluator {
    restrictions: Arc<dyn RestrictionStore>,
    lookup_timeout: Duration,
}

impl RestrictionEvaluator {
    pub fn new(restrictions: Arc<dyn RestrictionStore>, lookup_timeout: Duration) -> Self {
        Self {
            restrictions,
            lookup_timeout,
        }
    }

    /// Evaluate chat access for an authenticated user.
    ///
    /// Admins are never restricted and the store is not consulted for them.
    /// A permanent or not-yet-expired temporary restriction short-circuits
    /// `Restricted`; an expired temporary gets its `is_active` flag written
    /// back to false (best-effort, the answer does not depend on the write
    /// succeeding) and the scan continues.
    ///
    /// Errors surface only from the listing read; the caller decides the
    /// fail-closed policy.
    pub async fn evaluate(&self, user: &AuthenticatedUser) -> AppResult<ChatAccess> {
        if user.is_admin {
            return Ok(ChatAccess::Allowed);
        }

        let restrictions = tokio::time::timeout(
            self.lookup_timeout,
            self.restrictions.list_active_restrictions(user.id),
        )
        .await
        .map_err(|_| AppError::Timeout("restriction listing".to_string()))??;

        let now = Utc::now();
        for restriction in restrictions {
            if restriction.blocks_at(now) {
                return Ok(ChatAccess::Restricted);
            }
            if restriction.is_stale_at(now) {
                // The stored flag lags the expiry, reconcile on read.
                debug!(restriction_id = %restriction.id, "expiring stale restriction");
                let write_back = tokio::time::timeout(
                    self.lookup_timeout,
                    self.restrictions.deactivate_restriction(restriction.id),
                )
                .await;
                match write_back {
                    Ok(Ok(())) => {}
                    Ok(Err(e)) => {
                        warn!(restriction_id = %restriction.id, error = %e, "lazy expiry write-back failed")
                    }
                    Err(_) => {
                        warn!(restriction_id = %restriction.id, "lazy expiry write-back timed out")
                    }
                }
            }
        }

        Ok(ChatAccess::Allowed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Restriction, RestrictionKind};
    use async_trait::async_trait;
    use chrono::{DateTime, Duration as ChronoDuration, Utc};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;
    use uuid::Uuid;

    #[derive(Default)]
    struct FakeRestrictionStore {
        restrictions: Mutex<Vec<Restriction>>,
        list_calls: AtomicUsize,
        fail_list: bool,
        fail_deactivate: bool,
    }

    impl FakeRestrictionStore {
        fn with(restrictions: Vec<Restriction>) -> Self {
            Self {
                restrictions: Mutex::new(restrictions),
                ..Default::default()
            }
        }

        fn active_flag(&self, id: Uuid) -> bool {
            self.restrictions
                .lock()
                .unwrap()
                .iter()
                .find(|r| r.id == id)
                .map(|r| r.is_active)
                .unwrap()
        }
    }

    #[async_trait]
    impl RestrictionStore for FakeRestrictionStore {
        async fn list_active_restrictions(&self, user_id: Uuid) -> AppResult<Vec<Restriction>> {
            self.list_calls.fetch_add(1, Ordering::SeqCst);
            if self.fail_list {
                return Err(AppError::Internal(anyhow::anyhow!("store down")));
            }
            Ok(self
                .restrictions
                .lock()
                .unwrap()
                .iter()
                .filter(|r| r.user_id == user_id && r.is_active)
                .cloned()
                .collect())
        }

        async fn deactivate_restriction(&self, restriction_id: Uuid) -> AppResult<()> {
            if self.fail_deactivate {
                return Err(AppError::Internal(anyhow::anyhow!("write failed")));
            }
            let mut restrictions = self.restrictions.lock().unwrap();
            if let Some(r) = restrictions.iter_mut().find(|r| r.id == restriction_id) {
                r.is_active = false;
            }
            Ok(())
        }
    }

    fn user(is_admin: bool) -> AuthenticatedUser {
        AuthenticatedUser {
            id: Uuid::new_v4(),
            is_admin,
        }
    }

    fn permanent(user_id: Uuid) -> Restriction {
        Restriction {
            id: Uuid::new_v4(),
            user_id,
            kind: RestrictionKind::Permanent,
            is_active: true,
            created_at: Utc::now(),
        }
    }

    fn temporary(user_id: Uuid, expires_at: DateTime<Utc>) -> Restriction {
        Restriction {
            id: Uuid::new_v4(),
            user_id,
            kind: RestrictionKind::Temporary { expires_at },
            is_active: true,
            created_at: Utc::now(),
        }
    }

    fn evaluator(store: Arc<FakeRestrictionStore>) -> RestrictionEvaluator {
        RestrictionEvaluator::new(store, Duration::from_secs(5))
    }

    #[tokio::test]
    async fn admin_bypasses_restrictions_without_store_lookup() {
        let admin = user(true);
        let store = Arc::new(FakeRestrictionStore::with(vec![permanent(admin.id)]));
        let result = evaluator(store.clone()).evaluate(&admin).await.unwrap();
        assert_eq!(result, ChatAccess::Allowed);
        assert_eq!(store.list_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn permanent_restriction_blocks() {
        let u = user(false);
        let store = Arc::new(FakeRestrictionStore::with(vec![permanent(u.id)]));
        let result = evaluator(store).evaluate(&u).await.unwrap();
        assert_eq!(result, ChatAccess::Restricted);
    }

    #[tokio::test]
    async fn future_temporary_blocks_and_does_not_mutate() {
        let u = user(false);
        let r = temporary(u.id, Utc::now() + ChronoDuration::hours(1));
        let id = r.id;
        let store = Arc::new(FakeRestrictionStore::with(vec![r]));
        let result = evaluator(store.clone()).evaluate(&u).await.unwrap();
        assert_eq!(result, ChatAccess::Restricted);
        assert!(store.active_flag(id));
    }

    #[tokio::test]
    async fn expired_temporary_allows_and_flips_flag() {
        let u = user(false);
        let r = temporary(u.id, Utc::now() - ChronoDuration::hours(1));
        let id = r.id;
        let store = Arc::new(FakeRestrictionStore::with(vec![r]));
        let ev = evaluator(store.clone());

        let result = ev.evaluate(&u).await.unwrap();
        assert_eq!(result, ChatAccess::Allowed);
        assert!(!store.active_flag(id));

        // Repeat evaluation is idempotent: the record is gone from the
        // active listing and the answer is unchanged.
        let result = ev.evaluate(&u).await.unwrap();
        assert_eq!(result, ChatAccess::Allowed);
        assert!(!store.active_flag(id));
    }

    #[tokio::test]
    async fn expired_temporary_does_not_mask_other_restrictions() {
        let u = user(false);
        let stale = temporary(u.id, Utc::now() - ChronoDuration::hours(1));
        let stale_id = stale.id;
        let store = Arc::new(FakeRestrictionStore::with(vec![stale, permanent(u.id)]));
        let result = evaluator(store.clone()).evaluate(&u).await.unwrap();
        assert_eq!(result, ChatAccess::Restricted);
        // The stale record was still reconciled before the permanent one hit.
        assert!(!store.active_flag(stale_id));
    }

    #[tokio::test]
    async fn write_back_failure_does_not_change_answer() {
        let u = user(false);
        let r = temporary(u.id, Utc::now() - ChronoDuration::hours(1));
        let id = r.id;
        let store = Arc::new(FakeRestrictionStore {
            restrictions: Mutex::new(vec![r]),
            fail_deactivate: true,
            ..Default::default()
        });
        let result = evaluator(store.clone()).evaluate(&u).await.unwrap();
        assert_eq!(result, ChatAccess::Allowed);
        // Flag stays stale; only future calls' efficiency is affected.
        assert!(store.active_flag(id));
    }

    #[tokio::test]
    async fn listing_failure_propagates() {
        let u = user(false);
        let store = Arc::new(FakeRestrictionStore {
            fail_list: true,
            ..Default::default()
        });
        assert!(evaluator(store).evaluate(&u).await.is_err());
    }

    #[tokio::test]
    async fn no_restrictions_allows() {
        let u = user(false);
        let store = Arc::new(FakeRestrictionStore::with(Vec::new()));
        let result = evaluator(store).evaluate(&u).await.unwrap();
        assert_eq!(result, ChatAccess::Allowed);
    }
}
