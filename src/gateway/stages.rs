//! The two admission stages: token authentication and restriction gating.

use async_trait::async_trait;
use tracing::{error, info};

use super::context::{ConnectionContext, TransportKind};
use super::pipeline::{AdmissionStage, StageOutcome};
use crate::auth::TokenVerifier;
use crate::models::Identity;
use crate::services::{ChatAccess, RestrictionEvaluator};

/// Application-level close code for "rejected due to active chat restriction".
pub const RESTRICTED_CLOSE_CODE: u16 = 4000;

/// Human-readable rejection reason shown by the client.
pub const RESTRICTED_REASON: &str =
    "Tính năng chat của bạn đã bị hạn chế bởi quản trị viên";

/// Standard internal-error close code, used when the restriction store is
/// unreachable. Fail-closed: infrastructure failure never grants access, and
/// never masquerades as a moderation rejection.
pub const STORE_FAILURE_CLOSE_CODE: u16 = 1011;

/// Authentication stage: annotates the context with an identity, never rejects.
pub struct AuthStage {
    verifier: TokenVerifier,
}

impl AuthStage {
    pub fn new(verifier: TokenVerifier) -> Self {
        Self { verifier }
    }
}

#[async_trait]
impl AdmissionStage for AuthStage {
    async fn admit(&self, ctx: &mut ConnectionContext) -> StageOutcome {
        if ctx.transport != TransportKind::WebSocket {
            return StageOutcome::Continue;
        }
        ctx.identity = self.verifier.verify(ctx.token.as_deref()).await;
        StageOutcome::Continue
    }
}

/// Restriction stage: rejects authenticated users with an active restriction.
/// Anonymous connections pass through; their fate is decided by the consumer.
pub struct RestrictionStage {
    evaluator: RestrictionEvaluator,
}

impl RestrictionStage {
    pub fn new(evaluator: RestrictionEvaluator) -> Self {
        Self { evaluator }
    }
}

#[async_trait]
impl AdmissionStage for RestrictionStage {
    async fn admit(&self, ctx: &mut ConnectionContext) -> StageOutcome {
        if ctx.transport != TransportKind::WebSocket {
            return StageOutcome::Continue;
        }
        let user = match &ctx.identity {
            Identity::Authenticated(user) => user.clone(),
            Identity::Anonymous => return StageOutcome::Continue,
        };

        match self.evaluator.evaluate(&user).await {
            Ok(ChatAccess::Allowed) => StageOutcome::Continue,
            Ok(ChatAccess::Restricted) => {
                info!(user_id = %user.id, "connection rejected: chat restricted");
                StageOutcome::Reject {
                    code: RESTRICTED_CLOSE_CODE,
                    reason: RESTRICTED_REASON.to_string(),
                }
            }
            Err(e) => {
                error!(user_id = %user.id, error = %e, "restriction lookup failed, failing closed");
                StageOutcome::Reject {
                    code: STORE_FAILURE_CLOSE_CODE,
                    reason: "internal error".to_string(),
                }
            }
        }
    }
}
