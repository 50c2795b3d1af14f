//! Ordered admission stages in front of the session hand-off.

use std::sync::Arc;

use async_trait::async_trait;

use super::context::ConnectionContext;
use super::stages::{AuthStage, RestrictionStage};
use crate::auth::TokenVerifier;
use crate::services::RestrictionEvaluator;

/// What a single stage decided for the connection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StageOutcome {
    Continue,
    Reject { code: u16, reason: String },
}

/// One admission stage. Stages run in order, each may annotate the context;
/// the first rejection short-circuits the rest of the pipeline.
#[async_trait]
pub trait AdmissionStage: Send + Sync {
    async fn admit(&self, ctx: &mut ConnectionContext) -> StageOutcome;
}

/// Final admission verdict for a connection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Admission {
    /// All stages passed; hand the annotated context to the session layer.
    Allowed,
    /// A stage rejected; close with `code`/`reason`, never invoke the session.
    Rejected { code: u16, reason: String },
}

/// Drives the ordered stage list. Authentication always runs before
/// restriction evaluation; later stages read what earlier ones attached.
#[derive(Clone)]
pub struct AdmissionPipeline {
    stages: Vec<Arc<dyn AdmissionStage>>,
}

impl AdmissionPipeline {
    pub fn new(verifier: TokenVerifier, evaluator: RestrictionEvaluator) -> Self {
        Self {
            stages: vec![
                Arc::new(AuthStage::new(verifier)),
                Arc::new(RestrictionStage::new(evaluator)),
            ],
        }
    }

    /// Custom stage list, in execution order. Used by tests to interpose spies.
    pub fn with_stages(stages: Vec<Arc<dyn AdmissionStage>>) -> Self {
        Self { stages }
    }

    pub async fn admit(&self, ctx: &mut ConnectionContext) -> Admission {
        for stage in &self.stages {
            if let StageOutcome::Reject { code, reason } = stage.admit(ctx).await {
                return Admission::Rejected { code, reason };
            }
        }
        Admission::Allowed
    }
}
