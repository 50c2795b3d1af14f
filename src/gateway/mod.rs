//! Connection admission: transport filter, authentication, restriction gating.

mod context;
mod pipeline;
mod stages;

pub use context::{ConnectionContext, TransportKind};
pub use pipeline::{Admission, AdmissionPipeline, AdmissionStage, StageOutcome};
pub use stages::{
    AuthStage, RestrictionStage, RESTRICTED_CLOSE_CODE, RESTRICTED_REASON,
    STORE_FAILURE_CLOSE_CODE,
};
