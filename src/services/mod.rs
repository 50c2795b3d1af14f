//! Gateway services.

pub mod restriction;

pub use restriction::{ChatAccess, RestrictionEvaluator};
