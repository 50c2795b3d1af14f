//! Domain models: identities and chat restrictions.

pub mod identity;
pub mod restriction;

pub use identity::{AuthenticatedUser, Identity};
pub use restriction::{Restriction, RestrictionKind};
