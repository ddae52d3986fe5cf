//! Principal profile entity: the mirrored user record.

pub mod model;
pub mod plan;
pub mod role;

pub use model::{CreateProfile, Profile, UpdateProfile};
pub use plan::PlanTier;
pub use role::Role;
