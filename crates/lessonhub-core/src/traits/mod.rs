//! Trait seams for the external collaborators.
//!
//! The traits are defined here in `lessonhub-core` and implemented in the
//! crates that own the concrete integrations (`lessonhub-auth` for the
//! identity provider, `lessonhub-storage` for object storage).

pub mod identity;
pub mod object_store;

pub use identity::{AuthSession, IdentityProvider};
pub use object_store::ObjectStore;
