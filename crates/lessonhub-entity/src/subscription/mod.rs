//! Subscription entity: the paid window granted to a principal.

pub mod model;

pub use model::Subscription;
