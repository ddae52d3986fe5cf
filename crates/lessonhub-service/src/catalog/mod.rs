//! Student catalog with plan entitlement.

pub mod entitlement;
pub mod service;

pub use entitlement::EntitlementResolver;
pub use service::{CatalogEntry, CatalogPage, CatalogService};
