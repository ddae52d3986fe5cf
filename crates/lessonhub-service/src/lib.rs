//! # lessonhub-service
//!
//! Business logic service layer for LessonHub. Each service orchestrates
//! stores, the identity provider, and object storage to implement
//! application-level use cases: content moderation, catalog browsing with
//! plan entitlement, payment review with its subscription side effect,
//! account management, and contact messages.
//!
//! Services follow constructor injection — all dependencies are provided
//! at construction time via `Arc` references.

pub mod account;
pub mod catalog;
pub mod contact;
pub mod context;
pub mod moderation;
pub mod payment;

pub use account::{AccountService, AdminAccountService};
pub use catalog::{CatalogService, EntitlementResolver};
pub use contact::ContactService;
pub use context::RequestContext;
pub use moderation::ModerationService;
pub use payment::PaymentService;
