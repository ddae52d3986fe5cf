//! # lessonhub-database
//!
//! PostgreSQL connection management, the store traits the service layer
//! depends on, and their concrete implementations: sqlx-backed
//! repositories for production and in-memory stores for single-node
//! development and deterministic tests.

pub mod connection;
pub mod memory;
pub mod migration;
pub mod repositories;
pub mod stores;

pub use connection::DatabasePool;
pub use stores::{ContactStore, ContentStore, PaymentStore, ProfileStore, SubscriptionStore};
