//! # lessonhub-core
//!
//! Core crate for LessonHub. Contains traits for the external
//! collaborators (identity provider, object storage), configuration
//! schemas, domain events, pagination types, and the unified error
//! system.
//!
//! This crate has **no** internal dependencies on other LessonHub crates.

pub mod config;
pub mod error;
pub mod events;
pub mod result;
pub mod traits;
pub mod types;

pub use error::AppError;
pub use result::AppResult;
