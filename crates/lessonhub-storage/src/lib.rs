//! # lessonhub-storage
//!
//! Object storage providers for LessonHub. Implements the
//! [`lessonhub_core::traits::ObjectStore`] trait for the local filesystem
//! (default) and S3-compatible services (behind the `s3` feature), plus
//! the factory that builds the configured provider.

pub mod manager;
pub mod providers;

pub use manager::build_object_store;
pub use providers::local::LocalObjectStore;
#[cfg(feature = "s3")]
pub use providers::s3::S3ObjectStore;
