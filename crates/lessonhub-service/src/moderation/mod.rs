//! Content moderation workflow.

pub mod service;

pub use service::{ModerationService, NewSubmission, ResubmitContent};
