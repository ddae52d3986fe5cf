//! # lessonhub-entity
//!
//! Domain entity models for LessonHub: content items with their moderation
//! status, mirrored principal profiles, payment submissions, subscriptions,
//! and contact messages. Status, section, grade, role, and plan values are
//! closed enumeration types so invalid values are rejected at construction
//! rather than falling through string comparisons.

pub mod contact;
pub mod content;
pub mod payment;
pub mod profile;
pub mod subscription;

pub use contact::ContactMessage;
pub use content::{ContentItem, ContentQuery, Grade, ModerationStatus, Section, SectionFilter};
pub use payment::{PaymentMethod, PaymentStatus, PaymentSubmission};
pub use profile::{PlanTier, Profile, Role};
pub use subscription::Subscription;
