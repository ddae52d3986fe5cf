//! Content item entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::grade::Grade;
use super::section::Section;
use super::status::ModerationStatus;

/// A single PDF resource with a moderation status and grade/section
/// classification.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ContentItem {
    /// Unique item identifier.
    pub id: Uuid,
    /// Document title.
    pub title: String,
    /// Which section the document belongs to.
    pub section: Section,
    /// Grade level the document targets.
    pub grade: Grade,
    /// Object storage reference for the PDF.
    pub download_path: String,
    /// Current moderation status.
    pub status: ModerationStatus,
    /// Reviewer feedback; present exactly when status is `Refine`.
    pub reviewer_feedback: Option<String>,
    /// The principal who created the item.
    pub created_by: Uuid,
    /// When the item was created.
    pub created_at: DateTime<Utc>,
    /// When the item was last updated.
    pub updated_at: DateTime<Utc>,
}

impl ContentItem {
    /// Check whether the item is visible to ordinary students.
    pub fn is_visible_to_students(&self) -> bool {
        self.status == ModerationStatus::Approved
    }

    /// Check the feedback/status consistency rule: `Refine` carries
    /// non-empty feedback, every other status carries none.
    pub fn feedback_consistent(&self) -> bool {
        match &self.reviewer_feedback {
            Some(text) => self.status.requires_feedback() && !text.trim().is_empty(),
            None => !self.status.requires_feedback(),
        }
    }
}

/// Data required to create a new content item.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateContentItem {
    /// Document title.
    pub title: String,
    /// Target section.
    pub section: Section,
    /// Target grade level.
    pub grade: Grade,
    /// Object storage reference for the PDF.
    pub download_path: String,
    /// Initial status (`Pending` for assistant submissions, `Approved`
    /// for admin-authored items).
    pub status: ModerationStatus,
    /// The creating principal's ID.
    pub created_by: Uuid,
}

/// Data for an admin edit of an existing item's metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateContentItem {
    /// The item ID to update.
    pub id: Uuid,
    /// New title.
    pub title: Option<String>,
    /// New section.
    pub section: Option<Section>,
    /// New grade level.
    pub grade: Option<Grade>,
    /// New storage reference.
    pub download_path: Option<String>,
}
