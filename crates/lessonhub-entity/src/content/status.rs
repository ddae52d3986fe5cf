//! Content moderation status enumeration and transition rules.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Moderation status of a content item.
///
/// Assistant submissions start in `Pending`; admin-authored items are
/// created directly in `Approved` and never pass through the machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "moderation_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ModerationStatus {
    /// Awaiting admin review.
    Pending,
    /// Published; visible to students.
    Approved,
    /// Permanently rejected.
    Declined,
    /// Returned to the submitter with feedback for revision.
    Refine,
}

impl ModerationStatus {
    /// Check whether this status is terminal (no further review exposed).
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Approved | Self::Declined)
    }

    /// Check whether an admin may act on an item in this status.
    pub fn is_reviewable(&self) -> bool {
        matches!(self, Self::Pending | Self::Refine)
    }

    /// Check whether this status must carry reviewer feedback.
    ///
    /// Feedback is meaningful only in the revision-request state; every
    /// other status carries none.
    pub fn requires_feedback(&self) -> bool {
        matches!(self, Self::Refine)
    }

    /// Check whether an admin review may move an item from this status to
    /// `target`.
    ///
    /// Reviews act on `Pending` and `Refine` items and land on `Approved`,
    /// `Declined`, or `Refine`. Re-entering the current status is treated
    /// as an idempotent no-op by the caller, not a transition.
    pub fn can_review_to(&self, target: ModerationStatus) -> bool {
        self.is_reviewable()
            && matches!(target, Self::Approved | Self::Declined | Self::Refine)
    }

    /// Check whether the original submitter may resubmit from this status,
    /// returning the item to `Pending`.
    pub fn can_resubmit(&self) -> bool {
        matches!(self, Self::Refine)
    }

    /// Return the status as a lowercase string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::Declined => "declined",
            Self::Refine => "refine",
        }
    }
}

impl fmt::Display for ModerationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ModerationStatus {
    type Err = lessonhub_core::AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pending" => Ok(Self::Pending),
            "approved" => Ok(Self::Approved),
            "declined" => Ok(Self::Declined),
            "refine" => Ok(Self::Refine),
            _ => Err(lessonhub_core::AppError::validation(format!(
                "Invalid moderation status: '{s}'. Expected one of: pending, approved, declined, refine"
            ))),
        }
    }
}
