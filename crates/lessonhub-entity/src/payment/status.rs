//! Payment submission status enumeration.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Status of a payment submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "payment_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    /// Awaiting admin review.
    Pending,
    /// Accepted; the plan upgrade side effect has been applied.
    Approved,
    /// Rejected.
    Rejected,
    /// Returned to the submitter with feedback; may be resubmitted.
    NeedsRevision,
}

impl PaymentStatus {
    /// Check whether this status is terminal.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Approved | Self::Rejected)
    }

    /// Check whether an admin may decide a submission in this status.
    pub fn is_reviewable(&self) -> bool {
        matches!(self, Self::Pending)
    }

    /// Check whether the submitter may resubmit from this status.
    pub fn can_resubmit(&self) -> bool {
        matches!(self, Self::NeedsRevision)
    }

    /// Check whether this status must carry admin feedback.
    pub fn requires_feedback(&self) -> bool {
        matches!(self, Self::NeedsRevision)
    }

    /// Return the status as a snake_case string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
            Self::NeedsRevision => "needs_revision",
        }
    }
}

impl fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for PaymentStatus {
    type Err = lessonhub_core::AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pending" => Ok(Self::Pending),
            "approved" => Ok(Self::Approved),
            "rejected" => Ok(Self::Rejected),
            "needs_revision" => Ok(Self::NeedsRevision),
            _ => Err(lessonhub_core::AppError::validation(format!(
                "Invalid payment status: '{s}'. Expected one of: pending, approved, rejected, needs_revision"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_review_and_resubmit() {
        assert!(PaymentStatus::Pending.is_reviewable());
        assert!(!PaymentStatus::NeedsRevision.is_reviewable());
        assert!(PaymentStatus::NeedsRevision.can_resubmit());
        assert!(!PaymentStatus::Rejected.can_resubmit());
    }
}
