//! Payment submission entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::method::PaymentMethod;
use super::status::PaymentStatus;

/// A student-submitted proof of payment awaiting an admin decision.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct PaymentSubmission {
    /// Unique submission identifier.
    pub id: Uuid,
    /// The submitting principal's ID.
    pub submitted_by: Uuid,
    /// Declared amount in whole currency units.
    pub amount: i64,
    /// Declared payment method.
    pub method: PaymentMethod,
    /// Transaction reference, if any.
    pub transaction_ref: Option<String>,
    /// Object storage reference of the uploaded receipt image.
    pub receipt_path: Option<String>,
    /// Free-text notes from the submitter.
    pub notes: Option<String>,
    /// Current decision status.
    pub status: PaymentStatus,
    /// Admin feedback; present exactly when status is `NeedsRevision`.
    pub admin_feedback: Option<String>,
    /// When the submission was created.
    pub created_at: DateTime<Utc>,
    /// When the admin decision was taken.
    pub reviewed_at: Option<DateTime<Utc>>,
}

/// Data required to create a new payment submission.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatePaymentSubmission {
    /// The submitting principal's ID.
    pub submitted_by: Uuid,
    /// Declared amount in whole currency units.
    pub amount: i64,
    /// Declared payment method.
    pub method: PaymentMethod,
    /// Transaction reference, if any.
    pub transaction_ref: Option<String>,
    /// Object storage reference of the uploaded receipt image.
    pub receipt_path: Option<String>,
    /// Free-text notes from the submitter.
    pub notes: Option<String>,
}
