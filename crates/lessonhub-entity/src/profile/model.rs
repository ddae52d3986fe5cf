//! Profile entity model.
//!
//! The identity service owns the principal; this record mirrors it with
//! the role/plan/grade fields the identity service does not natively
//! model. The profile id equals the identity principal id.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::content::Grade;

use super::plan::PlanTier;
use super::role::Role;

/// A principal's mirrored profile record.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Profile {
    /// Identity principal ID.
    pub id: Uuid,
    /// Human-readable display name.
    pub display_name: String,
    /// Email address.
    pub email: String,
    /// Principal role. Immutable outside an admin override.
    pub role: Role,
    /// Grade level; meaningful for students only.
    pub grade: Option<Grade>,
    /// Plan tier; meaningful for students only.
    pub plan: PlanTier,
    /// Whether the account is active (admins may suspend).
    pub active: bool,
    /// When the profile was created.
    pub created_at: DateTime<Utc>,
}

impl Profile {
    /// Check if this principal is an admin.
    pub fn is_admin(&self) -> bool {
        self.role.is_admin()
    }

    /// Check if this principal is a student.
    pub fn is_student(&self) -> bool {
        self.role == Role::Student
    }
}

/// Data required to create a new profile.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateProfile {
    /// Identity principal ID.
    pub id: Uuid,
    /// Display name.
    pub display_name: String,
    /// Email address.
    pub email: String,
    /// Assigned role.
    pub role: Role,
    /// Grade level (students).
    pub grade: Option<Grade>,
    /// Starting plan tier.
    pub plan: PlanTier,
}

/// Data for updating a profile's self-service fields.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateProfile {
    /// The profile ID to update.
    pub id: Uuid,
    /// New display name.
    pub display_name: Option<String>,
    /// New grade level.
    pub grade: Option<Grade>,
}
