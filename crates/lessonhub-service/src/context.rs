//! Request context carrying the resolved principal.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use lessonhub_core::error::AppError;
use lessonhub_entity::content::Grade;
use lessonhub_entity::profile::{PlanTier, Profile, Role};

/// Context for the current authenticated request.
///
/// Built from the resolved session state and passed explicitly into
/// service methods so that every operation knows *who* is acting. There
/// is no ambient current-user singleton.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequestContext {
    /// The acting principal's ID.
    pub principal_id: Uuid,
    /// The principal's role at resolution time.
    pub role: Role,
    /// The principal's plan tier (meaningful for students only).
    pub plan: PlanTier,
    /// The principal's grade level (students only).
    pub grade: Option<Grade>,
    /// Whether the account is active.
    pub active: bool,
    /// When the request was received.
    pub request_time: DateTime<Utc>,
}

impl RequestContext {
    /// Build a context from a resolved profile.
    pub fn from_profile(profile: &Profile) -> Self {
        Self {
            principal_id: profile.id,
            role: profile.role,
            plan: profile.plan,
            grade: profile.grade,
            active: profile.active,
            request_time: Utc::now(),
        }
    }

    /// Returns whether the acting principal is an admin.
    pub fn is_admin(&self) -> bool {
        self.role.is_admin()
    }

    /// Require an active admin principal.
    pub fn require_admin(&self) -> Result<(), AppError> {
        if self.active && self.role == Role::Admin {
            Ok(())
        } else {
            Err(AppError::authorization(
                "This action requires an administrator",
            ))
        }
    }

    /// Require an active assistant principal.
    pub fn require_assistant(&self) -> Result<(), AppError> {
        if self.active && self.role == Role::Assistant {
            Ok(())
        } else {
            Err(AppError::authorization("This action requires an assistant"))
        }
    }

    /// Require an active student principal.
    pub fn require_student(&self) -> Result<(), AppError> {
        if self.active && self.role == Role::Student {
            Ok(())
        } else {
            Err(AppError::authorization("This action requires a student"))
        }
    }
}
