//! Account self-service — signup, sign-in/out, passwords, and profile.

use std::sync::Arc;

use tracing::{info, warn};
use validator::ValidateEmail;

use lessonhub_core::error::AppError;
use lessonhub_core::result::AppResult;
use lessonhub_core::traits::{AuthSession, IdentityProvider};
use lessonhub_database::ProfileStore;
use lessonhub_entity::content::Grade;
use lessonhub_entity::profile::{CreateProfile, PlanTier, Profile, Role, UpdateProfile};

use crate::context::RequestContext;

/// Minimum accepted password length.
const MIN_PASSWORD_LENGTH: usize = 8;

/// A signup request.
#[derive(Debug, Clone)]
pub struct SignUpRequest {
    /// Email address.
    pub email: String,
    /// Password (validated locally before any network call).
    pub password: String,
    /// Display name.
    pub display_name: String,
    /// Grade level for the new student.
    pub grade: Grade,
}

/// Handles account self-service operations.
///
/// Orchestrates the identity provider (which owns credentials and
/// sessions) and the mirrored profile record (which owns role, grade,
/// and plan). All validation happens before any call leaves the process.
#[derive(Debug, Clone)]
pub struct AccountService {
    /// Identity & session provider.
    identity: Arc<dyn IdentityProvider>,
    /// Mirrored profile store.
    profiles: Arc<dyn ProfileStore>,
}

impl AccountService {
    /// Creates a new account service.
    pub fn new(identity: Arc<dyn IdentityProvider>, profiles: Arc<dyn ProfileStore>) -> Self {
        Self { identity, profiles }
    }

    /// Create a new student account with its mirrored profile.
    ///
    /// New accounts always start as `Student` on the `Free` plan;
    /// assistants and admins are provisioned by an admin override.
    pub async fn sign_up(&self, request: SignUpRequest) -> AppResult<Profile> {
        validate_email(&request.email)?;
        validate_password(&request.password)?;
        if request.display_name.trim().is_empty() {
            return Err(AppError::validation("Display name cannot be empty"));
        }

        let session = self
            .identity
            .create_account(&request.email, &request.password)
            .await?;

        let profile = self
            .profiles
            .create(&CreateProfile {
                id: session.principal_id,
                display_name: request.display_name,
                email: request.email,
                role: Role::Student,
                grade: Some(request.grade),
                plan: PlanTier::Free,
            })
            .await;

        match profile {
            Ok(profile) => {
                info!(principal_id = %profile.id, "Account created");
                Ok(profile)
            }
            Err(e) => {
                // The identity account exists but the mirror does not;
                // surface the error and leave repair to a later sign-in.
                warn!(principal_id = %session.principal_id, error = %e, "Profile creation failed after signup");
                Err(e)
            }
        }
    }

    /// Authenticate and return the resolved profile.
    pub async fn sign_in(&self, email: &str, password: &str) -> AppResult<(AuthSession, Profile)> {
        if email.trim().is_empty() || password.is_empty() {
            return Err(AppError::validation("Email and password are required"));
        }

        let session = self.identity.authenticate(email, password).await?;

        let profile = self
            .profiles
            .find_by_id(session.principal_id)
            .await?
            .ok_or_else(|| AppError::not_found("Profile not found for this account"))?;

        Ok((session, profile))
    }

    /// End the current session.
    pub async fn sign_out(&self) -> AppResult<()> {
        self.identity.end_session().await
    }

    /// Request a password reset email.
    pub async fn request_password_reset(&self, email: &str) -> AppResult<()> {
        validate_email(email)?;
        self.identity.request_password_reset(email).await
    }

    /// Update the current principal's password.
    pub async fn update_password(&self, new_password: &str) -> AppResult<()> {
        validate_password(new_password)?;
        self.identity.update_password(new_password).await
    }

    /// Fetch the acting principal's profile.
    pub async fn profile(&self, ctx: &RequestContext) -> AppResult<Profile> {
        self.profiles
            .find_by_id(ctx.principal_id)
            .await?
            .ok_or_else(|| AppError::not_found("Profile not found"))
    }

    /// Update the acting principal's display name and grade.
    pub async fn update_profile(
        &self,
        ctx: &RequestContext,
        display_name: Option<String>,
        grade: Option<Grade>,
    ) -> AppResult<Profile> {
        if let Some(name) = &display_name {
            if name.trim().is_empty() {
                return Err(AppError::validation("Display name cannot be empty"));
            }
        }

        self.profiles
            .update(&UpdateProfile {
                id: ctx.principal_id,
                display_name,
                grade,
            })
            .await
    }
}

/// Validate an email address format.
fn validate_email(email: &str) -> AppResult<()> {
    if email.validate_email() {
        Ok(())
    } else {
        Err(AppError::validation("Invalid email format"))
    }
}

/// Validate a password against the minimum length policy.
fn validate_password(password: &str) -> AppResult<()> {
    if password.len() < MIN_PASSWORD_LENGTH {
        Err(AppError::validation(format!(
            "Password must be at least {MIN_PASSWORD_LENGTH} characters"
        )))
    } else {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_email_validation() {
        assert!(validate_email("student@example.com").is_ok());
        assert!(validate_email("not-an-email").is_err());
        assert!(validate_email("").is_err());
    }

    #[test]
    fn test_password_minimum_length() {
        assert!(validate_password("12345678").is_ok());
        assert!(validate_password("1234567").is_err());
    }
}
