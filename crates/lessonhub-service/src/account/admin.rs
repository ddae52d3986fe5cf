//! Admin account management — listing, suspension, overrides, deletion.

use std::sync::Arc;

use chrono::{Duration, Utc};
use tracing::info;
use uuid::Uuid;

use lessonhub_core::config::plan::PlanPolicy;
use lessonhub_core::error::AppError;
use lessonhub_core::result::AppResult;
use lessonhub_core::types::pagination::{PageRequest, PageResponse};
use lessonhub_database::{ContentStore, PaymentStore, ProfileStore, SubscriptionStore};
use lessonhub_entity::profile::{PlanTier, Profile, Role};

use crate::context::RequestContext;

/// Handles admin operations on accounts.
#[derive(Debug, Clone)]
pub struct AdminAccountService {
    /// Profile store.
    profiles: Arc<dyn ProfileStore>,
    /// Content store (deletion cascade).
    content: Arc<dyn ContentStore>,
    /// Payment store (deletion cascade).
    payments: Arc<dyn PaymentStore>,
    /// Subscription store (plan changes and deletion cascade).
    subscriptions: Arc<dyn SubscriptionStore>,
    /// Plan policy (manual upgrade window).
    policy: PlanPolicy,
}

impl AdminAccountService {
    /// Creates a new admin account service.
    pub fn new(
        profiles: Arc<dyn ProfileStore>,
        content: Arc<dyn ContentStore>,
        payments: Arc<dyn PaymentStore>,
        subscriptions: Arc<dyn SubscriptionStore>,
        policy: PlanPolicy,
    ) -> Self {
        Self {
            profiles,
            content,
            payments,
            subscriptions,
            policy,
        }
    }

    /// List all profiles.
    pub async fn list_users(
        &self,
        ctx: &RequestContext,
        page: &PageRequest,
    ) -> AppResult<PageResponse<Profile>> {
        ctx.require_admin()?;
        self.profiles.find_all(page).await
    }

    /// List profiles with the given role.
    pub async fn list_by_role(
        &self,
        ctx: &RequestContext,
        role: Role,
        page: &PageRequest,
    ) -> AppResult<PageResponse<Profile>> {
        ctx.require_admin()?;
        self.profiles.find_by_role(role, page).await
    }

    /// Search profiles by display name or email.
    pub async fn search_users(
        &self,
        ctx: &RequestContext,
        query: &str,
        page: &PageRequest,
    ) -> AppResult<PageResponse<Profile>> {
        ctx.require_admin()?;
        self.profiles.search(query, page).await
    }

    /// Suspend an account.
    pub async fn suspend(&self, ctx: &RequestContext, profile_id: Uuid) -> AppResult<Profile> {
        ctx.require_admin()?;
        if profile_id == ctx.principal_id {
            return Err(AppError::validation("Cannot suspend your own account"));
        }
        let profile = self.profiles.set_active(profile_id, false).await?;
        info!(profile_id = %profile_id, admin = %ctx.principal_id, "Account suspended");
        Ok(profile)
    }

    /// Reinstate a suspended account.
    pub async fn reinstate(&self, ctx: &RequestContext, profile_id: Uuid) -> AppResult<Profile> {
        ctx.require_admin()?;
        let profile = self.profiles.set_active(profile_id, true).await?;
        info!(profile_id = %profile_id, admin = %ctx.principal_id, "Account reinstated");
        Ok(profile)
    }

    /// Override a profile's role.
    ///
    /// Roles are immutable in normal operation; this is the one
    /// administrative escape hatch.
    pub async fn override_role(
        &self,
        ctx: &RequestContext,
        profile_id: Uuid,
        role: Role,
    ) -> AppResult<Profile> {
        ctx.require_admin()?;
        let profile = self.profiles.update_role(profile_id, role).await?;
        info!(profile_id = %profile_id, role = %role, admin = %ctx.principal_id, "Role overridden");
        Ok(profile)
    }

    /// Manually change a student's plan tier.
    ///
    /// Mirrors the payment-approval side effect: the subscription row is
    /// upserted first, then the profile plan flips. An upgrade opens a
    /// fresh paid window; a downgrade clears it.
    pub async fn set_plan(
        &self,
        ctx: &RequestContext,
        profile_id: Uuid,
        plan: PlanTier,
    ) -> AppResult<Profile> {
        ctx.require_admin()?;

        match plan {
            PlanTier::Paid => {
                let expires_at = Utc::now() + Duration::days(self.policy.paid_window_days);
                self.subscriptions
                    .upsert(profile_id, PlanTier::Paid, true, Some(expires_at))
                    .await?;
            }
            PlanTier::Free => {
                self.subscriptions
                    .upsert(profile_id, PlanTier::Free, false, None)
                    .await?;
            }
        }

        let profile = self.profiles.update_plan(profile_id, plan).await?;
        info!(profile_id = %profile_id, plan = %plan, admin = %ctx.principal_id, "Plan changed");
        Ok(profile)
    }

    /// Delete an account, cascading to everything it owns.
    ///
    /// Dependent records go first so a failure never leaves an orphaned
    /// profile pointing at deleted data.
    pub async fn delete_user(&self, ctx: &RequestContext, profile_id: Uuid) -> AppResult<bool> {
        ctx.require_admin()?;
        if profile_id == ctx.principal_id {
            return Err(AppError::validation("Cannot delete your own account"));
        }

        let content_removed = self.content.delete_by_creator(profile_id).await?;
        let payments_removed = self.payments.delete_by_submitter(profile_id).await?;
        self.subscriptions.delete_by_profile(profile_id).await?;
        let deleted = self.profiles.delete(profile_id).await?;

        info!(
            profile_id = %profile_id,
            admin = %ctx.principal_id,
            content_removed,
            payments_removed,
            "Account deleted"
        );
        Ok(deleted)
    }
}
