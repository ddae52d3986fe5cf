//! Subscription expiry sweep.

use std::sync::Arc;

use chrono::Utc;
use tracing::{info, warn};

use lessonhub_core::result::AppResult;
use lessonhub_database::{ProfileStore, SubscriptionStore};
use lessonhub_entity::profile::PlanTier;

/// Outcome of one expiry sweep.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExpiryReport {
    /// Lapsed subscriptions found.
    pub expired: usize,
    /// Profiles demoted back to the free tier.
    pub demoted: usize,
}

/// Demotes paid plans whose subscription window has lapsed.
///
/// The profile plan flips back to free first, then the subscription row
/// is cleared; a failure between the two leaves the row expired so the
/// next sweep retries.
#[derive(Debug, Clone)]
pub struct SubscriptionExpiryJob {
    profiles: Arc<dyn ProfileStore>,
    subscriptions: Arc<dyn SubscriptionStore>,
}

impl SubscriptionExpiryJob {
    /// Creates a new expiry job.
    pub fn new(profiles: Arc<dyn ProfileStore>, subscriptions: Arc<dyn SubscriptionStore>) -> Self {
        Self {
            profiles,
            subscriptions,
        }
    }

    /// Run one sweep.
    pub async fn run(&self) -> AppResult<ExpiryReport> {
        let now = Utc::now();
        let mut report = ExpiryReport::default();

        for subscription in self.subscriptions.find_expired(now).await? {
            report.expired += 1;
            let profile_id = subscription.profile_id;

            match self.profiles.find_by_id(profile_id).await {
                Ok(Some(profile)) if profile.plan.is_paid() => {
                    if let Err(e) = self.profiles.update_plan(profile_id, PlanTier::Free).await {
                        warn!(profile_id = %profile_id, error = %e, "Plan demotion failed");
                        continue;
                    }
                    report.demoted += 1;
                }
                Ok(_) => {}
                Err(e) => {
                    warn!(profile_id = %profile_id, error = %e, "Profile lookup failed");
                    continue;
                }
            }

            if let Err(e) = self
                .subscriptions
                .upsert(profile_id, PlanTier::Free, false, None)
                .await
            {
                warn!(profile_id = %profile_id, error = %e, "Subscription clear failed");
            }
        }

        if report.expired > 0 {
            info!(
                expired = report.expired,
                demoted = report.demoted,
                "Expiry sweep completed"
            );
        }
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use lessonhub_database::memory::{MemoryProfileStore, MemorySubscriptionStore};
    use lessonhub_entity::profile::{CreateProfile, Role};
    use uuid::Uuid;

    async fn seed_paid_student(
        profiles: &MemoryProfileStore,
        subscriptions: &MemorySubscriptionStore,
        expires_in_days: i64,
    ) -> Uuid {
        let id = Uuid::new_v4();
        profiles
            .create(&CreateProfile {
                id,
                display_name: "Student".to_string(),
                email: format!("{id}@example.com"),
                role: Role::Student,
                grade: None,
                plan: PlanTier::Free,
            })
            .await
            .unwrap();
        profiles.update_plan(id, PlanTier::Paid).await.unwrap();
        subscriptions
            .upsert(
                id,
                PlanTier::Paid,
                true,
                Some(Utc::now() + Duration::days(expires_in_days)),
            )
            .await
            .unwrap();
        id
    }

    #[tokio::test]
    async fn test_lapsed_window_demotes_to_free() {
        let profiles = Arc::new(MemoryProfileStore::new());
        let subscriptions = Arc::new(MemorySubscriptionStore::new());

        let lapsed = seed_paid_student(&profiles, &subscriptions, -1).await;
        let active = seed_paid_student(&profiles, &subscriptions, 10).await;

        let job = SubscriptionExpiryJob::new(
            Arc::clone(&profiles) as Arc<dyn ProfileStore>,
            Arc::clone(&subscriptions) as Arc<dyn SubscriptionStore>,
        );
        let report = job.run().await.unwrap();
        assert_eq!(report.expired, 1);
        assert_eq!(report.demoted, 1);

        let lapsed_profile = profiles.find_by_id(lapsed).await.unwrap().unwrap();
        assert_eq!(lapsed_profile.plan, PlanTier::Free);
        let cleared = subscriptions.find_by_profile(lapsed).await.unwrap().unwrap();
        assert!(!cleared.is_paid);
        assert!(cleared.expires_at.is_none());

        let active_profile = profiles.find_by_id(active).await.unwrap().unwrap();
        assert_eq!(active_profile.plan, PlanTier::Paid);
    }

    #[tokio::test]
    async fn test_sweep_is_idempotent() {
        let profiles = Arc::new(MemoryProfileStore::new());
        let subscriptions = Arc::new(MemorySubscriptionStore::new());
        seed_paid_student(&profiles, &subscriptions, -1).await;

        let job = SubscriptionExpiryJob::new(
            Arc::clone(&profiles) as Arc<dyn ProfileStore>,
            Arc::clone(&subscriptions) as Arc<dyn SubscriptionStore>,
        );
        job.run().await.unwrap();
        let second = job.run().await.unwrap();
        assert_eq!(second, ExpiryReport::default());
    }
}
