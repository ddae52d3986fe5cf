//! Plan/subscription reconciliation sweep.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use tracing::{info, warn};
use uuid::Uuid;

use lessonhub_core::config::plan::PlanPolicy;
use lessonhub_core::result::AppResult;
use lessonhub_database::{PaymentStore, ProfileStore, SubscriptionStore};
use lessonhub_entity::payment::PaymentSubmission;
use lessonhub_entity::profile::PlanTier;

/// Outcome of one reconciliation sweep.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReconcileReport {
    /// Approved payments inside an active window that were checked.
    pub checked: usize,
    /// Subscription rows repaired.
    pub subscriptions_repaired: usize,
    /// Profile plans repaired.
    pub plans_repaired: usize,
}

/// Heals partial failures of the payment-approval side effect.
///
/// An approved payment must leave its submitter with a paid-plan profile
/// and a subscription window of the review time plus the paid window
/// length. The approval writes are sequenced but not atomic; this sweep
/// re-derives the expected state from the approved payments and repairs
/// whichever half is missing. Payments whose window has already lapsed
/// are left to the expiry sweep.
#[derive(Debug, Clone)]
pub struct PlanReconcileJob {
    payments: Arc<dyn PaymentStore>,
    profiles: Arc<dyn ProfileStore>,
    subscriptions: Arc<dyn SubscriptionStore>,
    policy: PlanPolicy,
}

impl PlanReconcileJob {
    /// Creates a new reconciliation job.
    pub fn new(
        payments: Arc<dyn PaymentStore>,
        profiles: Arc<dyn ProfileStore>,
        subscriptions: Arc<dyn SubscriptionStore>,
        policy: PlanPolicy,
    ) -> Self {
        Self {
            payments,
            profiles,
            subscriptions,
            policy,
        }
    }

    /// Run one sweep.
    pub async fn run(&self) -> AppResult<ReconcileReport> {
        let now = Utc::now();
        let mut report = ReconcileReport::default();

        for payment in self.latest_approved_per_submitter().await? {
            let Some(expected_expiry) = self.expected_expiry(&payment) else {
                warn!(payment_id = %payment.id, "Approved payment without review time");
                continue;
            };
            if expected_expiry <= now {
                continue;
            }

            report.checked += 1;
            self.reconcile_one(&payment, expected_expiry, &mut report)
                .await;
        }

        if report.subscriptions_repaired > 0 || report.plans_repaired > 0 {
            info!(
                checked = report.checked,
                subscriptions_repaired = report.subscriptions_repaired,
                plans_repaired = report.plans_repaired,
                "Reconciliation repaired inconsistent plan state"
            );
        }
        Ok(report)
    }

    /// The newest approved payment per submitter wins.
    async fn latest_approved_per_submitter(&self) -> AppResult<Vec<PaymentSubmission>> {
        let mut latest: HashMap<Uuid, PaymentSubmission> = HashMap::new();
        for payment in self.payments.find_approved().await? {
            match latest.get(&payment.submitted_by) {
                Some(existing) if existing.reviewed_at >= payment.reviewed_at => {}
                _ => {
                    latest.insert(payment.submitted_by, payment);
                }
            }
        }
        Ok(latest.into_values().collect())
    }

    fn expected_expiry(&self, payment: &PaymentSubmission) -> Option<DateTime<Utc>> {
        payment
            .reviewed_at
            .map(|reviewed_at| reviewed_at + Duration::days(self.policy.paid_window_days))
    }

    async fn reconcile_one(
        &self,
        payment: &PaymentSubmission,
        expected_expiry: DateTime<Utc>,
        report: &mut ReconcileReport,
    ) {
        let submitter = payment.submitted_by;
        let Some(reviewed_at) = payment.reviewed_at else {
            return;
        };

        // Subscription half first, mirroring the approval write order. A
        // subscription row touched after the review is a later decision
        // (manual downgrade) and wins over the payment.
        let subscription = match self.subscriptions.find_by_profile(submitter).await {
            Ok(subscription) => subscription,
            Err(e) => {
                warn!(profile_id = %submitter, error = %e, "Subscription lookup failed");
                return;
            }
        };

        let mut window_active = subscription.as_ref().is_some_and(|s| {
            s.plan.is_paid() && s.is_paid && s.expires_at.is_some()
        });

        if !window_active {
            let stale = subscription
                .as_ref()
                .is_none_or(|s| s.updated_at < reviewed_at);
            if !stale {
                return;
            }
            match self
                .subscriptions
                .upsert(submitter, PlanTier::Paid, true, Some(expected_expiry))
                .await
            {
                Ok(_) => {
                    report.subscriptions_repaired += 1;
                    window_active = true;
                    info!(profile_id = %submitter, "Repaired missing subscription window");
                }
                Err(e) => {
                    warn!(profile_id = %submitter, error = %e, "Subscription repair failed");
                }
            }
        }

        if !window_active {
            return;
        }

        match self.profiles.find_by_id(submitter).await {
            Ok(Some(profile)) if !profile.plan.is_paid() => {
                match self.profiles.update_plan(submitter, PlanTier::Paid).await {
                    Ok(_) => {
                        report.plans_repaired += 1;
                        info!(profile_id = %submitter, "Repaired profile plan tier");
                    }
                    Err(e) => warn!(profile_id = %submitter, error = %e, "Plan repair failed"),
                }
            }
            Ok(Some(_)) => {}
            Ok(None) => {
                // Profile deleted after approval; nothing to repair.
            }
            Err(e) => warn!(profile_id = %submitter, error = %e, "Profile lookup failed"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lessonhub_database::memory::{
        MemoryPaymentStore, MemoryProfileStore, MemorySubscriptionStore,
    };
    use lessonhub_entity::payment::{CreatePaymentSubmission, PaymentMethod, PaymentStatus};
    use lessonhub_entity::profile::{CreateProfile, Role};

    async fn seed_student(profiles: &MemoryProfileStore) -> Uuid {
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
        id
    }

    async fn seed_approved_payment(payments: &MemoryPaymentStore, submitter: Uuid) {
        let payment = payments
            .create(&CreatePaymentSubmission {
                submitted_by: submitter,
                amount: 100,
                method: PaymentMethod::PostalTransfer,
                transaction_ref: None,
                receipt_path: None,
                notes: None,
            })
            .await
            .unwrap();
        payments
            .set_decision(payment.id, PaymentStatus::Approved, None, Utc::now())
            .await
            .unwrap();
    }

    fn job(
        payments: &Arc<MemoryPaymentStore>,
        profiles: &Arc<MemoryProfileStore>,
        subscriptions: &Arc<MemorySubscriptionStore>,
    ) -> PlanReconcileJob {
        PlanReconcileJob::new(
            Arc::clone(payments) as Arc<dyn PaymentStore>,
            Arc::clone(profiles) as Arc<dyn ProfileStore>,
            Arc::clone(subscriptions) as Arc<dyn SubscriptionStore>,
            PlanPolicy::default(),
        )
    }

    #[tokio::test]
    async fn test_repairs_missing_subscription_and_plan() {
        let payments = Arc::new(MemoryPaymentStore::new());
        let profiles = Arc::new(MemoryProfileStore::new());
        let subscriptions = Arc::new(MemorySubscriptionStore::new());

        // Approved payment with neither side effect applied.
        let student = seed_student(&profiles).await;
        seed_approved_payment(&payments, student).await;

        let report = job(&payments, &profiles, &subscriptions).run().await.unwrap();
        assert_eq!(report.checked, 1);
        assert_eq!(report.subscriptions_repaired, 1);
        assert_eq!(report.plans_repaired, 1);

        let profile = profiles.find_by_id(student).await.unwrap().unwrap();
        assert_eq!(profile.plan, PlanTier::Paid);
        let subscription = subscriptions
            .find_by_profile(student)
            .await
            .unwrap()
            .unwrap();
        assert!(subscription.is_paid);
        assert!(subscription.expires_at.is_some());
    }

    #[tokio::test]
    async fn test_consistent_state_is_untouched() {
        let payments = Arc::new(MemoryPaymentStore::new());
        let profiles = Arc::new(MemoryProfileStore::new());
        let subscriptions = Arc::new(MemorySubscriptionStore::new());

        let student = seed_student(&profiles).await;
        seed_approved_payment(&payments, student).await;
        subscriptions
            .upsert(
                student,
                PlanTier::Paid,
                true,
                Some(Utc::now() + Duration::days(30)),
            )
            .await
            .unwrap();
        profiles.update_plan(student, PlanTier::Paid).await.unwrap();

        let report = job(&payments, &profiles, &subscriptions).run().await.unwrap();
        assert_eq!(report.checked, 1);
        assert_eq!(report.subscriptions_repaired, 0);
        assert_eq!(report.plans_repaired, 0);
    }

    #[tokio::test]
    async fn test_manual_downgrade_after_approval_wins() {
        let payments = Arc::new(MemoryPaymentStore::new());
        let profiles = Arc::new(MemoryProfileStore::new());
        let subscriptions = Arc::new(MemorySubscriptionStore::new());

        let student = seed_student(&profiles).await;
        seed_approved_payment(&payments, student).await;

        // An admin downgraded the student after the approval; the newer
        // subscription write supersedes the payment.
        subscriptions
            .upsert(student, PlanTier::Free, false, None)
            .await
            .unwrap();

        let report = job(&payments, &profiles, &subscriptions).run().await.unwrap();
        assert_eq!(report.subscriptions_repaired, 0);
        assert_eq!(report.plans_repaired, 0);

        let profile = profiles.find_by_id(student).await.unwrap().unwrap();
        assert_eq!(profile.plan, PlanTier::Free);
    }
}
