//! # lessonhub-worker
//!
//! Scheduled maintenance for LessonHub. Two sweeps run on cron
//! schedules: plan/subscription reconciliation (heals partial failures
//! of the payment-approval side effect) and subscription expiry
//! (demotes lapsed paid plans back to free).

pub mod jobs;
pub mod scheduler;

pub use jobs::expiry::SubscriptionExpiryJob;
pub use jobs::reconcile::PlanReconcileJob;
pub use scheduler::MaintenanceScheduler;
