//! Cron scheduler for the maintenance sweeps.

use std::sync::Arc;

use tokio_cron_scheduler::{Job as CronJob, JobScheduler};
use tracing::{error, info};

use lessonhub_core::config::worker::WorkerConfig;
use lessonhub_core::error::AppError;

use crate::jobs::expiry::SubscriptionExpiryJob;
use crate::jobs::reconcile::PlanReconcileJob;

/// Cron-based scheduler for the periodic maintenance sweeps.
pub struct MaintenanceScheduler {
    /// The underlying job scheduler.
    scheduler: JobScheduler,
}

impl std::fmt::Debug for MaintenanceScheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MaintenanceScheduler").finish()
    }
}

impl MaintenanceScheduler {
    /// Create a new scheduler.
    pub async fn new() -> Result<Self, AppError> {
        let scheduler = JobScheduler::new()
            .await
            .map_err(|e| AppError::internal(format!("Failed to create scheduler: {e}")))?;
        Ok(Self { scheduler })
    }

    /// Register both sweeps on their configured schedules.
    pub async fn register_default_tasks(
        &self,
        config: &WorkerConfig,
        reconcile: Arc<PlanReconcileJob>,
        expiry: Arc<SubscriptionExpiryJob>,
    ) -> Result<(), AppError> {
        self.register_reconcile(&config.reconcile_schedule, reconcile)
            .await?;
        self.register_expiry(&config.expiry_schedule, expiry).await?;
        info!("All scheduled tasks registered");
        Ok(())
    }

    /// Start the scheduler.
    pub async fn start(&self) -> Result<(), AppError> {
        self.scheduler
            .start()
            .await
            .map_err(|e| AppError::internal(format!("Failed to start scheduler: {e}")))?;
        info!("Maintenance scheduler started");
        Ok(())
    }

    /// Shut down the scheduler.
    pub async fn shutdown(&mut self) -> Result<(), AppError> {
        self.scheduler
            .shutdown()
            .await
            .map_err(|e| AppError::internal(format!("Failed to shutdown scheduler: {e}")))?;
        info!("Maintenance scheduler shut down");
        Ok(())
    }

    async fn register_reconcile(
        &self,
        schedule: &str,
        job: Arc<PlanReconcileJob>,
    ) -> Result<(), AppError> {
        let cron_job = CronJob::new_async(schedule, move |_uuid, _lock| {
            let job = Arc::clone(&job);
            Box::pin(async move {
                if let Err(e) = job.run().await {
                    error!(error = %e, "Plan reconciliation sweep failed");
                }
            })
        })
        .map_err(|e| AppError::internal(format!("Invalid reconcile schedule: {e}")))?;

        self.scheduler
            .add(cron_job)
            .await
            .map_err(|e| AppError::internal(format!("Failed to register reconcile job: {e}")))?;
        Ok(())
    }

    async fn register_expiry(
        &self,
        schedule: &str,
        job: Arc<SubscriptionExpiryJob>,
    ) -> Result<(), AppError> {
        let cron_job = CronJob::new_async(schedule, move |_uuid, _lock| {
            let job = Arc::clone(&job);
            Box::pin(async move {
                if let Err(e) = job.run().await {
                    error!(error = %e, "Subscription expiry sweep failed");
                }
            })
        })
        .map_err(|e| AppError::internal(format!("Invalid expiry schedule: {e}")))?;

        self.scheduler
            .add(cron_job)
            .await
            .map_err(|e| AppError::internal(format!("Failed to register expiry job: {e}")))?;
        Ok(())
    }
}
