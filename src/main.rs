//! LessonHub maintenance daemon.
//!
//! Wires configuration, logging, the database, and the scheduled
//! maintenance sweeps together. The interactive client consumes the
//! service crates directly; this binary keeps the persistent state
//! consistent behind it.

use std::sync::Arc;

use tracing_subscriber::{EnvFilter, fmt};

use lessonhub_core::config::AppConfig;
use lessonhub_core::error::AppError;
use lessonhub_database::repositories::{
    PaymentRepository, ProfileRepository, SubscriptionRepository,
};
use lessonhub_database::{DatabasePool, PaymentStore, ProfileStore, SubscriptionStore};
use lessonhub_worker::{MaintenanceScheduler, PlanReconcileJob, SubscriptionExpiryJob};

#[tokio::main]
async fn main() {
    let env = std::env::var("LESSONHUB_ENV").unwrap_or_else(|_| "development".to_string());

    let config = match AppConfig::load(&env) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration: {e}");
            std::process::exit(1);
        }
    };

    init_logging(&config);

    if let Err(e) = run(config).await {
        tracing::error!("Daemon error: {e}");
        std::process::exit(1);
    }
}

/// Initialize tracing/logging
fn init_logging(config: &AppConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    match config.logging.format.as_str() {
        "json" => {
            fmt()
                .json()
                .with_env_filter(filter)
                .with_target(true)
                .init();
        }
        _ => {
            fmt()
                .pretty()
                .with_env_filter(filter)
                .with_target(true)
                .init();
        }
    }
}

/// Main daemon run function
async fn run(config: AppConfig) -> Result<(), AppError> {
    tracing::info!("Starting LessonHub daemon v{}", env!("CARGO_PKG_VERSION"));

    // ── Step 1: Database connection + migrations ─────────────────
    tracing::info!("Connecting to database...");
    let db_pool = DatabasePool::connect(&config.database).await?;

    tracing::info!("Running database migrations...");
    lessonhub_database::migration::run_migrations(db_pool.pool()).await?;

    // ── Step 2: Stores ───────────────────────────────────────────
    let profiles: Arc<dyn ProfileStore> =
        Arc::new(ProfileRepository::new(db_pool.pool().clone()));
    let payments: Arc<dyn PaymentStore> =
        Arc::new(PaymentRepository::new(db_pool.pool().clone()));
    let subscriptions: Arc<dyn SubscriptionStore> =
        Arc::new(SubscriptionRepository::new(db_pool.pool().clone()));

    // ── Step 3: Maintenance scheduler ────────────────────────────
    let mut scheduler = if config.worker.enabled {
        let reconcile = Arc::new(PlanReconcileJob::new(
            Arc::clone(&payments),
            Arc::clone(&profiles),
            Arc::clone(&subscriptions),
            config.plan.clone(),
        ));
        let expiry = Arc::new(SubscriptionExpiryJob::new(
            Arc::clone(&profiles),
            Arc::clone(&subscriptions),
        ));

        let scheduler = MaintenanceScheduler::new().await?;
        scheduler
            .register_default_tasks(&config.worker, reconcile, expiry)
            .await?;
        scheduler.start().await?;
        Some(scheduler)
    } else {
        tracing::info!("Maintenance worker disabled");
        None
    };

    // ── Step 4: Wait for shutdown ────────────────────────────────
    tracing::info!("LessonHub daemon running");
    shutdown_signal().await;
    tracing::info!("Shutdown signal received, stopping...");

    if let Some(scheduler) = scheduler.as_mut() {
        scheduler.shutdown().await?;
    }
    db_pool.close().await;

    tracing::info!("LessonHub daemon shut down gracefully");
    Ok(())
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM)
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
