//! Background worker configuration.

use serde::{Deserialize, Serialize};

/// Background maintenance worker configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkerConfig {
    /// Whether the worker is enabled.
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Cron expression for the plan/subscription reconciliation sweep.
    #[serde(default = "default_reconcile_schedule")]
    pub reconcile_schedule: String,
    /// Cron expression for the subscription expiry sweep.
    #[serde(default = "default_expiry_schedule")]
    pub expiry_schedule: String,
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            enabled: default_true(),
            reconcile_schedule: default_reconcile_schedule(),
            expiry_schedule: default_expiry_schedule(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_reconcile_schedule() -> String {
    // Every 15 minutes
    "0 */15 * * * *".to_string()
}

fn default_expiry_schedule() -> String {
    // Hourly
    "0 0 * * * *".to_string()
}
