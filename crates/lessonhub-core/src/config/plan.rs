//! Plan entitlement policy constants.

use serde::{Deserialize, Serialize};

/// Policy constants gating free-tier content access and the paid window.
///
/// The defaults are the product policy; configuration exists so a
/// deployment can tune them without a code change.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlanPolicy {
    /// Maximum items returned to a free-tier student for a single-section
    /// query.
    #[serde(default = "default_free_section_cap")]
    pub free_section_cap: usize,
    /// Maximum items returned to a free-tier student for an all-sections
    /// query (three sections x the per-section cap).
    #[serde(default = "default_free_all_cap")]
    pub free_all_cap: usize,
    /// Length of the paid window granted by an approved payment, in days.
    #[serde(default = "default_paid_window_days")]
    pub paid_window_days: i64,
}

impl Default for PlanPolicy {
    fn default() -> Self {
        Self {
            free_section_cap: default_free_section_cap(),
            free_all_cap: default_free_all_cap(),
            paid_window_days: default_paid_window_days(),
        }
    }
}

fn default_free_section_cap() -> usize {
    10
}

fn default_free_all_cap() -> usize {
    30
}

fn default_paid_window_days() -> i64 {
    30
}
