//! Plan tier enumeration.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Subscription plan tier gating how much content a student may access.
///
/// Plan tier is only meaningful for the student role; it is ignored for
/// assistants and admins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "plan_tier", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum PlanTier {
    /// Capped content access.
    Free,
    /// Unbounded content access within an active paid window.
    Paid,
}

impl PlanTier {
    /// Check if this is the paid tier.
    pub fn is_paid(&self) -> bool {
        matches!(self, Self::Paid)
    }

    /// Return the tier as a lowercase string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Free => "free",
            Self::Paid => "paid",
        }
    }
}

impl fmt::Display for PlanTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for PlanTier {
    type Err = lessonhub_core::AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "free" => Ok(Self::Free),
            "paid" => Ok(Self::Paid),
            _ => Err(lessonhub_core::AppError::validation(format!(
                "Invalid plan tier: '{s}'. Expected one of: free, paid"
            ))),
        }
    }
}
