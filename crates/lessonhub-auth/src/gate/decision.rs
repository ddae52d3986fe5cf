//! Three-valued access decision.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The outcome of an access check.
///
/// `Pending` is distinct from `Denied`: while the principal's profile is
/// still resolving, callers render a loading state instead of redirecting
/// to sign-in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccessDecision {
    /// The route is reachable.
    Allowed,
    /// The route is not reachable; redirect to the sign-in entry point.
    Denied,
    /// Resolution is still in flight; render a loading state.
    Pending,
}

impl AccessDecision {
    /// Check if access is granted.
    pub fn is_allowed(&self) -> bool {
        matches!(self, Self::Allowed)
    }

    /// Check if access is refused.
    pub fn is_denied(&self) -> bool {
        matches!(self, Self::Denied)
    }

    /// Check if resolution is still in flight.
    pub fn is_pending(&self) -> bool {
        matches!(self, Self::Pending)
    }
}

impl fmt::Display for AccessDecision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Allowed => "allowed",
            Self::Denied => "denied",
            Self::Pending => "pending",
        };
        write!(f, "{name}")
    }
}
