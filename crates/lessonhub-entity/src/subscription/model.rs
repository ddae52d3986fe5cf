//! Subscription entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::profile::PlanTier;

/// The paid window for a principal; one row per principal, upserted
/// whenever a payment is approved or an admin manually changes the plan.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Subscription {
    /// The owning principal's ID.
    pub profile_id: Uuid,
    /// Plan tier of the subscription.
    pub plan: PlanTier,
    /// Whether the subscription has been paid for.
    pub is_paid: bool,
    /// End of the paid window; `None` means no active paid window.
    pub expires_at: Option<DateTime<Utc>>,
    /// When the record was last updated.
    pub updated_at: DateTime<Utc>,
}

impl Subscription {
    /// Check whether the paid window is active at the given instant.
    pub fn is_active(&self, now: DateTime<Utc>) -> bool {
        self.plan.is_paid()
            && self.is_paid
            && self.expires_at.is_some_and(|expiry| expiry > now)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn subscription(expires_at: Option<DateTime<Utc>>) -> Subscription {
        Subscription {
            profile_id: Uuid::new_v4(),
            plan: PlanTier::Paid,
            is_paid: true,
            expires_at,
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_active_window() {
        let now = Utc::now();
        assert!(subscription(Some(now + Duration::days(10))).is_active(now));
        assert!(!subscription(Some(now - Duration::days(1))).is_active(now));
        assert!(!subscription(None).is_active(now));
    }
}
