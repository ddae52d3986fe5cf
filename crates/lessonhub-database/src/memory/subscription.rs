//! In-memory subscription store.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::Mutex;
use uuid::Uuid;

use lessonhub_core::result::AppResult;
use lessonhub_entity::profile::PlanTier;
use lessonhub_entity::subscription::Subscription;

use crate::stores::SubscriptionStore;

/// In-memory subscription store using a Tokio mutex for thread safety.
#[derive(Debug, Clone, Default)]
pub struct MemorySubscriptionStore {
    /// One row per principal.
    rows: Arc<Mutex<Vec<Subscription>>>,
}

impl MemorySubscriptionStore {
    /// Create a new empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SubscriptionStore for MemorySubscriptionStore {
    async fn find_by_profile(&self, profile_id: Uuid) -> AppResult<Option<Subscription>> {
        let rows = self.rows.lock().await;
        Ok(rows.iter().find(|s| s.profile_id == profile_id).cloned())
    }

    async fn upsert(
        &self,
        profile_id: Uuid,
        plan: PlanTier,
        is_paid: bool,
        expires_at: Option<DateTime<Utc>>,
    ) -> AppResult<Subscription> {
        let mut rows = self.rows.lock().await;
        if let Some(existing) = rows.iter_mut().find(|s| s.profile_id == profile_id) {
            existing.plan = plan;
            existing.is_paid = is_paid;
            existing.expires_at = expires_at;
            existing.updated_at = Utc::now();
            return Ok(existing.clone());
        }
        let subscription = Subscription {
            profile_id,
            plan,
            is_paid,
            expires_at,
            updated_at: Utc::now(),
        };
        rows.push(subscription.clone());
        Ok(subscription)
    }

    async fn find_expired(&self, now: DateTime<Utc>) -> AppResult<Vec<Subscription>> {
        let rows = self.rows.lock().await;
        Ok(rows
            .iter()
            .filter(|s| {
                s.plan == PlanTier::Paid && s.expires_at.is_some_and(|expiry| expiry <= now)
            })
            .cloned()
            .collect())
    }

    async fn delete_by_profile(&self, profile_id: Uuid) -> AppResult<bool> {
        let mut rows = self.rows.lock().await;
        let before = rows.len();
        rows.retain(|s| s.profile_id != profile_id);
        Ok(rows.len() < before)
    }
}
