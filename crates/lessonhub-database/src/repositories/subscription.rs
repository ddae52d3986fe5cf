//! Subscription repository implementation.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use lessonhub_core::error::{AppError, ErrorKind};
use lessonhub_core::result::AppResult;
use lessonhub_entity::profile::PlanTier;
use lessonhub_entity::subscription::Subscription;

use crate::stores::SubscriptionStore;

/// Repository for subscription upserts and queries.
#[derive(Debug, Clone)]
pub struct SubscriptionRepository {
    pool: PgPool,
}

impl SubscriptionRepository {
    /// Create a new subscription repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SubscriptionStore for SubscriptionRepository {
    async fn find_by_profile(&self, profile_id: Uuid) -> AppResult<Option<Subscription>> {
        sqlx::query_as::<_, Subscription>("SELECT * FROM subscriptions WHERE profile_id = $1")
            .bind(profile_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to find subscription", e)
            })
    }

    async fn upsert(
        &self,
        profile_id: Uuid,
        plan: PlanTier,
        is_paid: bool,
        expires_at: Option<DateTime<Utc>>,
    ) -> AppResult<Subscription> {
        sqlx::query_as::<_, Subscription>(
            "INSERT INTO subscriptions (profile_id, plan, is_paid, expires_at, updated_at) \
             VALUES ($1, $2, $3, $4, NOW()) \
             ON CONFLICT (profile_id) DO UPDATE \
             SET plan = EXCLUDED.plan, is_paid = EXCLUDED.is_paid, \
                 expires_at = EXCLUDED.expires_at, updated_at = NOW() \
             RETURNING *",
        )
        .bind(profile_id)
        .bind(plan)
        .bind(is_paid)
        .bind(expires_at)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to upsert subscription", e))
    }

    async fn find_expired(&self, now: DateTime<Utc>) -> AppResult<Vec<Subscription>> {
        sqlx::query_as::<_, Subscription>(
            "SELECT * FROM subscriptions \
             WHERE plan = 'paid' AND expires_at IS NOT NULL AND expires_at <= $1",
        )
        .bind(now)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to list expired subscriptions", e)
        })
    }

    async fn delete_by_profile(&self, profile_id: Uuid) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM subscriptions WHERE profile_id = $1")
            .bind(profile_id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to delete subscription", e)
            })?;

        Ok(result.rows_affected() > 0)
    }
}
