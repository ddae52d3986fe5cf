//! Payment submission repository implementation.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use lessonhub_core::error::{AppError, ErrorKind};
use lessonhub_core::result::AppResult;
use lessonhub_core::types::pagination::{PageRequest, PageResponse};
use lessonhub_entity::payment::{CreatePaymentSubmission, PaymentStatus, PaymentSubmission};

use crate::stores::PaymentStore;

/// Repository for payment submission operations.
#[derive(Debug, Clone)]
pub struct PaymentRepository {
    pool: PgPool,
}

impl PaymentRepository {
    /// Create a new payment repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PaymentStore for PaymentRepository {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<PaymentSubmission>> {
        sqlx::query_as::<_, PaymentSubmission>("SELECT * FROM payment_submissions WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to find payment by id", e)
            })
    }

    async fn find_by_submitter(&self, submitter: Uuid) -> AppResult<Vec<PaymentSubmission>> {
        sqlx::query_as::<_, PaymentSubmission>(
            "SELECT * FROM payment_submissions WHERE submitted_by = $1 ORDER BY created_at DESC",
        )
        .bind(submitter)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to list payments by submitter", e)
        })
    }

    async fn find_by_status(
        &self,
        status: PaymentStatus,
        page: &PageRequest,
    ) -> AppResult<PageResponse<PaymentSubmission>> {
        let total: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM payment_submissions WHERE status = $1")
                .bind(status)
                .fetch_one(&self.pool)
                .await
                .map_err(|e| {
                    AppError::with_source(
                        ErrorKind::Database,
                        "Failed to count payments by status",
                        e,
                    )
                })?;

        let payments = sqlx::query_as::<_, PaymentSubmission>(
            "SELECT * FROM payment_submissions WHERE status = $1 \
             ORDER BY created_at DESC LIMIT $2 OFFSET $3",
        )
        .bind(status)
        .bind(page.limit() as i64)
        .bind(page.offset() as i64)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to list payments by status", e)
        })?;

        Ok(PageResponse::new(
            payments,
            page.page,
            page.page_size,
            total as u64,
        ))
    }

    async fn find_all(&self, page: &PageRequest) -> AppResult<PageResponse<PaymentSubmission>> {
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM payment_submissions")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to count payments", e)
            })?;

        let payments = sqlx::query_as::<_, PaymentSubmission>(
            "SELECT * FROM payment_submissions ORDER BY created_at DESC LIMIT $1 OFFSET $2",
        )
        .bind(page.limit() as i64)
        .bind(page.offset() as i64)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list payments", e))?;

        Ok(PageResponse::new(
            payments,
            page.page,
            page.page_size,
            total as u64,
        ))
    }

    async fn find_approved(&self) -> AppResult<Vec<PaymentSubmission>> {
        sqlx::query_as::<_, PaymentSubmission>(
            "SELECT * FROM payment_submissions WHERE status = 'approved' ORDER BY reviewed_at ASC",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to list approved payments", e)
        })
    }

    async fn create(&self, data: &CreatePaymentSubmission) -> AppResult<PaymentSubmission> {
        sqlx::query_as::<_, PaymentSubmission>(
            "INSERT INTO payment_submissions \
             (submitted_by, amount, method, transaction_ref, receipt_path, notes) \
             VALUES ($1, $2, $3, $4, $5, $6) \
             RETURNING *",
        )
        .bind(data.submitted_by)
        .bind(data.amount)
        .bind(data.method)
        .bind(&data.transaction_ref)
        .bind(&data.receipt_path)
        .bind(&data.notes)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to create payment", e))
    }

    async fn set_decision(
        &self,
        id: Uuid,
        status: PaymentStatus,
        feedback: Option<&str>,
        reviewed_at: DateTime<Utc>,
    ) -> AppResult<PaymentSubmission> {
        sqlx::query_as::<_, PaymentSubmission>(
            "UPDATE payment_submissions \
             SET status = $2, admin_feedback = $3, reviewed_at = $4 \
             WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(status)
        .bind(feedback)
        .bind(reviewed_at)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to record payment decision", e)
        })?
        .ok_or_else(|| AppError::not_found(format!("Payment submission {id} not found")))
    }

    async fn resubmit(
        &self,
        id: Uuid,
        data: &CreatePaymentSubmission,
    ) -> AppResult<PaymentSubmission> {
        sqlx::query_as::<_, PaymentSubmission>(
            "UPDATE payment_submissions \
             SET amount = $2, method = $3, transaction_ref = $4, receipt_path = $5, notes = $6, \
                 status = 'pending', admin_feedback = NULL, reviewed_at = NULL \
             WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(data.amount)
        .bind(data.method)
        .bind(&data.transaction_ref)
        .bind(&data.receipt_path)
        .bind(&data.notes)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to resubmit payment", e))?
        .ok_or_else(|| AppError::not_found(format!("Payment submission {id} not found")))
    }

    async fn delete_by_submitter(&self, submitter: Uuid) -> AppResult<u64> {
        let result = sqlx::query("DELETE FROM payment_submissions WHERE submitted_by = $1")
            .bind(submitter)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(
                    ErrorKind::Database,
                    "Failed to delete payments by submitter",
                    e,
                )
            })?;

        Ok(result.rows_affected())
    }
}
