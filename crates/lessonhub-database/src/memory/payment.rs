//! In-memory payment submission store.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::Mutex;
use uuid::Uuid;

use lessonhub_core::error::AppError;
use lessonhub_core::result::AppResult;
use lessonhub_core::types::pagination::{PageRequest, PageResponse};
use lessonhub_entity::payment::{CreatePaymentSubmission, PaymentStatus, PaymentSubmission};

use crate::stores::PaymentStore;

use super::paginate;

/// In-memory payment store using a Tokio mutex for thread safety.
#[derive(Debug, Clone, Default)]
pub struct MemoryPaymentStore {
    /// Rows in insertion order.
    rows: Arc<Mutex<Vec<PaymentSubmission>>>,
}

impl MemoryPaymentStore {
    /// Create a new empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PaymentStore for MemoryPaymentStore {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<PaymentSubmission>> {
        let rows = self.rows.lock().await;
        Ok(rows.iter().find(|p| p.id == id).cloned())
    }

    async fn find_by_submitter(&self, submitter: Uuid) -> AppResult<Vec<PaymentSubmission>> {
        let rows = self.rows.lock().await;
        let mut matching: Vec<PaymentSubmission> = rows
            .iter()
            .filter(|p| p.submitted_by == submitter)
            .cloned()
            .collect();
        matching.reverse();
        Ok(matching)
    }

    async fn find_by_status(
        &self,
        status: PaymentStatus,
        page: &PageRequest,
    ) -> AppResult<PageResponse<PaymentSubmission>> {
        let rows = self.rows.lock().await;
        let mut matching: Vec<PaymentSubmission> =
            rows.iter().filter(|p| p.status == status).cloned().collect();
        matching.reverse();
        Ok(paginate(&matching, page))
    }

    async fn find_all(&self, page: &PageRequest) -> AppResult<PageResponse<PaymentSubmission>> {
        let rows = self.rows.lock().await;
        let mut newest_first: Vec<PaymentSubmission> = rows.clone();
        newest_first.reverse();
        Ok(paginate(&newest_first, page))
    }

    async fn find_approved(&self) -> AppResult<Vec<PaymentSubmission>> {
        let rows = self.rows.lock().await;
        Ok(rows
            .iter()
            .filter(|p| p.status == PaymentStatus::Approved)
            .cloned()
            .collect())
    }

    async fn create(&self, data: &CreatePaymentSubmission) -> AppResult<PaymentSubmission> {
        let payment = PaymentSubmission {
            id: Uuid::new_v4(),
            submitted_by: data.submitted_by,
            amount: data.amount,
            method: data.method,
            transaction_ref: data.transaction_ref.clone(),
            receipt_path: data.receipt_path.clone(),
            notes: data.notes.clone(),
            status: PaymentStatus::Pending,
            admin_feedback: None,
            created_at: Utc::now(),
            reviewed_at: None,
        };
        self.rows.lock().await.push(payment.clone());
        Ok(payment)
    }

    async fn set_decision(
        &self,
        id: Uuid,
        status: PaymentStatus,
        feedback: Option<&str>,
        reviewed_at: DateTime<Utc>,
    ) -> AppResult<PaymentSubmission> {
        let mut rows = self.rows.lock().await;
        let payment = rows
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or_else(|| AppError::not_found(format!("Payment submission {id} not found")))?;
        payment.status = status;
        payment.admin_feedback = feedback.map(String::from);
        payment.reviewed_at = Some(reviewed_at);
        Ok(payment.clone())
    }

    async fn resubmit(
        &self,
        id: Uuid,
        data: &CreatePaymentSubmission,
    ) -> AppResult<PaymentSubmission> {
        let mut rows = self.rows.lock().await;
        let payment = rows
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or_else(|| AppError::not_found(format!("Payment submission {id} not found")))?;
        payment.amount = data.amount;
        payment.method = data.method;
        payment.transaction_ref = data.transaction_ref.clone();
        payment.receipt_path = data.receipt_path.clone();
        payment.notes = data.notes.clone();
        payment.status = PaymentStatus::Pending;
        payment.admin_feedback = None;
        payment.reviewed_at = None;
        Ok(payment.clone())
    }

    async fn delete_by_submitter(&self, submitter: Uuid) -> AppResult<u64> {
        let mut rows = self.rows.lock().await;
        let before = rows.len();
        rows.retain(|p| p.submitted_by != submitter);
        Ok((before - rows.len()) as u64)
    }
}
