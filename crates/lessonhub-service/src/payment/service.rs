//! Payment service — submissions, admin decisions, and the plan upgrade
//! side effect.

use std::sync::Arc;

use bytes::Bytes;
use chrono::{Duration, Utc};
use tracing::info;
use uuid::Uuid;

use lessonhub_core::config::plan::PlanPolicy;
use lessonhub_core::error::AppError;
use lessonhub_core::result::AppResult;
use lessonhub_core::traits::ObjectStore;
use lessonhub_core::types::pagination::{PageRequest, PageResponse};
use lessonhub_database::{PaymentStore, ProfileStore, SubscriptionStore};
use lessonhub_entity::payment::{CreatePaymentSubmission, PaymentMethod, PaymentStatus, PaymentSubmission};
use lessonhub_entity::profile::PlanTier;

use crate::context::RequestContext;

/// A new proof-of-payment submission.
#[derive(Debug, Clone)]
pub struct NewPayment {
    /// Declared amount in whole currency units.
    pub amount: i64,
    /// Declared payment method.
    pub method: PaymentMethod,
    /// Transaction reference, if any.
    pub transaction_ref: Option<String>,
    /// Free-text notes.
    pub notes: Option<String>,
    /// Receipt image bytes; required for methods that demand a receipt.
    pub receipt: Option<Bytes>,
}

/// Drives payment submissions and the admin decision workflow.
///
/// Approval carries a sequenced side effect: the payment decision is
/// recorded first, then the subscription window is upserted, then the
/// profile plan flips to paid. The subscription write precedes the plan
/// flip because it is idempotent and inspectable; the reconciliation
/// sweep heals a partial failure between the steps.
#[derive(Debug, Clone)]
pub struct PaymentService {
    /// Payment submission store.
    payments: Arc<dyn PaymentStore>,
    /// Profile store (plan flips).
    profiles: Arc<dyn ProfileStore>,
    /// Subscription store (window upserts).
    subscriptions: Arc<dyn SubscriptionStore>,
    /// Object storage for receipt images.
    objects: Arc<dyn ObjectStore>,
    /// Plan policy (paid window length).
    policy: PlanPolicy,
}

impl PaymentService {
    /// Creates a new payment service.
    pub fn new(
        payments: Arc<dyn PaymentStore>,
        profiles: Arc<dyn ProfileStore>,
        subscriptions: Arc<dyn SubscriptionStore>,
        objects: Arc<dyn ObjectStore>,
        policy: PlanPolicy,
    ) -> Self {
        Self {
            payments,
            profiles,
            subscriptions,
            objects,
            policy,
        }
    }

    /// Submit proof of payment (student action).
    pub async fn submit(
        &self,
        ctx: &RequestContext,
        payment: NewPayment,
    ) -> AppResult<PaymentSubmission> {
        ctx.require_student()?;

        let receipt_path = self.validate_and_store_receipt(ctx, &payment).await?;

        let created = self
            .payments
            .create(&CreatePaymentSubmission {
                submitted_by: ctx.principal_id,
                amount: payment.amount,
                method: payment.method,
                transaction_ref: payment.transaction_ref,
                receipt_path,
                notes: payment.notes,
            })
            .await?;

        info!(
            payment_id = %created.id,
            submitter = %ctx.principal_id,
            amount = created.amount,
            "Payment submitted"
        );
        Ok(created)
    }

    /// Approve a pending submission (admin action).
    ///
    /// Applies the plan upgrade side effect: the submitter's subscription
    /// expiry becomes the review time plus the paid window, and their
    /// plan tier becomes paid. Re-approving is a no-op.
    pub async fn approve(
        &self,
        ctx: &RequestContext,
        payment_id: Uuid,
    ) -> AppResult<PaymentSubmission> {
        ctx.require_admin()?;

        let payment = self.load(payment_id).await?;
        if payment.status == PaymentStatus::Approved {
            return Ok(payment);
        }
        self.check_reviewable(&payment)?;

        let now = Utc::now();
        let expires_at = now + Duration::days(self.policy.paid_window_days);

        // Sequenced, not parallel: decision, then subscription window,
        // then plan flip. The reconciliation sweep repairs any partial
        // failure between these writes.
        let decided = self
            .payments
            .set_decision(payment_id, PaymentStatus::Approved, None, now)
            .await?;

        self.subscriptions
            .upsert(payment.submitted_by, PlanTier::Paid, true, Some(expires_at))
            .await?;

        self.profiles
            .update_plan(payment.submitted_by, PlanTier::Paid)
            .await?;

        info!(
            payment_id = %payment_id,
            submitter = %payment.submitted_by,
            expires_at = %expires_at,
            "Payment approved; plan upgraded"
        );
        Ok(decided)
    }

    /// Reject a pending submission (admin action). Re-rejecting is a
    /// no-op.
    pub async fn reject(
        &self,
        ctx: &RequestContext,
        payment_id: Uuid,
    ) -> AppResult<PaymentSubmission> {
        ctx.require_admin()?;

        let payment = self.load(payment_id).await?;
        if payment.status == PaymentStatus::Rejected {
            return Ok(payment);
        }
        self.check_reviewable(&payment)?;

        let decided = self
            .payments
            .set_decision(payment_id, PaymentStatus::Rejected, None, Utc::now())
            .await?;
        info!(payment_id = %payment_id, admin = %ctx.principal_id, "Payment rejected");
        Ok(decided)
    }

    /// Return a pending submission to the student with feedback (admin
    /// action). The feedback text is required and validated before any
    /// write.
    pub async fn request_revision(
        &self,
        ctx: &RequestContext,
        payment_id: Uuid,
        feedback: &str,
    ) -> AppResult<PaymentSubmission> {
        ctx.require_admin()?;

        let feedback = feedback.trim();
        if feedback.is_empty() {
            return Err(AppError::validation(
                "Revision requests require feedback text",
            ));
        }

        let payment = self.load(payment_id).await?;
        self.check_reviewable(&payment)?;

        let decided = self
            .payments
            .set_decision(
                payment_id,
                PaymentStatus::NeedsRevision,
                Some(feedback),
                Utc::now(),
            )
            .await?;
        info!(payment_id = %payment_id, admin = %ctx.principal_id, "Payment revision requested");
        Ok(decided)
    }

    /// Resubmit a submission in the revision-request state (submitter
    /// action). Mutates the record in place and resets it to pending.
    pub async fn resubmit(
        &self,
        ctx: &RequestContext,
        payment_id: Uuid,
        payment: NewPayment,
    ) -> AppResult<PaymentSubmission> {
        ctx.require_student()?;

        let existing = self.load(payment_id).await?;
        if existing.submitted_by != ctx.principal_id {
            return Err(AppError::authorization(
                "Only the original submitter may resubmit",
            ));
        }
        if !existing.status.can_resubmit() {
            return Err(AppError::validation(format!(
                "Cannot resubmit a payment in status '{}'",
                existing.status
            )));
        }

        let receipt_path = match self.validate_and_store_receipt(ctx, &payment).await? {
            Some(path) => Some(path),
            // Keep the previously uploaded receipt when none is supplied.
            None => existing.receipt_path.clone(),
        };

        let updated = self
            .payments
            .resubmit(
                payment_id,
                &CreatePaymentSubmission {
                    submitted_by: ctx.principal_id,
                    amount: payment.amount,
                    method: payment.method,
                    transaction_ref: payment.transaction_ref,
                    receipt_path,
                    notes: payment.notes,
                },
            )
            .await?;

        info!(payment_id = %payment_id, submitter = %ctx.principal_id, "Payment resubmitted");
        Ok(updated)
    }

    /// List the acting student's own submissions.
    pub async fn my_submissions(&self, ctx: &RequestContext) -> AppResult<Vec<PaymentSubmission>> {
        ctx.require_student()?;
        self.payments.find_by_submitter(ctx.principal_id).await
    }

    /// List submissions in the given status (admin action).
    pub async fn review_queue(
        &self,
        ctx: &RequestContext,
        status: PaymentStatus,
        page: &PageRequest,
    ) -> AppResult<PageResponse<PaymentSubmission>> {
        ctx.require_admin()?;
        self.payments.find_by_status(status, page).await
    }

    /// List every submission (admin action).
    pub async fn list_all(
        &self,
        ctx: &RequestContext,
        page: &PageRequest,
    ) -> AppResult<PageResponse<PaymentSubmission>> {
        ctx.require_admin()?;
        self.payments.find_all(page).await
    }

    async fn validate_and_store_receipt(
        &self,
        ctx: &RequestContext,
        payment: &NewPayment,
    ) -> AppResult<Option<String>> {
        if payment.amount <= 0 {
            return Err(AppError::validation("Amount must be positive"));
        }
        if payment.method.requires_receipt() && payment.receipt.is_none() {
            return Err(AppError::validation(format!(
                "A receipt image is required for the '{}' payment method",
                payment.method
            )));
        }

        match &payment.receipt {
            Some(receipt) => {
                if receipt.is_empty() {
                    return Err(AppError::validation("Receipt image cannot be empty"));
                }
                let path = format!(
                    "receipts/{}/{}.png",
                    ctx.principal_id,
                    Uuid::new_v4()
                );
                Ok(Some(self.objects.put(&path, receipt.clone()).await?))
            }
            None => Ok(None),
        }
    }

    async fn load(&self, payment_id: Uuid) -> AppResult<PaymentSubmission> {
        self.payments
            .find_by_id(payment_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Payment submission {payment_id} not found")))
    }

    fn check_reviewable(&self, payment: &PaymentSubmission) -> AppResult<()> {
        if payment.status.is_reviewable() {
            Ok(())
        } else {
            Err(AppError::conflict(format!(
                "Payment submission has already been decided ('{}')",
                payment.status
            )))
        }
    }
}
