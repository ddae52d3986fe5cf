//! Moderation service — drives the content item lifecycle.

use std::sync::Arc;

use bytes::Bytes;
use tracing::{info, warn};
use uuid::Uuid;

use lessonhub_core::error::AppError;
use lessonhub_core::result::AppResult;
use lessonhub_core::traits::ObjectStore;
use lessonhub_core::types::pagination::{PageRequest, PageResponse};
use lessonhub_database::ContentStore;
use lessonhub_entity::content::{
    ContentItem, CreateContentItem, Grade, ModerationStatus, Section, UpdateContentItem,
};

use crate::context::RequestContext;

/// A new PDF submission from an assistant or admin.
#[derive(Debug, Clone)]
pub struct NewSubmission {
    /// Document title.
    pub title: String,
    /// Target section.
    pub section: Section,
    /// Target grade level.
    pub grade: Grade,
    /// The PDF bytes to store.
    pub pdf: Bytes,
}

/// A resubmission of an item in the revision-request state.
#[derive(Debug, Clone, Default)]
pub struct ResubmitContent {
    /// Replacement title, if changed.
    pub title: Option<String>,
    /// Replacement section, if changed.
    pub section: Option<Section>,
    /// Replacement grade, if changed.
    pub grade: Option<Grade>,
    /// Replacement PDF bytes, if changed.
    pub pdf: Option<Bytes>,
}

/// Drives the content moderation state machine.
///
/// Assistant submissions start in `Pending`; admins move them to
/// `Approved`, `Declined`, or `Refine`; the original submitter may
/// resubmit from `Refine`, returning the item to `Pending` in place.
/// Admin-authored items bypass the machine and are created `Approved`.
#[derive(Debug, Clone)]
pub struct ModerationService {
    /// Content item store.
    content: Arc<dyn ContentStore>,
    /// Object storage for the PDFs.
    objects: Arc<dyn ObjectStore>,
}

impl ModerationService {
    /// Creates a new moderation service.
    pub fn new(content: Arc<dyn ContentStore>, objects: Arc<dyn ObjectStore>) -> Self {
        Self { content, objects }
    }

    /// Submit a new content item for review (assistant action).
    pub async fn submit(
        &self,
        ctx: &RequestContext,
        submission: NewSubmission,
    ) -> AppResult<ContentItem> {
        ctx.require_assistant()?;
        self.create_item(ctx, submission, ModerationStatus::Pending)
            .await
    }

    /// Create a content item directly in `Approved` (admin action).
    ///
    /// The item is attributed to the acting admin's principal id.
    pub async fn create_approved(
        &self,
        ctx: &RequestContext,
        submission: NewSubmission,
    ) -> AppResult<ContentItem> {
        ctx.require_admin()?;
        self.create_item(ctx, submission, ModerationStatus::Approved)
            .await
    }

    /// Publish a reviewable item (admin action).
    ///
    /// Re-approving an already approved item is a no-op.
    pub async fn approve(&self, ctx: &RequestContext, item_id: Uuid) -> AppResult<ContentItem> {
        ctx.require_admin()?;

        let item = self.load(item_id).await?;
        if item.status == ModerationStatus::Approved {
            return Ok(item);
        }
        self.check_review(&item, ModerationStatus::Approved)?;

        let updated = self
            .content
            .set_status(item_id, ModerationStatus::Approved, None)
            .await?;
        info!(item_id = %item_id, admin = %ctx.principal_id, "Content approved");
        Ok(updated)
    }

    /// Permanently reject a reviewable item (admin action).
    ///
    /// Declined items stay visible to the admin and to their original
    /// submitter for reference; students never see them.
    pub async fn decline(&self, ctx: &RequestContext, item_id: Uuid) -> AppResult<ContentItem> {
        ctx.require_admin()?;

        let item = self.load(item_id).await?;
        if item.status == ModerationStatus::Declined {
            return Ok(item);
        }
        self.check_review(&item, ModerationStatus::Declined)?;

        let updated = self
            .content
            .set_status(item_id, ModerationStatus::Declined, None)
            .await?;
        info!(item_id = %item_id, admin = %ctx.principal_id, "Content declined");
        Ok(updated)
    }

    /// Return an item to its submitter with feedback (admin action).
    ///
    /// The feedback text is required; an empty one is rejected before
    /// anything is persisted. Requesting refinement again replaces the
    /// previous feedback.
    pub async fn request_refinement(
        &self,
        ctx: &RequestContext,
        item_id: Uuid,
        feedback: &str,
    ) -> AppResult<ContentItem> {
        ctx.require_admin()?;

        let feedback = feedback.trim();
        if feedback.is_empty() {
            return Err(AppError::validation(
                "Refinement requests require feedback text",
            ));
        }

        let item = self.load(item_id).await?;
        self.check_review(&item, ModerationStatus::Refine)?;

        let updated = self
            .content
            .set_status(item_id, ModerationStatus::Refine, Some(feedback))
            .await?;
        info!(item_id = %item_id, admin = %ctx.principal_id, "Refinement requested");
        Ok(updated)
    }

    /// Resubmit an item in the revision-request state (submitter action).
    ///
    /// Mutates the existing record in place: applies any replacement
    /// fields, resets the status to `Pending`, and clears the feedback.
    pub async fn resubmit(
        &self,
        ctx: &RequestContext,
        item_id: Uuid,
        changes: ResubmitContent,
    ) -> AppResult<ContentItem> {
        let item = self.load(item_id).await?;

        if item.created_by != ctx.principal_id {
            return Err(AppError::authorization(
                "Only the original submitter may resubmit",
            ));
        }
        if !item.status.can_resubmit() {
            return Err(AppError::validation(format!(
                "Cannot resubmit an item in status '{}'",
                item.status
            )));
        }
        if let Some(title) = &changes.title {
            if title.trim().is_empty() {
                return Err(AppError::validation("Title cannot be empty"));
            }
        }

        let download_path = match &changes.pdf {
            Some(pdf) => {
                let grade = changes.grade.unwrap_or(item.grade);
                Some(self.store_pdf(grade, pdf.clone()).await?)
            }
            None => None,
        };

        self.content
            .update_metadata(&UpdateContentItem {
                id: item_id,
                title: changes.title,
                section: changes.section,
                grade: changes.grade,
                download_path,
            })
            .await?;

        let updated = self
            .content
            .set_status(item_id, ModerationStatus::Pending, None)
            .await?;
        info!(item_id = %item_id, submitter = %ctx.principal_id, "Content resubmitted");
        Ok(updated)
    }

    /// Edit an item's metadata (admin action).
    pub async fn update_metadata(
        &self,
        ctx: &RequestContext,
        data: UpdateContentItem,
    ) -> AppResult<ContentItem> {
        ctx.require_admin()?;

        if let Some(title) = &data.title {
            if title.trim().is_empty() {
                return Err(AppError::validation("Title cannot be empty"));
            }
        }

        self.content.update_metadata(&data).await
    }

    /// Delete an item and its stored PDF (admin action).
    pub async fn delete(&self, ctx: &RequestContext, item_id: Uuid) -> AppResult<bool> {
        ctx.require_admin()?;

        let item = self.load(item_id).await?;
        if let Err(e) = self.objects.delete(&item.download_path).await {
            // The row is authoritative; a stale object is not fatal.
            warn!(item_id = %item_id, error = %e, "Failed to delete stored PDF");
        }

        let deleted = self.content.delete(item_id).await?;
        info!(item_id = %item_id, admin = %ctx.principal_id, "Content deleted");
        Ok(deleted)
    }

    /// List the acting assistant's own submissions, every status included.
    pub async fn my_submissions(&self, ctx: &RequestContext) -> AppResult<Vec<ContentItem>> {
        ctx.require_assistant()?;
        self.content.find_by_creator(ctx.principal_id).await
    }

    /// List items awaiting review in the given status (admin action).
    pub async fn review_queue(
        &self,
        ctx: &RequestContext,
        status: ModerationStatus,
        page: &PageRequest,
    ) -> AppResult<PageResponse<ContentItem>> {
        ctx.require_admin()?;
        self.content.find_by_status(status, page).await
    }

    /// List every item (admin action).
    pub async fn list_all(
        &self,
        ctx: &RequestContext,
        page: &PageRequest,
    ) -> AppResult<PageResponse<ContentItem>> {
        ctx.require_admin()?;
        self.content.find_all(page).await
    }

    async fn create_item(
        &self,
        ctx: &RequestContext,
        submission: NewSubmission,
        status: ModerationStatus,
    ) -> AppResult<ContentItem> {
        if submission.title.trim().is_empty() {
            return Err(AppError::validation("Title cannot be empty"));
        }
        if submission.pdf.is_empty() {
            return Err(AppError::validation("PDF content cannot be empty"));
        }

        let download_path = self.store_pdf(submission.grade, submission.pdf).await?;

        let item = self
            .content
            .create(&CreateContentItem {
                title: submission.title,
                section: submission.section,
                grade: submission.grade,
                download_path,
                status,
                created_by: ctx.principal_id,
            })
            .await?;

        info!(
            item_id = %item.id,
            section = %item.section,
            grade = %item.grade,
            status = %item.status,
            "Content item created"
        );
        Ok(item)
    }

    async fn store_pdf(&self, grade: Grade, pdf: Bytes) -> AppResult<String> {
        let path = format!("content/grade-{grade}/{}.pdf", Uuid::new_v4());
        self.objects.put(&path, pdf).await
    }

    async fn load(&self, item_id: Uuid) -> AppResult<ContentItem> {
        self.content
            .find_by_id(item_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Content item {item_id} not found")))
    }

    fn check_review(&self, item: &ContentItem, target: ModerationStatus) -> AppResult<()> {
        if item.status.can_review_to(target) {
            Ok(())
        } else {
            Err(AppError::validation(format!(
                "Cannot move an item from '{}' to '{}'",
                item.status, target
            )))
        }
    }
}
