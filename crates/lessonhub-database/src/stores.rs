//! Store traits for the persistent tables.
//!
//! The service layer depends on these traits rather than on a concrete
//! backend. [`crate::repositories`] implements them on PostgreSQL;
//! [`crate::memory`] implements them in process for single-node
//! development and deterministic tests. The store is the single source of
//! truth; callers re-fetch after mutations rather than trusting held
//! copies.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use lessonhub_core::result::AppResult;
use lessonhub_core::types::pagination::{PageRequest, PageResponse};
use lessonhub_entity::contact::{ContactMessage, CreateContactMessage};
use lessonhub_entity::content::{
    ContentItem, ContentQuery, CreateContentItem, ModerationStatus, UpdateContentItem,
};
use lessonhub_entity::payment::{CreatePaymentSubmission, PaymentStatus, PaymentSubmission};
use lessonhub_entity::profile::{CreateProfile, PlanTier, Profile, Role, UpdateProfile};
use lessonhub_entity::subscription::Subscription;

/// Store for mirrored principal profiles.
#[async_trait]
pub trait ProfileStore: Send + Sync + std::fmt::Debug + 'static {
    /// Find a profile by principal ID.
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Profile>>;

    /// Find a profile by email (case-insensitive).
    async fn find_by_email(&self, email: &str) -> AppResult<Option<Profile>>;

    /// List all profiles with pagination, newest first.
    async fn find_all(&self, page: &PageRequest) -> AppResult<PageResponse<Profile>>;

    /// List profiles filtered by role.
    async fn find_by_role(
        &self,
        role: Role,
        page: &PageRequest,
    ) -> AppResult<PageResponse<Profile>>;

    /// Search profiles by display name or email.
    async fn search(&self, query: &str, page: &PageRequest) -> AppResult<PageResponse<Profile>>;

    /// List students currently on the paid tier (for the expiry sweep).
    async fn find_paid_students(&self) -> AppResult<Vec<Profile>>;

    /// Create a new profile.
    async fn create(&self, data: &CreateProfile) -> AppResult<Profile>;

    /// Update a profile's self-service fields.
    async fn update(&self, data: &UpdateProfile) -> AppResult<Profile>;

    /// Override a profile's role (admin action).
    async fn update_role(&self, id: Uuid, role: Role) -> AppResult<Profile>;

    /// Change a profile's plan tier.
    async fn update_plan(&self, id: Uuid, plan: PlanTier) -> AppResult<Profile>;

    /// Toggle the active flag (suspension).
    async fn set_active(&self, id: Uuid, active: bool) -> AppResult<Profile>;

    /// Delete a profile. Returns `true` if deleted.
    async fn delete(&self, id: Uuid) -> AppResult<bool>;
}

/// Store for content items.
#[async_trait]
pub trait ContentStore: Send + Sync + std::fmt::Debug + 'static {
    /// Find an item by primary key.
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<ContentItem>>;

    /// List approved items matching the query, ordered by creation time
    /// ascending then id, so downstream caps are deterministic.
    async fn find_approved(&self, query: &ContentQuery) -> AppResult<Vec<ContentItem>>;

    /// Count approved items matching the query.
    async fn count_approved(&self, query: &ContentQuery) -> AppResult<u64>;

    /// List every item created by the given principal, newest first.
    async fn find_by_creator(&self, creator: Uuid) -> AppResult<Vec<ContentItem>>;

    /// List items in the given moderation status (the admin review queue).
    async fn find_by_status(
        &self,
        status: ModerationStatus,
        page: &PageRequest,
    ) -> AppResult<PageResponse<ContentItem>>;

    /// List all items with pagination, newest first.
    async fn find_all(&self, page: &PageRequest) -> AppResult<PageResponse<ContentItem>>;

    /// Create a new item.
    async fn create(&self, data: &CreateContentItem) -> AppResult<ContentItem>;

    /// Update an item's metadata fields.
    async fn update_metadata(&self, data: &UpdateContentItem) -> AppResult<ContentItem>;

    /// Set an item's moderation status and reviewer feedback in one write.
    async fn set_status(
        &self,
        id: Uuid,
        status: ModerationStatus,
        feedback: Option<&str>,
    ) -> AppResult<ContentItem>;

    /// Delete an item. Returns `true` if deleted.
    async fn delete(&self, id: Uuid) -> AppResult<bool>;

    /// Delete every item created by the given principal (cascade).
    /// Returns the number of deleted items.
    async fn delete_by_creator(&self, creator: Uuid) -> AppResult<u64>;
}

/// Store for payment submissions.
#[async_trait]
pub trait PaymentStore: Send + Sync + std::fmt::Debug + 'static {
    /// Find a submission by primary key.
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<PaymentSubmission>>;

    /// List submissions by the given principal, newest first.
    async fn find_by_submitter(&self, submitter: Uuid) -> AppResult<Vec<PaymentSubmission>>;

    /// List submissions in the given status.
    async fn find_by_status(
        &self,
        status: PaymentStatus,
        page: &PageRequest,
    ) -> AppResult<PageResponse<PaymentSubmission>>;

    /// List all submissions with pagination, newest first.
    async fn find_all(&self, page: &PageRequest) -> AppResult<PageResponse<PaymentSubmission>>;

    /// List every approved submission (for the reconciliation sweep).
    async fn find_approved(&self) -> AppResult<Vec<PaymentSubmission>>;

    /// Create a new submission in `Pending` status.
    async fn create(&self, data: &CreatePaymentSubmission) -> AppResult<PaymentSubmission>;

    /// Record an admin decision: status, feedback, and review time in one
    /// write.
    async fn set_decision(
        &self,
        id: Uuid,
        status: PaymentStatus,
        feedback: Option<&str>,
        reviewed_at: DateTime<Utc>,
    ) -> AppResult<PaymentSubmission>;

    /// Overwrite the declared fields of a submission and reset it to
    /// `Pending`, clearing feedback and review time (resubmission).
    async fn resubmit(
        &self,
        id: Uuid,
        data: &CreatePaymentSubmission,
    ) -> AppResult<PaymentSubmission>;

    /// Delete every submission by the given principal (cascade).
    /// Returns the number of deleted submissions.
    async fn delete_by_submitter(&self, submitter: Uuid) -> AppResult<u64>;
}

/// Store for subscriptions.
#[async_trait]
pub trait SubscriptionStore: Send + Sync + std::fmt::Debug + 'static {
    /// Find the subscription for a principal.
    async fn find_by_profile(&self, profile_id: Uuid) -> AppResult<Option<Subscription>>;

    /// Insert or update the subscription row for a principal.
    async fn upsert(
        &self,
        profile_id: Uuid,
        plan: PlanTier,
        is_paid: bool,
        expires_at: Option<DateTime<Utc>>,
    ) -> AppResult<Subscription>;

    /// List paid subscriptions whose window has lapsed at the given
    /// instant (for the expiry sweep).
    async fn find_expired(&self, now: DateTime<Utc>) -> AppResult<Vec<Subscription>>;

    /// Delete the subscription for a principal (cascade). Returns `true`
    /// if a row was deleted.
    async fn delete_by_profile(&self, profile_id: Uuid) -> AppResult<bool>;
}

/// Store for contact messages.
#[async_trait]
pub trait ContactStore: Send + Sync + std::fmt::Debug + 'static {
    /// Create a new contact message.
    async fn create(&self, data: &CreateContactMessage) -> AppResult<ContactMessage>;

    /// List all messages with pagination, newest first.
    async fn find_all(&self, page: &PageRequest) -> AppResult<PageResponse<ContactMessage>>;
}
