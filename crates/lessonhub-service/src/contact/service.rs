//! Contact service — validated public contact-form submissions.

use std::sync::Arc;

use tracing::info;
use validator::ValidateEmail;

use lessonhub_core::error::AppError;
use lessonhub_core::result::AppResult;
use lessonhub_core::types::pagination::{PageRequest, PageResponse};
use lessonhub_database::ContactStore;
use lessonhub_entity::contact::{ContactMessage, CreateContactMessage};

use crate::context::RequestContext;

/// Handles public contact-form submissions and the admin inbox.
#[derive(Debug, Clone)]
pub struct ContactService {
    /// Contact message store.
    contacts: Arc<dyn ContactStore>,
}

impl ContactService {
    /// Creates a new contact service.
    pub fn new(contacts: Arc<dyn ContactStore>) -> Self {
        Self { contacts }
    }

    /// Submit a contact message. Open to anonymous visitors; everything
    /// is validated before the insert.
    pub async fn submit(&self, message: CreateContactMessage) -> AppResult<ContactMessage> {
        if message.name.trim().is_empty() {
            return Err(AppError::validation("Name cannot be empty"));
        }
        if !message.email.validate_email() {
            return Err(AppError::validation("Invalid email format"));
        }
        if message.message.trim().is_empty() {
            return Err(AppError::validation("Message cannot be empty"));
        }

        let created = self.contacts.create(&message).await?;
        info!(message_id = %created.id, "Contact message received");
        Ok(created)
    }

    /// List received messages (admin action).
    pub async fn list(
        &self,
        ctx: &RequestContext,
        page: &PageRequest,
    ) -> AppResult<PageResponse<ContactMessage>> {
        ctx.require_admin()?;
        self.contacts.find_all(page).await
    }
}
