//! In-memory contact message store.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::Mutex;
use uuid::Uuid;

use lessonhub_core::result::AppResult;
use lessonhub_core::types::pagination::{PageRequest, PageResponse};
use lessonhub_entity::contact::{ContactMessage, CreateContactMessage};

use crate::stores::ContactStore;

use super::paginate;

/// In-memory contact message store using a Tokio mutex for thread safety.
#[derive(Debug, Clone, Default)]
pub struct MemoryContactStore {
    /// Rows in insertion order.
    rows: Arc<Mutex<Vec<ContactMessage>>>,
}

impl MemoryContactStore {
    /// Create a new empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ContactStore for MemoryContactStore {
    async fn create(&self, data: &CreateContactMessage) -> AppResult<ContactMessage> {
        let message = ContactMessage {
            id: Uuid::new_v4(),
            name: data.name.clone(),
            email: data.email.clone(),
            message: data.message.clone(),
            created_at: Utc::now(),
        };
        self.rows.lock().await.push(message.clone());
        Ok(message)
    }

    async fn find_all(&self, page: &PageRequest) -> AppResult<PageResponse<ContactMessage>> {
        let rows = self.rows.lock().await;
        let mut newest_first: Vec<ContactMessage> = rows.clone();
        newest_first.reverse();
        Ok(paginate(&newest_first, page))
    }
}
