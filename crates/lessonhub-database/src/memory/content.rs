//! In-memory content store.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::Mutex;
use uuid::Uuid;

use lessonhub_core::error::AppError;
use lessonhub_core::result::AppResult;
use lessonhub_core::types::pagination::{PageRequest, PageResponse};
use lessonhub_entity::content::{
    ContentItem, ContentQuery, CreateContentItem, ModerationStatus, UpdateContentItem,
};

use crate::stores::ContentStore;

use super::paginate;

/// In-memory content store using a Tokio mutex for thread safety.
///
/// Rows stay in insertion order, which doubles as creation-time order;
/// `find_approved` returns them as-is so cap truncation is deterministic.
#[derive(Debug, Clone, Default)]
pub struct MemoryContentStore {
    /// Rows in insertion order.
    rows: Arc<Mutex<Vec<ContentItem>>>,
}

impl MemoryContentStore {
    /// Create a new empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot every row (test inspection helper).
    pub async fn all(&self) -> Vec<ContentItem> {
        self.rows.lock().await.clone()
    }
}

#[async_trait]
impl ContentStore for MemoryContentStore {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<ContentItem>> {
        let rows = self.rows.lock().await;
        Ok(rows.iter().find(|i| i.id == id).cloned())
    }

    async fn find_approved(&self, query: &ContentQuery) -> AppResult<Vec<ContentItem>> {
        let rows = self.rows.lock().await;
        Ok(rows
            .iter()
            .filter(|i| {
                i.status == ModerationStatus::Approved
                    && query.section.matches(i.section)
                    && query.grade.is_none_or(|g| i.grade == g)
            })
            .cloned()
            .collect())
    }

    async fn count_approved(&self, query: &ContentQuery) -> AppResult<u64> {
        Ok(self.find_approved(query).await?.len() as u64)
    }

    async fn find_by_creator(&self, creator: Uuid) -> AppResult<Vec<ContentItem>> {
        let rows = self.rows.lock().await;
        let mut matching: Vec<ContentItem> = rows
            .iter()
            .filter(|i| i.created_by == creator)
            .cloned()
            .collect();
        matching.reverse();
        Ok(matching)
    }

    async fn find_by_status(
        &self,
        status: ModerationStatus,
        page: &PageRequest,
    ) -> AppResult<PageResponse<ContentItem>> {
        let rows = self.rows.lock().await;
        let mut matching: Vec<ContentItem> =
            rows.iter().filter(|i| i.status == status).cloned().collect();
        matching.reverse();
        Ok(paginate(&matching, page))
    }

    async fn find_all(&self, page: &PageRequest) -> AppResult<PageResponse<ContentItem>> {
        let rows = self.rows.lock().await;
        let mut newest_first: Vec<ContentItem> = rows.clone();
        newest_first.reverse();
        Ok(paginate(&newest_first, page))
    }

    async fn create(&self, data: &CreateContentItem) -> AppResult<ContentItem> {
        let now = Utc::now();
        let item = ContentItem {
            id: Uuid::new_v4(),
            title: data.title.clone(),
            section: data.section,
            grade: data.grade,
            download_path: data.download_path.clone(),
            status: data.status,
            reviewer_feedback: None,
            created_by: data.created_by,
            created_at: now,
            updated_at: now,
        };
        self.rows.lock().await.push(item.clone());
        Ok(item)
    }

    async fn update_metadata(&self, data: &UpdateContentItem) -> AppResult<ContentItem> {
        let mut rows = self.rows.lock().await;
        let item = rows
            .iter_mut()
            .find(|i| i.id == data.id)
            .ok_or_else(|| AppError::not_found(format!("Content item {} not found", data.id)))?;
        if let Some(title) = &data.title {
            item.title = title.clone();
        }
        if let Some(section) = data.section {
            item.section = section;
        }
        if let Some(grade) = data.grade {
            item.grade = grade;
        }
        if let Some(download_path) = &data.download_path {
            item.download_path = download_path.clone();
        }
        item.updated_at = Utc::now();
        Ok(item.clone())
    }

    async fn set_status(
        &self,
        id: Uuid,
        status: ModerationStatus,
        feedback: Option<&str>,
    ) -> AppResult<ContentItem> {
        let mut rows = self.rows.lock().await;
        let item = rows
            .iter_mut()
            .find(|i| i.id == id)
            .ok_or_else(|| AppError::not_found(format!("Content item {id} not found")))?;
        item.status = status;
        item.reviewer_feedback = feedback.map(String::from);
        item.updated_at = Utc::now();
        Ok(item.clone())
    }

    async fn delete(&self, id: Uuid) -> AppResult<bool> {
        let mut rows = self.rows.lock().await;
        let before = rows.len();
        rows.retain(|i| i.id != id);
        Ok(rows.len() < before)
    }

    async fn delete_by_creator(&self, creator: Uuid) -> AppResult<u64> {
        let mut rows = self.rows.lock().await;
        let before = rows.len();
        rows.retain(|i| i.created_by != creator);
        Ok((before - rows.len()) as u64)
    }
}
