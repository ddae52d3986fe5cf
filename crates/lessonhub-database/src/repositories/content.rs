//! Content item repository implementation.

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use lessonhub_core::error::{AppError, ErrorKind};
use lessonhub_core::result::AppResult;
use lessonhub_core::types::pagination::{PageRequest, PageResponse};
use lessonhub_entity::content::{
    ContentItem, ContentQuery, CreateContentItem, ModerationStatus, SectionFilter,
    UpdateContentItem,
};

use crate::stores::ContentStore;

/// Repository for content item CRUD and query operations.
#[derive(Debug, Clone)]
pub struct ContentRepository {
    pool: PgPool,
}

impl ContentRepository {
    /// Create a new content repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ContentStore for ContentRepository {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<ContentItem>> {
        sqlx::query_as::<_, ContentItem>("SELECT * FROM content_items WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to find content item by id", e)
            })
    }

    async fn find_approved(&self, query: &ContentQuery) -> AppResult<Vec<ContentItem>> {
        // Creation-time ascending (id as tiebreak) keeps free-tier cap
        // truncation deterministic.
        let items = match (query.section, query.grade) {
            (SectionFilter::All, None) => {
                sqlx::query_as::<_, ContentItem>(
                    "SELECT * FROM content_items WHERE status = 'approved' \
                     ORDER BY created_at ASC, id ASC",
                )
                .fetch_all(&self.pool)
                .await
            }
            (SectionFilter::All, Some(grade)) => {
                sqlx::query_as::<_, ContentItem>(
                    "SELECT * FROM content_items WHERE status = 'approved' AND grade = $1 \
                     ORDER BY created_at ASC, id ASC",
                )
                .bind(grade)
                .fetch_all(&self.pool)
                .await
            }
            (SectionFilter::One(section), None) => {
                sqlx::query_as::<_, ContentItem>(
                    "SELECT * FROM content_items WHERE status = 'approved' AND section = $1 \
                     ORDER BY created_at ASC, id ASC",
                )
                .bind(section)
                .fetch_all(&self.pool)
                .await
            }
            (SectionFilter::One(section), Some(grade)) => {
                sqlx::query_as::<_, ContentItem>(
                    "SELECT * FROM content_items \
                     WHERE status = 'approved' AND section = $1 AND grade = $2 \
                     ORDER BY created_at ASC, id ASC",
                )
                .bind(section)
                .bind(grade)
                .fetch_all(&self.pool)
                .await
            }
        };

        items.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to list approved content", e)
        })
    }

    async fn count_approved(&self, query: &ContentQuery) -> AppResult<u64> {
        let count: i64 = match (query.section, query.grade) {
            (SectionFilter::All, None) => {
                sqlx::query_scalar("SELECT COUNT(*) FROM content_items WHERE status = 'approved'")
                    .fetch_one(&self.pool)
                    .await
            }
            (SectionFilter::All, Some(grade)) => {
                sqlx::query_scalar(
                    "SELECT COUNT(*) FROM content_items WHERE status = 'approved' AND grade = $1",
                )
                .bind(grade)
                .fetch_one(&self.pool)
                .await
            }
            (SectionFilter::One(section), None) => {
                sqlx::query_scalar(
                    "SELECT COUNT(*) FROM content_items WHERE status = 'approved' AND section = $1",
                )
                .bind(section)
                .fetch_one(&self.pool)
                .await
            }
            (SectionFilter::One(section), Some(grade)) => {
                sqlx::query_scalar(
                    "SELECT COUNT(*) FROM content_items \
                     WHERE status = 'approved' AND section = $1 AND grade = $2",
                )
                .bind(section)
                .bind(grade)
                .fetch_one(&self.pool)
                .await
            }
        }
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to count approved content", e)
        })?;

        Ok(count as u64)
    }

    async fn find_by_creator(&self, creator: Uuid) -> AppResult<Vec<ContentItem>> {
        sqlx::query_as::<_, ContentItem>(
            "SELECT * FROM content_items WHERE created_by = $1 ORDER BY created_at DESC",
        )
        .bind(creator)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to list content by creator", e)
        })
    }

    async fn find_by_status(
        &self,
        status: ModerationStatus,
        page: &PageRequest,
    ) -> AppResult<PageResponse<ContentItem>> {
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM content_items WHERE status = $1")
            .bind(status)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to count content by status", e)
            })?;

        let items = sqlx::query_as::<_, ContentItem>(
            "SELECT * FROM content_items WHERE status = $1 \
             ORDER BY created_at DESC LIMIT $2 OFFSET $3",
        )
        .bind(status)
        .bind(page.limit() as i64)
        .bind(page.offset() as i64)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to list content by status", e)
        })?;

        Ok(PageResponse::new(
            items,
            page.page,
            page.page_size,
            total as u64,
        ))
    }

    async fn find_all(&self, page: &PageRequest) -> AppResult<PageResponse<ContentItem>> {
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM content_items")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to count content items", e)
            })?;

        let items = sqlx::query_as::<_, ContentItem>(
            "SELECT * FROM content_items ORDER BY created_at DESC LIMIT $1 OFFSET $2",
        )
        .bind(page.limit() as i64)
        .bind(page.offset() as i64)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to list content items", e)
        })?;

        Ok(PageResponse::new(
            items,
            page.page,
            page.page_size,
            total as u64,
        ))
    }

    async fn create(&self, data: &CreateContentItem) -> AppResult<ContentItem> {
        sqlx::query_as::<_, ContentItem>(
            "INSERT INTO content_items (title, section, grade, download_path, status, created_by) \
             VALUES ($1, $2, $3, $4, $5, $6) \
             RETURNING *",
        )
        .bind(&data.title)
        .bind(data.section)
        .bind(data.grade)
        .bind(&data.download_path)
        .bind(data.status)
        .bind(data.created_by)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to create content item", e))
    }

    async fn update_metadata(&self, data: &UpdateContentItem) -> AppResult<ContentItem> {
        sqlx::query_as::<_, ContentItem>(
            "UPDATE content_items SET title = COALESCE($2, title), \
                                      section = COALESCE($3, section), \
                                      grade = COALESCE($4, grade), \
                                      download_path = COALESCE($5, download_path), \
                                      updated_at = NOW() \
             WHERE id = $1 RETURNING *",
        )
        .bind(data.id)
        .bind(&data.title)
        .bind(data.section)
        .bind(data.grade)
        .bind(&data.download_path)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to update content item", e)
        })?
        .ok_or_else(|| AppError::not_found(format!("Content item {} not found", data.id)))
    }

    async fn set_status(
        &self,
        id: Uuid,
        status: ModerationStatus,
        feedback: Option<&str>,
    ) -> AppResult<ContentItem> {
        sqlx::query_as::<_, ContentItem>(
            "UPDATE content_items SET status = $2, reviewer_feedback = $3, updated_at = NOW() \
             WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(status)
        .bind(feedback)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to set content status", e))?
        .ok_or_else(|| AppError::not_found(format!("Content item {id} not found")))
    }

    async fn delete(&self, id: Uuid) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM content_items WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to delete content item", e)
            })?;

        Ok(result.rows_affected() > 0)
    }

    async fn delete_by_creator(&self, creator: Uuid) -> AppResult<u64> {
        let result = sqlx::query("DELETE FROM content_items WHERE created_by = $1")
            .bind(creator)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to delete content by creator", e)
            })?;

        Ok(result.rows_affected())
    }
}
