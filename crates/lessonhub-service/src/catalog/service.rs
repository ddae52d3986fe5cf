//! Catalog service — student browsing and downloads.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use lessonhub_core::error::AppError;
use lessonhub_core::result::AppResult;
use lessonhub_core::traits::ObjectStore;
use lessonhub_database::ContentStore;
use lessonhub_entity::content::{ContentItem, ContentQuery, Grade, Section};

use crate::catalog::EntitlementResolver;
use crate::context::RequestContext;

/// A read-only catalog projection of an approved content item.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogEntry {
    /// Item identifier.
    pub id: Uuid,
    /// Document title.
    pub title: String,
    /// Section classification.
    pub section: Section,
    /// Grade level.
    pub grade: Grade,
    /// Resolved public download URL.
    pub download_url: String,
}

/// The bounded result of a catalog query.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogPage {
    /// The visible entries, in creation order.
    pub entries: Vec<CatalogEntry>,
    /// Total eligible items before the plan cap.
    pub eligible_total: u64,
    /// Whether the plan cap cut the result off (upgrade hint).
    pub capped: bool,
}

/// Serves the student catalog, bounded by plan entitlement.
#[derive(Debug, Clone)]
pub struct CatalogService {
    /// Content item store.
    content: Arc<dyn ContentStore>,
    /// Object storage for download URL resolution.
    objects: Arc<dyn ObjectStore>,
    /// Entitlement resolver.
    resolver: EntitlementResolver,
}

impl CatalogService {
    /// Creates a new catalog service.
    pub fn new(
        content: Arc<dyn ContentStore>,
        objects: Arc<dyn ObjectStore>,
        resolver: EntitlementResolver,
    ) -> Self {
        Self {
            content,
            objects,
            resolver,
        }
    }

    /// Run a catalog query for the acting student.
    ///
    /// Only approved items matching the filters are eligible; the plan
    /// tier bounds how many of them are returned. Non-student principals
    /// are denied outright.
    pub async fn browse(&self, ctx: &RequestContext, query: ContentQuery) -> AppResult<CatalogPage> {
        ctx.require_student()?;

        let eligible = self.content.find_approved(&query).await?;
        let eligible_total = eligible.len() as u64;

        let (bounded, capped) = self.resolver.apply(ctx.plan, query.section, eligible);
        let entries = bounded.into_iter().map(|item| self.project(item)).collect();

        Ok(CatalogPage {
            entries,
            eligible_total,
            capped,
        })
    }

    /// Resolve the download URL for a single approved item.
    pub async fn download_url(&self, ctx: &RequestContext, item_id: Uuid) -> AppResult<String> {
        ctx.require_student()?;

        let item = self
            .content
            .find_by_id(item_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Content item {item_id} not found")))?;

        if !item.is_visible_to_students() {
            return Err(AppError::not_found(format!(
                "Content item {item_id} not found"
            )));
        }

        Ok(self.objects.public_url(&item.download_path))
    }

    fn project(&self, item: ContentItem) -> CatalogEntry {
        CatalogEntry {
            id: item.id,
            title: item.title,
            section: item.section,
            grade: item.grade,
            download_url: self.objects.public_url(&item.download_path),
        }
    }
}
