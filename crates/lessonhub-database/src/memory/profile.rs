//! In-memory profile store.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::Mutex;
use uuid::Uuid;

use lessonhub_core::error::AppError;
use lessonhub_core::result::AppResult;
use lessonhub_core::types::pagination::{PageRequest, PageResponse};
use lessonhub_entity::profile::{CreateProfile, PlanTier, Profile, Role, UpdateProfile};

use crate::stores::ProfileStore;

use super::paginate;

/// In-memory profile store using a Tokio mutex for thread safety.
#[derive(Debug, Clone, Default)]
pub struct MemoryProfileStore {
    /// Rows in insertion order.
    rows: Arc<Mutex<Vec<Profile>>>,
}

impl MemoryProfileStore {
    /// Create a new empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ProfileStore for MemoryProfileStore {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Profile>> {
        let rows = self.rows.lock().await;
        Ok(rows.iter().find(|p| p.id == id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<Profile>> {
        let rows = self.rows.lock().await;
        Ok(rows
            .iter()
            .find(|p| p.email.eq_ignore_ascii_case(email))
            .cloned())
    }

    async fn find_all(&self, page: &PageRequest) -> AppResult<PageResponse<Profile>> {
        let rows = self.rows.lock().await;
        let mut newest_first: Vec<Profile> = rows.clone();
        newest_first.reverse();
        Ok(paginate(&newest_first, page))
    }

    async fn find_by_role(
        &self,
        role: Role,
        page: &PageRequest,
    ) -> AppResult<PageResponse<Profile>> {
        let rows = self.rows.lock().await;
        let mut matching: Vec<Profile> = rows.iter().filter(|p| p.role == role).cloned().collect();
        matching.reverse();
        Ok(paginate(&matching, page))
    }

    async fn search(&self, query: &str, page: &PageRequest) -> AppResult<PageResponse<Profile>> {
        let needle = query.to_lowercase();
        let rows = self.rows.lock().await;
        let mut matching: Vec<Profile> = rows
            .iter()
            .filter(|p| {
                p.display_name.to_lowercase().contains(&needle)
                    || p.email.to_lowercase().contains(&needle)
            })
            .cloned()
            .collect();
        matching.sort_by(|a, b| a.display_name.cmp(&b.display_name));
        Ok(paginate(&matching, page))
    }

    async fn find_paid_students(&self) -> AppResult<Vec<Profile>> {
        let rows = self.rows.lock().await;
        Ok(rows
            .iter()
            .filter(|p| p.role == Role::Student && p.plan == PlanTier::Paid)
            .cloned()
            .collect())
    }

    async fn create(&self, data: &CreateProfile) -> AppResult<Profile> {
        let mut rows = self.rows.lock().await;
        if rows.iter().any(|p| p.id == data.id) {
            return Err(AppError::conflict(format!(
                "Profile {} already exists",
                data.id
            )));
        }
        if rows
            .iter()
            .any(|p| p.email.eq_ignore_ascii_case(&data.email))
        {
            return Err(AppError::conflict("Email already in use"));
        }
        let profile = Profile {
            id: data.id,
            display_name: data.display_name.clone(),
            email: data.email.clone(),
            role: data.role,
            grade: data.grade,
            plan: data.plan,
            active: true,
            created_at: Utc::now(),
        };
        rows.push(profile.clone());
        Ok(profile)
    }

    async fn update(&self, data: &UpdateProfile) -> AppResult<Profile> {
        let mut rows = self.rows.lock().await;
        let profile = rows
            .iter_mut()
            .find(|p| p.id == data.id)
            .ok_or_else(|| AppError::not_found(format!("Profile {} not found", data.id)))?;
        if let Some(display_name) = &data.display_name {
            profile.display_name = display_name.clone();
        }
        if let Some(grade) = data.grade {
            profile.grade = Some(grade);
        }
        Ok(profile.clone())
    }

    async fn update_role(&self, id: Uuid, role: Role) -> AppResult<Profile> {
        let mut rows = self.rows.lock().await;
        let profile = rows
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or_else(|| AppError::not_found(format!("Profile {id} not found")))?;
        profile.role = role;
        Ok(profile.clone())
    }

    async fn update_plan(&self, id: Uuid, plan: PlanTier) -> AppResult<Profile> {
        let mut rows = self.rows.lock().await;
        let profile = rows
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or_else(|| AppError::not_found(format!("Profile {id} not found")))?;
        profile.plan = plan;
        Ok(profile.clone())
    }

    async fn set_active(&self, id: Uuid, active: bool) -> AppResult<Profile> {
        let mut rows = self.rows.lock().await;
        let profile = rows
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or_else(|| AppError::not_found(format!("Profile {id} not found")))?;
        profile.active = active;
        Ok(profile.clone())
    }

    async fn delete(&self, id: Uuid) -> AppResult<bool> {
        let mut rows = self.rows.lock().await;
        let before = rows.len();
        rows.retain(|p| p.id != id);
        Ok(rows.len() < before)
    }
}
