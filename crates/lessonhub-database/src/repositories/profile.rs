//! Profile repository implementation.

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use lessonhub_core::error::{AppError, ErrorKind};
use lessonhub_core::result::AppResult;
use lessonhub_core::types::pagination::{PageRequest, PageResponse};
use lessonhub_entity::profile::{CreateProfile, PlanTier, Profile, Role, UpdateProfile};

use crate::stores::ProfileStore;

/// Repository for profile CRUD and query operations.
#[derive(Debug, Clone)]
pub struct ProfileRepository {
    pool: PgPool,
}

impl ProfileRepository {
    /// Create a new profile repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ProfileStore for ProfileRepository {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Profile>> {
        sqlx::query_as::<_, Profile>("SELECT * FROM profiles WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to find profile by id", e)
            })
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<Profile>> {
        sqlx::query_as::<_, Profile>("SELECT * FROM profiles WHERE LOWER(email) = LOWER($1)")
            .bind(email)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to find profile by email", e)
            })
    }

    async fn find_all(&self, page: &PageRequest) -> AppResult<PageResponse<Profile>> {
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM profiles")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to count profiles", e)
            })?;

        let profiles = sqlx::query_as::<_, Profile>(
            "SELECT * FROM profiles ORDER BY created_at DESC LIMIT $1 OFFSET $2",
        )
        .bind(page.limit() as i64)
        .bind(page.offset() as i64)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list profiles", e))?;

        Ok(PageResponse::new(
            profiles,
            page.page,
            page.page_size,
            total as u64,
        ))
    }

    async fn find_by_role(
        &self,
        role: Role,
        page: &PageRequest,
    ) -> AppResult<PageResponse<Profile>> {
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM profiles WHERE role = $1")
            .bind(role)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to count profiles by role", e)
            })?;

        let profiles = sqlx::query_as::<_, Profile>(
            "SELECT * FROM profiles WHERE role = $1 ORDER BY created_at DESC LIMIT $2 OFFSET $3",
        )
        .bind(role)
        .bind(page.limit() as i64)
        .bind(page.offset() as i64)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to list profiles by role", e)
        })?;

        Ok(PageResponse::new(
            profiles,
            page.page,
            page.page_size,
            total as u64,
        ))
    }

    async fn search(&self, query: &str, page: &PageRequest) -> AppResult<PageResponse<Profile>> {
        let pattern = format!("%{query}%");

        let total: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM profiles WHERE display_name ILIKE $1 OR email ILIKE $1",
        )
        .bind(&pattern)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to count search results", e)
        })?;

        let profiles = sqlx::query_as::<_, Profile>(
            "SELECT * FROM profiles WHERE display_name ILIKE $1 OR email ILIKE $1 \
             ORDER BY display_name ASC LIMIT $2 OFFSET $3",
        )
        .bind(&pattern)
        .bind(page.limit() as i64)
        .bind(page.offset() as i64)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to search profiles", e))?;

        Ok(PageResponse::new(
            profiles,
            page.page,
            page.page_size,
            total as u64,
        ))
    }

    async fn find_paid_students(&self) -> AppResult<Vec<Profile>> {
        sqlx::query_as::<_, Profile>(
            "SELECT * FROM profiles WHERE role = 'student' AND plan = 'paid'",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to list paid students", e)
        })
    }

    async fn create(&self, data: &CreateProfile) -> AppResult<Profile> {
        sqlx::query_as::<_, Profile>(
            "INSERT INTO profiles (id, display_name, email, role, grade, plan) \
             VALUES ($1, $2, $3, $4, $5, $6) \
             RETURNING *",
        )
        .bind(data.id)
        .bind(&data.display_name)
        .bind(&data.email)
        .bind(data.role)
        .bind(data.grade)
        .bind(data.plan)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(ref db_err) if db_err.constraint() == Some("profiles_pkey") => {
                AppError::conflict(format!("Profile {} already exists", data.id))
            }
            sqlx::Error::Database(ref db_err)
                if db_err.constraint() == Some("profiles_email_key") =>
            {
                AppError::conflict("Email already in use".to_string())
            }
            _ => AppError::with_source(ErrorKind::Database, "Failed to create profile", e),
        })
    }

    async fn update(&self, data: &UpdateProfile) -> AppResult<Profile> {
        sqlx::query_as::<_, Profile>(
            "UPDATE profiles SET display_name = COALESCE($2, display_name), \
                                 grade = COALESCE($3, grade) \
             WHERE id = $1 RETURNING *",
        )
        .bind(data.id)
        .bind(&data.display_name)
        .bind(data.grade)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to update profile", e))?
        .ok_or_else(|| AppError::not_found(format!("Profile {} not found", data.id)))
    }

    async fn update_role(&self, id: Uuid, role: Role) -> AppResult<Profile> {
        sqlx::query_as::<_, Profile>("UPDATE profiles SET role = $2 WHERE id = $1 RETURNING *")
            .bind(id)
            .bind(role)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to update role", e))?
            .ok_or_else(|| AppError::not_found(format!("Profile {id} not found")))
    }

    async fn update_plan(&self, id: Uuid, plan: PlanTier) -> AppResult<Profile> {
        sqlx::query_as::<_, Profile>("UPDATE profiles SET plan = $2 WHERE id = $1 RETURNING *")
            .bind(id)
            .bind(plan)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to update plan", e))?
            .ok_or_else(|| AppError::not_found(format!("Profile {id} not found")))
    }

    async fn set_active(&self, id: Uuid, active: bool) -> AppResult<Profile> {
        sqlx::query_as::<_, Profile>("UPDATE profiles SET active = $2 WHERE id = $1 RETURNING *")
            .bind(id)
            .bind(active)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to update active flag", e)
            })?
            .ok_or_else(|| AppError::not_found(format!("Profile {id} not found")))
    }

    async fn delete(&self, id: Uuid) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM profiles WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to delete profile", e)
            })?;

        Ok(result.rows_affected() > 0)
    }
}
