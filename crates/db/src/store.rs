//! Storage backend abstraction.
//!
//! [`Store`] dispatches to either PostgreSQL (production) or the in-memory
//! backend (local development without `DATABASE_URL`, and tests). Both
//! honour the same contract, including conditional status writes and
//! unique-constraint names.

use std::sync::Arc;

use servdesk_core::status::ApplicationStatus;
use servdesk_core::types::DbId;

use crate::memory::InMemoryStore;
use crate::models::application::{Application, CreateApplication, StatusChange};
use crate::models::category::{Category, CreateCategory, UpdateCategory};
use crate::models::user::{CreateUser, User, UserProfile, UserWithProfile};
use crate::repositories::{ApplicationRepo, CategoryRepo, UserRepo};
use crate::DbPool;

/// PostgreSQL SQLSTATE for unique constraint violations.
const UNIQUE_VIOLATION: &str = "23505";

/// Errors surfaced by either backend.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// A unique constraint (named `uq_*`) was violated.
    #[error("Duplicate value violates unique constraint: {0}")]
    UniqueViolation(String),

    #[error("Database error: {0}")]
    Database(sqlx::Error),
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db_err) = &err {
            if db_err.code().as_deref() == Some(UNIQUE_VIOLATION) {
                if let Some(constraint) = db_err.constraint().filter(|c| c.starts_with("uq_")) {
                    return Self::UniqueViolation(constraint.to_string());
                }
            }
        }
        Self::Database(err)
    }
}

/// Storage backend that can be either PostgreSQL or in-memory.
#[derive(Clone)]
pub enum Store {
    Postgres(DbPool),
    InMemory(Arc<InMemoryStore>),
}

impl Store {
    pub fn in_memory() -> Self {
        Self::InMemory(Arc::new(InMemoryStore::new()))
    }

    /// Backend name for logs and the health endpoint.
    pub fn backend_name(&self) -> &'static str {
        match self {
            Self::Postgres(_) => "postgres",
            Self::InMemory(_) => "in-memory",
        }
    }

    /// Check that the backend is reachable.
    pub async fn health_check(&self) -> Result<(), StoreError> {
        match self {
            Self::Postgres(pool) => Ok(crate::health_check(pool).await?),
            Self::InMemory(_) => Ok(()),
        }
    }

    // ============================================
    // Users
    // ============================================

    /// Create an identity and its profile as one atomic step.
    pub async fn create_user_with_profile(
        &self,
        input: &CreateUser,
    ) -> Result<UserWithProfile, StoreError> {
        match self {
            Self::Postgres(pool) => Ok(UserRepo::create_with_profile(pool, input).await?),
            Self::InMemory(db) => db.create_user_with_profile(input).await,
        }
    }

    pub async fn find_user_by_id(&self, id: DbId) -> Result<Option<User>, StoreError> {
        match self {
            Self::Postgres(pool) => Ok(UserRepo::find_by_id(pool, id).await?),
            Self::InMemory(db) => db.find_user_by_id(id).await,
        }
    }

    pub async fn find_user_by_username(&self, username: &str) -> Result<Option<User>, StoreError> {
        match self {
            Self::Postgres(pool) => Ok(UserRepo::find_by_username(pool, username).await?),
            Self::InMemory(db) => db.find_user_by_username(username).await,
        }
    }

    pub async fn find_profile(&self, user_id: DbId) -> Result<Option<UserProfile>, StoreError> {
        match self {
            Self::Postgres(pool) => Ok(UserRepo::find_profile(pool, user_id).await?),
            Self::InMemory(db) => db.find_profile(user_id).await,
        }
    }

    /// Load a user together with its profile.
    ///
    /// A user without a profile row is treated as a non-employee.
    pub async fn find_account(&self, user_id: DbId) -> Result<Option<UserWithProfile>, StoreError> {
        let Some(user) = self.find_user_by_id(user_id).await? else {
            return Ok(None);
        };
        let profile = match self.find_profile(user_id).await? {
            Some(profile) => profile,
            None => UserProfile {
                user_id,
                is_employee: false,
                created_at: user.created_at,
                updated_at: user.updated_at,
            },
        };
        Ok(Some(UserWithProfile { user, profile }))
    }

    pub async fn set_employee(
        &self,
        user_id: DbId,
        is_employee: bool,
    ) -> Result<Option<UserWithProfile>, StoreError> {
        match self {
            Self::Postgres(pool) => Ok(UserRepo::set_employee(pool, user_id, is_employee).await?),
            Self::InMemory(db) => db.set_employee(user_id, is_employee).await,
        }
    }

    // ============================================
    // Categories
    // ============================================

    pub async fn create_category(&self, input: &CreateCategory) -> Result<Category, StoreError> {
        match self {
            Self::Postgres(pool) => Ok(CategoryRepo::create(pool, input).await?),
            Self::InMemory(db) => db.create_category(input).await,
        }
    }

    pub async fn find_category(&self, id: DbId) -> Result<Option<Category>, StoreError> {
        match self {
            Self::Postgres(pool) => Ok(CategoryRepo::find_by_id(pool, id).await?),
            Self::InMemory(db) => db.find_category(id).await,
        }
    }

    pub async fn list_categories(&self) -> Result<Vec<Category>, StoreError> {
        match self {
            Self::Postgres(pool) => Ok(CategoryRepo::list(pool).await?),
            Self::InMemory(db) => db.list_categories().await,
        }
    }

    pub async fn update_category(
        &self,
        id: DbId,
        input: &UpdateCategory,
    ) -> Result<Option<Category>, StoreError> {
        match self {
            Self::Postgres(pool) => Ok(CategoryRepo::update(pool, id, input).await?),
            Self::InMemory(db) => db.update_category(id, input).await,
        }
    }

    /// Delete a category and, by cascade, its applications.
    pub async fn delete_category(&self, id: DbId) -> Result<bool, StoreError> {
        match self {
            Self::Postgres(pool) => Ok(CategoryRepo::delete(pool, id).await?),
            Self::InMemory(db) => db.delete_category(id).await,
        }
    }

    // ============================================
    // Applications
    // ============================================

    pub async fn create_application(
        &self,
        input: &CreateApplication,
    ) -> Result<Application, StoreError> {
        match self {
            Self::Postgres(pool) => Ok(ApplicationRepo::create(pool, input).await?),
            Self::InMemory(db) => db.create_application(input).await,
        }
    }

    pub async fn find_application(&self, id: DbId) -> Result<Option<Application>, StoreError> {
        match self {
            Self::Postgres(pool) => Ok(ApplicationRepo::find_by_id(pool, id).await?),
            Self::InMemory(db) => db.find_application(id).await,
        }
    }

    pub async fn list_applications_by_user(
        &self,
        user_id: DbId,
        status: Option<ApplicationStatus>,
    ) -> Result<Vec<Application>, StoreError> {
        match self {
            Self::Postgres(pool) => Ok(ApplicationRepo::list_by_user(pool, user_id, status).await?),
            Self::InMemory(db) => db.list_applications_by_user(user_id, status).await,
        }
    }

    pub async fn list_all_applications(&self) -> Result<Vec<Application>, StoreError> {
        match self {
            Self::Postgres(pool) => Ok(ApplicationRepo::list_all(pool).await?),
            Self::InMemory(db) => db.list_all_applications().await,
        }
    }

    pub async fn count_applications_by_status(
        &self,
        status: ApplicationStatus,
    ) -> Result<i64, StoreError> {
        match self {
            Self::Postgres(pool) => Ok(ApplicationRepo::count_by_status(pool, status).await?),
            Self::InMemory(db) => db.count_applications_by_status(status).await,
        }
    }

    pub async fn list_recent_applications_by_status(
        &self,
        status: ApplicationStatus,
        limit: i64,
    ) -> Result<Vec<Application>, StoreError> {
        match self {
            Self::Postgres(pool) => {
                Ok(ApplicationRepo::list_recent_by_status(pool, status, limit).await?)
            }
            Self::InMemory(db) => db.list_recent_applications_by_status(status, limit).await,
        }
    }

    /// Delete only if the application is still in `expected` status.
    pub async fn delete_application_if_status(
        &self,
        id: DbId,
        expected: ApplicationStatus,
    ) -> Result<bool, StoreError> {
        match self {
            Self::Postgres(pool) => Ok(ApplicationRepo::delete_if_status(pool, id, expected).await?),
            Self::InMemory(db) => db.delete_application_if_status(id, expected).await,
        }
    }

    /// Apply `change` only if the application is still in `expected` status.
    pub async fn change_application_status_if(
        &self,
        id: DbId,
        expected: ApplicationStatus,
        change: &StatusChange,
    ) -> Result<Option<Application>, StoreError> {
        match self {
            Self::Postgres(pool) => {
                Ok(ApplicationRepo::change_status_if(pool, id, expected, change).await?)
            }
            Self::InMemory(db) => db.change_application_status_if(id, expected, change).await,
        }
    }
}
