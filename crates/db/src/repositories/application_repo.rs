//! Repository for the `applications` table.
//!
//! Status-changing writes are conditional on the status the caller last
//! observed (`WHERE status = $expected`), which is the only concurrency
//! control the workflow needs: a delete or transition that lost a race
//! matches no row and reports `None` / `false`.

use servdesk_core::status::ApplicationStatus;
use servdesk_core::types::DbId;
use sqlx::PgPool;

use crate::models::application::{Application, CreateApplication, StatusChange};

/// Column list for `applications` queries.
const COLUMNS: &str = "\
    id, title, description, category_id, user_id, image, status, \
    admin_comment, design_image, created_at, updated_at";

/// Provides CRUD and conditional status operations for applications.
pub struct ApplicationRepo;

impl ApplicationRepo {
    /// Insert a new application in status `new`.
    pub async fn create(
        pool: &PgPool,
        input: &CreateApplication,
    ) -> Result<Application, sqlx::Error> {
        let query = format!(
            "INSERT INTO applications (title, description, category_id, user_id, image, status)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Application>(&query)
            .bind(&input.title)
            .bind(&input.description)
            .bind(input.category_id)
            .bind(input.user_id)
            .bind(&input.image)
            .bind(ApplicationStatus::New.as_str())
            .fetch_one(pool)
            .await
    }

    /// Find an application by ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Application>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM applications WHERE id = $1");
        sqlx::query_as::<_, Application>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List a user's applications, newest first, optionally filtered by status.
    pub async fn list_by_user(
        pool: &PgPool,
        user_id: DbId,
        status: Option<ApplicationStatus>,
    ) -> Result<Vec<Application>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM applications
             WHERE user_id = $1 AND ($2::TEXT IS NULL OR status = $2)
             ORDER BY created_at DESC, id DESC"
        );
        sqlx::query_as::<_, Application>(&query)
            .bind(user_id)
            .bind(status.map(ApplicationStatus::as_str))
            .fetch_all(pool)
            .await
    }

    /// List every application, newest first.
    pub async fn list_all(pool: &PgPool) -> Result<Vec<Application>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM applications ORDER BY created_at DESC, id DESC");
        sqlx::query_as::<_, Application>(&query).fetch_all(pool).await
    }

    /// Count applications in the given status.
    pub async fn count_by_status(
        pool: &PgPool,
        status: ApplicationStatus,
    ) -> Result<i64, sqlx::Error> {
        let row: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM applications WHERE status = $1")
            .bind(status.as_str())
            .fetch_one(pool)
            .await?;
        Ok(row.0)
    }

    /// The most recently updated applications in the given status.
    pub async fn list_recent_by_status(
        pool: &PgPool,
        status: ApplicationStatus,
        limit: i64,
    ) -> Result<Vec<Application>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM applications
             WHERE status = $1
             ORDER BY updated_at DESC, id DESC
             LIMIT $2"
        );
        sqlx::query_as::<_, Application>(&query)
            .bind(status.as_str())
            .bind(limit)
            .fetch_all(pool)
            .await
    }

    /// Delete an application only if it is still in `expected` status.
    ///
    /// Returns `true` if a row was removed.
    pub async fn delete_if_status(
        pool: &PgPool,
        id: DbId,
        expected: ApplicationStatus,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM applications WHERE id = $1 AND status = $2")
            .bind(id)
            .bind(expected.as_str())
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Apply a status change only if the application is still in `expected`
    /// status. Returns the updated row, or `None` if nothing matched.
    pub async fn change_status_if(
        pool: &PgPool,
        id: DbId,
        expected: ApplicationStatus,
        change: &StatusChange,
    ) -> Result<Option<Application>, sqlx::Error> {
        let query = format!(
            "UPDATE applications SET
                status = $3,
                admin_comment = COALESCE($4, admin_comment),
                design_image = COALESCE($5, design_image),
                updated_at = NOW()
             WHERE id = $1 AND status = $2
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Application>(&query)
            .bind(id)
            .bind(expected.as_str())
            .bind(change.to.as_str())
            .bind(&change.admin_comment)
            .bind(&change.design_image)
            .fetch_optional(pool)
            .await
    }
}
