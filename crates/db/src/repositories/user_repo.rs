//! Repository for the `users` and `user_profiles` tables.

use servdesk_core::types::DbId;
use sqlx::PgPool;

use crate::models::user::{CreateUser, User, UserProfile, UserWithProfile};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, username, email, full_name, password_hash, created_at, updated_at";

/// Column list for `user_profiles` queries.
const PROFILE_COLUMNS: &str = "user_id, is_employee, created_at, updated_at";

/// Provides CRUD operations for users and their profiles.
pub struct UserRepo;

impl UserRepo {
    /// Insert a user and its profile in one transaction.
    ///
    /// The profile is written explicitly as the second step; if either insert
    /// fails nothing is persisted.
    pub async fn create_with_profile(
        pool: &PgPool,
        input: &CreateUser,
    ) -> Result<UserWithProfile, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!(
            "INSERT INTO users (username, email, full_name, password_hash)
             VALUES ($1, $2, $3, $4)
             RETURNING {COLUMNS}"
        );
        let user = sqlx::query_as::<_, User>(&query)
            .bind(&input.username)
            .bind(&input.email)
            .bind(&input.full_name)
            .bind(&input.password_hash)
            .fetch_one(&mut *tx)
            .await?;

        let query = format!(
            "INSERT INTO user_profiles (user_id, is_employee)
             VALUES ($1, $2)
             RETURNING {PROFILE_COLUMNS}"
        );
        let profile = sqlx::query_as::<_, UserProfile>(&query)
            .bind(user.id)
            .bind(input.is_employee)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(UserWithProfile { user, profile })
    }

    /// Find a user by internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<User>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE id = $1");
        sqlx::query_as::<_, User>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a user by username (case-sensitive).
    pub async fn find_by_username(
        pool: &PgPool,
        username: &str,
    ) -> Result<Option<User>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE username = $1");
        sqlx::query_as::<_, User>(&query)
            .bind(username)
            .fetch_optional(pool)
            .await
    }

    /// Find the profile belonging to a user.
    pub async fn find_profile(
        pool: &PgPool,
        user_id: DbId,
    ) -> Result<Option<UserProfile>, sqlx::Error> {
        let query = format!("SELECT {PROFILE_COLUMNS} FROM user_profiles WHERE user_id = $1");
        sqlx::query_as::<_, UserProfile>(&query)
            .bind(user_id)
            .fetch_optional(pool)
            .await
    }

    /// Set the employee flag, touching the identity and its profile together.
    ///
    /// Returns `None` if no user with `user_id` exists.
    pub async fn set_employee(
        pool: &PgPool,
        user_id: DbId,
        is_employee: bool,
    ) -> Result<Option<UserWithProfile>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!("UPDATE users SET updated_at = NOW() WHERE id = $1 RETURNING {COLUMNS}");
        let Some(user) = sqlx::query_as::<_, User>(&query)
            .bind(user_id)
            .fetch_optional(&mut *tx)
            .await?
        else {
            return Ok(None);
        };

        // Upsert so that an identity created outside this service still gets
        // its profile.
        let query = format!(
            "INSERT INTO user_profiles (user_id, is_employee)
             VALUES ($1, $2)
             ON CONFLICT (user_id) DO UPDATE
                SET is_employee = EXCLUDED.is_employee, updated_at = NOW()
             RETURNING {PROFILE_COLUMNS}"
        );
        let profile = sqlx::query_as::<_, UserProfile>(&query)
            .bind(user_id)
            .bind(is_employee)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(Some(UserWithProfile { user, profile }))
    }
}
