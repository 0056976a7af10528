//! User (identity) and profile models.

use serde::{Deserialize, Serialize};
use servdesk_core::types::{DbId, Timestamp};
use sqlx::FromRow;

/// Full user row from the `users` table.
///
/// Contains the password hash -- NEVER serialize this to API responses directly.
/// Use [`UserResponse`] for external-facing output.
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: DbId,
    pub username: String,
    pub email: String,
    pub full_name: String,
    pub password_hash: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A row from the `user_profiles` table (1:1 with `users`).
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct UserProfile {
    pub user_id: DbId,
    pub is_employee: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A user together with its profile, as returned by account creation.
#[derive(Debug, Clone)]
pub struct UserWithProfile {
    pub user: User,
    pub profile: UserProfile,
}

/// Safe user representation for API responses (no password hash).
#[derive(Debug, Clone, Serialize)]
pub struct UserResponse {
    pub id: DbId,
    pub username: String,
    pub email: String,
    pub full_name: String,
    pub is_employee: bool,
    pub created_at: Timestamp,
}

impl From<&UserWithProfile> for UserResponse {
    fn from(account: &UserWithProfile) -> Self {
        Self {
            id: account.user.id,
            username: account.user.username.clone(),
            email: account.user.email.clone(),
            full_name: account.user.full_name.clone(),
            is_employee: account.profile.is_employee,
            created_at: account.user.created_at,
        }
    }
}

/// DTO for creating a new user and its profile.
#[derive(Debug, Deserialize)]
pub struct CreateUser {
    pub username: String,
    pub email: String,
    pub full_name: String,
    pub password_hash: String,
    #[serde(default)]
    pub is_employee: bool,
}
