//! Application entity model and DTOs.

use serde::{Deserialize, Serialize};
use servdesk_core::status::ApplicationStatus;
use servdesk_core::types::{DbId, Timestamp};
use sqlx::FromRow;

/// A row from the `applications` table.
///
/// `status` is decoded through [`ApplicationStatus::try_from`], so a row
/// carrying an unknown literal fails to load instead of leaking through.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Application {
    pub id: DbId,
    pub title: String,
    pub description: String,
    pub category_id: Option<DbId>,
    /// The submitting user (owner).
    pub user_id: DbId,
    /// Stored path of the requester's photo, if any.
    pub image: Option<String>,
    #[sqlx(try_from = "String")]
    pub status: ApplicationStatus,
    pub admin_comment: Option<String>,
    pub design_image: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for inserting a new application. Status is always `new`.
#[derive(Debug, Deserialize)]
pub struct CreateApplication {
    pub title: String,
    pub description: String,
    pub category_id: Option<DbId>,
    pub user_id: DbId,
    pub image: Option<String>,
}

/// A status change to apply with a conditional write.
///
/// Only the side field relevant to `to` is set; `None` fields keep their
/// current value.
#[derive(Debug, Clone)]
pub struct StatusChange {
    pub to: ApplicationStatus,
    pub admin_comment: Option<String>,
    pub design_image: Option<String>,
}

