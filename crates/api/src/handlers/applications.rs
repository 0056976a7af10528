//! Handlers for a user's own applications.

use axum::extract::{Multipart, Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use servdesk_core::types::DbId;
use servdesk_db::models::application::Application;

use crate::error::AppResult;
use crate::forms::FormData;
use crate::middleware::auth::{AuthUser, MaybeAuthUser};
use crate::query::StatusFilter;
use crate::response::DataResponse;
use crate::state::AppState;
use crate::workflow::{self, Submission};

/// POST /application/create
///
/// Multipart fields: `title`, `description`, `category_id` (optional),
/// `image` (optional file).
pub async fn create(
    State(state): State<AppState>,
    user: AuthUser,
    multipart: Multipart,
) -> AppResult<(StatusCode, Json<DataResponse<Application>>)> {
    let mut form = FormData::from_multipart(multipart).await?;

    let submission = Submission {
        title: form.required_text("title")?.to_string(),
        description: form.required_text("description")?.to_string(),
        category_id: form.optional_id("category_id")?,
        image: form.take_file("image"),
    };

    let app = workflow::submit(&state, &user.actor(), submission).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: app })))
}

/// GET /applications?status=
///
/// The caller's own applications, newest first.
pub async fn list_mine(
    State(state): State<AppState>,
    user: AuthUser,
    Query(filter): Query<StatusFilter>,
) -> AppResult<Json<DataResponse<Vec<Application>>>> {
    let status = filter.parse()?;
    let apps = state
        .store
        .list_applications_by_user(user.user_id, status)
        .await?;
    Ok(Json(DataResponse { data: apps }))
}

/// GET /application/{id}
///
/// Public; the gate lets anyone read a completed application.
pub async fn get_by_id(
    State(state): State<AppState>,
    caller: MaybeAuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Application>>> {
    let app = workflow::read(&state, &caller.actor(), id).await?;
    Ok(Json(DataResponse { data: app }))
}

/// POST /application/{id}/delete
pub async fn delete(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    workflow::delete(&state, &user.actor(), id).await?;
    Ok(StatusCode::NO_CONTENT)
}
