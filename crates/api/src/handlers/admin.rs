//! Staff-only handlers: the full application list, status changes and the
//! employee flag.

use axum::extract::{Multipart, Path, State};
use axum::Json;
use serde::{Deserialize, Serialize};
use servdesk_core::access::{authorize, Operation, Resource};
use servdesk_core::error::CoreError;
use servdesk_core::status::ApplicationStatus;
use servdesk_core::types::DbId;
use servdesk_core::workflow::MUTABLE_STATUS;
use servdesk_db::models::application::Application;
use servdesk_db::models::user::UserResponse;

use crate::error::{AppError, AppResult};
use crate::forms::FormData;
use crate::middleware::rbac::RequireStaff;
use crate::response::DataResponse;
use crate::state::AppState;
use crate::workflow::{self, TransitionRequest};

/// An application together with the statuses it may still move to.
#[derive(Debug, Serialize)]
pub struct ChangeView {
    pub application: Application,
    pub available_statuses: Vec<ApplicationStatus>,
}

/// Request body for `POST /admin/users/{id}/employee`.
#[derive(Debug, Deserialize)]
pub struct SetEmployeeRequest {
    pub is_employee: bool,
}

/// GET /admin/applications
pub async fn list_applications(
    State(state): State<AppState>,
    RequireStaff(user): RequireStaff,
) -> AppResult<Json<DataResponse<Vec<Application>>>> {
    authorize(&user.actor(), Operation::ListAll, &Resource::Applications)?;
    let apps = state.store.list_all_applications().await?;
    Ok(Json(DataResponse { data: apps }))
}

/// GET /admin/application/{id}/change
pub async fn get_change(
    State(state): State<AppState>,
    RequireStaff(user): RequireStaff,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<ChangeView>>> {
    let application = workflow::read(&state, &user.actor(), id).await?;
    let available_statuses = if application.status == MUTABLE_STATUS {
        vec![ApplicationStatus::InProgress, ApplicationStatus::Completed]
    } else {
        Vec::new()
    };

    Ok(Json(DataResponse {
        data: ChangeView {
            application,
            available_statuses,
        },
    }))
}

/// POST /admin/application/{id}/change
///
/// Multipart fields: `status`, `admin_comment` (for `in_progress`),
/// `design_image` (file, for `completed`).
pub async fn post_change(
    State(state): State<AppState>,
    RequireStaff(user): RequireStaff,
    Path(id): Path<DbId>,
    multipart: Multipart,
) -> AppResult<Json<DataResponse<Application>>> {
    let mut form = FormData::from_multipart(multipart).await?;

    let target = ApplicationStatus::parse(form.required_text("status")?.trim())?;
    let request = TransitionRequest {
        target,
        admin_comment: form.text("admin_comment").map(str::to_string),
        design_image: form.take_file("design_image"),
    };

    let app = workflow::transition(&state, &user.actor(), id, request).await?;
    Ok(Json(DataResponse { data: app }))
}

/// POST /admin/users/{id}/employee
pub async fn set_employee(
    State(state): State<AppState>,
    RequireStaff(user): RequireStaff,
    Path(id): Path<DbId>,
    Json(input): Json<SetEmployeeRequest>,
) -> AppResult<Json<DataResponse<UserResponse>>> {
    authorize(&user.actor(), Operation::Update, &Resource::UserAccount)?;

    let account = state
        .store
        .set_employee(id, input.is_employee)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "User", id }))?;

    tracing::info!(
        user_id = id,
        is_employee = input.is_employee,
        staff_id = user.user_id,
        "Employee flag updated"
    );
    Ok(Json(DataResponse {
        data: UserResponse::from(&account),
    }))
}
