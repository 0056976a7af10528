//! Public landing summary.

use std::collections::HashMap;

use axum::extract::State;
use axum::Json;
use serde::Serialize;
use servdesk_core::access::{authorize, Operation, Resource};
use servdesk_core::application::RECENT_COMPLETED_LIMIT;
use servdesk_core::status::ApplicationStatus;
use servdesk_core::types::{DbId, Timestamp};

use crate::error::AppResult;
use crate::middleware::auth::MaybeAuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// What the landing page shows.
#[derive(Debug, Serialize)]
pub struct HomeSummary {
    /// Applications currently being worked on.
    pub in_progress_count: i64,
    /// The most recently completed applications, newest first.
    pub recent_completed: Vec<CompletedApplication>,
}

/// A completed application as shown publicly.
#[derive(Debug, Serialize)]
pub struct CompletedApplication {
    pub id: DbId,
    pub title: String,
    pub category: Option<String>,
    pub image: Option<String>,
    pub design_image: Option<String>,
    pub completed_at: Timestamp,
}

/// GET /
pub async fn home(
    State(state): State<AppState>,
    caller: MaybeAuthUser,
) -> AppResult<Json<DataResponse<HomeSummary>>> {
    let actor = caller.actor();

    let in_progress_count = state
        .store
        .count_applications_by_status(ApplicationStatus::InProgress)
        .await?;

    let completed = state
        .store
        .list_recent_applications_by_status(ApplicationStatus::Completed, RECENT_COMPLETED_LIMIT)
        .await?;

    let category_names: HashMap<DbId, String> = state
        .store
        .list_categories()
        .await?
        .into_iter()
        .map(|c| (c.id, c.name))
        .collect();

    let recent_completed = completed
        .into_iter()
        .filter(|app| {
            let resource = Resource::Application {
                owner_id: app.user_id,
                status: app.status,
            };
            authorize(&actor, Operation::Read, &resource).is_ok()
        })
        .map(|app| CompletedApplication {
            id: app.id,
            category: app
                .category_id
                .and_then(|id| category_names.get(&id).cloned()),
            title: app.title,
            image: app.image,
            design_image: app.design_image,
            completed_at: app.updated_at,
        })
        .collect();

    Ok(Json(DataResponse {
        data: HomeSummary {
            in_progress_count,
            recent_completed,
        },
    }))
}
