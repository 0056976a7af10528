//! Route definitions for a user's own applications.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::applications;
use crate::state::AppState;

/// ```text
/// POST /application/create         -> create
/// GET  /applications               -> list_mine
/// GET  /application/{id}           -> get_by_id
/// POST /application/{id}/delete    -> delete
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/application/create", post(applications::create))
        .route("/applications", get(applications::list_mine))
        .route("/application/{id}", get(applications::get_by_id))
        .route("/application/{id}/delete", post(applications::delete))
}
