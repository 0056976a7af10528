//! Route definitions for the staff-only `/admin` surface.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::admin;
use crate::state::AppState;

/// Routes mounted at `/admin`.
///
/// ```text
/// GET  /applications                -> list_applications
/// GET  /application/{id}/change     -> get_change
/// POST /application/{id}/change     -> post_change
/// POST /users/{id}/employee         -> set_employee
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/applications", get(admin::list_applications))
        .route(
            "/application/{id}/change",
            get(admin::get_change).post(admin::post_change),
        )
        .route("/users/{id}/employee", post(admin::set_employee))
}
