//! Route definitions for categories.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::categories;
use crate::state::AppState;

/// ```text
/// GET  /categories                 -> list
/// POST /categories/create          -> create (staff)
/// POST /categories/{id}/update     -> update (staff)
/// POST /categories/{id}/delete     -> delete (staff)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/categories", get(categories::list))
        .route("/categories/create", post(categories::create))
        .route("/categories/{id}/update", post(categories::update))
        .route("/categories/{id}/delete", post(categories::delete))
}
