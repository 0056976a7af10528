pub mod admin;
pub mod application;
pub mod auth;
pub mod category;
pub mod health;

use axum::routing::get;
use axum::Router;

use crate::handlers;
use crate::state::AppState;

/// Build the application route tree (everything except `/health`).
///
/// Route hierarchy:
///
/// ```text
/// /                                        landing summary (public)
///
/// /register                                register (public)
/// /login                                   login (public)
/// /profile                                 caller's profile
///
/// /application/create                      submit (multipart)
/// /applications                            caller's applications (?status=)
/// /application/{id}                        read
/// /application/{id}/delete                 delete while new
///
/// /categories                              list (public)
/// /categories/create                       create (staff)
/// /categories/{id}/update                  update (staff)
/// /categories/{id}/delete                  delete, cascades (staff)
///
/// /admin/applications                      all applications (staff)
/// /admin/application/{id}/change           read, transition (staff)
/// /admin/users/{id}/employee               set employee flag (staff)
/// ```
pub fn app_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::home::home))
        .merge(auth::router())
        .merge(application::router())
        .merge(category::router())
        .nest("/admin", admin::router())
}
