use std::sync::Arc;

use servdesk_db::Store;

use crate::config::ServerConfig;
use crate::media::MediaStore;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Entity store (PostgreSQL or in-memory).
    pub store: Store,
    /// Server configuration (JWT settings, limits).
    pub config: Arc<ServerConfig>,
    /// Where validated uploads are written.
    pub media: Arc<MediaStore>,
}
