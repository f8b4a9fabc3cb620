use std::sync::Arc;

use crate::config::ServerConfig;
use crate::storage::UploadStore;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// Cheaply cloneable: the pool is internally reference-counted and the rest
/// sits behind `Arc`.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: relieftrack_db::DbPool,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// On-disk document storage.
    pub uploads: Arc<UploadStore>,
}
