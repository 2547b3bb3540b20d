use std::sync::Arc;

use crate::config::ServerConfig;
use crate::storage::MediaStorage;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// Cheaply cloneable: the pool and storage are handles, the config sits
/// behind an `Arc`.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: bookshelf_db::DbPool,
    /// Server configuration (JWT secret, limits).
    pub config: Arc<ServerConfig>,
    /// Local storage for uploaded media.
    pub storage: MediaStorage,
}
