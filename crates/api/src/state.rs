use std::sync::Arc;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// The service keeps no per-request state; handlers only read configuration.
#[derive(Clone)]
pub struct AppState {
    /// Server configuration (evaluation defaults, import limits).
    pub config: Arc<ServerConfig>,
}
