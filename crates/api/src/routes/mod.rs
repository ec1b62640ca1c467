pub mod health;
pub mod sequences;
pub mod tracking;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /tracking/import                 convert tracker output into sequences (POST)
///
/// /sequences/decimate              reduce keyframe density (POST)
/// /sequences/evaluate              boxes at arbitrary frames (POST)
/// /sequences/interpolation         assign a segment's easing (POST)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/tracking", tracking::router())
        .nest("/sequences", sequences::router())
}
