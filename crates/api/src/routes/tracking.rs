//! Route definitions for tracking import.
//!
//! ```text
//! TRACKING (mounted at /tracking):
//! POST   /import                        import_tracks
//! ```

use axum::routing::post;
use axum::Router;

use crate::handlers::tracking;
use crate::state::AppState;

/// Tracking import routes -- mounted at `/tracking`.
pub fn router() -> Router<AppState> {
    Router::new().route("/import", post(tracking::import_tracks))
}
