//! Route definitions for keyframe sequence operations.
//!
//! Sequences are supplied by the caller in each request body; nothing is
//! stored server-side.
//!
//! ```text
//! SEQUENCES (mounted at /sequences):
//! POST   /decimate                      decimate_sequence
//! POST   /evaluate                      evaluate_sequence
//! POST   /interpolation                 set_segment_interpolation
//! ```

use axum::routing::post;
use axum::Router;

use crate::handlers::sequences;
use crate::state::AppState;

/// Sequence routes -- mounted at `/sequences`.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/decimate", post(sequences::decimate_sequence))
        .route("/evaluate", post(sequences::evaluate_sequence))
        .route("/interpolation", post(sequences::set_segment_interpolation))
}
