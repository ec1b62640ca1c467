//! Handlers for tracking import.
//!
//! Converts the tracker output delivered by the model service into keyframe
//! sequences, optionally decimating long ones before they are returned for
//! persistence.

use annotrack_core::decimation::{self, calculate_optimal_decimation};
use annotrack_core::sequence::BoundingBoxSequence;
use annotrack_core::track_import;
use annotrack_core::tracking::{is_known_model, TrackingResult};
use axum::extract::State;
use axum::Json;
use serde::Deserialize;

use crate::error::{AppError, AppResult};
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// POST /tracking/import
// ---------------------------------------------------------------------------

/// API request body for importing one tracking run.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportTracksRequest {
    pub tracks: Vec<TrackingResult>,
    /// Length of the source video; when omitted each sequence ends at its
    /// last detection.
    #[serde(default)]
    pub total_frames: Option<u32>,
    /// Apply the recommended decimation to each converted sequence.
    #[serde(default)]
    pub decimate: bool,
}

/// Convert every track of a tracking run into a keyframe sequence.
pub async fn import_tracks(
    State(state): State<AppState>,
    Json(body): Json<ImportTracksRequest>,
) -> AppResult<Json<DataResponse<Vec<BoundingBoxSequence>>>> {
    let max = state.config.max_tracks_per_import;
    if body.tracks.len() > max {
        return Err(AppError::BadRequest(format!(
            "import has {} tracks, maximum is {max}",
            body.tracks.len()
        )));
    }

    for track in body.tracks.iter().filter(|t| !is_known_model(&t.model)) {
        tracing::warn!(
            track_id = track.track_id,
            model = %track.model,
            "Importing track from unrecognized tracking model"
        );
    }

    let mut sequences = track_import::convert_all(&body.tracks, body.total_frames)?;

    if body.decimate {
        sequences = sequences
            .iter()
            .map(|seq| -> AppResult<BoundingBoxSequence> {
                let factor = calculate_optimal_decimation(seq.keyframe_count);
                let decimated = decimation::decimate(seq, factor)?;
                if factor > 1 {
                    tracing::debug!(
                        track_id = seq.track_id,
                        factor,
                        before = seq.keyframe_count,
                        after = decimated.keyframe_count,
                        "Decimated imported sequence"
                    );
                }
                Ok(decimated)
            })
            .collect::<AppResult<Vec<_>>>()?;
    }

    let keyframe_count: usize = sequences.iter().map(|s| s.keyframe_count).sum();
    tracing::info!(
        track_count = sequences.len(),
        keyframe_count,
        total_frames = body.total_frames,
        decimated = body.decimate,
        "Tracking result imported"
    );

    Ok(Json(DataResponse { data: sequences }))
}
