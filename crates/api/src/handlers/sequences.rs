//! Handlers for keyframe sequence operations.
//!
//! Every request carries the sequence as the persisted JSON blob. The blob is
//! parsed and checked against the sequence invariants before any operation
//! runs, so malformed input is reported as a validation error rather than
//! surfacing mid-evaluation.

use annotrack_core::decimation;
use annotrack_core::interpolation::{self, EvaluationMode, FrameSample};
use annotrack_core::sequence::{self, BoundingBoxSequence, InterpolationType};
use annotrack_core::types::FrameNumber;
use axum::extract::State;
use axum::Json;
use serde::Deserialize;

use crate::error::{AppError, AppResult};
use crate::response::DataResponse;
use crate::state::AppState;

/// Maximum number of frames evaluated by one request.
pub const MAX_FRAMES_PER_EVALUATION: usize = 100_000;

// ---------------------------------------------------------------------------
// POST /sequences/decimate
// ---------------------------------------------------------------------------

/// API request body for decimating a sequence.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DecimateRequest {
    pub sequence: serde_json::Value,
    /// Stride to keep; the recommended stride is used when omitted.
    #[serde(default)]
    pub keep_every_n: Option<usize>,
}

/// Reduce the keyframe density of a sequence.
pub async fn decimate_sequence(
    Json(body): Json<DecimateRequest>,
) -> AppResult<Json<DataResponse<BoundingBoxSequence>>> {
    let sequence = BoundingBoxSequence::from_json(body.sequence)?;
    let decimated = match body.keep_every_n {
        Some(n) => decimation::decimate(&sequence, n)?,
        None => decimation::decimate_optimal(&sequence)?,
    };

    tracing::info!(
        track_id = sequence.track_id,
        keep_every_n = ?body.keep_every_n,
        before = sequence.keyframe_count,
        after = decimated.keyframe_count,
        "Sequence decimated"
    );

    Ok(Json(DataResponse { data: decimated }))
}

// ---------------------------------------------------------------------------
// POST /sequences/evaluate
// ---------------------------------------------------------------------------

/// API request body for evaluating a sequence at a set of frames.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EvaluateRequest {
    pub sequence: serde_json::Value,
    pub frames: Vec<FrameNumber>,
    /// Override the server's default handling of unusable bezier control points.
    #[serde(default)]
    pub lenient: Option<bool>,
}

/// Compute the box (and visibility) at each requested frame.
pub async fn evaluate_sequence(
    State(state): State<AppState>,
    Json(body): Json<EvaluateRequest>,
) -> AppResult<Json<DataResponse<Vec<FrameSample>>>> {
    if body.frames.len() > MAX_FRAMES_PER_EVALUATION {
        return Err(AppError::BadRequest(format!(
            "requested {} frames, maximum is {MAX_FRAMES_PER_EVALUATION}",
            body.frames.len()
        )));
    }

    let sequence = BoundingBoxSequence::from_json(body.sequence)?;
    let mode = EvaluationMode::from_lenient(body.lenient.unwrap_or(state.config.lenient_bezier));

    let samples = interpolation::evaluate_frames(&sequence, &body.frames, mode)?;

    tracing::debug!(
        track_id = sequence.track_id,
        frame_count = samples.len(),
        lenient = mode == EvaluationMode::Lenient,
        "Sequence evaluated"
    );

    Ok(Json(DataResponse { data: samples }))
}

// ---------------------------------------------------------------------------
// POST /sequences/interpolation
// ---------------------------------------------------------------------------

/// API request body for assigning a segment's easing.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetInterpolationRequest {
    pub sequence: serde_json::Value,
    /// Start frame of the segment to change.
    pub start_frame: FrameNumber,
    pub interpolation: InterpolationType,
}

/// Change the interpolation type of one segment.
pub async fn set_segment_interpolation(
    Json(body): Json<SetInterpolationRequest>,
) -> AppResult<Json<DataResponse<BoundingBoxSequence>>> {
    let current = BoundingBoxSequence::from_json(body.sequence)?;
    let updated =
        sequence::with_segment_interpolation(&current, body.start_frame, body.interpolation)?;

    tracing::info!(
        track_id = current.track_id,
        start_frame = body.start_frame,
        interpolation = body.interpolation.as_str(),
        "Segment interpolation updated"
    );

    Ok(Json(DataResponse { data: updated }))
}
