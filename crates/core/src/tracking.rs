//! Tracker output types and boundary validation.
//!
//! A [`TrackingResult`] is one object followed across a video by the external
//! model service. Results arrive JSON-deserialized and must pass
//! [`validate_tracking_result`] before any conversion runs.

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::error::CoreError;
use crate::types::{BoundingBox, FrameNumber};

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Tracker identifiers the model service is known to emit.
///
/// Other identifiers are accepted; this list only feeds [`is_known_model`].
pub const KNOWN_TRACKING_MODELS: &[&str] = &["samurai", "sam2", "bytetrack"];

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// One observed detection at a specific frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct TrackFrame {
    pub frame_number: FrameNumber,
    #[serde(rename = "box")]
    pub bbox: BoundingBox,
    #[validate(range(min = 0.0, max = 1.0))]
    pub confidence: f64,
    #[serde(default)]
    pub occluded: bool,
}

/// One tracked object across a video.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct TrackingResult {
    pub track_id: i64,
    #[serde(default)]
    pub label: String,
    #[validate(range(min = 0.0, max = 1.0))]
    pub confidence: f64,
    #[validate(length(min = 1))]
    pub model: String,
    #[validate(length(min = 1))]
    #[validate(nested)]
    pub frames: Vec<TrackFrame>,
}

/// Whether `model` is one of [`KNOWN_TRACKING_MODELS`].
pub fn is_known_model(model: &str) -> bool {
    KNOWN_TRACKING_MODELS.contains(&model)
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

/// Validate a tracking result before it reaches the importer.
///
/// Checks:
/// - field ranges (confidences in `[0, 1]`, non-empty model and frames)
/// - frame numbers strictly increasing (no duplicates)
/// - every box finite and non-negative
pub fn validate_tracking_result(track: &TrackingResult) -> Result<(), CoreError> {
    track.validate().map_err(|e| {
        CoreError::Validation(format!("track {} is invalid: {e}", track.track_id))
    })?;

    for pair in track.frames.windows(2) {
        if pair[1].frame_number <= pair[0].frame_number {
            return Err(CoreError::Validation(format!(
                "track {} frames must be strictly increasing, got {} after {}",
                track.track_id, pair[1].frame_number, pair[0].frame_number
            )));
        }
    }

    if let Some(bad) = track.frames.iter().find(|f| !f.bbox.is_well_formed()) {
        return Err(CoreError::Validation(format!(
            "track {} has a malformed box at frame {}",
            track.track_id, bad.frame_number
        )));
    }

    Ok(())
}
