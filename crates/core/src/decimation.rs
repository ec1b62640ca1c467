//! Keyframe decimation for long tracked sequences.
//!
//! Decimation is lossy: geometry of dropped keyframes is discarded and the
//! surviving keyframes are re-joined with linear segments. Sequence endpoints
//! are always retained.

use crate::error::CoreError;
use crate::sequence::{
    create_interpolation_segments, validate_sequence, BoundingBoxKeyframe, BoundingBoxSequence,
};

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Keyframe count above which decimation is recommended for smooth editing.
pub const TARGET_KEYFRAME_COUNT: usize = 40;

/// Largest stride ever recommended, regardless of sequence length.
pub const MAX_DECIMATION_FACTOR: usize = 20;

// ---------------------------------------------------------------------------
// Decimation
// ---------------------------------------------------------------------------

/// Keep every `keep_every_n`-th keyframe (by position) plus the last one.
///
/// Segments are rebuilt from the retained keyframes; visibility ranges and
/// `total_frames` are carried over unchanged. `keep_every_n == 1` keeps every
/// keyframe and segment as is. In every case `interpolated_frame_count` is
/// recomputed from the retained keyframes.
///
/// The input must satisfy [`validate_sequence`]; otherwise
/// [`CoreError::InvalidSequence`] is returned.
pub fn decimate(
    sequence: &BoundingBoxSequence,
    keep_every_n: usize,
) -> Result<BoundingBoxSequence, CoreError> {
    if keep_every_n == 0 {
        return Err(CoreError::Validation(
            "keep_every_n must be at least 1".to_string(),
        ));
    }
    validate_sequence(sequence)?;

    if keep_every_n == 1 {
        return Ok(BoundingBoxSequence {
            interpolated_frame_count: frames_between_keyframes(&sequence.boxes),
            ..sequence.clone()
        });
    }

    let last_index = sequence.boxes.len().saturating_sub(1);
    let boxes: Vec<BoundingBoxKeyframe> = sequence
        .boxes
        .iter()
        .enumerate()
        .filter(|(i, _)| i % keep_every_n == 0 || *i == last_index)
        .map(|(_, kf)| *kf)
        .collect();

    Ok(BoundingBoxSequence {
        interpolation_segments: create_interpolation_segments(&boxes),
        keyframe_count: boxes.len(),
        interpolated_frame_count: frames_between_keyframes(&boxes),
        boxes,
        visibility_ranges: sequence.visibility_ranges.clone(),
        track_id: sequence.track_id,
        tracking_source: sequence.tracking_source.clone(),
        tracking_confidence: sequence.tracking_confidence,
        total_frames: sequence.total_frames,
    })
}

/// Recommended stride for a sequence with `keyframe_count` keyframes.
///
/// - `<= TARGET_KEYFRAME_COUNT` — 1 (no decimation)
/// - otherwise `ceil(count / TARGET_KEYFRAME_COUNT)`, capped at
///   [`MAX_DECIMATION_FACTOR`]
pub fn calculate_optimal_decimation(keyframe_count: usize) -> usize {
    if keyframe_count <= TARGET_KEYFRAME_COUNT {
        return 1;
    }
    keyframe_count
        .div_ceil(TARGET_KEYFRAME_COUNT)
        .min(MAX_DECIMATION_FACTOR)
}

/// Decimate with the stride from [`calculate_optimal_decimation`].
pub fn decimate_optimal(sequence: &BoundingBoxSequence) -> Result<BoundingBoxSequence, CoreError> {
    decimate(sequence, calculate_optimal_decimation(sequence.boxes.len()))
}

/// Frames strictly between consecutive keyframes, i.e. frames whose box is
/// produced by interpolation. `boxes` must be strictly increasing.
fn frames_between_keyframes(boxes: &[BoundingBoxKeyframe]) -> usize {
    boxes
        .windows(2)
        .map(|pair| {
            pair[1]
                .frame_number
                .saturating_sub(pair[0].frame_number)
                .saturating_sub(1) as usize
        })
        .sum()
}
