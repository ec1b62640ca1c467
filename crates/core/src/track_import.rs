//! Conversion of raw tracker output into keyframe sequences.
//!
//! Every observed frame becomes a keyframe; nothing is dropped at import time.
//! Frame-number gaps in the track are preserved as invisible ranges.

use std::collections::HashSet;

use crate::error::CoreError;
use crate::sequence::{
    create_interpolation_segments, BoundingBoxKeyframe, BoundingBoxSequence, VisibilityRange,
};
use crate::tracking::{validate_tracking_result, TrackFrame, TrackingResult};

/// Convert one tracking result into a sequence covering `[0, last frame]`.
///
/// Frames before the first detection are marked invisible so the visibility
/// ranges partition the whole span.
pub fn convert(track: &TrackingResult) -> Result<BoundingBoxSequence, CoreError> {
    validate_tracking_result(track)?;
    let last = track.frames[track.frames.len() - 1].frame_number;
    let total_frames = last.checked_add(1).ok_or_else(|| {
        CoreError::Validation(format!("track {} frame number overflows", track.track_id))
    })?;
    Ok(build_sequence(track, total_frames))
}

/// Convert one tracking result for a video of known length.
///
/// `total_frames` must exceed the last tracked frame. Frames after the last
/// detection are marked invisible.
pub fn convert_with_total_frames(
    track: &TrackingResult,
    total_frames: u32,
) -> Result<BoundingBoxSequence, CoreError> {
    validate_tracking_result(track)?;
    let last = track.frames[track.frames.len() - 1].frame_number;
    if total_frames <= last {
        return Err(CoreError::Validation(format!(
            "track {} has a detection at frame {last} but the video has only {total_frames} frames",
            track.track_id
        )));
    }
    Ok(build_sequence(track, total_frames))
}

/// Convert every tracking result of one tracking run.
///
/// Fails on the first invalid track. Track ids must be unique within the run.
pub fn convert_all(
    tracks: &[TrackingResult],
    total_frames: Option<u32>,
) -> Result<Vec<BoundingBoxSequence>, CoreError> {
    let mut seen = HashSet::with_capacity(tracks.len());
    if let Some(dup) = tracks.iter().find(|t| !seen.insert(t.track_id)) {
        return Err(CoreError::Validation(format!(
            "duplicate track id {} in tracking run",
            dup.track_id
        )));
    }

    tracks
        .iter()
        .map(|track| match total_frames {
            Some(total) => convert_with_total_frames(track, total),
            None => convert(track),
        })
        .collect()
}

/// Assemble the sequence for a validated, non-empty track.
fn build_sequence(track: &TrackingResult, total_frames: u32) -> BoundingBoxSequence {
    let boxes: Vec<BoundingBoxKeyframe> = track
        .frames
        .iter()
        .map(|f| BoundingBoxKeyframe::new(f.frame_number, f.bbox))
        .collect();

    let mut visibility_ranges = Vec::with_capacity(track.frames.len() * 2 + 2);
    let first = boxes[0].frame_number;
    let last = boxes[boxes.len() - 1].frame_number;
    if first > 0 {
        visibility_ranges.push(VisibilityRange::new(0, first - 1, false));
    }
    visibility_ranges.extend(detect_visibility_ranges(&track.frames));
    if last + 1 < total_frames {
        visibility_ranges.push(VisibilityRange::new(last + 1, total_frames - 1, false));
    }

    BoundingBoxSequence {
        interpolation_segments: create_interpolation_segments(&boxes),
        keyframe_count: boxes.len(),
        boxes,
        visibility_ranges,
        track_id: track.track_id,
        tracking_source: track.model.clone(),
        tracking_confidence: track.confidence,
        total_frames,
        interpolated_frame_count: 0,
    }
}

/// Split a sorted frame list into alternating visible and invisible runs.
///
/// Consecutive frame numbers extend the current visible run. A jump of more
/// than one frame closes it and emits an invisible range over the missing
/// frames. The result starts at the first frame, not at frame 0.
pub fn detect_visibility_ranges(frames: &[TrackFrame]) -> Vec<VisibilityRange> {
    let Some(first) = frames.first() else {
        return Vec::new();
    };

    let mut ranges = Vec::new();
    let mut run_start = first.frame_number;
    let mut prev = first.frame_number;

    for frame in &frames[1..] {
        let current = frame.frame_number;
        if current > prev + 1 {
            ranges.push(VisibilityRange::new(run_start, prev, true));
            ranges.push(VisibilityRange::new(prev + 1, current - 1, false));
            run_start = current;
        }
        prev = current;
    }
    ranges.push(VisibilityRange::new(run_start, prev, true));

    ranges
}
