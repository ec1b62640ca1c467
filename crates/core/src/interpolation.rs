//! Box evaluation at arbitrary frames.
//!
//! Keyframes are returned verbatim. Frames between keyframes are eased across
//! the bracketing segment; frames outside the keyframe span clamp to the
//! nearest end. Interpolation is never materialized into storage: callers
//! evaluate on demand during playback and rendering.

use serde::Serialize;

use crate::easing::{self, BezierControlPoints};
use crate::error::CoreError;
use crate::sequence::{BoundingBoxSequence, InterpolationSegment, InterpolationType};
use crate::types::{lerp, BoundingBox, FrameNumber};

/// How bezier segments with missing or malformed control points are handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EvaluationMode {
    /// Fail with [`CoreError::MissingControlPoints`].
    #[default]
    Strict,
    /// Ease such segments linearly.
    Lenient,
}

impl EvaluationMode {
    pub fn from_lenient(lenient: bool) -> Self {
        if lenient {
            Self::Lenient
        } else {
            Self::Strict
        }
    }
}

/// One evaluated frame, as consumed by timeline rendering.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FrameSample {
    pub frame_number: FrameNumber,
    #[serde(rename = "box")]
    pub bbox: BoundingBox,
    pub visible: bool,
    pub is_keyframe: bool,
}

/// Evaluate the box at `frame` in strict mode.
pub fn evaluate(sequence: &BoundingBoxSequence, frame: FrameNumber) -> Result<BoundingBox, CoreError> {
    evaluate_with(sequence, frame, EvaluationMode::Strict)
}

/// Evaluate the box at `frame`.
///
/// # Errors
///
/// - [`CoreError::InvalidSequence`] if the sequence has no keyframes or a
///   segment endpoint is not a keyframe.
/// - [`CoreError::FrameOutOfRange`] if `frame` lies inside the keyframe span
///   but no segment covers it.
/// - [`CoreError::MissingControlPoints`] in strict mode for a bezier segment
///   without usable control points.
pub fn evaluate_with(
    sequence: &BoundingBoxSequence,
    frame: FrameNumber,
    mode: EvaluationMode,
) -> Result<BoundingBox, CoreError> {
    let (Some(first), Some(last)) = (sequence.boxes.first(), sequence.boxes.last()) else {
        return Err(CoreError::InvalidSequence(
            "sequence has no keyframes".to_string(),
        ));
    };

    if frame <= first.frame_number {
        return Ok(first.geometry());
    }
    if frame >= last.frame_number {
        return Ok(last.geometry());
    }
    if let Some(kf) = sequence.keyframe_at(frame) {
        return Ok(kf.geometry());
    }

    let segment = find_segment(&sequence.interpolation_segments, frame)
        .ok_or(CoreError::FrameOutOfRange { frame })?;

    let endpoints = sequence
        .keyframe_at(segment.start_frame)
        .zip(sequence.keyframe_at(segment.end_frame));
    let Some((start, end)) = endpoints else {
        return Err(CoreError::InvalidSequence(format!(
            "segment {}..{} does not start and end on keyframes",
            segment.start_frame, segment.end_frame
        )));
    };
    if segment.end_frame <= segment.start_frame {
        return Err(CoreError::InvalidSequence(format!(
            "segment {}..{} is empty",
            segment.start_frame, segment.end_frame
        )));
    }

    let t = f64::from(frame - segment.start_frame)
        / f64::from(segment.end_frame - segment.start_frame);
    let (a, b) = (start.geometry(), end.geometry());

    let eased = match segment.interpolation {
        InterpolationType::Linear => uniform(easing::linear(t)),
        InterpolationType::EaseIn => uniform(easing::ease_in(t)),
        InterpolationType::EaseOut => uniform(easing::ease_out(t)),
        InterpolationType::EaseInOut => uniform(easing::ease_in_out(t)),
        InterpolationType::Hold => uniform(easing::hold(t)),
        InterpolationType::Bezier { control_points } => {
            match control_points.filter(BezierControlPoints::is_well_formed) {
                Some(cp) => [
                    cp.x.solve(t),
                    cp.y.solve(t),
                    cp.width.solve(t),
                    cp.height.solve(t),
                ],
                None if mode == EvaluationMode::Lenient => uniform(easing::linear(t)),
                None => {
                    return Err(CoreError::MissingControlPoints {
                        start_frame: segment.start_frame,
                        end_frame: segment.end_frame,
                    })
                }
            }
        }
    };

    Ok(BoundingBox::new(
        lerp(a.x, b.x, eased[0]),
        lerp(a.y, b.y, eased[1]),
        lerp(a.width, b.width, eased[2]),
        lerp(a.height, b.height, eased[3]),
    ))
}

fn uniform(t: f64) -> [f64; 4] {
    [t; 4]
}

/// Binary search for the segment with `start_frame <= frame <= end_frame`.
///
/// Segments are sorted and contiguous, so the candidate is the last segment
/// starting at or before `frame`.
pub fn find_segment(
    segments: &[InterpolationSegment],
    frame: FrameNumber,
) -> Option<&InterpolationSegment> {
    let idx = segments.partition_point(|s| s.start_frame <= frame);
    let candidate = segments.get(idx.checked_sub(1)?)?;
    candidate.contains(frame).then_some(candidate)
}

/// Whether the tracked object is present at `frame`.
///
/// Frames not covered by any visibility range count as not visible.
pub fn is_visible_at(sequence: &BoundingBoxSequence, frame: FrameNumber) -> bool {
    let ranges = &sequence.visibility_ranges;
    let idx = ranges.partition_point(|r| r.start_frame <= frame);
    idx.checked_sub(1)
        .and_then(|i| ranges.get(i))
        .is_some_and(|r| frame <= r.end_frame && r.visible)
}

/// Evaluate a batch of frames, in the order given.
pub fn evaluate_frames(
    sequence: &BoundingBoxSequence,
    frames: &[FrameNumber],
    mode: EvaluationMode,
) -> Result<Vec<FrameSample>, CoreError> {
    frames
        .iter()
        .map(|&frame| {
            Ok(FrameSample {
                frame_number: frame,
                bbox: evaluate_with(sequence, frame, mode)?,
                visible: is_visible_at(sequence, frame),
                is_keyframe: sequence.keyframe_at(frame).is_some(),
            })
        })
        .collect()
}
