//! Keyframe sequence data model and its structural invariants.
//!
//! A [`BoundingBoxSequence`] is the aggregate persisted per annotation. Its
//! interpolation segments and visibility ranges are derived data: they are
//! rebuilt whenever the keyframe set changes and never edited independently,
//! apart from the per-segment easing choice.

use serde::{Deserialize, Serialize};

use crate::easing::BezierControlPoints;
use crate::error::CoreError;
use crate::types::{BoundingBox, FrameNumber};

// ---------------------------------------------------------------------------
// Keyframes
// ---------------------------------------------------------------------------

/// A box stored explicitly at a specific frame.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoundingBoxKeyframe {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub frame_number: FrameNumber,
    pub is_keyframe: bool,
}

impl BoundingBoxKeyframe {
    pub fn new(frame_number: FrameNumber, bbox: BoundingBox) -> Self {
        Self {
            x: bbox.x,
            y: bbox.y,
            width: bbox.width,
            height: bbox.height,
            frame_number,
            is_keyframe: true,
        }
    }

    pub fn geometry(&self) -> BoundingBox {
        BoundingBox::new(self.x, self.y, self.width, self.height)
    }
}

// ---------------------------------------------------------------------------
// Interpolation segments
// ---------------------------------------------------------------------------

/// Easing rule applied across one segment.
///
/// Serialized with a `type` discriminant; the bezier variant carries its
/// optional `controlPoints` alongside it.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum InterpolationType {
    #[default]
    Linear,
    EaseIn,
    EaseOut,
    EaseInOut,
    Hold,
    Bezier {
        #[serde(
            rename = "controlPoints",
            default,
            skip_serializing_if = "Option::is_none"
        )]
        control_points: Option<BezierControlPoints>,
    },
}

impl InterpolationType {
    /// Return the type discriminant as it appears in JSON.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Linear => "linear",
            Self::EaseIn => "ease-in",
            Self::EaseOut => "ease-out",
            Self::EaseInOut => "ease-in-out",
            Self::Hold => "hold",
            Self::Bezier { .. } => "bezier",
        }
    }
}

/// The span between two consecutive keyframes. Both ends are inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InterpolationSegment {
    pub start_frame: FrameNumber,
    pub end_frame: FrameNumber,
    #[serde(flatten)]
    pub interpolation: InterpolationType,
}

impl InterpolationSegment {
    pub fn linear(start_frame: FrameNumber, end_frame: FrameNumber) -> Self {
        Self {
            start_frame,
            end_frame,
            interpolation: InterpolationType::Linear,
        }
    }

    pub fn contains(&self, frame: FrameNumber) -> bool {
        self.start_frame <= frame && frame <= self.end_frame
    }
}

/// Build one linear segment per consecutive keyframe pair.
///
/// Fewer than two keyframes produce no segments.
pub fn create_interpolation_segments(boxes: &[BoundingBoxKeyframe]) -> Vec<InterpolationSegment> {
    boxes
        .windows(2)
        .map(|pair| InterpolationSegment::linear(pair[0].frame_number, pair[1].frame_number))
        .collect()
}

// ---------------------------------------------------------------------------
// Visibility
// ---------------------------------------------------------------------------

/// A maximal run of frames sharing the same tracked/untracked status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VisibilityRange {
    pub start_frame: FrameNumber,
    pub end_frame: FrameNumber,
    pub visible: bool,
}

impl VisibilityRange {
    pub fn new(start_frame: FrameNumber, end_frame: FrameNumber, visible: bool) -> Self {
        Self {
            start_frame,
            end_frame,
            visible,
        }
    }
}

// ---------------------------------------------------------------------------
// Sequence
// ---------------------------------------------------------------------------

/// Keyframes, derived segments, and visibility for one tracked object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoundingBoxSequence {
    pub boxes: Vec<BoundingBoxKeyframe>,
    pub interpolation_segments: Vec<InterpolationSegment>,
    pub visibility_ranges: Vec<VisibilityRange>,
    pub track_id: i64,
    pub tracking_source: String,
    pub tracking_confidence: f64,
    pub total_frames: u32,
    pub keyframe_count: usize,
    pub interpolated_frame_count: usize,
}

impl BoundingBoxSequence {
    pub fn first_frame(&self) -> Option<FrameNumber> {
        self.boxes.first().map(|b| b.frame_number)
    }

    pub fn last_frame(&self) -> Option<FrameNumber> {
        self.boxes.last().map(|b| b.frame_number)
    }

    /// The keyframe stored at exactly `frame`, if any.
    pub fn keyframe_at(&self, frame: FrameNumber) -> Option<&BoundingBoxKeyframe> {
        self.boxes
            .binary_search_by_key(&frame, |b| b.frame_number)
            .ok()
            .map(|i| &self.boxes[i])
    }

    /// Parse a persisted JSON blob and check its structural invariants.
    pub fn from_json(value: serde_json::Value) -> Result<Self, CoreError> {
        let sequence: Self = serde_json::from_value(value)
            .map_err(|e| CoreError::Validation(format!("malformed sequence JSON: {e}")))?;
        validate_sequence(&sequence)?;
        Ok(sequence)
    }
}

/// Return a copy of `sequence` whose segment starting at `start_frame` uses
/// `interpolation`.
///
/// A bezier assignment must carry well-formed control points.
pub fn with_segment_interpolation(
    sequence: &BoundingBoxSequence,
    start_frame: FrameNumber,
    interpolation: InterpolationType,
) -> Result<BoundingBoxSequence, CoreError> {
    let index = sequence
        .interpolation_segments
        .binary_search_by_key(&start_frame, |s| s.start_frame)
        .map_err(|_| {
            CoreError::Validation(format!("no interpolation segment starts at frame {start_frame}"))
        })?;

    let segment = sequence.interpolation_segments[index];
    if let InterpolationType::Bezier { control_points } = interpolation {
        if !control_points.is_some_and(|cp| cp.is_well_formed()) {
            return Err(CoreError::MissingControlPoints {
                start_frame: segment.start_frame,
                end_frame: segment.end_frame,
            });
        }
    }

    let mut updated = sequence.clone();
    updated.interpolation_segments[index].interpolation = interpolation;
    Ok(updated)
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

/// Check the structural invariants of a sequence.
///
/// Checks:
/// - keyframe frame numbers strictly increasing, `keyframe_count` matches
/// - one segment per consecutive keyframe pair, endpoints on those keyframes
/// - visibility ranges partition `[0, total_frames - 1]` with alternating flags
pub fn validate_sequence(sequence: &BoundingBoxSequence) -> Result<(), CoreError> {
    let invalid = |msg: String| Err(CoreError::InvalidSequence(msg));

    if sequence.keyframe_count != sequence.boxes.len() {
        return invalid(format!(
            "keyframeCount is {} but {} boxes are stored",
            sequence.keyframe_count,
            sequence.boxes.len()
        ));
    }

    for pair in sequence.boxes.windows(2) {
        if pair[1].frame_number <= pair[0].frame_number {
            return invalid(format!(
                "keyframes must be strictly increasing, got {} after {}",
                pair[1].frame_number, pair[0].frame_number
            ));
        }
    }

    let expected_segments = sequence.boxes.len().saturating_sub(1);
    if sequence.interpolation_segments.len() != expected_segments {
        return invalid(format!(
            "expected {expected_segments} interpolation segments, found {}",
            sequence.interpolation_segments.len()
        ));
    }

    for (segment, pair) in sequence
        .interpolation_segments
        .iter()
        .zip(sequence.boxes.windows(2))
    {
        if segment.start_frame != pair[0].frame_number || segment.end_frame != pair[1].frame_number
        {
            return invalid(format!(
                "segment {}..{} does not span keyframes {}..{}",
                segment.start_frame, segment.end_frame, pair[0].frame_number, pair[1].frame_number
            ));
        }
    }

    validate_visibility_ranges(&sequence.visibility_ranges, sequence.total_frames)
}

fn validate_visibility_ranges(
    ranges: &[VisibilityRange],
    total_frames: u32,
) -> Result<(), CoreError> {
    let (Some(first), Some(last)) = (ranges.first(), ranges.last()) else {
        return Ok(());
    };

    if first.start_frame != 0 || total_frames == 0 || last.end_frame != total_frames - 1 {
        return Err(CoreError::InvalidSequence(format!(
            "visibility ranges cover {}..{} instead of 0..{}",
            first.start_frame,
            last.end_frame,
            total_frames.saturating_sub(1)
        )));
    }

    if let Some(bad) = ranges.iter().find(|r| r.start_frame > r.end_frame) {
        return Err(CoreError::InvalidSequence(format!(
            "visibility range {}..{} is inverted",
            bad.start_frame, bad.end_frame
        )));
    }

    for pair in ranges.windows(2) {
        if pair[0].end_frame.checked_add(1) != Some(pair[1].start_frame) {
            return Err(CoreError::InvalidSequence(format!(
                "visibility ranges are not contiguous at frame {}",
                pair[0].end_frame
            )));
        }
        if pair[1].visible == pair[0].visible {
            return Err(CoreError::InvalidSequence(format!(
                "adjacent visibility ranges at frame {} share the same flag",
                pair[1].start_frame
            )));
        }
    }

    Ok(())
}
