use crate::types::FrameNumber;

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Invalid sequence: {0}")]
    InvalidSequence(String),

    #[error("Frame {frame} is not covered by any interpolation segment")]
    FrameOutOfRange { frame: FrameNumber },

    #[error("Bezier segment {start_frame}..{end_frame} has missing or malformed control points")]
    MissingControlPoints {
        start_frame: FrameNumber,
        end_frame: FrameNumber,
    },
}
