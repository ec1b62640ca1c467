//! Keyframe interpolation and tracking-import core.
//!
//! Pure data transformations shared by the API layer: tracker output is
//! converted into keyframe sequences ([`track_import`]), optionally thinned
//! ([`decimation`]), and evaluated at arbitrary frames ([`interpolation`]).

pub mod decimation;
pub mod easing;
pub mod error;
pub mod interpolation;
pub mod sequence;
pub mod track_import;
pub mod tracking;
pub mod types;
