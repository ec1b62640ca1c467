pub mod sequences;
pub mod tracking;
