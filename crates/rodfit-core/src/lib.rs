//! Core types for rod shape fitting.
//!
//! This crate is intentionally small. It knows about frames, indexable frame
//! sequences and continuous sampling of a frame, and nothing about filters or
//! shapes.
//!
//! ## Coordinates
//! Frames are addressed by `(x, y)` = (column, row) with the origin at the
//! top-left pixel and rows increasing downward. Integer coordinates refer to
//! pixel centers.

mod error;
mod frame;
mod logger;
mod sample;
mod source;

pub use error::{DegenerateInput, FrameError};
pub use frame::{Frame, Pixel, PlaneView};
pub use sample::{sample_bilinear, OUT_OF_DOMAIN_FILL};
pub use source::{FrameSource, VecFrames};

#[cfg(feature = "tracing")]
pub use logger::init_tracing;

pub use logger::{init_with_level, init_with_verbosity, verbosity_level};
