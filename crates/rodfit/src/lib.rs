//! High-level facade crate for the `rodfit-*` workspace.
//!
//! This crate provides:
//! - re-exports of the frame, filter and shape crates,
//! - end-to-end helpers that filter a frame and fit a rod from a drag,
//! - (feature `image`) numbered image files as a frame source,
//! - (feature `cli`) the `rodfit` command-line tool.
//!
//! ## Quickstart
//!
//! ```no_run
//! use rodfit::io::{ImageSequence, ReadMode};
//! use rodfit::{fit_source_frame, FilterKind, FitParams, PipelineParams};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let frames = ImageSequence::open("video/frame%05d.png", 1, ReadMode::Gray)?;
//! let report = fit_source_frame(
//!     &frames,
//!     0,
//!     FilterKind::BlurSobel,
//!     &PipelineParams::default(),
//!     [120.0, 340.0, 410.0, 95.0],
//!     &FitParams::default(),
//! )?;
//! println!("fitted: {:?} ({:?})", report.shape, report.status);
//! # Ok(())
//! # }
//! ```
//!
//! ## API map
//! - `rodfit::core`: frames, frame sources, bilinear sampling, logger.
//! - `rodfit::filters`: edge, mean and cosmetic filters and [`FilterKind`].
//! - `rodfit::shape`: [`RodShape`], outline sampling and the Powell fit.
//! - `rodfit::io` (feature `image`): [`io::ImageSequence`].

pub use rodfit_core as core;
pub use rodfit_filters as filters;
pub use rodfit_shape as shape;

pub use rodfit_core::{Frame, FrameError, FrameSource, VecFrames};
pub use rodfit_filters::{FilterError, FilterKind, PipelineParams};
pub use rodfit_shape::{FitParams, FitReport, FitStatus, RodFitter, RodShape};

mod error;
mod fit;

pub use error::RodfitError;
pub use fit::{fit_from_drag, fit_source_frame, shape_from_drag};

#[cfg(feature = "image")]
pub mod io;
