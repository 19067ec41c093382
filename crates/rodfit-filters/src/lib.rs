//! Per-frame filters for rod fitting.
//!
//! Every filter wraps an upstream [`FrameSource`] and is itself a
//! `FrameSource`, so pipelines are built by nesting:
//!
//! ```
//! use rodfit_core::{Frame, FrameSource, VecFrames};
//! use rodfit_filters::{BlurFilter, EdgeFilter};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let frames: VecFrames<u8> = (0..3)
//!     .map(|i| {
//!         let data = (0..64).map(|p| if p % 8 > 3 { 200 } else { 10 * i }).collect();
//!         Frame::gray(8, 8, data)
//!     })
//!     .collect::<Result<_, _>>()?;
//!
//! let edges = BlurFilter::new(EdgeFilter::sobel_abs(&frames, 3)?, 3)?;
//! let surface = edges.get(0)?;
//! assert_eq!(surface.width(), 8);
//! # Ok(())
//! # }
//! ```
//!
//! Transforms are pure: a stage never mutates the frame it received, and
//! every call to `get` re-derives its output from the upstream frame. The
//! mean filters are the only stages holding state, a running mean computed
//! once at construction.
//!
//! [`FilterKind`] is the closed set of named pipelines used by the CLI.

mod convert;
mod cosmetic;
mod edge;
mod error;
mod kernels;
mod kind;
mod mean;

pub use convert::AsF64;
pub use cosmetic::{BlurFilter, CompressFilter, SharpenFilter, DEFAULT_COMPRESS_PASSES};
pub use edge::{EdgeFilter, EdgeNormalization, EdgeOperator};
pub use error::FilterError;
pub use kernels::{binomial_row, sobel_kernels, SeparableKernel, MAX_KSIZE};
pub use kind::{BoxedSource, FilterKind, PipelineParams, PRESET_SOBEL_KSIZE};
pub use mean::{running_mean, MeanMask, MeanParams, MeanSubtract};

pub use rodfit_core::{DegenerateInput, Frame, FrameError, FrameSource};
