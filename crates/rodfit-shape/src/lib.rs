//! Rod (capsule) shape model and its fit to an edge-response surface.
//!
//! A [`RodShape`] is built from two dragged endpoints, sampled into an
//! ordered outline, and refined by [`fit_rod`] / [`RodFitter`], which
//! maximize the surface response summed over that outline.
//!
//! ```
//! use nalgebra::Point2;
//! use rodfit_core::Frame;
//! use rodfit_shape::{fit_rod, FitParams, RodShape};
//!
//! let surface = Frame::new_fill(64, 64, 1, 0.0f64);
//! let guess = RodShape::from_xypair(Point2::new(10.0, 50.0), Point2::new(50.0, 12.0));
//! let report = fit_rod(&surface, guess, &FitParams::default());
//! // A flat surface gives the optimizer nothing to climb.
//! assert_eq!(report.shape, guess);
//! assert!(!report.improved());
//! ```

mod fit;
mod shape;

pub use fit::{
    fit_rod, minimize, FitError, FitParams, FitReport, FitStatus, PowellParams, PowellResult,
    RodFitter, RodObjective,
};
pub use shape::{PointSplit, RodLandmarks, RodShape, CANONICAL_LENGTH, CANONICAL_RADIUS};
