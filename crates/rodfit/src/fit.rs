//! End-to-end helpers: drag endpoints in, fitted rod out.

use log::info;
use nalgebra::Point2;
use rodfit_core::{Frame, FrameSource, Pixel};
use rodfit_filters::{FilterKind, PipelineParams};
use rodfit_shape::{fit_rod, FitParams, FitReport, RodShape};

#[cfg(feature = "tracing")]
use tracing::instrument;

use crate::RodfitError;

/// Initial shape for a drag from `(x1, y1)` to `(x2, y2)`.
pub fn shape_from_drag(drag: [f64; 4]) -> RodShape {
    let [x1, y1, x2, y2] = drag;
    RodShape::from_xypair(Point2::new(x1, y1), Point2::new(x2, y2))
}

/// Fit a rod to an already filtered `frame`, starting from a drag.
#[cfg_attr(
    feature = "tracing",
    instrument(level = "info", skip(frame, params), fields(width = frame.width(), height = frame.height()))
)]
pub fn fit_from_drag<T: Pixel>(frame: &Frame<T>, drag: [f64; 4], params: &FitParams) -> FitReport {
    fit_rod(frame, shape_from_drag(drag), params)
}

/// Run `kind` over `source`, take frame `index` and fit a rod to it.
#[cfg_attr(
    feature = "tracing",
    instrument(level = "info", skip(source, pipeline, params), fields(frames = source.len()))
)]
pub fn fit_source_frame<S: FrameSource>(
    source: S,
    index: usize,
    kind: FilterKind,
    pipeline: &PipelineParams,
    drag: [f64; 4],
    params: &FitParams,
) -> Result<FitReport, RodfitError> {
    params.validate()?;
    let filtered = kind.build(source, pipeline)?;
    let surface = filtered.get(index)?;
    let report = fit_from_drag(&surface, drag, params);
    info!(
        "frame {index} ({kind}): objective {:.3} -> {:.3} in {} evaluations ({:?})",
        report.initial_objective, report.final_objective, report.evaluations, report.status
    );
    Ok(report)
}
