//! Fitting a [`RodShape`] to an edge-response surface.
//!
//! The fit maximizes the summed surface value along the rod outline by
//! minimizing its negative with Powell's method. There are no bounds:
//! `scale` may go negative and `theta` is not wrapped. A poor initial guess
//! yields a poor local optimum without any error; the returned
//! [`FitReport`] says how the search ended.

mod line_search;
mod objective;
mod powell;

pub use objective::RodObjective;
pub use powell::{minimize, FitStatus, PowellParams, PowellResult};

use log::{debug, warn};
use nalgebra::Vector4;
use rodfit_core::{Frame, Pixel};
use serde::{Deserialize, Serialize};

#[cfg(feature = "tracing")]
use tracing::instrument;

use crate::{PointSplit, RodShape};

/// Invalid fit configuration.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum FitError {
    #[error("invalid fit parameter `{name}`: {reason}")]
    InvalidParameter {
        name: &'static str,
        reason: &'static str,
    },
}

/// Everything that controls a fit.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FitParams {
    /// Outline points sampled per objective evaluation.
    pub points: usize,
    pub split: PointSplit,
    pub powell: PowellParams,
}

impl Default for FitParams {
    fn default() -> Self {
        Self {
            points: 1000,
            split: PointSplit::default(),
            powell: PowellParams::default(),
        }
    }
}

impl FitParams {
    pub fn validate(&self) -> Result<(), FitError> {
        let invalid = |name, reason| Err(FitError::InvalidParameter { name, reason });
        if self.points == 0 {
            return invalid("points", "must be positive");
        }
        if !(0.0..=1.0).contains(&self.split.side_fraction) {
            return invalid("split.side_fraction", "must be in [0, 1]");
        }
        let p = &self.powell;
        if !(p.ftol.is_finite() && p.ftol >= 0.0) {
            return invalid("powell.ftol", "must be finite and non-negative");
        }
        if !(p.line_tol.is_finite() && p.line_tol > 0.0) {
            return invalid("powell.line_tol", "must be finite and positive");
        }
        if p.max_iterations == 0 || p.max_evaluations == 0 {
            return invalid("powell limits", "must be positive");
        }
        if p.initial_steps.iter().any(|s| !s.is_finite() || *s == 0.0) {
            return invalid("powell.initial_steps", "must be finite and non-zero");
        }
        Ok(())
    }
}

/// Outcome of one fit.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FitReport {
    pub initial: RodShape,
    pub shape: RodShape,
    pub initial_objective: f64,
    pub final_objective: f64,
    pub iterations: usize,
    pub evaluations: usize,
    pub status: FitStatus,
}

impl FitReport {
    /// `true` when the fitted shape scores strictly better than the start.
    pub fn improved(&self) -> bool {
        self.final_objective < self.initial_objective
    }
}

/// Holds fit settings and the last accepted shape between fits.
#[derive(Clone, Debug)]
pub struct RodFitter {
    params: FitParams,
    last_accepted: Option<RodShape>,
}

impl RodFitter {
    pub fn new(params: FitParams) -> Result<Self, FitError> {
        params.validate()?;
        Ok(Self {
            params,
            last_accepted: None,
        })
    }

    pub fn params(&self) -> &FitParams {
        &self.params
    }

    pub fn last_accepted(&self) -> Option<&RodShape> {
        self.last_accepted.as_ref()
    }

    /// Refine `initial` against `frame` and remember the result.
    #[cfg_attr(
        feature = "tracing",
        instrument(level = "info", skip(self, frame), fields(width = frame.width(), height = frame.height()))
    )]
    pub fn fit<T: Pixel>(&mut self, frame: &Frame<T>, initial: RodShape) -> FitReport {
        let report = fit_rod(frame, initial, &self.params);
        self.last_accepted = Some(report.shape);
        report
    }
}

/// Refine `initial` against `frame`. The input shape is never modified.
pub fn fit_rod<T: Pixel>(frame: &Frame<T>, initial: RodShape, params: &FitParams) -> FitReport {
    let objective = RodObjective::new(frame, params.points, params.split);
    let x0 = initial.params();
    let steps = Vector4::from(params.powell.initial_steps);

    let res = minimize(|x| objective.evaluate_params(x), x0, &steps, &params.powell);
    let initial_objective = objective.evaluate_params(&x0);
    let shape = RodShape::from_params(&res.x);

    match res.status {
        FitStatus::Converged => debug!(
            "rod fit converged after {} sweeps / {} evaluations: {:.3} -> {:.3}",
            res.iterations, res.evaluations, initial_objective, res.fx
        ),
        status => warn!(
            "rod fit stopped without converging ({status:?}) after {} sweeps / {} evaluations",
            res.iterations, res.evaluations
        ),
    }
    if res.fx >= initial_objective {
        debug!("rod fit left the initial shape unchanged");
    }

    FitReport {
        initial,
        shape,
        initial_objective,
        final_objective: res.fx,
        iterations: res.iterations,
        evaluations: res.evaluations,
        status: res.status,
    }
}
