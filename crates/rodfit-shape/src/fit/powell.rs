//! Powell's direction-set method.
//!
//! Derivative-free and unconstrained. Each sweep line-minimizes along every
//! direction in turn; afterwards the net displacement of the sweep may replace
//! the direction that gave the largest single decrease, following the
//! extrapolation test from Numerical Recipes.

use log::debug;
use nalgebra::SVector;
use serde::{Deserialize, Serialize};

use super::line_search::line_minimize;

/// Why the optimizer stopped.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FitStatus {
    /// The relative decrease over a sweep fell below `ftol`.
    Converged,
    IterationLimit,
    EvaluationLimit,
}

impl FitStatus {
    pub fn is_converged(self) -> bool {
        self == FitStatus::Converged
    }
}

/// Powell optimizer settings.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PowellParams {
    /// Relative decrease per sweep below which the search stops.
    pub ftol: f64,
    /// Relative bracket width at which a line search stops.
    pub line_tol: f64,
    /// Maximum number of sweeps.
    pub max_iterations: usize,
    /// Maximum number of objective evaluations.
    pub max_evaluations: usize,
    /// Initial direction lengths for `[xc, yc, theta, scale]`.
    pub initial_steps: [f64; 4],
}

impl Default for PowellParams {
    fn default() -> Self {
        Self {
            ftol: 1e-4,
            line_tol: 1e-3,
            max_iterations: 200,
            max_evaluations: 4000,
            initial_steps: [2.0, 2.0, 0.05, 0.02],
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct PowellResult<const D: usize> {
    pub x: SVector<f64, D>,
    pub fx: f64,
    pub iterations: usize,
    pub evaluations: usize,
    pub status: FitStatus,
}

struct Budget<F> {
    f: F,
    evaluations: usize,
    max: usize,
}

impl<F> Budget<F> {
    fn eval<const D: usize>(&mut self, x: &SVector<f64, D>) -> Option<f64>
    where
        F: FnMut(&SVector<f64, D>) -> f64,
    {
        if self.evaluations >= self.max {
            return None;
        }
        self.evaluations += 1;
        Some((self.f)(x))
    }

    fn exhausted(&self) -> bool {
        self.evaluations >= self.max
    }

    /// Line-minimize from `x` along `dir`. Returns the step taken.
    fn line<const D: usize>(
        &mut self,
        x: &mut SVector<f64, D>,
        fx: &mut f64,
        dir: &SVector<f64, D>,
        tol: f64,
    ) -> SVector<f64, D>
    where
        F: FnMut(&SVector<f64, D>) -> f64,
    {
        let origin = *x;
        let (t, ft) = line_minimize(|t| self.eval(&(origin + dir * t)), *fx, tol);
        let step = dir * t;
        if t != 0.0 {
            *x = origin + step;
            *fx = ft;
        }
        step
    }
}

/// Minimize `f` from `x0`, starting with directions `steps[i] * e_i`.
///
/// Never fails: the best point found is returned together with the reason the
/// search stopped.
pub fn minimize<const D: usize, F>(
    f: F,
    x0: SVector<f64, D>,
    steps: &SVector<f64, D>,
    params: &PowellParams,
) -> PowellResult<D>
where
    F: FnMut(&SVector<f64, D>) -> f64,
{
    let mut budget = Budget {
        f,
        evaluations: 0,
        max: params.max_evaluations.max(1),
    };
    let mut dirs: Vec<SVector<f64, D>> = (0..D)
        .map(|i| {
            let mut d = SVector::<f64, D>::zeros();
            d[i] = steps[i];
            d
        })
        .collect();

    let mut x = x0;
    let mut fx = budget.eval(&x).unwrap_or(f64::INFINITY);
    let mut iterations = 0;

    let status = loop {
        let x_start = x;
        let f_start = fx;
        let mut biggest = 0;
        let mut biggest_drop = 0.0;

        for (i, dir) in dirs.iter().enumerate() {
            let f_before = fx;
            budget.line(&mut x, &mut fx, dir, params.line_tol);
            if f_before - fx > biggest_drop {
                biggest_drop = f_before - fx;
                biggest = i;
            }
        }
        iterations += 1;
        debug!("powell sweep {iterations}: f {f_start:.6} -> {fx:.6}");

        // A sweep cut short by the budget says nothing about convergence.
        if budget.exhausted() {
            break FitStatus::EvaluationLimit;
        }
        if 2.0 * (f_start - fx) <= params.ftol * (f_start.abs() + fx.abs()) + 1e-20 {
            break FitStatus::Converged;
        }
        if iterations >= params.max_iterations {
            break FitStatus::IterationLimit;
        }

        let shift = x - x_start;
        let Some(f_ext) = budget.eval(&(x + shift)) else {
            break FitStatus::EvaluationLimit;
        };
        if f_ext < f_start {
            let a = f_start - fx - biggest_drop;
            let b = f_start - f_ext;
            let t = 2.0 * (f_start - 2.0 * fx + f_ext) * a * a - biggest_drop * b * b;
            if t < 0.0 {
                let step = budget.line(&mut x, &mut fx, &shift, params.line_tol);
                if step.iter().any(|v| *v != 0.0) {
                    dirs[biggest] = dirs[D - 1];
                    dirs[D - 1] = step;
                }
            }
        }
    };

    PowellResult {
        x,
        fx,
        iterations,
        evaluations: budget.evaluations,
        status,
    }
}
