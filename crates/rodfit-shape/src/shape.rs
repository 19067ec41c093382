//! Capsule ("rod") shape model.

use std::f64::consts::{FRAC_PI_2, PI};

use nalgebra::{Point2, Vector2, Vector4};
use serde::{Deserialize, Serialize};

/// Axis length of the rod in canonical units (cap centre to cap centre).
pub const CANONICAL_LENGTH: f64 = 100.0;
/// Cap radius in canonical units.
pub const CANONICAL_RADIUS: f64 = 10.0;

/// How outline points are split between the two sides and the two caps.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PointSplit {
    /// Fraction of points placed on the straight sides, in `[0, 1]`.
    pub side_fraction: f64,
}

impl Default for PointSplit {
    fn default() -> Self {
        Self {
            side_fraction: 0.75,
        }
    }
}

impl PointSplit {
    /// `(per_side, per_cap)` counts for a requested total of `n`.
    pub fn counts(&self, n: usize) -> (usize, usize) {
        let f = self.side_fraction.clamp(0.0, 1.0);
        let per_side = (n as f64 * f / 2.0).floor() as usize;
        let per_cap = (n.saturating_sub(2 * per_side) / 2).max(1);
        (per_side, per_cap)
    }

    /// Number of points `generate(n)` returns.
    pub fn total(&self, n: usize) -> usize {
        let (per_side, per_cap) = self.counts(n);
        2 * per_side.saturating_sub(1) + 2 * (per_cap + 1)
    }
}

/// The six boundary landmarks of a [`RodShape`].
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct RodLandmarks {
    pub lower_center: Point2<f64>,
    pub upper_center: Point2<f64>,
    pub lower_left: Point2<f64>,
    pub lower_right: Point2<f64>,
    pub upper_left: Point2<f64>,
    pub upper_right: Point2<f64>,
}

/// Capsule of length `scale * CANONICAL_LENGTH` between cap centres and
/// radius `scale * CANONICAL_RADIUS`, centred at `center` with its axis at
/// angle `theta` (radians, image coordinates, y down).
///
/// Values are immutable; fitting always produces a new shape.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct RodShape {
    pub center: Point2<f64>,
    pub theta: f64,
    pub scale: f64,
}

impl RodShape {
    pub fn new(center: Point2<f64>, theta: f64, scale: f64) -> Self {
        Self {
            center,
            theta,
            scale,
        }
    }

    /// Shape whose axis runs between two dragged endpoints.
    ///
    /// The endpoints are reordered so the axis starts at the one lower on
    /// screen (larger `y`); ties keep the given order. The result is therefore
    /// independent of drag direction except for horizontal drags.
    pub fn from_xypair(a: Point2<f64>, b: Point2<f64>) -> Self {
        if b.y > a.y {
            Self::from_directed(b, a)
        } else {
            Self::from_directed(a, b)
        }
    }

    /// Shape whose axis runs from `start` (lower cap) to `end` (upper cap).
    pub fn from_directed(start: Point2<f64>, end: Point2<f64>) -> Self {
        let delta = end - start;
        Self {
            center: nalgebra::center(&start, &end),
            theta: delta.y.atan2(delta.x),
            scale: delta.norm() / CANONICAL_LENGTH,
        }
    }

    /// `[xc, yc, theta, scale]`.
    pub fn params(&self) -> Vector4<f64> {
        Vector4::new(self.center.x, self.center.y, self.theta, self.scale)
    }

    pub fn from_params(p: &Vector4<f64>) -> Self {
        Self::new(Point2::new(p[0], p[1]), p[2], p[3])
    }

    /// Unit vector along the axis, pointing at the upper cap.
    pub fn axis(&self) -> Vector2<f64> {
        Vector2::new(self.theta.cos(), self.theta.sin())
    }

    /// Unit normal to the axis (the axis rotated by +90 degrees).
    pub fn normal(&self) -> Vector2<f64> {
        Vector2::new(-self.theta.sin(), self.theta.cos())
    }

    pub fn half_length(&self) -> f64 {
        self.scale * CANONICAL_LENGTH / 2.0
    }

    pub fn radius(&self) -> f64 {
        self.scale * CANONICAL_RADIUS
    }

    pub fn lower_center(&self) -> Point2<f64> {
        self.center - self.axis() * self.half_length()
    }

    pub fn upper_center(&self) -> Point2<f64> {
        self.center + self.axis() * self.half_length()
    }

    pub fn landmarks(&self) -> RodLandmarks {
        let lower_center = self.lower_center();
        let upper_center = self.upper_center();
        let off = self.normal() * self.radius();
        RodLandmarks {
            lower_center,
            upper_center,
            lower_left: lower_center - off,
            lower_right: lower_center + off,
            upper_left: upper_center - off,
            upper_right: upper_center + off,
        }
    }

    /// Ordered outline points as a closed walk: lower cap (right to left),
    /// left side (lower to upper), upper cap (left to right), right side
    /// (upper to lower).
    ///
    /// Sides skip their endpoints, which the caps already cover.
    pub fn generate(&self, n: usize, split: &PointSplit) -> Vec<Point2<f64>> {
        let (per_side, per_cap) = split.counts(n);
        let lm = self.landmarks();
        let r = self.radius();
        let mut out = Vec::with_capacity(split.total(n));

        let cap = |out: &mut Vec<Point2<f64>>, c: Point2<f64>, start: f64| {
            for j in 0..=per_cap {
                let a = start + PI * j as f64 / per_cap as f64;
                out.push(c + Vector2::new(a.cos(), a.sin()) * r);
            }
        };
        let side = |out: &mut Vec<Point2<f64>>, from: Point2<f64>, to: Point2<f64>| {
            for k in 1..per_side {
                let t = k as f64 / per_side as f64;
                out.push(from + (to - from) * t);
            }
        };

        cap(&mut out, lm.lower_center, self.theta + FRAC_PI_2);
        side(&mut out, lm.lower_left, lm.upper_left);
        cap(&mut out, lm.upper_center, self.theta - FRAC_PI_2);
        side(&mut out, lm.upper_right, lm.lower_right);
        out
    }

    /// [`generate`](Self::generate) with the default split.
    pub fn points(&self, n: usize) -> Vec<Point2<f64>> {
        self.generate(n, &PointSplit::default())
    }
}
