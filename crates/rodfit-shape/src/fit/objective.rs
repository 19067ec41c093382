use nalgebra::Vector4;
use rodfit_core::{sample_bilinear, Frame, Pixel};

use crate::{PointSplit, RodShape};

/// Negative summed edge response along a rod's outline.
///
/// Owns a single-channel `f64` copy of the surface; multi-channel frames are
/// averaged to gray first. Lower is better.
#[derive(Clone, Debug)]
pub struct RodObjective {
    surface: Frame<f64>,
    points: usize,
    split: PointSplit,
}

impl RodObjective {
    pub fn new<T: Pixel>(frame: &Frame<T>, points: usize, split: PointSplit) -> Self {
        Self {
            surface: frame.to_gray(),
            points,
            split,
        }
    }

    pub fn surface(&self) -> &Frame<f64> {
        &self.surface
    }

    pub fn points(&self) -> usize {
        self.points
    }

    pub fn evaluate(&self, shape: &RodShape) -> f64 {
        let Some(plane) = self.surface.plane(0) else {
            return 0.0;
        };
        let sum: f64 = shape
            .generate(self.points, &self.split)
            .iter()
            .map(|p| sample_bilinear(&plane, p.x, p.y))
            .sum();
        -sum
    }

    /// Objective at `[xc, yc, theta, scale]`.
    pub fn evaluate_params(&self, params: &Vector4<f64>) -> f64 {
        self.evaluate(&RodShape::from_params(params))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use nalgebra::Point2;

    #[test]
    fn constant_surface_scores_the_in_frame_point_count() {
        let frame = Frame::new_fill(200, 200, 1, 1.0f64);
        let objective = RodObjective::new(&frame, 1000, PointSplit::default());
        let rod = RodShape::from_xypair(Point2::new(60.0, 150.0), Point2::new(140.0, 50.0));
        assert_abs_diff_eq!(objective.evaluate(&rod), -1000.0, epsilon = 1e-9);
    }

    #[test]
    fn off_frame_shape_scores_zero() {
        let frame = Frame::new_fill(50, 50, 3, 200u8);
        let objective = RodObjective::new(&frame, 1000, PointSplit::default());
        assert_eq!(objective.surface().channels(), 1);
        let rod = RodShape::from_xypair(Point2::new(500.0, 500.0), Point2::new(600.0, 450.0));
        assert_eq!(objective.evaluate(&rod), 0.0);
        assert_eq!(objective.evaluate_params(&rod.params()), 0.0);
    }
}
