use crate::{Pixel, PlaneView};

/// Value returned for coordinates outside the interpolation domain.
pub const OUT_OF_DOMAIN_FILL: f64 = 0.0;

/// Bilinear interpolation of a plane at real-valued `(x, y)`.
///
/// The domain is `0 <= x < width - 1`, `0 <= y < height - 1`, where all four
/// lattice neighbours exist. Outside it (including NaN) the result is
/// [`OUT_OF_DOMAIN_FILL`], so an optimizer may step off-frame without
/// failing. At integer coordinates inside the domain the stored sample is
/// returned exactly.
#[inline]
pub fn sample_bilinear<T: Pixel>(src: &PlaneView<'_, T>, x: f64, y: f64) -> f64 {
    let x_max = src.width() as f64 - 1.0;
    let y_max = src.height() as f64 - 1.0;
    if !(x >= 0.0 && x < x_max && y >= 0.0 && y < y_max) {
        return OUT_OF_DOMAIN_FILL;
    }

    let x0 = x.floor() as usize;
    let y0 = y.floor() as usize;
    let fx = x - x0 as f64;
    let fy = y - y0 as f64;

    let p00 = src.at(x0, y0).to_f64();
    let p10 = src.at(x0 + 1, y0).to_f64();
    let p01 = src.at(x0, y0 + 1).to_f64();
    let p11 = src.at(x0 + 1, y0 + 1).to_f64();

    let a = p00 + fx * (p10 - p00);
    let b = p01 + fx * (p11 - p01);
    a + fy * (b - a)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Frame;
    use approx::assert_abs_diff_eq;

    fn ramp(width: usize, height: usize) -> Frame<f64> {
        let data = (0..height)
            .flat_map(|y| (0..width).map(move |x| (10 * y + x) as f64))
            .collect();
        Frame::gray(width, height, data).expect("frame")
    }

    #[test]
    fn exact_at_interior_lattice_points() {
        let frame = ramp(5, 4);
        let plane = frame.plane(0).expect("plane");
        for y in 0..3 {
            for x in 0..4 {
                let v = sample_bilinear(&plane, x as f64, y as f64);
                assert_eq!(v, frame.get(x, y, 0).expect("in bounds"));
            }
        }
    }

    #[test]
    fn blends_four_neighbours() {
        let frame = Frame::gray(2, 2, vec![0u8, 10, 20, 30]).expect("frame");
        let plane = frame.plane(0).expect("plane");
        assert_eq!(sample_bilinear(&plane, 0.5, 0.5), 15.0);

        let frame = ramp(3, 3);
        let plane = frame.plane(0).expect("plane");
        assert_abs_diff_eq!(sample_bilinear(&plane, 0.25, 0.5), 5.25, epsilon = 1e-12);
        assert_abs_diff_eq!(sample_bilinear(&plane, 1.75, 1.25), 14.25, epsilon = 1e-12);
    }

    #[test]
    fn returns_fill_outside_domain() {
        let frame = Frame::new_fill(6, 5, 1, 7.0f64);
        let plane = frame.plane(0).expect("plane");
        for (x, y) in [
            (-1.0, 2.0),
            (-0.01, 2.0),
            (2.0, -1.0),
            (5.0, 2.0),
            (6.0, 2.0),
            (2.0, 4.0),
            (2.0, 5.5),
            (100.0, 100.0),
            (f64::NAN, 1.0),
        ] {
            assert_eq!(sample_bilinear(&plane, x, y), OUT_OF_DOMAIN_FILL, "at ({x}, {y})");
        }
        assert_eq!(sample_bilinear(&plane, 4.99, 3.99), 7.0);
    }

    #[test]
    fn empty_plane_is_all_fill() {
        let frame = Frame::<u8>::new_fill(0, 0, 1, 0);
        let plane = frame.plane(0).expect("plane");
        assert_eq!(sample_bilinear(&plane, 0.0, 0.0), OUT_OF_DOMAIN_FILL);
    }
}
