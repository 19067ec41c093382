//! Separable kernels and 2-D correlation with reflect-101 borders.
//!
//! Sobel kernels follow the usual separable construction:
//! - smoothing row: binomial coefficients of order `ksize - 1`,
//! - first derivative: `[-1, 0, 1]` convolved with binomial order `ksize - 3`,
//! - second derivative: `[1, -2, 1]` convolved with binomial order `ksize - 3`.
//!
//! `ksize == 1` means "no smoothing": the derivative axis uses the bare
//! 3-tap difference and the other axis uses `[1]`.

use rodfit_core::Frame;

use crate::FilterError;

/// Largest accepted kernel size.
pub const MAX_KSIZE: usize = 31;

/// Pair of 1-D kernels applied along x (columns) and y (rows).
#[derive(Clone, Debug, PartialEq)]
pub struct SeparableKernel {
    pub x: Vec<f64>,
    pub y: Vec<f64>,
}

impl SeparableKernel {
    /// Normalized `ksize x ksize` box kernel.
    pub fn box_filter(ksize: usize) -> Result<Self, FilterError> {
        check_ksize(ksize)?;
        let row = vec![1.0 / ksize as f64; ksize];
        Ok(Self {
            x: row.clone(),
            y: row,
        })
    }
}

pub(crate) fn check_ksize(ksize: usize) -> Result<(), FilterError> {
    if ksize == 0 || ksize % 2 == 0 || ksize > MAX_KSIZE {
        return Err(FilterError::InvalidKernelSize {
            ksize,
            max: MAX_KSIZE,
        });
    }
    Ok(())
}

/// Binomial coefficients of the given order (`order + 1` taps).
pub fn binomial_row(order: usize) -> Vec<f64> {
    let mut row = vec![1.0];
    for _ in 0..order {
        let mut next = vec![0.0; row.len() + 1];
        for (i, &v) in row.iter().enumerate() {
            next[i] += v;
            next[i + 1] += v;
        }
        row = next;
    }
    row
}

fn convolve_full(a: &[f64], b: &[f64]) -> Vec<f64> {
    let mut out = vec![0.0; a.len() + b.len() - 1];
    for (i, &av) in a.iter().enumerate() {
        for (j, &bv) in b.iter().enumerate() {
            out[i + j] += av * bv;
        }
    }
    out
}

fn derivative_row(order: usize, ksize: usize) -> Vec<f64> {
    let base: &[f64] = match order {
        0 => &[1.0],
        1 => &[-1.0, 0.0, 1.0],
        _ => &[1.0, -2.0, 1.0],
    };
    if ksize == 1 {
        return base.to_vec();
    }
    if order == 0 {
        return binomial_row(ksize - 1);
    }
    convolve_full(base, &binomial_row(ksize - 3))
}

/// Sobel derivative kernel of order `dx` along x and `dy` along y.
///
/// Orders above 2 are not supported.
pub fn sobel_kernels(dx: usize, dy: usize, ksize: usize) -> Result<SeparableKernel, FilterError> {
    check_ksize(ksize)?;
    if dx > 2 || dy > 2 {
        return Err(FilterError::InvalidParameter {
            name: "derivative order",
            reason: "must be 0, 1 or 2",
        });
    }
    Ok(SeparableKernel {
        x: derivative_row(dx, ksize),
        y: derivative_row(dy, ksize),
    })
}

/// Map an out-of-range index by mirroring around the edge samples without
/// repeating them (`dcb|abcd|cba`).
#[inline]
pub(crate) fn reflect101(i: isize, len: usize) -> usize {
    if len == 1 {
        return 0;
    }
    let period = (2 * len - 2) as isize;
    let r = i.rem_euclid(period) as usize;
    if r < len {
        r
    } else {
        2 * len - 2 - r
    }
}

/// Correlate every channel of `src` with `kernel` (x pass, then y pass).
pub(crate) fn correlate_separable(src: &Frame<f64>, kernel: &SeparableKernel) -> Frame<f64> {
    let (w, h, ch) = src.shape();
    let mut out = Frame::new_fill(w, h, ch, 0.0);
    if w == 0 || h == 0 {
        return out;
    }

    let rx = (kernel.x.len() / 2) as isize;
    let ry = (kernel.y.len() / 2) as isize;
    let input = src.data();

    let mut tmp = vec![0.0; input.len()];
    for y in 0..h {
        let row = y * w;
        for x in 0..w {
            for c in 0..ch {
                let mut acc = 0.0;
                for (k, &kv) in kernel.x.iter().enumerate() {
                    let xi = reflect101(x as isize + k as isize - rx, w);
                    acc += kv * input[(row + xi) * ch + c];
                }
                tmp[(row + x) * ch + c] = acc;
            }
        }
    }

    let dst = out.data_mut();
    for y in 0..h {
        for x in 0..w {
            for c in 0..ch {
                let mut acc = 0.0;
                for (k, &kv) in kernel.y.iter().enumerate() {
                    let yi = reflect101(y as isize + k as isize - ry, h);
                    acc += kv * tmp[(yi * w + x) * ch + c];
                }
                dst[(y * w + x) * ch + c] = acc;
            }
        }
    }
    out
}
