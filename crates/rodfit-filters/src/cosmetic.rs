//! Display-oriented filters: box blur, log compression and sharpening.

use rodfit_core::{DegenerateInput, Frame, FrameError, FrameSource, Pixel};

use crate::kernels::{correlate_separable, SeparableKernel};
use crate::FilterError;

/// Number of `log(1 + x)` passes applied by [`CompressFilter`] by default.
pub const DEFAULT_COMPRESS_PASSES: usize = 7;

/// Normalized `ksize x ksize` box blur. Keeps the source pixel type.
#[derive(Clone, Debug)]
pub struct BlurFilter<S> {
    source: S,
    ksize: usize,
    kernel: SeparableKernel,
}

impl<S: FrameSource> BlurFilter<S> {
    pub fn new(source: S, ksize: usize) -> Result<Self, FilterError> {
        let kernel = SeparableKernel::box_filter(ksize)?;
        Ok(Self {
            source,
            ksize,
            kernel,
        })
    }

    pub fn ksize(&self) -> usize {
        self.ksize
    }
}

impl<S: FrameSource> FrameSource for BlurFilter<S> {
    type Pixel = S::Pixel;

    fn len(&self) -> usize {
        self.source.len()
    }

    fn get(&self, index: usize) -> Result<Frame<S::Pixel>, FrameError> {
        let frame = self.source.get(index)?.to_f64();
        Ok(correlate_separable(&frame, &self.kernel).map(<S::Pixel as Pixel>::from_f64))
    }
}

/// Repeated `log(1 + max(x, 0))`, then divided by the frame maximum.
///
/// Flattens the dynamic range so faint edges stay visible next to strong ones.
#[derive(Clone, Debug)]
pub struct CompressFilter<S> {
    source: S,
    passes: usize,
}

impl<S: FrameSource> CompressFilter<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            passes: DEFAULT_COMPRESS_PASSES,
        }
    }

    pub fn with_passes(source: S, passes: usize) -> Result<Self, FilterError> {
        if passes == 0 {
            return Err(FilterError::InvalidParameter {
                name: "compress_passes",
                reason: "must be at least 1",
            });
        }
        Ok(Self { source, passes })
    }

    pub fn passes(&self) -> usize {
        self.passes
    }
}

impl<S: FrameSource> FrameSource for CompressFilter<S> {
    type Pixel = f64;

    fn len(&self) -> usize {
        self.source.len()
    }

    fn get(&self, index: usize) -> Result<Frame<f64>, FrameError> {
        let passes = self.passes;
        let mut out = self.source.get(index)?.map(|v| {
            let mut x = v.to_f64().max(0.0);
            for _ in 0..passes {
                x = x.ln_1p();
            }
            x
        });
        let max = out.data().iter().cloned().fold(0.0f64, f64::max);
        if !(max.is_finite() && max > 0.0) {
            return Err(DegenerateInput::ZeroResponse { stage: "compress" }.into());
        }
        out.data_mut().iter_mut().for_each(|v| *v /= max);
        Ok(out)
    }
}

/// Squares every sample and divides by the mean of the squares.
#[derive(Clone, Debug)]
pub struct SharpenFilter<S> {
    source: S,
}

impl<S: FrameSource> SharpenFilter<S> {
    pub fn new(source: S) -> Self {
        Self { source }
    }
}

impl<S: FrameSource> FrameSource for SharpenFilter<S> {
    type Pixel = f64;

    fn len(&self) -> usize {
        self.source.len()
    }

    fn get(&self, index: usize) -> Result<Frame<f64>, FrameError> {
        let mut out = self.source.get(index)?.map(|v| {
            let x = v.to_f64();
            x * x
        });
        let n = out.data().len();
        let mean = out.data().iter().sum::<f64>() / n.max(1) as f64;
        if !(mean.is_finite() && mean > 0.0) {
            return Err(DegenerateInput::ZeroResponse { stage: "sharpen" }.into());
        }
        out.data_mut().iter_mut().for_each(|v| *v /= mean);
        Ok(out)
    }
}
