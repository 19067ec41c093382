//! Edge-response filters: Laplacian, absolute Laplacian and Sobel magnitude.

use rodfit_core::{DegenerateInput, Frame, FrameError, FrameSource};
use serde::{Deserialize, Serialize};

use crate::kernels::{correlate_separable, sobel_kernels, SeparableKernel};
use crate::FilterError;

/// Which edge operator an [`EdgeFilter`] applies.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EdgeOperator {
    /// Signed second derivative `d2/dx2 + d2/dy2`.
    Laplacian,
    /// `|d2/dx2 + d2/dy2|`.
    LaplacianAbs,
    /// `|d/dx| + |d/dy|`.
    SobelAbs,
}

impl EdgeOperator {
    /// Normalization used unless overridden.
    pub fn default_normalization(self) -> EdgeNormalization {
        match self {
            EdgeOperator::Laplacian => EdgeNormalization::BelowTopFifth,
            EdgeOperator::LaplacianAbs | EdgeOperator::SobelAbs => EdgeNormalization::Global,
        }
    }

    fn stage(self) -> &'static str {
        match self {
            EdgeOperator::Laplacian => "laplacian",
            EdgeOperator::LaplacianAbs => "laplacian-abs",
            EdgeOperator::SobelAbs => "sobel-abs",
        }
    }

    fn kernels(self, ksize: usize) -> Result<[SeparableKernel; 2], FilterError> {
        match self {
            EdgeOperator::Laplacian | EdgeOperator::LaplacianAbs => {
                Ok([sobel_kernels(2, 0, ksize)?, sobel_kernels(0, 2, ksize)?])
            }
            EdgeOperator::SobelAbs => Ok([sobel_kernels(1, 0, ksize)?, sobel_kernels(0, 1, ksize)?]),
        }
    }

    fn combine(self, a: f64, b: f64) -> f64 {
        match self {
            EdgeOperator::Laplacian => a + b,
            EdgeOperator::LaplacianAbs => (a + b).abs(),
            EdgeOperator::SobelAbs => a.abs() + b.abs(),
        }
    }
}

/// How an edge response is scaled into `[0, 1]`.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EdgeNormalization {
    /// Divide by the maximum absolute response over the whole frame.
    Global,
    /// Divide by the maximum response at rows `>= height / 5` and clamp
    /// anything above 1 to exactly 1. Keeps a bright top border from
    /// dominating the scale.
    BelowTopFifth,
}

/// Edge operator applied lazily to every frame of `source`.
///
/// Output samples are `f64`; multi-channel frames are filtered per channel.
#[derive(Clone, Debug)]
pub struct EdgeFilter<S> {
    source: S,
    operator: EdgeOperator,
    ksize: usize,
    normalization: EdgeNormalization,
    kernels: [SeparableKernel; 2],
}

impl<S: FrameSource> EdgeFilter<S> {
    /// Build an edge filter. Fails on an empty source or an invalid `ksize`.
    pub fn new(source: S, operator: EdgeOperator, ksize: usize) -> Result<Self, FilterError> {
        let kernels = operator.kernels(ksize)?;
        if source.is_empty() {
            return Err(DegenerateInput::EmptySequence.into());
        }
        Ok(Self {
            source,
            operator,
            ksize,
            normalization: operator.default_normalization(),
            kernels,
        })
    }

    pub fn laplacian(source: S, ksize: usize) -> Result<Self, FilterError> {
        Self::new(source, EdgeOperator::Laplacian, ksize)
    }

    pub fn laplacian_abs(source: S, ksize: usize) -> Result<Self, FilterError> {
        Self::new(source, EdgeOperator::LaplacianAbs, ksize)
    }

    pub fn sobel_abs(source: S, ksize: usize) -> Result<Self, FilterError> {
        Self::new(source, EdgeOperator::SobelAbs, ksize)
    }

    pub fn with_normalization(mut self, normalization: EdgeNormalization) -> Self {
        self.normalization = normalization;
        self
    }

    pub fn operator(&self) -> EdgeOperator {
        self.operator
    }

    pub fn ksize(&self) -> usize {
        self.ksize
    }

    pub fn normalization(&self) -> EdgeNormalization {
        self.normalization
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Raw (unnormalized) operator response for one frame.
    pub fn response(&self, frame: &Frame<f64>) -> Frame<f64> {
        let [ka, kb] = &self.kernels;
        let a = correlate_separable(frame, ka);
        let b = correlate_separable(frame, kb);
        let op = self.operator;
        // Both passes come from the same frame, so shapes always agree.
        a.zip_map(&b, |u, v| op.combine(u, v))
            .unwrap_or_else(|| Frame::new_fill(frame.width(), frame.height(), frame.channels(), 0.0))
    }
}

impl<S: FrameSource> FrameSource for EdgeFilter<S> {
    type Pixel = f64;

    fn len(&self) -> usize {
        self.source.len()
    }

    fn get(&self, index: usize) -> Result<Frame<f64>, FrameError> {
        let frame = self.source.get(index)?.to_f64();
        let response = self.response(&frame);
        normalize(response, self.normalization, self.operator.stage())
    }
}

pub(crate) fn normalize(
    mut frame: Frame<f64>,
    mode: EdgeNormalization,
    stage: &'static str,
) -> Result<Frame<f64>, FrameError> {
    let divisor = match mode {
        EdgeNormalization::Global => frame
            .data()
            .iter()
            .fold(0.0f64, |m, v| m.max(v.abs())),
        EdgeNormalization::BelowTopFifth => frame
            .max_from_row(frame.height() / 5)
            .unwrap_or(0.0),
    };
    if !(divisor.is_finite() && divisor > 0.0) {
        return Err(DegenerateInput::ZeroResponse { stage }.into());
    }

    let clamp = mode == EdgeNormalization::BelowTopFifth;
    for v in frame.data_mut() {
        *v /= divisor;
        if clamp && *v > 1.0 {
            *v = 1.0;
        }
    }
    Ok(frame)
}
