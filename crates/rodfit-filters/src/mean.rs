//! Background removal against a running mean of the whole sequence.

use log::debug;
use rodfit_core::{DegenerateInput, Frame, FrameError, FrameSource, Pixel};
use serde::{Deserialize, Serialize};

use crate::FilterError;

#[cfg(feature = "tracing")]
use tracing::instrument;

/// Parameters shared by [`MeanSubtract`] and [`MeanMask`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MeanParams {
    /// Fold every `stride`-th frame into the mean.
    pub stride: usize,
    /// [`MeanMask`] zeroes pixels closer than this to the mean.
    pub threshold: f64,
}

impl Default for MeanParams {
    fn default() -> Self {
        Self {
            stride: 100,
            threshold: 10.0,
        }
    }
}

/// Per-pixel streaming mean of frames `0, stride, 2 * stride, ...`.
///
/// Uses `m += (x - m) / k`, where `k` counts the frames folded in so far.
#[cfg_attr(
    feature = "tracing",
    instrument(level = "info", skip(source), fields(frames = source.len()))
)]
pub fn running_mean<S: FrameSource>(source: &S, stride: usize) -> Result<Frame<f64>, FilterError> {
    if stride == 0 {
        return Err(FilterError::InvalidParameter {
            name: "stride",
            reason: "must be at least 1",
        });
    }
    if source.is_empty() {
        return Err(DegenerateInput::EmptySequence.into());
    }

    let first = source.get(0)?;
    let mut mean = first.to_f64();
    let mut folded = 1usize;

    for index in (stride..source.len()).step_by(stride) {
        let frame = source.get(index)?;
        if !frame.same_shape(&mean) {
            return Err(FrameError::ShapeMismatch {
                expected: mean.shape(),
                actual: frame.shape(),
            }
            .into());
        }
        folded += 1;
        let k = folded as f64;
        for (m, x) in mean.data_mut().iter_mut().zip(frame.data()) {
            *m += (x.to_f64() - *m) / k;
        }
    }

    debug!(
        "running mean over {folded} of {} frames ({}x{}x{})",
        source.len(),
        mean.width(),
        mean.height(),
        mean.channels()
    );
    Ok(mean)
}

fn check_shape<T: Pixel, U: Pixel>(mean: &Frame<T>, frame: &Frame<U>) -> Result<(), FrameError> {
    if mean.same_shape(frame) {
        Ok(())
    } else {
        Err(FrameError::ShapeMismatch {
            expected: mean.shape(),
            actual: frame.shape(),
        })
    }
}

/// Subtracts the sequence mean from each frame, saturating at the pixel
/// type's floor.
///
/// The mean is stored in the source pixel type (rounded, saturating).
#[derive(Clone, Debug)]
pub struct MeanSubtract<S: FrameSource> {
    source: S,
    mean: Frame<S::Pixel>,
}

impl<S: FrameSource> MeanSubtract<S> {
    pub fn new(source: S, params: &MeanParams) -> Result<Self, FilterError> {
        let mean = running_mean(&source, params.stride)?.map(<S::Pixel as Pixel>::from_f64);
        Ok(Self { source, mean })
    }

    pub fn mean_frame(&self) -> &Frame<S::Pixel> {
        &self.mean
    }

    pub fn source(&self) -> &S {
        &self.source
    }
}

impl<S: FrameSource> FrameSource for MeanSubtract<S> {
    type Pixel = S::Pixel;

    fn len(&self) -> usize {
        self.source.len()
    }

    fn get(&self, index: usize) -> Result<Frame<S::Pixel>, FrameError> {
        let frame = self.source.get(index)?;
        check_shape(&self.mean, &frame)?;
        let out = frame.zip_map(&self.mean, |v, m| v.saturating_sub(m));
        Ok(out.unwrap_or(frame))
    }
}

/// Zeroes every pixel within `threshold` of the sequence mean and keeps
/// the original value elsewhere.
#[derive(Clone, Debug)]
pub struct MeanMask<S: FrameSource> {
    source: S,
    mean: Frame<S::Pixel>,
    threshold: f64,
}

impl<S: FrameSource> MeanMask<S> {
    pub fn new(source: S, params: &MeanParams) -> Result<Self, FilterError> {
        if !(params.threshold.is_finite() && params.threshold >= 0.0) {
            return Err(FilterError::InvalidParameter {
                name: "threshold",
                reason: "must be finite and non-negative",
            });
        }
        let mean = running_mean(&source, params.stride)?.map(<S::Pixel as Pixel>::from_f64);
        Ok(Self {
            source,
            mean,
            threshold: params.threshold,
        })
    }

    pub fn mean_frame(&self) -> &Frame<S::Pixel> {
        &self.mean
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }
}

impl<S: FrameSource> FrameSource for MeanMask<S> {
    type Pixel = S::Pixel;

    fn len(&self) -> usize {
        self.source.len()
    }

    fn get(&self, index: usize) -> Result<Frame<S::Pixel>, FrameError> {
        let frame = self.source.get(index)?;
        check_shape(&self.mean, &frame)?;
        let threshold = self.threshold;
        let out = frame.zip_map(&self.mean, |v, m| {
            if (v.to_f64() - m.to_f64()).abs() < threshold {
                <S::Pixel as Default>::default()
            } else {
                v
            }
        });
        Ok(out.unwrap_or(frame))
    }
}
