//! Named filter pipelines.

use std::fmt;
use std::str::FromStr;

use log::debug;
use rodfit_core::FrameSource;
use serde::{Deserialize, Serialize};

use crate::{
    AsF64, BlurFilter, CompressFilter, EdgeFilter, EdgeNormalization, EdgeOperator, FilterError,
    MeanMask, MeanParams, MeanSubtract, SharpenFilter, DEFAULT_COMPRESS_PASSES,
};

/// Sobel aperture used by the `blur-sobel` and `sobel-sharpen` presets.
///
/// `PipelineParams::ksize` only sizes the stage after it.
pub const PRESET_SOBEL_KSIZE: usize = 5;

/// Type-erased pipeline producing `f64` frames.
pub type BoxedSource<'a> = Box<dyn FrameSource<Pixel = f64> + 'a>;

/// Parameters consumed by [`FilterKind::build`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineParams {
    /// Kernel size for edge and blur stages (odd, `1..=31`).
    pub ksize: usize,
    /// Overrides the edge operator's default normalization.
    pub normalization: Option<EdgeNormalization>,
    pub mean: MeanParams,
    pub compress_passes: usize,
}

impl Default for PipelineParams {
    fn default() -> Self {
        Self {
            ksize: 5,
            normalization: None,
            mean: MeanParams::default(),
            compress_passes: DEFAULT_COMPRESS_PASSES,
        }
    }
}

/// Closed set of pipelines selectable by name.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FilterKind {
    Laplacian,
    LaplacianAbs,
    SobelAbs,
    Blur,
    /// Sobel magnitude, then blur.
    BlurSobel,
    MeanSub,
    MeanMask,
    /// Mean subtraction, then Laplacian.
    SubLap,
    /// Mean mask, then Sobel magnitude.
    MaskFilter,
    Compress,
    /// Sobel magnitude, blur, then log compression.
    SobelCompress,
    Sharpen,
    /// Sobel magnitude, then sharpen.
    SobelSharpen,
}

impl FilterKind {
    pub const ALL: [FilterKind; 13] = [
        FilterKind::Laplacian,
        FilterKind::LaplacianAbs,
        FilterKind::SobelAbs,
        FilterKind::Blur,
        FilterKind::BlurSobel,
        FilterKind::MeanSub,
        FilterKind::MeanMask,
        FilterKind::SubLap,
        FilterKind::MaskFilter,
        FilterKind::Compress,
        FilterKind::SobelCompress,
        FilterKind::Sharpen,
        FilterKind::SobelSharpen,
    ];

    pub fn name(self) -> &'static str {
        match self {
            FilterKind::Laplacian => "laplacian",
            FilterKind::LaplacianAbs => "laplacian-abs",
            FilterKind::SobelAbs => "sobel-abs",
            FilterKind::Blur => "blur",
            FilterKind::BlurSobel => "blur-sobel",
            FilterKind::MeanSub => "mean-sub",
            FilterKind::MeanMask => "mean-mask",
            FilterKind::SubLap => "sub-lap",
            FilterKind::MaskFilter => "mask-filter",
            FilterKind::Compress => "compress",
            FilterKind::SobelCompress => "sobel-compress",
            FilterKind::Sharpen => "sharpen",
            FilterKind::SobelSharpen => "sobel-sharpen",
        }
    }

    /// Wrap `source` in this pipeline.
    ///
    /// Mean-based kinds scan the source once here; all other stages are lazy.
    pub fn build<'a, S>(
        self,
        source: S,
        params: &PipelineParams,
    ) -> Result<BoxedSource<'a>, FilterError>
    where
        S: FrameSource + 'a,
    {
        debug!("building `{}` pipeline (ksize {})", self, params.ksize);
        let ksize = params.ksize;
        let boxed: BoxedSource<'a> = match self {
            FilterKind::Laplacian => Box::new(edge(source, EdgeOperator::Laplacian, params)?),
            FilterKind::LaplacianAbs => Box::new(edge(source, EdgeOperator::LaplacianAbs, params)?),
            FilterKind::SobelAbs => Box::new(edge(source, EdgeOperator::SobelAbs, params)?),
            FilterKind::Blur => Box::new(AsF64::new(BlurFilter::new(source, ksize)?)),
            FilterKind::BlurSobel => {
                let sobel = preset_sobel(source, params)?;
                Box::new(BlurFilter::new(sobel, ksize)?)
            }
            FilterKind::MeanSub => Box::new(AsF64::new(MeanSubtract::new(source, &params.mean)?)),
            FilterKind::MeanMask => Box::new(AsF64::new(MeanMask::new(source, &params.mean)?)),
            FilterKind::SubLap => {
                let sub = MeanSubtract::new(source, &params.mean)?;
                Box::new(edge(sub, EdgeOperator::Laplacian, params)?)
            }
            FilterKind::MaskFilter => {
                let mask = MeanMask::new(source, &params.mean)?;
                Box::new(edge(mask, EdgeOperator::SobelAbs, params)?)
            }
            FilterKind::Compress => {
                Box::new(CompressFilter::with_passes(source, params.compress_passes)?)
            }
            FilterKind::SobelCompress => {
                let sobel = edge(source, EdgeOperator::SobelAbs, params)?;
                let blurred = BlurFilter::new(sobel, ksize)?;
                Box::new(CompressFilter::with_passes(blurred, params.compress_passes)?)
            }
            FilterKind::Sharpen => Box::new(SharpenFilter::new(source)),
            FilterKind::SobelSharpen => {
                let sobel = preset_sobel(source, params)?;
                Box::new(SharpenFilter::new(sobel))
            }
        };
        Ok(boxed)
    }
}

fn edge<S: FrameSource>(
    source: S,
    operator: EdgeOperator,
    params: &PipelineParams,
) -> Result<EdgeFilter<S>, FilterError> {
    let normalization = params
        .normalization
        .unwrap_or(operator.default_normalization());
    Ok(EdgeFilter::new(source, operator, params.ksize)?.with_normalization(normalization))
}

fn preset_sobel<S: FrameSource>(
    source: S,
    params: &PipelineParams,
) -> Result<EdgeFilter<S>, FilterError> {
    let params = PipelineParams {
        ksize: PRESET_SOBEL_KSIZE,
        ..params.clone()
    };
    edge(source, EdgeOperator::SobelAbs, &params)
}

impl fmt::Display for FilterKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for FilterKind {
    type Err = FilterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        FilterKind::ALL
            .into_iter()
            .find(|kind| kind.name() == s)
            .ok_or_else(|| FilterError::UnknownKind(s.to_string()))
    }
}
