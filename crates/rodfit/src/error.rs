use rodfit_core::FrameError;
use rodfit_filters::FilterError;
use rodfit_shape::FitError;

/// Errors produced by the high-level facade helpers.
#[derive(thiserror::Error, Debug)]
pub enum RodfitError {
    #[error(transparent)]
    Frame(#[from] FrameError),

    #[error(transparent)]
    Filter(#[from] FilterError),

    #[error(transparent)]
    Fit(#[from] FitError),

    #[cfg(feature = "image")]
    #[error(transparent)]
    Io(#[from] crate::io::IoError),
}
