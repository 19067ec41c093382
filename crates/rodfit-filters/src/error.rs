use rodfit_core::{DegenerateInput, FrameError};

/// Errors returned while building a filter or a named pipeline.
#[derive(thiserror::Error, Debug)]
pub enum FilterError {
    #[error(transparent)]
    Degenerate(#[from] DegenerateInput),

    #[error(transparent)]
    Frame(#[from] FrameError),

    #[error("invalid kernel size {ksize} (expected an odd value in 1..={max})")]
    InvalidKernelSize { ksize: usize, max: usize },

    #[error("invalid parameter `{name}`: {reason}")]
    InvalidParameter {
        name: &'static str,
        reason: &'static str,
    },

    #[error("unknown filter kind `{0}`")]
    UnknownKind(String),
}
