/// Input that would force a division by zero or a mean over nothing.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum DegenerateInput {
    #[error("frame sequence is empty")]
    EmptySequence,

    #[error("{stage}: normalization divisor is zero or not finite")]
    ZeroResponse { stage: &'static str },
}

/// Errors raised by frame construction and frame sequence access.
#[derive(thiserror::Error, Debug)]
pub enum FrameError {
    #[error("frame index {index} out of range for sequence of length {len}")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("frame buffer size mismatch: expected {expected} samples, got {actual}")]
    SizeMismatch { expected: usize, actual: usize },

    #[error("invalid frame dimensions (width={width}, height={height}, channels={channels})")]
    InvalidDimensions {
        width: usize,
        height: usize,
        channels: usize,
    },

    #[error("frame shape {actual:?} does not match expected {expected:?} (width, height, channels)")]
    ShapeMismatch {
        expected: (usize, usize, usize),
        actual: (usize, usize, usize),
    },

    #[error(transparent)]
    Degenerate(#[from] DegenerateInput),

    /// Failure inside a concrete source, e.g. decoding a file.
    #[error("failed to read frame {index}")]
    Source {
        index: usize,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}
