use rodfit_core::{Frame, FrameError, FrameSource};

/// Widens any source's samples to `f64`.
///
/// Lets pipelines with different stage pixel types share one boxed output type.
#[derive(Clone, Debug)]
pub struct AsF64<S> {
    source: S,
}

impl<S: FrameSource> AsF64<S> {
    pub fn new(source: S) -> Self {
        Self { source }
    }

    pub fn into_inner(self) -> S {
        self.source
    }
}

impl<S: FrameSource> FrameSource for AsF64<S> {
    type Pixel = f64;

    fn len(&self) -> usize {
        self.source.len()
    }

    fn get(&self, index: usize) -> Result<Frame<f64>, FrameError> {
        Ok(self.source.get(index)?.to_f64())
    }
}
