use crate::{Frame, FrameError, Pixel};

/// Indexable, length-queryable sequence of frames.
///
/// Every call to [`FrameSource::get`] returns a freshly owned frame; callers
/// may rely on equal content for repeated reads, never on buffer identity.
/// Filters implement this same trait by wrapping another source, so chains
/// compose as `Filter(Filter(Source))`.
pub trait FrameSource {
    type Pixel: Pixel;

    fn len(&self) -> usize;

    fn get(&self, index: usize) -> Result<Frame<Self::Pixel>, FrameError>;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// `Err(IndexOutOfRange)` unless `index < len()`.
    fn check_index(&self, index: usize) -> Result<(), FrameError> {
        let len = self.len();
        if index < len {
            Ok(())
        } else {
            Err(FrameError::IndexOutOfRange { index, len })
        }
    }
}

impl<S: FrameSource + ?Sized> FrameSource for &S {
    type Pixel = S::Pixel;

    fn len(&self) -> usize {
        (**self).len()
    }

    fn get(&self, index: usize) -> Result<Frame<Self::Pixel>, FrameError> {
        (**self).get(index)
    }
}

impl<S: FrameSource + ?Sized> FrameSource for Box<S> {
    type Pixel = S::Pixel;

    fn len(&self) -> usize {
        (**self).len()
    }

    fn get(&self, index: usize) -> Result<Frame<Self::Pixel>, FrameError> {
        (**self).get(index)
    }
}

/// In-memory frame sequence.
#[derive(Clone, Debug, Default)]
pub struct VecFrames<T> {
    frames: Vec<Frame<T>>,
}

impl<T: Pixel> VecFrames<T> {
    pub fn new(frames: Vec<Frame<T>>) -> Self {
        Self { frames }
    }

    pub fn push(&mut self, frame: Frame<T>) {
        self.frames.push(frame);
    }

    pub fn frames(&self) -> &[Frame<T>] {
        &self.frames
    }
}

impl<T: Pixel> FromIterator<Frame<T>> for VecFrames<T> {
    fn from_iter<I: IntoIterator<Item = Frame<T>>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl<T: Pixel> FrameSource for VecFrames<T> {
    type Pixel = T;

    fn len(&self) -> usize {
        self.frames.len()
    }

    fn get(&self, index: usize) -> Result<Frame<T>, FrameError> {
        self.frames
            .get(index)
            .cloned()
            .ok_or(FrameError::IndexOutOfRange {
                index,
                len: self.frames.len(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sequence(n: usize) -> VecFrames<u8> {
        (0..n).map(|i| Frame::new_fill(3, 2, 1, i as u8)).collect()
    }

    #[test]
    fn get_returns_equal_owned_copies() {
        let frames = sequence(3);
        let mut a = frames.get(1).expect("frame 1");
        let b = frames.get(1).expect("frame 1");
        assert_eq!(a, b);
        a.data_mut()[0] = 99;
        assert_eq!(frames.get(1).expect("frame 1").data()[0], 1);
    }

    #[test]
    fn out_of_range_index_is_reported() {
        let frames = sequence(2);
        assert!(matches!(
            frames.get(2),
            Err(FrameError::IndexOutOfRange { index: 2, len: 2 })
        ));
        assert!(frames.check_index(1).is_ok());
        assert!(frames.check_index(5).is_err());
    }

    #[test]
    fn references_and_boxes_are_sources() {
        let frames = sequence(4);
        let by_ref: &VecFrames<u8> = &frames;
        assert_eq!(FrameSource::len(&by_ref), 4);
        let boxed: Box<dyn FrameSource<Pixel = u8>> = Box::new(frames.clone());
        assert_eq!(boxed.len(), 4);
        assert_eq!(boxed.get(3).expect("frame 3").data()[0], 3);
    }
}
