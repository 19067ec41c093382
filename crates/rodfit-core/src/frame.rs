use std::fmt::Debug;

use crate::FrameError;

/// Numeric sample type stored in a [`Frame`].
///
/// Integer types saturate: `from_f64` rounds and clamps into range and
/// `saturating_sub` stops at zero. Float types convert and subtract plainly.
pub trait Pixel: Copy + Default + PartialOrd + Debug + Send + Sync + 'static {
    fn to_f64(self) -> f64;
    fn from_f64(v: f64) -> Self;
    fn saturating_sub(self, rhs: Self) -> Self;
}

impl Pixel for u8 {
    #[inline]
    fn to_f64(self) -> f64 {
        self as f64
    }

    #[inline]
    fn from_f64(v: f64) -> Self {
        v.round().clamp(0.0, u8::MAX as f64) as u8
    }

    #[inline]
    fn saturating_sub(self, rhs: Self) -> Self {
        u8::saturating_sub(self, rhs)
    }
}

impl Pixel for u16 {
    #[inline]
    fn to_f64(self) -> f64 {
        self as f64
    }

    #[inline]
    fn from_f64(v: f64) -> Self {
        v.round().clamp(0.0, u16::MAX as f64) as u16
    }

    #[inline]
    fn saturating_sub(self, rhs: Self) -> Self {
        u16::saturating_sub(self, rhs)
    }
}

impl Pixel for f32 {
    #[inline]
    fn to_f64(self) -> f64 {
        self as f64
    }

    #[inline]
    fn from_f64(v: f64) -> Self {
        v as f32
    }

    #[inline]
    fn saturating_sub(self, rhs: Self) -> Self {
        self - rhs
    }
}

impl Pixel for f64 {
    #[inline]
    fn to_f64(self) -> f64 {
        self
    }

    #[inline]
    fn from_f64(v: f64) -> Self {
        v
    }

    #[inline]
    fn saturating_sub(self, rhs: Self) -> Self {
        self - rhs
    }
}

/// Owned raster frame, row-major with interleaved channels.
///
/// Sample `(x, y, c)` lives at `data[(y * width + x) * channels + c]`.
#[derive(Clone, Debug, PartialEq)]
pub struct Frame<T> {
    width: usize,
    height: usize,
    channels: usize,
    data: Vec<T>,
}

impl<T: Pixel> Frame<T> {
    pub fn from_vec(
        width: usize,
        height: usize,
        channels: usize,
        data: Vec<T>,
    ) -> Result<Self, FrameError> {
        if channels == 0 {
            return Err(FrameError::InvalidDimensions {
                width,
                height,
                channels,
            });
        }
        let expected = width
            .checked_mul(height)
            .and_then(|n| n.checked_mul(channels))
            .ok_or(FrameError::InvalidDimensions {
                width,
                height,
                channels,
            })?;
        if data.len() != expected {
            return Err(FrameError::SizeMismatch {
                expected,
                actual: data.len(),
            });
        }
        Ok(Self {
            width,
            height,
            channels,
            data,
        })
    }

    /// Single-channel frame from a row-major buffer.
    pub fn gray(width: usize, height: usize, data: Vec<T>) -> Result<Self, FrameError> {
        Self::from_vec(width, height, 1, data)
    }

    pub fn new_fill(width: usize, height: usize, channels: usize, value: T) -> Self {
        let channels = channels.max(1);
        Self {
            width,
            height,
            channels,
            data: vec![value; width * height * channels],
        }
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    #[inline]
    pub fn channels(&self) -> usize {
        self.channels
    }

    #[inline]
    pub fn data(&self) -> &[T] {
        &self.data
    }

    #[inline]
    pub fn data_mut(&mut self) -> &mut [T] {
        &mut self.data
    }

    pub fn into_data(self) -> Vec<T> {
        self.data
    }

    /// `(width, height, channels)`.
    #[inline]
    pub fn shape(&self) -> (usize, usize, usize) {
        (self.width, self.height, self.channels)
    }

    #[inline]
    pub fn same_shape<U>(&self, other: &Frame<U>) -> bool {
        self.width == other.width && self.height == other.height && self.channels == other.channels
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    #[inline]
    pub fn get(&self, x: usize, y: usize, c: usize) -> Option<T> {
        if x >= self.width || y >= self.height || c >= self.channels {
            return None;
        }
        Some(self.data[(y * self.width + x) * self.channels + c])
    }

    #[inline]
    pub fn set(&mut self, x: usize, y: usize, c: usize, value: T) {
        let idx = (y * self.width + x) * self.channels + c;
        self.data[idx] = value;
    }

    /// Samples of row `y`, all channels interleaved.
    pub fn row(&self, y: usize) -> &[T] {
        let stride = self.width * self.channels;
        &self.data[y * stride..(y + 1) * stride]
    }

    /// Elementwise transform into a new frame of the same shape.
    pub fn map<U: Pixel>(&self, f: impl Fn(T) -> U) -> Frame<U> {
        Frame {
            width: self.width,
            height: self.height,
            channels: self.channels,
            data: self.data.iter().map(|&v| f(v)).collect(),
        }
    }

    /// Elementwise combination of two frames of identical shape.
    ///
    /// Returns `None` when the shapes differ.
    pub fn zip_map<U: Pixel, V: Pixel>(
        &self,
        other: &Frame<U>,
        f: impl Fn(T, U) -> V,
    ) -> Option<Frame<V>> {
        if !self.same_shape(other) {
            return None;
        }
        Some(Frame {
            width: self.width,
            height: self.height,
            channels: self.channels,
            data: self
                .data
                .iter()
                .zip(&other.data)
                .map(|(&a, &b)| f(a, b))
                .collect(),
        })
    }

    pub fn to_f64(&self) -> Frame<f64> {
        self.map(Pixel::to_f64)
    }

    /// Collapse all channels into one by averaging them.
    pub fn to_gray(&self) -> Frame<f64> {
        if self.channels == 1 {
            return self.to_f64();
        }
        let n = self.channels as f64;
        let data = self
            .data
            .chunks_exact(self.channels)
            .map(|px| px.iter().map(|v| v.to_f64()).sum::<f64>() / n)
            .collect();
        Frame {
            width: self.width,
            height: self.height,
            channels: 1,
            data,
        }
    }

    /// Borrow one channel as a 2-D plane.
    pub fn plane(&self, channel: usize) -> Option<PlaneView<'_, T>> {
        (channel < self.channels).then_some(PlaneView {
            width: self.width,
            height: self.height,
            stride: self.channels,
            offset: channel,
            data: &self.data,
        })
    }

    /// Largest sample over rows `y0..height`, all channels, as `f64`.
    ///
    /// Returns `None` when the range holds no samples.
    pub fn max_from_row(&self, y0: usize) -> Option<f64> {
        let start = y0.min(self.height) * self.width * self.channels;
        self.data[start..]
            .iter()
            .map(|v| v.to_f64())
            .fold(None, |acc: Option<f64>, v| Some(acc.map_or(v, |m| m.max(v))))
    }
}

/// Borrowed single-channel view into a [`Frame`].
#[derive(Clone, Copy, Debug)]
pub struct PlaneView<'a, T> {
    width: usize,
    height: usize,
    stride: usize,
    offset: usize,
    data: &'a [T],
}

impl<'a, T: Pixel> PlaneView<'a, T> {
    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    /// Sample at `(x, y)`. Panics when out of bounds, like slice indexing.
    #[inline]
    pub fn at(&self, x: usize, y: usize) -> T {
        self.data[(y * self.width + x) * self.stride + self.offset]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_vec_validates_length_and_channels() {
        assert!(Frame::from_vec(2, 2, 1, vec![0u8; 4]).is_ok());
        assert!(matches!(
            Frame::from_vec(2, 2, 3, vec![0u8; 4]),
            Err(FrameError::SizeMismatch {
                expected: 12,
                actual: 4
            })
        ));
        assert!(matches!(
            Frame::from_vec(2, 2, 0, Vec::<u8>::new()),
            Err(FrameError::InvalidDimensions { channels: 0, .. })
        ));
    }

    #[test]
    fn integer_pixels_saturate() {
        assert_eq!(<u8 as Pixel>::saturating_sub(3, 10), 0);
        assert_eq!(<u8 as Pixel>::from_f64(300.0), 255);
        assert_eq!(<u8 as Pixel>::from_f64(-4.0), 0);
        assert_eq!(<u8 as Pixel>::from_f64(2.5), 3);
        assert_eq!(<f32 as Pixel>::saturating_sub(3.0, 10.0), -7.0);
    }

    #[test]
    fn plane_reads_interleaved_channel() {
        let frame = Frame::from_vec(2, 1, 3, vec![1u8, 2, 3, 4, 5, 6]).expect("frame");
        let green = frame.plane(1).expect("channel 1");
        assert_eq!(green.at(0, 0), 2);
        assert_eq!(green.at(1, 0), 5);
        assert!(frame.plane(3).is_none());
    }

    #[test]
    fn to_gray_averages_channels() {
        let frame = Frame::from_vec(1, 1, 3, vec![30u8, 60, 90]).expect("frame");
        let gray = frame.to_gray();
        assert_eq!(gray.channels(), 1);
        assert_eq!(gray.data(), &[60.0]);
    }

    #[test]
    fn max_from_row_skips_leading_rows() {
        let frame = Frame::gray(2, 3, vec![9.0, 1.0, 2.0, 3.0, 4.0, 0.5]).expect("frame");
        assert_eq!(frame.max_from_row(0), Some(9.0));
        assert_eq!(frame.max_from_row(1), Some(4.0));
        assert_eq!(frame.max_from_row(3), None);
    }

    #[test]
    fn zip_map_rejects_shape_mismatch() {
        let a = Frame::new_fill(2, 2, 1, 1u8);
        let b = Frame::new_fill(3, 2, 1, 1u8);
        assert!(a.zip_map(&b, |x, y| x + y).is_none());
        let c = a.zip_map(&a, |x, y| x + y).expect("same shape");
        assert_eq!(c.data(), &[2, 2, 2, 2]);
    }
}
