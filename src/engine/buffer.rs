//! Sample storage types
//!
//! `RawSampleBuffer` holds backend-native interleaved samples,
//! `SampleMatrix` holds the channel-major result handed to callers.

use num_traits::AsPrimitive;

// ============================================================================
// Element type
// ============================================================================

/// Element type of matrices returned by `load` (f32 by default)
#[cfg(not(feature = "f64-samples"))]
pub type Real = f32;

/// Element type of matrices returned by `load`
#[cfg(feature = "f64-samples")]
pub type Real = f64;

/// Numeric types a backend-native `i32` sample can be cast into
///
/// The cast is a plain value copy with `as` semantics. Magnitudes are kept
/// exactly as the backend read them; nothing is normalized.
pub trait Element: Copy + Default + 'static {
    fn from_raw(raw: i32) -> Self;
}

impl<T> Element for T
where
    T: Copy + Default + 'static,
    i32: AsPrimitive<T>,
{
    #[inline]
    fn from_raw(raw: i32) -> Self {
        raw.as_()
    }
}

// ============================================================================
// Raw interleaved buffer
// ============================================================================

/// Interleaved backend-native samples: frame 0 ch 0, frame 0 ch 1, ...
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawSampleBuffer {
    samples: Vec<i32>,
}

impl RawSampleBuffer {
    /// Create an empty buffer with room for `frames * channels` samples
    pub fn with_capacity(capacity: usize) -> Self {
        RawSampleBuffer {
            samples: Vec::with_capacity(capacity),
        }
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn as_slice(&self) -> &[i32] {
        &self.samples
    }

    pub fn push(&mut self, sample: i32) {
        self.samples.push(sample);
    }

    pub fn extend_from_slice(&mut self, samples: &[i32]) {
        self.samples.extend_from_slice(samples);
    }

    /// Drop trailing samples so the buffer holds exactly `len` samples
    pub fn truncate(&mut self, len: usize) {
        self.samples.truncate(len);
    }

    pub fn into_inner(self) -> Vec<i32> {
        self.samples
    }
}

impl From<Vec<i32>> for RawSampleBuffer {
    fn from(samples: Vec<i32>) -> Self {
        RawSampleBuffer { samples }
    }
}

// ============================================================================
// Sample matrix
// ============================================================================

/// Contiguous channel-major sample matrix of shape (channels, frames)
///
/// All samples of channel 0 precede all samples of channel 1, and so on.
/// A failed decode yields the empty matrix of shape (0, 0).
#[derive(Debug, Clone, PartialEq)]
pub struct SampleMatrix<T = Real> {
    data: Vec<T>,
    channels: usize,
    frames: usize,
}

impl<T> SampleMatrix<T> {
    /// The (0, 0) matrix returned on every failure path
    pub fn empty() -> Self {
        SampleMatrix {
            data: Vec::new(),
            channels: 0,
            frames: 0,
        }
    }

    /// Shape as (channels, frames)
    pub fn shape(&self) -> (usize, usize) {
        (self.channels, self.frames)
    }

    pub fn num_channels(&self) -> usize {
        self.channels
    }

    pub fn num_frames(&self) -> usize {
        self.frames
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// All samples of one channel
    ///
    /// # Panics
    /// Panics if `channel >= num_channels()`.
    pub fn channel(&self, channel: usize) -> &[T] {
        assert!(
            channel < self.channels,
            "channel {} out of range for {} channels",
            channel,
            self.channels
        );
        let start = channel * self.frames;
        &self.data[start..start + self.frames]
    }

    pub fn channel_mut(&mut self, channel: usize) -> &mut [T] {
        assert!(
            channel < self.channels,
            "channel {} out of range for {} channels",
            channel,
            self.channels
        );
        let start = channel * self.frames;
        &mut self.data[start..start + self.frames]
    }

    /// Iterate over channels in order
    pub fn channels(&self) -> impl Iterator<Item = &[T]> {
        (0..self.channels).map(move |c| self.channel(c))
    }

    /// Contiguous channel-major storage
    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    pub fn as_mut_slice(&mut self) -> &mut [T] {
        &mut self.data
    }
}

impl<T: Copy> SampleMatrix<T> {
    pub fn get(&self, channel: usize, frame: usize) -> Option<T> {
        if channel >= self.channels || frame >= self.frames {
            return None;
        }
        Some(self.data[channel * self.frames + frame])
    }

    /// Copy out as one `Vec` per channel
    pub fn to_channels(&self) -> Vec<Vec<T>> {
        self.channels().map(|c| c.to_vec()).collect()
    }
}

impl<T: Copy + Default> SampleMatrix<T> {
    /// Allocate a zero-filled matrix of the given shape
    pub fn zeros(channels: usize, frames: usize) -> Self {
        SampleMatrix {
            data: vec![T::default(); channels * frames],
            channels,
            frames,
        }
    }
}

impl<T> Default for SampleMatrix<T> {
    fn default() -> Self {
        Self::empty()
    }
}

// ============================================================================
// Tests
// ============================================================================
