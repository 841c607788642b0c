//! Interleaved to channel-major conversion

use log::debug;

use crate::engine::buffer::{Element, RawSampleBuffer, SampleMatrix};
use crate::error::{DecodeError, Result};

/// Converts interleaved backend samples into a channel-major matrix
#[derive(Debug, Default, Clone, Copy)]
pub struct SampleDeinterleaver;

impl SampleDeinterleaver {
    /// Transpose `raw` from [f0c0, f0c1, f1c0, ...] into shape (channels, frames)
    ///
    /// The buffer is consumed; the returned matrix is the only thing left.
    ///
    /// # Errors
    /// * `SizeMismatch` - `raw.len() != channels * frames`; nothing is copied
    pub fn convert<T: Element>(
        raw: RawSampleBuffer,
        channels: usize,
        frames: usize,
    ) -> Result<SampleMatrix<T>> {
        let expected = channels.checked_mul(frames).ok_or(DecodeError::SizeMismatch {
            expected: usize::MAX,
            actual: raw.len(),
            channels,
            frames,
        })?;
        if raw.len() != expected {
            return Err(DecodeError::SizeMismatch {
                expected,
                actual: raw.len(),
                channels,
                frames,
            });
        }

        let mut matrix = SampleMatrix::<T>::zeros(channels, frames);
        let src = raw.as_slice();
        let dst = matrix.as_mut_slice();

        for c in 0..channels {
            for f in 0..frames {
                dst[c * frames + f] = T::from_raw(src[f * channels + c]);
            }
        }

        debug!("De-interleaved {} channels x {} frames", channels, frames);
        drop(raw);

        Ok(matrix)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_two_channel_scenario() {
        let raw = RawSampleBuffer::from(vec![10, 20, 11, 21, 12, 22]);
        let m: SampleMatrix<f32> = SampleDeinterleaver::convert(raw, 2, 3).unwrap();

        assert_eq!(m.shape(), (2, 3));
        assert_eq!(m.to_channels(), vec![vec![10.0, 11.0, 12.0], vec![20.0, 21.0, 22.0]]);
    }

    #[test]
    fn test_transposition_pattern() {
        let channels = 3;
        let frames = 50;
        let raw: Vec<i32> = (0..frames)
            .flat_map(|f| (0..channels).map(move |c| (f * 100 + c) as i32))
            .collect();

        let m: SampleMatrix<f64> =
            SampleDeinterleaver::convert(RawSampleBuffer::from(raw), channels, frames).unwrap();

        for c in 0..channels {
            for f in 0..frames {
                assert_relative_eq!(m.get(c, f).unwrap(), (f * 100 + c) as f64);
            }
        }
    }

    #[test]
    fn test_mono_is_identity() {
        let raw = RawSampleBuffer::from(vec![5, -6, 7, i32::MIN, i32::MAX]);
        let m: SampleMatrix<i32> = SampleDeinterleaver::convert(raw, 1, 5).unwrap();
        assert_eq!(m.channel(0), &[5, -6, 7, i32::MIN, i32::MAX]);
    }

    #[test]
    fn test_raw_magnitudes_are_not_normalized() {
        let raw = RawSampleBuffer::from(vec![32767, -32768]);
        let m: SampleMatrix<f32> = SampleDeinterleaver::convert(raw, 2, 1).unwrap();
        assert_eq!(m.get(0, 0), Some(32767.0));
        assert_eq!(m.get(1, 0), Some(-32768.0));
    }

    #[test]
    fn test_size_mismatch_is_rejected() {
        let raw = RawSampleBuffer::from(vec![1, 2, 3, 4, 5]);
        let err = SampleDeinterleaver::convert::<f32>(raw, 2, 3).unwrap_err();
        match err {
            DecodeError::SizeMismatch {
                expected, actual, ..
            } => {
                assert_eq!(expected, 6);
                assert_eq!(actual, 5);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_oversized_buffer_is_rejected() {
        let raw = RawSampleBuffer::from(vec![0; 8]);
        assert!(SampleDeinterleaver::convert::<f32>(raw, 2, 3).is_err());
    }

    #[test]
    fn test_overflowing_shape_is_rejected() {
        let raw = RawSampleBuffer::from(vec![0; 4]);
        assert!(SampleDeinterleaver::convert::<f32>(raw, usize::MAX, 2).is_err());
    }
}
