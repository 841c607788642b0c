//! The `load` entry points
//!
//! `try_load` is the tagged form. `load` and `load_with_status` never fail:
//! any decode error turns into the empty matrix, with the error logged
//! (and, for `load_with_status`, handed back next to it).

use std::path::Path;

use log::warn;

use crate::backend::StreamInfo;
use crate::engine::buffer::{Element, Real, SampleMatrix};
use crate::engine::decoder::AudioDecoder;
use crate::engine::deinterleave::SampleDeinterleaver;
use crate::error::{DecodeError, Result};

/// Outcome of a decode that always carries a usable matrix
#[derive(Debug)]
pub struct LoadResult<T = Real> {
    /// Decoded matrix, or the (0, 0) sentinel on failure
    pub matrix: SampleMatrix<T>,
    /// Format of the decoded stream, present on success
    pub info: Option<StreamInfo>,
    /// Why the decode failed, if it did
    pub error: Option<DecodeError>,
}

impl<T> LoadResult<T> {
    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }

    fn failed(error: DecodeError) -> Self {
        LoadResult {
            matrix: SampleMatrix::empty(),
            info: None,
            error: Some(error),
        }
    }
}

/// Decode `path` into a (channels, frames) matrix
pub fn try_load<T: Element>(
    decoder: &AudioDecoder,
    path: &Path,
) -> Result<(SampleMatrix<T>, StreamInfo)> {
    let decoded = decoder.open_and_read(path)?;
    let info = decoded.info;
    let frames = usize::try_from(info.frames).map_err(|_| DecodeError::InvalidFormat {
        reason: format!("{} frames does not fit in memory", info.frames),
    })?;

    let matrix = SampleDeinterleaver::convert(decoded.samples, info.channels, frames)?;
    Ok((matrix, info))
}

/// Decode `path`, reporting failure through the returned status
pub fn load_with_status<T: Element>(decoder: &AudioDecoder, path: &Path) -> LoadResult<T> {
    match try_load(decoder, path) {
        Ok((matrix, info)) => LoadResult {
            matrix,
            info: Some(info),
            error: None,
        },
        Err(err) => {
            warn!(
                "[{}] failed to load {}: {}",
                err.error_code(),
                path.display(),
                err
            );
            LoadResult::failed(err)
        }
    }
}

/// Decode `path` with the default decoder
///
/// Returns a (channels, frames) matrix on success and the empty (0, 0)
/// matrix on any failure. The backend must have been initialized with
/// [`crate::backend_init`].
pub fn load<P: AsRef<Path>>(path: P) -> SampleMatrix<Real> {
    load_with_status(&AudioDecoder::default(), path.as_ref()).matrix
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::{backend_init, AudioFileHandle, CodecBackend};
    use crate::engine::buffer::RawSampleBuffer;

    /// Declares more samples per frame than it hands out
    struct LyingBackend;
    struct LyingHandle;

    impl CodecBackend for LyingBackend {
        fn name(&self) -> &'static str {
            "lying"
        }

        fn open(&self, _path: &Path) -> Result<Box<dyn AudioFileHandle>> {
            Ok(Box::new(LyingHandle))
        }
    }

    impl AudioFileHandle for LyingHandle {
        fn info(&self) -> StreamInfo {
            StreamInfo {
                channels: 2,
                frames: 3,
                sample_rate: 8000,
            }
        }

        fn read_frames(&mut self, frames: u64, out: &mut RawSampleBuffer) -> Result<u64> {
            // Claims full frames but writes one sample short
            out.extend_from_slice(&[1, 2, 3, 4, 5]);
            Ok(frames)
        }
    }

    #[test]
    fn test_size_mismatch_becomes_empty_matrix() {
        backend_init();
        let decoder = AudioDecoder::with_backend(Box::new(LyingBackend));

        let result: LoadResult<f32> = load_with_status(&decoder, Path::new("x"));
        assert!(!result.is_ok());
        assert_eq!(result.matrix.shape(), (0, 0));
        assert!(result.info.is_none());
        assert_eq!(result.error.unwrap().error_code(), "SIZE_MISMATCH");
    }

    #[test]
    fn test_missing_file_becomes_empty_matrix() {
        backend_init();
        let m = load("/no/such/dir/no_such_file.wav");
        assert_eq!(m.shape(), (0, 0));
        assert!(m.is_empty());
    }
}
