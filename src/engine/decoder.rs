//! Whole-file audio decoding
//!
//! Opens a file through a codec backend, reads every declared frame into
//! an interleaved `i32` buffer and closes the handle again. The read
//! blocks until the full file is in memory.

use std::path::Path;

use log::{debug, info};

use crate::backend::{self, AudioFileHandle, BackendKind, CodecBackend, StreamInfo};
use crate::engine::buffer::RawSampleBuffer;
use crate::error::{DecodeError, Result};

/// Upper bound on samples reserved before any are read (4 MiB of `i32`)
///
/// Headers are untrusted; the buffer grows past this as frames arrive.
const MAX_PREALLOC_SAMPLES: usize = 1 << 20;

/// Decoder configuration
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DecoderConfig {
    /// Backend selection (default: sniff the header)
    pub backend: BackendKind,
}

impl DecoderConfig {
    pub fn new(backend: BackendKind) -> Self {
        DecoderConfig { backend }
    }

    /// Only accept WAV files, through hound
    pub fn wav_only() -> Self {
        DecoderConfig {
            backend: BackendKind::Wav,
        }
    }

    /// Route everything through symphonia's probe
    pub fn probe_only() -> Self {
        DecoderConfig {
            backend: BackendKind::Probe,
        }
    }
}

/// Interleaved samples plus the format they were read with
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedAudio {
    pub samples: RawSampleBuffer,
    pub info: StreamInfo,
    /// Name of the backend that produced the samples
    pub backend: &'static str,
}

enum Source {
    Kind(BackendKind),
    Custom(Box<dyn CodecBackend>),
}

/// Reads whole audio files into interleaved sample buffers
pub struct AudioDecoder {
    source: Source,
}

impl AudioDecoder {
    pub fn new(config: DecoderConfig) -> Self {
        AudioDecoder {
            source: Source::Kind(config.backend),
        }
    }

    /// Decode through a caller-supplied backend
    pub fn with_backend(backend: Box<dyn CodecBackend>) -> Self {
        AudioDecoder {
            source: Source::Custom(backend),
        }
    }

    /// Format metadata only; no samples are read
    pub fn probe(&self, path: &Path) -> Result<(StreamInfo, &'static str)> {
        if !backend::is_initialized() {
            return Err(DecodeError::NotInitialized);
        }
        let (handle, name) = self.open(path)?;
        let info = handle.info();
        Ok((info, name))
    }

    /// Read every frame of `path`
    ///
    /// # Errors
    /// * `NotInitialized` - `backend_init()` has not been called
    /// * `Open` - missing, unreadable or unsupported file
    /// * `InvalidFormat` - header declares zero channels or sample rate
    /// * `ShortRead` - fewer frames delivered than the header declares
    /// * `EmptyResult` - the file holds no frames
    pub fn open_and_read(&self, path: &Path) -> Result<DecodedAudio> {
        if !backend::is_initialized() {
            return Err(DecodeError::NotInitialized);
        }

        // Dropping the handle closes it, whichever return below is taken
        let (mut handle, name) = self.open(path)?;
        let info = handle.info();

        info!(
            "channels {}, sample rate {}, frames {}",
            info.channels, info.sample_rate, info.frames
        );
        info.validate()?;

        // validate() guarantees total_samples() is Some
        let declared = info.total_samples().unwrap_or(0);
        let mut samples = RawSampleBuffer::with_capacity(declared.min(MAX_PREALLOC_SAMPLES));

        let delivered = handle.read_frames(info.frames, &mut samples)?;
        if delivered < info.frames {
            return Err(DecodeError::ShortRead {
                expected: info.frames,
                actual: delivered,
            });
        }
        if delivered == 0 {
            return Err(DecodeError::EmptyResult);
        }

        debug!("Read {} frames from {}", delivered, path.display());

        Ok(DecodedAudio {
            samples,
            info,
            backend: name,
        })
    }

    fn open(&self, path: &Path) -> Result<(Box<dyn AudioFileHandle>, &'static str)> {
        match &self.source {
            Source::Custom(backend) => Ok((backend.open(path)?, backend.name())),
            Source::Kind(kind) => {
                let backend = kind.select(path)?;
                debug!("Opening {} with {} backend", path.display(), backend.name());
                Ok((backend.open(path)?, backend.name()))
            }
        }
    }
}

impl Default for AudioDecoder {
    fn default() -> Self {
        Self::new(DecoderConfig::default())
    }
}

impl std::fmt::Debug for AudioDecoder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let source = match &self.source {
            Source::Kind(kind) => format!("{:?}", kind),
            Source::Custom(backend) => backend.name().to_string(),
        };
        f.debug_struct("AudioDecoder").field("backend", &source).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    /// In-memory backend that can under-deliver and counts closed handles
    struct MockBackend {
        info: StreamInfo,
        samples: Vec<i32>,
        closed: Arc<AtomicUsize>,
    }

    struct MockHandle {
        info: StreamInfo,
        samples: Vec<i32>,
        closed: Arc<AtomicUsize>,
    }

    impl CodecBackend for MockBackend {
        fn name(&self) -> &'static str {
            "mock"
        }

        fn open(&self, _path: &Path) -> Result<Box<dyn AudioFileHandle>> {
            Ok(Box::new(MockHandle {
                info: self.info,
                samples: self.samples.clone(),
                closed: Arc::clone(&self.closed),
            }))
        }
    }

    impl AudioFileHandle for MockHandle {
        fn info(&self) -> StreamInfo {
            self.info
        }

        fn read_frames(&mut self, frames: u64, out: &mut RawSampleBuffer) -> Result<u64> {
            let channels = self.info.channels;
            let available = (self.samples.len() / channels) as u64;
            let n = available.min(frames) as usize;
            out.extend_from_slice(&self.samples[..n * channels]);
            Ok(n as u64)
        }
    }

    impl Drop for MockHandle {
        fn drop(&mut self) {
            self.closed.fetch_add(1, Ordering::SeqCst);
        }
    }

    fn mock(channels: usize, frames: u64, samples: Vec<i32>) -> (AudioDecoder, Arc<AtomicUsize>) {
        let closed = Arc::new(AtomicUsize::new(0));
        let backend = MockBackend {
            info: StreamInfo {
                channels,
                frames,
                sample_rate: 44100,
            },
            samples,
            closed: Arc::clone(&closed),
        };
        (AudioDecoder::with_backend(Box::new(backend)), closed)
    }

    #[test]
    fn test_reads_declared_frames() {
        backend::backend_init();
        let (decoder, closed) = mock(2, 3, vec![10, 20, 11, 21, 12, 22]);

        let decoded = decoder.open_and_read(Path::new("mock")).unwrap();
        assert_eq!(decoded.samples.as_slice(), &[10, 20, 11, 21, 12, 22]);
        assert_eq!(decoded.info.frames, 3);
        assert_eq!(decoded.backend, "mock");
        assert_eq!(closed.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_short_read_closes_handle() {
        backend::backend_init();
        let (decoder, closed) = mock(2, 5, vec![1, 2, 3, 4]);

        let err = decoder.open_and_read(Path::new("mock")).unwrap_err();
        match err {
            DecodeError::ShortRead { expected, actual } => {
                assert_eq!(expected, 5);
                assert_eq!(actual, 2);
            }
            other => panic!("unexpected error: {other}"),
        }
        assert_eq!(closed.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_oversized_header_does_not_preallocate() {
        backend::backend_init();
        let (decoder, closed) = mock(2, u64::from(u32::MAX), vec![1, 2, 3, 4]);

        let err = decoder.open_and_read(Path::new("mock")).unwrap_err();
        match err {
            DecodeError::ShortRead { expected, actual } => {
                assert_eq!(expected, u64::from(u32::MAX));
                assert_eq!(actual, 2);
            }
            other => panic!("unexpected error: {other}"),
        }
        assert_eq!(closed.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_zero_frames_is_empty_result() {
        backend::backend_init();
        let (decoder, closed) = mock(1, 0, vec![]);

        let err = decoder.open_and_read(Path::new("mock")).unwrap_err();
        assert_eq!(err.error_code(), "EMPTY_RESULT");
        assert_eq!(closed.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_invalid_header_closes_handle() {
        backend::backend_init();
        let (decoder, closed) = mock(0, 4, vec![]);

        let err = decoder.open_and_read(Path::new("mock")).unwrap_err();
        assert_eq!(err.error_code(), "INVALID_FORMAT");
        assert_eq!(closed.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_probe_reads_no_samples() {
        backend::backend_init();
        let (decoder, closed) = mock(2, 3, vec![10, 20, 11, 21, 12, 22]);
        let (info, name) = decoder.probe(Path::new("mock")).unwrap();
        assert_eq!(info.channels, 2);
        assert_eq!(name, "mock");
        assert_eq!(closed.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_config_presets() {
        assert_eq!(DecoderConfig::default().backend, BackendKind::Auto);
        assert_eq!(DecoderConfig::wav_only().backend, BackendKind::Wav);
        assert_eq!(DecoderConfig::probe_only().backend, BackendKind::Probe);
    }
}
