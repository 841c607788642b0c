//! Codec backends
//!
//! A backend opens a file and hands back an [`AudioFileHandle`] that
//! reports the stream format and reads interleaved `i32` frames. Two
//! backends ship with the crate:
//! - [`WavBackend`] - integer PCM WAV through `hound`
//! - [`ProbeBackend`] - everything `symphonia` can probe (FLAC, MP3, OGG, AIFF, ...)
//!
//! The handle is released when dropped, so every exit path of a decode
//! closes the file.

pub mod lifecycle;
pub mod probe;
pub mod wav;

use std::fs::File;
use std::io::Read;
use std::path::Path;

use serde::Serialize;

use crate::engine::buffer::RawSampleBuffer;
use crate::error::{DecodeError, Result};

pub use lifecycle::{backend_init, backend_shutdown, is_initialized, BackendGuard};
pub use probe::ProbeBackend;
pub use wav::WavBackend;

/// Format metadata discovered when a file is opened
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StreamInfo {
    /// Number of interleaved channels (> 0)
    pub channels: usize,
    /// Frames declared by the header; one frame holds one sample per channel
    pub frames: u64,
    /// Samples per second, informational only
    pub sample_rate: u32,
}

impl StreamInfo {
    /// Number of interleaved samples the declared frames occupy
    pub fn total_samples(&self) -> Option<usize> {
        usize::try_from(self.frames)
            .ok()
            .and_then(|frames| frames.checked_mul(self.channels))
    }

    /// Reject headers that cannot describe a decodable stream
    pub fn validate(&self) -> Result<()> {
        if self.channels == 0 {
            return Err(DecodeError::InvalidFormat {
                reason: "header declares zero channels".to_string(),
            });
        }
        if self.sample_rate == 0 {
            return Err(DecodeError::InvalidFormat {
                reason: "header declares a zero sample rate".to_string(),
            });
        }
        if self.total_samples().is_none() {
            return Err(DecodeError::InvalidFormat {
                reason: format!(
                    "{} frames x {} channels does not fit in memory",
                    self.frames, self.channels
                ),
            });
        }
        Ok(())
    }
}

/// An open decode session
pub trait AudioFileHandle {
    /// Format metadata read from the header
    fn info(&self) -> StreamInfo;

    /// Append up to `frames` interleaved frames to `out`
    ///
    /// Returns the number of whole frames appended. Truncated or corrupt
    /// data ends the read early instead of failing, so callers can compare
    /// the count against the header.
    fn read_frames(&mut self, frames: u64, out: &mut RawSampleBuffer) -> Result<u64>;
}

/// A codec library able to open audio files
pub trait CodecBackend: Send + Sync {
    /// Short name used in logs and errors
    fn name(&self) -> &'static str;

    /// Open `path` for reading
    fn open(&self, path: &Path) -> Result<Box<dyn AudioFileHandle>>;
}

/// Which backend a decoder uses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BackendKind {
    /// Sniff the file header: RIFF/WAVE goes to hound, anything else to symphonia
    #[default]
    Auto,
    Wav,
    Probe,
}

impl BackendKind {
    /// Resolve to a concrete backend for `path`
    pub fn select(self, path: &Path) -> Result<Box<dyn CodecBackend>> {
        match self {
            BackendKind::Wav => Ok(Box::new(WavBackend)),
            BackendKind::Probe => Ok(Box::new(ProbeBackend)),
            BackendKind::Auto => {
                let mut file = File::open(path).map_err(|e| DecodeError::open(path, "auto", e))?;
                if is_riff_wave(&mut file)? {
                    Ok(Box::new(WavBackend))
                } else {
                    Ok(Box::new(ProbeBackend))
                }
            }
        }
    }
}

impl std::str::FromStr for BackendKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "auto" => Ok(BackendKind::Auto),
            "wav" | "hound" => Ok(BackendKind::Wav),
            "probe" | "symphonia" => Ok(BackendKind::Probe),
            other => Err(format!("unknown backend '{}' (expected auto, wav or probe)", other)),
        }
    }
}

/// Check for a `RIFF....WAVE` header
fn is_riff_wave<R: Read>(reader: &mut R) -> Result<bool> {
    let mut header = [0u8; 12];
    let mut filled = 0;
    while filled < header.len() {
        match reader.read(&mut header[filled..])? {
            0 => return Ok(false),
            n => filled += n,
        }
    }
    Ok(&header[0..4] == b"RIFF" && &header[8..12] == b"WAVE")
}
