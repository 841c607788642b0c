//! WAV backend built on hound
//!
//! Integer PCM only. Samples come back at their stored value (an 8-bit
//! file yields -128..=127, a 24-bit file -8388608..=8388607).

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use hound::{SampleFormat, WavReader};
use log::{debug, warn};

use crate::backend::{AudioFileHandle, CodecBackend, StreamInfo};
use crate::engine::buffer::RawSampleBuffer;
use crate::error::{DecodeError, Result};

const NAME: &str = "wav";

/// hound-based WAV reader
#[derive(Debug, Default, Clone, Copy)]
pub struct WavBackend;

impl CodecBackend for WavBackend {
    fn name(&self) -> &'static str {
        NAME
    }

    fn open(&self, path: &Path) -> Result<Box<dyn AudioFileHandle>> {
        let reader = WavReader::open(path).map_err(|e| DecodeError::open(path, NAME, e))?;
        let spec = reader.spec();

        if spec.sample_format != SampleFormat::Int {
            return Err(DecodeError::Open {
                path: path.display().to_string(),
                backend: NAME,
                reason: format!(
                    "{}-bit float WAV has no integer sample representation",
                    spec.bits_per_sample
                ),
                source: None,
            });
        }

        let info = StreamInfo {
            channels: spec.channels as usize,
            frames: u64::from(reader.duration()),
            sample_rate: spec.sample_rate,
        };
        debug!(
            "Opened WAV {} ({}-bit integer PCM)",
            path.display(),
            spec.bits_per_sample
        );

        Ok(Box::new(WavHandle { reader, info }))
    }
}

struct WavHandle {
    reader: WavReader<BufReader<File>>,
    info: StreamInfo,
}

impl AudioFileHandle for WavHandle {
    fn info(&self) -> StreamInfo {
        self.info
    }

    fn read_frames(&mut self, frames: u64, out: &mut RawSampleBuffer) -> Result<u64> {
        let channels = self.info.channels.max(1);
        let wanted = usize::try_from(frames)
            .ok()
            .and_then(|f| f.checked_mul(channels))
            .unwrap_or(usize::MAX);
        let start = out.len();

        for sample in self.reader.samples::<i32>().take(wanted) {
            match sample {
                Ok(s) => out.push(s),
                Err(e) => {
                    warn!("WAV data ended early: {}", e);
                    break;
                }
            }
        }

        // A trailing partial frame is not a frame
        let whole = (out.len() - start) / channels;
        out.truncate(start + whole * channels);
        Ok(whole as u64)
    }
}

impl Drop for WavHandle {
    fn drop(&mut self) {
        debug!("Closed WAV handle");
    }
}
