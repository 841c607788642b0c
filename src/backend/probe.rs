//! Probing backend built on symphonia
//!
//! The container is detected from content alone, no extension hint. Decoded
//! buffers are copied out as `i32`:
//! - signed integer buffers at their decoded value
//! - unsigned integer buffers re-centred around zero
//! - float buffers through symphonia's own float to `i32` conversion

use std::fs::File;
use std::path::Path;

use log::{debug, warn};
use symphonia::core::audio::{AudioBuffer, AudioBufferRef, Signal};
use symphonia::core::codecs::{Decoder, DecoderOptions, CODEC_TYPE_NULL};
use symphonia::core::conv::IntoSample;
use symphonia::core::errors::Error as SymphoniaError;
use symphonia::core::formats::{FormatOptions, FormatReader};
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;
use symphonia::core::sample::Sample;

use crate::backend::{AudioFileHandle, CodecBackend, StreamInfo};
use crate::engine::buffer::RawSampleBuffer;
use crate::error::{DecodeError, Result};

const NAME: &str = "probe";

/// symphonia-based reader for any probed format
#[derive(Debug, Default, Clone, Copy)]
pub struct ProbeBackend;

fn undeclared(path: &Path, what: &str) -> DecodeError {
    DecodeError::Open {
        path: path.display().to_string(),
        backend: NAME,
        reason: format!("stream does not declare its {}", what),
        source: None,
    }
}

impl CodecBackend for ProbeBackend {
    fn name(&self) -> &'static str {
        NAME
    }

    fn open(&self, path: &Path) -> Result<Box<dyn AudioFileHandle>> {
        let file = File::open(path).map_err(|e| DecodeError::open(path, NAME, e))?;
        let mss = MediaSourceStream::new(Box::new(file), Default::default());

        let probed = symphonia::default::get_probe()
            .format(
                &Hint::new(),
                mss,
                &FormatOptions::default(),
                &MetadataOptions::default(),
            )
            .map_err(|e| DecodeError::open(path, NAME, e))?;

        let format = probed.format;
        let track = format
            .tracks()
            .iter()
            .find(|t| t.codec_params.codec != CODEC_TYPE_NULL)
            .ok_or_else(|| undeclared(path, "audio track"))?;

        let track_id = track.id;
        let params = track.codec_params.clone();

        let channels = params
            .channels
            .map(|c| c.count())
            .ok_or_else(|| undeclared(path, "channel layout"))?;
        let frames = params.n_frames.ok_or_else(|| undeclared(path, "frame count"))?;
        let sample_rate = params
            .sample_rate
            .ok_or_else(|| undeclared(path, "sample rate"))?;

        let decoder = symphonia::default::get_codecs()
            .make(&params, &DecoderOptions::default())
            .map_err(|e| DecodeError::open(path, NAME, e))?;

        debug!("Probed {} (track {})", path.display(), track_id);

        Ok(Box::new(ProbeHandle {
            format,
            decoder,
            track_id,
            info: StreamInfo {
                channels,
                frames,
                sample_rate,
            },
            pending: Vec::new(),
        }))
    }
}

struct ProbeHandle {
    format: Box<dyn FormatReader>,
    decoder: Box<dyn Decoder>,
    track_id: u32,
    info: StreamInfo,
    /// Interleaved samples decoded but not yet handed out
    pending: Vec<i32>,
}

impl ProbeHandle {
    /// Decode the next packet of our track into `pending`
    ///
    /// Returns false once the stream has nothing more to give.
    fn fill_pending(&mut self) -> Result<bool> {
        loop {
            let packet = match self.format.next_packet() {
                Ok(packet) => packet,
                Err(SymphoniaError::IoError(e))
                    if e.kind() == std::io::ErrorKind::UnexpectedEof =>
                {
                    return Ok(false);
                }
                Err(e) => {
                    warn!("Stopped reading packets: {}", e);
                    return Ok(false);
                }
            };

            if packet.track_id() != self.track_id {
                continue;
            }

            match self.decoder.decode(&packet) {
                Ok(decoded) => {
                    let decoded_channels = decoded.spec().channels.count();
                    if decoded_channels != self.info.channels {
                        return Err(DecodeError::InvalidFormat {
                            reason: format!(
                                "packet has {} channels, header declares {}",
                                decoded_channels, self.info.channels
                            ),
                        });
                    }
                    append_interleaved(decoded, &mut self.pending);
                    return Ok(true);
                }
                Err(SymphoniaError::DecodeError(e)) => {
                    warn!("Skipping undecodable packet: {}", e);
                }
                Err(e) => {
                    warn!("Decoder failed: {}", e);
                    return Ok(false);
                }
            }
        }
    }
}

impl AudioFileHandle for ProbeHandle {
    fn info(&self) -> StreamInfo {
        self.info
    }

    fn read_frames(&mut self, frames: u64, out: &mut RawSampleBuffer) -> Result<u64> {
        let channels = self.info.channels.max(1);
        let mut delivered = 0u64;

        while delivered < frames {
            if self.pending.len() < channels && !self.fill_pending()? {
                break;
            }

            let available = (self.pending.len() / channels) as u64;
            let take = available.min(frames - delivered) as usize;
            out.extend_from_slice(&self.pending[..take * channels]);
            self.pending.drain(..take * channels);
            delivered += take as u64;
        }

        Ok(delivered)
    }
}

impl Drop for ProbeHandle {
    fn drop(&mut self) {
        debug!("Closed probe handle (track {})", self.track_id);
    }
}

fn append_interleaved(decoded: AudioBufferRef<'_>, out: &mut Vec<i32>) {
    match decoded {
        AudioBufferRef::U8(buf) => interleave(&*buf, out, |s| i32::from(s) - 0x80),
        AudioBufferRef::U16(buf) => interleave(&*buf, out, |s| i32::from(s) - 0x8000),
        AudioBufferRef::U24(buf) => interleave(&*buf, out, |s| s.inner() as i32 - 0x80_0000),
        AudioBufferRef::U32(buf) => {
            interleave(&*buf, out, |s| (i64::from(s) - 0x8000_0000) as i32)
        }
        AudioBufferRef::S8(buf) => interleave(&*buf, out, i32::from),
        AudioBufferRef::S16(buf) => interleave(&*buf, out, i32::from),
        AudioBufferRef::S24(buf) => interleave(&*buf, out, |s| s.inner()),
        AudioBufferRef::S32(buf) => interleave(&*buf, out, |s| s),
        AudioBufferRef::F32(buf) => interleave(&*buf, out, |s| s.into_sample()),
        AudioBufferRef::F64(buf) => interleave(&*buf, out, |s| s.into_sample()),
    }
}

fn interleave<S, F>(buf: &AudioBuffer<S>, out: &mut Vec<i32>, cast: F)
where
    S: Sample,
    F: Fn(S) -> i32,
{
    let channels = buf.spec().channels.count();
    let frames = buf.frames();
    out.reserve(frames * channels);

    for f in 0..frames {
        for c in 0..channels {
            out.push(cast(buf.chan(c)[f]));
        }
    }
}
