//! CLI Command Implementations

use std::path::Path;

use anyhow::{bail, Context, Result};
use log::info;
use serde::Serialize;

use crate::backend::{BackendKind, StreamInfo};
use crate::engine::{load_with_status, AudioDecoder, DecoderConfig, Real, SampleMatrix};

/// JSON view of `info`
#[derive(Debug, Serialize)]
struct InfoReport<'a> {
    path: String,
    backend: &'a str,
    #[serde(flatten)]
    stream: StreamInfo,
    duration_secs: f64,
}

/// JSON view of a decoded matrix
#[derive(Debug, Serialize)]
pub struct MatrixSummary {
    pub channels: usize,
    pub frames: usize,
    pub sample_rate: Option<u32>,
    /// Leading samples of each printed channel
    pub head: Vec<Vec<Real>>,
}

impl MatrixSummary {
    pub fn new(
        matrix: &SampleMatrix<Real>,
        sample_rate: Option<u32>,
        channel: Option<usize>,
        limit: usize,
    ) -> Self {
        let head = matrix
            .channels()
            .enumerate()
            .filter(|(c, _)| channel.map_or(true, |wanted| wanted == *c))
            .map(|(_, samples)| samples.iter().take(limit).copied().collect())
            .collect();

        MatrixSummary {
            channels: matrix.num_channels(),
            frames: matrix.num_frames(),
            sample_rate,
            head,
        }
    }
}

/// Print stream format without decoding samples.
pub fn info(path: &Path, backend: BackendKind, json: bool) -> Result<()> {
    info!("Inspecting: {}", path.display());

    let decoder = AudioDecoder::new(DecoderConfig::new(backend));
    let (stream, name) = decoder
        .probe(path)
        .with_context(|| format!("Failed to inspect {}", path.display()))?;
    let duration_secs = stream.frames as f64 / f64::from(stream.sample_rate.max(1));

    if json {
        let report = InfoReport {
            path: path.display().to_string(),
            backend: name,
            stream,
            duration_secs,
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("File: {}", path.display());
        println!("Backend: {}", name);
        println!("Channels: {}", stream.channels);
        println!("Sample rate: {} Hz", stream.sample_rate);
        println!("Frames: {} ({:.3}s)", stream.frames, duration_secs);
    }

    Ok(())
}

/// Decode a file and print its matrix.
pub fn load(
    path: &Path,
    backend: BackendKind,
    channel: Option<usize>,
    limit: usize,
    json: bool,
) -> Result<()> {
    info!("Decoding: {}", path.display());

    let decoder = AudioDecoder::new(DecoderConfig::new(backend));
    let result = load_with_status::<Real>(&decoder, path);

    if let Some(err) = &result.error {
        for suggestion in err.recovery_suggestions() {
            println!("  - {}", suggestion);
        }
        bail!("Failed to decode {}: {}", path.display(), err);
    }

    if let Some(c) = channel {
        if c >= result.matrix.num_channels() {
            bail!(
                "Channel {} out of range ({} channels)",
                c,
                result.matrix.num_channels()
            );
        }
    }

    let summary = MatrixSummary::new(
        &result.matrix,
        result.info.map(|i| i.sample_rate),
        channel,
        limit,
    );

    if json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        println!("Shape: ({}, {})", summary.channels, summary.frames);
        let first = channel.unwrap_or(0);
        for (i, head) in summary.head.iter().enumerate() {
            println!("ch{}: {:?}", first + i, head);
        }
    }

    Ok(())
}
