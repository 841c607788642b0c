//! audioload - decode audio files into channel-major sample matrices
//!
//! A decode runs in two steps:
//! 1. [`AudioDecoder`] opens the file through a codec backend and reads
//!    every frame into an interleaved `i32` buffer
//! 2. [`SampleDeinterleaver`] casts the samples and transposes them into a
//!    (channels, frames) [`SampleMatrix`]
//!
//! Sample values are copied as the backend read them, never normalized.
//!
//! ```no_run
//! audioload::backend_init();
//! let m = audioload::load("drums.wav");
//! if m.is_empty() {
//!     eprintln!("decode failed");
//! } else {
//!     let (channels, frames) = m.shape();
//!     println!("{} x {}", channels, frames);
//! }
//! audioload::backend_shutdown();
//! ```

pub mod backend;
pub mod cli;
pub mod engine;
pub mod error;

pub use backend::{
    backend_init, backend_shutdown, AudioFileHandle, BackendGuard, BackendKind, CodecBackend,
    StreamInfo,
};
pub use engine::{
    load, load_with_status, try_load, AudioDecoder, DecoderConfig, Element, LoadResult,
    RawSampleBuffer, Real, SampleDeinterleaver, SampleMatrix,
};
pub use error::{DecodeError, Result};
