//! Decode Engine Module
//!
//! - Sample storage types
//! - Whole-file decoding through a codec backend
//! - De-interleaving into channel-major matrices
//! - The `load` entry points tying them together

pub mod buffer;
pub mod decoder;
pub mod deinterleave;
pub mod load;

pub use buffer::{Element, RawSampleBuffer, Real, SampleMatrix};
pub use decoder::{AudioDecoder, DecodedAudio, DecoderConfig};
pub use deinterleave::SampleDeinterleaver;
pub use load::{load, load_with_status, try_load, LoadResult};
