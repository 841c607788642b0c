//! Error handling for audioload
//!
//! Every decode failure is recoverable: `load` turns it into an empty
//! matrix. Only backend initialization failure is fatal.

use thiserror::Error;

/// Result type alias for decode operations
pub type Result<T> = std::result::Result<T, DecodeError>;

/// Decode failure kinds
#[derive(Error, Debug)]
pub enum DecodeError {
    /// File missing, unreadable, or not recognized by the backend
    #[error("Cannot open '{path}' with {backend} backend: {reason}")]
    Open {
        path: String,
        backend: &'static str,
        reason: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Header metadata that cannot describe a decodable stream
    #[error("Invalid stream format: {reason}")]
    InvalidFormat { reason: String },

    /// Backend delivered fewer frames than the header declares
    #[error("Short read: header declares {expected} frames, backend delivered {actual}")]
    ShortRead { expected: u64, actual: u64 },

    /// Interleaved buffer length does not equal frames * channels
    #[error("Sample buffer holds {actual} samples, expected {expected} ({channels} channels x {frames} frames)")]
    SizeMismatch {
        expected: usize,
        actual: usize,
        channels: usize,
        frames: usize,
    },

    #[error("Decode produced no frames")]
    EmptyResult,

    #[error("Codec backend is not initialized; call backend_init() first")]
    NotInitialized,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl DecodeError {
    /// Build an `Open` error from any backend error type
    pub fn open<E>(path: &std::path::Path, backend: &'static str, err: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        DecodeError::Open {
            path: path.display().to_string(),
            backend,
            reason: err.to_string(),
            source: Some(Box::new(err)),
        }
    }

    /// Get the error code for this error type
    pub fn error_code(&self) -> &'static str {
        match self {
            DecodeError::Open { .. } => "OPEN_ERROR",
            DecodeError::InvalidFormat { .. } => "INVALID_FORMAT",
            DecodeError::ShortRead { .. } => "SHORT_READ",
            DecodeError::SizeMismatch { .. } => "SIZE_MISMATCH",
            DecodeError::EmptyResult => "EMPTY_RESULT",
            DecodeError::NotInitialized => "NOT_INITIALIZED",
            DecodeError::Io(_) => "IO_ERROR",
        }
    }

    /// Check if retrying with a different input could succeed
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, DecodeError::NotInitialized)
    }

    /// Get recovery suggestions for this error
    pub fn recovery_suggestions(&self) -> Vec<&'static str> {
        match self {
            DecodeError::Open { .. } => vec![
                "Check the file path is correct",
                "Check if the file plays in another application",
                "Try forcing the probe backend for non-WAV formats",
            ],
            DecodeError::ShortRead { .. } => vec![
                "The file is probably truncated - try re-exporting from source",
                "The header frame count may be wrong; re-encode the file",
            ],
            DecodeError::EmptyResult => vec!["The file contains no audio frames"],
            DecodeError::NotInitialized => {
                vec!["Call audioload::backend_init() before the first decode"]
            }
            _ => vec![],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    #[test]
    fn test_error_codes() {
        let err = DecodeError::ShortRead {
            expected: 10,
            actual: 4,
        };
        assert_eq!(err.error_code(), "SHORT_READ");
        assert!(err.to_string().contains("10 frames"));
    }

    #[test]
    fn test_open_keeps_backend_reason() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "no such file");
        let err = DecodeError::open(Path::new("missing.wav"), "wav", io);
        assert_eq!(err.error_code(), "OPEN_ERROR");
        assert!(err.to_string().contains("missing.wav"));
        assert!(err.to_string().contains("no such file"));
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn test_recovery_suggestions() {
        assert!(!DecodeError::EmptyResult.recovery_suggestions().is_empty());
        assert!(DecodeError::EmptyResult.is_recoverable());
        assert!(!DecodeError::NotInitialized.is_recoverable());
    }
}
