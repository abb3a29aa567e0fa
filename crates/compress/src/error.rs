// crates/compress/src/error.rs
use std::io;

use thiserror::Error;

use crate::engine::Z_STREAM_ERROR;

/// Error type for stream operations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum Error {
    #[error("failed to initialize stream (status {code}): {reason}")]
    InitializationFailed { code: i32, reason: &'static str },
    #[error("stream is already closed")]
    AlreadyClosed,
    #[error("engine failed with status {code}")]
    EngineFailure { code: i32 },
    #[error("failed to reset stream (status {code})")]
    ResetFailed { code: i32, output: Vec<u8> },
    #[error("failed to close stream (status {code})")]
    CloseFailed { code: i32, output: Vec<u8> },
}

/// Result type for stream operations.
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub(crate) fn init_failed() -> Self {
        Error::InitializationFailed {
            code: Z_STREAM_ERROR,
            reason: "compression level might be invalid",
        }
    }

    /// Engine status code carried by this error, if any.
    pub fn code(&self) -> Option<i32> {
        match self {
            Error::InitializationFailed { code, .. }
            | Error::EngineFailure { code }
            | Error::ResetFailed { code, .. }
            | Error::CloseFailed { code, .. } => Some(*code),
            Error::AlreadyClosed => None,
        }
    }

    /// Output produced before the failure. Only reset and close failures
    /// keep output; every other error yields an empty vector.
    pub fn into_output(self) -> Vec<u8> {
        match self {
            Error::ResetFailed { output, .. } | Error::CloseFailed { output, .. } => output,
            _ => Vec::new(),
        }
    }
}

impl From<Error> for io::Error {
    fn from(err: Error) -> Self {
        let kind = match err {
            Error::EngineFailure { .. } => io::ErrorKind::InvalidData,
            _ => io::ErrorKind::Other,
        };
        io::Error::new(kind, err)
    }
}
