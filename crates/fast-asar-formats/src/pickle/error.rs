//! Pickle framing error types

use thiserror::Error;

/// Errors raised while encoding or decoding pickle frames
#[derive(Debug, Error)]
pub enum PickleError {
    /// Not enough bytes to hold a frame field
    #[error("truncated pickle frame: need {needed} bytes, {available} available")]
    Truncated {
        /// Bytes required
        needed: usize,
        /// Bytes present
        available: usize,
    },

    /// A declared frame length runs past the end of the buffer
    #[error("declared frame length {declared} exceeds remaining buffer of {available} bytes")]
    DeclaredLengthExceedsBuffer {
        /// Declared length in bytes
        declared: usize,
        /// Bytes present
        available: usize,
    },

    /// Payload is too small to contain the value it should hold
    #[error("pickle payload of {payload_size} bytes cannot hold a {required}-byte value")]
    PayloadTooSmall {
        /// Payload size from the pickle header
        payload_size: usize,
        /// Bytes required by the value
        required: usize,
    },

    /// String length field is negative
    #[error("negative string length in pickle: {0}")]
    NegativeStringLength(i32),

    /// String is too large to be framed
    #[error("string of {0} bytes is too large for a pickle frame")]
    StringTooLarge(usize),

    /// String payload is not valid UTF-8
    #[error("pickle string is not valid UTF-8: {0}")]
    InvalidUtf8(#[from] std::str::Utf8Error),

    /// Binary parsing error
    #[error("binary parsing error: {0}")]
    BinRw(#[from] binrw::Error),
}

/// Result type for pickle operations
pub type PickleResult<T> = Result<T, PickleError>;
