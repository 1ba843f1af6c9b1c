//! Archive error types

use crate::pickle::PickleError;
use fast_asar_crypto::IntegrityError;
use thiserror::Error;

/// Errors raised by archive decoding, tree manipulation and encoding
#[derive(Debug, Error)]
pub enum AsarError {
    /// Size or header frame is malformed or truncated
    #[error("framing error: {0}")]
    Framing(#[from] PickleError),

    /// Header JSON is not a directory-shaped object
    #[error("invalid header: {0}")]
    InvalidHeader(String),

    /// Path resolution failed
    #[error("path not found: {0}")]
    NotFound(String),

    /// Entry at path is a directory where a file was required
    #[error("not a file: {0}")]
    NotAFile(String),

    /// Entry at path is a file where a directory was required
    #[error("not a directory: {0}")]
    NotADirectory(String),

    /// File slice lies outside the archive buffer
    #[error(
        "file {path} at offset {offset} with size {size} exceeds archive data region of {available} bytes"
    )]
    OffsetOutOfRange {
        /// File path
        path: String,
        /// Offset relative to the data region
        offset: u64,
        /// Recorded size
        size: u64,
        /// Bytes available in the data region
        available: usize,
    },

    /// Recorded size differs from attached content length
    #[error("content length mismatch for {path}: header records {expected} bytes, content has {actual}")]
    ContentLengthMismatch {
        /// File path
        path: String,
        /// Size recorded in the entry
        expected: u64,
        /// Length of the attached content
        actual: u64,
    },

    /// Content was required but is not attached
    #[error("missing content for {0}")]
    MissingContent(String),

    /// Parent directory does not exist and creation was not requested
    #[error("missing parent directory for {0}")]
    MissingParent(String),

    /// Entry name cannot be materialized on a filesystem
    #[error("unsafe entry path: {0}")]
    UnsafePath(String),

    /// Content does not match its recorded integrity
    #[error("integrity check failed for {path}: {source}")]
    Integrity {
        /// File path
        path: String,
        /// Underlying integrity failure
        source: IntegrityError,
    },

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Directory traversal error
    #[error("directory traversal error: {0}")]
    Walk(#[from] walkdir::Error),
}

/// Result type for archive operations
pub type Result<T> = std::result::Result<T, AsarError>;
