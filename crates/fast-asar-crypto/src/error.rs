//! Error types for integrity operations

use thiserror::Error;

/// Errors that can occur while computing or checking integrity records
#[derive(Debug, Error, PartialEq, Eq)]
pub enum IntegrityError {
    /// Content was required but not available
    #[error("content is required to compute integrity but none was provided")]
    MissingContent,

    /// Recorded block size cannot be used to split content
    #[error("invalid integrity block size: {0}")]
    InvalidBlockSize(u32),

    /// Whole-content hash does not match
    #[error("content hash mismatch: expected {expected}, got {actual}")]
    HashMismatch {
        /// Hash recorded in the integrity record
        expected: String,
        /// Hash computed from the content
        actual: String,
    },

    /// Number of blocks does not match
    #[error("block count mismatch: expected {expected}, got {actual}")]
    BlockCountMismatch {
        /// Block count recorded in the integrity record
        expected: usize,
        /// Block count derived from the content length
        actual: usize,
    },

    /// A single block hash does not match
    #[error("block {index} hash mismatch: expected {expected}, got {actual}")]
    BlockMismatch {
        /// Zero-based block index
        index: usize,
        /// Hash recorded in the integrity record
        expected: String,
        /// Hash computed from the block
        actual: String,
    },
}

/// Result type for integrity operations
pub type Result<T> = std::result::Result<T, IntegrityError>;
