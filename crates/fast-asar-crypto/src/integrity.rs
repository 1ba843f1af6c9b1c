//! Block-chunked integrity records
//!
//! Every file in an archive header may carry an integrity record holding the
//! SHA-256 of the whole file plus a list of SHA-256 hashes over fixed-size
//! blocks of the file. Files no larger than one block have a single block hash
//! equal to the whole-file hash. Larger files are split into
//! `ceil(len / block_size)` chunks with the final chunk possibly short.

use crate::error::{IntegrityError, Result};
use crate::sha256::{Sha256Digest, sha256_hex};

/// Default block size used when hashing file content (4 MiB)
pub const BLOCK_SIZE: u32 = 4 * 1024 * 1024;

/// Hash algorithm tag stored in integrity records
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum IntegrityAlgorithm {
    /// SHA-256, serialized as `"SHA256"`
    #[default]
    #[cfg_attr(feature = "serde", serde(rename = "SHA256"))]
    Sha256,
}

/// Integrity record for a single file
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "camelCase")
)]
pub struct Integrity {
    /// Hash algorithm
    pub algorithm: IntegrityAlgorithm,
    /// Hex digest of the whole content
    pub hash: String,
    /// Block size the content was split on
    pub block_size: u32,
    /// Hex digests of each block, in content order
    pub blocks: Vec<String>,
}

impl Integrity {
    /// Compute the integrity record for `data` using [`BLOCK_SIZE`]
    pub fn from_data(data: &[u8]) -> Self {
        Self::with_block_size(data, BLOCK_SIZE)
    }

    /// Compute the integrity record for `data` split on `block_size` bytes
    ///
    /// A `block_size` of zero is treated as "one block".
    pub fn with_block_size(data: &[u8], block_size: u32) -> Self {
        let hash = sha256_hex(data);
        let blocks = block_hashes(data, block_size, &hash);

        Self {
            algorithm: IntegrityAlgorithm::Sha256,
            hash,
            block_size,
            blocks,
        }
    }

    /// Check `data` against this record, honouring the recorded block size
    ///
    /// Recorded hashes are compared as digests, so hex case does not matter.
    pub fn verify(&self, data: &[u8]) -> Result<()> {
        if self.block_size == 0 {
            return Err(IntegrityError::InvalidBlockSize(self.block_size));
        }

        let actual = Sha256Digest::from_data(data);
        if !digest_matches(&self.hash, &actual) {
            return Err(IntegrityError::HashMismatch {
                expected: self.hash.clone(),
                actual: actual.to_hex(),
            });
        }

        let block_size = self.block_size as usize;
        let actual_blocks: Vec<Sha256Digest> = if data.len() <= block_size {
            vec![actual]
        } else {
            data.chunks(block_size).map(Sha256Digest::from_data).collect()
        };

        if actual_blocks.len() != self.blocks.len() {
            return Err(IntegrityError::BlockCountMismatch {
                expected: self.blocks.len(),
                actual: actual_blocks.len(),
            });
        }

        for (index, (expected, actual)) in self.blocks.iter().zip(&actual_blocks).enumerate() {
            if !digest_matches(expected, actual) {
                return Err(IntegrityError::BlockMismatch {
                    index,
                    expected: expected.clone(),
                    actual: actual.to_hex(),
                });
            }
        }

        Ok(())
    }

    /// Number of blocks the record describes
    pub fn block_count(&self) -> usize {
        self.blocks.len()
    }
}

/// Compute an integrity record for content that may be absent
pub fn compute_integrity(data: Option<&[u8]>) -> Result<Integrity> {
    data.map(Integrity::from_data)
        .ok_or(IntegrityError::MissingContent)
}

/// A recorded hash that is not valid hex never matches
fn digest_matches(recorded: &str, actual: &Sha256Digest) -> bool {
    Sha256Digest::from_hex(recorded).is_ok_and(|recorded| recorded == *actual)
}

fn block_hashes(data: &[u8], block_size: u32, whole_hash: &str) -> Vec<String> {
    let block_size = block_size as usize;
    if block_size == 0 || data.len() <= block_size {
        return vec![whole_hash.to_string()];
    }

    data.chunks(block_size).map(sha256_hex).collect()
}
