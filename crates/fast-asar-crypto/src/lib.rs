//! Content hashing for ASAR archives
//!
//! This crate provides the hashing primitives used to build and check the
//! `integrity` records stored alongside every file in an archive header.
//!
//! # Components
//!
//! - **SHA-256**: [`Sha256Digest`] and [`sha256_hex`] for whole-content hashes
//! - **Integrity**: [`Integrity`] records with 4 MiB block-chunked hashes
//!
//! # Examples
//!
//! ```
//! use fast_asar_crypto::{Integrity, BLOCK_SIZE};
//!
//! let integrity = Integrity::from_data(b"Hello, World!");
//! assert_eq!(integrity.block_size, BLOCK_SIZE);
//! assert_eq!(integrity.blocks, vec![integrity.hash.clone()]);
//! ```

#![warn(missing_docs)]

pub mod error;
pub mod integrity;
pub mod sha256;

pub use error::IntegrityError;

// Re-export commonly used types
pub use integrity::{BLOCK_SIZE, Integrity, IntegrityAlgorithm, compute_integrity};
pub use sha256::{Sha256Digest, sha256_hex};
