//! Reader and writer for Electron ASAR archives
//!
#![allow(clippy::return_self_not_must_use)] // Builder patterns
#![allow(clippy::use_self)] // Type clarity
//! An ASAR archive is a single file holding a directory tree: two Chromium
//! pickle frames carrying a JSON header, followed by the raw concatenated
//! content of every file.
//!
//! # Components
//!
//! - **Pickle**: size and header frame encoding in [`pickle`]
//! - **Entry tree**: [`Entry`], [`FileEntry`], [`DirectoryEntry`] with path
//!   resolution and lazy traversal
//! - **Archive**: [`Archive::decode`] and [`Archive::encode`]
//! - **Sync**: [`Archive::from_directory`] and [`Archive::extract_to_directory`]
//!
//! # Design Principles
//!
//! - **Zero-Copy Decoding**: decoded file content borrows from the input buffer
//! - **Bit-Exact Layout**: offsets derive from pickle constants, never literals
//! - **Non-Mutating Encode**: encoding reads the tree and returns new bytes
//!
//! # Examples
//!
//! ```
//! use fast_asar_formats::{Archive, DecodeOptions, EncodeOptions, WriteOptions};
//!
//! let mut archive = Archive::new();
//! archive.write_file("index.js", b"console.log(1)".to_vec(), &WriteOptions::default())?;
//!
//! let encoded = archive.encode(&EncodeOptions::default())?;
//! let decoded = Archive::decode(&encoded.bytes, &DecodeOptions::default())?;
//! assert_eq!(decoded.read_file("index.js")?, b"console.log(1)");
//! # Ok::<(), fast_asar_formats::AsarError>(())
//! ```

#![warn(missing_docs)]

pub mod archive;
pub mod entry;
pub mod error;
pub mod pickle;
pub mod sync;

pub use archive::{
    Archive, ArchiveState, DecodeOptions, EncodeOptions, EncodedArchive, ParseMetadata,
    parse_header,
};
pub use entry::{DirectoryEntry, Entry, FileEntry, Walk, WalkItem, WriteOptions};
pub use error::{AsarError, Result};
pub use sync::PackOptions;

// Re-export the integrity record carried by file entries
pub use fast_asar_crypto::{BLOCK_SIZE, Integrity};
