//! Archive entry tree
//!
//! The header of an archive is a JSON tree of directories and files. A
//! directory is an object with a `files` map; a file is an object with a
//! `size`. An object carrying both, or neither, is rejected.
//!
//! ```json
//! {"files":{"a":{"files":{"b.txt":{"size":2,"offset":"0"}}}}}
//! ```

mod directory;
mod file;
pub mod path;
mod walk;

pub use directory::{DirectoryEntry, WriteOptions};
pub use file::FileEntry;
pub use path::{join_path, normalize_path};
pub use walk::{Walk, WalkItem};

use fast_asar_crypto::Integrity;
use indexmap::IndexMap;
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// A node in the archive tree
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Entry<'a> {
    /// Regular file
    File(FileEntry<'a>),
    /// Directory
    Directory(DirectoryEntry<'a>),
}

impl<'a> Entry<'a> {
    /// Whether this is a file
    pub const fn is_file(&self) -> bool {
        matches!(self, Self::File(_))
    }

    /// Whether this is a directory
    pub const fn is_directory(&self) -> bool {
        matches!(self, Self::Directory(_))
    }

    /// File view, if this is a file
    pub const fn as_file(&self) -> Option<&FileEntry<'a>> {
        match self {
            Self::File(file) => Some(file),
            Self::Directory(_) => None,
        }
    }

    /// Mutable file view, if this is a file
    pub fn as_file_mut(&mut self) -> Option<&mut FileEntry<'a>> {
        match self {
            Self::File(file) => Some(file),
            Self::Directory(_) => None,
        }
    }

    /// Directory view, if this is a directory
    pub const fn as_directory(&self) -> Option<&DirectoryEntry<'a>> {
        match self {
            Self::Directory(dir) => Some(dir),
            Self::File(_) => None,
        }
    }

    /// Mutable directory view, if this is a directory
    pub fn as_directory_mut(&mut self) -> Option<&mut DirectoryEntry<'a>> {
        match self {
            Self::Directory(dir) => Some(dir),
            Self::File(_) => None,
        }
    }

    /// Detach from the source buffer by copying borrowed content
    pub fn into_owned(self) -> Entry<'static> {
        match self {
            Self::File(file) => Entry::File(file.into_owned()),
            Self::Directory(dir) => Entry::Directory(dir.into_owned()),
        }
    }

    /// Copy of the entry without any file content
    pub fn metadata_only(&self) -> Entry<'static> {
        match self {
            Self::File(file) => Entry::File(file.metadata_only()),
            Self::Directory(dir) => Entry::Directory(dir.metadata_only()),
        }
    }
}

impl Serialize for Entry<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::File(file) => file.serialize(serializer),
            Self::Directory(dir) => dir.serialize(serializer),
        }
    }
}

impl<'de> Deserialize<'de> for Entry<'_> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = RawEntry::deserialize(deserializer)?;
        match (raw.size, raw.files) {
            (Some(size), None) => Ok(Self::File(FileEntry::from_header(
                size,
                raw.offset,
                raw.unpacked,
                raw.integrity,
                raw.executable,
            ))),
            (None, Some(files)) => Ok(Self::Directory(DirectoryEntry { files })),
            (Some(_), Some(_)) => Err(D::Error::custom(
                "entry has both `size` and `files`",
            )),
            (None, None) => Err(D::Error::custom(
                "entry has neither `size` nor `files`",
            )),
        }
    }
}

/// Union of every field an entry object may carry
#[derive(Deserialize)]
struct RawEntry<'a> {
    size: Option<u64>,
    #[serde(default, deserialize_with = "deserialize_offset")]
    offset: Option<u64>,
    unpacked: Option<bool>,
    integrity: Option<Integrity>,
    executable: Option<bool>,
    files: Option<IndexMap<String, Entry<'a>>>,
}

/// Offsets are written as decimal strings; numbers are accepted on read
#[derive(Deserialize)]
#[serde(untagged)]
enum OffsetRepr {
    Text(String),
    Number(u64),
}

fn deserialize_offset<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<u64>, D::Error> {
    match Option::<OffsetRepr>::deserialize(deserializer)? {
        None => Ok(None),
        Some(OffsetRepr::Number(offset)) => Ok(Some(offset)),
        Some(OffsetRepr::Text(text)) => text
            .parse()
            .map(Some)
            .map_err(|e| D::Error::custom(format!("invalid offset {text:?}: {e}"))),
    }
}
