//! File entries

use fast_asar_crypto::{Integrity, IntegrityError, compute_integrity};
use serde::{Serialize, Serializer};
use std::borrow::Cow;

/// A file in the archive tree
///
/// Content is either borrowed from the archive buffer it was decoded from or
/// owned after a write. Header fields serialize in the order
/// `size, offset, unpacked, integrity, executable`; content never serializes.
///
/// An unpacked file lives beside the archive rather than in its data region,
/// so it carries no offset and decodes without content.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FileEntry<'a> {
    /// Content length in bytes
    pub size: u64,

    /// Content offset relative to the start of the data region
    #[serde(
        skip_serializing_if = "Option::is_none",
        serialize_with = "serialize_offset"
    )]
    pub offset: Option<u64>,

    /// Content is stored outside the archive
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unpacked: Option<bool>,

    /// Content integrity record
    #[serde(skip_serializing_if = "Option::is_none")]
    pub integrity: Option<Integrity>,

    /// Executable bit from the source filesystem
    #[serde(skip_serializing_if = "Option::is_none")]
    pub executable: Option<bool>,

    #[serde(skip)]
    data: Option<Cow<'a, [u8]>>,
}

impl<'a> FileEntry<'a> {
    /// Create a file entry holding `data`
    pub fn new(data: impl Into<Cow<'a, [u8]>>) -> Self {
        let data = data.into();
        Self {
            size: data.len() as u64,
            offset: None,
            unpacked: None,
            integrity: None,
            executable: None,
            data: Some(data),
        }
    }

    /// Create a file entry from header metadata alone
    pub fn from_metadata(size: u64, offset: u64) -> Self {
        Self {
            size,
            offset: Some(offset),
            ..Self::default()
        }
    }

    pub(crate) fn from_header(
        size: u64,
        offset: Option<u64>,
        unpacked: Option<bool>,
        integrity: Option<Integrity>,
        executable: Option<bool>,
    ) -> Self {
        Self {
            size,
            offset,
            unpacked,
            integrity,
            executable,
            data: None,
        }
    }

    /// Attached content, if loaded
    pub fn data(&self) -> Option<&[u8]> {
        self.data.as_deref()
    }

    /// Whether content is attached
    pub fn has_data(&self) -> bool {
        self.data.is_some()
    }

    /// Whether the content borrows from a decoded archive buffer
    pub fn is_borrowed(&self) -> bool {
        matches!(self.data, Some(Cow::Borrowed(_)))
    }

    /// Replace the content
    ///
    /// Updates `size` and clears the now stale `offset` and `integrity`. The
    /// file is packed into the archive from then on.
    pub fn set_data(&mut self, data: impl Into<Cow<'a, [u8]>>) {
        let data = data.into();
        self.size = data.len() as u64;
        self.offset = None;
        self.unpacked = None;
        self.integrity = None;
        self.data = Some(data);
    }

    /// Attach content without touching header metadata
    pub(crate) fn attach_data(&mut self, data: &'a [u8]) {
        self.data = Some(Cow::Borrowed(data));
    }

    /// Detach and return the content
    pub fn take_data(&mut self) -> Option<Cow<'a, [u8]>> {
        self.data.take()
    }

    /// Drop the content, keeping header metadata
    pub fn clear_data(&mut self) {
        self.data = None;
    }

    /// Whether the content is stored outside the archive
    pub fn is_unpacked(&self) -> bool {
        self.unpacked.unwrap_or(false)
    }

    /// Whether the executable bit is set
    pub fn is_executable(&self) -> bool {
        self.executable.unwrap_or(false)
    }

    /// Compute a fresh integrity record from the attached content
    pub fn calculate_integrity(&self) -> Result<Integrity, IntegrityError> {
        compute_integrity(self.data())
    }

    /// Copy of the header metadata without content
    pub fn metadata_only(&self) -> FileEntry<'static> {
        FileEntry {
            size: self.size,
            offset: self.offset,
            unpacked: self.unpacked,
            integrity: self.integrity.clone(),
            executable: self.executable,
            data: None,
        }
    }

    /// Detach from the source buffer by copying borrowed content
    pub fn into_owned(self) -> FileEntry<'static> {
        FileEntry {
            size: self.size,
            offset: self.offset,
            unpacked: self.unpacked,
            integrity: self.integrity,
            executable: self.executable,
            data: self.data.map(|data| Cow::Owned(data.into_owned())),
        }
    }
}

#[allow(clippy::ref_option)]
fn serialize_offset<S: Serializer>(offset: &Option<u64>, serializer: S) -> Result<S::Ok, S::Error> {
    match offset {
        Some(offset) => serializer.serialize_str(&offset.to_string()),
        None => serializer.serialize_none(),
    }
}
