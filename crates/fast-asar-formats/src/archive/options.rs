//! Decode and encode options

use crate::entry::DirectoryEntry;

/// Options for [`Archive::decode`](crate::Archive::decode)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecodeOptions {
    /// Attach file content slices to every file entry
    pub load_content: bool,
    /// Keep the raw header text and parsed header alongside the tree
    pub keep_parse_metadata: bool,
    /// Check loaded content against recorded integrity
    pub verify_integrity: bool,
}

impl Default for DecodeOptions {
    fn default() -> Self {
        Self {
            load_content: true,
            keep_parse_metadata: false,
            verify_integrity: false,
        }
    }
}

impl DecodeOptions {
    /// Set whether content is attached
    pub const fn with_load_content(mut self, load_content: bool) -> Self {
        self.load_content = load_content;
        self
    }

    /// Set whether parse metadata is kept
    pub const fn with_parse_metadata(mut self, keep: bool) -> Self {
        self.keep_parse_metadata = keep;
        self
    }

    /// Set whether integrity is verified
    pub const fn with_verify_integrity(mut self, verify: bool) -> Self {
        self.verify_integrity = verify;
        self
    }
}

/// Options for [`Archive::encode`](crate::Archive::encode)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EncodeOptions {
    /// Order entries by full path instead of tree order
    pub sort: bool,
    /// Recompute integrity even when a record is present
    pub recompute_integrity: bool,
    /// Return the header JSON text
    pub return_header_json: bool,
    /// Return the header tree
    pub return_header_tree: bool,
    /// Return the encoded header frame
    pub return_header_frame: bool,
}

impl Default for EncodeOptions {
    fn default() -> Self {
        Self {
            sort: true,
            recompute_integrity: true,
            return_header_json: false,
            return_header_tree: false,
            return_header_frame: false,
        }
    }
}

impl EncodeOptions {
    /// Set whether entries are sorted
    pub const fn with_sort(mut self, sort: bool) -> Self {
        self.sort = sort;
        self
    }

    /// Set whether integrity is recomputed
    pub const fn with_recompute_integrity(mut self, recompute: bool) -> Self {
        self.recompute_integrity = recompute;
        self
    }

    /// Request the header JSON text
    pub const fn with_header_json(mut self) -> Self {
        self.return_header_json = true;
        self
    }

    /// Request the header tree
    pub const fn with_header_tree(mut self) -> Self {
        self.return_header_tree = true;
        self
    }

    /// Request the header frame bytes
    pub const fn with_header_frame(mut self) -> Self {
        self.return_header_frame = true;
        self
    }
}

/// Output of [`Archive::encode`](crate::Archive::encode)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedArchive {
    /// Complete archive bytes
    pub bytes: Vec<u8>,
    /// Length of the header frame as recorded in the size frame
    pub header_size: u32,
    /// Header JSON text, if requested
    pub header_json: Option<String>,
    /// Header tree with offsets and integrity, if requested
    pub header_tree: Option<DirectoryEntry<'static>>,
    /// Encoded header frame, if requested
    pub header_frame: Option<Vec<u8>>,
}

/// Header details captured during decode
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseMetadata {
    /// Length of the header frame as recorded in the size frame
    pub header_size: u32,
    /// Header JSON text as stored in the archive
    pub raw_header: String,
    /// Parsed header tree without content
    pub header: DirectoryEntry<'static>,
}
