//! ASAR archive model
//!
//! An [`Archive`] owns a directory tree whose files carry their content. It is
//! produced by [`Archive::decode`], [`Archive::new`] or
//! [`Archive::from_directory`], mutated through path-based writes and removals,
//! and serialized with [`Archive::encode`].
//!
//! # Example
//!
//! ```
//! use fast_asar_formats::{Archive, DecodeOptions, EncodeOptions, WriteOptions};
//!
//! let mut archive = Archive::new();
//! archive.write_file("foo.txt", b"hi".to_vec(), &WriteOptions::default())?;
//! archive.write_file(
//!     "a/b.txt",
//!     b"yo".to_vec(),
//!     &WriteOptions::default().with_create_parents(true),
//! )?;
//!
//! let encoded = archive.encode(&EncodeOptions::default())?;
//! let decoded = Archive::decode(&encoded.bytes, &DecodeOptions::default())?;
//! assert_eq!(decoded.read_file("a/b.txt")?, b"yo");
//! # Ok::<(), fast_asar_formats::AsarError>(())
//! ```

mod decode;
mod encode;
mod options;

pub use decode::parse_header;
pub use options::{DecodeOptions, EncodeOptions, EncodedArchive, ParseMetadata};

use std::borrow::Cow;

use crate::entry::{DirectoryEntry, Entry, Walk, WalkItem, WriteOptions};
use crate::error::{AsarError, Result};

/// Lifecycle state of an [`Archive`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ArchiveState {
    /// Created empty and not yet written to
    #[default]
    Empty,
    /// Decoded and not modified since
    Decoded,
    /// Modified by a write or removal
    Mutated,
}

/// An archive and its entry tree
///
/// The lifetime ties decoded content to the buffer it was decoded from. Use
/// [`into_owned`](Self::into_owned) to detach.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Archive<'a> {
    root: DirectoryEntry<'a>,
    state: ArchiveState,
    parse_metadata: Option<ParseMetadata>,
}

impl<'a> Archive<'a> {
    /// Create an empty archive
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an archive around an existing tree
    pub fn from_root(root: DirectoryEntry<'a>) -> Self {
        Self {
            root,
            state: ArchiveState::Mutated,
            parse_metadata: None,
        }
    }

    /// Current lifecycle state
    pub const fn state(&self) -> ArchiveState {
        self.state
    }

    /// Root directory
    pub const fn root(&self) -> &DirectoryEntry<'a> {
        &self.root
    }

    /// Header details captured during decode, if requested
    pub const fn parse_metadata(&self) -> Option<&ParseMetadata> {
        self.parse_metadata.as_ref()
    }

    /// Entry at `path`
    pub fn get(&self, path: &str) -> Result<&Entry<'a>> {
        self.root.resolve(path)
    }

    /// Content of the file at `path`
    pub fn read_file(&self, path: &str) -> Result<&[u8]> {
        match self.root.resolve(path)? {
            Entry::File(file) => file
                .data()
                .ok_or_else(|| AsarError::MissingContent(path.to_string())),
            Entry::Directory(_) => Err(AsarError::NotAFile(path.to_string())),
        }
    }

    /// Content of an entry yielded by [`walk`](Self::walk)
    pub fn read_entry<'t>(item: &WalkItem<'t, '_>) -> Result<&'t [u8]> {
        match item.entry {
            Entry::File(file) => file
                .data()
                .ok_or_else(|| AsarError::MissingContent(item.path_string())),
            Entry::Directory(_) => Err(AsarError::NotAFile(item.path_string())),
        }
    }

    /// Place or replace a file at `path`
    pub fn write_file(
        &mut self,
        path: &str,
        data: impl Into<Cow<'a, [u8]>>,
        options: &WriteOptions,
    ) -> Result<()> {
        self.root.insert_file(path, data, options)?;
        self.state = ArchiveState::Mutated;
        Ok(())
    }

    /// Create a directory at `path`
    pub fn create_dir(&mut self, path: &str, create_parents: bool) -> Result<()> {
        self.root.create_dir(path, create_parents)?;
        self.state = ArchiveState::Mutated;
        Ok(())
    }

    /// Remove the entry at `path`, returning it
    pub fn remove(&mut self, path: &str) -> Result<Entry<'a>> {
        let removed = self.root.remove(path)?;
        self.state = ArchiveState::Mutated;
        Ok(removed)
    }

    /// Lazily walk every entry in pre-order
    pub fn walk(&self, include_directories: bool) -> Walk<'_, 'a> {
        self.root.walk(include_directories)
    }

    /// Names of the root's immediate children
    pub fn list_files(&self) -> Vec<&str> {
        self.root.list_files()
    }

    /// Number of files in the archive
    pub fn file_count(&self) -> usize {
        self.root.file_count()
    }

    /// Detach from the source buffer by copying borrowed content
    pub fn into_owned(self) -> Archive<'static> {
        Archive {
            root: self.root.into_owned(),
            state: self.state,
            parse_metadata: self.parse_metadata,
        }
    }

    /// Take the root directory
    pub fn into_root(self) -> DirectoryEntry<'a> {
        self.root
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::entry::FileEntry;
    use crate::pickle::{PickleError, encode_string_frame, encode_u32_frame};
    use fast_asar_crypto::Integrity;
    use pretty_assertions::assert_eq;

    fn parents() -> WriteOptions {
        WriteOptions::default().with_create_parents(true)
    }

    fn sample_archive() -> Archive<'static> {
        let mut archive = Archive::new();
        archive
            .write_file("foo.txt", b"hi".to_vec(), &WriteOptions::default())
            .unwrap();
        archive
            .write_file("a/b.txt", b"yo".to_vec(), &parents())
            .unwrap();
        archive
    }

    fn assemble(header_json: &str, data: &[u8]) -> Vec<u8> {
        let header_frame = encode_string_frame(header_json).unwrap();
        let mut bytes = encode_u32_frame(header_frame.len() as u32).unwrap();
        bytes.extend_from_slice(&header_frame);
        bytes.extend_from_slice(data);
        bytes
    }

    fn file_offset(tree: &DirectoryEntry<'_>, path: &str) -> u64 {
        tree.resolve(path).unwrap().as_file().unwrap().offset.unwrap()
    }

    #[test]
    fn test_state_transitions() {
        let mut archive = Archive::new();
        assert_eq!(archive.state(), ArchiveState::Empty);

        archive
            .write_file("x", b"x".to_vec(), &WriteOptions::default())
            .unwrap();
        assert_eq!(archive.state(), ArchiveState::Mutated);

        let encoded = archive.encode(&EncodeOptions::default()).unwrap();
        assert_eq!(archive.state(), ArchiveState::Mutated);

        let mut decoded = Archive::decode(&encoded.bytes, &DecodeOptions::default()).unwrap();
        assert_eq!(decoded.state(), ArchiveState::Decoded);

        decoded.remove("x").unwrap();
        assert_eq!(decoded.state(), ArchiveState::Mutated);
    }

    #[test]
    fn test_failed_write_keeps_state() {
        let mut archive = Archive::new();
        assert!(
            archive
                .write_file("a/b", b"x".to_vec(), &WriteOptions::default())
                .is_err()
        );
        assert_eq!(archive.state(), ArchiveState::Empty);
    }

    #[test]
    fn test_sorted_offsets() {
        let archive = sample_archive();
        let encoded = archive
            .encode(&EncodeOptions::default().with_header_tree())
            .unwrap();
        let tree = encoded.header_tree.unwrap();

        assert_eq!(file_offset(&tree, "a/b.txt"), 0);
        assert_eq!(file_offset(&tree, "foo.txt"), 2);
        assert_eq!(tree.list_files(), vec!["a", "foo.txt"]);
    }

    #[test]
    fn test_unsorted_offsets_follow_insertion_order() {
        let archive = sample_archive();
        let encoded = archive
            .encode(&EncodeOptions::default().with_sort(false).with_header_tree())
            .unwrap();
        let tree = encoded.header_tree.unwrap();

        assert_eq!(file_offset(&tree, "foo.txt"), 0);
        assert_eq!(file_offset(&tree, "a/b.txt"), 2);
        assert_eq!(tree.list_files(), vec!["foo.txt", "a"]);
    }

    #[test]
    fn test_encode_decode_scenario() {
        let archive = sample_archive();
        let encoded = archive.encode(&EncodeOptions::default()).unwrap();
        let decoded = Archive::decode(&encoded.bytes, &DecodeOptions::default()).unwrap();

        assert_eq!(decoded.file_count(), 2);
        let foo = decoded.get("foo.txt").unwrap().as_file().unwrap();
        assert_eq!(foo.size, 2);
        assert_eq!(foo.offset, Some(2));
        assert!(decoded.get("a").unwrap().is_directory());
        assert_eq!(decoded.read_file("a/b.txt").unwrap(), b"yo");
        assert_eq!(decoded.read_file("foo.txt").unwrap(), b"hi");
        assert_eq!(decoded.read_file("a/../a/b.txt").unwrap(), b"yo");
    }

    #[test]
    fn test_decoded_content_is_borrowed() {
        let encoded = sample_archive().encode(&EncodeOptions::default()).unwrap();
        let decoded = Archive::decode(&encoded.bytes, &DecodeOptions::default()).unwrap();
        let file = decoded.get("foo.txt").unwrap().as_file().unwrap();
        assert!(file.is_borrowed());
    }

    #[test]
    fn test_header_json_strips_content() {
        let encoded = sample_archive()
            .encode(&EncodeOptions::default().with_header_json())
            .unwrap();
        let json = encoded.header_json.unwrap();
        let hi_hash = Integrity::from_data(b"hi").hash;
        assert!(json.starts_with(r#"{"files":{"a":{"files":{"b.txt":{"size":2,"offset":"0","integrity":"#));
        assert!(json.contains(&hi_hash));
        assert!(!json.contains("data"));
        assert_eq!(encoded.header_size as usize, 8 + json.len().next_multiple_of(4));
    }

    #[test]
    fn test_header_frame_output() {
        let encoded = sample_archive()
            .encode(&EncodeOptions::default().with_header_frame())
            .unwrap();
        let frame = encoded.header_frame.unwrap();
        assert_eq!(frame.len(), encoded.header_size as usize);
        assert_eq!(&encoded.bytes[8..8 + frame.len()], frame.as_slice());
    }

    #[test]
    fn test_encode_rejects_size_mismatch() {
        let mut root = DirectoryEntry::new();
        let file = root
            .insert_file("bad.bin", b"four".to_vec(), &WriteOptions::default())
            .unwrap();
        file.size = 5;
        let archive = Archive::from_root(root);
        assert!(matches!(
            archive.encode(&EncodeOptions::default()),
            Err(AsarError::ContentLengthMismatch { path, expected: 5, actual: 4 }) if path == "bad.bin"
        ));
    }

    #[test]
    fn test_encode_rejects_missing_content() {
        let encoded = sample_archive().encode(&EncodeOptions::default()).unwrap();
        let headers_only = Archive::decode(
            &encoded.bytes,
            &DecodeOptions::default().with_load_content(false),
        )
        .unwrap();

        assert!(matches!(
            headers_only.read_file("foo.txt"),
            Err(AsarError::MissingContent(_))
        ));
        assert!(matches!(
            headers_only.encode(&EncodeOptions::default()),
            Err(AsarError::MissingContent(path)) if path == "a/b.txt"
        ));
    }

    #[test]
    fn test_keeps_existing_integrity_when_not_recomputing() {
        let mut root = DirectoryEntry::new();
        let file = root
            .insert_file("f", b"content".to_vec(), &WriteOptions::default())
            .unwrap();
        let stale = Integrity::from_data(b"something else");
        file.integrity = Some(stale.clone());
        let archive = Archive::from_root(root);

        let kept = archive
            .encode(&EncodeOptions::default().with_recompute_integrity(false).with_header_tree())
            .unwrap();
        let kept_file = kept.header_tree.as_ref().unwrap().resolve("f").unwrap();
        assert_eq!(kept_file.as_file().unwrap().integrity, Some(stale));

        let fresh = archive
            .encode(&EncodeOptions::default().with_header_tree())
            .unwrap();
        let fresh_file = fresh.header_tree.as_ref().unwrap().resolve("f").unwrap();
        assert_eq!(
            fresh_file.as_file().unwrap().integrity,
            Some(Integrity::from_data(b"content"))
        );
    }

    #[test]
    fn test_read_file_on_directory() {
        let archive = sample_archive();
        assert!(matches!(archive.read_file("a"), Err(AsarError::NotAFile(_))));
    }

    #[test]
    fn test_read_entry_from_walk() {
        let archive = sample_archive();
        let contents: Vec<&[u8]> = archive
            .walk(false)
            .map(|item| Archive::read_entry(&item).unwrap())
            .collect();
        assert_eq!(contents, vec![b"hi".as_slice(), b"yo".as_slice()]);

        let dir_item = archive.walk(true).find(|item| item.name == "a").unwrap();
        assert!(matches!(
            Archive::read_entry(&dir_item),
            Err(AsarError::NotAFile(path)) if path == "a"
        ));
    }

    #[test]
    fn test_decode_rejects_file_root() {
        let bytes = assemble(r#"{"size":0,"offset":"0"}"#, b"");
        assert!(matches!(
            Archive::decode(&bytes, &DecodeOptions::default()),
            Err(AsarError::InvalidHeader(_))
        ));
    }

    #[test]
    fn test_decode_rejects_non_object_header() {
        let bytes = assemble("42", b"");
        assert!(matches!(
            Archive::decode(&bytes, &DecodeOptions::default()),
            Err(AsarError::InvalidHeader(_))
        ));
    }

    #[test]
    fn test_decode_rejects_out_of_range_file() {
        let bytes = assemble(r#"{"files":{"f":{"size":10,"offset":"0"}}}"#, b"short");
        assert!(matches!(
            Archive::decode(&bytes, &DecodeOptions::default()),
            Err(AsarError::OffsetOutOfRange { size: 10, available: 5, .. })
        ));

        let headers_only = Archive::decode(&bytes, &DecodeOptions::default().with_load_content(false));
        assert!(headers_only.is_ok());
    }

    #[test]
    fn test_decode_rejects_truncated_frames() {
        assert!(matches!(
            Archive::decode(&[4, 0, 0], &DecodeOptions::default()),
            Err(AsarError::Framing(PickleError::Truncated { .. }))
        ));

        let mut bytes = assemble(r#"{"files":{}}"#, b"");
        bytes.truncate(bytes.len() - 2);
        assert!(matches!(
            Archive::decode(&bytes, &DecodeOptions::default()),
            Err(AsarError::Framing(PickleError::DeclaredLengthExceedsBuffer { .. }))
        ));
    }

    #[test]
    fn test_decode_requires_offsets() {
        let bytes = assemble(r#"{"files":{"f":{"size":1}}}"#, b"x");
        assert!(matches!(
            Archive::decode(&bytes, &DecodeOptions::default()),
            Err(AsarError::InvalidHeader(message)) if message.contains("no offset")
        ));
    }

    #[test]
    fn test_decode_verifies_integrity() {
        let integrity = Integrity::from_data(b"good");
        let header = format!(
            r#"{{"files":{{"f":{{"size":4,"offset":"0","integrity":{}}}}}}}"#,
            serde_json::to_string(&integrity).unwrap()
        );
        let verify = DecodeOptions::default().with_verify_integrity(true);

        let good = assemble(&header, b"good");
        assert!(Archive::decode(&good, &verify).is_ok());

        let bad = assemble(&header, b"evil");
        assert!(matches!(
            Archive::decode(&bad, &verify),
            Err(AsarError::Integrity { path, .. }) if path == "f"
        ));
        assert!(Archive::decode(&bad, &DecodeOptions::default()).is_ok());
    }

    #[test]
    fn test_parse_metadata() {
        let encoded = sample_archive()
            .encode(&EncodeOptions::default().with_header_json())
            .unwrap();
        let decoded = Archive::decode(
            &encoded.bytes,
            &DecodeOptions::default().with_parse_metadata(true),
        )
        .unwrap();

        let metadata = decoded.parse_metadata().unwrap();
        assert_eq!(metadata.header_size, encoded.header_size);
        assert_eq!(Some(&metadata.raw_header), encoded.header_json.as_ref());
        assert_eq!(metadata.header.file_count(), 2);

        let plain = Archive::decode(&encoded.bytes, &DecodeOptions::default()).unwrap();
        assert!(plain.parse_metadata().is_none());
    }

    #[test]
    fn test_into_owned_outlives_buffer() {
        let owned = {
            let encoded = sample_archive().encode(&EncodeOptions::default()).unwrap();
            Archive::decode(&encoded.bytes, &DecodeOptions::default())
                .unwrap()
                .into_owned()
        };
        assert_eq!(owned.read_file("foo.txt").unwrap(), b"hi");
    }

    #[test]
    fn test_empty_archive_round_trip() {
        let encoded = Archive::new().encode(&EncodeOptions::default()).unwrap();
        assert_eq!(
            encoded.bytes,
            vec![
                4, 0, 0, 0, 20, 0, 0, 0, // size frame: header frame is 20 bytes
                16, 0, 0, 0, 12, 0, 0, 0, // header pickle payload, string length 12
                b'{', b'"', b'f', b'i', b'l', b'e', b's', b'"', b':', b'{', b'}', b'}',
            ]
        );
        let decoded = Archive::decode(&encoded.bytes, &DecodeOptions::default()).unwrap();
        assert!(decoded.list_files().is_empty());
    }

    #[test]
    fn test_from_root_file_entry_api() {
        let mut root = DirectoryEntry::new();
        root.files
            .insert("direct".to_string(), Entry::File(FileEntry::new(b"abc".to_vec())));
        let archive = Archive::from_root(root);
        assert_eq!(archive.read_file("direct").unwrap(), b"abc");
    }
}
