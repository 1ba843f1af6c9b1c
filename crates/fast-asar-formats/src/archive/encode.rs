//! Archive encoding

use fast_asar_crypto::Integrity;
use tracing::{debug, trace};

use crate::archive::{Archive, EncodeOptions, EncodedArchive};
use crate::entry::{DirectoryEntry, Entry, WalkItem};
use crate::error::{AsarError, Result};
use crate::pickle::{PickleError, encode_string_frame, encode_u32_frame};

impl Archive<'_> {
    /// Serialize the archive
    ///
    /// Offsets are reassigned as a running total of file sizes in output
    /// order. Unpacked files keep their header metadata and contribute no
    /// content. The archive itself is left untouched; the returned header tree
    /// carries the assigned offsets and integrity.
    pub fn encode(&self, options: &EncodeOptions) -> Result<EncodedArchive> {
        let mut items: Vec<(String, WalkItem<'_, '_>)> = self
            .root
            .walk(true)
            .map(|item| (item.path_string(), item))
            .collect();
        if options.sort {
            items.sort_by(|a, b| a.0.cmp(&b.0));
        }

        let mut header = DirectoryEntry::new();
        let mut payloads: Vec<&[u8]> = Vec::new();
        let mut offset = 0u64;

        for (path, item) in &items {
            let Some((name, parents)) = item.path.split_last() else {
                continue;
            };
            let parent = header.create_dir_segments(parents, true)?;

            match item.entry {
                Entry::Directory(_) => {
                    parent
                        .files
                        .entry((*name).to_string())
                        .or_insert_with(|| Entry::Directory(DirectoryEntry::new()));
                }
                Entry::File(file) if file.is_unpacked() => {
                    let integrity = match (&file.integrity, file.data()) {
                        (Some(existing), _) if !options.recompute_integrity => {
                            Some(existing.clone())
                        }
                        (_, Some(data)) => Some(Integrity::from_data(data)),
                        (existing, None) => existing.clone(),
                    };

                    let mut header_file = file.metadata_only();
                    header_file.offset = None;
                    header_file.integrity = integrity;
                    parent
                        .files
                        .insert((*name).to_string(), Entry::File(header_file));
                    trace!(path = %path, size = file.size, "kept unpacked file out of data region");
                }
                Entry::File(file) => {
                    let data = file
                        .data()
                        .ok_or_else(|| AsarError::MissingContent(path.clone()))?;
                    let actual = data.len() as u64;
                    if actual != file.size {
                        return Err(AsarError::ContentLengthMismatch {
                            path: path.clone(),
                            expected: file.size,
                            actual,
                        });
                    }

                    let integrity = match &file.integrity {
                        Some(existing) if !options.recompute_integrity => existing.clone(),
                        _ => Integrity::from_data(data),
                    };

                    let mut header_file = file.metadata_only();
                    header_file.offset = Some(offset);
                    header_file.integrity = Some(integrity);
                    parent
                        .files
                        .insert((*name).to_string(), Entry::File(header_file));

                    trace!(path = %path, offset, size = file.size, "assigned file offset");
                    offset += file.size;
                    payloads.push(data);
                }
            }
        }

        let header_json = serde_json::to_string(&header)?;
        let header_frame = encode_string_frame(&header_json)?;
        let header_size = u32::try_from(header_frame.len())
            .map_err(|_| PickleError::StringTooLarge(header_json.len()))?;
        let size_frame = encode_u32_frame(header_size)?;

        let data_len: usize = payloads.iter().map(|payload| payload.len()).sum();
        let mut bytes = Vec::with_capacity(size_frame.len() + header_frame.len() + data_len);
        bytes.extend_from_slice(&size_frame);
        bytes.extend_from_slice(&header_frame);
        for payload in &payloads {
            bytes.extend_from_slice(payload);
        }

        debug!(
            files = payloads.len(),
            header_size,
            data_len,
            total_len = bytes.len(),
            sorted = options.sort,
            "encoded archive"
        );

        Ok(EncodedArchive {
            bytes,
            header_size,
            header_json: options.return_header_json.then_some(header_json),
            header_tree: options.return_header_tree.then_some(header),
            header_frame: options.return_header_frame.then_some(header_frame),
        })
    }
}
