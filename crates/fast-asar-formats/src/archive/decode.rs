//! Archive decoding

use tracing::{debug, trace};

use crate::archive::{Archive, ArchiveState, DecodeOptions, ParseMetadata};
use crate::entry::{DirectoryEntry, Entry, FileEntry};
use crate::error::{AsarError, Result};
use crate::pickle::{SIZE_FRAME_LEN, data_region_start, decode_string_frame, decode_u32_frame};

impl<'a> Archive<'a> {
    /// Decode an archive from `bytes`
    ///
    /// File content is attached as slices of `bytes` without copying.
    pub fn decode(bytes: &'a [u8], options: &DecodeOptions) -> Result<Self> {
        let (header_size, _) = decode_u32_frame(bytes)?;
        let raw_header = decode_string_frame(&bytes[SIZE_FRAME_LEN..], header_size as usize)?;
        let mut root = parse_header(raw_header)?;
        let data_start = data_region_start(header_size as usize);

        debug!(
            header_size,
            header_json_len = raw_header.len(),
            data_start,
            archive_len = bytes.len(),
            "decoded archive header"
        );

        let parse_metadata = options.keep_parse_metadata.then(|| ParseMetadata {
            header_size,
            raw_header: raw_header.to_string(),
            header: root.metadata_only(),
        });

        if options.load_content {
            let mut path = Vec::new();
            attach_content(
                &mut root,
                &bytes[data_start..],
                &mut path,
                options.verify_integrity,
            )?;
        }

        Ok(Self {
            root,
            state: ArchiveState::Decoded,
            parse_metadata,
        })
    }
}

/// Parse header JSON into the root directory
pub fn parse_header<'a>(raw_header: &str) -> Result<DirectoryEntry<'a>> {
    let entry: Entry<'a> = serde_json::from_str(raw_header)
        .map_err(|e| AsarError::InvalidHeader(e.to_string()))?;
    match entry {
        Entry::Directory(root) => Ok(root),
        Entry::File(_) => Err(AsarError::InvalidHeader(
            "root entry is not a directory".to_string(),
        )),
    }
}

fn attach_content<'a>(
    dir: &mut DirectoryEntry<'a>,
    data: &'a [u8],
    path: &mut Vec<String>,
    verify_integrity: bool,
) -> Result<()> {
    for (name, entry) in &mut dir.files {
        path.push(name.clone());
        match entry {
            Entry::Directory(child) => attach_content(child, data, path, verify_integrity)?,
            Entry::File(file) if file.is_unpacked() => {
                trace!(path = %path.join("/"), "skipping unpacked file");
            }
            Entry::File(file) => {
                let content = content_slice(file, data, path)?;
                if verify_integrity && let Some(integrity) = &file.integrity {
                    integrity
                        .verify(content)
                        .map_err(|source| AsarError::Integrity {
                            path: path.join("/"),
                            source,
                        })?;
                }
                trace!(path = %path.join("/"), size = file.size, "attached file content");
                file.attach_data(content);
            }
        }
        path.pop();
    }
    Ok(())
}

fn content_slice<'a>(file: &FileEntry<'_>, data: &'a [u8], path: &[String]) -> Result<&'a [u8]> {
    let offset = file.offset.ok_or_else(|| {
        AsarError::InvalidHeader(format!("file {} has no offset", path.join("/")))
    })?;
    let out_of_range = || AsarError::OffsetOutOfRange {
        path: path.join("/"),
        offset,
        size: file.size,
        available: data.len(),
    };

    let start = usize::try_from(offset).map_err(|_| out_of_range())?;
    let size = usize::try_from(file.size).map_err(|_| out_of_range())?;
    let end = start.checked_add(size).ok_or_else(out_of_range)?;
    data.get(start..end).ok_or_else(out_of_range)
}
