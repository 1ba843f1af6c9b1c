//! Filesystem packing and extraction
//!
//! Bridges an [`Archive`] and a directory on the host filesystem. Traversal
//! uses `walkdir` sorted by file name, so packing the same directory twice
//! yields the same tree regardless of the order the filesystem reports.

use std::fs;
use std::path::{Component, Path, PathBuf};

use tracing::{debug, trace, warn};
use walkdir::WalkDir;

use crate::archive::{Archive, DecodeOptions, EncodeOptions};
use crate::entry::path::is_safe_segment;
use crate::entry::{DirectoryEntry, Entry, WriteOptions};
use crate::error::{AsarError, Result};

/// Options for [`Archive::from_directory`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PackOptions {
    /// Follow symbolic links instead of skipping them
    pub follow_links: bool,
    /// Keep directories that contain no files
    pub include_empty_dirs: bool,
}

impl Default for PackOptions {
    fn default() -> Self {
        Self {
            follow_links: false,
            include_empty_dirs: true,
        }
    }
}

impl PackOptions {
    /// Set whether symbolic links are followed
    pub const fn with_follow_links(mut self, follow_links: bool) -> Self {
        self.follow_links = follow_links;
        self
    }

    /// Set whether empty directories are kept
    pub const fn with_empty_dirs(mut self, include: bool) -> Self {
        self.include_empty_dirs = include;
        self
    }
}

impl Archive<'static> {
    /// Build an archive from the contents of `dir`
    ///
    /// Paths inside the archive are relative to `dir`. Every regular file is
    /// read into memory.
    pub fn from_directory(dir: impl AsRef<Path>, options: &PackOptions) -> Result<Self> {
        let dir = dir.as_ref();
        let mut root = DirectoryEntry::new();
        let mut packed_bytes = 0u64;

        let walker = WalkDir::new(dir)
            .min_depth(1)
            .follow_links(options.follow_links)
            .sort_by_file_name();

        for entry in walker {
            let entry = entry?;
            let segments = relative_segments(dir, entry.path())?;
            let file_type = entry.file_type();

            if file_type.is_dir() {
                if options.include_empty_dirs {
                    root.create_dir_segments(&segments, true)?;
                }
            } else if file_type.is_file() {
                let data = fs::read(entry.path())?;
                let executable = is_executable(&entry.metadata()?);
                let write = WriteOptions {
                    create_parents: true,
                    executable: executable.then_some(true),
                };
                trace!(path = %entry.path().display(), size = data.len(), executable, "packing file");
                packed_bytes += data.len() as u64;
                root.insert_file_segments(&segments, data, &write)?;
            } else {
                warn!(path = %entry.path().display(), "skipping unsupported filesystem entry");
            }
        }

        debug!(
            source = %dir.display(),
            files = root.file_count(),
            packed_bytes,
            "built archive from directory"
        );
        Ok(Self::from_root(root))
    }

    /// Read and decode an archive file
    ///
    /// The returned archive owns its content.
    pub fn from_file(path: impl AsRef<Path>, options: &DecodeOptions) -> Result<Self> {
        let bytes = fs::read(path.as_ref())?;
        Ok(Archive::decode(&bytes, options)?.into_owned())
    }
}

impl Archive<'_> {
    /// Write every entry below `dest`
    ///
    /// Directories are created as needed. Entry names that are not a single
    /// plain path component are rejected with [`AsarError::UnsafePath`] before
    /// anything is written for them. Unpacked files are skipped; their content
    /// lives outside the archive.
    pub fn extract_to_directory(&self, dest: impl AsRef<Path>) -> Result<()> {
        let dest = dest.as_ref();
        fs::create_dir_all(dest)?;

        let mut files = 0usize;
        for item in self.walk(true) {
            if !item.path.iter().all(|segment| is_safe_segment(segment)) {
                return Err(AsarError::UnsafePath(item.path_string()));
            }
            let target: PathBuf = item.path.iter().fold(dest.to_path_buf(), |acc, s| acc.join(s));

            match item.entry {
                Entry::Directory(_) => fs::create_dir_all(&target)?,
                Entry::File(file) if file.is_unpacked() && !file.has_data() => {
                    warn!(path = %item.path_string(), "skipping unpacked file with no content");
                }
                Entry::File(file) => {
                    let data = Self::read_entry(&item)?;
                    if let Some(parent) = target.parent() {
                        fs::create_dir_all(parent)?;
                    }
                    fs::write(&target, data)?;
                    if file.is_executable() {
                        mark_executable(&target)?;
                    }
                    trace!(path = %target.display(), size = data.len(), "extracted file");
                    files += 1;
                }
            }
        }

        debug!(dest = %dest.display(), files, "extracted archive");
        Ok(())
    }

    /// Encode the archive and write it to `path`
    ///
    /// Returns the number of bytes written.
    pub fn save(&self, path: impl AsRef<Path>, options: &EncodeOptions) -> Result<usize> {
        let encoded = self.encode(options)?;
        fs::write(path.as_ref(), &encoded.bytes)?;
        Ok(encoded.bytes.len())
    }
}

fn relative_segments(root: &Path, path: &Path) -> Result<Vec<String>> {
    let relative = path
        .strip_prefix(root)
        .map_err(|_| AsarError::UnsafePath(path.display().to_string()))?;

    relative
        .components()
        .map(|component| match component {
            Component::Normal(name) => name
                .to_str()
                .map(str::to_string)
                .ok_or_else(|| AsarError::UnsafePath(path.display().to_string())),
            _ => Err(AsarError::UnsafePath(path.display().to_string())),
        })
        .collect()
}

#[cfg(unix)]
fn is_executable(metadata: &fs::Metadata) -> bool {
    use std::os::unix::fs::PermissionsExt;
    metadata.permissions().mode() & 0o111 != 0
}

#[cfg(not(unix))]
fn is_executable(_metadata: &fs::Metadata) -> bool {
    false
}

#[cfg(unix)]
fn mark_executable(path: &Path) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;
    fs::set_permissions(path, fs::Permissions::from_mode(0o755))?;
    Ok(())
}

#[cfg(not(unix))]
fn mark_executable(_path: &Path) -> Result<()> {
    Ok(())
}
