//! Directory entries and path-based tree operations

use indexmap::IndexMap;
use serde::Serialize;
use std::borrow::Cow;

use crate::entry::path::{join_path, normalize_path};
use crate::entry::{Entry, FileEntry, Walk};
use crate::error::{AsarError, Result};

/// Options controlling [`DirectoryEntry::insert_file`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WriteOptions {
    /// Create missing intermediate directories
    pub create_parents: bool,
    /// Executable bit for the written file; `None` keeps the existing value
    ///
    /// A cleared bit is stored as absent so the header never carries
    /// `"executable":false`.
    pub executable: Option<bool>,
}

impl WriteOptions {
    /// Set whether missing parents are created
    pub const fn with_create_parents(mut self, create_parents: bool) -> Self {
        self.create_parents = create_parents;
        self
    }

    /// Set the executable bit
    pub const fn with_executable(mut self, executable: bool) -> Self {
        self.executable = Some(executable);
        self
    }
}

/// A directory in the archive tree
///
/// Children keep their insertion order, which is the order they serialize in
/// when encoding without sorting.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DirectoryEntry<'a> {
    /// Children by name
    pub files: IndexMap<String, Entry<'a>>,
}

impl<'a> DirectoryEntry<'a> {
    /// Create an empty directory
    pub fn new() -> Self {
        Self::default()
    }

    /// Names of the immediate children
    pub fn list_files(&self) -> Vec<&str> {
        self.files.keys().map(String::as_str).collect()
    }

    /// Number of immediate children
    pub fn len(&self) -> usize {
        self.files.len()
    }

    /// Whether the directory has no children
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Immediate child by name
    pub fn get(&self, name: &str) -> Option<&Entry<'a>> {
        self.files.get(name)
    }

    /// Number of files in the whole subtree
    pub fn file_count(&self) -> usize {
        self.walk(false).count()
    }

    /// Lazily walk the subtree in pre-order
    pub fn walk(&self, include_directories: bool) -> Walk<'_, 'a> {
        Walk::new(self, include_directories)
    }

    /// Resolve a path to the entry it names
    ///
    /// Every segment before the last must be a directory. A path that
    /// normalizes to the root itself does not name an entry; use
    /// [`resolve_dir`](Self::resolve_dir) for that.
    pub fn resolve(&self, path: &str) -> Result<&Entry<'a>> {
        self.resolve_segments(&normalize_path(path))
    }

    /// Resolve already split path segments
    pub fn resolve_segments<S: AsRef<str>>(&self, segments: &[S]) -> Result<&Entry<'a>> {
        let not_found = || AsarError::NotFound(join_path(segments));
        let (name, parents) = segments.split_last().ok_or_else(not_found)?;
        self.dir_at(parents)
            .and_then(|dir| dir.files.get(name.as_ref()))
            .ok_or_else(not_found)
    }

    /// Mutable variant of [`resolve`](Self::resolve)
    pub fn resolve_mut(&mut self, path: &str) -> Result<&mut Entry<'a>> {
        let segments = normalize_path(path);
        let not_found = || AsarError::NotFound(join_path(&segments));
        let (name, parents) = segments.split_last().ok_or_else(not_found)?;
        self.dir_at_mut(parents)
            .and_then(|dir| dir.files.get_mut(*name))
            .ok_or_else(not_found)
    }

    /// Resolve a path that must name a directory, the root included
    pub fn resolve_dir(&self, path: &str) -> Result<&DirectoryEntry<'a>> {
        let segments = normalize_path(path);
        if segments.is_empty() {
            return Ok(self);
        }
        match self.resolve_segments(&segments)? {
            Entry::Directory(dir) => Ok(dir),
            Entry::File(_) => Err(AsarError::NotADirectory(join_path(&segments))),
        }
    }

    /// Place or replace a file at `path`
    pub fn insert_file(
        &mut self,
        path: &str,
        data: impl Into<Cow<'a, [u8]>>,
        options: &WriteOptions,
    ) -> Result<&mut FileEntry<'a>> {
        self.insert_file_segments(&normalize_path(path), data, options)
    }

    /// Place or replace a file at already split path segments
    ///
    /// Replacing keeps the existing executable bit unless `options` sets one.
    /// Writing over a directory fails with [`AsarError::NotAFile`].
    pub fn insert_file_segments<S: AsRef<str>>(
        &mut self,
        segments: &[S],
        data: impl Into<Cow<'a, [u8]>>,
        options: &WriteOptions,
    ) -> Result<&mut FileEntry<'a>> {
        let (name, parents) = segments
            .split_last()
            .ok_or_else(|| AsarError::NotAFile(String::new()))?;
        let parent = self.ensure_dir(parents, options.create_parents, segments)?;

        let slot = parent
            .files
            .entry(name.as_ref().to_string())
            .or_insert_with(|| Entry::File(FileEntry::default()));
        let file = slot
            .as_file_mut()
            .ok_or_else(|| AsarError::NotAFile(join_path(segments)))?;

        file.set_data(data);
        if let Some(executable) = options.executable {
            file.executable = executable.then_some(true);
        }
        Ok(file)
    }

    /// Create a directory at `path`
    ///
    /// Existing directories are left untouched.
    pub fn create_dir(&mut self, path: &str, create_parents: bool) -> Result<&mut DirectoryEntry<'a>> {
        self.create_dir_segments(&normalize_path(path), create_parents)
    }

    /// Create a directory at already split path segments
    pub fn create_dir_segments<S: AsRef<str>>(
        &mut self,
        segments: &[S],
        create_parents: bool,
    ) -> Result<&mut DirectoryEntry<'a>> {
        let Some((name, parents)) = segments.split_last() else {
            return Ok(self);
        };
        let parent = self.ensure_dir(parents, create_parents, segments)?;
        parent
            .files
            .entry(name.as_ref().to_string())
            .or_insert_with(|| Entry::Directory(DirectoryEntry::new()))
            .as_directory_mut()
            .ok_or_else(|| AsarError::NotADirectory(join_path(segments)))
    }

    /// Remove the entry at `path`, returning it
    pub fn remove(&mut self, path: &str) -> Result<Entry<'a>> {
        let segments = normalize_path(path);
        let not_found = || AsarError::NotFound(join_path(&segments));
        let (name, parents) = segments.split_last().ok_or_else(not_found)?;
        self.dir_at_mut(parents)
            .and_then(|dir| dir.files.shift_remove(*name))
            .ok_or_else(not_found)
    }

    /// Detach from the source buffer by copying borrowed content
    pub fn into_owned(self) -> DirectoryEntry<'static> {
        DirectoryEntry {
            files: self
                .files
                .into_iter()
                .map(|(name, entry)| (name, entry.into_owned()))
                .collect(),
        }
    }

    /// Copy of the tree without any file content
    pub fn metadata_only(&self) -> DirectoryEntry<'static> {
        DirectoryEntry {
            files: self
                .files
                .iter()
                .map(|(name, entry)| (name.clone(), entry.metadata_only()))
                .collect(),
        }
    }

    pub(crate) fn dir_at<S: AsRef<str>>(&self, segments: &[S]) -> Option<&DirectoryEntry<'a>> {
        let mut current = self;
        for segment in segments {
            current = current.files.get(segment.as_ref())?.as_directory()?;
        }
        Some(current)
    }

    fn dir_at_mut<S: AsRef<str>>(&mut self, segments: &[S]) -> Option<&mut DirectoryEntry<'a>> {
        let mut current = self;
        for segment in segments {
            current = current.files.get_mut(segment.as_ref())?.as_directory_mut()?;
        }
        Some(current)
    }

    fn ensure_dir<S: AsRef<str>>(
        &mut self,
        parents: &[S],
        create: bool,
        full_path: &[S],
    ) -> Result<&mut DirectoryEntry<'a>> {
        let mut current = self;
        for (depth, segment) in parents.iter().enumerate() {
            let segment = segment.as_ref();
            let next = if create {
                current
                    .files
                    .entry(segment.to_string())
                    .or_insert_with(|| Entry::Directory(DirectoryEntry::new()))
            } else {
                current
                    .files
                    .get_mut(segment)
                    .ok_or_else(|| AsarError::MissingParent(join_path(full_path)))?
            };
            current = next
                .as_directory_mut()
                .ok_or_else(|| AsarError::NotADirectory(join_path(&parents[..=depth])))?;
        }
        Ok(current)
    }
}
