//! Lazy depth-first traversal of an entry tree
//!
//! A [`Walk`] borrows the tree it traverses, so the tree cannot be mutated
//! while the iterator is alive. Collect the items first when a traversal has
//! to drive writes.

use indexmap::map::Iter;

use crate::entry::{DirectoryEntry, Entry};

/// One item produced by [`Walk`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WalkItem<'t, 'a> {
    /// Name of the entry within its parent directory
    pub name: &'t str,
    /// Path segments from the root, ending with `name`
    pub path: Vec<&'t str>,
    /// The entry itself
    pub entry: &'t Entry<'a>,
}

impl WalkItem<'_, '_> {
    /// Path joined with `/`
    pub fn path_string(&self) -> String {
        self.path.join("/")
    }
}

/// Pre-order iterator over every entry below a directory
#[derive(Debug, Clone)]
pub struct Walk<'t, 'a> {
    stack: Vec<Iter<'t, String, Entry<'a>>>,
    prefix: Vec<&'t str>,
    include_directories: bool,
}

impl<'t, 'a> Walk<'t, 'a> {
    pub(crate) fn new(root: &'t DirectoryEntry<'a>, include_directories: bool) -> Self {
        Self {
            stack: vec![root.files.iter()],
            prefix: Vec::new(),
            include_directories,
        }
    }
}

impl<'t, 'a> Iterator for Walk<'t, 'a> {
    type Item = WalkItem<'t, 'a>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let Some((name, entry)) = self.stack.last_mut()?.next() else {
                // Directory exhausted. The root has no prefix segment, so the
                // pop on the last frame is a no-op.
                self.stack.pop();
                self.prefix.pop();
                continue;
            };

            let mut path = self.prefix.clone();
            path.push(name.as_str());
            let item = WalkItem {
                name: name.as_str(),
                path,
                entry,
            };

            match entry {
                Entry::File(_) => return Some(item),
                Entry::Directory(dir) => {
                    self.stack.push(dir.files.iter());
                    self.prefix.push(name.as_str());
                    if self.include_directories {
                        return Some(item);
                    }
                }
            }
        }
    }
}
