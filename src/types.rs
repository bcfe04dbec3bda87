/*!
 * Core types and data structures for flatdir
 */

use std::path::{Path, PathBuf};

/// Kind of a filesystem entry as seen by the exclusion rules
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    /// Regular file (or a link resolving to one)
    File,
    /// Directory
    Directory,
}

impl EntryKind {
    pub fn is_dir(self) -> bool {
        self == EntryKind::Directory
    }
}

/// A regular file discovered during traversal
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileEntry {
    /// Absolute path to the file
    pub path: PathBuf,
    /// Path relative to the traversal root
    pub rel_path: PathBuf,
}

impl FileEntry {
    pub fn new(path: PathBuf, rel_path: PathBuf) -> Self {
        Self { path, rel_path }
    }

    /// Relative path rendered with `/` separators on every platform
    pub fn display_path(&self) -> String {
        slash_path(&self.rel_path)
    }
}

/// Render a relative path with `/` between components
pub fn slash_path(path: &Path) -> String {
    path.components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}
