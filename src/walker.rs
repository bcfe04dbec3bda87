/*!
 * Directory traversal producing the ordered list of files to process
 */

use std::fs;
use std::path::{Path, PathBuf};

use log::{debug, warn};
use walkdir::{DirEntry, WalkDir};

use crate::error::{FlatError, Result};
use crate::exclusion::ExclusionSet;
use crate::types::{EntryKind, FileEntry};

/// Depth-first walker over the exclusion set's root.
///
/// Entries inside each directory are visited in file-name order, so the
/// resulting sequence is the same on every platform. Excluded directories are
/// never opened. Any listing failure aborts the walk.
pub struct TreeWalker<'a> {
    exclusions: &'a ExclusionSet,
}

impl<'a> TreeWalker<'a> {
    pub fn new(exclusions: &'a ExclusionSet) -> Self {
        Self { exclusions }
    }

    /// Walk the tree and return every included regular file
    pub fn walk(&self) -> Result<Vec<FileEntry>> {
        let root = self.exclusions.root();
        let mut files = Vec::new();

        let walker = WalkDir::new(root)
            .min_depth(1)
            .follow_links(false)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|e| !self.is_excluded_dir(root, e));

        for entry in walker {
            let entry = entry?;
            let rel_path = relative_path(root, entry.path());

            // Directories reaching this point already passed the filter
            if classify(&entry, &rel_path)? != Some(EntryKind::File) {
                continue;
            }
            if self.exclusions.is_excluded(&rel_path, EntryKind::File) {
                continue;
            }

            debug!("Including {}", rel_path.display());
            files.push(FileEntry::new(entry.into_path(), rel_path));
        }

        debug!("Walk of {} found {} files", root.display(), files.len());
        Ok(files)
    }

    /// Prune excluded directories before walkdir opens them
    fn is_excluded_dir(&self, root: &Path, entry: &DirEntry) -> bool {
        entry.depth() > 0
            && entry.file_type().is_dir()
            && self
                .exclusions
                .is_excluded(&relative_path(root, entry.path()), EntryKind::Directory)
    }
}

fn relative_path(root: &Path, path: &Path) -> PathBuf {
    path.strip_prefix(root)
        .map(Path::to_path_buf)
        .unwrap_or_else(|_| path.to_path_buf())
}

/// Resolve the entry kind, following symlinks to regular files only
fn classify(entry: &DirEntry, rel_path: &Path) -> Result<Option<EntryKind>> {
    let file_type = entry.file_type();

    if file_type.is_dir() {
        return Ok(Some(EntryKind::Directory));
    }
    if file_type.is_file() {
        return Ok(Some(EntryKind::File));
    }

    if file_type.is_symlink() {
        let target =
            fs::metadata(entry.path()).map_err(|e| FlatError::traversal(entry.path(), e))?;
        if target.is_file() {
            return Ok(Some(EntryKind::File));
        }
        if target.is_dir() {
            warn!("Skipping symlinked directory {}", rel_path.display());
            return Ok(None);
        }
    }

    debug!("Skipping special file {}", rel_path.display());
    Ok(None)
}
