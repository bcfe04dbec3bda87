/*!
 * Exclusion rules: structural skips, name-based exclusions and `.gitignore`
 * patterns merged into a single predicate over root-relative paths.
 */

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use ignore::gitignore::{Gitignore, GitignoreBuilder};
use log::{debug, warn};

use crate::error::Result;
use crate::types::EntryKind;

/// Version-control metadata directory, skipped at any depth
pub const VCS_DIR: &str = ".git";

/// Output container of the flatten command, reserved at the root
pub const FLATTEN_DIR: &str = "flattened";

/// Output container of the concat command, reserved at the root
pub const CONCAT_DIR: &str = "concatenated";

/// Ignore-pattern file read from the root
pub const IGNORE_FILE: &str = ".gitignore";

/// Dependency lockfiles excluded unless the caller builds its own set
pub const DEFAULT_EXCLUDED_FILES: &[&str] = &["yarn.lock", "package-lock.json", "pnpm-lock.yaml"];

/// Which rule voted to exclude an entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Exclusion {
    /// Output container or version-control directory
    Structural,
    /// Directory name listed for exclusion
    DirName,
    /// File name listed for exclusion
    FileName,
    /// Matched by the root `.gitignore`
    IgnorePattern,
}

/// Read-only exclusion state computed once per run
#[derive(Debug, Clone)]
pub struct ExclusionSet {
    root: PathBuf,
    dir_names: HashSet<String>,
    file_names: HashSet<String>,
    gitignore: Gitignore,
}

impl ExclusionSet {
    /// Build the set for `root`, loading `<root>/.gitignore` when present
    pub fn load<D, F>(root: &Path, dir_names: D, file_names: F) -> Result<Self>
    where
        D: IntoIterator,
        D::Item: Into<String>,
        F: IntoIterator,
        F::Item: Into<String>,
    {
        let gitignore = load_gitignore(root)?;
        Ok(Self::with_gitignore(root, dir_names, file_names, gitignore))
    }

    /// Build the set with an already-compiled ignore matcher
    pub fn with_gitignore<D, F>(root: &Path, dir_names: D, file_names: F, gitignore: Gitignore) -> Self
    where
        D: IntoIterator,
        D::Item: Into<String>,
        F: IntoIterator,
        F::Item: Into<String>,
    {
        Self {
            root: root.to_path_buf(),
            dir_names: dir_names.into_iter().map(Into::into).collect(),
            file_names: file_names.into_iter().map(Into::into).collect(),
            gitignore,
        }
    }

    /// Root all relative paths are resolved against
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Number of patterns loaded from `.gitignore`
    pub fn pattern_count(&self) -> usize {
        self.gitignore.num_ignores() as usize + self.gitignore.num_whitelists() as usize
    }

    /// Decide whether `rel_path` is excluded and by which rule.
    ///
    /// Rules are checked in precedence order: structural skips, then names,
    /// then ignore patterns. The first vote wins; nothing un-excludes.
    pub fn check(&self, rel_path: &Path, kind: EntryKind) -> Option<Exclusion> {
        let name = rel_path
            .file_name()
            .map(|n| n.to_string_lossy())
            .unwrap_or_default();

        if is_structural(rel_path, &name, kind) {
            return Some(Exclusion::Structural);
        }

        match kind {
            EntryKind::Directory if self.dir_names.contains(&*name) => {
                return Some(Exclusion::DirName)
            }
            EntryKind::File if self.file_names.contains(&*name) => {
                return Some(Exclusion::FileName)
            }
            _ => {}
        }

        if self.gitignore.matched(rel_path, kind.is_dir()).is_ignore() {
            return Some(Exclusion::IgnorePattern);
        }

        None
    }

    /// Predicate form of [`ExclusionSet::check`]
    pub fn is_excluded(&self, rel_path: &Path, kind: EntryKind) -> bool {
        match self.check(rel_path, kind) {
            Some(reason) => {
                debug!("Excluding {} ({:?})", rel_path.display(), reason);
                true
            }
            None => false,
        }
    }
}

fn is_structural(rel_path: &Path, name: &str, kind: EntryKind) -> bool {
    if name == VCS_DIR {
        return true;
    }
    // Output containers are reserved only directly under the root
    kind.is_dir()
        && rel_path.components().count() == 1
        && (name == FLATTEN_DIR || name == CONCAT_DIR)
}

/// Compile `<root>/.gitignore`; a missing file yields an empty matcher
pub fn load_gitignore(root: &Path) -> Result<Gitignore> {
    let path = root.join(IGNORE_FILE);
    if !path.is_file() {
        debug!("No {} at {}", IGNORE_FILE, root.display());
        return Ok(Gitignore::empty());
    }

    let mut builder = GitignoreBuilder::new(root);
    if let Some(err) = builder.add(&path) {
        if err.is_io() {
            return Err(err.into());
        }
        // Bad lines are dropped; the remaining patterns still apply
        warn!("Skipping invalid patterns in {}: {}", path.display(), err);
    }

    let gitignore = builder.build()?;
    debug!(
        "Loaded {} patterns from {}",
        gitignore.len(),
        path.display()
    );
    Ok(gitignore)
}
