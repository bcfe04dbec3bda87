/*!
 * Mapping of nested relative paths onto single-segment file names
 */

use std::collections::{HashMap, HashSet};
use std::path::{Component, Path};

use crate::error::{FlatError, Result};
use crate::types::FileEntry;

/// Replaces every path separator in a flattened name
pub const DELIMITER: char = '^';

/// Extension given to remapped files
pub const TXT_EXTENSION: &str = ".txt";

/// Extensions (with leading dot) that are retargeted to `.txt`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtensionMap {
    extensions: HashSet<String>,
}

impl ExtensionMap {
    /// Build the map, adding the leading dot where it was left off
    pub fn new<I, S>(extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let extensions = extensions
            .into_iter()
            .map(|e| e.as_ref().trim().to_string())
            .filter(|e| !e.is_empty() && e != ".")
            .map(|e| if e.starts_with('.') { e } else { format!(".{}", e) })
            .collect();
        Self { extensions }
    }

    pub fn is_empty(&self) -> bool {
        self.extensions.is_empty()
    }

    /// Whether a dotted extension such as `.ts` is retargeted
    pub fn contains(&self, dotted: &str) -> bool {
        self.extensions.contains(dotted)
    }
}

/// Flatten `path` (absolute, under `root`) into one file name.
///
/// Separators become [`DELIMITER`]; when the file's extension is in
/// `extensions` it is replaced by `.txt` afterwards. A path outside `root`
/// is flattened as given.
pub fn flatten_name(path: &Path, root: &Path, extensions: &ExtensionMap) -> String {
    let rel = path.strip_prefix(root).unwrap_or(path);
    let delimiter = DELIMITER.to_string();

    let mut name = rel
        .components()
        .filter_map(|c| match c {
            Component::Normal(part) => Some(part.to_string_lossy()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join(delimiter.as_str());

    if let Some(ext) = rel.extension() {
        let dotted = format!(".{}", ext.to_string_lossy());
        if dotted != TXT_EXTENSION && extensions.contains(&dotted) {
            name.truncate(name.len() - dotted.len());
            name.push_str(TXT_EXTENSION);
        }
    }

    name
}

/// One source file and the name it is copied to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlattenItem {
    pub source: FileEntry,
    pub name: String,
}

/// Complete set of copy operations for a flatten run, free of collisions
#[derive(Debug, Clone, Default)]
pub struct FlattenPlan {
    items: Vec<FlattenItem>,
}

impl FlattenPlan {
    /// Name every file and reject the plan if two files share a name
    pub fn build(files: Vec<FileEntry>, root: &Path, extensions: &ExtensionMap) -> Result<Self> {
        let mut seen: HashMap<String, usize> = HashMap::with_capacity(files.len());
        let mut items = Vec::with_capacity(files.len());

        for source in files {
            let name = flatten_name(&source.path, root, extensions);
            if let Some(&index) = seen.get(&name) {
                let first: &FlattenItem = &items[index];
                return Err(FlatError::NameCollision {
                    name,
                    first: first.source.display_path(),
                    second: source.display_path(),
                });
            }
            seen.insert(name.clone(), items.len());
            items.push(FlattenItem { source, name });
        }

        Ok(Self { items })
    }

    pub fn items(&self) -> &[FlattenItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
