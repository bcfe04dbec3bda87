/*!
 * flatdir - Flatten or concatenate a directory tree
 *
 * This library walks a directory while honoring `.gitignore` patterns and
 * name-based exclusions, then either copies every file into one flat
 * directory (path segments joined with `^`) or writes all files into a
 * single text file under `=== path ===` headers.
 */

pub mod concat;
pub mod config;
pub mod error;
pub mod exclusion;
pub mod flatten;
pub mod report;
pub mod types;
pub mod utils;
pub mod walker;
pub mod writer;


use std::fs;
use std::sync::Arc;
use std::time::Instant;

use indicatif::ProgressBar;
use log::info;

// Re-export main components for easier access
pub use concat::{ConcatStats, Concatenator};
pub use config::{Config, Mode};
pub use error::{FlatError, Result};
pub use exclusion::{Exclusion, ExclusionSet};
pub use flatten::{flatten_name, ExtensionMap, FlattenPlan};
pub use report::{Reporter, RunKind, RunSummary};
pub use types::{EntryKind, FileEntry};
pub use walker::TreeWalker;
pub use writer::{ConcatWriter, FlattenWriter};

/// Execute one invocation described by `config`.
///
/// Validation happens before anything is written. Traversal and copy errors
/// abort the run and may leave partial output behind.
pub fn run(config: &Config, progress: Arc<ProgressBar>) -> Result<RunSummary> {
    config.validate()?;
    let start = Instant::now();

    let root = fs::canonicalize(&config.target_dir)?;
    let exclusions = ExclusionSet::load(&root, &config.exclude_dirs, &config.exclude_files)?;

    progress.set_message(format!("Scanning {}", root.display()));
    let files = TreeWalker::new(&exclusions).walk()?;
    info!("Found {} files under {}", files.len(), root.display());

    let output_dir = config.output_dir(&root);
    let summary = match &config.mode {
        Mode::Flatten {
            extensions,
            threads,
        } => {
            let plan = FlattenPlan::build(files, &root, extensions)?;
            progress.set_message("Copying");
            let stats = FlattenWriter::new(&output_dir, *threads, progress).write(&plan)?;
            RunSummary {
                kind: RunKind::Flatten,
                output: output_dir,
                files: stats.files,
                bytes: stats.bytes,
                unreadable: 0,
                duration: start.elapsed(),
            }
        }
        Mode::Concat { output_name } => {
            progress.set_message("Concatenating");
            let writer = ConcatWriter::new(&output_dir, output_name.as_str(), progress);
            let stats = writer.write(&files)?;
            RunSummary {
                kind: RunKind::Concat,
                output: writer.output_file(),
                files: stats.files,
                bytes: stats.bytes,
                unreadable: stats.unreadable,
                duration: start.elapsed(),
            }
        }
    };

    Ok(summary)
}
