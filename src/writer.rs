/*!
 * Output writers: the flat copy directory and the concatenated text file
 */

use std::fs::{self, File};
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use indicatif::ProgressBar;
use log::{debug, info};
use rayon::prelude::*;
use rayon::ThreadPoolBuilder;

use crate::concat::{ConcatStats, Concatenator};
use crate::error::{FlatError, Result};
use crate::flatten::{FlattenItem, FlattenPlan};
use crate::types::FileEntry;

/// Counters for one flatten copy
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FlattenStats {
    /// Files copied
    pub files: usize,
    /// Bytes copied
    pub bytes: u64,
}

/// Writes a [`FlattenPlan`] into a freshly emptied directory
pub struct FlattenWriter {
    /// Directory receiving the flat copies
    output_dir: PathBuf,
    /// Copy threads
    threads: usize,
    /// Progress bar
    progress: Arc<ProgressBar>,
}

impl FlattenWriter {
    /// Create a new flatten writer
    pub fn new(output_dir: impl Into<PathBuf>, threads: usize, progress: Arc<ProgressBar>) -> Self {
        Self {
            output_dir: output_dir.into(),
            threads: threads.max(1),
            progress,
        }
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Empty the output directory, then copy every planned file into it.
    ///
    /// The first failed copy aborts the run; files copied before it stay.
    pub fn write(&self, plan: &FlattenPlan) -> Result<FlattenStats> {
        self.prepare()?;
        self.progress.set_length(plan.len() as u64);

        let bytes = if self.threads == 1 {
            let mut total = 0;
            for item in plan.items() {
                total += self.copy(item)?;
            }
            total
        } else {
            let pool = ThreadPoolBuilder::new()
                .num_threads(self.threads)
                .build()
                .map_err(|e| FlatError::Writer(format!("failed to build thread pool: {}", e)))?;
            pool.install(|| {
                plan.items()
                    .par_iter()
                    .map(|item| self.copy(item))
                    .try_reduce(|| 0, |a, b| Ok(a + b))
            })?
        };

        info!(
            "Copied {} files into {}",
            plan.len(),
            self.output_dir.display()
        );
        Ok(FlattenStats {
            files: plan.len(),
            bytes,
        })
    }

    /// Remove a previous output directory and recreate it.
    ///
    /// Anything at that path that is not a directory is left untouched.
    fn prepare(&self) -> Result<()> {
        match fs::symlink_metadata(&self.output_dir) {
            Ok(meta) if meta.is_dir() => {
                debug!("Removing previous output {}", self.output_dir.display());
                fs::remove_dir_all(&self.output_dir)?;
            }
            Ok(_) => {
                return Err(FlatError::Writer(format!(
                    "{} exists and is not a directory",
                    self.output_dir.display()
                )))
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => return Err(e.into()),
        }
        fs::create_dir_all(&self.output_dir)?;
        Ok(())
    }

    fn copy(&self, item: &FlattenItem) -> Result<u64> {
        let dest = self.output_dir.join(&item.name);
        let bytes = fs::copy(&item.source.path, &dest)?;
        debug!("{} -> {}", item.source.display_path(), item.name);
        self.progress.inc(1);
        Ok(bytes)
    }
}

/// Streams the concatenated artifact into a file inside its container
pub struct ConcatWriter {
    /// Container directory, created on demand and otherwise left alone
    output_dir: PathBuf,
    /// File name inside the container
    output_name: String,
    /// Progress bar
    progress: Arc<ProgressBar>,
}

impl ConcatWriter {
    /// Create a new concat writer
    pub fn new(
        output_dir: impl Into<PathBuf>,
        output_name: impl Into<String>,
        progress: Arc<ProgressBar>,
    ) -> Self {
        Self {
            output_dir: output_dir.into(),
            output_name: output_name.into(),
            progress,
        }
    }

    /// Full path of the artifact
    pub fn output_file(&self) -> PathBuf {
        self.output_dir.join(&self.output_name)
    }

    /// Write `files` in order, replacing a previous artifact of the same name
    pub fn write(&self, files: &[FileEntry]) -> Result<ConcatStats> {
        fs::create_dir_all(&self.output_dir)?;

        let path = self.output_file();
        if path.exists() {
            debug!("Removing previous output {}", path.display());
            fs::remove_file(&path)?;
        }

        self.progress.set_length(files.len() as u64);
        let writer = BufWriter::new(File::create(&path)?);
        let mut concatenator = Concatenator::new(writer);
        for entry in files {
            concatenator.append(entry)?;
            self.progress.inc(1);
        }
        let (_, stats) = concatenator.finish()?;

        info!("Wrote {} files into {}", stats.files, path.display());
        Ok(stats)
    }
}
