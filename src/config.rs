/*!
 * Configuration handling for flatdir
 */

use std::path::{Path, PathBuf};

use clap::{ArgAction, Parser, Subcommand};
use clap_complete::Shell;

use crate::error::Result;
use crate::exclusion::{CONCAT_DIR, DEFAULT_EXCLUDED_FILES, FLATTEN_DIR};
use crate::flatten::ExtensionMap;
use crate::{bail, ensure};

/// Default file name of the concatenated artifact
pub const DEFAULT_CONCAT_FILE: &str = "all.txt";

/// Command-line arguments for flatdir
#[derive(Parser, Debug, Clone)]
#[clap(
    name = "flatdir",
    version = env!("CARGO_PKG_VERSION"),
    about = "Flatten a directory tree or concatenate it into one text file",
    long_about = "Prepares a codebase for tools that cannot browse nested directories: either copies every file into one flat directory with the path encoded in the file name, or writes all files into a single text file under path headers."
)]
pub struct Args {
    #[clap(subcommand)]
    pub command: Option<Command>,

    /// Increase log verbosity (-v, -vv, -vvv)
    #[clap(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Only print errors
    #[clap(short, long, global = true)]
    pub quiet: bool,
}

/// Subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Copy every file into `flattened/`, joining path segments with '^'
    Flatten(FlattenArgs),

    /// Write every file into one text file under `concatenated/`
    Concat(ConcatArgs),

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[clap(value_enum)]
        shell: Shell,
    },
}

/// Arguments shared by both transforms
#[derive(clap::Args, Debug, Clone)]
pub struct SourceArgs {
    /// Directory to process
    #[clap(default_value = ".")]
    pub directory: PathBuf,

    /// Directory name to exclude at any depth (repeatable)
    #[clap(long = "excludeDir", alias = "exclude-dir", value_name = "NAME")]
    pub exclude_dir: Vec<String>,

    /// File name to exclude at any depth (repeatable)
    #[clap(long = "excludeFile", alias = "exclude-file", value_name = "NAME")]
    pub exclude_file: Vec<String>,

    /// Print a summary table after a successful run
    #[clap(long)]
    pub summary: bool,
}

#[derive(clap::Args, Debug, Clone)]
pub struct FlattenArgs {
    #[clap(flatten)]
    pub source: SourceArgs,

    /// Extension (e.g. ".ts") to rename to ".txt" in output names (repeatable)
    #[clap(long = "toTxt", alias = "to-txt", value_name = "EXT")]
    pub to_txt: Vec<String>,

    /// Number of threads used to copy files
    #[clap(long, default_value = "1")]
    pub threads: usize,
}

#[derive(clap::Args, Debug, Clone)]
pub struct ConcatArgs {
    #[clap(flatten)]
    pub source: SourceArgs,

    /// Output file name inside `concatenated/`
    #[clap(long, default_value = DEFAULT_CONCAT_FILE)]
    pub output: String,
}

/// Which transform a run performs
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mode {
    /// Flat copy of every file
    Flatten {
        /// Extensions retargeted to `.txt`
        extensions: ExtensionMap,
        /// Copy threads
        threads: usize,
    },
    /// Single concatenated text file
    Concat {
        /// File name inside the concat container
        output_name: String,
    },
}

/// Application configuration for one invocation
#[derive(Clone, Debug)]
pub struct Config {
    /// Target directory to process
    pub target_dir: PathBuf,

    /// Transform to run
    pub mode: Mode,

    /// Directory names excluded anywhere in the tree
    pub exclude_dirs: Vec<String>,

    /// File names excluded anywhere in the tree, lockfiles included
    pub exclude_files: Vec<String>,

    /// Print a summary table after success
    pub show_summary: bool,
}

impl Config {
    /// Configuration with the default exclusions and nothing else
    pub fn new(target_dir: impl Into<PathBuf>, mode: Mode) -> Self {
        Self {
            target_dir: target_dir.into(),
            mode,
            exclude_dirs: Vec::new(),
            exclude_files: DEFAULT_EXCLUDED_FILES.iter().map(|s| s.to_string()).collect(),
            show_summary: false,
        }
    }

    /// Create configuration from the flatten subcommand
    pub fn from_flatten_args(args: FlattenArgs) -> Self {
        let mode = Mode::Flatten {
            extensions: ExtensionMap::new(&args.to_txt),
            threads: args.threads,
        };
        Self::new(args.source.directory.clone(), mode).with_source_args(args.source)
    }

    /// Create configuration from the concat subcommand
    pub fn from_concat_args(args: ConcatArgs) -> Self {
        let mode = Mode::Concat {
            output_name: args.output,
        };
        Self::new(args.source.directory.clone(), mode).with_source_args(args.source)
    }

    fn with_source_args(mut self, source: SourceArgs) -> Self {
        self.exclude_dirs.extend(source.exclude_dir);
        self.exclude_files.extend(source.exclude_file);
        self.show_summary = source.summary;
        self
    }

    /// Add directory names to exclude
    pub fn exclude_dirs<I: IntoIterator<Item = S>, S: Into<String>>(mut self, names: I) -> Self {
        self.exclude_dirs.extend(names.into_iter().map(Into::into));
        self
    }

    /// Add file names to exclude
    pub fn exclude_files<I: IntoIterator<Item = S>, S: Into<String>>(mut self, names: I) -> Self {
        self.exclude_files.extend(names.into_iter().map(Into::into));
        self
    }

    /// Name of the output container for this mode
    pub fn container_name(&self) -> &'static str {
        match self.mode {
            Mode::Flatten { .. } => FLATTEN_DIR,
            Mode::Concat { .. } => CONCAT_DIR,
        }
    }

    /// Output container resolved against `root`
    pub fn output_dir(&self, root: &Path) -> PathBuf {
        root.join(self.container_name())
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        let target = self.target_dir.display().to_string();
        ensure!(self.target_dir.exists(), PathNotFound, "{}", target);
        ensure!(self.target_dir.is_dir(), NotADirectory, "{}", target);

        match &self.mode {
            Mode::Flatten { threads, .. } => {
                ensure!(*threads > 0, InvalidArgument, "--threads must be at least 1");
            }
            Mode::Concat { output_name } => validate_output_name(output_name)?,
        }

        // A non-directory at the container path is user input, never output
        let container = self.output_dir(&self.target_dir);
        if let Ok(meta) = std::fs::symlink_metadata(&container) {
            ensure!(
                meta.is_dir(),
                InvalidArgument,
                "{} exists and is not a directory; move it before running",
                container.display()
            );
        }

        Ok(())
    }
}

/// The concat output must be a plain file name inside the container
fn validate_output_name(name: &str) -> Result<()> {
    if name.is_empty() || name == "." || name == ".." {
        bail!(InvalidArgument, "invalid output file name '{}'", name);
    }
    if name.contains('/') || name.contains(std::path::MAIN_SEPARATOR) {
        bail!(
            InvalidArgument,
            "output file name '{}' must not contain path separators",
            name
        );
    }
    Ok(())
}
