//! Global error handling for flatdir
//!
//! This module provides a centralized error type covering validation,
//! traversal, naming and output failures.

use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Global error type for flatdir operations
#[derive(Error, Debug)]
pub enum FlatError {
    /// File system errors
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// The ignore-pattern file could not be parsed
    #[error("Ignore file error: {0}")]
    Ignore(#[from] ignore::Error),

    /// Target path does not exist
    #[error("Directory not found: {0}")]
    PathNotFound(String),

    /// Target path exists but is not a directory
    #[error("Not a directory: {0}")]
    NotADirectory(String),

    /// A directory could not be listed or an entry could not be inspected
    #[error("Failed to read {}: {source}", path.display())]
    Traversal {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Two source files flatten to the same output name
    #[error("Name collision: '{name}' would be produced by both {first} and {second}")]
    NameCollision {
        name: String,
        first: String,
        second: String,
    },

    /// Invalid argument
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Writer errors
    #[error("Writer error: {0}")]
    Writer(String),
}

/// Specialized Result type for flatdir operations
pub type Result<T> = std::result::Result<T, FlatError>;

/// Creates a FlatError with a formatted message
#[macro_export]
macro_rules! error {
    ($error_type:ident, $($arg:tt)*) => {
        $crate::error::FlatError::$error_type(format!($($arg)*))
    };
}

/// Returns an error result with a formatted message
#[macro_export]
macro_rules! bail {
    ($error_type:ident, $($arg:tt)*) => {
        return Err($crate::error!($error_type, $($arg)*))
    };
}

/// Ensures a condition is true, otherwise returns an error
#[macro_export]
macro_rules! ensure {
    ($cond:expr, $error_type:ident, $($arg:tt)*) => {
        if !($cond) {
            $crate::bail!($error_type, $($arg)*)
        }
    };
}

impl FlatError {
    /// Wrap an io error raised while inspecting `path` during traversal
    pub fn traversal(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Traversal {
            path: path.into(),
            source,
        }
    }
}

// Listing failures reported by the walker keep the path that failed
impl From<walkdir::Error> for FlatError {
    fn from(err: walkdir::Error) -> Self {
        let path = err.path().map(Path::to_path_buf).unwrap_or_default();
        Self::Traversal {
            path,
            source: err.into(),
        }
    }
}

// Allow converting FlatError to io::Error for callers that speak io results
impl From<FlatError> for io::Error {
    fn from(err: FlatError) -> Self {
        match err {
            FlatError::Io(e) => e,
            other => io::Error::new(io::ErrorKind::Other, other.to_string()),
        }
    }
}
