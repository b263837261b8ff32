//! Error types and Result aliases for bootconf.
//!
//! Every failure during bootstrap is fatal to the caller except a missing
//! profile hook, which is skipped without producing an error at all.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using bootconf's Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for bootconf operations.
#[derive(Error, Debug)]
pub enum Error {
    /// Required property not resolvable from any source.
    #[error("property not found: {0}")]
    PropertyNotFound(String),

    /// Write-once registration attempted twice.
    #[error("property already exists: {0}")]
    AlreadyRegistered(String),

    /// A file named through a configuration key does not exist.
    #[error("{key} file not found: {}", path.display())]
    ConfiguredFileMissing { key: &'static str, path: PathBuf },

    /// Non-blank, non-comment line without a `=` separator.
    #[error("malformed property line {line_number} in {}: '{line}'", path.display())]
    MalformedLine {
        path: PathBuf,
        line_number: usize,
        line: String,
    },

    /// Property exists but holds a value of a different kind.
    #[error("property '{name}' is not a {expected}")]
    PropertyType { name: String, expected: &'static str },

    /// No module registered under the requested name.
    #[error("module not found: {0}")]
    ModuleNotFound(String),

    /// Module or profile hook exists but failed.
    #[error("failed to load module '{name}': {reason}")]
    ModuleLoad { name: String, reason: String },

    /// Logging configuration error.
    #[error("logging error: {0}")]
    Logging(String),

    /// I/O error while reading a file.
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl Error {
    /// Create a logging configuration error.
    pub fn logging(msg: impl Into<String>) -> Self {
        Self::Logging(msg.into())
    }

    /// Create a module load error.
    pub fn module_load(name: impl Into<String>, reason: impl ToString) -> Self {
        Self::ModuleLoad {
            name: name.into(),
            reason: reason.to_string(),
        }
    }

    /// Wrap an I/O error with the path it occurred on.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// True for the not-found conditions of lookup and module resolution.
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::PropertyNotFound(_) | Self::ModuleNotFound(_))
    }
}
