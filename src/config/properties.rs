//! Property file parsing and the in-memory properties map.
//!
//! File format: UTF-8, one `key=value` per line. Lines are trimmed; blank
//! lines and lines starting with `#` are skipped. The split happens on the
//! first `=` only and both sides are trimmed again.

use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::Path;

use crate::config::Value;
use crate::{Error, Result};

/// Base name of the per-directory properties file.
pub const APPLICATION_FILE_NAME: &str = "application.properties";

/// Name of the profile-specific properties file, `application-<profile>.properties`.
#[must_use]
pub fn profile_file_name(profile: &str) -> String {
    format!("application-{profile}.properties")
}

/// Parse properties text into ordered `(key, value)` pairs.
///
/// `path` is only used for error reporting.
///
/// # Errors
///
/// Returns [`Error::MalformedLine`] for a line without `=`.
pub fn parse_properties(content: &str, path: &Path) -> Result<Vec<(String, String)>> {
    let mut pairs = Vec::new();

    for (index, raw) in content.lines().enumerate() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let (key, value) = line.split_once('=').ok_or_else(|| Error::MalformedLine {
            path: path.to_path_buf(),
            line_number: index + 1,
            line: line.to_string(),
        })?;
        pairs.push((key.trim().to_string(), value.trim().to_string()));
    }

    Ok(pairs)
}

/// Read and parse a properties file.
///
/// Returns `Ok(None)` when the file does not exist.
///
/// # Errors
///
/// Returns an error if the file cannot be read, is not UTF-8, or has a
/// malformed line.
pub fn read_properties(path: &Path) -> Result<Option<Vec<(String, String)>>> {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(None),
        Err(err) => return Err(Error::io(path, err)),
    };

    parse_properties(&content, path).map(Some)
}

/// File-loaded and programmatically registered properties.
#[derive(Debug, Clone, Default)]
pub struct Properties {
    entries: HashMap<String, Value>,
}

impl Properties {
    /// Create an empty map.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or overwrite; used by file loads.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        self.entries.insert(name.into(), value.into());
    }

    /// Write-once insert.
    ///
    /// # Errors
    ///
    /// Returns [`Error::AlreadyRegistered`] if `name` is already present; the
    /// stored value is left untouched.
    pub fn register(&mut self, name: impl Into<String>, value: Value) -> Result<()> {
        let name = name.into();
        if self.entries.contains_key(&name) {
            return Err(Error::AlreadyRegistered(name));
        }
        self.entries.insert(name, value);
        Ok(())
    }

    /// Load a properties file, overwriting existing keys.
    ///
    /// Returns `false` without touching anything if the file does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed. No
    /// entries are applied from a file that fails to parse.
    pub fn load_file(&mut self, path: &Path) -> Result<bool> {
        let Some(pairs) = read_properties(path)? else {
            return Ok(false);
        };

        tracing::debug!(path = %path.display(), "loading properties");
        for (key, value) in pairs {
            self.insert(key, value);
        }
        Ok(true)
    }

    /// Stored value for `name`; no environment or command-line lookup.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.entries.get(name)
    }

    /// True if `name` was loaded or registered.
    #[must_use]
    pub fn contains_key(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// Stored names, in no particular order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Number of stored properties.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True if nothing was loaded or registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
