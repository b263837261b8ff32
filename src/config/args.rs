//! Command-line override parsing.

use std::collections::HashMap;

/// Flags extracted from process arguments.
///
/// Populated once and never mutated afterwards.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandLine {
    flags: HashMap<String, String>,
}

impl CommandLine {
    /// Parse an argument list, program name excluded.
    ///
    /// Tokens that are not `--name` or `--name=value` are ignored. A repeated
    /// name keeps its last value.
    pub fn parse<I, S>(args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut flags = HashMap::new();
        for arg in args {
            if let Some((name, value)) = parse_flag(arg.as_ref()) {
                flags.insert(name.to_string(), value.to_string());
            }
        }
        Self { flags }
    }

    /// Value for `name`; a bare flag yields `""`.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.flags.get(name).map(String::as_str)
    }

    /// True if `name` was given, with or without a value.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.flags.contains_key(name)
    }

    /// Flag names, in no particular order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.flags.keys().map(String::as_str)
    }

    /// Number of distinct flag names.
    #[must_use]
    pub fn len(&self) -> usize {
        self.flags.len()
    }

    /// True if no flag was recognized.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.flags.is_empty()
    }
}

/// Split a single `--name[=value]` token.
///
/// The name must be non-empty and contain no `=`. When `=` is present the
/// value must be non-empty, so `--name=` is not a flag. Everything after the
/// first `=` belongs to the value.
#[must_use]
pub fn parse_flag(arg: &str) -> Option<(&str, &str)> {
    let rest = arg.strip_prefix("--")?;
    match rest.split_once('=') {
        None if !rest.is_empty() => Some((rest, "")),
        Some((name, value)) if !name.is_empty() && !value.is_empty() => Some((name, value)),
        _ => None,
    }
}
