//! The configuration context and its precedence lookup.

use std::collections::BTreeSet;
use std::path::Path;

use serde::Serialize;

use crate::config::keys::{APPLICATION_PROPERTIES, RUNTIME_PROFILE};
use crate::config::{
    env_name, profile_file_name, CommandLine, Environment, ModuleRegistry, Properties, Value,
    APPLICATION_FILE_NAME,
};
use crate::{Error, Result};

/// Layer a lookup was answered from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Source {
    CommandLine,
    Environment,
    Properties,
}

impl Source {
    /// Snake-case name, as serialized.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::CommandLine => "command_line",
            Self::Environment => "environment",
            Self::Properties => "properties",
        }
    }
}

/// Process configuration built once by [`crate::Bootstrap`].
///
/// Every read goes through [`Config::lookup`]: command line, then the
/// environment snapshot, then properties.
#[derive(Debug, Default)]
pub struct Config {
    command_line: CommandLine,
    environment: Environment,
    properties: Properties,
    modules: ModuleRegistry,
}

impl Config {
    /// Context with empty properties and no modules.
    #[must_use]
    pub fn new(command_line: CommandLine, environment: Environment) -> Self {
        Self {
            command_line,
            environment,
            properties: Properties::new(),
            modules: ModuleRegistry::new(),
        }
    }

    /// Attach the factories used by [`Config::add_module`].
    #[must_use]
    pub fn with_modules(mut self, modules: ModuleRegistry) -> Self {
        self.modules = modules;
        self
    }

    /// Resolve `name` and report which layer answered.
    #[must_use]
    pub fn lookup(&self, name: &str) -> Option<(Value, Source)> {
        if let Some(value) = self.command_line.get(name) {
            return Some((Value::from(value), Source::CommandLine));
        }

        if let Some(value) = self.environment.get(&env_name(name)) {
            return Some((Value::from(value), Source::Environment));
        }

        self.properties
            .get(name)
            .map(|value| (value.clone(), Source::Properties))
    }

    /// Required lookup.
    ///
    /// # Errors
    ///
    /// Returns [`Error::PropertyNotFound`] if no layer has `name`.
    pub fn get(&self, name: &str) -> Result<Value> {
        self.get_optional(name)
            .ok_or_else(|| Error::PropertyNotFound(name.to_string()))
    }

    /// Lookup falling back to `default`.
    #[must_use]
    pub fn get_or(&self, name: &str, default: impl Into<Value>) -> Value {
        self.get_optional(name).unwrap_or_else(|| default.into())
    }

    /// Lookup where absence is not an error.
    #[must_use]
    pub fn get_optional(&self, name: &str) -> Option<Value> {
        self.lookup(name).map(|(value, _)| value)
    }

    /// Required text lookup.
    ///
    /// # Errors
    ///
    /// Returns [`Error::PropertyNotFound`] if absent, or
    /// [`Error::PropertyType`] if `name` holds a registered handle.
    pub fn get_str(&self, name: &str) -> Result<String> {
        self.get(name)?.into_text().ok_or_else(|| Error::PropertyType {
            name: name.to_string(),
            expected: "string",
        })
    }

    /// Text lookup falling back to `default`; a handle counts as absent.
    #[must_use]
    pub fn get_str_or(&self, name: &str, default: &str) -> String {
        self.get_str_optional(name)
            .unwrap_or_else(|| default.to_string())
    }

    /// Optional text lookup; a handle counts as absent.
    #[must_use]
    pub fn get_str_optional(&self, name: &str) -> Option<String> {
        self.get_optional(name).and_then(Value::into_text)
    }

    /// True if any layer has `name`, even with an empty value.
    #[must_use]
    pub fn has(&self, name: &str) -> bool {
        self.lookup(name).is_some()
    }

    /// Active profile from `runtime.profile`, if any.
    #[must_use]
    pub fn profile(&self) -> Option<String> {
        self.get_str_optional(RUNTIME_PROFILE)
    }

    /// Write-once registration of an arbitrary value.
    ///
    /// # Errors
    ///
    /// Returns [`Error::AlreadyRegistered`] if properties already hold `name`,
    /// whether it came from a file or an earlier registration.
    pub fn register(&mut self, name: impl Into<String>, value: Value) -> Result<()> {
        self.properties.register(name, value)
    }

    /// # Errors
    ///
    /// See [`Config::register`].
    pub fn register_text(&mut self, name: impl Into<String>, value: impl Into<String>) -> Result<()> {
        self.register(name, Value::Text(value.into()))
    }

    /// # Errors
    ///
    /// See [`Config::register`].
    pub fn register_handle<T>(&mut self, name: impl Into<String>, object: T) -> Result<()>
    where
        T: std::any::Any + Send + Sync,
    {
        self.register(name, Value::handle(object))
    }

    /// Build the module named `module` and register it under `key`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ModuleNotFound`], [`Error::ModuleLoad`] or
    /// [`Error::AlreadyRegistered`].
    pub fn add_module(&mut self, key: impl Into<String>, module: &str) -> Result<()> {
        let handle = self.modules.load(module)?;
        self.register(key, Value::Handle(handle))
    }

    /// Load one properties file; a missing file is skipped.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load_properties_file(&mut self, path: &Path) -> Result<bool> {
        self.properties.load_file(path)
    }

    /// Load `application.properties` from `dir`, then the file for the active
    /// profile.
    ///
    /// The profile is resolved after the first file, so a profile set there
    /// selects the second.
    ///
    /// # Errors
    ///
    /// Returns an error if either file exists but cannot be read or parsed.
    pub fn load_properties_dir(&mut self, dir: &Path) -> Result<()> {
        self.load_properties_file(&dir.join(APPLICATION_FILE_NAME))?;

        if let Some(profile) = self.profile() {
            self.load_properties_file(&dir.join(profile_file_name(&profile)))?;
        }
        Ok(())
    }

    /// Load the file named by `application.properties`, if that key is set.
    ///
    /// Relative paths resolve against `working_dir`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ConfiguredFileMissing`] if the value does not name a
    /// regular file (an empty value names the directory), or any read or
    /// parse error.
    pub fn load_external_properties(&mut self, working_dir: &Path) -> Result<()> {
        let Some(configured) = self.get_str_optional(APPLICATION_PROPERTIES) else {
            return Ok(());
        };

        let path = working_dir.join(configured);
        if !path.is_file() {
            return Err(Error::ConfiguredFileMissing {
                key: APPLICATION_PROPERTIES,
                path,
            });
        }
        self.load_properties_file(&path)?;
        Ok(())
    }

    /// Every name known from the command line or properties, resolved, sorted.
    ///
    /// Names that exist only in the environment are not listed.
    #[must_use]
    pub fn entries(&self) -> Vec<(String, Value, Source)> {
        let names: BTreeSet<&str> = self
            .command_line
            .names()
            .chain(self.properties.names())
            .collect();

        names
            .into_iter()
            .filter_map(|name| {
                self.lookup(name)
                    .map(|(value, source)| (name.to_string(), value, source))
            })
            .collect()
    }

    /// Parsed command-line overrides.
    #[must_use]
    pub const fn command_line(&self) -> &CommandLine {
        &self.command_line
    }

    /// File-loaded and registered properties, without the higher layers.
    #[must_use]
    pub const fn properties(&self) -> &Properties {
        &self.properties
    }
}
