//! Logging configuration and installation.
//!
//! Resolves logging settings from the `logging.properties` key, a
//! `logging.properties` file in the working directory, or a plain info-level
//! default, then installs a `tracing` subscriber. The logging file uses the
//! same `key=value` format as application properties:
//!
//! ```text
//! level=warn
//! format=json
//! ansi=false
//! target=true
//! logger.hyper=error
//! ```

use std::fmt;
use std::path::{Path, PathBuf};

use tracing_subscriber::{
    filter::{EnvFilter, LevelFilter},
    fmt as tracing_fmt,
    layer::SubscriberExt,
    util::SubscriberInitExt,
    Registry,
};

use crate::config::keys::{DEBUG, DEVELOPMENT_PROFILE, LOGGING_PROPERTIES};
use crate::config::{read_properties, Config};
use crate::{Error, Result};

/// File name looked for in the working directory when no logging file is configured.
pub const DEFAULT_LOGGING_FILE: &str = "logging.properties";

const LOGGER_PREFIX: &str = "logger.";

/// Output format of the installed subscriber.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

/// Resolved logging configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoggingSettings {
    /// File the settings were read from; `None` for the basic default.
    pub source: Option<PathBuf>,
    /// Root level.
    pub level: LevelFilter,
    /// Per-target levels, in file order.
    pub targets: Vec<(String, LevelFilter)>,
    pub format: LogFormat,
    pub ansi: bool,
    pub show_target: bool,
    /// Root level was raised to debug by profile or `debug` flag.
    pub debug_forced: bool,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            source: None,
            level: LevelFilter::INFO,
            targets: Vec::new(),
            format: LogFormat::Text,
            ansi: true,
            show_target: true,
            debug_forced: false,
        }
    }
}

impl LoggingSettings {
    /// Resolve settings using only what `config` can answer right now.
    ///
    /// Relative paths resolve against `working_dir`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ConfiguredFileMissing`] if `logging.properties` does not
    /// name a regular file, or an error if the logging file is invalid.
    pub fn resolve(config: &Config, working_dir: &Path) -> Result<Self> {
        let source = match config.get_str_optional(LOGGING_PROPERTIES) {
            Some(configured) => {
                let path = working_dir.join(configured);
                if !path.is_file() {
                    return Err(Error::ConfiguredFileMissing {
                        key: LOGGING_PROPERTIES,
                        path,
                    });
                }
                Some(path)
            }
            None => Some(working_dir.join(DEFAULT_LOGGING_FILE)).filter(|path| path.is_file()),
        };

        let mut settings = match source {
            Some(path) => Self::from_file(&path)?,
            None => Self::default(),
        };

        if config.profile().as_deref() == Some(DEVELOPMENT_PROFILE) || config.has(DEBUG) {
            settings.force_debug();
        }

        Ok(settings)
    }

    /// Read settings from a logging properties file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file is missing, malformed, or holds an invalid
    /// level or format.
    pub fn from_file(path: &Path) -> Result<Self> {
        let pairs = read_properties(path)?.ok_or_else(|| Error::ConfiguredFileMissing {
            key: LOGGING_PROPERTIES,
            path: path.to_path_buf(),
        })?;

        let mut settings = Self {
            source: Some(path.to_path_buf()),
            ..Self::default()
        };

        for (key, value) in pairs {
            match key.as_str() {
                "level" => settings.level = parse_level(&value)?,
                "format" => settings.format = parse_format(&value)?,
                "ansi" => settings.ansi = parse_bool(&key, &value)?,
                "target" => settings.show_target = parse_bool(&key, &value)?,
                _ => {
                    if let Some(target) = key.strip_prefix(LOGGER_PREFIX) {
                        settings
                            .targets
                            .push((target.to_string(), parse_level(&value)?));
                    } else {
                        tracing::debug!(key = %key, path = %path.display(), "ignoring unknown logging key");
                    }
                }
            }
        }

        Ok(settings)
    }

    /// Raise the root level to debug; per-target levels are left alone.
    pub fn force_debug(&mut self) {
        self.level = LevelFilter::DEBUG;
        self.debug_forced = true;
    }

    /// Filter directives, root level first, e.g. `debug,hyper=error`.
    #[must_use]
    pub fn directives(&self) -> String {
        std::iter::once(self.level.to_string().to_lowercase())
            .chain(
                self.targets
                    .iter()
                    .map(|(target, level)| format!("{target}={}", level.to_string().to_lowercase())),
            )
            .collect::<Vec<_>>()
            .join(",")
    }

    /// Build the filter for these settings.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Logging`] if a target name does not form a valid directive.
    pub fn env_filter(&self) -> Result<EnvFilter> {
        EnvFilter::try_new(self.directives())
            .map_err(|err| Error::logging(format!("invalid filter '{}': {err}", self.directives())))
    }

    /// Install the global subscriber.
    ///
    /// Returns `false` if a global dispatcher was already set; that is not
    /// treated as an error. The `log` bridge is best effort: if another `log`
    /// logger is already registered it is kept, and the subscriber still
    /// counts as installed.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Logging`] if the filter cannot be built or the
    /// subscriber could not be set.
    pub fn install(&self) -> Result<bool> {
        if tracing::dispatcher::has_been_set() {
            tracing::debug!("global subscriber already installed");
            return Ok(false);
        }

        let env_filter = self.env_filter()?;

        let result = match self.format {
            LogFormat::Json => {
                let json_layer = tracing_fmt::layer()
                    .json()
                    .with_target(self.show_target)
                    .with_file(true)
                    .with_line_number(true);

                Registry::default().with(env_filter).with(json_layer).try_init()
            }
            LogFormat::Text => {
                let fmt_layer = tracing_fmt::layer()
                    .with_ansi(self.ansi)
                    .with_target(self.show_target);

                Registry::default().with(env_filter).with(fmt_layer).try_init()
            }
        };

        if let Err(err) = result {
            if !tracing::dispatcher::has_been_set() {
                return Err(Error::logging(format!("failed to install subscriber: {err}")));
            }
            tracing::debug!(error = %err, "log bridge not installed, keeping existing logger");
        }

        tracing::debug!(filter = %self.directives(), format = %self.format, "logging installed");
        Ok(true)
    }
}

impl fmt::Display for LogFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text => f.write_str("text"),
            Self::Json => f.write_str("json"),
        }
    }
}

/// Parse a level name; accepts the usual aliases `warning`, `critical` and `fatal`.
fn parse_level(value: &str) -> Result<LevelFilter> {
    match value.to_lowercase().as_str() {
        "trace" => Ok(LevelFilter::TRACE),
        "debug" => Ok(LevelFilter::DEBUG),
        "info" => Ok(LevelFilter::INFO),
        "warn" | "warning" => Ok(LevelFilter::WARN),
        "error" | "critical" | "fatal" => Ok(LevelFilter::ERROR),
        "off" => Ok(LevelFilter::OFF),
        _ => Err(Error::logging(format!(
            "invalid log level '{value}', must be one of: trace, debug, info, warn, error, off"
        ))),
    }
}

fn parse_format(value: &str) -> Result<LogFormat> {
    match value.to_lowercase().as_str() {
        "text" => Ok(LogFormat::Text),
        "json" => Ok(LogFormat::Json),
        _ => Err(Error::logging(format!(
            "invalid log format '{value}', must be text or json"
        ))),
    }
}

fn parse_bool(key: &str, value: &str) -> Result<bool> {
    match value.to_lowercase().as_str() {
        "true" | "1" | "yes" => Ok(true),
        "false" | "0" | "no" => Ok(false),
        _ => Err(Error::logging(format!(
            "invalid boolean '{value}' for '{key}'"
        ))),
    }
}
