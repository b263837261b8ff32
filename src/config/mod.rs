//! Layered configuration for bootconf.
//!
//! Lookup precedence, highest first:
//! - Command-line overrides (`--key` / `--key=value`)
//! - Environment variables (`KEY_NAME` for `key.name`)
//! - Properties loaded from files or registered programmatically
//! - Caller-supplied default

mod args;
mod env;
mod modules;
mod properties;
mod registry;
mod value;

pub use args::{parse_flag, CommandLine};
pub use env::{env_name, Environment};
pub use modules::{HookError, ModuleRegistry, ProfileHooks, PROFILE_NAMESPACE};
pub use properties::{
    parse_properties, profile_file_name, read_properties, Properties, APPLICATION_FILE_NAME,
};
pub use registry::{Config, Source};
pub use value::{Handle, Value};

/// Configuration keys with a meaning to the bootstrap itself.
pub mod keys {
    /// Active profile name.
    pub const RUNTIME_PROFILE: &str = "runtime.profile";
    /// Path to a declarative logging configuration file.
    pub const LOGGING_PROPERTIES: &str = "logging.properties";
    /// Path to an external properties file, loaded last.
    pub const APPLICATION_PROPERTIES: &str = "application.properties";
    /// Any value, including empty, forces debug verbosity.
    pub const DEBUG: &str = "debug";
    /// Profile that forces debug verbosity.
    pub const DEVELOPMENT_PROFILE: &str = "development";
}
