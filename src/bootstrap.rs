//! Process-start initialization.
//!
//! [`Bootstrap::run`] performs the fixed sequence:
//! 1. parse command-line overrides
//! 2. resolve and install logging (command line and environment only)
//! 3. load `application[-<profile>].properties` from the base directory,
//!    then from the working directory, then the external file named by
//!    `application.properties`
//! 4. run the override hook for the active profile, if one is registered

use std::path::PathBuf;

use crate::config::keys::DEBUG;
use crate::config::{
    CommandLine, Config, Environment, Handle, HookError, ModuleRegistry, ProfileHooks,
};
use crate::observability::LoggingSettings;
use crate::{Error, Result};

/// Builder for the process configuration.
#[derive(Debug)]
pub struct Bootstrap {
    args: Vec<String>,
    env: Environment,
    base_dir: Option<PathBuf>,
    working_dir: PathBuf,
    modules: ModuleRegistry,
    hooks: ProfileHooks,
    install_logging: bool,
}

/// Result of a completed bootstrap.
#[derive(Debug)]
pub struct Bootstrapped {
    pub config: Config,
    /// Settings the subscriber was (or would have been) installed with.
    pub logging: LoggingSettings,
    /// Whether this bootstrap installed the global subscriber.
    pub logging_installed: bool,
}

impl Default for Bootstrap {
    fn default() -> Self {
        Self {
            args: Vec::new(),
            env: Environment::default(),
            base_dir: None,
            working_dir: PathBuf::from("."),
            modules: ModuleRegistry::new(),
            hooks: ProfileHooks::new(),
            install_logging: true,
        }
    }
}

impl Bootstrap {
    /// Empty builder: no arguments, empty environment, no base directory.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder seeded from the running process.
    ///
    /// Arguments skip the program name. The base directory is the directory
    /// of the current executable.
    ///
    /// # Errors
    ///
    /// Returns an error if the executable path cannot be determined.
    pub fn from_process() -> Result<Self> {
        let exe = std::env::current_exe().map_err(|err| Error::io("<current_exe>", err))?;

        Ok(Self {
            args: std::env::args().skip(1).collect(),
            env: Environment::from_process(),
            base_dir: exe.parent().map(PathBuf::from),
            ..Self::default()
        })
    }

    #[must_use]
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args = args.into_iter().map(Into::into).collect();
        self
    }

    #[must_use]
    pub fn env(mut self, env: Environment) -> Self {
        self.env = env;
        self
    }

    #[must_use]
    pub fn base_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.base_dir = Some(dir.into());
        self
    }

    #[must_use]
    pub fn working_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.working_dir = dir.into();
        self
    }

    /// Register a module factory for [`Config::add_module`].
    #[must_use]
    pub fn module<F>(mut self, name: impl Into<String>, factory: F) -> Self
    where
        F: Fn() -> std::result::Result<Handle, HookError> + Send + Sync + 'static,
    {
        self.modules.insert(name, factory);
        self
    }

    /// Register the override hook run when `profile` is active.
    #[must_use]
    pub fn profile_hook<F>(mut self, profile: impl Into<String>, hook: F) -> Self
    where
        F: Fn(&mut Config) -> std::result::Result<(), HookError> + Send + Sync + 'static,
    {
        self.hooks.insert(profile, hook);
        self
    }

    /// Whether to install the global `tracing` subscriber. Defaults to `true`.
    #[must_use]
    pub const fn install_logging(mut self, install: bool) -> Self {
        self.install_logging = install;
        self
    }

    /// Run the initialization sequence.
    ///
    /// # Errors
    ///
    /// Any failure is fatal: a missing configured file, a malformed properties
    /// line, an invalid logging file, or a failing profile hook. A profile
    /// without a registered hook is not an error.
    pub fn run(self) -> Result<Bootstrapped> {
        let Self {
            args,
            env,
            base_dir,
            working_dir,
            modules,
            hooks,
            install_logging,
        } = self;

        let mut config = Config::new(CommandLine::parse(&args), env).with_modules(modules);

        let logging = LoggingSettings::resolve(&config, &working_dir)?;
        let logging_installed = install_logging && logging.install()?;

        if let Some(path) = &logging.source {
            tracing::debug!(path = %path.display(), "logging configured from file");
        }

        match config.profile() {
            Some(profile) => tracing::debug!(profile = %profile, "runtime-profile set"),
            None => tracing::debug!("no runtime-profile set"),
        }

        if let Some(dir) = &base_dir {
            config.load_properties_dir(dir)?;
        }
        config.load_properties_dir(&working_dir)?;
        config.load_external_properties(&working_dir)?;

        hooks.apply(config.profile().as_deref(), &mut config)?;

        if config.has(DEBUG) {
            tracing::debug!("debug mode");
        }

        Ok(Bootstrapped {
            config,
            logging,
            logging_installed,
        })
    }
}
