//! Named modules and profile override hooks.
//!
//! Hosts register factories and hooks up front. Resolution never touches a
//! dynamic loader: a missing name is a typed condition.

use std::collections::HashMap;
use std::fmt;

use crate::config::{Config, Handle};
use crate::{Error, Result};

/// Error type returned by host-supplied factories and hooks.
pub type HookError = Box<dyn std::error::Error + Send + Sync>;

/// Namespace prefixed to a profile name when naming its override hook.
pub const PROFILE_NAMESPACE: &str = "config";

type ModuleFactory = Box<dyn Fn() -> std::result::Result<Handle, HookError> + Send + Sync>;
type ProfileHook = Box<dyn Fn(&mut Config) -> std::result::Result<(), HookError> + Send + Sync>;

/// Factories for objects that can be registered as properties by name.
#[derive(Default)]
pub struct ModuleRegistry {
    factories: HashMap<String, ModuleFactory>,
}

impl ModuleRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a factory, replacing any previous one with the same name.
    pub fn insert<F>(&mut self, name: impl Into<String>, factory: F)
    where
        F: Fn() -> std::result::Result<Handle, HookError> + Send + Sync + 'static,
    {
        self.factories.insert(name.into(), Box::new(factory));
    }

    /// True if a factory is registered under `name`.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.factories.contains_key(name)
    }

    /// Produce the module registered under `name`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ModuleNotFound`] for an unknown name and
    /// [`Error::ModuleLoad`] if the factory fails.
    pub fn load(&self, name: &str) -> Result<Handle> {
        let factory = self
            .factories
            .get(name)
            .ok_or_else(|| Error::ModuleNotFound(name.to_string()))?;
        factory().map_err(|err| Error::module_load(name, err))
    }
}

impl fmt::Debug for ModuleRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<_> = self.factories.keys().collect();
        names.sort_unstable();
        f.debug_struct("ModuleRegistry")
            .field("modules", &names)
            .finish()
    }
}

/// Per-profile override callbacks, run once after all files are loaded.
#[derive(Default)]
pub struct ProfileHooks {
    hooks: HashMap<String, ProfileHook>,
}

impl ProfileHooks {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the hook for `profile`, replacing any previous one.
    pub fn insert<F>(&mut self, profile: impl Into<String>, hook: F)
    where
        F: Fn(&mut Config) -> std::result::Result<(), HookError> + Send + Sync + 'static,
    {
        self.hooks.insert(profile.into(), Box::new(hook));
    }

    /// True if a hook is registered for `profile`.
    #[must_use]
    pub fn contains(&self, profile: &str) -> bool {
        self.hooks.contains_key(profile)
    }

    /// Run the hook for `profile`, if one is registered.
    ///
    /// Returns whether a hook ran. No profile, or no hook for it, is `Ok(false)`.
    ///
    /// # Errors
    ///
    /// A failing hook is reported as [`Error::ModuleLoad`] named
    /// `config.<profile>`.
    pub fn apply(&self, profile: Option<&str>, config: &mut Config) -> Result<bool> {
        let Some(profile) = profile else {
            return Ok(false);
        };

        let name = format!("{PROFILE_NAMESPACE}.{profile}");
        let Some(hook) = self.hooks.get(profile) else {
            tracing::debug!(module = %name, "no profile override registered");
            return Ok(false);
        };

        tracing::debug!(module = %name, "applying profile override");
        hook(config).map_err(|err| Error::module_load(name, err))?;
        Ok(true)
    }
}

impl fmt::Debug for ProfileHooks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut profiles: Vec<_> = self.hooks.keys().collect();
        profiles.sort_unstable();
        f.debug_struct("ProfileHooks")
            .field("profiles", &profiles)
            .finish()
    }
}
