//! Layered option defaults
//!
//! A value given on the command line always wins. Below it, in order:
//! an environment variable, the settings file's `defaults`, and the
//! schema's own default.

use crate::config::Settings;
use crate::error::{ConfigError, ConfigResult};
use std::collections::HashMap;
use std::env;
use std::fmt;

/// Prefix of the environment variables that supply option defaults
pub const ENV_PREFIX: &str = "SCHEDRUN_";

/// Environment variable consulted for a flag, e.g. `SCHEDRUN_N_CORES`
pub fn env_var_name(flag: &str) -> String {
    format!("{}{}", ENV_PREFIX, flag.to_uppercase().replace('-', "_"))
}

type EnvLookup = Box<dyn Fn(&str) -> Option<String>>;

/// Defaults that override the schema's, keyed by visible flag name
#[derive(Default)]
pub struct Fallbacks {
    settings: HashMap<String, String>,
    env: Option<EnvLookup>,
}

impl Fallbacks {
    /// No overrides
    pub fn new() -> Self {
        Fallbacks::default()
    }

    /// Overrides from a settings file
    pub fn from_settings(settings: &Settings) -> Self {
        Fallbacks {
            settings: settings.defaults.clone(),
            env: None,
        }
    }

    /// Replace the settings-file layer
    pub fn with_settings(mut self, settings: &Settings) -> Self {
        self.settings = settings.defaults.clone();
        self
    }

    /// Consult `lookup` (given the variable name) before the settings defaults
    pub fn with_env_lookup<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String> + 'static,
    {
        self.env = Some(Box::new(lookup));
        self
    }

    /// Consult the process environment before the settings defaults
    pub fn with_environment(self) -> Self {
        self.with_env_lookup(|name| env::var(name).ok())
    }

    /// Override value for a flag, if any
    pub fn get(&self, flag: &str) -> Option<String> {
        self.env
            .as_ref()
            .and_then(|lookup| lookup(&env_var_name(flag)))
            .or_else(|| self.settings.get(flag).cloned())
    }

    /// Fail if a settings default names an option that does not exist
    pub fn check_known<'a, I>(&self, flags: I) -> ConfigResult<()>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let known: Vec<&str> = flags.into_iter().collect();
        let mut unknown: Vec<&String> = self
            .settings
            .keys()
            .filter(|name| !known.contains(&name.as_str()))
            .collect();
        unknown.sort();

        match unknown.first() {
            Some(name) => Err(ConfigError::UnknownDefault((*name).clone())),
            None => Ok(()),
        }
    }
}

impl fmt::Debug for Fallbacks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Fallbacks")
            .field("settings", &self.settings)
            .field("env", &self.env.is_some())
            .finish()
    }
}
