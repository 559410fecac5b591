//! Environment lookups.
//!
//! Every environment-driven branch in the runtime reads through [`EnvSource`]
//! so callers can substitute overrides without touching the process
//! environment.

use std::collections::HashMap;
use std::ffi::OsString;

/// Backend override (`x11` or `wayland`, case-insensitive).
pub const BACKEND_VAR: &str = "NABU_BACKEND";

/// Gamemode override (`off` / `false` disables it).
pub const GAMEMODE_VAR: &str = "NABU_GAMEMODE";

/// Failure to read a variable that is present.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EnvError {
    #[error("environment variable {name} is not valid unicode: {value:?}")]
    NotUnicode { name: String, value: OsString },
}

/// Source of environment variables.
pub trait EnvSource {
    /// Returns `Ok(None)` when the variable is unset.
    fn var(&self, name: &str) -> Result<Option<String>, EnvError>;
}

/// Reads the real process environment.
#[derive(Debug, Default, Clone, Copy)]
pub struct ProcessEnv;

impl EnvSource for ProcessEnv {
    fn var(&self, name: &str) -> Result<Option<String>, EnvError> {
        match std::env::var(name) {
            Ok(v) => Ok(Some(v)),
            Err(std::env::VarError::NotPresent) => Ok(None),
            Err(std::env::VarError::NotUnicode(value)) => Err(EnvError::NotUnicode {
                name: name.to_string(),
                value,
            }),
        }
    }
}

/// Fixed set of variables, independent of the process environment.
#[derive(Debug, Default, Clone)]
pub struct MapEnv {
    vars: HashMap<String, String>,
}

impl MapEnv {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.vars.insert(name.into(), value.into());
        self
    }
}

impl EnvSource for MapEnv {
    fn var(&self, name: &str) -> Result<Option<String>, EnvError> {
        Ok(self.vars.get(name).cloned())
    }
}
