//! Environment access
//!
//! Handlers never touch `std::env` directly. They receive an [`EnvSource`] at
//! construction, which is the process environment in the binaries and a
//! fixed map in tests.

use std::collections::{HashMap, HashSet};
use std::fmt;

/// Failure to read a variable that exists but cannot be used
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EnvError {
    /// The value is present but not valid UTF-8
    NotUnicode { name: String },
}

impl fmt::Display for EnvError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotUnicode { name } => {
                write!(f, "environment variable {name} is not valid unicode")
            }
        }
    }
}

impl std::error::Error for EnvError {}

/// Read-only key/value source consulted on every request
pub trait EnvSource: Send + Sync {
    /// Raw value of `name`, `None` when unset
    fn var(&self, name: &str) -> Result<Option<String>, EnvError>;

    /// Value of `name` when it is set to a non-empty string
    fn non_empty(&self, name: &str) -> Result<Option<String>, EnvError> {
        Ok(self.var(name)?.filter(|v| !v.is_empty()))
    }

    /// True only for the literal string `"true"`
    fn flag(&self, name: &str) -> Result<bool, EnvError> {
        Ok(self.var(name)?.as_deref() == Some("true"))
    }
}

/// The live process environment
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnv;

impl EnvSource for ProcessEnv {
    fn var(&self, name: &str) -> Result<Option<String>, EnvError> {
        match std::env::var(name) {
            Ok(value) => Ok(Some(value)),
            Err(std::env::VarError::NotPresent) => Ok(None),
            Err(std::env::VarError::NotUnicode(_)) => Err(EnvError::NotUnicode {
                name: name.to_string(),
            }),
        }
    }
}

/// Fixed in-memory environment
#[derive(Debug, Clone, Default)]
pub struct MapEnv {
    vars: HashMap<String, String>,
    unreadable: HashSet<String>,
}

impl MapEnv {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with(mut self, name: &str, value: &str) -> Self {
        self.vars.insert(name.to_string(), value.to_string());
        self
    }

    /// Mark `name` as present but unreadable, as a non-UTF-8 value would be
    #[must_use]
    pub fn with_unreadable(mut self, name: &str) -> Self {
        self.unreadable.insert(name.to_string());
        self
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for MapEnv {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            vars: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
            unreadable: HashSet::new(),
        }
    }
}

impl EnvSource for MapEnv {
    fn var(&self, name: &str) -> Result<Option<String>, EnvError> {
        if self.unreadable.contains(name) {
            return Err(EnvError::NotUnicode {
                name: name.to_string(),
            });
        }
        Ok(self.vars.get(name).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flag_requires_literal_true() {
        let env = MapEnv::new()
            .with("A", "true")
            .with("B", "TRUE")
            .with("C", "1")
            .with("D", "");
        assert!(env.flag("A").unwrap());
        assert!(!env.flag("B").unwrap());
        assert!(!env.flag("C").unwrap());
        assert!(!env.flag("D").unwrap());
        assert!(!env.flag("MISSING").unwrap());
    }

    #[test]
    fn test_non_empty_filters_blank_values() {
        let env: MapEnv = [("KEY", ""), ("OTHER", "value")].into_iter().collect();
        assert_eq!(env.non_empty("KEY").unwrap(), None);
        assert_eq!(env.non_empty("OTHER").unwrap().as_deref(), Some("value"));
    }

    #[test]
    fn test_unreadable_variable_is_an_error() {
        let env = MapEnv::new().with_unreadable("DEBUG");
        let err = env.flag("DEBUG").unwrap_err();
        assert_eq!(err.to_string(), "environment variable DEBUG is not valid unicode");
    }

    #[test]
    fn test_process_env_missing_variable() {
        let value = ProcessEnv
            .var("PAGES_CONFIG_TEST_SURELY_UNSET_VARIABLE")
            .unwrap();
        assert_eq!(value, None);
    }
}
