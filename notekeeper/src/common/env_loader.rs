//! Environment variable loading utilities
//!
//! All notekeeper variables share a prefix; [`EnvLoader`] builds the full key
//! and falls back to the caller's current value when a variable is missing or
//! does not parse.

use std::env;
use std::str::FromStr;

/// Loader for environment variables sharing a common prefix
#[derive(Debug, Clone)]
pub struct EnvLoader {
    prefix: String,
}

impl EnvLoader {
    /// Create a new environment loader with the given prefix
    pub fn new(prefix: &str) -> Self {
        Self {
            prefix: prefix.to_string(),
        }
    }

    /// Full variable name for a suffix, e.g. `NOTEKEEPER_STORAGE_KEY`
    pub fn key(&self, suffix: &str) -> String {
        format!("{}_{}", self.prefix, suffix)
    }

    /// Raw string value, if set and non-empty
    pub fn load_string(&self, suffix: &str) -> Option<String> {
        env::var(self.key(suffix)).ok().filter(|v| !v.trim().is_empty())
    }

    /// Parsed value, or `current` if missing or unparseable
    pub fn load_parsed<T>(&self, suffix: &str, current: T) -> T
    where
        T: FromStr,
    {
        self.load_optional(suffix).unwrap_or(current)
    }

    /// Parsed value as an option
    pub fn load_optional<T>(&self, suffix: &str) -> Option<T>
    where
        T: FromStr,
    {
        self.load_string(suffix).and_then(|v| v.trim().parse().ok())
    }

    /// Parsed value that must also satisfy `validator`
    pub fn load_validated<T, F>(&self, suffix: &str, current: T, validator: F) -> T
    where
        T: FromStr,
        F: Fn(&T) -> bool,
    {
        match self.load_optional::<T>(suffix) {
            Some(value) if validator(&value) => value,
            Some(_) => {
                tracing::warn!(
                    "Ignoring out-of-range value for {}",
                    self.key(suffix)
                );
                current
            }
            None => current,
        }
    }
}
