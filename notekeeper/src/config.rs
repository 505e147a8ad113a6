//! Configuration management for notekeeper
//!
//! Settings come from three layers, later ones winning: built-in defaults, an
//! optional YAML file, and `NOTEKEEPER_*` environment variables.
//!
//! ```yaml
//! storage_dir: .notekeeper
//! storage_key: Notes
//! search:
//!   threshold: 0.1
//!   distance: 100
//!   no_match: show_all
//! ```

use crate::common::env_loader::EnvLoader;
use crate::error::{ErrorContext, NoteKeeperError, Result};
use crate::search::{NoMatchBehavior, SearchOptions};
use crate::storage::filesystem::DEFAULT_STORAGE_DIR;
use crate::storage::NOTES_KEY;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Prefix shared by all environment variables
pub const ENV_PREFIX: &str = "NOTEKEEPER";

/// Configuration settings for notekeeper
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NoteKeeperConfig {
    /// Directory for the filesystem store (default: `.notekeeper`)
    pub storage_dir: PathBuf,
    /// Key the note snapshot is stored under (default: `Notes`)
    pub storage_key: String,
    /// Search tuning
    pub search: SearchOptions,
}

impl Default for NoteKeeperConfig {
    fn default() -> Self {
        Self {
            storage_dir: PathBuf::from(DEFAULT_STORAGE_DIR),
            storage_key: NOTES_KEY.to_string(),
            search: SearchOptions::default(),
        }
    }
}

impl NoteKeeperConfig {
    /// Defaults with environment overrides applied
    pub fn from_env() -> Self {
        Self::default().with_env_overrides()
    }

    /// Parse and validate a YAML document
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a YAML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read configuration file {}", path.display()))?;
        tracing::debug!("Loaded configuration from {}", path.display());
        Self::from_yaml_str(&content)
    }

    /// Apply `NOTEKEEPER_*` environment variables on top of this config
    ///
    /// Missing, unparseable or out-of-range values keep the current setting.
    pub fn with_env_overrides(mut self) -> Self {
        let loader = EnvLoader::new(ENV_PREFIX);

        if let Some(dir) = loader.load_string("STORAGE_DIR") {
            self.storage_dir = PathBuf::from(dir);
        }
        if let Some(key) = loader.load_string("STORAGE_KEY") {
            self.storage_key = key.trim().to_string();
        }

        self.search.threshold =
            loader.load_validated("SEARCH_THRESHOLD", self.search.threshold, |t: &f64| {
                (0.0..=1.0).contains(t)
            });
        self.search.distance = loader.load_parsed("SEARCH_DISTANCE", self.search.distance);
        self.search.location = loader.load_parsed("SEARCH_LOCATION", self.search.location);
        self.search.no_match =
            loader.load_parsed::<NoMatchBehavior>("SEARCH_NO_MATCH", self.search.no_match);

        self
    }

    /// Validate the current configuration settings
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.search.threshold) {
            return Err(NoteKeeperError::Config(format!(
                "search.threshold must be between 0.0 and 1.0, got {}",
                self.search.threshold
            )));
        }

        if self.storage_key.trim().is_empty() {
            return Err(NoteKeeperError::Config(
                "storage_key must not be empty".to_string(),
            ));
        }

        if self.storage_dir.as_os_str().is_empty() {
            return Err(NoteKeeperError::Config(
                "storage_dir must not be empty".to_string(),
            ));
        }

        Ok(())
    }
}
