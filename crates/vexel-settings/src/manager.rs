//! Settings manager: owns the active config and where it is stored.

use std::path::{Path, PathBuf};

use crate::config::Config;
use crate::error::SettingsResult;

/// Loads, holds and saves the editor configuration
#[derive(Debug, Clone, Default)]
pub struct SettingsManager {
    config: Config,
    path: Option<PathBuf>,
}

impl SettingsManager {
    /// Create a manager with default config and no backing file
    pub fn new() -> Self {
        Self::default()
    }

    /// Load `path`, falling back to defaults when it is missing or invalid.
    ///
    /// The path is remembered either way so [`save`](Self::save) writes there.
    pub fn load_or_default(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let config = if path.exists() {
            match Config::load_from_file(&path) {
                Ok(config) => config,
                Err(e) => {
                    tracing::warn!("Ignoring config at {}: {}", path.display(), e);
                    Config::default()
                }
            }
        } else {
            tracing::debug!("No config at {}, using defaults", path.display());
            Config::default()
        };
        Self {
            config,
            path: Some(path),
        }
    }

    /// Load from the platform config directory, or defaults.
    pub fn load_default_location() -> Self {
        match Config::default_path() {
            Ok(path) => Self::load_or_default(path),
            Err(e) => {
                tracing::warn!("{}", e);
                Self::new()
            }
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn config_mut(&mut self) -> &mut Config {
        &mut self.config
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Write the config to its backing file. Does nothing without one.
    pub fn save(&self) -> SettingsResult<()> {
        match &self.path {
            Some(path) => self.config.save_to_file(path),
            None => Ok(()),
        }
    }
}
