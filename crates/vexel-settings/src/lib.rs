//! Vexel Settings Crate
//!
//! Editor configuration: zoom limits, input bindings and render options,
//! with validation and TOML/JSON persistence.

pub mod config;
pub mod error;
pub mod manager;

pub use config::{
    Config, InputSettings, MainModifier, RenderSettings, ViewportSettings, CONFIG_FILE_NAME,
};
pub use error::{ConfigError, ConfigResult, SettingsError, SettingsResult};
pub use manager::SettingsManager;
