//! Configuration and settings management for Vexel
//!
//! Provides configuration file handling and validation.
//! Supports JSON and TOML file formats; the default location is
//! `<platform config dir>/vexel/config.toml`.
//!
//! Configuration is organized into logical sections:
//! - Viewport settings (zoom limits, fit padding)
//! - Input settings (zoom modifier, wheel and pinch sensitivity)
//! - Render settings (resize debounce, colours, culling)

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use vexel_core::constants::{
    BACKGROUND_COLOR, PINCH_ZOOM_DIVISOR, RESIZE_DEBOUNCE_MS, THEME_COLOR, VIEW_PADDING,
    WHEEL_ZOOM_DIVISOR,
};

use crate::error::{ConfigError, ConfigResult, SettingsError, SettingsResult};

/// File name used inside the config directory.
pub const CONFIG_FILE_NAME: &str = "config.toml";

/// Modifier key that turns the wheel into zoom and enables shortcuts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MainModifier {
    /// Command on macOS, Control elsewhere
    #[default]
    Auto,
    /// Control key
    Control,
    /// Meta (Command/Super) key
    Meta,
}

impl MainModifier {
    /// Resolves `Auto` for the platform this was built for.
    pub fn resolve(self) -> Self {
        match self {
            Self::Auto if cfg!(target_os = "macos") => Self::Meta,
            Self::Auto => Self::Control,
            other => other,
        }
    }
}

impl std::fmt::Display for MainModifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Auto => write!(f, "auto"),
            Self::Control => write!(f, "control"),
            Self::Meta => write!(f, "meta"),
        }
    }
}

/// Zoom limits and fitting
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewportSettings {
    /// Smallest allowed scale; unbounded when absent
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_scale: Option<f64>,
    /// Largest allowed scale; unbounded when absent
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_scale: Option<f64>,
    /// Fraction of the viewport kept free on each edge when fitting content
    pub fit_padding: f64,
}

impl Default for ViewportSettings {
    fn default() -> Self {
        Self {
            min_scale: None,
            max_scale: None,
            fit_padding: VIEW_PADDING,
        }
    }
}

/// Pointer and keyboard bindings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InputSettings {
    /// Modifier for wheel zoom and keyboard shortcuts
    pub main_modifier: MainModifier,
    /// Wheel delta units per zoom step with the main modifier held
    pub wheel_zoom_divisor: f64,
    /// Wheel delta units per zoom step for touchpad pinch gestures
    pub pinch_zoom_divisor: f64,
}

impl Default for InputSettings {
    fn default() -> Self {
        Self {
            main_modifier: MainModifier::Auto,
            wheel_zoom_divisor: WHEEL_ZOOM_DIVISOR,
            pinch_zoom_divisor: PINCH_ZOOM_DIVISOR,
        }
    }
}

/// Render loop and overlay options
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderSettings {
    /// Quiescence window before a resize reallocates the surface
    pub resize_debounce_ms: u64,
    /// Canvas clear colour (RGBA, 0..1)
    pub background: [f32; 4],
    /// Hover, selection and marquee colour (RGBA, 0..1)
    pub theme_color: [f32; 4],
    /// Skip nodes outside the visible area
    pub culling: bool,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            resize_debounce_ms: RESIZE_DEBOUNCE_MS,
            background: BACKGROUND_COLOR,
            theme_color: THEME_COLOR,
            culling: true,
        }
    }
}

/// Complete editor configuration
///
/// Aggregates all settings sections and provides file I/O operations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    /// Viewport settings
    pub viewport: ViewportSettings,
    /// Input bindings
    pub input: InputSettings,
    /// Render options
    pub render: RenderSettings,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Format {
    Json,
    Toml,
}

fn format_of(path: &Path) -> ConfigResult<Format> {
    match path.extension().and_then(|ext| ext.to_str()) {
        Some("json") => Ok(Format::Json),
        Some("toml") => Ok(Format::Toml),
        other => Err(ConfigError::UnsupportedFormat(
            other.unwrap_or("<none>").to_string(),
        )),
    }
}

impl Config {
    /// Create new config with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Default config file location
    pub fn default_path() -> SettingsResult<PathBuf> {
        let base = dirs::config_dir().ok_or_else(|| {
            SettingsError::ConfigDirectory("no platform config directory".to_string())
        })?;
        Ok(base.join("vexel").join(CONFIG_FILE_NAME))
    }

    /// Load config from file (JSON or TOML)
    pub fn load_from_file(path: &Path) -> SettingsResult<Self> {
        let format = format_of(path)?;
        let content = std::fs::read_to_string(path)?;

        let config: Self = match format {
            Format::Json => serde_json::from_str(&content)?,
            Format::Toml => toml::from_str(&content)?,
        };

        config.validate()?;
        tracing::debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Save config to file (JSON or TOML), creating parent directories
    pub fn save_to_file(&self, path: &Path) -> SettingsResult<()> {
        self.validate()?;

        let content = match format_of(path)? {
            Format::Json => serde_json::to_string_pretty(self)?,
            Format::Toml => toml::to_string_pretty(self)?,
        };

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        std::fs::write(path, content)
            .map_err(|e| SettingsError::SaveError(format!("{}: {}", path.display(), e)))?;

        tracing::debug!("Saved config to {}", path.display());
        Ok(())
    }

    /// Validate configuration
    pub fn validate(&self) -> ConfigResult<()> {
        let viewport = &self.viewport;
        if let Some(min) = viewport.min_scale {
            if !(min > 0.0 && min.is_finite()) {
                return Err(ConfigError::out_of_range("viewport.min_scale", min));
            }
        }
        if let Some(max) = viewport.max_scale {
            let floor = viewport.min_scale.unwrap_or(0.0);
            if !(max > 0.0 && max >= floor) {
                return Err(ConfigError::out_of_range("viewport.max_scale", max));
            }
        }
        if !(0.0..0.5).contains(&viewport.fit_padding) {
            return Err(ConfigError::out_of_range(
                "viewport.fit_padding",
                viewport.fit_padding,
            ));
        }

        if !(self.input.wheel_zoom_divisor > 0.0) {
            return Err(ConfigError::out_of_range(
                "input.wheel_zoom_divisor",
                self.input.wheel_zoom_divisor,
            ));
        }
        if !(self.input.pinch_zoom_divisor > 0.0) {
            return Err(ConfigError::out_of_range(
                "input.pinch_zoom_divisor",
                self.input.pinch_zoom_divisor,
            ));
        }

        for (key, color) in [
            ("render.background", self.render.background),
            ("render.theme_color", self.render.theme_color),
        ] {
            if color.iter().any(|c| !(0.0..=1.0).contains(c)) {
                return Err(ConfigError::out_of_range(key, format!("{:?}", color)));
            }
        }

        Ok(())
    }

    /// Scale limits with unbounded defaults filled in
    pub fn scale_limits(&self) -> (f64, f64) {
        (
            self.viewport.min_scale.unwrap_or(f64::MIN_POSITIVE),
            self.viewport.max_scale.unwrap_or(f64::INFINITY),
        )
    }
}
