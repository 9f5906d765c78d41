//! # Vexel
//!
//! A 2D vector scene editor core:
//! - Hierarchical scene graph with cached absolute transforms and boxes
//! - Point and marquee hit testing under arbitrary affine transforms
//! - Pan/zoom viewport and an input state machine (select, move, pan)
//! - Dirty-driven frame scheduling over a pluggable render backend
//!
//! ## Architecture
//!
//! Vexel is organized as a workspace with multiple crates:
//!
//! 1. **vexel-core** - Errors, constants, event bus
//! 2. **vexel-settings** - Configuration files and validation
//! 3. **vexel-designer** - Geometry, scene, interaction, rendering
//! 4. **vexel** - Logging setup and the headless demo binary

pub use vexel_core as core;
pub use vexel_designer as designer;
pub use vexel_settings as settings;

pub use vexel_core::{AppEvent, Error, EventBus, Result};
pub use vexel_designer::{
    BoundingBox, Editor, ElementRecord, InputEvent, Matrix, Point, RenderScheduler, SceneTree,
    SkiaBackend, ViewportState,
};
pub use vexel_settings::{Config, SettingsManager};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Build date (set at compile time)
pub const BUILD_DATE: &str = env!("BUILD_DATE");

/// Initialize logging with the default configuration
///
/// Sets up structured logging with:
/// - Console output with pretty formatting
/// - RUST_LOG environment variable support, defaulting to `info`
pub fn init_logging() -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::prelude::*;
    use tracing_subscriber::EnvFilter;

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_level(true)
        .with_line_number(true)
        .pretty();

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .try_init()?;

    Ok(())
}
