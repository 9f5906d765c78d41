//! Editor-wide constants.
//!
//! Values shared between the viewport, the interaction layer and the
//! renderer. Anything a user may want to tune lives in `vexel-settings`
//! instead and uses these as defaults.

/// Reserved id of the implicit scene root.
pub const ROOT_NODE_ID: &str = "__root__";

/// Shear magnitude below which a matrix is treated as axis aligned.
pub const AXIS_ALIGNED_EPSILON: f64 = 1e-6;

/// Padding reserved on each edge when fitting content (fraction of the viewport).
pub const VIEW_PADDING: f64 = 0.05;

/// Default lower zoom bound. Unbounded unless configured.
pub const DEFAULT_MIN_SCALE: f64 = f64::MIN_POSITIVE;

/// Default upper zoom bound. Unbounded unless configured.
pub const DEFAULT_MAX_SCALE: f64 = f64::INFINITY;

/// Wheel delta units per zoom step for a regular mouse wheel.
pub const WHEEL_ZOOM_DIVISOR: f64 = 100.0;

/// Wheel delta units per zoom step for touchpad pinch gestures.
pub const PINCH_ZOOM_DIVISOR: f64 = 5.0;

/// Smallest relative zoom change accepted by `zoom_delta` (keeps the factor positive).
pub const MIN_ZOOM_DELTA: f64 = -0.9;

/// Preset zoom levels used by the keyboard zoom in/out shortcuts.
pub const ZOOM_STEPS: &[f64] = &[
    0.02, 0.05, 0.1, 0.25, 0.5, 1.0, 2.0, 4.0, 8.0, 16.0, 32.0, 64.0, 128.0, 256.0,
];

/// Quiescence window for coalescing viewport resizes, in milliseconds.
pub const RESIZE_DEBOUNCE_MS: u64 = 100;

/// Accent colour used for hover, selection and marquee overlays (RGBA 0..1).
pub const THEME_COLOR: [f32; 4] = [0.05, 0.6, 1.0, 1.0];

/// Canvas clear colour (RGBA 0..1).
pub const BACKGROUND_COLOR: [f32; 4] = [1.0, 1.0, 1.0, 1.0];

/// Opacity of the marquee fill.
pub const GHOST_FILL_ALPHA: f32 = 0.15;

/// Hover outline width in screen pixels.
pub const HOVER_STROKE_WIDTH: f64 = 2.0;

/// Selection and marquee outline width in screen pixels.
pub const SELECTION_STROKE_WIDTH: f64 = 1.0;
