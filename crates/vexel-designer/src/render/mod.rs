//! Rendering: backend abstraction, renderers and the frame scheduler.

pub mod backend;
pub mod debounce;
pub mod elements;
pub mod overlay;
pub mod scheduler;
pub mod skia;

pub use backend::{with_paint, PaintHandle, PaintSpec, PaintStyle, RenderBackend};
pub use debounce::Debouncer;
pub use elements::{render_scene, SceneStats};
pub use overlay::render_overlays;
pub use scheduler::{render_frame, Frame, RenderScheduler};
pub use skia::SkiaBackend;
