//! Drawing surface abstraction.
//!
//! The renderers only talk to a [`RenderBackend`]. Paints are backend-owned
//! resources: acquire one with [`RenderBackend::create_paint`] and release it
//! after drawing, or let [`with_paint`] do both.

use lyon::path::Path;
use vexel_core::RenderError;

use crate::geometry::{BoundingBox, Matrix};
use crate::scene::{BlendMode, Color};

/// Opaque handle to a paint created by a backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PaintHandle(pub u64);

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PaintStyle {
    Fill,
    /// Stroke with the given width in the current coordinate space.
    Stroke(f64),
}

/// Everything needed to create a paint.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PaintSpec {
    pub color: Color,
    pub blend_mode: BlendMode,
    pub style: PaintStyle,
    pub anti_alias: bool,
}

impl PaintSpec {
    pub fn fill(color: Color) -> Self {
        Self {
            color,
            blend_mode: BlendMode::Normal,
            style: PaintStyle::Fill,
            anti_alias: true,
        }
    }

    pub fn stroke(color: Color, width: f64) -> Self {
        Self {
            style: PaintStyle::Stroke(width),
            ..Self::fill(color)
        }
    }

    pub fn with_blend_mode(mut self, blend_mode: BlendMode) -> Self {
        self.blend_mode = blend_mode;
        self
    }

    /// Same paint with its alpha multiplied by `factor`.
    pub fn with_alpha(mut self, factor: f32) -> Self {
        self.color[3] = (self.color[3] * factor).clamp(0.0, 1.0);
        self
    }
}

/// Canvas-like drawing target.
///
/// Coordinates passed to the draw calls are in the space set up by the
/// accumulated `concat` calls since the last `save`.
pub trait RenderBackend {
    /// (Re)allocates the backing surface. Drawing before success is a no-op.
    fn create_surface(&mut self, width: u32, height: u32) -> Result<(), RenderError>;

    fn save(&mut self);

    fn restore(&mut self);

    /// Pre-multiplies the current transform by `matrix`.
    fn concat(&mut self, matrix: &Matrix);

    fn clear(&mut self, color: Color);

    fn create_paint(&mut self, spec: &PaintSpec) -> Result<PaintHandle, RenderError>;

    fn release_paint(&mut self, paint: PaintHandle);

    fn draw_rect(&mut self, rect: &BoundingBox, paint: PaintHandle);

    fn draw_circle(&mut self, cx: f64, cy: f64, radius: f64, paint: PaintHandle);

    fn draw_path(&mut self, path: &Path, paint: PaintHandle);

    fn flush(&mut self);
}

/// Creates a paint, runs `draw` with it and releases it again.
pub fn with_paint<B, R, F>(backend: &mut B, spec: &PaintSpec, draw: F) -> Result<R, RenderError>
where
    B: RenderBackend + ?Sized,
    F: FnOnce(&mut B, PaintHandle) -> R,
{
    let paint = backend.create_paint(spec)?;
    let result = draw(backend, paint);
    backend.release_paint(paint);
    Ok(result)
}
