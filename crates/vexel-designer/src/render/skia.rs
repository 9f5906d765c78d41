//! CPU raster backend on top of tiny-skia.

use std::collections::HashMap;
use std::path::Path as FsPath;

use lyon::path::{Event, Path};
use tiny_skia::{FillRule, Paint, PathBuilder, Pixmap, Rect, Stroke, Transform};
use vexel_core::RenderError;

use super::backend::{PaintHandle, PaintSpec, PaintStyle, RenderBackend};
use crate::geometry::{BoundingBox, Matrix};
use crate::scene::{BlendMode, Color};

struct SkiaPaint {
    paint: Paint<'static>,
    stroke: Option<Stroke>,
}

/// Renders into an in-memory [`Pixmap`].
pub struct SkiaBackend {
    pixmap: Option<Pixmap>,
    transform: Transform,
    stack: Vec<Transform>,
    paints: HashMap<PaintHandle, SkiaPaint>,
    next_paint: u64,
}

impl Default for SkiaBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for SkiaBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SkiaBackend")
            .field("size", &self.size())
            .field("live_paints", &self.paints.len())
            .finish()
    }
}

impl SkiaBackend {
    pub fn new() -> Self {
        Self {
            pixmap: None,
            transform: Transform::identity(),
            stack: Vec::new(),
            paints: HashMap::new(),
            next_paint: 0,
        }
    }

    pub fn size(&self) -> Option<(u32, u32)> {
        self.pixmap.as_ref().map(|p| (p.width(), p.height()))
    }

    /// Paints created and not yet released.
    pub fn live_paints(&self) -> usize {
        self.paints.len()
    }

    pub fn pixmap(&self) -> Option<&Pixmap> {
        self.pixmap.as_ref()
    }

    /// Unpremultiplied RGBA of one pixel.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        let color = self.pixmap.as_ref()?.pixel(x, y)?.demultiply();
        Some([color.red(), color.green(), color.blue(), color.alpha()])
    }

    pub fn encode_png(&self) -> Result<Vec<u8>, RenderError> {
        let pixmap = self.pixmap.as_ref().ok_or_else(|| RenderError::SurfaceUnavailable {
            reason: "no surface allocated".to_string(),
        })?;
        pixmap.encode_png().map_err(|e| RenderError::Encode {
            reason: e.to_string(),
        })
    }

    pub fn save_png(&self, path: &FsPath) -> Result<(), RenderError> {
        let bytes = self.encode_png()?;
        std::fs::write(path, bytes).map_err(|e| RenderError::Encode {
            reason: format!("{}: {}", path.display(), e),
        })
    }

    fn draw_with(&mut self, path: &tiny_skia::Path, handle: PaintHandle) {
        let Some(pixmap) = self.pixmap.as_mut() else {
            return;
        };
        let Some(entry) = self.paints.get(&handle) else {
            tracing::warn!("Draw with unknown paint {:?}", handle);
            return;
        };
        match &entry.stroke {
            Some(stroke) => pixmap.stroke_path(path, &entry.paint, stroke, self.transform, None),
            None => pixmap.fill_path(path, &entry.paint, FillRule::Winding, self.transform, None),
        }
    }
}

fn to_skia_color(color: Color) -> tiny_skia::Color {
    let [r, g, b, a] = color.map(|c| c.clamp(0.0, 1.0));
    tiny_skia::Color::from_rgba(r, g, b, a).unwrap_or(tiny_skia::Color::BLACK)
}

fn to_skia_blend(mode: BlendMode) -> tiny_skia::BlendMode {
    match mode {
        BlendMode::Normal => tiny_skia::BlendMode::SourceOver,
        BlendMode::Multiply => tiny_skia::BlendMode::Multiply,
        BlendMode::Screen => tiny_skia::BlendMode::Screen,
    }
}

fn to_skia_path(path: &Path) -> Option<tiny_skia::Path> {
    let mut pb = PathBuilder::new();
    for event in path.iter() {
        match event {
            Event::Begin { at } => pb.move_to(at.x, at.y),
            Event::Line { to, .. } => pb.line_to(to.x, to.y),
            Event::Quadratic { ctrl, to, .. } => pb.quad_to(ctrl.x, ctrl.y, to.x, to.y),
            Event::Cubic {
                ctrl1, ctrl2, to, ..
            } => pb.cubic_to(ctrl1.x, ctrl1.y, ctrl2.x, ctrl2.y, to.x, to.y),
            Event::End { close, .. } => {
                if close {
                    pb.close();
                }
            }
        }
    }
    pb.finish()
}

impl RenderBackend for SkiaBackend {
    fn create_surface(&mut self, width: u32, height: u32) -> Result<(), RenderError> {
        let pixmap = Pixmap::new(width, height).ok_or(RenderError::InvalidSize { width, height })?;
        self.pixmap = Some(pixmap);
        self.transform = Transform::identity();
        self.stack.clear();
        tracing::debug!("Allocated {}x{} surface", width, height);
        Ok(())
    }

    fn save(&mut self) {
        self.stack.push(self.transform);
    }

    fn restore(&mut self) {
        if let Some(transform) = self.stack.pop() {
            self.transform = transform;
        }
    }

    fn concat(&mut self, m: &Matrix) {
        let [a, b, c, d, e, f] = m.map(|v| v as f32);
        self.transform = self.transform.pre_concat(Transform::from_row(a, b, c, d, e, f));
    }

    fn clear(&mut self, color: Color) {
        if let Some(pixmap) = self.pixmap.as_mut() {
            pixmap.fill(to_skia_color(color));
        }
    }

    fn create_paint(&mut self, spec: &PaintSpec) -> Result<PaintHandle, RenderError> {
        let mut paint = Paint::default();
        paint.set_color(to_skia_color(spec.color));
        paint.blend_mode = to_skia_blend(spec.blend_mode);
        paint.anti_alias = spec.anti_alias;

        let stroke = match spec.style {
            PaintStyle::Fill => None,
            PaintStyle::Stroke(width) if width.is_finite() && width >= 0.0 => Some(Stroke {
                width: width as f32,
                ..Default::default()
            }),
            PaintStyle::Stroke(width) => {
                return Err(RenderError::PaintUnavailable {
                    reason: format!("invalid stroke width {}", width),
                })
            }
        };

        let handle = PaintHandle(self.next_paint);
        self.next_paint += 1;
        self.paints.insert(handle, SkiaPaint { paint, stroke });
        Ok(handle)
    }

    fn release_paint(&mut self, paint: PaintHandle) {
        self.paints.remove(&paint);
    }

    fn draw_rect(&mut self, rect: &BoundingBox, paint: PaintHandle) {
        let Some(r) = Rect::from_xywh(
            rect.x as f32,
            rect.y as f32,
            rect.width as f32,
            rect.height as f32,
        ) else {
            return;
        };
        let path = PathBuilder::from_rect(r);
        self.draw_with(&path, paint);
    }

    fn draw_circle(&mut self, cx: f64, cy: f64, radius: f64, paint: PaintHandle) {
        if let Some(path) = PathBuilder::from_circle(cx as f32, cy as f32, radius as f32) {
            self.draw_with(&path, paint);
        }
    }

    fn draw_path(&mut self, path: &Path, paint: PaintHandle) {
        if let Some(path) = to_skia_path(path) {
            self.draw_with(&path, paint);
        }
    }

    fn flush(&mut self) {}
}
