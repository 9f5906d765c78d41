//! In-memory backend that records every call.

use std::collections::HashSet;

use lyon::path::Path;
use vexel_core::RenderError;
use vexel_designer::render::{PaintHandle, PaintSpec, RenderBackend};
use vexel_designer::{BoundingBox, Matrix};

#[derive(Debug, Clone, PartialEq)]
pub enum Op {
    Surface(u32, u32),
    Save,
    Restore,
    Concat(Matrix),
    Clear([f32; 4]),
    Rect(BoundingBox, PaintHandle),
    Circle(f64, f64, f64, PaintHandle),
    Path(PaintHandle),
    Flush,
}

#[derive(Debug, Default)]
pub struct RecordingBackend {
    pub ops: Vec<Op>,
    pub specs: Vec<PaintSpec>,
    pub fail_surface: bool,
    live: HashSet<PaintHandle>,
    next: u64,
    depth: usize,
}

impl RecordingBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        Self {
            fail_surface: true,
            ..Self::default()
        }
    }

    pub fn live_paints(&self) -> usize {
        self.live.len()
    }

    /// Current save depth; zero after a balanced frame.
    pub fn depth(&self) -> usize {
        self.depth
    }

    pub fn surfaces(&self) -> Vec<(u32, u32)> {
        self.ops
            .iter()
            .filter_map(|op| match op {
                Op::Surface(w, h) => Some((*w, *h)),
                _ => None,
            })
            .collect()
    }

    pub fn count(&self, matches: impl Fn(&Op) -> bool) -> usize {
        self.ops.iter().filter(|op| matches(op)).count()
    }

    pub fn reset(&mut self) {
        self.ops.clear();
        self.specs.clear();
    }
}

impl RenderBackend for RecordingBackend {
    fn create_surface(&mut self, width: u32, height: u32) -> Result<(), RenderError> {
        if self.fail_surface {
            return Err(RenderError::SurfaceUnavailable {
                reason: "recording backend told to fail".to_string(),
            });
        }
        self.ops.push(Op::Surface(width, height));
        Ok(())
    }

    fn save(&mut self) {
        self.depth += 1;
        self.ops.push(Op::Save);
    }

    fn restore(&mut self) {
        self.depth = self.depth.saturating_sub(1);
        self.ops.push(Op::Restore);
    }

    fn concat(&mut self, matrix: &Matrix) {
        self.ops.push(Op::Concat(*matrix));
    }

    fn clear(&mut self, color: [f32; 4]) {
        self.ops.push(Op::Clear(color));
    }

    fn create_paint(&mut self, spec: &PaintSpec) -> Result<PaintHandle, RenderError> {
        self.next += 1;
        let handle = PaintHandle(self.next);
        self.live.insert(handle);
        self.specs.push(*spec);
        Ok(handle)
    }

    fn release_paint(&mut self, paint: PaintHandle) {
        self.live.remove(&paint);
    }

    fn draw_rect(&mut self, rect: &BoundingBox, paint: PaintHandle) {
        self.ops.push(Op::Rect(*rect, paint));
    }

    fn draw_circle(&mut self, cx: f64, cy: f64, radius: f64, paint: PaintHandle) {
        self.ops.push(Op::Circle(cx, cy, radius, paint));
    }

    fn draw_path(&mut self, _path: &Path, paint: PaintHandle) {
        self.ops.push(Op::Path(paint));
    }

    fn flush(&mut self) {
        self.ops.push(Op::Flush);
    }
}
