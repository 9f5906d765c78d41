//! Hover outline, selection boxes and marquee.
//!
//! Overlays are drawn in world space on top of the scene. Stroke widths are
//! divided by the view scale so they stay a constant number of pixels wide.

use vexel_core::constants::{GHOST_FILL_ALPHA, HOVER_STROKE_WIDTH, SELECTION_STROKE_WIDTH};
use vexel_core::RenderError;

use super::backend::{with_paint, PaintSpec, RenderBackend};
use crate::geometry::BoundingBox;
use crate::scene::{Color, SceneTree};
use crate::selection::SelectionState;

pub fn render_overlays<B>(
    backend: &mut B,
    tree: &SceneTree,
    selection: &SelectionState,
    scale: f64,
    theme: Color,
) -> Result<(), RenderError>
where
    B: RenderBackend + ?Sized,
{
    let scale = if scale > 0.0 { scale } else { 1.0 };
    render_hover(backend, tree, selection, scale, theme)?;
    render_selection_boxes(backend, selection, scale, theme)?;
    render_ghost_box(backend, selection, scale, theme)
}

fn render_hover<B>(
    backend: &mut B,
    tree: &SceneTree,
    selection: &SelectionState,
    scale: f64,
    theme: Color,
) -> Result<(), RenderError>
where
    B: RenderBackend + ?Sized,
{
    let Some(id) = selection.hover_id.as_deref() else {
        return Ok(());
    };
    let (Some(matrix), Some(path)) = (tree.absolute_matrix(id), tree.hover_path(id)) else {
        return Ok(());
    };
    backend.save();
    backend.concat(&matrix);
    let spec = PaintSpec::stroke(theme, HOVER_STROKE_WIDTH / scale);
    let result = with_paint(backend, &spec, |backend, paint| backend.draw_path(&path, paint));
    backend.restore();
    result
}

fn render_selection_boxes<B>(
    backend: &mut B,
    selection: &SelectionState,
    scale: f64,
    theme: Color,
) -> Result<(), RenderError>
where
    B: RenderBackend + ?Sized,
{
    if selection.selection_boxes.is_empty() {
        return Ok(());
    }
    let spec = PaintSpec::stroke(theme, SELECTION_STROKE_WIDTH / scale);
    with_paint(backend, &spec, |backend, paint| {
        for outline in &selection.selection_boxes {
            backend.save();
            backend.concat(&outline.matrix);
            backend.draw_rect(
                &BoundingBox::new(0.0, 0.0, outline.width, outline.height),
                paint,
            );
            backend.restore();
        }
    })
}

fn render_ghost_box<B>(
    backend: &mut B,
    selection: &SelectionState,
    scale: f64,
    theme: Color,
) -> Result<(), RenderError>
where
    B: RenderBackend + ?Sized,
{
    if !selection.ghost_active() {
        return Ok(());
    }
    let marquee = selection.ghost_box;
    let fill = PaintSpec::fill(theme).with_alpha(GHOST_FILL_ALPHA);
    with_paint(backend, &fill, |backend, paint| backend.draw_rect(&marquee, paint))?;
    let stroke = PaintSpec::stroke(theme, SELECTION_STROKE_WIDTH / scale);
    with_paint(backend, &stroke, |backend, paint| backend.draw_rect(&marquee, paint))
}
