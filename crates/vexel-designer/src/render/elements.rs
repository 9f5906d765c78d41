//! Draws scene nodes.
//!
//! Nodes are painted parent before child, siblings in order. Each drawable
//! node is drawn in its own local space by concatenating its absolute
//! matrix onto the view transform.

use vexel_core::RenderError;

use super::backend::{with_paint, PaintHandle, PaintSpec, RenderBackend};
use crate::geometry::{hit_matrix_node_test, BoundingBox};
use crate::scene::{NodeKey, NodeType, SceneNode, SceneTree};

/// Statistics of one scene pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SceneStats {
    pub drawn: usize,
    pub culled: usize,
}

/// Draws every visible node of `tree`.
///
/// With `visible_area` set, nodes whose render box lies outside it are
/// skipped. Their children are still considered.
pub fn render_scene<B>(
    backend: &mut B,
    tree: &SceneTree,
    visible_area: Option<&BoundingBox>,
) -> Result<SceneStats, RenderError>
where
    B: RenderBackend + ?Sized,
{
    let mut stats = SceneStats::default();
    let root = tree.root_key();
    if let Some(node) = tree.node(root) {
        for &child in node.children() {
            render_subtree(backend, tree, child, 1.0, visible_area, &mut stats)?;
        }
    }
    Ok(stats)
}

fn render_subtree<B>(
    backend: &mut B,
    tree: &SceneTree,
    key: NodeKey,
    inherited_opacity: f64,
    visible_area: Option<&BoundingBox>,
    stats: &mut SceneStats,
) -> Result<(), RenderError>
where
    B: RenderBackend + ?Sized,
{
    let Some(node) = tree.node(key) else {
        return Ok(());
    };
    if !node.visible() {
        return Ok(());
    }
    let opacity = inherited_opacity * node.opacity().clamp(0.0, 1.0);

    if is_drawable(node.node_type()) {
        let in_view = match (visible_area, tree.render_box_of(key)) {
            (Some(area), Some(render_box)) => {
                hit_matrix_node_test(&area.to_matrix_rect(), &render_box.to_matrix_rect())
            }
            _ => true,
        };
        if in_view {
            draw_node(backend, tree, key, node, opacity)?;
            stats.drawn += 1;
        } else {
            stats.culled += 1;
        }
    }

    for &child in node.children() {
        render_subtree(backend, tree, child, opacity, visible_area, stats)?;
    }
    Ok(())
}

fn is_drawable(node_type: NodeType) -> bool {
    match node_type {
        NodeType::Rectangle | NodeType::Circle => true,
        NodeType::Group | NodeType::Root | NodeType::Unknown => false,
    }
}

fn draw_node<B>(
    backend: &mut B,
    tree: &SceneTree,
    key: NodeKey,
    node: &SceneNode,
    opacity: f64,
) -> Result<(), RenderError>
where
    B: RenderBackend + ?Sized,
{
    let Some(matrix) = tree.absolute_matrix_of(key) else {
        return Ok(());
    };
    backend.save();
    backend.concat(&matrix);
    let result = fill_node(backend, node, opacity);
    backend.restore();
    result
}

fn fill_node<B>(backend: &mut B, node: &SceneNode, opacity: f64) -> Result<(), RenderError>
where
    B: RenderBackend + ?Sized,
{
    for fill in node.fill_paints().iter().filter(|fill| fill.visible) {
        let spec = PaintSpec::fill(fill.color)
            .with_blend_mode(fill.blend_mode)
            .with_alpha(opacity as f32);
        with_paint(backend, &spec, |backend, paint| draw_shape(backend, node, paint))?;
    }
    Ok(())
}

fn draw_shape<B>(backend: &mut B, node: &SceneNode, paint: PaintHandle)
where
    B: RenderBackend + ?Sized,
{
    let (width, height) = (node.width(), node.height());
    match node.node_type() {
        NodeType::Rectangle => backend.draw_rect(&BoundingBox::new(0.0, 0.0, width, height), paint),
        NodeType::Circle => {
            backend.draw_circle(width / 2.0, height / 2.0, width.min(height) / 2.0, paint)
        }
        NodeType::Group | NodeType::Root | NodeType::Unknown => {}
    }
}
