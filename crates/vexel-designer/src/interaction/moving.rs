//! Moving: drags the grabbed node or the whole multi-selection.
//!
//! Positions are recomputed from the snapshot taken on entry plus the total
//! pointer travel, so long drags do not accumulate rounding error.

use std::collections::HashSet;

use super::context::EditorContext;
use super::idle::{handle_key, handle_wheel};
use super::input::{InputEvent, KeyEvent, PointerEvent, WheelEvent};
use super::state::{InteractionState, StateKind, Transition};
use crate::geometry::{invert_affine, Matrix, Point};
use crate::scene::SceneTree;
use crate::selection::MoveInfo;

#[derive(Debug, Clone)]
struct DragTarget {
    id: String,
    start: Matrix,
    /// Maps a world-space delta into the parent's space.
    to_parent: Matrix,
}

#[derive(Debug, Default)]
pub struct MovingState {
    origin: Option<Point>,
    targets: Vec<DragTarget>,
}

impl MovingState {
    fn apply(&self, ctx: &mut EditorContext<'_>, current: Point) {
        let Some(origin) = self.origin else {
            return;
        };
        let (dx, dy) = (current.x - origin.x, current.y - origin.y);
        for target in &self.targets {
            let m = &target.to_parent;
            let local_dx = m[0] * dx + m[2] * dy;
            let local_dy = m[1] * dx + m[3] * dy;
            ctx.tree.set_position(
                &target.id,
                target.start[4] + local_dx,
                target.start[5] + local_dy,
            );
        }
    }

    fn finish(&mut self, ctx: &mut EditorContext<'_>, event: &PointerEvent) -> Transition {
        let current = ctx.world_point(event);
        self.apply(ctx, current);
        ctx.refresh_selection_boxes();
        Transition::To(StateKind::Idle)
    }
}

impl InteractionState for MovingState {
    fn kind(&self) -> StateKind {
        StateKind::Moving
    }

    fn enter(&mut self, ctx: &mut EditorContext<'_>, event: Option<&InputEvent>) -> Transition {
        let Some(info) = ctx.selection.move_info().cloned() else {
            tracing::error!("Entered moving state without a move target");
            return Transition::To(StateKind::Idle);
        };

        let ids = match info {
            MoveInfo::Node(id) => vec![id],
            MoveInfo::SelectionBox(_) => outermost(ctx.tree, ctx.selection.state().sorted_ids()),
        };
        self.targets = ids
            .into_iter()
            .filter_map(|id| snapshot(ctx.tree, id))
            .collect();
        if self.targets.is_empty() {
            tracing::error!("Move target no longer exists");
            return Transition::To(StateKind::Idle);
        }

        self.origin = event
            .and_then(InputEvent::position)
            .map(|(x, y)| ctx.viewport.screen_to_world(x, y));
        tracing::debug!("Moving {} nodes", self.targets.len());
        Transition::Stay
    }

    fn exit(&mut self, ctx: &mut EditorContext<'_>) {
        self.origin = None;
        self.targets.clear();
        ctx.selection.set_move_info(None);
    }

    fn on_mouse_move(&mut self, ctx: &mut EditorContext<'_>, event: &PointerEvent) -> Transition {
        let current = ctx.world_point(event);
        if self.origin.is_none() {
            self.origin = Some(current);
            return Transition::Stay;
        }
        self.apply(ctx, current);
        ctx.refresh_selection_boxes();
        Transition::Stay
    }

    fn on_mouse_up(&mut self, ctx: &mut EditorContext<'_>, event: &PointerEvent) -> Transition {
        self.finish(ctx, event)
    }

    fn on_mouse_leave(&mut self, ctx: &mut EditorContext<'_>, event: &PointerEvent) -> Transition {
        self.finish(ctx, event)
    }

    fn on_wheel(&mut self, ctx: &mut EditorContext<'_>, event: &WheelEvent) -> Transition {
        handle_wheel(ctx, event);
        Transition::Stay
    }

    fn on_key_down(&mut self, ctx: &mut EditorContext<'_>, event: &KeyEvent) -> Transition {
        handle_key(ctx, event);
        Transition::Stay
    }
}

fn snapshot(tree: &SceneTree, id: String) -> Option<DragTarget> {
    let node = tree.find_by_id(&id)?;
    let parent_matrix = node
        .parent()
        .and_then(|parent| tree.absolute_matrix_of(parent))?;
    let mut to_parent = invert_affine(&parent_matrix)?;
    to_parent[4] = 0.0;
    to_parent[5] = 0.0;
    Some(DragTarget {
        start: node.matrix(),
        to_parent,
        id,
    })
}

/// Drops ids whose ancestor is also in the list; moving the ancestor moves them.
fn outermost(tree: &SceneTree, ids: Vec<String>) -> Vec<String> {
    let selected: HashSet<&str> = ids.iter().map(String::as_str).collect();
    let has_selected_ancestor = |id: &str| {
        let mut cursor = tree.find_by_id(id).and_then(|node| node.parent());
        while let Some(key) = cursor {
            let Some(node) = tree.node(key) else {
                break;
            };
            if selected.contains(node.id()) {
                return true;
            }
            cursor = node.parent();
        }
        false
    };
    ids.iter()
        .filter(|id| !has_selected_ancestor(id))
        .cloned()
        .collect()
}
