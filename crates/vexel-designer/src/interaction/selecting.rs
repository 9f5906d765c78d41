//! Selecting: marquee drag.

use super::context::EditorContext;
use super::idle::{handle_key, handle_wheel};
use super::input::{InputEvent, KeyEvent, PointerEvent, WheelEvent};
use super::state::{InteractionState, StateKind, Transition};
use crate::geometry::{BoundingBox, Point};

#[derive(Debug, Default)]
pub struct SelectingState {
    origin: Option<Point>,
}

impl SelectingState {
    fn abandon(&mut self, ctx: &mut EditorContext<'_>) -> Transition {
        self.origin = None;
        ctx.selection.clear_ghost_box();
        Transition::To(StateKind::Idle)
    }
}

impl InteractionState for SelectingState {
    fn kind(&self) -> StateKind {
        StateKind::Selecting
    }

    fn enter(&mut self, ctx: &mut EditorContext<'_>, event: Option<&InputEvent>) -> Transition {
        self.origin = event
            .and_then(InputEvent::position)
            .map(|(x, y)| ctx.viewport.screen_to_world(x, y));
        ctx.selection.clear_ghost_box();
        Transition::Stay
    }

    fn exit(&mut self, _ctx: &mut EditorContext<'_>) {
        self.origin = None;
    }

    fn on_mouse_move(&mut self, ctx: &mut EditorContext<'_>, event: &PointerEvent) -> Transition {
        let current = ctx.world_point(event);
        let origin = *self.origin.get_or_insert(current);
        ctx.selection
            .set_ghost_box(BoundingBox::from_corners(origin, current));
        Transition::Stay
    }

    fn on_mouse_up(&mut self, ctx: &mut EditorContext<'_>, _event: &PointerEvent) -> Transition {
        let marquee = ctx.selection.state().ghost_box;
        let ids = if marquee.is_empty() {
            Vec::new()
        } else {
            ctx.tree.nodes_in_box(&marquee)
        };
        tracing::debug!("Marquee selected {} nodes", ids.len());
        ctx.selection.set_ids(ids);
        ctx.refresh_selection_boxes();
        self.abandon(ctx)
    }

    fn on_mouse_leave(&mut self, ctx: &mut EditorContext<'_>, _event: &PointerEvent) -> Transition {
        self.abandon(ctx)
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
