//! Idle: hover tracking, click dispatch, wheel and keyboard navigation.

use super::context::EditorContext;
use super::input::{KeyEvent, MouseButton, PointerEvent, WheelEvent};
use super::state::{InteractionState, StateKind, Transition};
use crate::selection::MoveInfo;

#[derive(Debug, Default)]
pub struct IdleState;

impl InteractionState for IdleState {
    fn kind(&self) -> StateKind {
        StateKind::Idle
    }

    fn on_mouse_down(&mut self, ctx: &mut EditorContext<'_>, event: &PointerEvent) -> Transition {
        match event.button {
            Some(MouseButton::Primary) => begin_primary_drag(ctx, event),
            Some(MouseButton::Middle) => Transition::To(StateKind::Panning),
            _ => Transition::Stay,
        }
    }

    fn on_mouse_move(&mut self, ctx: &mut EditorContext<'_>, event: &PointerEvent) -> Transition {
        let world = ctx.world_point(event);
        let hover = ctx
            .tree
            .node_at(world)
            .filter(|id| !(ctx.selection.is_multi() && ctx.selection.contains(id)));
        ctx.selection.set_hover(hover);
        Transition::Stay
    }

    fn on_mouse_leave(&mut self, ctx: &mut EditorContext<'_>, _event: &PointerEvent) -> Transition {
        ctx.selection.set_hover(None);
        Transition::Stay
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

/// Decides what a primary-button press grabs.
///
/// A multi-selection is grabbed through its outline first; otherwise the
/// front-most node under the cursor. Pressing on empty canvas starts a marquee.
fn begin_primary_drag(ctx: &mut EditorContext<'_>, event: &PointerEvent) -> Transition {
    let world = ctx.world_point(event);

    if ctx.selection.is_multi() {
        if let Some(index) = ctx.selection.selection_box_at(world) {
            ctx.selection.set_move_info(Some(MoveInfo::SelectionBox(index)));
            return Transition::To(StateKind::Moving);
        }
    }

    match ctx.tree.node_at(world) {
        Some(id) => {
            if !ctx.selection.contains(&id) {
                ctx.selection.select_only(&id);
            }
            ctx.selection.set_hover(None);
            ctx.refresh_selection_boxes();
            ctx.selection.set_move_info(Some(MoveInfo::Node(id)));
            Transition::To(StateKind::Moving)
        }
        None => {
            ctx.selection.clear();
            ctx.refresh_selection_boxes();
            Transition::To(StateKind::Selecting)
        }
    }
}

/// Wheel navigation shared by every state.
///
/// With the main modifier the wheel zooms about the cursor. A bare ctrl or
/// meta wheel is how touchpads report pinch, which zooms in finer steps.
/// Anything else pans.
pub(crate) fn handle_wheel(ctx: &mut EditorContext<'_>, event: &WheelEvent) {
    let modifiers = &event.modifiers;
    if modifiers.main_held(ctx.input) {
        let delta = -event.delta_y / ctx.input.wheel_zoom_divisor;
        ctx.viewport.zoom_delta(delta, event.x, event.y);
    } else if modifiers.ctrl || modifiers.meta {
        let delta = -event.delta_y / ctx.input.pinch_zoom_divisor;
        ctx.viewport.zoom_delta(delta, event.x, event.y);
    } else {
        ctx.viewport.pan(-event.delta_x, -event.delta_y);
    }
}

/// Keyboard shortcuts shared by every state.
pub(crate) fn handle_key(ctx: &mut EditorContext<'_>, event: &KeyEvent) {
    if !event.modifiers.main_held(ctx.input) {
        return;
    }
    let state = ctx.viewport.state();
    let (center_x, center_y) = (state.width / 2.0, state.height / 2.0);
    match event.key.as_str() {
        "0" => ctx.viewport.reset(),
        "=" | "+" => ctx.viewport.zoom_in_step(center_x, center_y),
        "-" => ctx.viewport.zoom_out_step(center_x, center_y),
        other => tracing::trace!("Unbound shortcut {}", other),
    }
}
