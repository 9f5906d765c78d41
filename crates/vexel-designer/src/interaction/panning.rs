//! Panning: middle-button drag scrolls the view.

use super::context::EditorContext;
use super::idle::{handle_key, handle_wheel};
use super::input::{InputEvent, KeyEvent, PointerEvent, WheelEvent};
use super::state::{InteractionState, StateKind, Transition};

#[derive(Debug, Default)]
pub struct PanningState {
    last: Option<(f64, f64)>,
}

impl InteractionState for PanningState {
    fn kind(&self) -> StateKind {
        StateKind::Panning
    }

    fn enter(&mut self, _ctx: &mut EditorContext<'_>, event: Option<&InputEvent>) -> Transition {
        self.last = event.and_then(InputEvent::position);
        Transition::Stay
    }

    fn exit(&mut self, _ctx: &mut EditorContext<'_>) {
        self.last = None;
    }

    fn on_mouse_move(&mut self, ctx: &mut EditorContext<'_>, event: &PointerEvent) -> Transition {
        if let Some((last_x, last_y)) = self.last {
            ctx.viewport.pan(event.x - last_x, event.y - last_y);
        }
        self.last = Some((event.x, event.y));
        Transition::Stay
    }

    fn on_mouse_up(&mut self, _ctx: &mut EditorContext<'_>, _event: &PointerEvent) -> Transition {
        Transition::To(StateKind::Idle)
    }

    fn on_mouse_leave(&mut self, _ctx: &mut EditorContext<'_>, _event: &PointerEvent) -> Transition {
        Transition::To(StateKind::Idle)
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
