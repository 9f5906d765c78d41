//! The state trait shared by every interaction mode.

use std::fmt;

use super::context::EditorContext;
use super::input::{InputEvent, KeyEvent, PointerEvent, WheelEvent};

/// Interaction modes of the canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StateKind {
    Idle,
    Selecting,
    Panning,
    Moving,
}

impl fmt::Display for StateKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Idle => "idle",
            Self::Selecting => "selecting",
            Self::Panning => "panning",
            Self::Moving => "moving",
        };
        f.write_str(name)
    }
}

/// What the controller should do after a handler returns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    Stay,
    To(StateKind),
}

/// One mode of the interaction state machine.
///
/// Every handler defaults to doing nothing and staying put. `enter` receives
/// the event that caused the transition, when there was one.
pub trait InteractionState: Send {
    fn kind(&self) -> StateKind;

    fn enter(&mut self, _ctx: &mut EditorContext<'_>, _event: Option<&InputEvent>) -> Transition {
        Transition::Stay
    }

    fn exit(&mut self, _ctx: &mut EditorContext<'_>) {}

    fn on_mouse_down(&mut self, _ctx: &mut EditorContext<'_>, _event: &PointerEvent) -> Transition {
        Transition::Stay
    }

    fn on_mouse_move(&mut self, _ctx: &mut EditorContext<'_>, _event: &PointerEvent) -> Transition {
        Transition::Stay
    }

    fn on_mouse_up(&mut self, _ctx: &mut EditorContext<'_>, _event: &PointerEvent) -> Transition {
        Transition::Stay
    }

    fn on_wheel(&mut self, _ctx: &mut EditorContext<'_>, _event: &WheelEvent) -> Transition {
        Transition::Stay
    }

    fn on_key_down(&mut self, _ctx: &mut EditorContext<'_>, _event: &KeyEvent) -> Transition {
        Transition::Stay
    }

    fn on_mouse_leave(&mut self, _ctx: &mut EditorContext<'_>, _event: &PointerEvent) -> Transition {
        Transition::Stay
    }
}
