//! Routes input to the active state and performs transitions.

use super::context::EditorContext;
use super::idle::IdleState;
use super::input::InputEvent;
use super::moving::MovingState;
use super::panning::PanningState;
use super::selecting::SelectingState;
use super::state::{InteractionState, StateKind, Transition};

/// Upper bound on chained transitions triggered by a single event.
const MAX_TRANSITION_HOPS: usize = 8;

/// Owns the active [`InteractionState`].
pub struct InteractionController {
    state: Box<dyn InteractionState>,
}

impl Default for InteractionController {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for InteractionController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InteractionController")
            .field("state", &self.state.kind())
            .finish()
    }
}

impl InteractionController {
    pub fn new() -> Self {
        Self {
            state: Box::new(IdleState),
        }
    }

    pub fn current(&self) -> StateKind {
        self.state.kind()
    }

    /// Dispatches one event to the active state.
    pub fn handle(&mut self, ctx: &mut EditorContext<'_>, event: &InputEvent) {
        let transition = match event {
            InputEvent::MouseDown(e) => self.state.on_mouse_down(ctx, e),
            InputEvent::MouseMove(e) => self.state.on_mouse_move(ctx, e),
            InputEvent::MouseUp(e) => self.state.on_mouse_up(ctx, e),
            InputEvent::MouseLeave(e) => self.state.on_mouse_leave(ctx, e),
            InputEvent::Wheel(e) => self.state.on_wheel(ctx, e),
            InputEvent::KeyDown(e) => self.state.on_key_down(ctx, e),
        };
        if let Transition::To(next) = transition {
            self.transition_to(ctx, next, Some(event));
        }
    }

    /// Exits the current state, swaps in `next` and enters it.
    ///
    /// `enter` may immediately request another transition; those are followed
    /// without the triggering event.
    pub fn transition_to(
        &mut self,
        ctx: &mut EditorContext<'_>,
        next: StateKind,
        event: Option<&InputEvent>,
    ) {
        let mut next = next;
        let mut event = event;
        for _ in 0..MAX_TRANSITION_HOPS {
            tracing::debug!("Interaction {} -> {}", self.state.kind(), next);
            self.state.exit(ctx);
            self.state = create_state(next);
            match self.state.enter(ctx, event) {
                Transition::Stay => return,
                Transition::To(kind) => {
                    next = kind;
                    event = None;
                }
            }
        }
        tracing::error!("Interaction transitions did not settle, resetting to idle");
        self.state.exit(ctx);
        self.state = create_state(StateKind::Idle);
    }
}

fn create_state(kind: StateKind) -> Box<dyn InteractionState> {
    match kind {
        StateKind::Idle => Box::new(IdleState),
        StateKind::Selecting => Box::<SelectingState>::default(),
        StateKind::Panning => Box::<PanningState>::default(),
        StateKind::Moving => Box::<MovingState>::default(),
    }
}
