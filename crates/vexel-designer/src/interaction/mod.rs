//! Pointer, wheel and keyboard interaction.
//!
//! A small state machine decides what input means:
//!
//! ```text
//!            primary down on node          mouse up / leave
//!   Idle ─────────────────────────▶ Moving ────────────────▶ Idle
//!     │ primary down on canvas                 mouse up / leave
//!     ├───────────────────────────▶ Selecting ─────────────▶ Idle
//!     │ middle down                            mouse up / leave
//!     └───────────────────────────▶ Panning ───────────────▶ Idle
//! ```
//!
//! States receive an [`EditorContext`] borrowing the scene tree, selection
//! and viewport for the duration of one event.

pub mod context;
pub mod controller;
pub mod idle;
pub mod input;
pub mod moving;
pub mod panning;
pub mod selecting;
pub mod state;

pub use context::EditorContext;
pub use controller::InteractionController;
pub use input::{InputEvent, KeyEvent, Modifiers, MouseButton, PointerEvent, WheelEvent};
pub use state::{InteractionState, StateKind, Transition};
