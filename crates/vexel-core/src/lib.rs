//! # Vexel Core
//!
//! Core types, errors and utilities shared by the Vexel crates.
//! Provides the error taxonomy, editor-wide constants and the synchronous
//! event bus used to propagate scene, viewport and selection changes.

pub mod constants;
pub mod error;
pub mod event_bus;

pub use error::{Error, RenderError, Result, SceneError, ViewportError};

pub use event_bus::{
    AppEvent, EventBus, EventCategory, EventFilter, SceneEvent, SelectionEvent, SubscriptionId,
    ViewportEvent,
};
