//! Input events delivered by the host surface.
//!
//! Positions are in screen pixels relative to the canvas origin.

use serde::{Deserialize, Serialize};
use vexel_settings::{InputSettings, MainModifier};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MouseButton {
    Primary = 0,
    Middle = 1,
    Secondary = 2,
}

impl MouseButton {
    /// Maps a DOM-style button id.
    pub fn from_id(id: u8) -> Option<Self> {
        match id {
            0 => Some(Self::Primary),
            1 => Some(Self::Middle),
            2 => Some(Self::Secondary),
            _ => None,
        }
    }
}

/// Modifier keys held during an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
    pub meta: bool,
}

impl Modifiers {
    pub const NONE: Self = Self {
        shift: false,
        ctrl: false,
        alt: false,
        meta: false,
    };

    pub fn ctrl() -> Self {
        Self {
            ctrl: true,
            ..Self::NONE
        }
    }

    pub fn meta() -> Self {
        Self {
            meta: true,
            ..Self::NONE
        }
    }

    /// Whether the configured main modifier is down.
    pub fn main_held(&self, settings: &InputSettings) -> bool {
        match settings.main_modifier.resolve() {
            MainModifier::Meta => self.meta,
            MainModifier::Control | MainModifier::Auto => self.ctrl,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PointerEvent {
    pub x: f64,
    pub y: f64,
    pub button: Option<MouseButton>,
    pub modifiers: Modifiers,
}

impl PointerEvent {
    /// A pointer event with no button and no modifiers.
    pub fn at(x: f64, y: f64) -> Self {
        Self {
            x,
            y,
            button: None,
            modifiers: Modifiers::NONE,
        }
    }

    pub fn with_button(mut self, button: MouseButton) -> Self {
        self.button = Some(button);
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WheelEvent {
    pub x: f64,
    pub y: f64,
    pub delta_x: f64,
    pub delta_y: f64,
    pub modifiers: Modifiers,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyEvent {
    /// Key value as reported by the platform, e.g. `"0"`, `"="`, `"Escape"`.
    pub key: String,
    pub modifiers: Modifiers,
}

impl KeyEvent {
    pub fn new(key: impl Into<String>, modifiers: Modifiers) -> Self {
        Self {
            key: key.into(),
            modifiers,
        }
    }
}

/// Any event the interaction controller consumes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum InputEvent {
    MouseDown(PointerEvent),
    MouseMove(PointerEvent),
    MouseUp(PointerEvent),
    MouseLeave(PointerEvent),
    Wheel(WheelEvent),
    KeyDown(KeyEvent),
}

impl InputEvent {
    /// Screen position carried by pointer and wheel events.
    pub fn position(&self) -> Option<(f64, f64)> {
        match self {
            Self::MouseDown(e) | Self::MouseMove(e) | Self::MouseUp(e) | Self::MouseLeave(e) => {
                Some((e.x, e.y))
            }
            Self::Wheel(e) => Some((e.x, e.y)),
            Self::KeyDown(_) => None,
        }
    }
}
