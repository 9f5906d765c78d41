//! Event type definitions for the event bus.
//!
//! This module defines all editor events organized by category.
//! Events are cloneable and serializable so they can be logged or inspected.

use serde::{Deserialize, Serialize};

/// Root event enum for all editor events
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum AppEvent {
    /// Scene graph changes
    Scene(SceneEvent),
    /// Pan/zoom/size changes
    Viewport(ViewportEvent),
    /// Selection, hover and marquee changes
    Selection(SelectionEvent),
}

impl AppEvent {
    /// Get the category of this event
    pub fn category(&self) -> EventCategory {
        match self {
            AppEvent::Scene(_) => EventCategory::Scene,
            AppEvent::Viewport(_) => EventCategory::Viewport,
            AppEvent::Selection(_) => EventCategory::Selection,
        }
    }

    /// Get a short description of this event for logging
    pub fn description(&self) -> String {
        match self {
            AppEvent::Scene(e) => e.description(),
            AppEvent::Viewport(e) => e.description(),
            AppEvent::Selection(e) => e.description(),
        }
    }
}

/// Event category for filtering
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventCategory {
    /// Scene graph events.
    Scene,
    /// Viewport events.
    Viewport,
    /// Selection events.
    Selection,
}

impl std::fmt::Display for EventCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EventCategory::Scene => write!(f, "Scene"),
            EventCategory::Viewport => write!(f, "Viewport"),
            EventCategory::Selection => write!(f, "Selection"),
        }
    }
}

/// Scene graph events
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SceneEvent {
    /// A node's local state or structure changed.
    NodeDirty {
        /// Id of the node that changed.
        id: String,
    },
    /// The root's children were replaced.
    Rebuilt {
        /// Number of nodes in the tree, excluding the root.
        node_count: usize,
    },
}

impl SceneEvent {
    /// Get a short description of this event
    pub fn description(&self) -> String {
        match self {
            SceneEvent::NodeDirty { id } => format!("Node {} dirty", id),
            SceneEvent::Rebuilt { node_count } => format!("Scene rebuilt ({} nodes)", node_count),
        }
    }
}

/// Viewport events
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ViewportEvent {
    /// Scale, offset or size changed.
    Changed {
        /// Current zoom factor.
        scale: f64,
        /// Screen-space horizontal offset.
        offset_x: f64,
        /// Screen-space vertical offset.
        offset_y: f64,
        /// Viewport width in pixels.
        width: f64,
        /// Viewport height in pixels.
        height: f64,
    },
}

impl ViewportEvent {
    /// Get a short description of this event
    pub fn description(&self) -> String {
        match self {
            ViewportEvent::Changed {
                scale,
                offset_x,
                offset_y,
                ..
            } => format!(
                "Viewport scale={:.2} offset=({:.1}, {:.1})",
                scale, offset_x, offset_y
            ),
        }
    }
}

/// Selection events
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SelectionEvent {
    /// The set of selected ids changed.
    Changed {
        /// Selected ids, sorted for stable output.
        ids: Vec<String>,
    },
    /// The hovered node changed.
    HoverChanged {
        /// Newly hovered id, if any.
        id: Option<String>,
    },
    /// The marquee rectangle changed.
    GhostBoxChanged {
        /// `[x, y, width, height]` in world space.
        ghost_box: [f64; 4],
    },
    /// The selection outlines were recomputed.
    BoxesChanged {
        /// Number of outlines.
        count: usize,
    },
}

impl SelectionEvent {
    /// Get a short description of this event
    pub fn description(&self) -> String {
        match self {
            SelectionEvent::Changed { ids } => format!("Selection: {} ids", ids.len()),
            SelectionEvent::HoverChanged { id } => match id {
                Some(id) => format!("Hover: {}", id),
                None => "Hover cleared".to_string(),
            },
            SelectionEvent::GhostBoxChanged { ghost_box } => format!(
                "Marquee: [{:.1}, {:.1}, {:.1}, {:.1}]",
                ghost_box[0], ghost_box[1], ghost_box[2], ghost_box[3]
            ),
            SelectionEvent::BoxesChanged { count } => format!("Selection boxes: {}", count),
        }
    }
}
