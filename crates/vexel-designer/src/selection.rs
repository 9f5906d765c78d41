//! Selection, hover and marquee state.
//!
//! [`SelectionManager`] owns the [`SelectionState`] shared by the interaction
//! states and the overlay renderers. Changes are published on the event bus
//! so the render scheduler repaints the overlays.
//!
//! # Selection model
//!
//! - **Ids**: the selected node ids, unordered and unique
//! - **Hover**: at most one node under the pointer
//! - **Ghost box**: the marquee being dragged, inactive while it has no area
//! - **Selection boxes**: outlines to draw; a single node's own rectangle, or
//!   one merged envelope when several nodes are selected
//! - **Move info**: what a drag in progress is moving

use std::collections::HashSet;
use std::sync::Arc;

use vexel_core::{AppEvent, EventBus, SelectionEvent};

use crate::geometry::{
    apply_affine, invert_affine, merge_bounding_boxes, BoundingBox, MatrixRect, Point,
};
use crate::scene::SceneTree;

/// Outline drawn around the selection.
pub type SelectionBox = MatrixRect;

/// Target of a drag in progress.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MoveInfo {
    /// A single node, by id.
    Node(String),
    /// Every selected node, grabbed through the selection box at this index.
    SelectionBox(usize),
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SelectionState {
    pub ids: HashSet<String>,
    pub hover_id: Option<String>,
    pub ghost_box: BoundingBox,
    pub selection_boxes: Vec<SelectionBox>,
    pub move_info: Option<MoveInfo>,
}

impl SelectionState {
    /// Selected ids, sorted.
    pub fn sorted_ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.ids.iter().cloned().collect();
        ids.sort();
        ids
    }

    pub fn is_multi(&self) -> bool {
        self.ids.len() > 1
    }

    pub fn ghost_active(&self) -> bool {
        !self.ghost_box.is_empty()
    }
}

#[derive(Debug, Default)]
pub struct SelectionManager {
    state: SelectionState,
    bus: Option<Arc<EventBus>>,
}

impl SelectionManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_bus(bus: Arc<EventBus>) -> Self {
        Self {
            state: SelectionState::default(),
            bus: Some(bus),
        }
    }

    pub fn state(&self) -> &SelectionState {
        &self.state
    }

    pub fn contains(&self, id: &str) -> bool {
        self.state.ids.contains(id)
    }

    pub fn is_multi(&self) -> bool {
        self.state.is_multi()
    }

    /// Replaces the selected ids.
    pub fn set_ids<I>(&mut self, ids: I)
    where
        I: IntoIterator<Item = String>,
    {
        let ids: HashSet<String> = ids.into_iter().collect();
        if ids == self.state.ids {
            return;
        }
        self.state.ids = ids;
        tracing::debug!("Selection changed: {} ids", self.state.ids.len());
        self.publish(SelectionEvent::Changed {
            ids: self.state.sorted_ids(),
        });
    }

    pub fn select_only(&mut self, id: &str) {
        self.set_ids(std::iter::once(id.to_string()));
    }

    pub fn clear(&mut self) {
        self.set_ids(std::iter::empty());
    }

    pub fn set_hover(&mut self, id: Option<String>) {
        if id == self.state.hover_id {
            return;
        }
        self.state.hover_id = id.clone();
        self.publish(SelectionEvent::HoverChanged { id });
    }

    pub fn set_ghost_box(&mut self, ghost_box: BoundingBox) {
        if ghost_box == self.state.ghost_box {
            return;
        }
        self.state.ghost_box = ghost_box;
        self.publish(SelectionEvent::GhostBoxChanged {
            ghost_box: ghost_box.to_array(),
        });
    }

    pub fn clear_ghost_box(&mut self) {
        self.set_ghost_box(BoundingBox::default());
    }

    pub fn move_info(&self) -> Option<&MoveInfo> {
        self.state.move_info.as_ref()
    }

    pub fn set_move_info(&mut self, info: Option<MoveInfo>) {
        self.state.move_info = info;
    }

    /// Recomputes the outlines from the nodes' current geometry.
    ///
    /// Ids no longer in the tree are dropped from the selection.
    pub fn update_selection_boxes(&mut self, tree: &SceneTree) {
        let known: HashSet<String> = self
            .state
            .ids
            .iter()
            .filter(|id| tree.contains(id))
            .cloned()
            .collect();
        if known.len() != self.state.ids.len() {
            self.set_ids(known);
        }

        let boxes = match self.state.ids.len() {
            0 => Vec::new(),
            1 => self
                .state
                .ids
                .iter()
                .filter_map(|id| {
                    let node = tree.find_by_id(id)?;
                    let matrix = tree.absolute_matrix(id)?;
                    Some(MatrixRect::new(matrix, node.width(), node.height()))
                })
                .collect(),
            _ => merge_bounding_boxes(
                self.state
                    .ids
                    .iter()
                    .filter_map(|id| tree.absolute_bounding_box(id)),
            )
            .map(|merged| vec![merged.to_matrix_rect()])
            .unwrap_or_default(),
        };

        self.state.selection_boxes = boxes;
        self.publish(SelectionEvent::BoxesChanged {
            count: self.state.selection_boxes.len(),
        });
    }

    /// Index of the first selection box containing the world point.
    pub fn selection_box_at(&self, point: Point) -> Option<usize> {
        self.state.selection_boxes.iter().position(|selection_box| {
            invert_affine(&selection_box.matrix)
                .map(|inverse| {
                    let local = apply_affine(&inverse, point);
                    local.x >= 0.0
                        && local.x <= selection_box.width
                        && local.y >= 0.0
                        && local.y <= selection_box.height
                })
                .unwrap_or(false)
        })
    }

    fn publish(&self, event: SelectionEvent) {
        if let Some(bus) = &self.bus {
            bus.publish(AppEvent::Selection(event));
        }
    }
}
