//! Editor collaborators handed to interaction states.

use vexel_settings::InputSettings;

use super::input::PointerEvent;
use crate::geometry::Point;
use crate::scene::SceneTree;
use crate::selection::SelectionManager;
use crate::viewport::ViewportManager;

/// Mutable view of everything an interaction state may touch.
pub struct EditorContext<'a> {
    pub tree: &'a mut SceneTree,
    pub selection: &'a mut SelectionManager,
    pub viewport: &'a mut ViewportManager,
    pub input: &'a InputSettings,
}

impl<'a> EditorContext<'a> {
    pub fn new(
        tree: &'a mut SceneTree,
        selection: &'a mut SelectionManager,
        viewport: &'a mut ViewportManager,
        input: &'a InputSettings,
    ) -> Self {
        Self {
            tree,
            selection,
            viewport,
            input,
        }
    }

    /// World position of a pointer event.
    pub fn world_point(&self, event: &PointerEvent) -> Point {
        self.viewport.screen_to_world(event.x, event.y)
    }

    /// Recomputes selection outlines from the current tree.
    pub fn refresh_selection_boxes(&mut self) {
        self.selection.update_selection_boxes(self.tree);
    }
}
