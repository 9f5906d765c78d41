//! Editor facade wiring scene, selection, viewport and interaction together.

use std::sync::Arc;
use std::time::Instant;

use vexel_core::{EventBus, RenderError, Result, SceneError, ViewportError};
use vexel_settings::{Config, InputSettings};

use crate::interaction::{EditorContext, InputEvent, InteractionController, StateKind};
use crate::render::{Frame, RenderBackend, RenderScheduler};
use crate::scene::{ElementRecord, SceneTree};
use crate::selection::{SelectionManager, SelectionState};
use crate::viewport::{ViewportManager, ViewportState};

/// One canvas: a scene, its selection, its view and the input state machine.
///
/// All components publish on a shared [`EventBus`], so a [`RenderScheduler`]
/// built with [`Editor::bus`] repaints after any change.
pub struct Editor {
    bus: Arc<EventBus>,
    tree: SceneTree,
    selection: SelectionManager,
    viewport: ViewportManager,
    controller: InteractionController,
    input: InputSettings,
}

impl Editor {
    /// Creates an editor with default settings.
    pub fn new(width: f64, height: f64) -> Self {
        let bus = EventBus::shared();
        Self {
            tree: SceneTree::with_bus(Arc::clone(&bus)),
            selection: SelectionManager::with_bus(Arc::clone(&bus)),
            viewport: ViewportManager::with_bus(width, height, Arc::clone(&bus)),
            controller: InteractionController::new(),
            input: InputSettings::default(),
            bus,
        }
    }

    /// Creates an editor honouring the viewport and input sections of `config`.
    pub fn with_config(width: f64, height: f64, config: &Config) -> Result<Self> {
        let mut editor = Self::new(width, height);
        let (min_scale, max_scale) = config.scale_limits();
        editor.viewport.set_scale_limits(min_scale, max_scale)?;
        editor.viewport.set_fit_padding(config.viewport.fit_padding);
        editor.input = config.input.clone();
        Ok(editor)
    }

    pub fn bus(&self) -> Arc<EventBus> {
        Arc::clone(&self.bus)
    }

    /// Replaces the scene and drops the selection.
    pub fn load(&mut self, elements: &[ElementRecord]) -> std::result::Result<(), SceneError> {
        self.tree.build(elements)?;
        self.selection.clear();
        self.selection.set_hover(None);
        self.selection.update_selection_boxes(&self.tree);
        Ok(())
    }

    /// Replaces the scene from a JSON array of element records.
    pub fn load_json(&mut self, json: &str) -> Result<()> {
        let elements: Vec<ElementRecord> = serde_json::from_str(json)?;
        self.load(&elements)?;
        Ok(())
    }

    /// Feeds one input event through the interaction state machine.
    pub fn handle_input(&mut self, event: &InputEvent) {
        let mut ctx = EditorContext::new(
            &mut self.tree,
            &mut self.selection,
            &mut self.viewport,
            &self.input,
        );
        self.controller.handle(&mut ctx, event);
    }

    pub fn interaction_state(&self) -> StateKind {
        self.controller.current()
    }

    pub fn viewport_state(&self) -> ViewportState {
        self.viewport.state()
    }

    pub fn viewport(&self) -> &ViewportManager {
        &self.viewport
    }

    pub fn viewport_mut(&mut self) -> &mut ViewportManager {
        &mut self.viewport
    }

    pub fn selection(&self) -> &SelectionState {
        self.selection.state()
    }

    pub fn tree(&self) -> &SceneTree {
        &self.tree
    }

    /// Mutable tree access. Selection outlines are refreshed on the next
    /// interaction; call [`refresh_selection`](Self::refresh_selection) to do it now.
    pub fn tree_mut(&mut self) -> &mut SceneTree {
        &mut self.tree
    }

    pub fn refresh_selection(&mut self) {
        self.selection.update_selection_boxes(&self.tree);
    }

    /// Selects exactly `ids`. Unknown ids are dropped.
    pub fn select<I>(&mut self, ids: I)
    where
        I: IntoIterator<Item = String>,
    {
        self.selection.set_ids(ids);
        self.selection.update_selection_boxes(&self.tree);
    }

    pub fn to_element(&self, id: &str) -> Option<ElementRecord> {
        self.tree.to_element(id)
    }

    /// Fits the view to the scene. Returns false for an empty scene.
    pub fn fit_to_content(&mut self) -> bool {
        let Some(bounds) = self.tree.content_bounds() else {
            return false;
        };
        let state = self.viewport.state();
        self.viewport.fit_to_content(state.width, state.height, &bounds);
        true
    }

    /// Everything the renderers read for one frame.
    pub fn frame(&self) -> Frame<'_> {
        Frame {
            tree: &self.tree,
            viewport: self.viewport.state(),
            selection: self.selection.state(),
        }
    }

    /// Resizes the view now and the scheduler's surface once resizing settles.
    pub fn resize<B: RenderBackend>(
        &mut self,
        scheduler: &mut RenderScheduler<B>,
        width: u32,
        height: u32,
        now: Instant,
    ) -> std::result::Result<(), ViewportError> {
        self.viewport.set_size(f64::from(width), f64::from(height))?;
        scheduler.request_resize(width, height, now);
        Ok(())
    }

    /// Runs one scheduler tick and acknowledges the dirty nodes it drew.
    pub fn tick<B: RenderBackend>(
        &mut self,
        scheduler: &mut RenderScheduler<B>,
        now: Instant,
    ) -> std::result::Result<bool, RenderError> {
        let drawn = scheduler.tick(now, &self.frame())?;
        if drawn {
            let flushed = self.tree.take_dirty_nodes();
            tracing::trace!("Flushed {} dirty nodes", flushed.len());
        }
        Ok(drawn)
    }
}

impl std::fmt::Debug for Editor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Editor")
            .field("tree", &self.tree)
            .field("viewport", &self.viewport)
            .field("state", &self.controller.current())
            .finish()
    }
}
