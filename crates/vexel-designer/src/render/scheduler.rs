//! Dirty-driven frame scheduling.
//!
//! [`RenderScheduler`] listens on the event bus and raises a needs-render
//! flag whenever the scene, viewport or selection changes. The host calls
//! [`RenderScheduler::tick`] once per display refresh; a frame is drawn only
//! when something changed since the previous one.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use vexel_core::{EventBus, EventFilter, RenderError, SubscriptionId};
use vexel_settings::RenderSettings;

use super::backend::RenderBackend;
use super::debounce::Debouncer;
use super::elements::{render_scene, SceneStats};
use super::overlay::render_overlays;
use crate::scene::SceneTree;
use crate::selection::SelectionState;
use crate::viewport::ViewportState;

/// Everything a frame reads.
#[derive(Debug, Clone, Copy)]
pub struct Frame<'a> {
    pub tree: &'a SceneTree,
    pub viewport: ViewportState,
    pub selection: &'a SelectionState,
}

/// Draws one complete frame: background, scene, overlays.
pub fn render_frame<B>(
    backend: &mut B,
    frame: &Frame<'_>,
    settings: &RenderSettings,
) -> Result<SceneStats, RenderError>
where
    B: RenderBackend + ?Sized,
{
    backend.clear(settings.background);
    backend.save();
    backend.concat(&frame.viewport.transform_matrix());

    let visible_area = settings.culling.then(|| frame.viewport.world_rect());
    let result = render_scene(backend, frame.tree, visible_area.as_ref()).and_then(|stats| {
        render_overlays(
            backend,
            frame.tree,
            frame.selection,
            frame.viewport.scale,
            settings.theme_color,
        )
        .map(|_| stats)
    });

    backend.restore();
    backend.flush();
    result
}

pub struct RenderScheduler<B: RenderBackend> {
    backend: B,
    settings: RenderSettings,
    needs_render: Arc<AtomicBool>,
    surface_ready: bool,
    resize: Debouncer<(u32, u32)>,
    bus: Arc<EventBus>,
    subscription: SubscriptionId,
    frames: u64,
    last_stats: SceneStats,
    drawn_revision: Option<u64>,
}

impl<B: RenderBackend> RenderScheduler<B> {
    pub fn new(backend: B, settings: RenderSettings, bus: Arc<EventBus>) -> Self {
        let needs_render = Arc::new(AtomicBool::new(true));
        let flag = Arc::clone(&needs_render);
        let subscription = bus.subscribe(EventFilter::All, move |_| {
            flag.store(true, Ordering::Release);
        });
        let window = Duration::from_millis(settings.resize_debounce_ms);
        Self {
            backend,
            settings,
            needs_render,
            surface_ready: false,
            resize: Debouncer::new(window),
            bus,
            subscription,
            frames: 0,
            last_stats: SceneStats::default(),
            drawn_revision: None,
        }
    }

    /// Allocates the surface. Nothing is drawn until this succeeds.
    pub fn initialize(&mut self, width: u32, height: u32) -> Result<(), RenderError> {
        match self.backend.create_surface(width, height) {
            Ok(()) => {
                self.surface_ready = true;
                self.request_render();
                tracing::info!("Render surface ready ({}x{})", width, height);
                Ok(())
            }
            Err(e) => {
                self.surface_ready = false;
                tracing::error!("Render surface unavailable: {}", e);
                Err(e)
            }
        }
    }

    /// Queues a surface resize; only the last size within the debounce window is applied.
    pub fn request_resize(&mut self, width: u32, height: u32, now: Instant) {
        self.resize.call((width, height), now);
    }

    pub fn request_render(&self) {
        self.needs_render.store(true, Ordering::Release);
    }

    pub fn needs_render(&self) -> bool {
        self.needs_render.load(Ordering::Acquire)
    }

    pub fn is_surface_ready(&self) -> bool {
        self.surface_ready
    }

    pub fn has_pending_resize(&self) -> bool {
        self.resize.is_pending()
    }

    /// Frames drawn so far.
    pub fn frame_count(&self) -> u64 {
        self.frames
    }

    pub fn last_stats(&self) -> SceneStats {
        self.last_stats
    }

    pub fn settings(&self) -> &RenderSettings {
        &self.settings
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    /// Per-refresh poll. Returns whether a frame was drawn.
    ///
    /// Applies a settled resize first, then draws if anything changed: an
    /// event on the bus or a tree revision not drawn yet. The flag is cleared
    /// before drawing so changes published meanwhile schedule the next frame.
    pub fn tick(&mut self, now: Instant, frame: &Frame<'_>) -> Result<bool, RenderError> {
        if let Some((width, height)) = self.resize.poll(now) {
            self.initialize(width, height)?;
        }
        if !self.surface_ready {
            return Ok(false);
        }
        let revision = frame.tree.revision();
        let tree_changed = self.drawn_revision != Some(revision);
        if !self.needs_render.swap(false, Ordering::AcqRel) && !tree_changed {
            return Ok(false);
        }

        match render_frame(&mut self.backend, frame, &self.settings) {
            Ok(stats) => {
                self.frames += 1;
                self.last_stats = stats;
                self.drawn_revision = Some(revision);
                tracing::trace!(
                    "Frame {} drawn ({} nodes, {} culled)",
                    self.frames,
                    stats.drawn,
                    stats.culled
                );
                Ok(true)
            }
            Err(e) => {
                tracing::error!("Frame failed: {}", e);
                Err(e)
            }
        }
    }
}

impl<B: RenderBackend> Drop for RenderScheduler<B> {
    fn drop(&mut self) {
        self.bus.unsubscribe(self.subscription);
    }
}

impl<B: RenderBackend> std::fmt::Debug for RenderScheduler<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RenderScheduler")
            .field("surface_ready", &self.surface_ready)
            .field("needs_render", &self.needs_render())
            .field("frames", &self.frames)
            .finish()
    }
}
