//! Viewport and coordinate transformation for canvas rendering.
//!
//! Maps world (design) coordinates to screen pixels and back, and owns the
//! pan/zoom state. The mapping has no axis flip:
//!
//! ```text
//! screen = world * scale + offset
//! world  = (screen - offset) / scale
//! ```
//!
//! Every mutation publishes a [`ViewportEvent::Changed`] on the event bus
//! before returning.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use vexel_core::constants::{
    DEFAULT_MAX_SCALE, DEFAULT_MIN_SCALE, MIN_ZOOM_DELTA, VIEW_PADDING, ZOOM_STEPS,
};
use vexel_core::{
    AppEvent, EventBus, EventCategory, EventFilter, SubscriptionId, ViewportError, ViewportEvent,
};

use crate::geometry::{BoundingBox, Matrix, Point};

/// Relative tolerance when comparing the scale against zoom presets.
const STEP_TOLERANCE: f64 = 1e-9;

/// Snapshot of pan/zoom state.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ViewportState {
    pub scale: f64,
    pub offset_x: f64,
    pub offset_y: f64,
    pub width: f64,
    pub height: f64,
}

impl ViewportState {
    /// World → screen transform.
    pub fn transform_matrix(&self) -> Matrix {
        [self.scale, 0.0, 0.0, self.scale, self.offset_x, self.offset_y]
    }

    /// World x of the screen's left edge.
    pub fn x(&self) -> f64 {
        -self.offset_x / self.scale
    }

    /// World y of the screen's top edge.
    pub fn y(&self) -> f64 {
        -self.offset_y / self.scale
    }

    /// The visible area in world coordinates.
    pub fn world_rect(&self) -> BoundingBox {
        BoundingBox::new(
            self.x(),
            self.y(),
            self.width / self.scale,
            self.height / self.scale,
        )
    }

    fn from_event(event: &ViewportEvent) -> Self {
        match *event {
            ViewportEvent::Changed {
                scale,
                offset_x,
                offset_y,
                width,
                height,
            } => Self {
                scale,
                offset_x,
                offset_y,
                width,
                height,
            },
        }
    }

    fn to_event(self) -> ViewportEvent {
        ViewportEvent::Changed {
            scale: self.scale,
            offset_x: self.offset_x,
            offset_y: self.offset_y,
            width: self.width,
            height: self.height,
        }
    }
}

impl Default for ViewportState {
    fn default() -> Self {
        Self {
            scale: 1.0,
            offset_x: 0.0,
            offset_y: 0.0,
            width: 0.0,
            height: 0.0,
        }
    }
}

impl fmt::Display for ViewportState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Zoom: {:.2}x | Offset: ({:.1}, {:.1})",
            self.scale, self.offset_x, self.offset_y
        )
    }
}

/// Owns the viewport state and the zoom limits.
pub struct ViewportManager {
    state: ViewportState,
    min_scale: f64,
    max_scale: f64,
    fit_padding: f64,
    bus: Arc<EventBus>,
}

impl ViewportManager {
    /// Creates a manager with a private event bus.
    pub fn new(width: f64, height: f64) -> Self {
        Self::with_bus(width, height, EventBus::shared())
    }

    /// Creates a manager that publishes on `bus`.
    pub fn with_bus(width: f64, height: f64, bus: Arc<EventBus>) -> Self {
        Self {
            state: ViewportState {
                width,
                height,
                ..ViewportState::default()
            },
            min_scale: DEFAULT_MIN_SCALE,
            max_scale: DEFAULT_MAX_SCALE,
            fit_padding: VIEW_PADDING,
            bus,
        }
    }

    pub fn state(&self) -> ViewportState {
        self.state
    }

    pub fn scale(&self) -> f64 {
        self.state.scale
    }

    pub fn min_scale(&self) -> f64 {
        self.min_scale
    }

    pub fn max_scale(&self) -> f64 {
        self.max_scale
    }

    /// Sets the zoom bounds and clamps the current scale into them.
    pub fn set_scale_limits(&mut self, min_scale: f64, max_scale: f64) -> Result<(), ViewportError> {
        if !(min_scale > 0.0 && min_scale <= max_scale) {
            return Err(ViewportError::InvalidScaleLimits {
                min: min_scale,
                max: max_scale,
            });
        }
        self.min_scale = min_scale;
        self.max_scale = max_scale;
        let clamped = self.clamp_scale(self.state.scale);
        if clamped != self.state.scale {
            let (cx, cy) = (self.state.width / 2.0, self.state.height / 2.0);
            self.zoom(clamped, cx, cy);
        }
        Ok(())
    }

    /// Fraction of the viewport kept free on each edge by [`fit_to_content`](Self::fit_to_content).
    pub fn set_fit_padding(&mut self, padding: f64) {
        self.fit_padding = padding.clamp(0.0, 0.49);
    }

    /// Updates the viewport's pixel size.
    pub fn set_size(&mut self, width: f64, height: f64) -> Result<(), ViewportError> {
        for (field, value) in [("width", width), ("height", height)] {
            if !value.is_finite() || value < 0.0 {
                return Err(ViewportError::NonFiniteValue {
                    field: field.to_string(),
                });
            }
        }
        self.state.width = width;
        self.state.height = height;
        tracing::debug!("Viewport resized to {}x{}", width, height);
        self.notify();
        Ok(())
    }

    /// Shifts the view by a screen-space delta.
    pub fn pan(&mut self, dx: f64, dy: f64) {
        if !dx.is_finite() || !dy.is_finite() {
            tracing::warn!("Ignoring non-finite pan ({}, {})", dx, dy);
            return;
        }
        self.state.offset_x += dx;
        self.state.offset_y += dy;
        self.notify();
    }

    /// Sets the scale while keeping the world point under `(center_x, center_y)` fixed.
    pub fn zoom(&mut self, new_scale: f64, center_x: f64, center_y: f64) {
        if !new_scale.is_finite() || new_scale <= 0.0 {
            tracing::warn!("Ignoring invalid zoom scale {}", new_scale);
            return;
        }
        let scale = self.clamp_scale(new_scale);
        let ratio = scale / self.state.scale;
        self.state.offset_x = center_x - (center_x - self.state.offset_x) * ratio;
        self.state.offset_y = center_y - (center_y - self.state.offset_y) * ratio;
        self.state.scale = scale;
        self.notify();
    }

    /// Relative zoom: the scale is multiplied by `1 + delta`.
    pub fn zoom_delta(&mut self, delta: f64, center_x: f64, center_y: f64) {
        if !delta.is_finite() {
            tracing::warn!("Ignoring invalid zoom delta {}", delta);
            return;
        }
        let delta = delta.max(MIN_ZOOM_DELTA);
        self.zoom(self.state.scale * (1.0 + delta), center_x, center_y);
    }

    /// Zooms to the next larger preset about the given screen point.
    pub fn zoom_in_step(&mut self, center_x: f64, center_y: f64) {
        let current = self.state.scale * (1.0 + STEP_TOLERANCE);
        if let Some(next) = ZOOM_STEPS.iter().copied().find(|step| *step > current) {
            self.zoom(next, center_x, center_y);
        }
    }

    /// Zooms to the next smaller preset about the given screen point.
    pub fn zoom_out_step(&mut self, center_x: f64, center_y: f64) {
        let current = self.state.scale * (1.0 - STEP_TOLERANCE);
        if let Some(next) = ZOOM_STEPS.iter().rev().copied().find(|step| *step < current) {
            self.zoom(next, center_x, center_y);
        }
    }

    /// Returns to 100% with no offset.
    pub fn reset(&mut self) {
        self.state.scale = self.clamp_scale(1.0);
        self.state.offset_x = 0.0;
        self.state.offset_y = 0.0;
        self.notify();
    }

    /// Scales and centers `bounds` inside a `viewport_width × viewport_height` view.
    ///
    /// Degenerate bounds keep the current scale and only center.
    pub fn fit_to_content(&mut self, viewport_width: f64, viewport_height: f64, bounds: &BoundingBox) {
        let padding_factor = 1.0 - self.fit_padding * 2.0;
        let fit = |extent: f64, available: f64| {
            if extent > 0.0 {
                available * padding_factor / extent
            } else {
                f64::INFINITY
            }
        };
        let candidate = fit(bounds.width, viewport_width).min(fit(bounds.height, viewport_height));
        let scale = if candidate.is_finite() && candidate > 0.0 {
            self.clamp_scale(candidate)
        } else {
            self.state.scale
        };

        let center = bounds.center();
        self.state.width = viewport_width;
        self.state.height = viewport_height;
        self.state.scale = scale;
        self.state.offset_x = viewport_width / 2.0 - center.x * scale;
        self.state.offset_y = viewport_height / 2.0 - center.y * scale;
        tracing::debug!("Fit to content: {}", self.state);
        self.notify();
    }

    pub fn screen_to_world(&self, screen_x: f64, screen_y: f64) -> Point {
        Point::new(
            (screen_x - self.state.offset_x) / self.state.scale,
            (screen_y - self.state.offset_y) / self.state.scale,
        )
    }

    pub fn world_to_screen(&self, world: Point) -> Point {
        Point::new(
            world.x * self.state.scale + self.state.offset_x,
            world.y * self.state.scale + self.state.offset_y,
        )
    }

    /// Calls `listener` with the new state after every change.
    pub fn add_state_change_listener<F>(&self, listener: F) -> SubscriptionId
    where
        F: Fn(&ViewportState) + Send + Sync + 'static,
    {
        self.bus
            .subscribe(EventFilter::category(EventCategory::Viewport), move |event| {
                if let AppEvent::Viewport(viewport_event) = event {
                    listener(&ViewportState::from_event(viewport_event));
                }
            })
    }

    pub fn remove_state_change_listener(&self, id: SubscriptionId) -> bool {
        self.bus.unsubscribe(id)
    }

    fn clamp_scale(&self, scale: f64) -> f64 {
        scale.clamp(self.min_scale, self.max_scale)
    }

    fn notify(&self) {
        self.bus.publish(AppEvent::Viewport(self.state.to_event()));
    }
}

impl fmt::Debug for ViewportManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ViewportManager")
            .field("state", &self.state)
            .field("min_scale", &self.min_scale)
            .field("max_scale", &self.max_scale)
            .finish()
    }
}

impl Default for ViewportManager {
    fn default() -> Self {
        Self::new(1200.0, 800.0)
    }
}
