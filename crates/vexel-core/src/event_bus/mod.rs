//! # Event Bus Module
//!
//! Synchronous publish/subscribe used to tell dependent systems that the
//! scene, the viewport or the selection changed.
//!
//! ## Overview
//!
//! - Publishers emit typed events without knowing subscribers
//! - Subscribers filter by category and run on the publishing thread
//! - The bus is an explicit value shared through `Arc`, never a global
//!
//! ## Usage
//!
//! ```rust
//! use vexel_core::event_bus::{AppEvent, EventBus, EventCategory, EventFilter, SceneEvent};
//!
//! let bus = EventBus::shared();
//! let subscription = bus.subscribe(EventFilter::category(EventCategory::Scene), |event| {
//!     if let AppEvent::Scene(SceneEvent::NodeDirty { id }) = event {
//!         println!("{} changed", id);
//!     }
//! });
//!
//! bus.publish(AppEvent::Scene(SceneEvent::NodeDirty { id: "r1".to_string() }));
//! bus.unsubscribe(subscription);
//! ```

mod bus;
mod events;

pub use bus::*;
pub use events::*;
