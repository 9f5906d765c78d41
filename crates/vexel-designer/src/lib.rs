//! # Vexel Designer
//!
//! Scene graph, spatial queries, interaction and render scheduling for the
//! Vexel 2D editor.
//!
//! ## Core Components
//!
//! - **Geometry**: affine matrices, bounding boxes and quad intersection
//! - **Cache**: per-node memoization keyed by a static dependency table
//! - **Scene**: arena-backed node tree with id index and dirty tracking
//! - **Selection**: selected ids, hover, marquee and selection outlines
//! - **Viewport**: pan/zoom state and screen ↔ world mapping
//! - **Interaction**: Idle / Selecting / Panning / Moving state machine
//! - **Render**: backend trait, tiny-skia backend, renderers and scheduler
//!
//! ## Architecture
//!
//! ```text
//! InputEvent ─▶ InteractionController ─▶ SceneTree / SelectionManager / ViewportManager
//!                                                   │ publish
//!                                                   ▼
//!                                               EventBus ─▶ RenderScheduler ─▶ RenderBackend
//! ```
//!
//! ## Usage
//!
//! ```rust
//! use vexel_designer::{Editor, ElementRecord, InputEvent, MouseButton, PointerEvent};
//!
//! let mut editor = Editor::new(800.0, 600.0);
//! editor
//!     .load(&[ElementRecord::rectangle("r1", 0.0, 0.0, 100.0, 50.0, None)])
//!     .unwrap();
//!
//! let press = PointerEvent::at(10.0, 10.0).with_button(MouseButton::Primary);
//! editor.handle_input(&InputEvent::MouseDown(press));
//! editor.handle_input(&InputEvent::MouseMove(PointerEvent::at(20.0, 15.0)));
//! editor.handle_input(&InputEvent::MouseUp(PointerEvent::at(20.0, 15.0)));
//!
//! assert_eq!(editor.tree().absolute_matrix("r1").unwrap()[4], 10.0);
//! ```

pub mod cache;
pub mod editor;
pub mod geometry;
pub mod interaction;
pub mod render;
pub mod scene;
pub mod selection;
pub mod viewport;

pub use cache::{CacheDependencies, CacheKey, CacheManager, Dependency};
pub use editor::Editor;
pub use geometry::{BoundingBox, Matrix, MatrixRect, Point, IDENTITY};
pub use interaction::{
    InputEvent, InteractionController, KeyEvent, Modifiers, MouseButton, PointerEvent, StateKind,
    WheelEvent,
};
pub use render::{Frame, RenderBackend, RenderScheduler, SkiaBackend};
pub use scene::{BlendMode, Color, ElementRecord, FillPaint, NodeKey, NodeType, SceneNode, SceneTree};
pub use selection::{MoveInfo, SelectionManager, SelectionState};
pub use viewport::{ViewportManager, ViewportState};
