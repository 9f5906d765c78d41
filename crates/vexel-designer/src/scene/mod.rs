//! Scene graph.
//!
//! - [`element`]: interchange records and shape/paint tags
//! - [`node`]: per-node local state and cached derived geometry
//! - [`tree`]: arena ownership, id index, structural edits, dirty tracking
//! - [`hit`]: per-type point and box predicates

pub mod element;
pub mod hit;
pub mod node;
pub mod tree;

pub use element::{BlendMode, Color, ElementRecord, FillPaint, NodeType};
pub use node::{NodeKey, SceneNode};
pub use tree::SceneTree;
