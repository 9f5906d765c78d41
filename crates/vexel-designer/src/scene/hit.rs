//! Per-type hit predicates.
//!
//! Point tests run in the node's local space, after the caller applied the
//! inverse absolute transform. Box tests run in world space. Types that are
//! never drawn (groups, the root, unrecognised tags) never match.

use super::element::NodeType;
use crate::geometry::{hit_matrix_node_test, BoundingBox, MatrixRect, Point};

/// Point containment in local coordinates.
pub fn contains_local_point(node_type: NodeType, width: f64, height: f64, local: Point) -> bool {
    match node_type {
        NodeType::Rectangle => {
            local.x >= 0.0 && local.x <= width && local.y >= 0.0 && local.y <= height
        }
        NodeType::Circle => {
            let radius = width.min(height) / 2.0;
            let center = Point::new(width / 2.0, height / 2.0);
            local.distance_to(&center) <= radius
        }
        NodeType::Group | NodeType::Root | NodeType::Unknown => false,
    }
}

/// Intersection of a node with a world-space query box.
///
/// Rectangles use the exact quad test. Circles compare envelopes, which is
/// looser near the corners of the bounding square.
pub fn intersects_box(
    node_type: NodeType,
    shape: &MatrixRect,
    bounds: &BoundingBox,
    query: &BoundingBox,
) -> bool {
    match node_type {
        NodeType::Rectangle => hit_matrix_node_test(shape, &query.to_matrix_rect()),
        NodeType::Circle => bounds.intersects(query),
        NodeType::Group | NodeType::Root | NodeType::Unknown => false,
    }
}
