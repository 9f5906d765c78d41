//! Scene tree: node arena, id index and dirty tracking.

use std::collections::{BTreeSet, HashMap, HashSet};
use std::sync::Arc;

use lyon::path::Path;
use slotmap::SlotMap;
use vexel_core::constants::ROOT_NODE_ID;
use vexel_core::{AppEvent, EventBus, SceneError, SceneEvent};

use super::element::{ElementRecord, FillPaint, NodeType};
use super::hit;
use super::node::{CachedValue, NodeKey, SceneNode};
use crate::cache::{CacheKey, Dependency};
use crate::geometry::{
    apply_affine, compose_affine, invert_affine, merge_bounding_boxes, transformed_bounding_box,
    BoundingBox, Matrix, MatrixRect, Point, IDENTITY,
};

/// Stroke outset applied to node boxes. Nodes carry no stroke yet.
const STROKE_WIDTH: f64 = 0.0;

/// Owner of every node in a scene.
///
/// Nodes live in an arena and refer to each other by [`NodeKey`]. The id
/// index always mirrors the arena: a node is reachable by id exactly while
/// it is attached below the root.
pub struct SceneTree {
    nodes: SlotMap<NodeKey, SceneNode>,
    index: HashMap<String, NodeKey>,
    root: NodeKey,
    dirty: BTreeSet<String>,
    revision: u64,
    bus: Option<Arc<EventBus>>,
}

impl Default for SceneTree {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for SceneTree {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SceneTree")
            .field("nodes", &self.len())
            .field("dirty", &self.dirty.len())
            .finish()
    }
}

impl SceneTree {
    /// Creates a tree holding only the root.
    pub fn new() -> Self {
        let mut nodes = SlotMap::with_key();
        let root = nodes.insert(SceneNode::root(ROOT_NODE_ID));
        let mut index = HashMap::new();
        index.insert(ROOT_NODE_ID.to_string(), root);
        Self {
            nodes,
            index,
            root,
            dirty: BTreeSet::new(),
            revision: 0,
            bus: None,
        }
    }

    /// Creates an empty tree that reports changes on `bus`.
    pub fn with_bus(bus: Arc<EventBus>) -> Self {
        let mut tree = Self::new();
        tree.bus = Some(bus);
        tree
    }

    pub fn root_key(&self) -> NodeKey {
        self.root
    }

    /// Number of nodes below the root.
    pub fn len(&self) -> usize {
        self.nodes.len() - 1
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    // ---------------------------------------------------------------
    // Construction
    // ---------------------------------------------------------------

    /// Replaces the root's children with nodes built from `elements`.
    ///
    /// Ids must be unique across the whole input; on error the tree is left
    /// untouched.
    pub fn build(&mut self, elements: &[ElementRecord]) -> Result<(), SceneError> {
        let mut seen = HashSet::new();
        check_ids(elements, &mut seen, |_| false)?;

        let root = self.root;
        let old_children = std::mem::take(&mut self.nodes[root].children);
        for child in old_children {
            self.remove_subtree(child);
        }
        for record in elements {
            self.insert_subtree(root, record);
        }
        self.nodes[root].invalidate(Dependency::Children);
        self.record_dirty(root);

        let node_count = self.len();
        tracing::debug!("Scene rebuilt with {} nodes", node_count);
        self.publish(SceneEvent::Rebuilt { node_count });
        Ok(())
    }

    /// Inserts `record` and its children as the last child of `parent_id`.
    pub fn insert(&mut self, parent_id: &str, record: &ElementRecord) -> Result<NodeKey, SceneError> {
        let parent = self.require(parent_id)?;
        let mut seen = HashSet::new();
        check_ids(std::slice::from_ref(record), &mut seen, |id| {
            self.index.contains_key(id)
        })?;

        let key = self.insert_subtree(parent, record);
        self.touch(key);
        Ok(key)
    }

    /// Moves `child_id` to the end of `parent_id`'s children.
    ///
    /// The node is detached from its current parent first.
    pub fn append_child(&mut self, parent_id: &str, child_id: &str) -> Result<(), SceneError> {
        let parent = self.require(parent_id)?;
        let child = self.require(child_id)?;
        if child == self.root {
            return Err(SceneError::RootMutation {
                operation: "re-parented".to_string(),
            });
        }
        if child == parent || self.is_ancestor(child, parent) {
            return Err(SceneError::CycleDetected {
                parent: parent_id.to_string(),
                child: child_id.to_string(),
            });
        }

        if let Some(old_parent) = self.nodes[child].parent {
            self.nodes[old_parent].children.retain(|k| *k != child);
            self.touch_structure(old_parent);
        }
        self.nodes[child].parent = Some(parent);
        self.nodes[parent].children.push(child);

        self.invalidate_subtree(child, Dependency::Parent);
        self.touch(child);
        tracing::debug!("Appended {} to {}", child_id, parent_id);
        Ok(())
    }

    /// Detaches `child_id` from `parent_id` and drops its subtree.
    pub fn remove_child(&mut self, parent_id: &str, child_id: &str) -> Result<(), SceneError> {
        let parent = self.require(parent_id)?;
        let child = self.require(child_id)?;
        if self.nodes[child].parent != Some(parent) {
            return Err(SceneError::NotAChild {
                parent: parent_id.to_string(),
                child: child_id.to_string(),
            });
        }

        self.nodes[parent].children.retain(|k| *k != child);
        self.remove_subtree(child);
        self.touch_structure(parent);
        Ok(())
    }

    /// Drops every child of `parent_id`.
    pub fn remove_children(&mut self, parent_id: &str) -> Result<(), SceneError> {
        let parent = self.require(parent_id)?;
        let children = std::mem::take(&mut self.nodes[parent].children);
        for child in children {
            self.remove_subtree(child);
        }
        self.touch_structure(parent);
        Ok(())
    }

    // ---------------------------------------------------------------
    // Lookup
    // ---------------------------------------------------------------

    pub fn key_of(&self, id: &str) -> Option<NodeKey> {
        self.index.get(id).copied()
    }

    pub fn node(&self, key: NodeKey) -> Option<&SceneNode> {
        self.nodes.get(key)
    }

    pub fn find_by_id(&self, id: &str) -> Option<&SceneNode> {
        self.key_of(id).and_then(|key| self.nodes.get(key))
    }

    /// Nodes for every known id, in input order. Unknown ids are skipped.
    pub fn find_by_ids<I, S>(&self, ids: I) -> Vec<&SceneNode>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        ids.into_iter()
            .filter_map(|id| self.find_by_id(id.as_ref()))
            .collect()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    /// Keys below `key` in paint order (parents before children).
    pub fn descendants(&self, key: NodeKey) -> Vec<NodeKey> {
        let mut out = Vec::new();
        let mut stack: Vec<NodeKey> = match self.nodes.get(key) {
            Some(node) => node.children.iter().rev().copied().collect(),
            None => return out,
        };
        while let Some(next) = stack.pop() {
            if let Some(node) = self.nodes.get(next) {
                out.push(next);
                stack.extend(node.children.iter().rev().copied());
            }
        }
        out
    }

    /// Every node below the root, back to front.
    pub fn iter_paint_order(&self) -> impl Iterator<Item = (NodeKey, &SceneNode)> + '_ {
        self.descendants(self.root)
            .into_iter()
            .filter_map(move |key| self.nodes.get(key).map(|node| (key, node)))
    }

    /// Snapshot of a node and its subtree.
    pub fn to_element(&self, id: &str) -> Option<ElementRecord> {
        self.key_of(id).and_then(|key| self.record_of(key))
    }

    // ---------------------------------------------------------------
    // Mutation
    // ---------------------------------------------------------------

    pub fn translate(&mut self, id: &str, dx: f64, dy: f64) -> bool {
        let Some(key) = self.key_of(id) else {
            return false;
        };
        let mut matrix = self.nodes[key].matrix();
        matrix[4] += dx;
        matrix[5] += dy;
        self.apply_matrix(key, matrix);
        true
    }

    pub fn set_position(&mut self, id: &str, x: f64, y: f64) -> bool {
        let Some(key) = self.key_of(id) else {
            return false;
        };
        let mut matrix = self.nodes[key].matrix();
        matrix[4] = x;
        matrix[5] = y;
        self.apply_matrix(key, matrix);
        true
    }

    pub fn set_matrix(&mut self, id: &str, matrix: Matrix) -> bool {
        let Some(key) = self.key_of(id) else {
            return false;
        };
        self.apply_matrix(key, matrix);
        true
    }

    pub fn set_size(&mut self, id: &str, width: f64, height: f64) -> bool {
        self.update(id, |node| {
            node.set_width(width);
            node.set_height(height);
        })
    }

    pub fn set_width(&mut self, id: &str, width: f64) -> bool {
        self.update(id, |node| node.set_width(width))
    }

    pub fn set_height(&mut self, id: &str, height: f64) -> bool {
        self.update(id, |node| node.set_height(height))
    }

    pub fn set_visible(&mut self, id: &str, visible: bool) -> bool {
        self.update(id, |node| node.set_visible(visible))
    }

    pub fn set_fill_paints(&mut self, id: &str, paints: Vec<FillPaint>) -> bool {
        self.update(id, |node| node.set_fill_paints(paints))
    }

    pub fn set_opacity(&mut self, id: &str, opacity: f64) -> bool {
        self.update(id, |node| node.set_opacity(opacity))
    }

    // ---------------------------------------------------------------
    // Derived geometry
    // ---------------------------------------------------------------

    pub fn absolute_matrix(&self, id: &str) -> Option<Matrix> {
        self.absolute_matrix_of(self.key_of(id)?)
    }

    pub fn absolute_bounding_box(&self, id: &str) -> Option<BoundingBox> {
        self.absolute_bounding_box_of(self.key_of(id)?)
    }

    pub fn rotation(&self, id: &str) -> Option<f64> {
        self.find_by_id(id).map(SceneNode::rotation)
    }

    pub fn hover_path(&self, id: &str) -> Option<Arc<Path>> {
        self.find_by_id(id).map(SceneNode::hover_path)
    }

    pub fn stroke_box(&self, id: &str) -> Option<BoundingBox> {
        self.stroke_box_of(self.key_of(id)?)
    }

    pub fn render_box(&self, id: &str) -> Option<BoundingBox> {
        self.render_box_of(self.key_of(id)?)
    }

    /// World transform of a node: its ancestors' matrices applied after its own.
    pub fn absolute_matrix_of(&self, key: NodeKey) -> Option<Matrix> {
        let node = self.nodes.get(key)?;
        if let Some(matrix) = node.peek(CacheKey::Transform).and_then(|v| v.as_matrix()) {
            return Some(matrix);
        }
        let parent_matrix = match node.parent {
            Some(parent) => self.absolute_matrix_of(parent)?,
            None => IDENTITY,
        };
        let local = node.matrix();
        node.cached(CacheKey::Transform, || {
            CachedValue::Matrix(compose_affine(&parent_matrix, &local))
        })
        .as_matrix()
    }

    /// World-space envelope of a node.
    ///
    /// Groups and the root enclose their children; an empty group falls back
    /// to its own rectangle.
    pub fn absolute_bounding_box_of(&self, key: NodeKey) -> Option<BoundingBox> {
        let node = self.nodes.get(key)?;
        if let Some(bbox) = node.peek(CacheKey::BoundingBox).and_then(|v| v.as_box()) {
            return Some(bbox);
        }
        let matrix = self.absolute_matrix_of(key)?;
        let own = transformed_bounding_box(&matrix, node.width(), node.height());
        let bbox = match node.node_type() {
            NodeType::Group | NodeType::Root => merge_bounding_boxes(
                node.children
                    .iter()
                    .filter_map(|child| self.absolute_bounding_box_of(*child)),
            )
            .unwrap_or(own),
            NodeType::Rectangle | NodeType::Circle | NodeType::Unknown => own,
        };
        node.cached(CacheKey::BoundingBox, || CachedValue::Box(bbox))
            .as_box()
    }

    pub fn stroke_box_of(&self, key: NodeKey) -> Option<BoundingBox> {
        let node = self.nodes.get(key)?;
        if let Some(bbox) = node.peek(CacheKey::StrokeBox).and_then(|v| v.as_box()) {
            return Some(bbox);
        }
        let bbox = self.absolute_bounding_box_of(key)?.expand(STROKE_WIDTH / 2.0);
        node.cached(CacheKey::StrokeBox, || CachedValue::Box(bbox))
            .as_box()
    }

    /// Area a node may paint. Shadows and blur are not drawn, so this is the stroke box.
    pub fn render_box_of(&self, key: NodeKey) -> Option<BoundingBox> {
        let node = self.nodes.get(key)?;
        if let Some(bbox) = node.peek(CacheKey::RenderBox).and_then(|v| v.as_box()) {
            return Some(bbox);
        }
        let bbox = self.stroke_box_of(key)?;
        node.cached(CacheKey::RenderBox, || CachedValue::Box(bbox))
            .as_box()
    }

    /// Union of the boxes of the root's children.
    pub fn content_bounds(&self) -> Option<BoundingBox> {
        merge_bounding_boxes(
            self.nodes[self.root]
                .children
                .iter()
                .filter_map(|child| self.absolute_bounding_box_of(*child)),
        )
    }

    // ---------------------------------------------------------------
    // Hit testing
    // ---------------------------------------------------------------

    /// Whether the world-space `point` falls inside the node.
    pub fn hit_test(&self, id: &str, point: Point) -> bool {
        self.key_of(id)
            .map(|key| self.hit_test_key(key, point))
            .unwrap_or(false)
    }

    /// Whether the node overlaps the world-space box.
    pub fn intersects_with(&self, id: &str, query: &BoundingBox) -> bool {
        self.key_of(id)
            .map(|key| self.intersects_with_key(key, query))
            .unwrap_or(false)
    }

    pub fn hit_test_key(&self, key: NodeKey, point: Point) -> bool {
        let Some(node) = self.nodes.get(key) else {
            return false;
        };
        if !self.is_shown(key) {
            return false;
        }
        let Some(inverse) = self.absolute_matrix_of(key).and_then(|m| invert_affine(&m)) else {
            return false;
        };
        let local = apply_affine(&inverse, point);
        hit::contains_local_point(node.node_type(), node.width(), node.height(), local)
    }

    pub fn intersects_with_key(&self, key: NodeKey, query: &BoundingBox) -> bool {
        let Some(node) = self.nodes.get(key) else {
            return false;
        };
        if !self.is_shown(key) {
            return false;
        }
        let (Some(matrix), Some(bounds)) = (
            self.absolute_matrix_of(key),
            self.absolute_bounding_box_of(key),
        ) else {
            return false;
        };
        let shape = MatrixRect::new(matrix, node.width(), node.height());
        hit::intersects_box(node.node_type(), &shape, &bounds, query)
    }

    /// Id of the front-most visible node under `point`.
    ///
    /// Children are tested before their parent; hidden nodes hide their subtree.
    pub fn node_at(&self, point: Point) -> Option<String> {
        self.topmost_in(self.root, point)
            .and_then(|key| self.nodes.get(key))
            .map(|node| node.id().to_string())
    }

    /// Ids of every visible node overlapping `query`, in paint order.
    pub fn nodes_in_box(&self, query: &BoundingBox) -> Vec<String> {
        let mut out = Vec::new();
        self.collect_in_box(self.root, query, &mut out);
        out
    }

    // ---------------------------------------------------------------
    // Dirty tracking
    // ---------------------------------------------------------------

    /// Records a node as changed and notifies subscribers.
    pub fn mark_node_dirty(&mut self, id: &str) -> bool {
        match self.key_of(id) {
            Some(key) => {
                self.record_dirty(key);
                true
            }
            None => false,
        }
    }

    /// Ids changed since the last call, sorted.
    pub fn take_dirty_nodes(&mut self) -> Vec<String> {
        std::mem::take(&mut self.dirty).into_iter().collect()
    }

    pub fn has_dirty_nodes(&self) -> bool {
        !self.dirty.is_empty()
    }

    /// Counter bumped on every change; unaffected by [`take_dirty_nodes`](Self::take_dirty_nodes).
    pub fn revision(&self) -> u64 {
        self.revision
    }

    // ---------------------------------------------------------------
    // Internals
    // ---------------------------------------------------------------

    fn require(&self, id: &str) -> Result<NodeKey, SceneError> {
        self.key_of(id).ok_or_else(|| SceneError::UnknownNode { id: id.to_string() })
    }

    fn update<F>(&mut self, id: &str, apply: F) -> bool
    where
        F: FnOnce(&mut SceneNode),
    {
        let Some(key) = self.key_of(id) else {
            return false;
        };
        apply(&mut self.nodes[key]);
        self.touch(key);
        true
    }

    fn apply_matrix(&mut self, key: NodeKey, matrix: Matrix) {
        self.nodes[key].set_matrix(matrix);
        for descendant in self.descendants(key) {
            self.nodes[descendant].invalidate(Dependency::Parent);
        }
        self.touch(key);
    }

    fn invalidate_subtree(&mut self, key: NodeKey, dependency: Dependency) {
        self.nodes[key].invalidate(dependency);
        for descendant in self.descendants(key) {
            self.nodes[descendant].invalidate(dependency);
        }
    }

    /// Records `key` and flags every ancestor's children as changed.
    fn touch(&mut self, key: NodeKey) {
        self.record_dirty(key);
        let mut current = self.nodes.get(key).and_then(|node| node.parent);
        while let Some(ancestor) = current {
            let Some(node) = self.nodes.get_mut(ancestor) else {
                break;
            };
            node.invalidate(Dependency::Children);
            current = node.parent;
            self.record_dirty(ancestor);
        }
    }

    /// Like [`touch`](Self::touch) for a node whose own child list changed.
    fn touch_structure(&mut self, key: NodeKey) {
        if let Some(node) = self.nodes.get_mut(key) {
            node.invalidate(Dependency::Children);
        }
        self.touch(key);
    }

    fn record_dirty(&mut self, key: NodeKey) {
        let Some(id) = self.nodes.get(key).map(|node| node.id().to_string()) else {
            return;
        };
        self.dirty.insert(id.clone());
        self.revision = self.revision.wrapping_add(1);
        self.publish(SceneEvent::NodeDirty { id });
    }

    fn publish(&self, event: SceneEvent) {
        if let Some(bus) = &self.bus {
            bus.publish(AppEvent::Scene(event));
        }
    }

    fn insert_subtree(&mut self, parent: NodeKey, record: &ElementRecord) -> NodeKey {
        let mut node = SceneNode::from_record(record);
        node.parent = Some(parent);
        let key = self.nodes.insert(node);
        self.index.insert(record.id.clone(), key);
        if let Some(parent_node) = self.nodes.get_mut(parent) {
            parent_node.children.push(key);
        }
        if record.node_type == NodeType::Unknown {
            tracing::warn!("Element {} has an unrecognised type", record.id);
        }
        for child in &record.children {
            self.insert_subtree(key, child);
        }
        key
    }

    fn remove_subtree(&mut self, key: NodeKey) {
        let mut doomed = self.descendants(key);
        doomed.push(key);
        for k in doomed {
            if let Some(node) = self.nodes.remove(k) {
                self.index.remove(node.id());
            }
        }
    }

    /// Whether the node and every ancestor are visible.
    fn is_shown(&self, key: NodeKey) -> bool {
        let mut current = Some(key);
        while let Some(k) = current {
            match self.nodes.get(k) {
                Some(node) if node.visible() => current = node.parent,
                _ => return false,
            }
        }
        true
    }

    fn is_ancestor(&self, ancestor: NodeKey, key: NodeKey) -> bool {
        let mut current = self.nodes.get(key).and_then(|node| node.parent);
        while let Some(k) = current {
            if k == ancestor {
                return true;
            }
            current = self.nodes.get(k).and_then(|node| node.parent);
        }
        false
    }

    fn record_of(&self, key: NodeKey) -> Option<ElementRecord> {
        let node = self.nodes.get(key)?;
        let mut record = node.to_record();
        record.children = node
            .children
            .iter()
            .filter_map(|child| self.record_of(*child))
            .collect();
        Some(record)
    }

    fn topmost_in(&self, key: NodeKey, point: Point) -> Option<NodeKey> {
        let node = self.nodes.get(key)?;
        for &child in node.children.iter().rev() {
            let Some(child_node) = self.nodes.get(child) else {
                continue;
            };
            if !child_node.visible() {
                continue;
            }
            if let Some(hit) = self.topmost_in(child, point) {
                return Some(hit);
            }
            if self.hit_test_key(child, point) {
                return Some(child);
            }
        }
        None
    }

    fn collect_in_box(&self, key: NodeKey, query: &BoundingBox, out: &mut Vec<String>) {
        let Some(node) = self.nodes.get(key) else {
            return;
        };
        for &child in &node.children {
            let Some(child_node) = self.nodes.get(child) else {
                continue;
            };
            if !child_node.visible() {
                continue;
            }
            if self.intersects_with_key(child, query) {
                out.push(child_node.id().to_string());
            }
            self.collect_in_box(child, query, out);
        }
    }
}

/// Rejects the reserved root id, ids repeated in `records`, and ids for
/// which `taken` returns true.
fn check_ids<'a, F>(
    records: &'a [ElementRecord],
    seen: &mut HashSet<&'a str>,
    taken: F,
) -> Result<(), SceneError>
where
    F: Fn(&str) -> bool + Copy,
{
    for record in records {
        let id = record.id.as_str();
        if id == ROOT_NODE_ID || taken(id) || !seen.insert(id) {
            return Err(SceneError::DuplicateId { id: id.to_string() });
        }
        check_ids(&record.children, seen, taken)?;
    }
    Ok(())
}
