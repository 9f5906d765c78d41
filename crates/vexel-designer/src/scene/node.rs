//! Scene node storage.
//!
//! A [`SceneNode`] holds the authoritative local state of one shape. Derived
//! geometry lives in a per-node [`CacheManager`] behind a `RefCell`, so the
//! tree can fill caches from `&self` accessors; everything that needs the
//! ancestor chain is resolved by [`SceneTree`](super::SceneTree).

use std::cell::RefCell;
use std::sync::Arc;

use lyon::math::{point, Box2D};
use lyon::path::{Path, Winding};

use super::element::{ElementRecord, FillPaint, NodeType};
use crate::cache::{CacheDependencies, CacheKey, CacheManager, Dependency};
use crate::geometry::{BoundingBox, Matrix};

slotmap::new_key_type! {
    /// Arena handle of a node inside its [`SceneTree`](super::SceneTree).
    pub struct NodeKey;
}

/// Values stored in a node's cache.
#[derive(Debug, Clone)]
pub(crate) enum CachedValue {
    Matrix(Matrix),
    Box(BoundingBox),
    Angle(f64),
    Path(Arc<Path>),
}

impl CachedValue {
    pub(crate) fn as_matrix(&self) -> Option<Matrix> {
        match self {
            CachedValue::Matrix(m) => Some(*m),
            _ => None,
        }
    }

    pub(crate) fn as_box(&self) -> Option<BoundingBox> {
        match self {
            CachedValue::Box(b) => Some(*b),
            _ => None,
        }
    }

    pub(crate) fn as_angle(&self) -> Option<f64> {
        match self {
            CachedValue::Angle(a) => Some(*a),
            _ => None,
        }
    }

    pub(crate) fn as_path(&self) -> Option<Arc<Path>> {
        match self {
            CachedValue::Path(p) => Some(Arc::clone(p)),
            _ => None,
        }
    }
}

/// One entity of the scene graph.
#[derive(Debug)]
pub struct SceneNode {
    id: String,
    node_type: NodeType,
    matrix: Matrix,
    width: f64,
    height: f64,
    visible: bool,
    fill_paints: Vec<FillPaint>,
    opacity: Option<f64>,
    pub(crate) parent: Option<NodeKey>,
    pub(crate) children: Vec<NodeKey>,
    cache: RefCell<CacheManager<CachedValue>>,
}

impl SceneNode {
    /// Creates a detached node from a record, ignoring its children.
    pub(crate) fn from_record(record: &ElementRecord) -> Self {
        Self {
            id: record.id.clone(),
            node_type: record.node_type,
            matrix: record.matrix,
            width: record.width,
            height: record.height,
            visible: record.visible,
            fill_paints: record.fill_paints.clone(),
            opacity: record.opacity,
            parent: None,
            children: Vec::new(),
            cache: RefCell::new(CacheManager::new(&CacheDependencies::NODE)),
        }
    }

    pub(crate) fn root(id: &str) -> Self {
        let mut record = ElementRecord::group(id, 0.0, 0.0, Vec::new());
        record.node_type = NodeType::Root;
        Self::from_record(&record)
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn node_type(&self) -> NodeType {
        self.node_type
    }

    /// Local matrix relative to the parent.
    pub fn matrix(&self) -> Matrix {
        self.matrix
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn height(&self) -> f64 {
        self.height
    }

    pub fn visible(&self) -> bool {
        self.visible
    }

    pub fn fill_paints(&self) -> &[FillPaint] {
        &self.fill_paints
    }

    /// Element opacity, `1.0` unless set.
    pub fn opacity(&self) -> f64 {
        self.opacity.unwrap_or(1.0)
    }

    pub fn parent(&self) -> Option<NodeKey> {
        self.parent
    }

    pub fn children(&self) -> &[NodeKey] {
        &self.children
    }

    /// Local rotation in degrees.
    pub fn rotation(&self) -> f64 {
        let matrix = self.matrix;
        self.cache
            .borrow_mut()
            .get(CacheKey::Rotation, |_| {
                CachedValue::Angle(matrix[1].atan2(matrix[0]).to_degrees())
            })
            .as_angle()
            .unwrap_or(0.0)
    }

    /// Outline in local coordinates, used for hover feedback.
    pub fn hover_path(&self) -> Arc<Path> {
        let (node_type, width, height) = (self.node_type, self.width, self.height);
        self.cache
            .borrow_mut()
            .get(CacheKey::HoverPath, |_| {
                CachedValue::Path(Arc::new(outline_path(node_type, width, height)))
            })
            .as_path()
            .unwrap_or_else(|| Arc::new(Path::new()))
    }

    /// Snapshot of local state without children.
    pub fn to_record(&self) -> ElementRecord {
        ElementRecord {
            id: self.id.clone(),
            node_type: self.node_type,
            matrix: self.matrix,
            width: self.width,
            height: self.height,
            visible: self.visible,
            fill_paints: self.fill_paints.clone(),
            children: Vec::new(),
            opacity: self.opacity,
        }
    }

    /// Fresh cached value, without computing.
    pub(crate) fn peek(&self, key: CacheKey) -> Option<CachedValue> {
        self.cache.borrow().peek(key)
    }

    /// Returns the cached value or stores `compute()`.
    ///
    /// `compute` must not touch this node's cache.
    pub(crate) fn cached<F>(&self, key: CacheKey, compute: F) -> CachedValue
    where
        F: FnOnce() -> CachedValue,
    {
        self.cache.borrow_mut().get(key, |_| compute())
    }

    pub(crate) fn invalidate(&mut self, dependency: Dependency) {
        self.cache.get_mut().mark_dirty(dependency);
    }

    pub(crate) fn is_cached(&self, key: CacheKey) -> bool {
        self.cache.borrow().is_cached(key)
    }

    pub(crate) fn set_matrix(&mut self, matrix: Matrix) {
        self.matrix = matrix;
        self.invalidate(Dependency::Matrix);
    }

    pub(crate) fn set_width(&mut self, width: f64) {
        self.width = width;
        self.invalidate(Dependency::Width);
    }

    pub(crate) fn set_height(&mut self, height: f64) {
        self.height = height;
        self.invalidate(Dependency::Height);
    }

    pub(crate) fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }

    pub(crate) fn set_fill_paints(&mut self, paints: Vec<FillPaint>) {
        self.fill_paints = paints;
    }

    pub(crate) fn set_opacity(&mut self, opacity: f64) {
        self.opacity = Some(opacity);
    }
}

/// Local-space outline of a shape. Empty for types that are never drawn.
pub(crate) fn outline_path(node_type: NodeType, width: f64, height: f64) -> Path {
    let mut builder = Path::builder();
    match node_type {
        NodeType::Rectangle => {
            builder.add_rectangle(
                &Box2D::new(point(0.0, 0.0), point(width as f32, height as f32)),
                Winding::Positive,
            );
        }
        NodeType::Circle => {
            let radius = width.min(height) / 2.0;
            builder.add_circle(
                point((width / 2.0) as f32, (height / 2.0) as f32),
                radius as f32,
                Winding::Positive,
            );
        }
        NodeType::Group | NodeType::Root | NodeType::Unknown => {}
    }
    builder.build()
}
