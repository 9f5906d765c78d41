//! Flat element records used to build and inspect the scene.

use serde::{Deserialize, Serialize};

use crate::geometry::{Matrix, IDENTITY};

/// Shape type tag of a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum NodeType {
    Rectangle,
    Circle,
    Group,
    Root,
    /// Any tag this build does not recognise. Never hit, never drawn.
    #[serde(other)]
    Unknown,
}

impl std::fmt::Display for NodeType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NodeType::Rectangle => write!(f, "RECTANGLE"),
            NodeType::Circle => write!(f, "CIRCLE"),
            NodeType::Group => write!(f, "GROUP"),
            NodeType::Root => write!(f, "ROOT"),
            NodeType::Unknown => write!(f, "UNKNOWN"),
        }
    }
}

/// How a fill is composited onto what is already drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum BlendMode {
    #[default]
    Normal,
    Multiply,
    Screen,
}

/// RGBA colour with components in `0..=1`.
pub type Color = [f32; 4];

/// One solid fill layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FillPaint {
    pub color: Color,
    #[serde(default = "default_true")]
    pub visible: bool,
    #[serde(default)]
    pub blend_mode: BlendMode,
}

impl FillPaint {
    pub fn solid(color: Color) -> Self {
        Self {
            color,
            visible: true,
            blend_mode: BlendMode::Normal,
        }
    }
}

/// Interchange form of a node and, optionally, its subtree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ElementRecord {
    pub id: String,
    #[serde(rename = "type")]
    pub node_type: NodeType,
    #[serde(default = "identity")]
    pub matrix: Matrix,
    #[serde(default)]
    pub width: f64,
    #[serde(default)]
    pub height: f64,
    #[serde(default = "default_true")]
    pub visible: bool,
    #[serde(default)]
    pub fill_paints: Vec<FillPaint>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<ElementRecord>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub opacity: Option<f64>,
}

const DEFAULT_FILL: Color = [0.0, 0.0, 0.0, 1.0];

impl ElementRecord {
    /// A rectangle with its top-left corner at `(x, y)`.
    pub fn rectangle(
        id: impl Into<String>,
        x: f64,
        y: f64,
        width: f64,
        height: f64,
        color: Option<Color>,
    ) -> Self {
        Self::shape(id, NodeType::Rectangle, x, y, width, height, color)
    }

    /// A circle whose bounding square has its top-left corner at `(x, y)`.
    pub fn circle(id: impl Into<String>, x: f64, y: f64, radius: f64, color: Option<Color>) -> Self {
        Self::shape(
            id,
            NodeType::Circle,
            x,
            y,
            radius * 2.0,
            radius * 2.0,
            color,
        )
    }

    /// An empty group placed at `(x, y)`.
    pub fn group(id: impl Into<String>, x: f64, y: f64, children: Vec<ElementRecord>) -> Self {
        Self {
            id: id.into(),
            node_type: NodeType::Group,
            matrix: [1.0, 0.0, 0.0, 1.0, x, y],
            width: 0.0,
            height: 0.0,
            visible: true,
            fill_paints: Vec::new(),
            children,
            opacity: None,
        }
    }

    fn shape(
        id: impl Into<String>,
        node_type: NodeType,
        x: f64,
        y: f64,
        width: f64,
        height: f64,
        color: Option<Color>,
    ) -> Self {
        Self {
            id: id.into(),
            node_type,
            matrix: [1.0, 0.0, 0.0, 1.0, x, y],
            width,
            height,
            visible: true,
            fill_paints: vec![FillPaint::solid(color.unwrap_or(DEFAULT_FILL))],
            children: Vec::new(),
            opacity: Some(1.0),
        }
    }
}

fn default_true() -> bool {
    true
}

fn identity() -> Matrix {
    IDENTITY
}
