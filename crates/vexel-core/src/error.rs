//! Error handling for Vexel
//!
//! Provides error types for the layers of the editor core:
//! - Scene errors (structural tree mutations)
//! - Viewport errors (invalid zoom limits or coordinates)
//! - Render errors (backend surface and paint resources)
//!
//! Geometry and hit testing never fail; they degrade to `false`/`None`.
//! All error types use `thiserror` for ergonomic error handling.

use thiserror::Error;

/// Scene graph error type
///
/// Raised by structural operations on the scene tree. Lookups of unknown ids
/// are not errors and return `None` instead.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SceneError {
    /// A node with this id already exists in the tree
    #[error("Duplicate node id: {id}")]
    DuplicateId {
        /// The conflicting id.
        id: String,
    },

    /// The referenced node is not part of the tree
    #[error("Unknown node: {id}")]
    UnknownNode {
        /// The id that could not be resolved.
        id: String,
    },

    /// The node exists but is not a child of the given parent
    #[error("{child} is not a child of {parent}")]
    NotAChild {
        /// The parent that was searched.
        parent: String,
        /// The node that was not found among its children.
        child: String,
    },

    /// Appending would make a node its own ancestor
    #[error("Appending {child} to {parent} would create a cycle")]
    CycleDetected {
        /// The prospective parent.
        parent: String,
        /// The node being appended.
        child: String,
    },

    /// The root node cannot be moved, removed or re-parented
    #[error("The scene root cannot be {operation}")]
    RootMutation {
        /// The rejected operation.
        operation: String,
    },
}

/// Viewport error type
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ViewportError {
    /// Scale limits are not a valid positive range
    #[error("Invalid scale limits: min {min}, max {max}")]
    InvalidScaleLimits {
        /// Requested lower bound.
        min: f64,
        /// Requested upper bound.
        max: f64,
    },

    /// A coordinate or size was NaN or infinite
    #[error("Non-finite viewport value for {field}")]
    NonFiniteValue {
        /// The offending field.
        field: String,
    },
}

/// Render backend error type
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RenderError {
    /// The backend could not create a drawing surface
    #[error("Render surface unavailable: {reason}")]
    SurfaceUnavailable {
        /// Backend-provided reason.
        reason: String,
    },

    /// Surface dimensions are zero or too large
    #[error("Invalid surface size {width}x{height}")]
    InvalidSize {
        /// Requested width in pixels.
        width: u32,
        /// Requested height in pixels.
        height: u32,
    },

    /// A paint resource could not be created
    #[error("Paint unavailable: {reason}")]
    PaintUnavailable {
        /// Backend-provided reason.
        reason: String,
    },

    /// The rendered surface could not be encoded
    #[error("Failed to encode surface: {reason}")]
    Encode {
        /// Encoder-provided reason.
        reason: String,
    },
}

/// Main error type for Vexel
///
/// A unified error type that can represent any error from all layers.
#[derive(Error, Debug)]
pub enum Error {
    /// Scene error
    #[error(transparent)]
    Scene(#[from] SceneError),

    /// Viewport error
    #[error(transparent)]
    Viewport(#[from] ViewportError),

    /// Render error
    #[error(transparent)]
    Render(#[from] RenderError),

    /// Element record (de)serialization error
    #[error("Element record error: {0}")]
    Json(#[from] serde_json::Error),

    /// Standard I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create an error from a string message
    pub fn other(msg: impl Into<String>) -> Self {
        Error::Other(msg.into())
    }

    /// Check if this is a scene error
    pub fn is_scene_error(&self) -> bool {
        matches!(self, Error::Scene(_))
    }

    /// Check if this is a render error
    pub fn is_render_error(&self) -> bool {
        matches!(self, Error::Render(_))
    }
}

/// Result type using Error
pub type Result<T> = std::result::Result<T, Error>;
