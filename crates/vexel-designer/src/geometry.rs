//! Affine geometry kernel.
//!
//! Matrices use the 6-element `[a, b, c, d, e, f]` layout:
//!
//! ```text
//! x' = a·x + c·y + e
//! y' = b·x + d·y + f
//! ```
//!
//! Algebra is delegated to euclid's `Transform2D` (re-exported through
//! `lyon::geom`), whose `m11..m32` fields map one to one onto `a..f`.
//! Nothing in this module fails: degenerate input yields `None` or `false`.

use lyon::geom::euclid::default::{Point2D, Transform2D};
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use vexel_core::constants::AXIS_ALIGNED_EPSILON;

/// A 2D affine transform in `[a, b, c, d, e, f]` order.
pub type Matrix = [f64; 6];

/// The identity transform.
pub const IDENTITY: Matrix = [1.0, 0.0, 0.0, 1.0, 0.0, 0.0];

/// A point in world, local or screen space depending on context.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance_to(&self, other: &Point) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }
}

/// Axis-aligned rectangle `[x, y, width, height]`.
///
/// A box with zero area is considered inactive (used for the marquee).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct BoundingBox {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl BoundingBox {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Builds a box from two opposite corners given in any order.
    pub fn from_corners(a: Point, b: Point) -> Self {
        let min_x = a.x.min(b.x);
        let min_y = a.y.min(b.y);
        Self::new(min_x, min_y, (a.x - b.x).abs(), (a.y - b.y).abs())
    }

    pub fn min_x(&self) -> f64 {
        self.x
    }

    pub fn min_y(&self) -> f64 {
        self.y
    }

    pub fn max_x(&self) -> f64 {
        self.x + self.width
    }

    pub fn max_y(&self) -> f64 {
        self.y + self.height
    }

    pub fn center(&self) -> Point {
        Point::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// True when the box has no area.
    pub fn is_empty(&self) -> bool {
        self.width * self.height == 0.0
    }

    /// Inclusive point containment.
    pub fn contains_point(&self, point: &Point) -> bool {
        point.x >= self.min_x()
            && point.x <= self.max_x()
            && point.y >= self.min_y()
            && point.y <= self.max_y()
    }

    /// Strict overlap: boxes that only share an edge do not intersect.
    pub fn intersects(&self, other: &BoundingBox) -> bool {
        self.min_x() < other.max_x()
            && self.max_x() > other.min_x()
            && self.min_y() < other.max_y()
            && self.max_y() > other.min_y()
    }

    /// Grows the box by `amount` on every side.
    pub fn expand(&self, amount: f64) -> Self {
        Self::new(
            self.x - amount,
            self.y - amount,
            self.width + amount * 2.0,
            self.height + amount * 2.0,
        )
    }

    pub fn to_array(&self) -> [f64; 4] {
        [self.x, self.y, self.width, self.height]
    }

    /// The box as a translated rectangle for quad intersection tests.
    pub fn to_matrix_rect(&self) -> MatrixRect {
        MatrixRect::new(
            [1.0, 0.0, 0.0, 1.0, self.x, self.y],
            self.width,
            self.height,
        )
    }
}

/// A `width × height` rectangle placed by an affine matrix.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MatrixRect {
    pub matrix: Matrix,
    pub width: f64,
    pub height: f64,
}

impl MatrixRect {
    pub fn new(matrix: Matrix, width: f64, height: f64) -> Self {
        Self {
            matrix,
            width,
            height,
        }
    }

    /// True when the matrix carries no rotation or skew.
    pub fn is_axis_aligned(&self) -> bool {
        is_axis_aligned(&self.matrix)
    }

    /// Transformed corners in (0,0), (w,0), (w,h), (0,h) order.
    pub fn corners(&self) -> [Point; 4] {
        let m = &self.matrix;
        [
            apply_affine(m, Point::new(0.0, 0.0)),
            apply_affine(m, Point::new(self.width, 0.0)),
            apply_affine(m, Point::new(self.width, self.height)),
            apply_affine(m, Point::new(0.0, self.height)),
        ]
    }

    pub fn bounding_box(&self) -> BoundingBox {
        transformed_bounding_box(&self.matrix, self.width, self.height)
    }
}

/// Result of [`decompose_matrix`]. Rotation is in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Decomposed {
    pub x: f64,
    pub y: f64,
    pub scale_x: f64,
    pub scale_y: f64,
    pub rotation: f64,
}

pub(crate) fn to_transform(m: &Matrix) -> Transform2D<f64> {
    Transform2D::new(m[0], m[1], m[2], m[3], m[4], m[5])
}

pub(crate) fn from_transform(t: &Transform2D<f64>) -> Matrix {
    [t.m11, t.m12, t.m21, t.m22, t.m31, t.m32]
}

/// Translation matrix.
pub fn translation(dx: f64, dy: f64) -> Matrix {
    [1.0, 0.0, 0.0, 1.0, dx, dy]
}

/// Non-uniform scale about the origin.
pub fn scaling(sx: f64, sy: f64) -> Matrix {
    [sx, 0.0, 0.0, sy, 0.0, 0.0]
}

/// Rotation about the origin, `degrees` clockwise in a y-down space.
pub fn rotation(degrees: f64) -> Matrix {
    let (sin, cos) = degrees.to_radians().sin_cos();
    [cos, sin, -sin, cos, 0.0, 0.0]
}

/// Composes `parent ∘ local`: `local` is applied first.
pub fn compose_affine(parent: &Matrix, local: &Matrix) -> Matrix {
    from_transform(&to_transform(local).then(&to_transform(parent)))
}

/// Inverse transform, or `None` when the matrix is singular.
pub fn invert_affine(m: &Matrix) -> Option<Matrix> {
    let inverse = to_transform(m).inverse()?;
    let out = from_transform(&inverse);
    out.iter().all(|v| v.is_finite()).then_some(out)
}

pub fn apply_affine(m: &Matrix, point: Point) -> Point {
    let p = to_transform(m).transform_point(Point2D::new(point.x, point.y));
    Point::new(p.x, p.y)
}

pub fn is_axis_aligned(m: &Matrix) -> bool {
    m[1].abs() < AXIS_ALIGNED_EPSILON && m[2].abs() < AXIS_ALIGNED_EPSILON
}

/// Axis-aligned envelope of the four transformed corners of `[0, 0, width, height]`.
pub fn transformed_bounding_box(m: &Matrix, width: f64, height: f64) -> BoundingBox {
    let corners = MatrixRect::new(*m, width, height).corners();
    let mut min_x = f64::INFINITY;
    let mut min_y = f64::INFINITY;
    let mut max_x = f64::NEG_INFINITY;
    let mut max_y = f64::NEG_INFINITY;
    for p in &corners {
        min_x = min_x.min(p.x);
        min_y = min_y.min(p.y);
        max_x = max_x.max(p.x);
        max_y = max_y.max(p.y);
    }
    BoundingBox::new(min_x, min_y, max_x - min_x, max_y - min_y)
}

/// Smallest box enclosing every input box, `None` for no input.
pub fn merge_bounding_boxes<I>(boxes: I) -> Option<BoundingBox>
where
    I: IntoIterator<Item = BoundingBox>,
{
    let mut iter = boxes.into_iter();
    let first = iter.next()?;
    let (mut min_x, mut min_y, mut max_x, mut max_y) =
        (first.min_x(), first.min_y(), first.max_x(), first.max_y());
    for b in iter {
        min_x = min_x.min(b.min_x());
        min_y = min_y.min(b.min_y());
        max_x = max_x.max(b.max_x());
        max_y = max_y.max(b.max_y());
    }
    Some(BoundingBox::new(min_x, min_y, max_x - min_x, max_y - min_y))
}

/// Splits a matrix into translation, per-axis scale and rotation.
///
/// Shear is not recovered.
pub fn decompose_matrix(m: &Matrix) -> Decomposed {
    let [a, b, c, d, e, f] = *m;
    Decomposed {
        x: e,
        y: f,
        scale_x: a.hypot(b),
        scale_y: c.hypot(d),
        rotation: b.atan2(a).to_degrees(),
    }
}

/// True when the transformed quads of `a` and `b` overlap.
///
/// Quads that only share an edge or a corner do not overlap.
pub fn hit_matrix_node_test(a: &MatrixRect, b: &MatrixRect) -> bool {
    if a.is_axis_aligned() && b.is_axis_aligned() {
        axis_aligned_overlap(a, b)
    } else {
        separating_axis_overlap(a, b)
    }
}

/// Interval overlap of the two envelopes. Only exact for unrotated input.
pub fn axis_aligned_overlap(a: &MatrixRect, b: &MatrixRect) -> bool {
    a.bounding_box().intersects(&b.bounding_box())
}

/// Separating axis test over the edge normals of both quads.
pub fn separating_axis_overlap(a: &MatrixRect, b: &MatrixRect) -> bool {
    let quad_a = a.corners();
    let quad_b = b.corners();

    let mut axes: SmallVec<[Point; 8]> = SmallVec::new();
    for quad in [&quad_a, &quad_b] {
        for i in 0..quad.len() {
            let p1 = quad[i];
            let p2 = quad[(i + 1) % quad.len()];
            let normal = Point::new(p2.y - p1.y, p1.x - p2.x);
            // Collapsed edges of zero-sized rectangles give no axis
            if normal.x != 0.0 || normal.y != 0.0 {
                axes.push(normal);
            }
        }
    }

    if axes.is_empty() {
        return false;
    }

    axes.iter().all(|axis| {
        let (min1, max1) = project(&quad_a, axis);
        let (min2, max2) = project(&quad_b, axis);
        !(max1 <= min2 || max2 <= min1)
    })
}

fn project(quad: &[Point; 4], axis: &Point) -> (f64, f64) {
    quad.iter()
        .map(|p| p.x * axis.x + p.y * axis.y)
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
            (lo.min(v), hi.max(v))
        })
}
