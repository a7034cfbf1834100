#![warn(missing_docs)]

//! Math types for the povround rounding engine.
//!
//! Thin wrappers around nalgebra providing the planar types the outline
//! decoders and the rounding kernel share: points, vectors, the 2D affine
//! transform used by SVG `matrix(...)` attributes, tolerance constants and
//! the two small helpers every stage needs (linear blending and line
//! intersection).

use nalgebra::{Matrix3, Vector2, Vector3};

/// A point in the outline plane.
pub type Point2 = nalgebra::Point2<f64>;

/// A vector in the outline plane.
pub type Vec2 = Vector2<f64>;

/// A point in 3D scene space.
pub type Point3 = nalgebra::Point3<f64>;

/// A 3x3 homogeneous matrix describing a 2D affine transformation.
#[derive(Debug, Clone, PartialEq)]
pub struct Transform2 {
    /// The underlying homogeneous matrix.
    pub matrix: Matrix3<f64>,
}

impl Transform2 {
    /// Identity transform.
    pub fn identity() -> Self {
        Self {
            matrix: Matrix3::identity(),
        }
    }

    /// Build a transform from the six coefficients of an SVG `matrix(a,b,c,d,e,f)`.
    ///
    /// A point maps to `(a*x + c*y + e, b*x + d*y + f)`.
    pub fn from_svg_matrix(a: f64, b: f64, c: f64, d: f64, e: f64, f: f64) -> Self {
        Self {
            matrix: Matrix3::new(a, c, e, b, d, f, 0.0, 0.0, 1.0),
        }
    }

    /// Translation by `(dx, dy)`.
    pub fn translation(dx: f64, dy: f64) -> Self {
        let mut m = Matrix3::identity();
        m[(0, 2)] = dx;
        m[(1, 2)] = dy;
        Self { matrix: m }
    }

    /// Non-uniform scale by `(sx, sy)`.
    pub fn scale(sx: f64, sy: f64) -> Self {
        let mut m = Matrix3::identity();
        m[(0, 0)] = sx;
        m[(1, 1)] = sy;
        Self { matrix: m }
    }

    /// Horizontal shear: `x' = x + k*y`.
    pub fn shear_x(k: f64) -> Self {
        let mut m = Matrix3::identity();
        m[(0, 1)] = k;
        Self { matrix: m }
    }

    /// Compose: `self` then `other` (self * other).
    ///
    /// The resulting transform applies `other` first.
    pub fn then(&self, other: &Transform2) -> Self {
        Self {
            matrix: self.matrix * other.matrix,
        }
    }

    /// Transform a point.
    pub fn apply_point(&self, p: &Point2) -> Point2 {
        let v = self.matrix * Vector3::new(p.x, p.y, 1.0);
        Point2::new(v.x, v.y)
    }

    /// Check whether this is exactly the identity.
    pub fn is_identity(&self) -> bool {
        self.matrix == Matrix3::identity()
    }
}

impl Default for Transform2 {
    fn default() -> Self {
        Self::identity()
    }
}

/// Tolerance constants for geometric comparisons.
#[derive(Debug, Clone, Copy)]
pub struct Tolerance {
    /// Linear distance tolerance in outline units.
    pub linear: f64,
}

impl Tolerance {
    /// Default tolerance (1e-9 outline units).
    pub const DEFAULT: Self = Self { linear: 1e-9 };

    /// Check if two points are coincident within tolerance.
    pub fn points_equal(&self, a: &Point2, b: &Point2) -> bool {
        (a - b).norm() < self.linear
    }

    /// Check if a scalar is effectively zero.
    pub fn is_zero(&self, d: f64) -> bool {
        d.abs() < self.linear
    }
}

impl Default for Tolerance {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Linear blend `one*(1-t) + two*t` of two scalars.
pub fn blend(one: f64, two: f64, t: f64) -> f64 {
    one * (1.0 - t) + two * t
}

/// Component-wise linear blend of two points.
pub fn blend_points(one: &Point2, two: &Point2, t: f64) -> Point2 {
    Point2::new(blend(one.x, two.x, t), blend(one.y, two.y, t))
}

/// Intersect the infinite line through `(f1, t1)` with the line through `(f2, t2)`.
///
/// Uses the 2x2 determinant form. Returns `None` when the lines are parallel
/// (zero determinant).
pub fn line_intersection(f1: &Point2, t1: &Point2, f2: &Point2, t2: &Point2) -> Option<Point2> {
    let det = (f1.x - t1.x) * (f2.y - t2.y) - (f1.y - t1.y) * (f2.x - t2.x);
    if det == 0.0 {
        return None;
    }
    let a = f1.x * t1.y - f1.y * t1.x;
    let b = f2.x * t2.y - f2.y * t2.x;
    Some(Point2::new(
        (a * (f2.x - t2.x) - (f1.x - t1.x) * b) / det,
        (a * (f2.y - t2.y) - (f1.y - t1.y) * b) / det,
    ))
}
