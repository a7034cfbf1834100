//! Offset engine: push every quad outward by the rounding radius.
//!
//! Each control point moves along the normal of a nearby chord of its
//! quad, which approximates the true offset curve closely enough for
//! glyph-sized outlines.

use povround_math::{Point2, Tolerance, Vec2};

use crate::error::{Result, RoundingError};
use crate::quad::Quad;

/// A quad whose control points have been displaced outward.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DisplacedQuad {
    /// Displaced control points, in the source quad's order.
    pub points: [Point2; 4],
    /// Distance the points were moved.
    pub radius: f64,
}

/// Move `pt` by `radius` along the normal of the chord `on -> right`.
///
/// The normal is the chord direction rotated so that a counter-clockwise
/// (positive-area) outline grows. Fails if `on` and `right` coincide.
pub fn displace_point(pt: &Point2, on: &Point2, right: &Point2, radius: f64) -> Result<Point2> {
    let length = (right - on).norm();
    if Tolerance::DEFAULT.is_zero(length) {
        return Err(RoundingError::DegenerateControlPoint { x: pt.x, y: pt.y });
    }
    let normal = Vec2::new(on.y - right.y, right.x - on.x) * (radius / length);
    Ok(pt - normal)
}

/// Displace all four control points of `quad` by `radius`.
///
/// - `p0` uses chord `p0 -> p1`
/// - `p1` uses chord `p0 -> p2`
/// - `p2` uses chord `p1 -> p3`
/// - `p3` uses chord `p2 -> p3`
pub fn displace_quad(quad: &Quad, radius: f64) -> Result<DisplacedQuad> {
    let [p0, p1, p2, p3] = quad.points;
    Ok(DisplacedQuad {
        points: [
            displace_point(&p0, &p0, &p1, radius)?,
            displace_point(&p1, &p0, &p2, radius)?,
            displace_point(&p2, &p1, &p3, radius)?,
            displace_point(&p3, &p2, &p3, radius)?,
        ],
        radius,
    })
}
