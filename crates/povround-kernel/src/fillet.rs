//! Corner fillets between consecutive displaced quads.
//!
//! At a convex junction the displaced quads leave a wedge-shaped gap.
//! The fillet spans it with a cubic whose control points are pulled
//! toward the intersection of the two displaced tangent lines.

use std::f64::consts::PI;

use povround_math::{blend_points, line_intersection, Point2, Tolerance};

use crate::error::{Result, RoundingError};
use crate::offset::DisplacedQuad;
use crate::quad::Quad;

/// Corner geometry bridging two displaced quads.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Fillet {
    /// Control points from the first quad's displaced end to the next quad's displaced start.
    pub points: [Point2; 4],
    /// The shared (un-displaced) corner point.
    pub corner: Point2,
}

/// Outcome of examining one junction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Junction {
    /// The outline turns toward its outside; a fillet fills the gap.
    Convex(Fillet),
    /// Straight continuation or inward turn; the bands meet directly.
    NonConvex {
        /// Turn angle in `[PI, 2*PI)`.
        turn: f64,
    },
    /// Convex by angle, but the displaced tangents never meet.
    Parallel,
}

impl Junction {
    /// The fillet, if one was synthesized.
    pub fn fillet(&self) -> Option<&Fillet> {
        match self {
            Junction::Convex(fillet) => Some(fillet),
            _ => None,
        }
    }
}

/// Turn angle at the junction `quad -> next`, normalized into `[0, 2*PI)`.
///
/// Compares the direction of `quad`'s end tangent with the reversed start
/// tangent of `next`; values below `PI` mean a convex corner.
pub fn turn_angle(quad: &Quad, next: &Quad) -> f64 {
    let [_, _, p2, p3] = quad.points;
    let [n0, n1, _, _] = next.points;
    let incoming = (p3.y - p2.y).atan2(p3.x - p2.x);
    let outgoing = (n0.y - n1.y).atan2(n0.x - n1.x);
    let mut turn = incoming - outgoing;
    if turn < 0.0 {
        turn += 2.0 * PI;
    }
    turn
}

/// Classify the junction `quad -> next` and build its fillet if convex.
///
/// `factor` pulls the fillet's inner control points from the displaced
/// endpoints toward the tangent intersection.
pub fn classify_junction(
    quad: &Quad,
    displaced: &DisplacedQuad,
    next: &Quad,
    next_displaced: &DisplacedQuad,
    factor: f64,
) -> Junction {
    let turn = turn_angle(quad, next);
    if turn >= PI {
        return Junction::NonConvex { turn };
    }

    let [_, _, d2, d3] = displaced.points;
    let [n0, n1, _, _] = next_displaced.points;
    let Some(hit) = line_intersection(&d2, &d3, &n1, &n0) else {
        return Junction::Parallel;
    };

    Junction::Convex(Fillet {
        points: [
            d3,
            blend_points(&d3, &hit, factor),
            blend_points(&n0, &hit, factor),
            n0,
        ],
        corner: next.start(),
    })
}

/// Classify every cyclic junction of one curve.
///
/// Entry `i` describes the junction between quad `i` and quad `i + 1`
/// (wrapping to quad 0). Fails with [`RoundingError::DiscontinuousCurve`]
/// if a quad does not end where its successor starts.
pub fn curve_junctions(
    curve: usize,
    quads: &[Quad],
    displaced: &[DisplacedQuad],
    factor: f64,
) -> Result<Vec<Junction>> {
    let tol = Tolerance::DEFAULT;
    let n = quads.len();
    let mut junctions = Vec::with_capacity(n);

    for i in 0..n {
        let j = (i + 1) % n;
        if !tol.points_equal(&quads[i].end(), &quads[j].start()) {
            return Err(RoundingError::DiscontinuousCurve { curve, quad: i });
        }
        junctions.push(classify_junction(
            &quads[i],
            &displaced[i],
            &quads[j],
            &displaced[j],
            factor,
        ));
    }

    Ok(junctions)
}
