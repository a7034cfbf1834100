//! Quad normalization: every segment as four cubic control points.

use povround_math::{blend_points, Point2, Tolerance};

use crate::segment::{Curve, Segment};

/// A segment stored as the four control points of a cubic Bézier.
///
/// Straight segments are degenerate cubics whose inner points sit at 1/3
/// and 2/3 along the line.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Quad {
    /// Control points in order: start, first control, second control, end.
    pub points: [Point2; 4],
}

impl Quad {
    /// Create a quad from four control points.
    pub fn new(p0: Point2, p1: Point2, p2: Point2, p3: Point2) -> Self {
        Self {
            points: [p0, p1, p2, p3],
        }
    }

    /// Quad for the straight segment `from -> to`.
    pub fn line(from: Point2, to: Point2) -> Self {
        Self::new(
            from,
            blend_points(&from, &to, 1.0 / 3.0),
            blend_points(&from, &to, 2.0 / 3.0),
            to,
        )
    }

    /// First control point.
    pub fn start(&self) -> Point2 {
        self.points[0]
    }

    /// Last control point.
    pub fn end(&self) -> Point2 {
        self.points[3]
    }
}

/// Left-to-right fold of a curve's segments into quads.
#[derive(Debug, Clone)]
struct QuadAccumulator {
    last_point: Point2,
    quads: Vec<Quad>,
}

impl QuadAccumulator {
    fn new(start: Point2) -> Self {
        Self {
            last_point: start,
            quads: Vec::new(),
        }
    }

    fn push(mut self, segment: &Segment) -> Self {
        let quad = match *segment {
            Segment::Line(to) => {
                if Tolerance::DEFAULT.points_equal(&to, &self.last_point) {
                    return self;
                }
                Quad::line(self.last_point, to)
            }
            Segment::Cubic { c1, c2, end } => Quad::new(self.last_point, c1, c2, end),
        };
        self.last_point = quad.end();
        self.quads.push(quad);
        self
    }
}

/// Convert a curve into its cyclic sequence of quads.
///
/// A closed curve gets an extra straight quad back to its start point
/// unless it already ends there.
pub fn normalize_curve(curve: &Curve) -> Vec<Quad> {
    let closing = curve.closed.then_some(Segment::Line(curve.start));
    curve
        .segments
        .iter()
        .chain(closing.iter())
        .fold(QuadAccumulator::new(curve.start), QuadAccumulator::push)
        .quads
}

/// All control points of a sequence of quads, four per quad.
pub fn control_points(quads: &[Quad]) -> impl Iterator<Item = Point2> + '_ {
    quads.iter().flat_map(|q| q.points)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn square_curve() -> Curve {
        Curve {
            start: Point2::new(0.0, 0.0),
            segments: vec![
                Segment::Line(Point2::new(10.0, 0.0)),
                Segment::Line(Point2::new(10.0, 10.0)),
                Segment::Line(Point2::new(0.0, 10.0)),
            ],
            closed: true,
        }
    }

    #[test]
    fn test_line_quad_thirds() {
        let q = Quad::line(Point2::new(0.0, 0.0), Point2::new(9.0, 3.0));
        assert_relative_eq!(q.points[1].x, 3.0, epsilon = 1e-12);
        assert_relative_eq!(q.points[1].y, 1.0, epsilon = 1e-12);
        assert_relative_eq!(q.points[2].x, 6.0, epsilon = 1e-12);
        assert_relative_eq!(q.points[2].y, 2.0, epsilon = 1e-12);
    }

    #[test]
    fn test_square_gets_closing_quad() {
        let quads = normalize_curve(&square_curve());
        assert_eq!(quads.len(), 4);
        assert_eq!(quads[3].start(), Point2::new(0.0, 10.0));
        assert_eq!(quads[3].end(), Point2::new(0.0, 0.0));
        for i in 0..quads.len() {
            assert_eq!(quads[i].end(), quads[(i + 1) % quads.len()].start());
        }
    }

    #[test]
    fn test_explicit_closing_line_not_duplicated() {
        let mut curve = square_curve();
        curve.segments.push(Segment::Line(Point2::new(0.0, 0.0)));
        assert_eq!(normalize_curve(&curve).len(), 4);
    }

    #[test]
    fn test_cubic_keeps_its_points() {
        let curve = Curve {
            start: Point2::new(0.0, 0.0),
            segments: vec![Segment::Cubic {
                c1: Point2::new(0.0, 5.0),
                c2: Point2::new(5.0, 5.0),
                end: Point2::new(5.0, 0.0),
            }],
            closed: true,
        };
        let quads = normalize_curve(&curve);
        assert_eq!(quads.len(), 2);
        assert_eq!(quads[0].points[1], Point2::new(0.0, 5.0));
        assert_eq!(quads[0].points[2], Point2::new(5.0, 5.0));
        assert_eq!(quads[1], Quad::line(Point2::new(5.0, 0.0), Point2::new(0.0, 0.0)));
    }

    #[test]
    fn test_cubic_loop_needs_no_closing_quad() {
        let curve = Curve {
            start: Point2::new(0.0, 0.0),
            segments: vec![Segment::Cubic {
                c1: Point2::new(10.0, 10.0),
                c2: Point2::new(-10.0, 10.0),
                end: Point2::new(0.0, 0.0),
            }],
            closed: true,
        };
        assert_eq!(normalize_curve(&curve).len(), 1);
    }

    #[test]
    fn test_control_points() {
        let quads = normalize_curve(&square_curve());
        assert_eq!(control_points(&quads).count(), 16);
    }
}
