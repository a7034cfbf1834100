//! The typed point stream every decoder produces.

use povround_math::{Point2, Tolerance, Transform2};

/// How a point participates in the outline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointKind {
    /// First point of a subpath.
    Start,
    /// End point of a straight segment.
    Line,
    /// One of the three points (two controls, one end) of a cubic segment.
    CubicControl,
    /// Marks the end of a subpath. Decoders place it on the subpath's start
    /// point; anywhere else it is also the subpath's last vertex.
    SubpathClose,
}

/// A point tagged with its role in the outline.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TypedPoint {
    /// Location in the outline plane.
    pub location: Point2,
    /// Role of the point.
    pub kind: PointKind,
}

impl TypedPoint {
    /// Create a new typed point.
    pub fn new(x: f64, y: f64, kind: PointKind) -> Self {
        Self {
            location: Point2::new(x, y),
            kind,
        }
    }
}

/// Incremental builder for a typed point stream.
///
/// Every figure is closed: starting a new figure or finishing the path
/// closes the one in progress, so the produced stream always satisfies the
/// Start/SubpathClose pairing. A figure with no drawn segments produces no
/// points at all.
#[derive(Debug, Clone, Default)]
pub struct OutlinePath {
    points: Vec<TypedPoint>,
    current: Option<Point2>,
    figure_start: Option<Point2>,
}

impl OutlinePath {
    /// Create an empty path.
    pub fn new() -> Self {
        Self::default()
    }

    /// Begin a new figure at `p`, closing the current one.
    pub fn move_to(&mut self, p: Point2) {
        self.close();
        self.current = Some(p);
    }

    /// Straight segment from the current point to `p`.
    ///
    /// With no current point this behaves like [`move_to`](Self::move_to).
    pub fn line_to(&mut self, p: Point2) {
        if !self.begin_segment() {
            self.current = Some(p);
            return;
        }
        self.push(p, PointKind::Line);
    }

    /// Cubic segment from the current point through `c1`, `c2` to `p`.
    pub fn cubic_to(&mut self, c1: Point2, c2: Point2, p: Point2) {
        if !self.begin_segment() {
            self.current = Some(p);
            return;
        }
        self.push(c1, PointKind::CubicControl);
        self.push(c2, PointKind::CubicControl);
        self.push(p, PointKind::CubicControl);
    }

    /// Quadratic segment, stored as the equivalent cubic.
    pub fn quad_to(&mut self, c: Point2, p: Point2) {
        let Some(from) = self.current else {
            self.current = Some(p);
            return;
        };
        let c1 = from + (c - from) * (2.0 / 3.0);
        let c2 = p + (c - p) * (2.0 / 3.0);
        self.cubic_to(c1, c2, p);
    }

    /// Close the current figure, if one is open.
    ///
    /// The current point returns to the figure's start.
    pub fn close(&mut self) {
        if let Some(start) = self.figure_start.take() {
            self.push(start, PointKind::SubpathClose);
            self.current = Some(start);
        }
    }

    /// Map every emitted point through `transform`.
    pub fn transform(&mut self, transform: &Transform2) {
        for p in &mut self.points {
            p.location = transform.apply_point(&p.location);
        }
        self.current = self.current.map(|p| transform.apply_point(&p));
        self.figure_start = self.figure_start.map(|p| transform.apply_point(&p));
    }

    /// Close any open figure and return the point stream.
    pub fn finish(mut self) -> Vec<TypedPoint> {
        self.close();
        self.points
    }

    fn begin_segment(&mut self) -> bool {
        if self.figure_start.is_some() {
            return true;
        }
        match self.current {
            Some(start) => {
                self.figure_start = Some(start);
                self.push(start, PointKind::Start);
                true
            }
            None => false,
        }
    }

    fn push(&mut self, p: Point2, kind: PointKind) {
        self.points.push(TypedPoint { location: p, kind });
        if kind != PointKind::SubpathClose {
            self.current = Some(p);
        }
    }
}

/// Shoelace area of one `Start ... SubpathClose` figure, positive for
/// counter-clockwise winding in a y-up frame.
///
/// Cubic control points are taken as polygon vertices, which is enough to
/// tell the winding of a glyph contour.
pub(crate) fn signed_area(figure: &[TypedPoint]) -> f64 {
    let n = figure.len();
    if n < 3 {
        return 0.0;
    }
    let twice: f64 = (0..n)
        .map(|i| {
            let a = figure[i].location;
            let b = figure[(i + 1) % n].location;
            a.x * b.y - b.x * a.y
        })
        .sum();
    twice / 2.0
}

enum FigureSegment {
    Line(Point2),
    Cubic(Point2, Point2, Point2),
}

/// The same figure traversed in the opposite direction, from the same
/// start point.
pub(crate) fn reverse_figure(figure: &[TypedPoint]) -> Vec<TypedPoint> {
    let (Some(first), Some(last)) = (figure.first(), figure.last()) else {
        return Vec::new();
    };
    if first.kind != PointKind::Start || last.kind != PointKind::SubpathClose {
        return figure.to_vec();
    }

    let start = first.location;
    let mut segments = Vec::new();
    let mut rest = &figure[1..figure.len() - 1];
    loop {
        rest = match rest {
            [] => break,
            [c1, c2, end, tail @ ..]
                if c1.kind == PointKind::CubicControl
                    && c2.kind == PointKind::CubicControl
                    && end.kind == PointKind::CubicControl =>
            {
                segments.push(FigureSegment::Cubic(c1.location, c2.location, end.location));
                tail
            }
            [p, tail @ ..] => {
                segments.push(FigureSegment::Line(p.location));
                tail
            }
        };
    }

    // ends[k] is where segment k starts
    let mut ends = vec![start];
    ends.extend(segments.iter().map(|s| match s {
        FigureSegment::Line(p) | FigureSegment::Cubic(_, _, p) => *p,
    }));

    let mut out = vec![TypedPoint {
        location: start,
        kind: PointKind::Start,
    }];
    let tol = Tolerance::DEFAULT;
    if let Some(&end) = ends.last() {
        if !tol.points_equal(&end, &start) {
            out.push(TypedPoint {
                location: end,
                kind: PointKind::Line,
            });
        }
    }
    for (k, segment) in segments.iter().enumerate().rev() {
        let to = ends[k];
        match *segment {
            // The close marker already returns to the start.
            FigureSegment::Line(_) if k == 0 => {}
            FigureSegment::Line(_) => out.push(TypedPoint {
                location: to,
                kind: PointKind::Line,
            }),
            FigureSegment::Cubic(c1, c2, _) => {
                for location in [c2, c1, to] {
                    out.push(TypedPoint {
                        location,
                        kind: PointKind::CubicControl,
                    });
                }
            }
        }
    }
    out.push(TypedPoint {
        location: start,
        kind: PointKind::SubpathClose,
    });
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(points: &[TypedPoint]) -> Vec<PointKind> {
        points.iter().map(|p| p.kind).collect()
    }

    #[test]
    fn test_triangle_stream() {
        let mut path = OutlinePath::new();
        path.move_to(Point2::new(0.0, 0.0));
        path.line_to(Point2::new(10.0, 0.0));
        path.line_to(Point2::new(0.0, 10.0));
        let points = path.finish();
        assert_eq!(
            kinds(&points),
            vec![
                PointKind::Start,
                PointKind::Line,
                PointKind::Line,
                PointKind::SubpathClose
            ]
        );
        assert_eq!(points[3].location, Point2::new(0.0, 0.0));
    }

    #[test]
    fn test_move_without_segments_emits_nothing() {
        let mut path = OutlinePath::new();
        path.move_to(Point2::new(1.0, 1.0));
        path.move_to(Point2::new(2.0, 2.0));
        assert!(path.finish().is_empty());
    }

    #[test]
    fn test_move_closes_open_figure() {
        let mut path = OutlinePath::new();
        path.move_to(Point2::new(0.0, 0.0));
        path.line_to(Point2::new(1.0, 0.0));
        path.move_to(Point2::new(5.0, 5.0));
        path.line_to(Point2::new(6.0, 5.0));
        let points = path.finish();
        assert_eq!(
            kinds(&points),
            vec![
                PointKind::Start,
                PointKind::Line,
                PointKind::SubpathClose,
                PointKind::Start,
                PointKind::Line,
                PointKind::SubpathClose
            ]
        );
    }

    #[test]
    fn test_line_after_close_restarts_at_start() {
        let mut path = OutlinePath::new();
        path.move_to(Point2::new(0.0, 0.0));
        path.line_to(Point2::new(1.0, 0.0));
        path.close();
        path.line_to(Point2::new(0.0, 1.0));
        let points = path.finish();
        assert_eq!(points[3].kind, PointKind::Start);
        assert_eq!(points[3].location, Point2::new(0.0, 0.0));
    }

    #[test]
    fn test_quad_elevated_to_cubic() {
        let mut path = OutlinePath::new();
        path.move_to(Point2::new(0.0, 0.0));
        path.quad_to(Point2::new(3.0, 3.0), Point2::new(6.0, 0.0));
        let points = path.finish();
        assert_eq!(points.len(), 5);
        assert!((points[1].location - Point2::new(2.0, 2.0)).norm() < 1e-12);
        assert!((points[2].location - Point2::new(4.0, 2.0)).norm() < 1e-12);
        assert_eq!(points[3].location, Point2::new(6.0, 0.0));
    }

    #[test]
    fn test_transform_applies_to_all_points() {
        let mut path = OutlinePath::new();
        path.move_to(Point2::new(1.0, 1.0));
        path.line_to(Point2::new(2.0, 1.0));
        path.transform(&Transform2::translation(10.0, 0.0));
        let points = path.finish();
        assert_eq!(points[0].location, Point2::new(11.0, 1.0));
        assert_eq!(points[2].location, Point2::new(11.0, 1.0));
    }

    #[test]
    fn test_signed_area_follows_winding() {
        let mut path = OutlinePath::new();
        path.move_to(Point2::new(0.0, 0.0));
        path.line_to(Point2::new(4.0, 0.0));
        path.line_to(Point2::new(4.0, 2.0));
        path.line_to(Point2::new(0.0, 2.0));
        let points = path.finish();
        assert!((signed_area(&points) - 8.0).abs() < 1e-12);
        assert!((signed_area(&reverse_figure(&points)) + 8.0).abs() < 1e-12);
    }

    #[test]
    fn test_reverse_lines() {
        let mut path = OutlinePath::new();
        path.move_to(Point2::new(0.0, 0.0));
        path.line_to(Point2::new(4.0, 0.0));
        path.line_to(Point2::new(4.0, 2.0));
        path.line_to(Point2::new(0.0, 2.0));
        let reversed = reverse_figure(&path.finish());
        let locations: Vec<Point2> = reversed.iter().map(|p| p.location).collect();
        assert_eq!(
            locations,
            vec![
                Point2::new(0.0, 0.0),
                Point2::new(0.0, 2.0),
                Point2::new(4.0, 2.0),
                Point2::new(4.0, 0.0),
                Point2::new(0.0, 0.0),
            ]
        );
        assert_eq!(
            kinds(&reversed),
            vec![
                PointKind::Start,
                PointKind::Line,
                PointKind::Line,
                PointKind::Line,
                PointKind::SubpathClose
            ]
        );
    }

    #[test]
    fn test_reverse_cubic_swaps_controls() {
        let mut path = OutlinePath::new();
        path.move_to(Point2::new(0.0, 0.0));
        path.line_to(Point2::new(6.0, 0.0));
        path.cubic_to(
            Point2::new(6.0, 2.0),
            Point2::new(4.0, 4.0),
            Point2::new(0.0, 4.0),
        );
        let reversed = reverse_figure(&path.finish());
        assert_eq!(reversed[0].location, Point2::new(0.0, 0.0));
        assert_eq!(reversed[1].location, Point2::new(0.0, 4.0));
        assert_eq!(reversed[1].kind, PointKind::Line);
        assert_eq!(reversed[2].location, Point2::new(4.0, 4.0));
        assert_eq!(reversed[3].location, Point2::new(6.0, 2.0));
        assert_eq!(reversed[4].location, Point2::new(6.0, 0.0));
        assert_eq!(reversed[4].kind, PointKind::CubicControl);
        assert_eq!(reversed[5].kind, PointKind::SubpathClose);
        assert_eq!(reversed.len(), 6);
    }
}
