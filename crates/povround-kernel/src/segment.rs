//! Curve segmentation: typed point stream -> closed curves.
//!
//! A single left-to-right scan with an explicit state machine. Each
//! `Start ... SubpathClose` run becomes one [`Curve`]. The close point ends
//! the run; when it does not sit on the run's start it is also the end of
//! a last straight segment.

use povround_math::{Point2, Tolerance};
use povround_outline::{PointKind, TypedPoint};

use crate::error::{Result, RoundingError};

/// One piece of a curve, starting where the previous piece ended.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Segment {
    /// Straight segment to the given end point.
    Line(Point2),
    /// Cubic Bézier through two control points to an end point.
    Cubic {
        /// First control point.
        c1: Point2,
        /// Second control point.
        c2: Point2,
        /// End point.
        end: Point2,
    },
}

impl Segment {
    /// End point of this segment.
    pub fn end(&self) -> Point2 {
        match self {
            Segment::Line(end) => *end,
            Segment::Cubic { end, .. } => *end,
        }
    }
}

/// One closed run of the outline.
#[derive(Debug, Clone, PartialEq)]
pub struct Curve {
    /// First point of the run.
    pub start: Point2,
    /// Segments in order; each starts at the previous one's end.
    pub segments: Vec<Segment>,
    /// Whether the run was terminated by a close marker.
    pub closed: bool,
}

impl Curve {
    /// Point where the last segment ends.
    pub fn end(&self) -> Point2 {
        self.segments.last().map_or(self.start, Segment::end)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum ScanState {
    ExpectStart,
    InLine,
    InCubic(usize),
}

/// Group a typed point stream into closed curves.
///
/// Zero-length straight segments are dropped. Fails with
/// [`RoundingError::MalformedOutline`] when the stream is empty, does not
/// begin with `Start`, opens a subpath without closing the previous one,
/// interrupts a cubic, or ends inside a subpath.
pub fn segment_outline(points: &[TypedPoint]) -> Result<Vec<Curve>> {
    if points.is_empty() {
        return Err(RoundingError::malformed(0, "outline is empty"));
    }

    let tol = Tolerance::DEFAULT;
    let mut curves = Vec::new();
    let mut state = ScanState::ExpectStart;
    let mut current: Option<Curve> = None;
    let mut controls: [Point2; 2] = [Point2::origin(); 2];

    for (i, p) in points.iter().enumerate() {
        state = match (state, p.kind) {
            (ScanState::ExpectStart, PointKind::Start) => {
                current = Some(Curve {
                    start: p.location,
                    segments: Vec::new(),
                    closed: false,
                });
                ScanState::InLine
            }
            (ScanState::ExpectStart, kind) => {
                let message = if i == 0 {
                    "outline must begin with a Start point".to_string()
                } else {
                    format!("expected Start after a closed subpath, found {:?}", kind)
                };
                return Err(RoundingError::malformed(i, message));
            }
            (ScanState::InLine, PointKind::Line) => {
                if let Some(curve) = current.as_mut() {
                    if !tol.points_equal(&curve.end(), &p.location) {
                        curve.segments.push(Segment::Line(p.location));
                    }
                }
                ScanState::InLine
            }
            (ScanState::InLine, PointKind::CubicControl) => {
                controls[0] = p.location;
                ScanState::InCubic(1)
            }
            (ScanState::InCubic(1), PointKind::CubicControl) => {
                controls[1] = p.location;
                ScanState::InCubic(2)
            }
            (ScanState::InCubic(_), PointKind::CubicControl) => {
                if let Some(curve) = current.as_mut() {
                    curve.segments.push(Segment::Cubic {
                        c1: controls[0],
                        c2: controls[1],
                        end: p.location,
                    });
                }
                ScanState::InLine
            }
            (ScanState::InCubic(n), kind) => {
                return Err(RoundingError::malformed(
                    i,
                    format!("cubic segment interrupted by {:?} after {} of 3 points", kind, n),
                ));
            }
            (ScanState::InLine, PointKind::SubpathClose) => {
                if let Some(mut curve) = current.take() {
                    if !tol.points_equal(&curve.start, &p.location)
                        && !tol.points_equal(&curve.end(), &p.location)
                    {
                        curve.segments.push(Segment::Line(p.location));
                    }
                    curve.closed = true;
                    curves.push(curve);
                }
                ScanState::ExpectStart
            }
            (ScanState::InLine, PointKind::Start) => {
                return Err(RoundingError::malformed(
                    i,
                    "Start point inside an unclosed subpath",
                ));
            }
        };
    }

    if state != ScanState::ExpectStart {
        return Err(RoundingError::malformed(
            points.len(),
            "outline ends inside an unclosed subpath",
        ));
    }

    log::debug!("segmented {} points into {} curves", points.len(), curves.len());
    Ok(curves)
}
