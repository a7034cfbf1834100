#![warn(missing_docs)]

//! Rounded-bevel extrusion kernel for povround.
//!
//! Takes the typed point stream produced by `povround-outline` and turns it
//! into the bicubic patches of an extrusion whose front and back edges are
//! rounded:
//!
//! 1. [`segment_outline`] groups the stream into closed curves
//! 2. [`normalize_curve`] turns every segment into a four-point [`Quad`]
//! 3. [`displace_quad`] pushes each quad outward by the radius
//! 4. [`curve_junctions`] builds a [`Fillet`] at every convex corner
//! 5. the patch emitter writes front, side and back patches per quad and fillet
//!
//! # Example
//!
//! ```
//! use povround_kernel::{round_outline, RoundingSettings};
//! use povround_outline::decode_polygon;
//!
//! let points = decode_polygon("(0,0),(10,0),(10,10),(0,10)").unwrap();
//! let rounded = round_outline(&points, &RoundingSettings::default()).unwrap();
//!
//! assert_eq!(rounded.quad_count(), 4);
//! assert_eq!(rounded.patch_count(), 24);
//! ```

pub mod error;
pub mod fillet;
pub mod offset;
pub mod patch;
pub mod quad;
pub mod segment;

pub use error::{Result, RoundingError};
pub use fillet::{classify_junction, curve_junctions, turn_angle, Fillet, Junction};
pub use offset::{displace_point, displace_quad, DisplacedQuad};
pub use patch::{emit_fillet_patches, emit_quad_patches, Patch, PatchKind};
pub use quad::{control_points, normalize_curve, Quad};
pub use segment::{segment_outline, Curve, Segment};

use povround_math::Point2;
use povround_outline::TypedPoint;
use serde::{Deserialize, Serialize};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Rounding parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RoundingSettings {
    /// Extrusion depth along the sweep axis.
    pub depth: f64,
    /// Rounding radius of the front and back edges.
    pub radius: f64,
    /// Blend factor pulling bevel control points toward the corner (0 to 1).
    pub factor: f64,
    /// Tessellation steps per patch direction.
    pub smoothness: u32,
    /// Omit the front bevel and front corner patches.
    pub skip_front: bool,
    /// Omit the back bevel and back corner patches.
    pub skip_back: bool,
    /// Raw scene text appended to the prism and every patch.
    pub extra_code: Option<String>,
}

impl Default for RoundingSettings {
    fn default() -> Self {
        Self {
            depth: 6.0,
            radius: 1.0,
            factor: 0.76,
            smoothness: 4,
            skip_front: false,
            skip_back: false,
            extra_code: None,
        }
    }
}

impl RoundingSettings {
    /// Validate settings.
    ///
    /// Values that are legal but produce odd geometry are only logged.
    pub fn validate(&self) -> Result<()> {
        if !self.depth.is_finite() || !self.radius.is_finite() || !self.factor.is_finite() {
            return Err(RoundingError::InvalidSettings(
                "depth, radius and factor must be finite".into(),
            ));
        }
        if self.depth <= 0.0 {
            return Err(RoundingError::InvalidSettings(
                "depth must be positive".into(),
            ));
        }
        if self.radius < 0.0 {
            return Err(RoundingError::InvalidSettings(
                "radius must not be negative".into(),
            ));
        }
        if self.smoothness == 0 {
            return Err(RoundingError::InvalidSettings(
                "smoothness must be at least 1".into(),
            ));
        }
        if self.factor <= 0.0 || self.factor >= 1.0 {
            log::warn!("rounding factor {} is outside (0, 1)", self.factor);
        }
        if self.depth < 2.0 * self.radius {
            log::warn!(
                "depth {} is less than twice the radius {}; front and back bevels overlap",
                self.depth,
                self.radius
            );
        }
        Ok(())
    }
}

/// Everything computed for one curve of the outline.
#[derive(Debug, Clone)]
pub struct CurveRounding {
    /// Quads of the curve, in cyclic order.
    pub quads: Vec<Quad>,
    /// Displaced copy of each quad.
    pub displaced: Vec<DisplacedQuad>,
    /// Junction `i` sits between quad `i` and quad `i + 1` (wrapping).
    pub junctions: Vec<Junction>,
    /// Emitted patches, in output order.
    pub patches: Vec<Patch>,
}

impl CurveRounding {
    /// Number of junctions that received a fillet.
    pub fn convex_count(&self) -> usize {
        self.junctions.iter().filter(|j| j.fillet().is_some()).count()
    }
}

/// A fully rounded outline.
#[derive(Debug, Clone)]
pub struct RoundedOutline {
    /// Per-curve results, in outline order.
    pub curves: Vec<CurveRounding>,
}

impl RoundedOutline {
    /// All patches, curve by curve.
    pub fn patches(&self) -> impl Iterator<Item = &Patch> {
        self.curves.iter().flat_map(|c| c.patches.iter())
    }

    /// The un-rounded outline's control points, four per quad.
    pub fn prism_points(&self) -> Vec<Point2> {
        self.curves
            .iter()
            .flat_map(|c| control_points(&c.quads))
            .collect()
    }

    /// Total number of quads.
    pub fn quad_count(&self) -> usize {
        self.curves.iter().map(|c| c.quads.len()).sum()
    }

    /// Total number of patches.
    pub fn patch_count(&self) -> usize {
        self.curves.iter().map(|c| c.patches.len()).sum()
    }

    /// Counts describing this outline.
    pub fn summary(&self) -> OutlineSummary {
        let mut summary = OutlineSummary {
            curves: self.curves.len(),
            quads: self.quad_count(),
            patches: self.patch_count(),
            prism_points: 4 * self.quad_count(),
            ..Default::default()
        };
        for junction in self.curves.iter().flat_map(|c| c.junctions.iter()) {
            match junction {
                Junction::Convex(_) => summary.convex_junctions += 1,
                Junction::NonConvex { .. } => summary.non_convex_junctions += 1,
                Junction::Parallel => summary.parallel_junctions += 1,
            }
        }
        summary
    }
}

/// Counts reported by `povround inspect`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct OutlineSummary {
    /// Closed curves in the outline.
    pub curves: usize,
    /// Quads across all curves.
    pub quads: usize,
    /// Junctions that received a fillet.
    pub convex_junctions: usize,
    /// Straight or inward junctions.
    pub non_convex_junctions: usize,
    /// Convex junctions whose displaced tangents never meet.
    pub parallel_junctions: usize,
    /// Emitted patches.
    pub patches: usize,
    /// Points in the prism statement.
    pub prism_points: usize,
}

/// Round one curve: normalize, displace, classify junctions and emit patches.
pub fn round_curve(
    index: usize,
    curve: &Curve,
    settings: &RoundingSettings,
) -> Result<CurveRounding> {
    let quads = normalize_curve(curve);
    let displaced = quads
        .iter()
        .map(|q| displace_quad(q, settings.radius))
        .collect::<Result<Vec<_>>>()?;
    let junctions = curve_junctions(index, &quads, &displaced, settings.factor)?;

    let mut patches = Vec::with_capacity(quads.len() * 6);
    for ((quad, moved), junction) in quads.iter().zip(&displaced).zip(&junctions) {
        emit_quad_patches(quad, moved, settings, &mut patches);
        if let Some(fillet) = junction.fillet() {
            emit_fillet_patches(fillet, settings, &mut patches);
        }
    }

    let rounding = CurveRounding {
        quads,
        displaced,
        junctions,
        patches,
    };
    log::debug!(
        "curve {}: {} quads, {} fillets, {} patches",
        index,
        rounding.quads.len(),
        rounding.convex_count(),
        rounding.patches.len()
    );
    Ok(rounding)
}

/// Round a whole outline.
///
/// Fails on the first malformed, discontinuous or degenerate curve; no
/// partial result is returned.
pub fn round_outline(points: &[TypedPoint], settings: &RoundingSettings) -> Result<RoundedOutline> {
    settings.validate()?;
    let curves = segment_outline(points)?;

    #[cfg(feature = "parallel")]
    let curves = curves
        .par_iter()
        .enumerate()
        .map(|(i, c)| round_curve(i, c, settings))
        .collect::<Result<Vec<_>>>()?;

    #[cfg(not(feature = "parallel"))]
    let curves = curves
        .iter()
        .enumerate()
        .map(|(i, c)| round_curve(i, c, settings))
        .collect::<Result<Vec<_>>>()?;

    let rounded = RoundedOutline { curves };
    if rounded.quad_count() == 0 {
        log::warn!("outline has no segments; only an empty prism will be produced");
    }
    Ok(rounded)
}

#[cfg(test)]
mod tests {
    use super::*;
    use povround_outline::{decode_polygon, PointKind};

    fn square() -> Vec<TypedPoint> {
        decode_polygon("(0,0),(10,0),(10,10),(0,10)").unwrap()
    }

    #[test]
    fn test_default_settings() {
        let s = RoundingSettings::default();
        assert_eq!(s.depth, 6.0);
        assert_eq!(s.radius, 1.0);
        assert_eq!(s.factor, 0.76);
        assert_eq!(s.smoothness, 4);
        assert!(s.validate().is_ok());
    }

    #[test]
    fn test_invalid_settings() {
        let bad = [
            RoundingSettings {
                depth: 0.0,
                ..Default::default()
            },
            RoundingSettings {
                radius: -1.0,
                ..Default::default()
            },
            RoundingSettings {
                smoothness: 0,
                ..Default::default()
            },
            RoundingSettings {
                factor: f64::NAN,
                ..Default::default()
            },
        ];
        for settings in &bad {
            assert!(matches!(
                settings.validate(),
                Err(RoundingError::InvalidSettings(_))
            ));
        }
    }

    #[test]
    fn test_factor_outside_unit_interval_is_allowed() {
        let s = RoundingSettings {
            factor: 1.5,
            ..Default::default()
        };
        assert!(s.validate().is_ok());
    }

    #[test]
    fn test_square_pipeline() {
        let rounded = round_outline(&square(), &RoundingSettings::default()).unwrap();
        let summary = rounded.summary();
        assert_eq!(summary.curves, 1);
        assert_eq!(summary.quads, 4);
        assert_eq!(summary.convex_junctions, 4);
        assert_eq!(summary.non_convex_junctions, 0);
        assert_eq!(summary.patches, 24);
        assert_eq!(summary.prism_points, 16);
        assert_eq!(rounded.prism_points().len(), 16);
    }

    #[test]
    fn test_patch_order_interleaves_corners() {
        let rounded = round_outline(&square(), &RoundingSettings::default()).unwrap();
        let labels: Vec<&str> = rounded.patches().take(6).map(Patch::label).collect();
        assert_eq!(
            labels,
            vec![
                "Front fillet",
                "Side",
                "Back fillet",
                "Front corner fillet",
                "Side corner fillet",
                "Back corner fillet",
            ]
        );
    }

    #[test]
    fn test_skip_both_ends() {
        let settings = RoundingSettings {
            skip_front: true,
            skip_back: true,
            ..Default::default()
        };
        let rounded = round_outline(&square(), &settings).unwrap();
        assert_eq!(rounded.patch_count(), 8);
        assert!(rounded
            .patches()
            .all(|p| matches!(p.kind, PatchKind::Side | PatchKind::SideCornerFillet)));
    }

    #[test]
    fn test_concave_corner_gets_no_fillet() {
        // L shape: one reflex corner at (5,5).
        let points = decode_polygon("(0,0),(10,0),(10,5),(5,5),(5,10),(0,10)").unwrap();
        let rounded = round_outline(&points, &RoundingSettings::default()).unwrap();
        let summary = rounded.summary();
        assert_eq!(summary.quads, 6);
        assert_eq!(summary.convex_junctions, 5);
        assert_eq!(summary.non_convex_junctions, 1);
        assert_eq!(summary.patches, 6 * 3 + 5 * 3);
    }

    #[test]
    fn test_two_curves_keep_order() {
        let mut points = square();
        points.extend(decode_polygon("(20,0),(30,0),(30,10)").unwrap());
        let rounded = round_outline(&points, &RoundingSettings::default()).unwrap();
        assert_eq!(rounded.curves.len(), 2);
        assert_eq!(rounded.curves[0].quads.len(), 4);
        assert_eq!(rounded.curves[1].quads.len(), 3);
        assert_eq!(rounded.curves[1].quads[0].start(), Point2::new(20.0, 0.0));
    }

    #[test]
    fn test_close_point_keeps_fourth_corner() {
        let points = vec![
            TypedPoint::new(0.0, 0.0, PointKind::Start),
            TypedPoint::new(10.0, 0.0, PointKind::Line),
            TypedPoint::new(10.0, 10.0, PointKind::Line),
            TypedPoint::new(0.0, 10.0, PointKind::SubpathClose),
        ];
        let rounded = round_outline(&points, &RoundingSettings::default()).unwrap();
        let summary = rounded.summary();
        assert_eq!(summary.quads, 4);
        assert_eq!(summary.convex_junctions, 4);
        assert_eq!(summary.patches, 24);
    }

    #[test]
    fn test_degenerate_cubic_fails() {
        let points = vec![
            TypedPoint::new(0.0, 0.0, PointKind::Start),
            TypedPoint::new(0.0, 0.0, PointKind::CubicControl),
            TypedPoint::new(5.0, 5.0, PointKind::CubicControl),
            TypedPoint::new(10.0, 0.0, PointKind::CubicControl),
            TypedPoint::new(0.0, 0.0, PointKind::SubpathClose),
        ];
        let err = round_outline(&points, &RoundingSettings::default()).unwrap_err();
        assert!(matches!(err, RoundingError::DegenerateControlPoint { .. }));
    }
}
