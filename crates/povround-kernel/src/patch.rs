//! Bicubic patch emission.
//!
//! Every quad and every fillet contributes a band of up to three patches
//! running along the extrusion: a front bevel from the flat face out to
//! the displaced wall, the straight side wall, and a back bevel returning
//! to the flat face at `z = -depth`.

use povround_math::{blend, blend_points, Point2, Point3};
use serde::Serialize;

use crate::fillet::Fillet;
use crate::offset::DisplacedQuad;
use crate::quad::Quad;
use crate::RoundingSettings;

/// Which part of the rounded solid a patch covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum PatchKind {
    /// Bevel between the front face and a quad's wall.
    FrontFillet,
    /// A quad's straight wall.
    Side,
    /// Bevel between a quad's wall and the back face.
    BackFillet,
    /// Bevel between the front face and a corner fillet.
    FrontCornerFillet,
    /// A corner fillet's wall.
    SideCornerFillet,
    /// Bevel between a corner fillet and the back face.
    BackCornerFillet,
}

impl PatchKind {
    /// Human-readable label written next to the patch.
    pub fn label(&self) -> &'static str {
        match self {
            PatchKind::FrontFillet => "Front fillet",
            PatchKind::Side => "Side",
            PatchKind::BackFillet => "Back fillet",
            PatchKind::FrontCornerFillet => "Front corner fillet",
            PatchKind::SideCornerFillet => "Side corner fillet",
            PatchKind::BackCornerFillet => "Back corner fillet",
        }
    }
}

/// A 4x4 grid of control points for one bicubic patch.
#[derive(Debug, Clone, PartialEq)]
pub struct Patch {
    /// What this patch covers.
    pub kind: PatchKind,
    /// Four rows of four control points.
    pub rows: [[Point3; 4]; 4],
    /// Tessellation steps in each direction.
    pub smoothness: u32,
}

impl Patch {
    /// Label of this patch.
    pub fn label(&self) -> &'static str {
        self.kind.label()
    }
}

const QUAD_BAND: [PatchKind; 3] = [PatchKind::FrontFillet, PatchKind::Side, PatchKind::BackFillet];

const CORNER_BAND: [PatchKind; 3] = [
    PatchKind::FrontCornerFillet,
    PatchKind::SideCornerFillet,
    PatchKind::BackCornerFillet,
];

/// Emit the patches of one quad: flat outline points to displaced points.
pub fn emit_quad_patches(
    quad: &Quad,
    displaced: &DisplacedQuad,
    settings: &RoundingSettings,
    out: &mut Vec<Patch>,
) {
    emit_band(&quad.points, &displaced.points, QUAD_BAND, settings, out);
}

/// Emit the patches of one corner fillet, fanning out from the shared corner.
pub fn emit_fillet_patches(fillet: &Fillet, settings: &RoundingSettings, out: &mut Vec<Patch>) {
    emit_band(&[fillet.corner; 4], &fillet.points, CORNER_BAND, settings, out);
}

fn emit_band(
    inner: &[Point2; 4],
    outer: &[Point2; 4],
    kinds: [PatchKind; 3],
    settings: &RoundingSettings,
    out: &mut Vec<Patch>,
) {
    let r = settings.radius;
    let k = settings.factor;
    let depth = settings.depth;
    let [front, side, back] = kinds;

    let blended: [Point2; 4] = std::array::from_fn(|i| blend_points(&inner[i], &outer[i], k));

    if !settings.skip_front {
        out.push(patch(
            front,
            [
                row(inner, 0.0),
                row(&blended, 0.0),
                row(outer, -r * (1.0 - k)),
                row(outer, -r),
            ],
            settings,
        ));
    }

    out.push(patch(
        side,
        [
            row(outer, -r),
            row(outer, blend(-r, r - depth, 1.0 / 3.0)),
            row(outer, blend(-r, r - depth, 2.0 / 3.0)),
            row(outer, r - depth),
        ],
        settings,
    ));

    if !settings.skip_back {
        out.push(patch(
            back,
            [
                row(outer, r - depth),
                row(outer, blend(r - depth, -depth, k)),
                row(&blended, -depth),
                row(inner, -depth),
            ],
            settings,
        ));
    }
}

fn row(points: &[Point2; 4], z: f64) -> [Point3; 4] {
    points.map(|p| Point3::new(p.x, p.y, z))
}

fn patch(kind: PatchKind, rows: [[Point3; 4]; 4], settings: &RoundingSettings) -> Patch {
    Patch {
        kind,
        rows,
        smoothness: settings.smoothness,
    }
}
