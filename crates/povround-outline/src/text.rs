//! Text outlines from TrueType/OpenType fonts.
//!
//! Glyphs are laid out one line per `\n`, each line centred horizontally
//! and the whole block centred vertically on the origin. Font units are
//! y-up and are flipped to y-down. TrueType and CFF outlines wind in
//! opposite directions, so each glyph is then turned until its largest
//! contour has positive area, the same as polygon and SVG input.

use std::path::Path;

use povround_math::{Point2, Transform2};
use ttf_parser::{Face, GlyphId, OutlineBuilder};

use crate::error::{OutlineError, Result};
use crate::path::{reverse_figure, signed_area, OutlinePath, PointKind, TypedPoint};

/// Slant applied when italics are requested but the font has no italic face.
const SYNTHETIC_OBLIQUE: f64 = 0.2;

/// Requested font style.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TextStyle {
    /// Use a bold face.
    pub bold: bool,
    /// Use an italic face.
    pub italic: bool,
}

/// Read a font file and decode `text` into a typed point stream.
pub fn decode_text_file(
    text: &str,
    font: impl AsRef<Path>,
    size: f64,
    style: TextStyle,
) -> Result<Vec<TypedPoint>> {
    let data = std::fs::read(font)?;
    decode_text(text, &data, size, style)
}

/// Decode `text` rendered in the font `data` at em size `size`.
pub fn decode_text(text: &str, data: &[u8], size: f64, style: TextStyle) -> Result<Vec<TypedPoint>> {
    let (face, oblique) = select_face(data, style)?;
    let scale = size / f64::from(face.units_per_em());
    let line_height = f64::from(face.height()) + f64::from(face.line_gap());

    let lines: Vec<&str> = text.split('\n').collect();
    let block_height = line_height * lines.len() as f64 * scale;
    let top = -block_height / 2.0;

    let mut points = Vec::new();
    for (row, line) in lines.iter().enumerate() {
        let glyphs: Vec<GlyphId> = line
            .chars()
            .map(|ch| {
                face.glyph_index(ch).unwrap_or_else(|| {
                    log::warn!("font has no glyph for {:?}", ch);
                    GlyphId(0)
                })
            })
            .collect();

        let width: f64 = glyphs
            .iter()
            .map(|&g| f64::from(face.glyph_hor_advance(g).unwrap_or(0)))
            .sum::<f64>()
            * scale;
        let baseline = top + (f64::from(face.ascender()) + row as f64 * line_height) * scale;
        let mut pen_x = -width / 2.0;

        for glyph in glyphs {
            // Font units -> y-down world units at the current pen position.
            let mut transform = Transform2::translation(pen_x, baseline)
                .then(&Transform2::scale(scale, -scale));
            if oblique {
                transform = transform.then(&Transform2::shear_x(SYNTHETIC_OBLIQUE));
            }

            let mut pen = GlyphPen {
                path: OutlinePath::new(),
                transform,
            };
            if face.outline_glyph(glyph, &mut pen).is_some() {
                points.extend(orient_glyph(pen.path.finish()));
            }
            pen_x += f64::from(face.glyph_hor_advance(glyph).unwrap_or(0)) * scale;
        }
    }

    if points.is_empty() {
        return Err(OutlineError::EmptyText);
    }
    log::debug!("text {:?} produced {} outline points", text, points.len());
    Ok(points)
}

/// Reverse every contour of a glyph whose largest contour winds negatively.
fn orient_glyph(points: Vec<TypedPoint>) -> Vec<TypedPoint> {
    let is_close = |p: &TypedPoint| p.kind == PointKind::SubpathClose;
    let outer = points
        .split_inclusive(is_close)
        .map(signed_area)
        .max_by(|a, b| a.abs().total_cmp(&b.abs()));
    match outer {
        Some(area) if area < 0.0 => points
            .split_inclusive(is_close)
            .flat_map(reverse_figure)
            .collect(),
        _ => points,
    }
}

/// Pick the face of a font (or font collection) that matches `style`.
///
/// Returns the face and whether italics must be synthesized.
fn select_face(data: &[u8], style: TextStyle) -> Result<(Face<'_>, bool)> {
    let count = ttf_parser::fonts_in_collection(data).unwrap_or(1);
    let mut fallback = None;

    for index in 0..count {
        let face = match Face::parse(data, index) {
            Ok(face) => face,
            Err(e) => {
                log::debug!("skipping face {}: {}", index, e);
                continue;
            }
        };
        if face.is_bold() == style.bold && face.is_italic() == style.italic {
            return Ok((face, false));
        }
        if fallback.is_none() {
            fallback = Some(face);
        }
    }

    let face = fallback.ok_or_else(|| OutlineError::Font("no usable face in font data".into()))?;
    if style.bold && !face.is_bold() {
        log::warn!("font has no bold face; using regular weight");
    }
    let oblique = style.italic && !face.is_italic();
    if oblique {
        log::warn!("font has no italic face; slanting glyphs");
    }
    Ok((face, oblique))
}

/// Receives glyph outline callbacks and records them in an [`OutlinePath`].
struct GlyphPen {
    path: OutlinePath,
    transform: Transform2,
}

impl GlyphPen {
    fn map(&self, x: f32, y: f32) -> Point2 {
        self.transform
            .apply_point(&Point2::new(f64::from(x), f64::from(y)))
    }
}

impl OutlineBuilder for GlyphPen {
    fn move_to(&mut self, x: f32, y: f32) {
        let p = self.map(x, y);
        self.path.move_to(p);
    }

    fn line_to(&mut self, x: f32, y: f32) {
        let p = self.map(x, y);
        self.path.line_to(p);
    }

    fn quad_to(&mut self, x1: f32, y1: f32, x: f32, y: f32) {
        let c = self.map(x1, y1);
        let p = self.map(x, y);
        self.path.quad_to(c, p);
    }

    fn curve_to(&mut self, x1: f32, y1: f32, x2: f32, y2: f32, x: f32, y: f32) {
        let c1 = self.map(x1, y1);
        let c2 = self.map(x2, y2);
        let p = self.map(x, y);
        self.path.cubic_to(c1, c2, p);
    }

    fn close(&mut self) {
        self.path.close();
    }
}
