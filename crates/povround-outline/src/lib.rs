#![warn(missing_docs)]

//! Outline decoders for povround.
//!
//! Turns a polygon literal, SVG path data or a line of text into the flat
//! typed point stream the rounding kernel consumes. Every decoder produces
//! closed subpaths: each `Start` point is at index 0 or follows a
//! `SubpathClose`, and each `SubpathClose` is last or precedes a `Start`.
//!
//! # Example
//!
//! ```
//! use povround_outline::{decode_polygon, PointKind};
//!
//! let points = decode_polygon("(0,0),(10,0),(10,10),(0,10)").unwrap();
//! assert_eq!(points[0].kind, PointKind::Start);
//! assert_eq!(points.last().unwrap().kind, PointKind::SubpathClose);
//! ```

mod error;
mod lexer;
mod path;
mod polygon;
mod svg;
mod text;

use std::path::PathBuf;

pub use error::{OutlineError, Result};
pub use path::{OutlinePath, PointKind, TypedPoint};
pub use polygon::{decode_polygon, parse_polygon, polygon_outline};
pub use svg::{
    decode_svg_file, decode_svg_path, find_element_path, parse_matrix, parse_path_data,
    SvgElementPath,
};
pub use text::{decode_text, decode_text_file, TextStyle};

use povround_math::Transform2;

/// Where an outline comes from.
#[derive(Debug, Clone)]
pub enum OutlineSource {
    /// A line (or lines) of text rendered in a font file.
    Text {
        /// The text to render.
        text: String,
        /// Path to a TrueType/OpenType font or font collection.
        font: PathBuf,
        /// Em size in outline units.
        size: f64,
        /// Requested style.
        style: TextStyle,
    },
    /// A polygon literal `(x1,y1),(x2,y2),...`.
    Polygon(String),
    /// Inline SVG path data with an optional transform.
    SvgPath {
        /// Path data.
        data: String,
        /// Transform applied to every point.
        transform: Transform2,
    },
    /// The path of an element in an SVG file.
    SvgFile {
        /// SVG file to read.
        file: PathBuf,
        /// `id` attribute of the path element.
        id: String,
    },
}

impl OutlineSource {
    /// Decode this source into a typed point stream.
    pub fn decode(&self) -> Result<Vec<TypedPoint>> {
        match self {
            OutlineSource::Text {
                text,
                font,
                size,
                style,
            } => decode_text_file(text, font, *size, *style),
            OutlineSource::Polygon(text) => decode_polygon(text),
            OutlineSource::SvgPath { data, transform } => decode_svg_path(data, transform),
            OutlineSource::SvgFile { file, id } => decode_svg_file(file, id),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_polygon_source() {
        let source = OutlineSource::Polygon("(0,0),(4,0),(0,3)".into());
        let points = source.decode().unwrap();
        assert_eq!(points.len(), 4);
    }

    #[test]
    fn test_svg_source_with_transform() {
        let source = OutlineSource::SvgPath {
            data: "M 0 0 L 1 0 L 1 1 Z".into(),
            transform: Transform2::scale(10.0, 10.0),
        };
        let points = source.decode().unwrap();
        assert_eq!(points[2].location, povround_math::Point2::new(10.0, 10.0));
    }
}
