//! SVG path data decoding.
//!
//! Supports the absolute commands `M`, `L`, `C` and the close commands
//! `Z`/`z`. A command letter may be omitted for repeated commands; extra
//! coordinate pairs after `M` are treated as `L`, as SVG specifies.

use std::path::Path;

use povround_math::{Point2, Transform2};
use quick_xml::events::Event;
use quick_xml::Reader;
use regex::Regex;

use crate::error::{OutlineError, Result};
use crate::lexer::{Lexer, SpannedToken, Token};
use crate::path::{OutlinePath, TypedPoint};

/// Path data and transform read from an SVG element.
#[derive(Debug, Clone)]
pub struct SvgElementPath {
    /// Contents of the `d` attribute.
    pub data: String,
    /// Transform from the `transform` attribute (identity if absent).
    pub transform: Transform2,
}

/// Decode SVG path data into a typed point stream.
pub fn decode_svg_path(data: &str, transform: &Transform2) -> Result<Vec<TypedPoint>> {
    let mut path = parse_path_data(data)?;
    if !transform.is_identity() {
        log::info!("applying SVG transform {:?}", transform.matrix);
        path.transform(transform);
    }
    Ok(path.finish())
}

/// Parse SVG path data into an [`OutlinePath`].
pub fn parse_path_data(data: &str) -> Result<OutlinePath> {
    let tokens = Lexer::new(data).tokenize()?;
    let mut parser = PathParser {
        tokens: &tokens,
        pos: 0,
        end: data.len(),
    };
    parser.parse()
}

struct PathParser<'a> {
    tokens: &'a [SpannedToken],
    pos: usize,
    end: usize,
}

impl PathParser<'_> {
    fn parse(&mut self) -> Result<OutlinePath> {
        let mut path = OutlinePath::new();
        let mut command: Option<u8> = None;

        while let Some(tok) = self.tokens.get(self.pos).copied() {
            let current = match tok.token {
                Token::Command(c) => {
                    self.pos += 1;
                    c
                }
                // Implicit repetition of the previous command.
                Token::Number(_) => match command {
                    Some(b'M') => b'L',
                    Some(c @ (b'L' | b'C')) => c,
                    Some(_) => {
                        return Err(OutlineError::syntax(
                            tok.offset,
                            "number without a preceding command",
                        ))
                    }
                    None => {
                        return Err(OutlineError::syntax(
                            tok.offset,
                            "path data must start with M",
                        ))
                    }
                },
            };

            if command.is_none() && current != b'M' {
                return Err(OutlineError::syntax(
                    tok.offset,
                    "path data must start with M",
                ));
            }

            match current {
                b'M' => {
                    let p = self.read_point()?;
                    path.move_to(p);
                }
                b'L' => {
                    let p = self.read_point()?;
                    path.line_to(p);
                }
                b'C' => {
                    let c1 = self.read_point()?;
                    let c2 = self.read_point()?;
                    let p = self.read_point()?;
                    path.cubic_to(c1, c2, p);
                }
                b'Z' | b'z' => path.close(),
                other => {
                    return Err(OutlineError::syntax(
                        tok.offset,
                        format!("unsupported command '{}'", other as char),
                    ))
                }
            }
            command = Some(current);
        }

        Ok(path)
    }

    fn read_number(&mut self) -> Result<f64> {
        match self.tokens.get(self.pos) {
            Some(SpannedToken {
                token: Token::Number(n),
                ..
            }) => {
                self.pos += 1;
                Ok(*n)
            }
            Some(tok) => Err(OutlineError::syntax(tok.offset, "expected a number")),
            None => Err(OutlineError::syntax(
                self.end,
                "unexpected end of path data",
            )),
        }
    }

    fn read_point(&mut self) -> Result<Point2> {
        let x = self.read_number()?;
        let y = self.read_number()?;
        Ok(Point2::new(x, y))
    }
}

/// Parse a `transform` attribute of the form `matrix(a,b,c,d,e,f)`.
pub fn parse_matrix(text: &str) -> Result<Transform2> {
    let num = r"([-+]?(?:\d+\.?\d*|\.\d+)(?:[eE][-+]?\d+)?)";
    let sep = r"(?:\s*,\s*|\s+)";
    let pattern = format!(
        r"^\s*matrix\s*\(\s*{num}{sep}{num}{sep}{num}{sep}{num}{sep}{num}{sep}{num}\s*\)\s*$"
    );
    let re = Regex::new(&pattern).map_err(|e| OutlineError::InvalidTransform(e.to_string()))?;
    let caps = re
        .captures(text)
        .ok_or_else(|| OutlineError::InvalidTransform(text.to_string()))?;

    let mut v = [0.0f64; 6];
    for (i, slot) in v.iter_mut().enumerate() {
        *slot = caps[i + 1]
            .parse()
            .map_err(|_| OutlineError::InvalidTransform(text.to_string()))?;
    }
    Ok(Transform2::from_svg_matrix(v[0], v[1], v[2], v[3], v[4], v[5]))
}

/// Find the element with the given `id` in an SVG document and read its path data.
///
/// Attribute names are matched case-insensitively.
pub fn find_element_path(xml: &str, id: &str) -> Result<SvgElementPath> {
    let mut reader = Reader::from_str(xml);

    loop {
        match reader.read_event()? {
            Event::Start(e) | Event::Empty(e) => {
                let mut element_id = None;
                let mut data = None;
                let mut transform = None;
                for attr in e.attributes() {
                    let attr = attr.map_err(quick_xml::Error::from)?;
                    let key = attr.key.as_ref();
                    if key.eq_ignore_ascii_case(b"id") {
                        element_id = Some(attr.unescape_value()?.into_owned());
                    } else if key.eq_ignore_ascii_case(b"d") {
                        data = Some(attr.unescape_value()?.into_owned());
                    } else if key.eq_ignore_ascii_case(b"transform") {
                        transform = Some(attr.unescape_value()?.into_owned());
                    }
                }

                if element_id.as_deref() != Some(id) {
                    continue;
                }
                let data = data.ok_or_else(|| OutlineError::MissingPathData(id.to_string()))?;
                let transform = match transform {
                    Some(t) => parse_matrix(&t)?,
                    None => Transform2::identity(),
                };
                return Ok(SvgElementPath { data, transform });
            }
            Event::Eof => return Err(OutlineError::ElementNotFound(id.to_string())),
            _ => {}
        }
    }
}

/// Read an SVG file and decode the path of the element with the given `id`.
pub fn decode_svg_file(file: impl AsRef<Path>, id: &str) -> Result<Vec<TypedPoint>> {
    let xml = std::fs::read_to_string(file)?;
    let element = find_element_path(&xml, id)?;
    decode_svg_path(&element.data, &element.transform)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::path::PointKind;
    use approx::assert_relative_eq;

    fn kinds(points: &[TypedPoint]) -> Vec<PointKind> {
        points.iter().map(|p| p.kind).collect()
    }

    #[test]
    fn test_square_path() {
        let points = decode_svg_path("M0,0 L10,0 L10,10 L0,10 Z", &Transform2::identity()).unwrap();
        assert_eq!(
            kinds(&points),
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
    fn test_implicit_repetition() {
        let points = decode_svg_path("M 0 0 10 0 10 10 Z", &Transform2::identity()).unwrap();
        assert_eq!(points.len(), 4);
        assert_eq!(points[1].kind, PointKind::Line);
        assert_eq!(points[2].location, Point2::new(10.0, 10.0));

        let points = decode_svg_path(
            "M0 0 C 1 1 2 1 3 0 4 -1 5 -1 6 0 z",
            &Transform2::identity(),
        )
        .unwrap();
        assert_eq!(points.len(), 8);
        assert_eq!(points[6].location, Point2::new(6.0, 0.0));
    }

    #[test]
    fn test_unclosed_figures_are_closed() {
        let points = decode_svg_path("M0 0 L1 0 L1 1 M5 5 L6 5 L6 6", &Transform2::identity())
            .unwrap();
        let closes = points
            .iter()
            .filter(|p| p.kind == PointKind::SubpathClose)
            .count();
        assert_eq!(closes, 2);
        assert_eq!(points.last().unwrap().kind, PointKind::SubpathClose);
    }

    #[test]
    fn test_must_start_with_move() {
        let err = parse_path_data("L 1 1").unwrap_err();
        assert!(matches!(
            err,
            OutlineError::UnsupportedPathSyntax { offset: 0, .. }
        ));
    }

    #[test]
    fn test_relative_commands_unsupported() {
        let err = parse_path_data("M 0 0 l 1 1").unwrap_err();
        assert!(matches!(
            err,
            OutlineError::UnsupportedPathSyntax { offset: 6, .. }
        ));
    }

    #[test]
    fn test_truncated_cubic() {
        let data = "M 0 0 C 1 1 2 2";
        let err = parse_path_data(data).unwrap_err();
        assert!(matches!(
            err,
            OutlineError::UnsupportedPathSyntax { offset, .. } if offset == data.len()
        ));
    }

    #[test]
    fn test_parse_matrix() {
        let t = parse_matrix("matrix(1, 0, 0, -1, 5.5, .5)").unwrap();
        let p = t.apply_point(&Point2::new(2.0, 3.0));
        assert_relative_eq!(p.x, 7.5);
        assert_relative_eq!(p.y, -2.5);

        assert!(parse_matrix("translate(10, 10)").is_err());
        assert!(parse_matrix("matrix(1 0 0 1 0 0)").is_ok());
    }

    #[test]
    fn test_find_element_path() {
        let xml = r#"<?xml version="1.0"?>
<svg xmlns="http://www.w3.org/2000/svg">
  <g>
    <path id="other" d="M 0 0 L 1 1 Z"/>
    <path ID="logo" D="M 0 0 L 4 0 L 4 4 Z" transform="matrix(2,0,0,2,1,1)"></path>
  </g>
</svg>"#;
        let element = find_element_path(xml, "logo").unwrap();
        assert_eq!(element.data, "M 0 0 L 4 0 L 4 4 Z");
        let points = decode_svg_path(&element.data, &element.transform).unwrap();
        assert_eq!(points[1].location, Point2::new(9.0, 1.0));

        assert!(matches!(
            find_element_path(xml, "missing"),
            Err(OutlineError::ElementNotFound(_))
        ));
    }

    #[test]
    fn test_element_without_data() {
        let xml = r#"<svg><rect id="box" width="4" height="4"/></svg>"#;
        assert!(matches!(
            find_element_path(xml, "box"),
            Err(OutlineError::MissingPathData(_))
        ));
    }
}
