//! Polygon literal decoding: `(x1,y1),(x2,y2),...,(xn,yn)`.

use povround_math::Point2;

use crate::error::{OutlineError, Result};
use crate::path::{OutlinePath, TypedPoint};

/// Parse a polygon literal into its vertices.
///
/// Whitespace is allowed between tokens. At least three vertices are required.
pub fn parse_polygon(text: &str) -> Result<Vec<Point2>> {
    let mut cursor = Cursor {
        input: text.as_bytes(),
        pos: 0,
    };
    let mut vertices = Vec::new();

    loop {
        cursor.expect(b'(')?;
        let x = cursor.number()?;
        cursor.expect(b',')?;
        let y = cursor.number()?;
        cursor.expect(b')')?;
        vertices.push(Point2::new(x, y));

        cursor.skip_whitespace();
        if cursor.at_end() {
            break;
        }
        cursor.expect(b',')?;
    }

    if vertices.len() < 3 {
        return Err(OutlineError::polygon(
            0,
            format!("a polygon needs at least 3 vertices, got {}", vertices.len()),
        ));
    }
    Ok(vertices)
}

/// Decode a polygon literal into a single closed subpath.
pub fn decode_polygon(text: &str) -> Result<Vec<TypedPoint>> {
    let vertices = parse_polygon(text)?;
    Ok(polygon_outline(&vertices))
}

/// Build the typed point stream of a closed polygon.
pub fn polygon_outline(vertices: &[Point2]) -> Vec<TypedPoint> {
    let mut path = OutlinePath::new();
    if let Some((first, rest)) = vertices.split_first() {
        path.move_to(*first);
        for v in rest {
            path.line_to(*v);
        }
    }
    path.finish()
}

struct Cursor<'a> {
    input: &'a [u8],
    pos: usize,
}

impl Cursor<'_> {
    fn at_end(&self) -> bool {
        self.pos >= self.input.len()
    }

    fn skip_whitespace(&mut self) {
        while self.input.get(self.pos).is_some_and(|c| c.is_ascii_whitespace()) {
            self.pos += 1;
        }
    }

    fn expect(&mut self, ch: u8) -> Result<()> {
        self.skip_whitespace();
        match self.input.get(self.pos) {
            Some(&c) if c == ch => {
                self.pos += 1;
                Ok(())
            }
            Some(&c) => Err(OutlineError::polygon(
                self.pos,
                format!("expected '{}', found '{}'", ch as char, c as char),
            )),
            None => Err(OutlineError::polygon(
                self.pos,
                format!("expected '{}', found end of input", ch as char),
            )),
        }
    }

    fn number(&mut self) -> Result<f64> {
        self.skip_whitespace();
        let start = self.pos;
        while self
            .input
            .get(self.pos)
            .is_some_and(|c| c.is_ascii_digit() || matches!(*c, b'-' | b'+' | b'.' | b'e' | b'E'))
        {
            self.pos += 1;
        }
        let text = std::str::from_utf8(&self.input[start..self.pos])
            .map_err(|_| OutlineError::polygon(start, "invalid UTF-8 in number"))?;
        text.parse::<f64>()
            .map_err(|_| OutlineError::polygon(start, format!("invalid number '{}'", text)))
    }
}
