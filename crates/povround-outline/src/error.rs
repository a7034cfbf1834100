//! Error types for outline decoding.

use thiserror::Error;

/// Errors that can occur while turning source text into an outline.
#[derive(Error, Debug)]
pub enum OutlineError {
    /// I/O error reading an SVG or font file.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The SVG document is not well-formed XML.
    #[error("XML error: {0}")]
    Xml(#[from] quick_xml::Error),

    /// SVG path data does not match the supported grammar.
    #[error("unsupported path syntax at byte {offset}: {message}")]
    UnsupportedPathSyntax {
        /// Byte offset into the path data where matching failed.
        offset: usize,
        /// Error message.
        message: String,
    },

    /// Polygon literal does not match `(x1,y1),(x2,y2),...`.
    #[error("invalid polygon at byte {offset}: {message}")]
    InvalidPolygon {
        /// Byte offset into the polygon text where matching failed.
        offset: usize,
        /// Error message.
        message: String,
    },

    /// No element with the requested id exists in the SVG document.
    #[error("no element with id '{0}' in SVG document")]
    ElementNotFound(String),

    /// The element exists but has no `d` attribute.
    #[error("element '{0}' has no 'd' attribute")]
    MissingPathData(String),

    /// The `transform` attribute is present but is not a `matrix(...)`.
    #[error("unsupported transform: {0}")]
    InvalidTransform(String),

    /// The font file could not be parsed or lacks required tables.
    #[error("font error: {0}")]
    Font(String),

    /// The text produced no glyph outlines.
    #[error("text produced no outline")]
    EmptyText,
}

impl OutlineError {
    /// Create a path syntax error.
    pub fn syntax(offset: usize, message: impl Into<String>) -> Self {
        Self::UnsupportedPathSyntax {
            offset,
            message: message.into(),
        }
    }

    /// Create a polygon syntax error.
    pub fn polygon(offset: usize, message: impl Into<String>) -> Self {
        Self::InvalidPolygon {
            offset,
            message: message.into(),
        }
    }
}

/// Result type for outline decoding.
pub type Result<T> = std::result::Result<T, OutlineError>;
