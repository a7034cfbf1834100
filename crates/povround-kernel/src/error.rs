//! Error types for the rounding kernel.

use thiserror::Error;

/// Errors that can occur while rounding an outline.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RoundingError {
    /// The typed point stream cannot be grouped into closed curves.
    #[error("malformed outline at point {index}: {message}")]
    MalformedOutline {
        /// Index of the offending point (the stream length if input ended early).
        index: usize,
        /// Error message.
        message: String,
    },

    /// Two cyclically adjacent quads of a curve do not share an endpoint.
    #[error("curve {curve} is discontinuous after quad {quad}")]
    DiscontinuousCurve {
        /// Index of the curve in the outline.
        curve: usize,
        /// Index of the quad whose end does not meet the next quad's start.
        quad: usize,
    },

    /// A normal was requested for two coincident points.
    #[error("degenerate control point at ({x}, {y}): no normal is defined")]
    DegenerateControlPoint {
        /// X coordinate of the point being displaced.
        x: f64,
        /// Y coordinate of the point being displaced.
        y: f64,
    },

    /// Invalid rounding settings.
    #[error("invalid settings: {0}")]
    InvalidSettings(String),
}

impl RoundingError {
    /// Create a malformed-outline error.
    pub fn malformed(index: usize, message: impl Into<String>) -> Self {
        Self::MalformedOutline {
            index,
            message: message.into(),
        }
    }
}

/// Result type for rounding operations.
pub type Result<T> = std::result::Result<T, RoundingError>;
