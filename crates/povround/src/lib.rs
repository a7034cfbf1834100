#![warn(missing_docs)]

//! povround: rounded extrusions for POV-Ray.
//!
//! Decodes an outline (text, polygon or SVG path), rounds its front and
//! back edges and writes the result as a POV-Ray `union` of a
//! `linear_sweep` prism and `bicubic_patch` bevels.
//!
//! # Example
//!
//! ```rust,no_run
//! use povround::{OutlineSource, RoundedSolid, RoundingSettings};
//!
//! let source = OutlineSource::Polygon("(0,0),(10,0),(10,10),(0,10)".into());
//! let solid = RoundedSolid::from_source("Block", &source, RoundingSettings::default()).unwrap();
//! solid.write_pov("block.inc").unwrap();
//! ```

use std::path::Path;

use thiserror::Error;

pub mod export;

pub use povround_kernel::{
    round_outline, OutlineSummary, Patch, PatchKind, RoundedOutline, RoundingError,
    RoundingSettings,
};
pub use povround_math::{Point2, Point3, Transform2};
pub use povround_outline::{
    parse_matrix, OutlineError, OutlineSource, PointKind, TextStyle, TypedPoint,
};

/// Errors returned while building or writing a rounded solid.
#[derive(Error, Debug)]
pub enum PovError {
    /// The outline could not be decoded.
    #[error("outline error: {0}")]
    Outline(#[from] OutlineError),
    /// The outline could not be rounded.
    #[error("rounding error: {0}")]
    Rounding(#[from] RoundingError),
    /// The declared name is not a POV-Ray identifier.
    #[error("invalid scene identifier {0:?}")]
    InvalidName(String),
    /// An I/O error occurred during export.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// A named, rounded extrusion ready for export.
#[derive(Debug, Clone)]
pub struct RoundedSolid {
    /// Identifier used in the `#declare` statement.
    pub name: String,
    /// Rounded geometry.
    pub outline: RoundedOutline,
    /// Settings the geometry was built with.
    pub settings: RoundingSettings,
}

impl RoundedSolid {
    /// Round a typed point stream.
    pub fn from_points(
        name: impl Into<String>,
        points: &[TypedPoint],
        settings: RoundingSettings,
    ) -> Result<Self, PovError> {
        let name = name.into();
        if !is_identifier(&name) {
            return Err(PovError::InvalidName(name));
        }
        let outline = round_outline(points, &settings)?;
        Ok(Self {
            name,
            outline,
            settings,
        })
    }

    /// Decode `source` and round it.
    pub fn from_source(
        name: impl Into<String>,
        source: &OutlineSource,
        settings: RoundingSettings,
    ) -> Result<Self, PovError> {
        let points = source.decode()?;
        Self::from_points(name, &points, settings)
    }

    /// Counts describing the geometry.
    pub fn summary(&self) -> OutlineSummary {
        self.outline.summary()
    }

    /// Render the POV-Ray scene text.
    pub fn to_pov_string(&self) -> String {
        export::pov::render_scene(&self.name, &self.outline, &self.settings)
    }

    /// Write the POV-Ray scene text to a file.
    pub fn write_pov(&self, path: impl AsRef<Path>) -> Result<(), PovError> {
        export::pov::export_pov(self, path)
    }
}

/// POV-Ray identifiers start with a letter and continue with letters,
/// digits or underscores.
fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() => {
            chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        }
        _ => false,
    }
}
