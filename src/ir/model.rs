//! Core document model for decoded notes.
//!
//! A [`NoteDocument`] is what every note parses into and what every renderer
//! and writer consumes. It owns all of its data and holds no references into
//! the archive it came from.

use serde::{Deserialize, Serialize};

use super::color::Rgba;
use super::point::CurvePoint;

/// Stroke width used when a curve has no usable width entry.
pub const DEFAULT_STROKE_WIDTH: f64 = 2.0;

/// A fully decoded note: its strokes and a content-derived canvas size.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct NoteDocument {
    /// Strokes in drawing order.
    pub curves: Vec<Curve>,

    /// Canvas width derived from stroke content, not the page size stored in
    /// the note.
    pub width: f64,

    /// Canvas height derived from stroke content.
    pub height: f64,
}

impl NoteDocument {
    /// Total number of points across all curves.
    pub fn point_count(&self) -> usize {
        self.curves.iter().map(|c| c.points.len()).sum()
    }
}

/// One continuous pen stroke.
///
/// Curves produced by the parser always have at least two finite points.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Curve {
    pub points: Vec<CurvePoint>,
    pub width: f64,
    pub color: Rgba,
}

impl Curve {
    /// Creates a curve with the default width and opaque black color.
    pub fn new(points: Vec<CurvePoint>) -> Self {
        Self {
            points,
            width: DEFAULT_STROKE_WIDTH,
            color: Rgba::BLACK,
        }
    }

    pub fn with_width(mut self, width: f64) -> Self {
        self.width = width;
        self
    }

    pub fn with_color(mut self, color: Rgba) -> Self {
        self.color = color;
        self
    }
}
