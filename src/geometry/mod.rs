//! Canvas sizing and crop-to-content planning.
//!
//! The canvas always covers the origin and grows with the content, with a
//! minimum size of [`MIN_CANVAS_WIDTH`] x [`MIN_CANVAS_HEIGHT`] and a
//! [`CANVAS_MARGIN`] past the furthest point. Cropping trims the empty
//! margins around the strokes; the renderer then shifts its origin by
//! `(-crop.left, -crop.top)`.

use serde::Serialize;

use crate::ir::{Bounds, CropRect, Curve};

pub const MIN_CANVAS_WIDTH: f64 = 800.0;
pub const MIN_CANVAS_HEIGHT: f64 = 1000.0;
pub const CANVAS_MARGIN: f64 = 50.0;

/// Canvas size, content box and crop insets for one render.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct CanvasPlan {
    /// Uncropped canvas width.
    pub width: f64,
    /// Uncropped canvas height.
    pub height: f64,
    /// Stroke extent including half of each stroke's width, if any points
    /// exist.
    pub content: Option<Bounds>,
    /// Insets to trim; all zero when cropping is off.
    pub crop: CropRect,
}

impl CanvasPlan {
    /// Final canvas size after cropping, never below 1 x 1.
    pub fn rendered_size(&self) -> (f64, f64) {
        (
            (self.width - self.crop.left - self.crop.right).max(1.0),
            (self.height - self.crop.top - self.crop.bottom).max(1.0),
        )
    }

    /// Origin translation the renderer applies before drawing.
    pub fn origin_offset(&self) -> (f64, f64) {
        (-self.crop.left, -self.crop.top)
    }
}

/// Plans the canvas for `curves`.
pub fn plan(curves: &[Curve], crop_enabled: bool) -> CanvasPlan {
    let (width, height) = canvas_size(curves);
    let content = content_bounds(curves);

    let crop = match content {
        Some(bounds) if crop_enabled => CropRect {
            left: bounds.min_x.max(0.0),
            top: bounds.min_y.max(0.0),
            right: (width - bounds.max_x).max(0.0),
            bottom: (height - bounds.max_y).max(0.0),
        },
        _ => CropRect::NONE,
    };

    CanvasPlan {
        width,
        height,
        content,
        crop,
    }
}

/// Base canvas size from raw point coordinates, ignoring stroke widths.
pub fn canvas_size(curves: &[Curve]) -> (f64, f64) {
    let mut max_x = f64::NEG_INFINITY;
    let mut max_y = f64::NEG_INFINITY;
    for point in curves.iter().flat_map(|c| c.points.iter()) {
        max_x = max_x.max(point.x);
        max_y = max_y.max(point.y);
    }

    if !max_x.is_finite() || !max_y.is_finite() {
        return (MIN_CANVAS_WIDTH, MIN_CANVAS_HEIGHT);
    }
    (
        (max_x.ceil() + CANVAS_MARGIN).max(MIN_CANVAS_WIDTH),
        (max_y.ceil() + CANVAS_MARGIN).max(MIN_CANVAS_HEIGHT),
    )
}

/// Bounding box of all points grown by half of their curve's stroke width.
///
/// `None` when there are no points.
pub fn content_bounds(curves: &[Curve]) -> Option<Bounds> {
    let mut bounds = Bounds::EMPTY;
    for curve in curves {
        let radius = curve.width / 2.0;
        for point in &curve.points {
            bounds.include(*point, radius);
        }
    }
    bounds.is_finite().then_some(bounds)
}
