//! Smoothed stroke paths.
//!
//! Raw pen samples form an angular polyline. [`build_path`] turns it into a
//! midpoint quadratic spline: every interior sample becomes a control point
//! and the path passes through the midpoints between samples, ending exactly
//! on the last sample.

use serde::Serialize;

use crate::ir::{Curve, CurvePoint, Rgba};

/// Thinnest stroke a renderer is asked to draw.
pub const MIN_STROKE_WIDTH: f64 = 0.5;

/// A single path command.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub enum PathSegment {
    /// Start a new subpath at a point.
    MoveTo(CurvePoint),
    /// Straight line to a point.
    LineTo(CurvePoint),
    /// Quadratic Bézier curve.
    QuadTo { ctrl: CurvePoint, end: CurvePoint },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum LineCap {
    Butt,
    Round,
    Square,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum LineJoin {
    Miter,
    Round,
    Bevel,
}

/// How a renderer should paint a stroke path.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct StrokeStyle {
    pub width: f64,
    pub color: Rgba,
    pub cap: LineCap,
    pub join: LineJoin,
}

impl StrokeStyle {
    /// Round caps and joins, width clamped to [`MIN_STROKE_WIDTH`].
    pub fn for_curve(curve: &Curve) -> Self {
        Self {
            width: curve.width.max(MIN_STROKE_WIDTH),
            color: curve.color,
            cap: LineCap::Round,
            join: LineJoin::Round,
        }
    }
}

/// Path segments of one curve plus the style to draw them with.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct StrokePath {
    pub segments: Vec<PathSegment>,
    pub style: StrokeStyle,
}

impl StrokePath {
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }
}

/// Builds the stroke for a curve.
pub fn build_stroke(curve: &Curve) -> StrokePath {
    StrokePath {
        segments: build_path(&curve.points),
        style: StrokeStyle::for_curve(curve),
    }
}

/// Builds smoothed path segments through `points`.
///
/// Non-finite points are skipped. Fewer than two points give an empty path
/// and exactly two a straight line.
pub fn build_path(points: &[CurvePoint]) -> Vec<PathSegment> {
    let points: Vec<CurvePoint> = points.iter().copied().filter(CurvePoint::is_finite).collect();
    let n = points.len();

    match n {
        0 | 1 => Vec::new(),
        2 => vec![PathSegment::MoveTo(points[0]), PathSegment::LineTo(points[1])],
        _ => {
            let mut segments = Vec::with_capacity(n);
            segments.push(PathSegment::MoveTo(points[0]));
            for pair in points[1..].windows(2) {
                segments.push(PathSegment::QuadTo {
                    ctrl: pair[0],
                    end: pair[0].midpoint(pair[1]),
                });
            }
            segments.push(PathSegment::QuadTo {
                ctrl: points[n - 2],
                end: points[n - 1],
            });
            segments
        }
    }
}
