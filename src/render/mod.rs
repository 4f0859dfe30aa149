//! Rendering seam between decoded notes and drawing backends.
//!
//! Backends implement [`Canvas`]; [`render_document`] drives one through a
//! whole note:
//!
//! 1. `begin` with the rendered (possibly cropped) size
//! 2. `fill_background` with opaque white
//! 3. `translate` by `(-crop.left, -crop.top)`
//! 4. `stroke` once per curve, in drawing order
//!
//! Curves whose path is empty are not passed to the canvas.

mod svg;

pub use svg::{render_svg, SvgCanvas};

use crate::geometry::{self, CanvasPlan};
use crate::ir::{NoteDocument, Rgba};
use crate::path::{build_stroke, StrokePath};

/// A drawing backend.
pub trait Canvas {
    /// Start a drawing of the given size.
    fn begin(&mut self, width: f64, height: f64);

    /// Paint the whole canvas with `color`.
    fn fill_background(&mut self, color: Rgba);

    /// Move the origin for everything drawn afterwards.
    fn translate(&mut self, dx: f64, dy: f64);

    /// Draw one stroke.
    fn stroke(&mut self, path: &StrokePath);
}

/// Renders `document` onto `canvas` and returns the plan that was used.
pub fn render_document<C: Canvas + ?Sized>(
    document: &NoteDocument,
    crop_enabled: bool,
    canvas: &mut C,
) -> CanvasPlan {
    let plan = geometry::plan(&document.curves, crop_enabled);
    let (width, height) = plan.rendered_size();

    canvas.begin(width, height);
    canvas.fill_background(Rgba::WHITE);
    let (dx, dy) = plan.origin_offset();
    canvas.translate(dx, dy);

    for curve in &document.curves {
        let stroke = build_stroke(curve);
        if !stroke.is_empty() {
            canvas.stroke(&stroke);
        }
    }

    plan
}
