//! Standalone SVG output.

use std::fmt::Write;

use super::{render_document, Canvas};
use crate::ir::{NoteDocument, Rgba};
use crate::path::{LineCap, LineJoin, PathSegment, StrokePath};

/// A [`Canvas`] that writes an SVG document into a string.
#[derive(Debug, Default)]
pub struct SvgCanvas {
    out: String,
    group_open: bool,
}

impl SvgCanvas {
    pub fn new() -> Self {
        Self::default()
    }

    /// Closes any open elements and returns the SVG text.
    pub fn finish(mut self) -> String {
        if self.group_open {
            self.out.push_str("  </g>\n");
        }
        if !self.out.is_empty() {
            self.out.push_str("</svg>\n");
        }
        self.out
    }
}

impl Canvas for SvgCanvas {
    fn begin(&mut self, width: f64, height: f64) {
        let (w, h) = (num(width), num(height));
        let _ = writeln!(
            self.out,
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}">"#
        );
    }

    fn fill_background(&mut self, color: Rgba) {
        let _ = writeln!(
            self.out,
            r#"  <rect width="100%" height="100%" fill="{}"{}/>"#,
            rgb(color),
            opacity_attr("fill-opacity", color)
        );
    }

    fn translate(&mut self, dx: f64, dy: f64) {
        if dx == 0.0 && dy == 0.0 {
            return;
        }
        if self.group_open {
            self.out.push_str("  </g>\n");
        }
        let _ = writeln!(
            self.out,
            r#"  <g transform="translate({} {})">"#,
            num(dx),
            num(dy)
        );
        self.group_open = true;
    }

    fn stroke(&mut self, path: &StrokePath) {
        let indent = if self.group_open { "    " } else { "  " };
        let style = &path.style;
        let _ = writeln!(
            self.out,
            r#"{indent}<path d="{}" fill="none" stroke="{}"{} stroke-width="{}" stroke-linecap="{}" stroke-linejoin="{}"/>"#,
            path_data(&path.segments),
            rgb(style.color),
            opacity_attr("stroke-opacity", style.color),
            num(style.width),
            cap_name(style.cap),
            join_name(style.join)
        );
    }
}

/// Renders a note as a complete SVG document.
pub fn render_svg(document: &NoteDocument, crop_enabled: bool) -> String {
    let mut canvas = SvgCanvas::new();
    render_document(document, crop_enabled, &mut canvas);
    canvas.finish()
}

fn path_data(segments: &[PathSegment]) -> String {
    let mut d = String::new();
    for segment in segments {
        if !d.is_empty() {
            d.push(' ');
        }
        let _ = match segment {
            PathSegment::MoveTo(p) => write!(d, "M{},{}", num(p.x), num(p.y)),
            PathSegment::LineTo(p) => write!(d, "L{},{}", num(p.x), num(p.y)),
            PathSegment::QuadTo { ctrl, end } => write!(
                d,
                "Q{},{} {},{}",
                num(ctrl.x),
                num(ctrl.y),
                num(end.x),
                num(end.y)
            ),
        };
    }
    d
}

fn rgb(color: Rgba) -> String {
    format!("rgb({},{},{})", color.r, color.g, color.b)
}

fn opacity_attr(name: &str, color: Rgba) -> String {
    if color.is_opaque() {
        String::new()
    } else {
        format!(r#" {name}="{}""#, num(color.a))
    }
}

fn cap_name(cap: LineCap) -> &'static str {
    match cap {
        LineCap::Butt => "butt",
        LineCap::Round => "round",
        LineCap::Square => "square",
    }
}

fn join_name(join: LineJoin) -> &'static str {
    match join {
        LineJoin::Miter => "miter",
        LineJoin::Round => "round",
        LineJoin::Bevel => "bevel",
    }
}

/// Formats a coordinate with at most three decimals and no trailing zeros.
fn num(value: f64) -> String {
    let formatted = format!("{value:.3}");
    let trimmed = formatted.trim_end_matches('0').trim_end_matches('.');
    match trimmed {
        "-0" | "" => "0".to_string(),
        other => other.to_string(),
    }
}
