//! Inspect report types and terminal formatting.

use std::fmt;

use serde::Serialize;

use crate::ir::{Bounds, CropRect};

/// Inner width of the report boxes, in characters.
const BOX_WIDTH: usize = 59;

/// The result of inspecting a note.
#[derive(Clone, Debug, Serialize)]
pub struct InspectReport {
    /// Stroke and point counts.
    pub strokes: StrokesSection,
    /// Color usage histogram.
    pub colors: ColorsSection,
    /// Canvas plan.
    pub geometry: GeometrySection,
    /// Display options for formatting.
    #[serde(skip)]
    pub(crate) bar_width: usize,
}

/// Stroke and point counts.
#[derive(Clone, Debug, Default, Serialize)]
pub struct StrokesSection {
    /// Number of curves.
    pub curves: usize,
    /// Total points across all curves.
    pub points: usize,
    /// Fewest points in a single curve.
    pub min_points: Option<usize>,
    /// Most points in a single curve.
    pub max_points: Option<usize>,
    /// Thinnest stroke width.
    pub min_width: Option<f64>,
    /// Thickest stroke width.
    pub max_width: Option<f64>,
}

/// Color usage section.
#[derive(Clone, Debug, Serialize)]
pub struct ColorsSection {
    /// How many top colors to show.
    pub top_n: usize,
    /// Distinct RGB colors (alpha ignored).
    pub total_distinct: usize,
    /// Curves counted.
    pub total_curves: usize,
    /// Curves whose color is not fully opaque.
    pub translucent: usize,
    /// Top colors, most used first.
    pub entries: Vec<ColorCount>,
    /// Curves using a color not in the top N.
    pub other_count: usize,
}

/// A single color with the number of curves using it.
#[derive(Clone, Debug, Serialize)]
pub struct ColorCount {
    /// `#rrggbb`.
    pub hex: String,
    pub count: usize,
}

/// Canvas plan as a renderer would use it.
#[derive(Clone, Debug, Serialize)]
pub struct GeometrySection {
    pub canvas_width: f64,
    pub canvas_height: f64,
    /// Stroke extent including stroke widths.
    pub content: Option<Bounds>,
    pub crop_enabled: bool,
    pub crop: CropRect,
    pub rendered_width: f64,
    pub rendered_height: f64,
}

impl fmt::Display for InspectReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f)?;
        writeln!(f, "╭{}╮", "─".repeat(BOX_WIDTH))?;
        writeln!(f, "│{:^width$}│", "Note Inspection Report", width = BOX_WIDTH)?;
        writeln!(f, "╰{}╯", "─".repeat(BOX_WIDTH))?;
        writeln!(f)?;

        self.fmt_strokes(f)?;
        writeln!(f)?;

        self.fmt_colors(f)?;
        writeln!(f)?;

        self.fmt_geometry(f)?;

        Ok(())
    }
}

impl InspectReport {
    fn fmt_strokes(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = &self.strokes;

        box_top(f, "Strokes")?;
        row(f, &format!("Curves:        {:>10}", format_number(s.curves)))?;
        row(f, &format!("Points:        {:>10}", format_number(s.points)))?;
        if let (Some(min), Some(max)) = (s.min_points, s.max_points) {
            row(
                f,
                &format!(
                    "Per curve:     min {:>6}    max {:>8}",
                    format_number(min),
                    format_number(max)
                ),
            )?;
        }
        if let (Some(min), Some(max)) = (s.min_width, s.max_width) {
            row(f, &format!("Width:         min {min:>6.2}    max {max:>8.2}"))?;
        }
        box_bottom(f)
    }

    fn fmt_colors(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let c = &self.colors;

        let header = if c.total_distinct > c.top_n {
            format!("Colors (top {} of {})", c.top_n, c.total_distinct)
        } else {
            format!("Colors ({})", c.total_distinct)
        };
        box_top(f, &header)?;

        if c.entries.is_empty() {
            row(f, "No strokes found.")?;
        } else {
            let max_count = c.entries.iter().map(|e| e.count).max().unwrap_or(1);
            for entry in &c.entries {
                row(
                    f,
                    &format!(
                        "{:<9} {:>7} {:>6}  {}",
                        entry.hex,
                        format_number(entry.count),
                        fmt_percent(entry.count, c.total_curves),
                        render_bar(entry.count, max_count, self.bar_width)
                    ),
                )?;
            }
            if c.other_count > 0 {
                row(
                    f,
                    &format!(
                        "{:<9} {:>7} {:>6}  {}",
                        "(other)",
                        format_number(c.other_count),
                        fmt_percent(c.other_count, c.total_curves),
                        render_bar(c.other_count, max_count, self.bar_width)
                    ),
                )?;
            }
            if c.translucent > 0 {
                row(f, "")?;
                row(
                    f,
                    &format!("Translucent strokes: {}", format_number(c.translucent)),
                )?;
            }
        }
        box_bottom(f)
    }

    fn fmt_geometry(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let g = &self.geometry;

        box_top(f, "Canvas")?;
        row(
            f,
            &format!("Canvas:        {:.0} x {:.0}", g.canvas_width, g.canvas_height),
        )?;
        match g.content {
            Some(b) => row(
                f,
                &format!(
                    "Content:       {:.1} x {:.1} at ({:.1}, {:.1})",
                    b.width(),
                    b.height(),
                    b.min_x,
                    b.min_y
                ),
            )?,
            None => row(f, "Content:       empty")?,
        }
        if g.crop_enabled && g.crop.is_none() {
            row(f, "Crop:          on, nothing to trim")?;
        } else if g.crop_enabled {
            row(
                f,
                &format!(
                    "Crop:          l {:.1}  t {:.1}  r {:.1}  b {:.1}",
                    g.crop.left, g.crop.top, g.crop.right, g.crop.bottom
                ),
            )?;
        } else {
            row(f, "Crop:          off")?;
        }
        row(
            f,
            &format!(
                "Rendered:      {:.0} x {:.0}",
                g.rendered_width, g.rendered_height
            ),
        )?;
        box_bottom(f)
    }
}

fn box_top(f: &mut fmt::Formatter<'_>, title: &str) -> fmt::Result {
    let fill = (BOX_WIDTH - 3).saturating_sub(title.chars().count());
    writeln!(f, "┌─ {} {}┐", title, "─".repeat(fill))?;
    row(f, "")
}

fn box_bottom(f: &mut fmt::Formatter<'_>) -> fmt::Result {
    row(f, "")?;
    writeln!(f, "└{}┘", "─".repeat(BOX_WIDTH))
}

/// One padded line inside a box.
fn row(f: &mut fmt::Formatter<'_>, content: &str) -> fmt::Result {
    let pad = (BOX_WIDTH - 3).saturating_sub(content.chars().count());
    writeln!(f, "│   {}{}│", content, " ".repeat(pad))
}

/// Format a number with thousands separators.
fn format_number(n: usize) -> String {
    let s = n.to_string();
    let mut result = String::new();
    for (i, c) in s.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            result.push(',');
        }
        result.push(c);
    }
    result.chars().rev().collect()
}

/// Format a percentage, handling zero denominators.
fn fmt_percent(numerator: usize, denominator: usize) -> String {
    if denominator == 0 {
        "n/a".to_string()
    } else {
        format!("{:.1}%", (numerator as f64 / denominator as f64) * 100.0)
    }
}

/// Render a horizontal bar using Unicode block characters.
fn render_bar(count: usize, max_count: usize, width: usize) -> String {
    if max_count == 0 || width == 0 {
        return String::new();
    }

    let filled = ((count * width) / max_count).min(width);
    "█".repeat(filled) + &"░".repeat(width - filled)
}
