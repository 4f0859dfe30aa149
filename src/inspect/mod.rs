//! Note inspection and statistics.
//!
//! This module analyzes a decoded note and produces a structured report
//! with stroke counts, point distribution, color usage and the canvas plan
//! a renderer would use.

mod report;

pub use report::{ColorCount, ColorsSection, GeometrySection, InspectReport, StrokesSection};

use std::collections::HashMap;

use crate::geometry;
use crate::ir::NoteDocument;

/// Options for note inspection.
#[derive(Clone, Debug)]
pub struct InspectOptions {
    /// Number of most used colors to list.
    pub top_colors: usize,
    /// Whether the geometry section reflects crop-to-content.
    pub crop: bool,
    /// Width of histogram bars (in characters).
    pub bar_width: usize,
}

impl Default for InspectOptions {
    fn default() -> Self {
        Self {
            top_colors: 8,
            crop: false,
            bar_width: 20,
        }
    }
}

/// Inspect a note and produce a report.
pub fn inspect_document(document: &NoteDocument, opts: &InspectOptions) -> InspectReport {
    InspectReport {
        strokes: compute_strokes(document),
        colors: compute_colors(document, opts.top_colors),
        geometry: compute_geometry(document, opts.crop),
        bar_width: opts.bar_width,
    }
}

fn compute_strokes(document: &NoteDocument) -> StrokesSection {
    let curves = &document.curves;
    let lengths = curves.iter().map(|c| c.points.len());
    let widths = curves.iter().map(|c| c.width);

    StrokesSection {
        curves: curves.len(),
        points: document.point_count(),
        min_points: lengths.clone().min(),
        max_points: lengths.max(),
        min_width: widths.clone().reduce(f64::min),
        max_width: widths.reduce(f64::max),
    }
}

fn compute_colors(document: &NoteDocument, top_n: usize) -> ColorsSection {
    let mut counts: HashMap<String, usize> = HashMap::new();
    let mut translucent = 0;
    for curve in &document.curves {
        *counts.entry(curve.color.to_hex()).or_insert(0) += 1;
        if !curve.color.is_opaque() {
            translucent += 1;
        }
    }

    let total_distinct = counts.len();
    let mut entries: Vec<ColorCount> = counts
        .into_iter()
        .map(|(hex, count)| ColorCount { hex, count })
        .collect();
    // Count descending, then hex for a stable order.
    entries.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.hex.cmp(&b.hex)));

    let other_count = entries.iter().skip(top_n).map(|e| e.count).sum();
    entries.truncate(top_n);

    ColorsSection {
        top_n,
        total_distinct,
        total_curves: document.curves.len(),
        translucent,
        entries,
        other_count,
    }
}

fn compute_geometry(document: &NoteDocument, crop: bool) -> GeometrySection {
    let plan = geometry::plan(&document.curves, crop);
    let (rendered_width, rendered_height) = plan.rendered_size();

    GeometrySection {
        canvas_width: plan.width,
        canvas_height: plan.height,
        content: plan.content,
        crop_enabled: crop,
        crop: plan.crop,
        rendered_width,
        rendered_height,
    }
}
