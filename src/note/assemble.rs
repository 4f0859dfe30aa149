//! Rebuilding curves from the four parallel stroke arrays.

use tracing::{debug, warn};

use crate::error::NoteError;
use crate::ir::{Curve, CurvePoint, Rgba, DEFAULT_STROKE_WIDTH};

/// Counters describing what assembly skipped or dropped.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct AssemblyStats {
    /// Curves with a non-positive point count.
    pub skipped_counts: usize,
    /// Curves left with fewer than two valid points.
    pub short_curves: usize,
    /// Point pairs that were missing or not finite.
    pub dropped_points: usize,
}

/// Splits interleaved `(x, y)` coordinates into curves.
///
/// `counts[i]` points are taken for curve `i` from a cursor shared by all
/// curves. A count that is not positive skips the curve without moving the
/// cursor. Pairs that are missing or not finite are dropped but still
/// consume their slot. Curves left with fewer than two points are discarded.
///
/// Widths default to [`DEFAULT_STROKE_WIDTH`] when absent or not finite, and
/// colors to packed `0` (opaque black).
///
/// # Errors
/// Returns [`NoteError::NoCurveData`] if `points` or `counts` is empty or no
/// curve survives.
pub fn assemble_curves(
    points: &[f64],
    counts: &[f64],
    widths: &[f64],
    colors: &[f64],
) -> Result<Vec<Curve>, NoteError> {
    let (curves, stats) = assemble_with_stats(points, counts, widths, colors);

    if stats.dropped_points > 0 || stats.short_curves > 0 {
        warn!(
            dropped_points = stats.dropped_points,
            short_curves = stats.short_curves,
            "discarded invalid stroke data"
        );
    }
    debug!(
        curves = curves.len(),
        skipped_counts = stats.skipped_counts,
        "assembled curves"
    );

    if curves.is_empty() {
        return Err(NoteError::NoCurveData);
    }
    Ok(curves)
}

/// Same as [`assemble_curves`] but never fails and also reports counters.
///
/// Empty input simply yields no curves.
pub fn assemble_with_stats(
    points: &[f64],
    counts: &[f64],
    widths: &[f64],
    colors: &[f64],
) -> (Vec<Curve>, AssemblyStats) {
    let mut stats = AssemblyStats::default();
    let mut curves = Vec::new();
    if points.is_empty() || counts.is_empty() {
        return (curves, stats);
    }

    let available = points.len() / 2 + points.len() % 2;
    let mut cursor = 0usize;

    for (i, &count) in counts.iter().enumerate() {
        if count.is_nan() || count <= 0.0 {
            stats.skipped_counts += 1;
            continue;
        }

        let wanted = count as usize;
        let end = cursor.saturating_add(wanted);
        let mut curve_points = Vec::with_capacity(wanted.min(available));

        for pair in cursor..end.min(available) {
            let x = points.get(pair * 2).copied();
            let y = points.get(pair * 2 + 1).copied();
            match (x, y) {
                (Some(x), Some(y)) if x.is_finite() && y.is_finite() => {
                    curve_points.push(CurvePoint::new(x, y));
                }
                _ => stats.dropped_points += 1,
            }
        }
        if end > available {
            stats.dropped_points += end - cursor.max(available);
        }
        cursor = end;

        if curve_points.len() < 2 {
            stats.short_curves += 1;
            continue;
        }

        let width = widths
            .get(i)
            .copied()
            .filter(|w| w.is_finite())
            .unwrap_or(DEFAULT_STROKE_WIDTH);
        let color = Rgba::from_packed_f64(colors.get(i).copied().unwrap_or(0.0));

        curves.push(Curve {
            points: curve_points,
            width,
            color,
        });
    }

    (curves, stats)
}
