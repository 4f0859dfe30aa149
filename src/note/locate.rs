//! Finding the stroke record inside a decoded session plist.

use tracing::debug;

use crate::plist::{Dict, NodeId, Plist, Value};

/// Deepest level the search descends to; the root is level 0.
pub const MAX_SEARCH_DEPTH: usize = 15;

/// Accepted spellings of each stroke field, tried in order.
pub mod keys {
    pub const POINTS: &[&str] = &["curvespoints", "curvesPoints", "CurvesPoints"];
    pub const NUM_POINTS: &[&str] = &["curvesnumpoints", "curvesNumPoints", "CurvesNumPoints"];
    pub const WIDTHS: &[&str] = &["curveswidth", "curvesWidth", "CurvesWidth"];
    pub const COLORS: &[&str] = &["curvescolors", "curvesColors", "CurvesColors"];
}

/// Returns the first dictionary, in depth-first order, that carries a
/// stroke points field.
///
/// Each node is inspected at most once, so shared sub-trees are not searched
/// twice.
pub fn find_curve_record(plist: &Plist) -> Option<&Dict> {
    let mut visited = vec![false; plist.len()];
    let mut stack: Vec<(NodeId, usize)> = vec![(plist.root(), 0)];

    while let Some((id, depth)) = stack.pop() {
        if depth > MAX_SEARCH_DEPTH || visited[id.index()] {
            continue;
        }
        visited[id.index()] = true;

        let value = plist.get(id);
        if let Value::Dict(dict) = value {
            if keys::POINTS.iter().any(|key| dict.contains_key(key)) {
                debug!(node = ?id, depth, entries = dict.len(), "found curve record");
                return Some(dict);
            }
        }

        // Reverse so the first child is popped first.
        for child in value.children().iter().rev() {
            if !visited[child.index()] {
                stack.push((*child, depth + 1));
            }
        }
    }

    debug!(nodes = plist.len(), "no curve record in plist");
    None
}

/// Returns the blob stored under the first present spelling of a field.
///
/// A present field whose value is not a data blob counts as absent.
pub fn field_bytes<'a>(plist: &'a Plist, record: &Dict, spellings: &[&str]) -> Option<&'a [u8]> {
    plist
        .lookup_first(record, spellings)
        .and_then(Value::as_bytes)
}
