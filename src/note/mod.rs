//! `.note` session parsing.
//!
//! A `.note` file is a zip archive whose `Session.plist` entry is a binary
//! keyed archive. Somewhere inside it sits one dictionary holding four data
//! blobs that describe every stroke:
//!
//! | field             | element   | meaning                          |
//! |-------------------|-----------|----------------------------------|
//! | `curvespoints`    | `f32` LE  | interleaved x, y of all points   |
//! | `curvesnumpoints` | `i32` LE  | point count of each curve        |
//! | `curveswidth`     | `f32` LE  | stroke width of each curve       |
//! | `curvescolors`    | `i32` LE  | packed RGBA of each curve        |
//!
//! Field names come in several casings depending on the producing version;
//! see [`keys`].
//!
//! # Pipeline
//!
//! archive bytes -> [`archive::read_session_plist`] -> [`crate::plist::decode`]
//! -> [`find_curve_record`] -> [`decode_typed_array`] -> [`assemble_curves`]
//! -> [`NoteDocument`].

pub mod archive;
mod arrays;
mod assemble;
mod locate;

pub use arrays::{decode_typed_array, ElementKind};
pub use assemble::{assemble_curves, assemble_with_stats, AssemblyStats};
pub use locate::{field_bytes, find_curve_record, keys, MAX_SEARCH_DEPTH};

use std::fs;
use std::path::Path;

use tracing::{debug, instrument};

use crate::error::NoteError;
use crate::geometry;
use crate::ir::NoteDocument;
use crate::plist;

/// The four stroke arrays of a curve record, decoded to `f64`.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CurveArrays {
    pub points: Vec<f64>,
    pub counts: Vec<f64>,
    pub widths: Vec<f64>,
    pub colors: Vec<f64>,
}

/// Reads and parses a `.note` file from disk.
pub fn read_note_file(path: &Path) -> Result<NoteDocument, NoteError> {
    let bytes = fs::read(path).map_err(NoteError::Io)?;
    parse_note_bytes(&bytes)
}

/// Parses the raw bytes of a `.note` zip archive.
///
/// # Errors
/// Any archive, plist or curve error; there is no partial result.
#[instrument(skip(bytes), fields(len = bytes.len()))]
pub fn parse_note_bytes(bytes: &[u8]) -> Result<NoteDocument, NoteError> {
    let session = archive::read_session_plist(bytes)?;
    parse_session_plist(&session)
}

/// Parses the bytes of a session plist that was already extracted.
pub fn parse_session_plist(bytes: &[u8]) -> Result<NoteDocument, NoteError> {
    let plist = plist::decode(bytes)?;
    let arrays = extract_curve_arrays(&plist)?;
    debug!(
        points = arrays.points.len() / 2,
        curves = arrays.counts.len(),
        "decoded curve arrays"
    );

    let curves = assemble_curves(&arrays.points, &arrays.counts, &arrays.widths, &arrays.colors)?;
    let (width, height) = geometry::canvas_size(&curves);

    Ok(NoteDocument {
        curves,
        width,
        height,
    })
}

/// Fuzz-only entrypoint running a session plist through parsing and path
/// building.
#[cfg(feature = "fuzzing")]
pub fn fuzz_parse_session(bytes: &[u8]) -> Result<(), NoteError> {
    let document = parse_session_plist(bytes)?;
    for curve in &document.curves {
        let _ = crate::path::build_stroke(curve);
    }
    Ok(())
}

/// Locates the curve record and decodes its four arrays.
///
/// # Errors
/// Returns [`NoteError::NoCurveData`] if no record exists.
pub fn extract_curve_arrays(plist: &plist::Plist) -> Result<CurveArrays, NoteError> {
    let record = find_curve_record(plist).ok_or(NoteError::NoCurveData)?;
    let field = |spellings: &[&str], kind| {
        field_bytes(plist, record, spellings)
            .map(|blob| decode_typed_array(blob, kind))
            .unwrap_or_default()
    };

    Ok(CurveArrays {
        points: field(keys::POINTS, ElementKind::Float32),
        counts: field(keys::NUM_POINTS, ElementKind::Int32),
        widths: field(keys::WIDTHS, ElementKind::Float32),
        colors: field(keys::COLORS, ElementKind::Int32),
    })
}
