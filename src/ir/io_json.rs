//! JSON serialization for decoded notes.
//!
//! This is a plain dump of [`NoteDocument`], useful for:
//! - Feeding strokes to tools that do their own rendering
//! - Debugging parses by inspecting the decoded curves
//! - Diffing two versions of the same note

use std::fs;
use std::path::Path;

use super::model::NoteDocument;
use crate::error::NoteError;

/// Writes a note document as pretty-printed JSON.
///
/// # Errors
/// Returns an error if the file cannot be created or written.
pub fn write_document_json(path: &Path, document: &NoteDocument) -> Result<(), NoteError> {
    let json = to_json_string(document)?;
    fs::write(path, json).map_err(|source| NoteError::Output {
        path: path.to_path_buf(),
        message: source.to_string(),
    })
}

/// Reads a note document from a JSON string.
pub fn from_json_str(json: &str) -> Result<NoteDocument, serde_json::Error> {
    serde_json::from_str(json)
}

/// Writes a note document to a pretty-printed JSON string.
pub fn to_json_string(document: &NoteDocument) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(document)
}
