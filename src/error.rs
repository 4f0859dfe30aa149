use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while decoding a binary property list.
///
/// Offsets are byte positions in the plist buffer.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum FormatError {
    #[error("not a binary plist (missing 'bplist00' header)")]
    BadMagic,

    #[error("truncated plist: needed {needed} byte(s) at offset {offset}")]
    Truncated { offset: usize, needed: usize },

    #[error("unsupported object marker 0x{marker:02X} at offset {offset}")]
    UnsupportedTag { marker: u8, offset: usize },

    #[error("invalid plist trailer: {0}")]
    InvalidTrailer(String),

    #[error("plist nesting deeper than {limit} objects")]
    NestingTooDeep { limit: usize },
}

/// The main error type for notesketch operations.
#[derive(Debug, Error)]
pub enum NoteError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to read note archive: {source}")]
    Archive {
        #[source]
        source: zip::result::ZipError,
    },

    #[error("No session.plist entry in archive (found: {})", format_entries(.entries))]
    MissingEntry { entries: Vec<String> },

    #[error("Session entry {name} is larger than {limit} bytes")]
    EntryTooLarge { name: String, limit: u64 },

    #[error("Malformed session plist: {0}")]
    Plist(#[from] FormatError),

    #[error("No curve data found in note")]
    NoCurveData,

    #[error("Failed to write {path}: {message}")]
    Output { path: PathBuf, message: String },

    #[error("Failed to serialize note as JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    #[error("Invalid usage: {0}")]
    Usage(String),

    #[error("{failed} of {total} note(s) could not be converted")]
    BatchFailed { failed: usize, total: usize },
}

/// Flat classification of every [`NoteError`], for diagnostics.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    BadMagic,
    Truncated,
    UnsupportedTag,
    InvalidTrailer,
    NestingTooDeep,
    MissingEntry,
    EntryTooLarge,
    NoCurveData,
    Archive,
    Io,
    Output,
    UnsupportedFormat,
    Usage,
    BatchFailed,
}

impl NoteError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            NoteError::Io(_) => ErrorKind::Io,
            NoteError::Archive { .. } => ErrorKind::Archive,
            NoteError::MissingEntry { .. } => ErrorKind::MissingEntry,
            NoteError::EntryTooLarge { .. } => ErrorKind::EntryTooLarge,
            NoteError::Plist(err) => match err {
                FormatError::BadMagic => ErrorKind::BadMagic,
                FormatError::Truncated { .. } => ErrorKind::Truncated,
                FormatError::UnsupportedTag { .. } => ErrorKind::UnsupportedTag,
                FormatError::InvalidTrailer(_) => ErrorKind::InvalidTrailer,
                FormatError::NestingTooDeep { .. } => ErrorKind::NestingTooDeep,
            },
            NoteError::NoCurveData => ErrorKind::NoCurveData,
            NoteError::Output { .. } | NoteError::Json(_) => ErrorKind::Output,
            NoteError::UnsupportedFormat(_) => ErrorKind::UnsupportedFormat,
            NoteError::Usage(_) => ErrorKind::Usage,
            NoteError::BatchFailed { .. } => ErrorKind::BatchFailed,
        }
    }
}

impl From<zip::result::ZipError> for NoteError {
    fn from(source: zip::result::ZipError) -> Self {
        NoteError::Archive { source }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ErrorKind::BadMagic => "bad-magic",
            ErrorKind::Truncated => "truncated",
            ErrorKind::UnsupportedTag => "unsupported-tag",
            ErrorKind::InvalidTrailer => "invalid-trailer",
            ErrorKind::NestingTooDeep => "nesting-too-deep",
            ErrorKind::MissingEntry => "missing-entry",
            ErrorKind::EntryTooLarge => "entry-too-large",
            ErrorKind::NoCurveData => "no-curve-data",
            ErrorKind::Archive => "archive",
            ErrorKind::Io => "io",
            ErrorKind::Output => "output",
            ErrorKind::UnsupportedFormat => "unsupported-format",
            ErrorKind::Usage => "usage",
            ErrorKind::BatchFailed => "batch-failed",
        };
        f.write_str(name)
    }
}

fn format_entries(entries: &[String]) -> String {
    if entries.is_empty() {
        "no entries".to_string()
    } else {
        entries.join(", ")
    }
}
