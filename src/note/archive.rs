//! Pulling the session plist out of a `.note` zip container.

use std::io::{Cursor, Read};

use tracing::debug;
use zip::ZipArchive;

use crate::error::NoteError;

/// File name of the session entry, compared case-insensitively.
pub const SESSION_ENTRY: &str = "session.plist";

/// Largest session entry read out of an archive, after decompression.
pub const MAX_SESSION_BYTES: u64 = 256 * 1024 * 1024;

/// Returns the bytes of the first entry named `session.plist` (or ending in
/// it, in any case) in archive order.
///
/// # Errors
/// Returns [`NoteError::Archive`] if `bytes` is not a readable zip archive,
/// [`NoteError::MissingEntry`], listing every entry name, if no entry
/// matches, and [`NoteError::EntryTooLarge`] if the entry inflates past
/// [`MAX_SESSION_BYTES`].
pub fn read_session_plist(bytes: &[u8]) -> Result<Vec<u8>, NoteError> {
    read_session_plist_limited(bytes, MAX_SESSION_BYTES)
}

fn read_session_plist_limited(bytes: &[u8], limit: u64) -> Result<Vec<u8>, NoteError> {
    let mut archive = ZipArchive::new(Cursor::new(bytes))?;

    let mut entries = Vec::with_capacity(archive.len());
    let mut found = None;
    for index in 0..archive.len() {
        let Some(name) = archive.name_for_index(index) else {
            continue;
        };
        if is_session_entry(name) {
            found = Some(index);
            break;
        }
        entries.push(name.to_string());
    }

    let Some(index) = found else {
        return Err(NoteError::MissingEntry { entries });
    };

    let mut entry = archive.by_index(index)?;
    debug!(
        entry = entry.name(),
        compressed = entry.compressed_size(),
        size = entry.size(),
        "reading session entry"
    );
    if entry.size() > limit {
        return Err(NoteError::EntryTooLarge {
            name: entry.name().to_string(),
            limit,
        });
    }

    // The declared size is not trusted; the read itself is capped too.
    let mut contents = Vec::with_capacity(entry.size() as usize);
    entry.by_ref().take(limit + 1).read_to_end(&mut contents)?;
    if contents.len() as u64 > limit {
        return Err(NoteError::EntryTooLarge {
            name: entry.name().to_string(),
            limit,
        });
    }
    Ok(contents)
}

fn is_session_entry(name: &str) -> bool {
    name.to_ascii_lowercase().ends_with(SESSION_ENTRY)
}
