//! Fuzz target for whole `.note` archives.

#![no_main]

use libfuzzer_sys::fuzz_target;
use notesketch::note::parse_note_bytes;

fuzz_target!(|data: &[u8]| {
    if data.len() > 10 * 1024 * 1024 {
        return;
    }

    let _ = parse_note_bytes(data);
});
