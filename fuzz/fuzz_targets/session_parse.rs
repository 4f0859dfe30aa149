//! Fuzz target for session plist parsing.
//!
//! Runs decode, record lookup, curve assembly and path building on
//! arbitrary bytes.

#![no_main]

use libfuzzer_sys::fuzz_target;
use notesketch::note::fuzz_parse_session;

fuzz_target!(|data: &[u8]| {
    if data.len() > 10 * 1024 * 1024 {
        return;
    }

    let _ = fuzz_parse_session(data);
});
