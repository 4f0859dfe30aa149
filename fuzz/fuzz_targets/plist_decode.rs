//! Fuzz target for binary plist decoding.
//!
//! This fuzzer feeds arbitrary byte sequences to the plist decoder,
//! checking for panics, crashes, or hangs.

#![no_main]

use libfuzzer_sys::fuzz_target;
use notesketch::plist::decode;

fuzz_target!(|data: &[u8]| {
    if data.len() > 10 * 1024 * 1024 {
        return;
    }

    let _ = decode(data);
});
