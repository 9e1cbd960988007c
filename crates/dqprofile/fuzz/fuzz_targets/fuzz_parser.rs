//! Fuzz target for the delimited-file parser and the profiler behind it.
//!
//! Any byte sequence must either fail with an error or produce a profile
//! whose fractions stay in range. Panics are bugs.

#![no_main]

use libfuzzer_sys::fuzz_target;
use dqprofile::{Parser, Profiler};
use std::io::Write;

fuzz_target!(|data: &[u8]| {
    // Only process reasonable-sized inputs to avoid OOM
    if data.len() > 100_000 {
        return;
    }

    // In-memory path with both common delimiters
    for delimiter in [b',', b'\t'] {
        if let Ok(dataset) = Parser::new().parse_bytes(data, delimiter) {
            let profile = Profiler::new().profile(&dataset, "fuzz");
            assert!((0.0..=1.0).contains(&profile.summary.complete_rows_pct));
            assert!((0.0..=1.0).contains(&profile.summary.duplicated_rows_pct));
        }
    }

    // File path with delimiter auto-detection
    if let Ok(mut temp_file) = tempfile::NamedTempFile::new() {
        if temp_file.write_all(data).is_ok() {
            let _ = Profiler::new().profile_file(temp_file.path(), None);
        }
    }
});
