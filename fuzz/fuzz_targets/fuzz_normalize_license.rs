#![no_main]
use formula_miner::model::{normalize_license, to_spdx_expression};
use libfuzzer_sys::fuzz_target;

/// Fuzz the license mini-language normalizer and its SPDX rendering.
fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        let normalized = normalize_license(s, "pseudo");
        let _ = to_spdx_expression(&normalized);
    }
});
