#![no_main]
use formula_miner::model::{Formula, ResolveOptions};
use formula_miner::parsers::{extract_source_formula, ExtractOptions};
use libfuzzer_sys::fuzz_target;

/// Fuzz single-file extraction.
///
/// Feeds arbitrary UTF-8 text through the field parser, the dependency
/// walk and resolution. Errors are expected; panics are not.
fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        if let Ok(source) = extract_source_formula("fuzz", s, &ExtractOptions::default()) {
            let _ = Formula::from_source(source, &ResolveOptions::default());
        }
    }
});
