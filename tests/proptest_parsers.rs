//! Property-based tests for the formula parsers.
//!
//! Ensures the field parser, the dependency walk and the license
//! normalizer don't panic on arbitrary input, and that a few structural
//! properties hold for generated dependency blocks.

use formula_miner::model::normalize_license;
use formula_miner::parsers::{extract_source_formula, tokenize, walk, ExtractOptions};
use proptest::prelude::*;

/// Lines drawn from the formula DSL vocabulary, with some noise.
fn dsl_line() -> impl Strategy<Value = String> {
    prop_oneof![
        "[a-z]{1,8}".prop_map(|n| format!("  depends_on \"{n}\"")),
        "[a-z]{1,8}".prop_map(|n| format!("    depends_on \"{n}\" => :build")),
        "[a-z]{1,8}".prop_map(|n| format!("  uses_from_macos \"{n}\", since: :ventura")),
        Just("  on_linux do".to_string()),
        Just("  on_macos do".to_string()),
        Just("    on_arm do".to_string()),
        Just("  on_sonoma :or_newer do".to_string()),
        Just("  on_system :linux, macos: :big_sur_or_older do".to_string()),
        Just("  if DevelopmentTools.clang_build_version <= 1400".to_string()),
        Just("  fails_with :gcc do".to_string()),
        Just("  resource \"x\" do".to_string()),
        Just("  depends_on macos: :catalina".to_string()),
        Just("  depends_on :linux".to_string()),
        Just("  end".to_string()),
        Just("    end".to_string()),
        Just("end".to_string()),
        Just(String::new()),
        "\\PC{0,40}",
    ]
}

proptest! {
    // Parser tests only assert no-panic; random input is expected to fail
    // extraction in almost all cases.
    #![proptest_config(ProptestConfig::with_cases(500))]

    #[test]
    fn extract_doesnt_panic(s in "\\PC{0,2000}") {
        let _ = extract_source_formula("fuzz", &s, &ExtractOptions::default());
    }

    #[test]
    fn extract_dsl_like_input_doesnt_panic(lines in prop::collection::vec(dsl_line(), 0..60)) {
        let mut content = String::from("class Fuzz < Formula\n  url \"https://example.org/f.tgz\"\n");
        content.push_str(&lines.join("\n"));
        content.push_str("\nend\n");
        let result = extract_source_formula("fuzz", &content, &ExtractOptions::default());
        prop_assert!(result.is_ok(), "stable url present, extraction should succeed");
    }

    #[test]
    fn walk_doesnt_panic(
        lines in prop::collection::vec(dsl_line(), 0..80),
        tolerance in 0usize..4,
    ) {
        let tokens = tokenize(lines.iter().map(String::as_str));
        let _ = walk(&tokens, tolerance);
    }

    #[test]
    fn walk_keeps_one_record_per_identity(names in prop::collection::vec("[a-c]", 1..30)) {
        let lines: Vec<String> = names
            .iter()
            .enumerate()
            .flat_map(|(i, n)| {
                let opener = if i % 2 == 0 { "  on_linux do" } else { "  on_macos do" };
                vec![opener.to_string(), format!("    depends_on \"{n}\""), "  end".to_string()]
            })
            .collect();
        let outcome = walk(&tokenize(lines.iter().map(String::as_str)), 1);

        let mut distinct = names.clone();
        distinct.sort();
        distinct.dedup();
        prop_assert_eq!(outcome.dependencies.list.len(), distinct.len());
        prop_assert!(outcome.warnings.is_empty());
    }

    #[test]
    fn normalize_license_doesnt_panic(s in "\\PC{0,500}") {
        let _ = normalize_license(&s, "pseudo");
    }

    #[test]
    fn normalize_license_bracket_soup_doesnt_panic(
        s in prop::string::string_regex(r#"[\[\]{}:,"=> a-zA-Z0-9.-]{0,200}"#).unwrap()
    ) {
        let _ = normalize_license(&s, "pseudo");
    }

    #[test]
    fn normalize_license_never_returns_empty(s in "\\PC{0,200}") {
        prop_assert!(!normalize_license(&s, "pseudo").is_empty());
    }
}
