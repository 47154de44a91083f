//! License expression normalization.
//!
//! Formula files spell licenses as a small bracketed mini-language:
//!
//! ```text
//! license all_of: ["MIT", any_of: ["Apache-2.0", "BSD-3-Clause"]]
//! license "GPL-3.0-or-later" => { with: "GCC-exception-3.1" }
//! license :public_domain
//! ```
//!
//! [`normalize_license`] flattens these into an infix string such as
//! `MIT and (Apache-2.0 or BSD-3-Clause)`. [`to_spdx_expression`] goes one
//! step further and renders the result with SPDX operators when the `spdx`
//! crate accepts it.

use regex::Regex;
use std::sync::LazyLock;

/// Exception hash `=>{with:X}` after spaces and quotes are removed.
static EXCEPTION_HASH: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"=>\{with:([-.\w]+)\}").expect("static regex"));

/// Marker left behind by [`EXCEPTION_HASH`] rewriting.
const EXCEPTION_MARKER: &str = "=>with:";

/// Brace cleanup applied before scanning, in priority order.
const BRACE_CLEANUP: &[(&str, &str)] = &[(",{", ","), ("]}", "]"), (",}", "}"), ("}", "")];

/// Token canonicalization applied after scanning, in priority order.
const CANONICAL_TOKENS: &[(&str, &str)] = &[
    (":public_domain", "Public Domain"),
    (":cannot_represent", "Cannot Represent"),
    ("=>", " "),
    (":", " "),
    ("{", ""),
    ("}", ""),
];

/// Normalize a raw license expression into a flat infix string.
///
/// Returns `fallback` for an empty or blank expression.
#[must_use]
pub fn normalize_license(raw: &str, fallback: &str) -> String {
    let compact: String = raw.chars().filter(|c| *c != ' ' && *c != '"').collect();
    if compact.trim().is_empty() {
        return fallback.to_string();
    }

    let compact = EXCEPTION_HASH.replace_all(&compact, "=>with:$1");
    let compact = replace_ordered(&compact, BRACE_CLEANUP);

    let flat = LicenseScanner::default().scan(&compact);
    let normalized = replace_ordered(&flat, CANONICAL_TOKENS);
    let normalized = normalized.trim();

    if normalized.is_empty() {
        fallback.to_string()
    } else {
        normalized.to_string()
    }
}

/// Render a normalized license as an SPDX expression, if it is one.
///
/// `A and (B or C)` becomes `A AND (B OR C)`; exception clauses become
/// `WITH`. Returns `None` when the `spdx` crate rejects the result, which
/// is the case for `Public Domain`, `pseudo` and other non-SPDX names.
#[must_use]
pub fn to_spdx_expression(normalized: &str) -> Option<String> {
    let candidate = normalized
        .replace(" and ", " AND ")
        .replace(" or ", " OR ")
        .replace(" with ", " WITH ");
    spdx::Expression::parse_mode(&candidate, spdx::ParseMode::LAX)
        .ok()
        .map(|_| candidate)
}

/// Single-pass multi-pattern replacement.
///
/// At each position the first pattern in `pairs` that matches wins and
/// scanning continues after the replaced text, so replacements never feed
/// into each other.
fn replace_ordered(input: &str, pairs: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(input.len());
    let mut rest = input;
    'outer: while !rest.is_empty() {
        for (from, to) in pairs {
            if let Some(tail) = rest.strip_prefix(from) {
                out.push_str(to);
                rest = tail;
                continue 'outer;
            }
        }
        let mut chars = rest.chars();
        if let Some(c) = chars.next() {
            out.push(c);
        }
        rest = chars.as_str();
    }
    out
}

// ============================================================================
// Scanner
// ============================================================================

/// One open `[` group.
#[derive(Debug)]
struct Group {
    /// Joiner for siblings at this level (`" and "` / `" or "`)
    op: &'static str,
    /// Whether an element has already been written at this level
    written: bool,
}

/// Left-to-right scanner state.
#[derive(Debug, Default)]
struct LicenseScanner {
    out: String,
    word: String,
    sequence: Vec<String>,
    groups: Vec<Group>,
}

impl LicenseScanner {
    fn scan(mut self, input: &str) -> String {
        for c in input.chars() {
            match c {
                ',' => self.flush_word(),
                '[' => self.open(),
                ']' => self.close(),
                _ => self.word.push(c),
            }
        }

        // Tolerate missing closing brackets.
        while !self.groups.is_empty() {
            self.close();
        }

        if self.out.is_empty() {
            std::mem::take(&mut self.word)
        } else {
            self.out.push_str(&self.word);
            self.out
        }
    }

    /// Move the pending word into the sibling sequence.
    fn flush_word(&mut self) {
        if self.word.is_empty() {
            return;
        }
        let word = std::mem::take(&mut self.word);
        if self.groups.is_empty() {
            // A bare top-level list without an operator keyword.
            self.word = word;
            return;
        }
        if word.contains(EXCEPTION_MARKER) {
            self.sequence.push(format!("({word})"));
        } else {
            self.sequence.push(word);
        }
    }

    /// Write pending siblings of the innermost group to the output.
    fn flush_sequence(&mut self) {
        let Some(group) = self.groups.last_mut() else {
            self.sequence.clear();
            return;
        };
        for item in self.sequence.drain(..) {
            if group.written {
                self.out.push_str(group.op);
            }
            self.out.push_str(&item);
            group.written = true;
        }
    }

    fn open(&mut self) {
        let keyword = std::mem::take(&mut self.word);
        let op = match keyword.as_str() {
            "all_of:" => " and ",
            // any_of and one_of both mean a choice between alternatives
            _ => " or ",
        };

        self.flush_sequence();
        if let Some(parent) = self.groups.last_mut() {
            if parent.written {
                self.out.push_str(parent.op);
            }
            parent.written = true;
            self.out.push('(');
        }
        self.groups.push(Group { op, written: false });
    }

    fn close(&mut self) {
        self.flush_word();
        self.flush_sequence();
        self.groups.pop();
        if !self.groups.is_empty() {
            self.out.push(')');
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FALLBACK: &str = "pseudo";

    #[test]
    fn test_single_license() {
        assert_eq!(normalize_license(r#""MIT""#, FALLBACK), "MIT");
        assert_eq!(normalize_license(r#""MPL-2.0""#, FALLBACK), "MPL-2.0");
    }

    #[test]
    fn test_all_of() {
        assert_eq!(
            normalize_license(r#"all_of: ["A", "B"]"#, FALLBACK),
            "A and B"
        );
    }

    #[test]
    fn test_any_of_and_one_of() {
        assert_eq!(
            normalize_license(r#"any_of: ["A", "B", "C"]"#, FALLBACK),
            "A or B or C"
        );
        assert_eq!(
            normalize_license(r#"one_of: ["A", "B"]"#, FALLBACK),
            "A or B"
        );
    }

    #[test]
    fn test_nested_group() {
        assert_eq!(
            normalize_license(r#"all_of: ["A", any_of: ["B", "C"]]"#, FALLBACK),
            "A and (B or C)"
        );
    }

    #[test]
    fn test_nested_group_first() {
        assert_eq!(
            normalize_license(r#"any_of: [all_of: ["A", "B"], "C"]"#, FALLBACK),
            "(A and B) or C"
        );
    }

    #[test]
    fn test_two_nested_groups() {
        assert_eq!(
            normalize_license(
                r#"all_of: [any_of: ["A", "B"], any_of: ["C", "D"]]"#,
                FALLBACK
            ),
            "(A or B) and (C or D)"
        );
    }

    #[test]
    fn test_exception_clause() {
        assert_eq!(
            normalize_license(
                r#""GPL-3.0-or-later" => { with: "GCC-exception-3.1" }"#,
                FALLBACK
            ),
            "GPL-3.0-or-later with GCC-exception-3.1"
        );
    }

    #[test]
    fn test_exception_clause_in_group() {
        assert_eq!(
            normalize_license(
                r#"all_of: ["MIT", { "GPL-2.0-only" => { with: "Linux-syscall-note" } }]"#,
                FALLBACK
            ),
            "MIT and (GPL-2.0-only with Linux-syscall-note)"
        );
    }

    #[test]
    fn test_symbols() {
        assert_eq!(normalize_license(":public_domain", FALLBACK), "Public Domain");
        assert_eq!(
            normalize_license(":cannot_represent", FALLBACK),
            "Cannot Represent"
        );
        assert_eq!(
            normalize_license(r#"any_of: [:public_domain, "MIT"]"#, FALLBACK),
            "Public Domain or MIT"
        );
    }

    #[test]
    fn test_multi_line_joined_input() {
        // Lines of a multi-line license block are joined before normalizing.
        let raw = r#"any_of: ["GPL-2.0-only","LGPL-2.1-only","MPL-1.1",]"#;
        assert_eq!(
            normalize_license(raw, FALLBACK),
            "GPL-2.0-only or LGPL-2.1-only or MPL-1.1"
        );
    }

    #[test]
    fn test_empty_uses_fallback() {
        assert_eq!(normalize_license("", FALLBACK), "pseudo");
        assert_eq!(normalize_license("   ", "unknown"), "unknown");
    }

    #[test]
    fn test_missing_close_bracket_is_tolerated() {
        assert_eq!(
            normalize_license(r#"any_of: ["A", "B""#, FALLBACK),
            "A or B"
        );
    }

    #[test]
    fn test_replace_ordered_does_not_chain() {
        assert_eq!(replace_ordered("a,}b", BRACE_CLEANUP), "a}b");
        assert_eq!(replace_ordered("x]}", BRACE_CLEANUP), "x]");
    }

    #[test]
    fn test_to_spdx_expression() {
        assert_eq!(
            to_spdx_expression("MIT and (Apache-2.0 or BSD-3-Clause)").as_deref(),
            Some("MIT AND (Apache-2.0 OR BSD-3-Clause)")
        );
        assert_eq!(
            to_spdx_expression("GPL-3.0-or-later with GCC-exception-3.1").as_deref(),
            Some("GPL-3.0-or-later WITH GCC-exception-3.1")
        );
        assert_eq!(to_spdx_expression("Public Domain"), None);
    }
}
