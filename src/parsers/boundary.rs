//! Sequence boundary predicates.
//!
//! Each multi-line construct is delimited by a pair of pure predicates over
//! raw lines. The field parser calls the begin predicate on lines outside
//! any open construct and the end predicate on every line after it.

use super::patterns::{
    strip_comment, HEAD, HEAD_BEGIN, LICENSE_KEYWORD, STABLE_BEGIN, TOP_LEVEL_END, URL,
};

/// Statements that can open the top-level dependency section.
const DEPENDENCY_OPENERS: &[&str] = &["depends_on", "uses_from_macos"];

/// Additional top-level statements that keep the dependency section open.
const DEPENDENCY_SECTION: &[&str] = &[
    "depends_on",
    "uses_from_macos",
    "fails_with",
    "resource",
    "patch",
    "conflicts_with",
    "end",
];

// ============================================================================
// Line helpers
// ============================================================================

/// Indentation width, counting a tab as two spaces.
#[must_use]
pub fn indentation(line: &str) -> usize {
    line.chars()
        .take_while(|c| c.is_whitespace())
        .map(|c| if c == '\t' { 2 } else { 1 })
        .sum()
}

/// First identifier of a statement (`depends_on`, `on_linux`, ...).
fn keyword(line: &str) -> &str {
    let trimmed = line.trim_start();
    let end = trimmed
        .find(|c: char| !(c.is_alphanumeric() || c == '_'))
        .unwrap_or(trimmed.len());
    &trimmed[..end]
}

fn has_trailing_comma(line: &str) -> bool {
    strip_comment(line).ends_with(',')
}

/// Opening minus closing bracket characters (`[`/`{` vs `]`/`}`).
fn bracket_balance(line: &str) -> i64 {
    strip_comment(line).chars().fold(0, |acc, c| match c {
        '[' | '{' => acc + 1,
        ']' | '}' => acc - 1,
        _ => acc,
    })
}

// ============================================================================
// Stable URL
// ============================================================================

/// Top-level `url "..."` continued on the next line by a trailing comma.
#[must_use]
pub fn url_begins(line: &str) -> bool {
    URL.is_match(line) && has_trailing_comma(line)
}

/// `head "..."` continued on the next line by a trailing comma.
#[must_use]
pub fn head_statement_begins(line: &str) -> bool {
    HEAD.is_match(line) && has_trailing_comma(line)
}

/// First continuation line without a trailing comma.
#[must_use]
pub fn url_ends(line: &str) -> bool {
    !has_trailing_comma(line)
}

// ============================================================================
// Stable / head blocks
// ============================================================================

#[must_use]
pub fn stable_begins(line: &str) -> bool {
    STABLE_BEGIN.is_match(line)
}

#[must_use]
pub fn head_begins(line: &str) -> bool {
    HEAD_BEGIN.is_match(line)
}

/// `end` at top-level indentation, with or without a trailing comment.
#[must_use]
pub fn block_ends(line: &str) -> bool {
    TOP_LEVEL_END.is_match(strip_comment(line))
}

// ============================================================================
// License
// ============================================================================

/// `license` statement with unclosed brackets.
#[must_use]
pub fn license_begins(line: &str) -> bool {
    LICENSE_KEYWORD.is_match(line) && bracket_balance(line) > 0
}

/// Line closing more brackets than it opens, without continuing past a comma.
#[must_use]
pub fn license_ends(line: &str) -> bool {
    bracket_balance(line) < 0 && !has_trailing_comma(line)
}

// ============================================================================
// Dependency section
// ============================================================================

/// First top-level dependency statement or conditional block.
#[must_use]
pub fn dependency_begins(line: &str) -> bool {
    if indentation(line) != 2 {
        return false;
    }
    let word = keyword(line);
    DEPENDENCY_OPENERS.contains(&word) || word.starts_with("on_")
}

/// Shallow statement outside the dependency vocabulary.
///
/// Anything at column zero closes the section. Blank lines, comments and
/// anything nested deeper than top level keep it open.
#[must_use]
pub fn dependency_ends(line: &str) -> bool {
    let code = strip_comment(line);
    if code.trim().is_empty() || indentation(code) > 2 {
        return false;
    }
    if indentation(code) < 2 {
        return true;
    }
    let word = keyword(code);
    !(DEPENDENCY_SECTION.contains(&word) || word.starts_with("on_"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_indentation() {
        assert_eq!(indentation("  depends_on"), 2);
        assert_eq!(indentation("\tdepends_on"), 2);
        assert_eq!(indentation("    url"), 4);
        assert_eq!(indentation("end"), 0);
    }

    #[test]
    fn test_url_boundaries() {
        assert!(url_begins(r#"  url "https://github.com/foo/bar.git","#));
        assert!(url_begins(r#"  url "https://github.com/foo/bar.git", tag: "v1","#));
        assert!(!url_begins(r#"  url "https://example.org/foo.tgz""#));
        assert!(!url_ends(r#"      tag:      "v1.0","#));
        assert!(url_ends(r#"      revision: "abc123""#));
    }

    #[test]
    fn test_block_boundaries() {
        assert!(stable_begins("  stable do"));
        assert!(!stable_begins("    stable do"));
        assert!(head_begins("  head do"));
        assert!(block_ends("  end"));
        assert!(block_ends("  end # stable"));
        assert!(!block_ends("    end"));
        assert!(!block_ends("    end # resource"));
    }

    #[test]
    fn test_head_statement_boundaries() {
        assert!(head_statement_begins(r#"  head "https://github.com/foo/bar.git","#));
        assert!(!head_statement_begins(r#"  head "https://github.com/foo/bar.git", branch: "main""#));
        assert!(!head_statement_begins("  head do"));
    }

    #[test]
    fn test_license_boundaries() {
        assert!(license_begins("  license any_of: ["));
        assert!(!license_begins(r#"  license any_of: ["MIT", "BSD"]"#));
        assert!(!license_begins("  license_file = 1 ["));
        assert!(license_ends("  ]"));
        assert!(!license_ends("    ],"));
        assert!(!license_ends(r#"    "MIT","#));
    }

    #[test]
    fn test_dependency_boundaries() {
        assert!(dependency_begins(r#"  depends_on "cmake" => :build"#));
        assert!(dependency_begins(r#"  uses_from_macos "zlib""#));
        assert!(dependency_begins("  on_linux do"));
        assert!(!dependency_begins(r#"    depends_on "gcc""#));
        assert!(!dependency_begins("  livecheck do"));

        assert!(!dependency_ends(""));
        assert!(!dependency_ends("  # comment"));
        assert!(!dependency_ends(r#"    url "https://example.org/six.tgz""#));
        assert!(!dependency_ends(r#"  fails_with :gcc do"#));
        assert!(!dependency_ends("  end"));
        assert!(dependency_ends("  def install"));
        assert!(dependency_ends("end"));
    }
}
