//! Regular expressions for the recognized formula statements.
//!
//! Patterns anchored with `(?:\s{2}|\t)` only match statements at formula
//! top level; block-scoped statements (inside `stable do`, `head do`, ...)
//! use an open leading-whitespace match.

use regex::Regex;
use std::sync::LazyLock;

macro_rules! pattern {
    ($(#[$meta:meta])* $name:ident, $re:expr) => {
        $(#[$meta])*
        pub static $name: LazyLock<Regex> =
            LazyLock::new(|| Regex::new($re).expect("static regex"));
    };
}

// ============================================================================
// Top-level fields
// ============================================================================

pattern!(HOMEPAGE, r#"^\s*homepage\s+"([^"]+)""#);
pattern!(URL, r#"^(?:\s{2}|\t)url\s+"([^"]+)""#);
pattern!(
    /// `url` line inside a `stable do` / `head do` block
    BLOCK_URL,
    r#"^\s+url\s+"([^"]+)""#
);
pattern!(MIRROR, r#"^(?:\s{2}|\t)mirror\s+"([^"]+)""#);
pattern!(
    /// Whole single-line license expression, without a trailing comment
    LICENSE,
    r#"^\s+license\s+([^#]+?)\s*(?:#.*)?$"#
);
pattern!(LICENSE_KEYWORD, r"^\s+license\b");
pattern!(HEAD, r#"^\s*head\s+"([^"]+)""#);
pattern!(USING, r"using:\s*:(\w+)");
pattern!(BRANCH, r#"branch:\s*"([^"]+)""#);
pattern!(TAG, r#"tag:\s*"([^"]+)""#);

// ============================================================================
// Block markers
// ============================================================================

pattern!(STABLE_BEGIN, r"^(?:\s{2}|\t)stable\s+do\s*$");
pattern!(HEAD_BEGIN, r"^(?:\s{2}|\t)head\s+do\s*$");
pattern!(
    /// `end` closing a top-level block
    TOP_LEVEL_END,
    r"^(?:\s{2}|\t)end\s*$"
);
pattern!(GENERIC_END, r"^\s*end\s*$");
pattern!(
    /// Line ending in `do` or `do |args|`
    DO_OPENER,
    r"\bdo\s*(?:\|[^|]*\|)?\s*$"
);
pattern!(
    /// Ruby keywords that open a block closed by `end`
    KEYWORD_OPENER,
    r"^\s*(?:if|unless|case|begin|while|until)\b"
);

// ============================================================================
// Dependency statements
// ============================================================================

pattern!(DEPENDS_ON, r#"^\s*depends_on\s+"([^"]+)""#);
pattern!(USES_FROM_MACOS, r#"^\s*uses_from_macos\s+"([^"]+)""#);
pattern!(
    /// Right-hand side of `=>`: a symbol or a bracketed symbol list
    DEP_TYPES,
    r"=>\s*(\[[^\]]*\]|:\w+)"
);
pattern!(SYMBOL, r":(\w+)");
pattern!(SINCE, r"since:\s*:(\w+)");
pattern!(
    CLANG_VERSION,
    r"DevelopmentTools\.clang_build_version\s*([<>=!]+)\s*(\d+)"
);
pattern!(
    /// `depends_on :linux`, `depends_on macos: :catalina`, `depends_on xcode: ["12.0", :build]`
    REQUIREMENT,
    r"^\s*depends_on\s+(:\w+|\w+:)\s*(.*?)\s*$"
);

// ============================================================================
// Conditional blocks
// ============================================================================

pattern!(ON_SYSTEM, r"^\s*on_system\b.*\bdo\b");
pattern!(ON_SYSTEM_MACOS, r"macos:\s*:(\w+)");
pattern!(
    /// `on_linux do`, `on_arm do`, `on_ventura :or_newer do`, ...
    ON_BLOCK,
    r"^\s*on_(\w+)(?:\s+:or_(newer|older))?\s+do\b"
);
pattern!(
    /// `if DevelopmentTools.clang_build_version <= 1400`
    IF_CLANG,
    r"^\s*if\s+.*DevelopmentTools\.clang_build_version"
);
pattern!(
    /// `resource "x" do`, `patch do`, `patch :p1 do`
    SKIP_BEGIN,
    r"^\s*(?:resource\b.*|patch\b.*)\bdo\s*(?:\|[^|]*\|)?\s*$"
);

// ============================================================================
// Interpolation
// ============================================================================

pattern!(INTERPOLATION, r"#\{(\w+)\}");

/// Pattern for `var = "value"` or a `var "value"` DSL call.
pub fn assignment_pattern(var: &str) -> Option<Regex> {
    Regex::new(&format!(r#"^\s*{}\s*(?:=\s*)?"([^"]*)""#, regex::escape(var))).ok()
}

/// Strip a trailing `# comment`, ignoring `#` inside string literals.
#[must_use]
pub fn strip_comment(line: &str) -> &str {
    let mut in_string = false;
    let mut escaped = false;
    for (i, c) in line.char_indices() {
        match c {
            _ if escaped => escaped = false,
            '\\' if in_string => escaped = true,
            '"' => in_string = !in_string,
            '#' if !in_string => return line[..i].trim_end(),
            _ => {}
        }
    }
    line.trim_end()
}
