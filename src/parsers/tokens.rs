//! Tokenizer for dependency statements and the blocks that scope them.
//!
//! Lines are classified into a flat [`BlockToken`] stream. Blocks that can
//! never hold dependencies (`resource`, `patch`) are skipped whole, with
//! their nested `do`/`end` pairs tracked so the skip ends exactly at the
//! matching `end`.

use super::patterns::{
    strip_comment, CLANG_VERSION, DEPENDS_ON, DEP_TYPES, DO_OPENER, GENERIC_END, IF_CLANG,
    KEYWORD_OPENER, ON_BLOCK, ON_SYSTEM, ON_SYSTEM_MACOS, REQUIREMENT, SINCE, SKIP_BEGIN, SYMBOL,
    USES_FROM_MACOS,
};
use std::fmt;
use tracing::debug;

// ============================================================================
// Tokens
// ============================================================================

/// Direction of an `:or_newer` / `:or_older` qualifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bound {
    OrNewer,
    OrOlder,
}

impl Bound {
    fn parse(word: &str) -> Option<Self> {
        match word {
            "newer" => Some(Self::OrNewer),
            "older" => Some(Self::OrOlder),
            _ => None,
        }
    }

    #[must_use]
    pub const fn operator(self) -> &'static str {
        match self {
            Self::OrNewer => ">=",
            Self::OrOlder => "<=",
        }
    }
}

/// A macOS release, optionally open-ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MacosVersion {
    pub version: String,
    pub bound: Option<Bound>,
}

impl MacosVersion {
    /// Split `high_sierra_or_older` style symbols.
    fn from_symbol(symbol: &str) -> Self {
        for (suffix, bound) in [("_or_newer", Bound::OrNewer), ("_or_older", Bound::OrOlder)] {
            if let Some(version) = symbol.strip_suffix(suffix) {
                return Self {
                    version: version.to_string(),
                    bound: Some(bound),
                };
            }
        }
        Self {
            version: symbol.to_string(),
            bound: None,
        }
    }
}

impl fmt::Display for MacosVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.bound {
            Some(bound) => write!(f, "{} {}", bound.operator(), self.version),
            None => f.write_str(&self.version),
        }
    }
}

/// Kind of block opened by a line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BlockKind {
    Linux,
    Macos,
    Arm,
    Intel,
    /// `on_<release> [:or_newer|:or_older] do`
    MacosRelease(MacosVersion),
    /// `on_system :linux, macos: :<release> do`
    System(Option<MacosVersion>),
    /// `if DevelopmentTools.clang_build_version <op> <n>`
    Clang(String),
    /// Any other `do`/keyword block; contributes no restriction.
    Neutral,
}

impl BlockKind {
    /// Restriction this block adds to the statements it encloses.
    #[must_use]
    pub fn restriction(&self) -> Option<String> {
        match self {
            Self::Linux => Some("linux".to_string()),
            Self::Macos => Some("macos".to_string()),
            Self::Arm => Some("arm".to_string()),
            Self::Intel => Some("intel".to_string()),
            Self::MacosRelease(release) => Some(format!("macos: {release}")),
            Self::System(Some(release)) => Some(format!("linux or macos: {release}")),
            Self::System(None) => Some("linux or macos".to_string()),
            Self::Clang(guard) => Some(format!("clang version {guard}")),
            Self::Neutral => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BlockToken {
    BeginBlock(BlockKind),
    EndBlock,
    /// `depends_on "name" [=> types] [if clang guard]`
    Dependency {
        name: String,
        types: Vec<String>,
        clang: Option<String>,
    },
    /// `uses_from_macos "name" [=> types] [, since: :release]`
    MacosProvided {
        name: String,
        types: Vec<String>,
        since: Option<String>,
    },
    /// Rendered system requirement
    Requirement(String),
}

// ============================================================================
// Tokenizer
// ============================================================================

/// Classify lines into block tokens.
pub fn tokenize<'a, I>(lines: I) -> Vec<BlockToken>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut tokens = Vec::new();
    let mut skip_depth = 0usize;

    for raw in lines {
        let line = strip_comment(raw);
        if line.trim().is_empty() {
            continue;
        }
        if skip_depth > 0 {
            if GENERIC_END.is_match(line) {
                skip_depth -= 1;
            } else if opens_block(line) {
                skip_depth += 1;
            }
            continue;
        }
        if SKIP_BEGIN.is_match(line) {
            skip_depth = 1;
            continue;
        }
        if let Some(token) = classify(line) {
            tokens.push(token);
        }
    }
    tokens
}

fn opens_block(line: &str) -> bool {
    DO_OPENER.is_match(line) || KEYWORD_OPENER.is_match(line)
}

fn classify(line: &str) -> Option<BlockToken> {
    if let Some(caps) = USES_FROM_MACOS.captures(line) {
        return Some(BlockToken::MacosProvided {
            name: caps[1].to_string(),
            types: dependency_types(line),
            since: SINCE.captures(line).map(|c| c[1].to_string()),
        });
    }
    if GENERIC_END.is_match(line) {
        return Some(BlockToken::EndBlock);
    }
    if let Some(caps) = DEPENDS_ON.captures(line) {
        return Some(BlockToken::Dependency {
            name: caps[1].to_string(),
            types: dependency_types(line),
            clang: clang_guard(line),
        });
    }
    if let Some(caps) = REQUIREMENT.captures(line) {
        return render_requirement(&caps[1], &caps[2]).map(BlockToken::Requirement);
    }
    if let Some(kind) = conditional(line) {
        return Some(BlockToken::BeginBlock(kind));
    }
    if opens_block(line) {
        return Some(BlockToken::BeginBlock(BlockKind::Neutral));
    }
    None
}

/// Symbols on the right-hand side of `=>`.
fn dependency_types(line: &str) -> Vec<String> {
    DEP_TYPES
        .captures(line)
        .map(|caps| {
            SYMBOL
                .captures_iter(&caps[1])
                .map(|c| c[1].to_string())
                .collect()
        })
        .unwrap_or_default()
}

/// `<= 1400` from a `DevelopmentTools.clang_build_version <= 1400` guard.
fn clang_guard(line: &str) -> Option<String> {
    CLANG_VERSION
        .captures(line)
        .map(|caps| format!("{} {}", &caps[1], &caps[2]))
}

fn conditional(line: &str) -> Option<BlockKind> {
    if ON_SYSTEM.is_match(line) {
        let release = ON_SYSTEM_MACOS
            .captures(line)
            .map(|caps| MacosVersion::from_symbol(&caps[1]));
        return Some(BlockKind::System(release));
    }
    if let Some(caps) = ON_BLOCK.captures(line) {
        let kind = match &caps[1] {
            "linux" => BlockKind::Linux,
            "macos" => BlockKind::Macos,
            "arm" => BlockKind::Arm,
            "intel" => BlockKind::Intel,
            release => BlockKind::MacosRelease(MacosVersion {
                version: release.to_string(),
                bound: caps.get(2).and_then(|m| Bound::parse(m.as_str())),
            }),
        };
        return Some(kind);
    }
    if IF_CLANG.is_match(line) {
        return Some(clang_guard(line).map_or(BlockKind::Neutral, BlockKind::Clang));
    }
    None
}

// ============================================================================
// System requirements
// ============================================================================

/// Render a `depends_on` sentinel (`:linux`, `macos: :catalina`, ...).
///
/// Unrecognized sentinels are logged and dropped.
fn render_requirement(key: &str, value: &str) -> Option<String> {
    if let Some(symbol) = key.strip_prefix(':') {
        return Some(symbol.to_string());
    }
    let key = key.trim_end_matches(':');
    let formatted = requirement_value(value);
    let rendered = match key {
        "macos" => format!("macos >= {formatted} (or linux)"),
        "maximum_macos" => format!("macos <= {formatted} (or linux)"),
        "xcode" if value.contains('"') => format!("xcode >= {formatted} (on macos)"),
        "xcode" => format!("xcode {formatted} (on macos)"),
        "arch" => formatted,
        other => {
            debug!(requirement = other, "ignoring unrecognized system requirement");
            return None;
        }
    };
    Some(rendered.replace("DevelopmentTools.clang_build_version", "clang version"))
}

/// `[:monterey, :build]` -> `monterey build`, `"15.0"` -> `15.0`.
fn requirement_value(value: &str) -> String {
    value
        .chars()
        .map(|c| match c {
            '[' | ']' | ':' | ',' | '"' => ' ',
            other => other,
        })
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}
