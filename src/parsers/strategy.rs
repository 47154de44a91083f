//! Field strategy parser.
//!
//! A formula is scanned line by line against an ordered table of
//! [`FieldDescriptor`]s. The scan state lives in an explicit
//! [`ParserState`] value, so the state machine can be driven from tests
//! without touching the filesystem:
//!
//! ```
//! use formula_miner::parsers::{formula_fields, FieldName, ParserState};
//!
//! let mut state = ParserState::new(1);
//! for line in ["  homepage \"https://jqlang.org\"", "  url \"https://x.org/jq.tgz\""] {
//!     state.feed(formula_fields(), line);
//! }
//! let parsed = state.finish(formula_fields()).unwrap();
//! assert!(parsed.values.contains_key(&FieldName::Homepage));
//! ```

use crate::error::ParseErrorKind;
use crate::model::{Dependencies, Head, Stable};
use regex::Regex;
use std::collections::HashMap;
use std::fmt;

// ============================================================================
// Field names and values
// ============================================================================

/// Result slot a descriptor fills. Several descriptors may share one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldName {
    Homepage,
    Url,
    Mirror,
    License,
    Head,
    Dependencies,
}

impl FieldName {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Homepage => "homepage",
            Self::Url => "url",
            Self::Mirror => "mirror",
            Self::License => "license",
            Self::Head => "head",
            Self::Dependencies => "dependencies",
        }
    }
}

impl fmt::Display for FieldName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Typed value produced by a descriptor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    Homepage(String),
    Stable(Stable),
    Mirror(String),
    /// Raw license expression
    License(String),
    Head(Head),
    Dependencies(Dependencies),
}

/// Shared state handed to clean functions.
#[derive(Debug, Clone, Default)]
pub struct CleanContext {
    /// Pops on an empty restriction stack absorbed per dependency block
    pub empty_pop_tolerance: usize,
    /// Malformed syntax absorbed while cleaning
    pub warnings: Vec<String>,
}

/// Turns an accumulated multi-line sequence into a value.
pub type CleanFn = fn(&[String], &mut CleanContext) -> FieldValue;

// ============================================================================
// Strategies
// ============================================================================

/// How a descriptor recognizes its field.
pub enum FieldStrategy {
    /// One regex with one capture group.
    SingleLine {
        pattern: &'static Regex,
        build: fn(String) -> FieldValue,
    },
    /// A primary capture plus optional captures from the same line.
    SameLineMulti {
        pattern: &'static Regex,
        additional: Vec<&'static Regex>,
        build: fn(String, Vec<Option<String>>) -> FieldValue,
    },
    /// A construct delimited by begin/end predicates, with an optional
    /// single-line form tried when the begin predicate does not fire.
    MultiLine {
        begins: fn(&str) -> bool,
        ends: fn(&str) -> bool,
        clean: CleanFn,
        fallback: Option<Box<FieldStrategy>>,
    },
}

impl fmt::Debug for FieldStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SingleLine { pattern, .. } => {
                f.debug_struct("SingleLine").field("pattern", &pattern.as_str()).finish()
            }
            Self::SameLineMulti {
                pattern,
                additional,
                ..
            } => f
                .debug_struct("SameLineMulti")
                .field("pattern", &pattern.as_str())
                .field("additional", &additional.len())
                .finish(),
            Self::MultiLine { fallback, .. } => f
                .debug_struct("MultiLine")
                .field("fallback", fallback)
                .finish(),
        }
    }
}

/// Outcome of offering one line to a strategy.
#[derive(Debug)]
enum LineMatch {
    Value(FieldValue),
    Open,
    NoMatch,
}

impl FieldStrategy {
    fn try_line(&self, line: &str) -> LineMatch {
        match self {
            Self::SingleLine { pattern, build } => pattern
                .captures(line)
                .map_or(LineMatch::NoMatch, |caps| {
                    LineMatch::Value(build(caps[1].to_string()))
                }),
            Self::SameLineMulti {
                pattern,
                additional,
                build,
            } => {
                let Some(caps) = pattern.captures(line) else {
                    return LineMatch::NoMatch;
                };
                let extras = additional
                    .iter()
                    .map(|re| re.captures(line).map(|c| c[1].to_string()))
                    .collect();
                LineMatch::Value(build(caps[1].to_string(), extras))
            }
            Self::MultiLine {
                begins, fallback, ..
            } => {
                if begins(line) {
                    LineMatch::Open
                } else {
                    fallback
                        .as_ref()
                        .map_or(LineMatch::NoMatch, |f| f.try_line(line))
                }
            }
        }
    }
}

/// One entry of the ordered field table.
#[derive(Debug)]
pub struct FieldDescriptor {
    pub name: FieldName,
    /// Extraction fails when no descriptor with this name produced a value
    pub required: bool,
    pub strategy: FieldStrategy,
}

// ============================================================================
// Parser state
// ============================================================================

#[derive(Debug)]
struct OpenSequence {
    descriptor: usize,
    lines: Vec<String>,
}

/// Values extracted from one file.
#[derive(Debug, Default)]
pub struct ParsedFields {
    pub values: HashMap<FieldName, FieldValue>,
    pub warnings: Vec<String>,
}

/// Scan state: matched fields plus the currently open sequence, if any.
#[derive(Debug, Default)]
pub struct ParserState {
    values: HashMap<FieldName, FieldValue>,
    open: Option<OpenSequence>,
    context: CleanContext,
}

impl ParserState {
    #[must_use]
    pub fn new(empty_pop_tolerance: usize) -> Self {
        Self {
            context: CleanContext {
                empty_pop_tolerance,
                warnings: Vec::new(),
            },
            ..Self::default()
        }
    }

    /// Whether a multi-line construct is currently accumulating lines.
    #[must_use]
    pub fn is_open(&self) -> bool {
        self.open.is_some()
    }

    /// Whether `name` already has a value.
    #[must_use]
    pub fn has(&self, name: FieldName) -> bool {
        self.values.contains_key(&name)
    }

    /// Advance the state by one line.
    ///
    /// An open sequence swallows the line. Otherwise each descriptor whose
    /// field is still empty is tried in order and the first match wins.
    pub fn feed(&mut self, descriptors: &[FieldDescriptor], line: &str) {
        if let Some(mut open) = self.open.take() {
            open.lines.push(line.to_string());
            let descriptor = &descriptors[open.descriptor];
            match &descriptor.strategy {
                FieldStrategy::MultiLine { ends, clean, .. } if ends(line) => {
                    let value = clean(&open.lines, &mut self.context);
                    self.values.insert(descriptor.name, value);
                }
                _ => self.open = Some(open),
            }
            return;
        }

        for (index, descriptor) in descriptors.iter().enumerate() {
            if self.has(descriptor.name) {
                continue;
            }
            match descriptor.strategy.try_line(line) {
                LineMatch::Value(value) => {
                    self.values.insert(descriptor.name, value);
                    return;
                }
                LineMatch::Open => {
                    self.open = Some(OpenSequence {
                        descriptor: index,
                        lines: vec![line.to_string()],
                    });
                    return;
                }
                LineMatch::NoMatch => {}
            }
        }
    }

    /// Close the scan at end of input.
    ///
    /// An optional construct still open is cleaned as-is; a required one
    /// fails. Required fields without a value fail as missing.
    pub fn finish(mut self, descriptors: &[FieldDescriptor]) -> Result<ParsedFields, ParseErrorKind> {
        if let Some(open) = self.open.take() {
            let descriptor = &descriptors[open.descriptor];
            if descriptor.required {
                return Err(ParseErrorKind::UnterminatedSequence {
                    field: descriptor.name.to_string(),
                });
            }
            if let FieldStrategy::MultiLine { clean, .. } = &descriptor.strategy {
                let value = clean(&open.lines, &mut self.context);
                self.values.insert(descriptor.name, value);
            }
        }

        if let Some(missing) = descriptors
            .iter()
            .find(|d| d.required && !self.values.contains_key(&d.name))
        {
            return Err(ParseErrorKind::MissingField {
                field: missing.name.to_string(),
            });
        }

        Ok(ParsedFields {
            values: self.values,
            warnings: self.context.warnings,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::LazyLock;

    static NAME: LazyLock<Regex> = LazyLock::new(|| Regex::new(r#"^name "([^"]+)""#).unwrap());
    static NOTE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r#"note "([^"]+)""#).unwrap());

    fn begins(line: &str) -> bool {
        line == "block do"
    }

    fn ends(line: &str) -> bool {
        line == "end"
    }

    fn clean(lines: &[String], _ctx: &mut CleanContext) -> FieldValue {
        FieldValue::License(lines.join("|"))
    }

    fn build_homepage_with_note(primary: String, extras: Vec<Option<String>>) -> FieldValue {
        let note = extras.into_iter().flatten().next().unwrap_or_default();
        FieldValue::Homepage(format!("{primary}+{note}"))
    }

    fn table() -> Vec<FieldDescriptor> {
        vec![
            FieldDescriptor {
                name: FieldName::Mirror,
                required: true,
                strategy: FieldStrategy::SingleLine {
                    pattern: &NAME,
                    build: FieldValue::Mirror,
                },
            },
            FieldDescriptor {
                name: FieldName::Homepage,
                required: false,
                strategy: FieldStrategy::SameLineMulti {
                    pattern: &NAME,
                    additional: vec![&NOTE],
                    build: build_homepage_with_note,
                },
            },
            FieldDescriptor {
                name: FieldName::License,
                required: false,
                strategy: FieldStrategy::MultiLine {
                    begins,
                    ends,
                    clean,
                    fallback: None,
                },
            },
        ]
    }

    fn run(lines: &[&str]) -> Result<ParsedFields, ParseErrorKind> {
        let table = table();
        let mut state = ParserState::new(1);
        for line in lines {
            state.feed(&table, line);
        }
        state.finish(&table)
    }

    #[test]
    fn test_first_match_wins() {
        let parsed = run(&[r#"name "a""#, r#"name "b" note "x""#]).unwrap();
        assert_eq!(
            parsed.values.get(&FieldName::Mirror),
            Some(&FieldValue::Mirror("a".to_string()))
        );
        // The second line goes to the next descriptor with an empty slot.
        assert_eq!(
            parsed.values.get(&FieldName::Homepage),
            Some(&FieldValue::Homepage("b+x".to_string()))
        );
    }

    #[test]
    fn test_multi_line_includes_terminator() {
        let parsed = run(&[r#"name "a""#, "block do", "inner", "end"]).unwrap();
        assert_eq!(
            parsed.values.get(&FieldName::License),
            Some(&FieldValue::License("block do|inner|end".to_string()))
        );
    }

    #[test]
    fn test_open_sequence_swallows_lines() {
        let table = table();
        let mut state = ParserState::new(1);
        state.feed(&table, "block do");
        assert!(state.is_open());
        state.feed(&table, r#"name "hidden""#);
        assert!(!state.has(FieldName::Mirror));
        state.feed(&table, "end");
        assert!(!state.is_open());
    }

    #[test]
    fn test_unterminated_optional_is_flushed() {
        let parsed = run(&[r#"name "a""#, "block do", "inner"]).unwrap();
        assert_eq!(
            parsed.values.get(&FieldName::License),
            Some(&FieldValue::License("block do|inner".to_string()))
        );
    }

    #[test]
    fn test_missing_required_field() {
        let err = run(&["block do", "end"]).unwrap_err();
        assert_eq!(
            err,
            ParseErrorKind::MissingField {
                field: "mirror".to_string()
            }
        );
    }
}
