//! Formula file extraction.

use super::boundary::{
    block_ends, dependency_begins, dependency_ends, head_begins, head_statement_begins,
    license_begins, license_ends, stable_begins, url_begins, url_ends,
};
use super::clean::{
    build_head, build_stable, clean_dependencies, clean_head, clean_head_statement, clean_license,
    clean_stable,
};
use super::patterns::{assignment_pattern, BRANCH, HEAD, HOMEPAGE, INTERPOLATION, LICENSE, MIRROR, TAG, URL, USING};
use super::strategy::{FieldDescriptor, FieldName, FieldStrategy, FieldValue, ParserState};
use crate::error::{MinerError, OptionContext, ParseErrorKind, Result};
use crate::model::{Dependencies, SourceFormula};
use std::path::Path;
use std::sync::LazyLock;
use tracing::{trace, warn};

/// Upper bound on nested `#{var}` substitutions in one URL.
const MAX_INTERPOLATION_PASSES: usize = 8;

/// Options for extracting a single file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExtractOptions {
    /// Unmatched `end` lines absorbed per dependency block before warning
    pub empty_pop_tolerance: usize,
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            empty_pop_tolerance: 1,
        }
    }
}

// ============================================================================
// Field table
// ============================================================================

static FORMULA_FIELDS: LazyLock<Vec<FieldDescriptor>> = LazyLock::new(|| {
    vec![
        FieldDescriptor {
            name: FieldName::Homepage,
            required: false,
            strategy: FieldStrategy::SingleLine {
                pattern: &HOMEPAGE,
                build: FieldValue::Homepage,
            },
        },
        FieldDescriptor {
            name: FieldName::Url,
            required: true,
            strategy: FieldStrategy::MultiLine {
                begins: url_begins,
                ends: url_ends,
                clean: clean_stable,
                fallback: Some(Box::new(FieldStrategy::SameLineMulti {
                    pattern: &URL,
                    additional: vec![&TAG],
                    build: build_stable,
                })),
            },
        },
        FieldDescriptor {
            name: FieldName::Url,
            required: true,
            strategy: FieldStrategy::MultiLine {
                begins: stable_begins,
                ends: block_ends,
                clean: clean_stable,
                fallback: None,
            },
        },
        FieldDescriptor {
            name: FieldName::Mirror,
            required: false,
            strategy: FieldStrategy::SingleLine {
                pattern: &MIRROR,
                build: FieldValue::Mirror,
            },
        },
        FieldDescriptor {
            name: FieldName::License,
            required: false,
            strategy: FieldStrategy::MultiLine {
                begins: license_begins,
                ends: license_ends,
                clean: clean_license,
                fallback: Some(Box::new(FieldStrategy::SingleLine {
                    pattern: &LICENSE,
                    build: FieldValue::License,
                })),
            },
        },
        FieldDescriptor {
            name: FieldName::Head,
            required: false,
            strategy: FieldStrategy::MultiLine {
                begins: head_statement_begins,
                ends: url_ends,
                clean: clean_head_statement,
                fallback: None,
            },
        },
        FieldDescriptor {
            name: FieldName::Head,
            required: false,
            strategy: FieldStrategy::MultiLine {
                begins: head_begins,
                ends: block_ends,
                clean: clean_head,
                fallback: Some(Box::new(FieldStrategy::SameLineMulti {
                    pattern: &HEAD,
                    additional: vec![&USING, &BRANCH],
                    build: build_head,
                })),
            },
        },
        FieldDescriptor {
            name: FieldName::Dependencies,
            required: false,
            strategy: FieldStrategy::MultiLine {
                begins: dependency_begins,
                ends: dependency_ends,
                clean: clean_dependencies,
                fallback: None,
            },
        },
    ]
});

/// The ordered descriptor table used for formula files.
#[must_use]
pub fn formula_fields() -> &'static [FieldDescriptor] {
    &FORMULA_FIELDS
}

// ============================================================================
// Extraction
// ============================================================================

/// Extract the raw fields of one formula from its source text.
///
/// # Errors
///
/// Fails when no stable URL is found, when the stable construct runs past
/// the end of the file, or when the URL references an unknown variable.
pub fn extract_source_formula(
    name: &str,
    content: &str,
    options: &ExtractOptions,
) -> Result<SourceFormula> {
    let fields = formula_fields();
    let mut state = ParserState::new(options.empty_pop_tolerance);
    for line in content.lines() {
        state.feed(fields, line);
    }
    let parsed = state
        .finish(fields)
        .map_err(|kind| MinerError::parse(name, kind))?;
    for warning in &parsed.warnings {
        warn!(formula = name, "{warning}");
    }

    let mut homepage = None;
    let mut stable = None;
    let mut mirror = None;
    let mut license = None;
    let mut head = None;
    let mut dependencies = Dependencies::default();
    for value in parsed.values.into_values() {
        match value {
            FieldValue::Homepage(v) => homepage = Some(v),
            FieldValue::Stable(v) => stable = Some(v),
            FieldValue::Mirror(v) => mirror = Some(v),
            FieldValue::License(v) => license = Some(v),
            FieldValue::Head(v) => head = Some(v),
            FieldValue::Dependencies(v) => dependencies = v,
        }
    }

    let mut stable = stable
        .filter(|s| !s.url.is_empty())
        .required(FieldName::Url.as_str(), name)?;
    stable.url = resolve_interpolations(&stable.url, content)
        .map_err(|kind| MinerError::parse(name, kind))?;
    trace!(formula = name, url = %stable.url, "extracted");

    Ok(SourceFormula {
        name: name.to_string(),
        homepage,
        stable,
        mirror,
        license,
        dependencies,
        head,
    })
}

/// Substitute `#{var}` references with values assigned in the same file.
fn resolve_interpolations(url: &str, content: &str) -> std::result::Result<String, ParseErrorKind> {
    let mut resolved = url.to_string();
    for _ in 0..MAX_INTERPOLATION_PASSES {
        let Some(caps) = INTERPOLATION.captures(&resolved) else {
            return Ok(resolved);
        };
        let (reference, variable) = (caps[0].to_string(), caps[1].to_string());
        let value = lookup_assignment(&variable, content).ok_or_else(|| {
            ParseErrorKind::UnresolvedInterpolation {
                variable: variable.clone(),
                url: url.to_string(),
            }
        })?;
        resolved = resolved.replace(&reference, &value);
    }
    match INTERPOLATION.captures(&resolved) {
        Some(caps) => Err(ParseErrorKind::UnresolvedInterpolation {
            variable: caps[1].to_string(),
            url: url.to_string(),
        }),
        None => Ok(resolved),
    }
}

fn lookup_assignment(variable: &str, content: &str) -> Option<String> {
    let re = assignment_pattern(variable)?;
    content
        .lines()
        .find_map(|line| re.captures(line).map(|c| c[1].to_string()))
}

// ============================================================================
// Files
// ============================================================================

/// Formula name for a corpus path: the file name without `.rb`.
#[must_use]
pub fn formula_name(path: &Path) -> Option<String> {
    let file_name = path.file_name()?.to_str()?;
    Some(file_name.strip_suffix(".rb").unwrap_or(file_name).to_string())
}

/// Read and extract one formula file.
///
/// # Errors
///
/// Fails when the file cannot be read or extraction fails.
pub fn parse_formula_file(path: &Path, options: &ExtractOptions) -> Result<SourceFormula> {
    let name = formula_name(path)
        .ok_or_else(|| MinerError::corpus(format!("no formula name in {}", path.display())))?;
    let bytes = std::fs::read(path).map_err(|e| MinerError::io(path, e))?;
    let content = String::from_utf8_lossy(&bytes);
    extract_source_formula(&name, &content, options)
}
