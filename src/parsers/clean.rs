//! Clean functions and same-line builders for the formula field table.

use super::boundary::dependency_ends;
use super::patterns::{strip_comment, BLOCK_URL, BRANCH, HEAD, LICENSE_KEYWORD, TAG, USING};
use super::restriction::walk;
use super::strategy::{CleanContext, FieldValue};
use super::tokens::tokenize;
use crate::model::{Dependencies, Head, Stable};

/// Repository URL pinned at a tag: `<url without .git>/tree/<tag>`.
#[must_use]
pub fn tree_url(url: &str, tag: &str) -> String {
    let base = url.trim_end_matches('/').trim_end_matches(".git");
    format!("{}/tree/{}", base.trim_end_matches('/'), tag)
}

fn dependencies_of(lines: &[String], ctx: &mut CleanContext) -> Dependencies {
    let outcome = walk(
        &tokenize(lines.iter().map(String::as_str)),
        ctx.empty_pop_tolerance,
    );
    ctx.warnings.extend(outcome.warnings);
    outcome.dependencies
}

/// Index of the first `url "..."` line and the captured URL.
fn find_url(lines: &[String]) -> Option<(usize, String)> {
    lines
        .iter()
        .enumerate()
        .find_map(|(i, line)| BLOCK_URL.captures(line).map(|c| (i, c[1].to_string())))
}

/// The url line together with its comma-continued argument lines.
fn url_statement(lines: &[String], start: usize) -> &[String] {
    let end = lines[start..]
        .iter()
        .position(|l| !strip_comment(l).ends_with(','))
        .map_or(lines.len(), |offset| start + offset + 1);
    &lines[start..end]
}

fn first_capture(lines: &[String], re: &regex::Regex) -> Option<String> {
    lines
        .iter()
        .find_map(|l| re.captures(l).map(|c| c[1].to_string()))
}

// ============================================================================
// Stable
// ============================================================================

/// Multi-line `url` statement or `stable do ... end` block.
///
/// A `tag:` argument on a git URL turns it into a tree URL. Dependencies
/// inside the block are scoped to the stable release.
pub fn clean_stable(lines: &[String], ctx: &mut CleanContext) -> FieldValue {
    let Some((start, url)) = find_url(lines) else {
        return FieldValue::Stable(Stable::default());
    };
    let url = match first_capture(url_statement(lines, start), &TAG) {
        Some(tag) => tree_url(&url, &tag),
        None => url,
    };
    FieldValue::Stable(Stable {
        url,
        dependencies: dependencies_of(lines, ctx),
    })
}

/// Single-line `url "..."` with an optional `tag:`.
pub fn build_stable(url: String, extras: Vec<Option<String>>) -> FieldValue {
    let url = match extras.into_iter().flatten().next() {
        Some(tag) => tree_url(&url, &tag),
        None => url,
    };
    FieldValue::Stable(Stable::new(url))
}

// ============================================================================
// License
// ============================================================================

/// Concatenate a multi-line license expression, dropping the keyword and
/// comments.
pub fn clean_license(lines: &[String], _ctx: &mut CleanContext) -> FieldValue {
    let joined = lines
        .iter()
        .enumerate()
        .map(|(i, line)| {
            let code = strip_comment(line);
            if i == 0 {
                LICENSE_KEYWORD.replace(code, "").trim().to_string()
            } else {
                code.trim().to_string()
            }
        })
        .collect::<String>();
    FieldValue::License(joined)
}

// ============================================================================
// Head
// ============================================================================

/// `head do ... end` block.
pub fn clean_head(lines: &[String], ctx: &mut CleanContext) -> FieldValue {
    let mut head = find_url(lines).map_or_else(Head::default, |(start, url)| {
        let statement = url_statement(lines, start);
        Head {
            url,
            vcs: first_capture(statement, &USING),
            branch: first_capture(statement, &BRANCH),
            dependencies: Dependencies::default(),
        }
    });
    head.dependencies = dependencies_of(lines, ctx);
    FieldValue::Head(head)
}

/// `head "..."` statement continued over comma-terminated lines.
pub fn clean_head_statement(lines: &[String], _ctx: &mut CleanContext) -> FieldValue {
    FieldValue::Head(Head {
        url: first_capture(lines, &HEAD).unwrap_or_default(),
        vcs: first_capture(lines, &USING),
        branch: first_capture(lines, &BRANCH),
        dependencies: Dependencies::default(),
    })
}

/// Single-line `head "..."` with optional `using:` and `branch:`.
pub fn build_head(url: String, extras: Vec<Option<String>>) -> FieldValue {
    let mut extras = extras.into_iter();
    FieldValue::Head(Head {
        url,
        vcs: extras.next().flatten(),
        branch: extras.next().flatten(),
        dependencies: Dependencies::default(),
    })
}

// ============================================================================
// Dependencies
// ============================================================================

/// Top-level dependency section, without the statement that closed it.
pub fn clean_dependencies(lines: &[String], ctx: &mut CleanContext) -> FieldValue {
    let body = match lines.split_last() {
        Some((last, body)) if dependency_ends(last) => body,
        _ => lines,
    };
    FieldValue::Dependencies(dependencies_of(body, ctx))
}
