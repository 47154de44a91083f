//! Restriction stack walk over a dependency token stream.
//!
//! Each [`BlockToken::BeginBlock`] descends one level, pushing its
//! restriction (if any) for the statements it encloses; the matching
//! [`BlockToken::EndBlock`] returns. An `end` with nothing open is
//! absorbed while the empty-pop tolerance lasts and reported as a
//! warning after that.

use super::tokens::BlockToken;
use crate::model::{Dependencies, Dependency, DependencySet};

/// Result of walking one dependency block.
#[derive(Debug, Default)]
pub struct WalkOutcome {
    pub dependencies: Dependencies,
    pub warnings: Vec<String>,
}

struct Walker<'t> {
    tokens: std::slice::Iter<'t, BlockToken>,
    tolerance: usize,
    list: DependencySet,
    requirements: Vec<String>,
    warnings: Vec<String>,
}

/// Walk `tokens` and collect restricted dependencies.
#[must_use]
pub fn walk(tokens: &[BlockToken], empty_pop_tolerance: usize) -> WalkOutcome {
    let mut walker = Walker {
        tokens: tokens.iter(),
        tolerance: empty_pop_tolerance,
        list: DependencySet::new(),
        requirements: Vec::new(),
        warnings: Vec::new(),
    };
    let mut stack = Vec::new();
    walker.block(&mut stack, 0);

    WalkOutcome {
        dependencies: Dependencies {
            list: walker.list,
            system_requirements: walker.requirements.join(", "),
        },
        warnings: walker.warnings,
    }
}

impl Walker<'_> {
    fn block(&mut self, stack: &mut Vec<String>, depth: usize) {
        while let Some(token) = self.tokens.next() {
            match token {
                BlockToken::BeginBlock(kind) => {
                    let restriction = kind.restriction();
                    let pushed = restriction.is_some();
                    stack.extend(restriction);
                    self.block(stack, depth + 1);
                    if pushed {
                        stack.pop();
                    }
                }
                BlockToken::EndBlock if depth > 0 => return,
                BlockToken::EndBlock => {
                    if self.tolerance > 0 {
                        self.tolerance -= 1;
                    } else {
                        self.warnings
                            .push("`end` without an open block ignored".to_string());
                    }
                }
                BlockToken::Dependency { name, types, clang } => {
                    let guard = clang.as_ref().map(|g| format!("clang version {g}"));
                    let restriction = conjunction(stack.iter().cloned().chain(guard));
                    self.list
                        .insert(Dependency::new(name.clone(), types.clone()).with_restriction(restriction));
                }
                BlockToken::MacosProvided { name, types, since } => {
                    let own = since
                        .as_ref()
                        .map_or_else(|| "linux".to_string(), |v| format!("linux or macos: < {v}"));
                    let restriction = conjunction(stack.iter().cloned().chain(Some(own)));
                    self.list
                        .insert(Dependency::new(name.clone(), types.clone()).with_restriction(restriction));
                }
                BlockToken::Requirement(requirement) => {
                    self.requirements.push(requirement.clone());
                }
            }
        }
        if depth > 0 {
            self.warnings
                .push(format!("{depth} block(s) left open at end of section"));
        }
    }
}

/// Join restrictions with ` and `, grouping disjunctions when combined.
fn conjunction(parts: impl Iterator<Item = String>) -> String {
    let parts: Vec<String> = parts.collect();
    if parts.len() < 2 {
        return parts.into_iter().next().unwrap_or_default();
    }
    parts
        .into_iter()
        .map(|p| if p.contains(" or ") { format!("({p})") } else { p })
        .collect::<Vec<_>>()
        .join(" and ")
}
