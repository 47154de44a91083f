//! Dependency records and the identity-keyed dependency set.
//!
//! A formula may mention the same dependency several times under different
//! conditional blocks (`on_linux`, `on_macos`, ...). The set keeps exactly
//! one record per identity and folds the restrictions of later sightings
//! into the first one with `or`.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

// ============================================================================
// Dependency
// ============================================================================

/// A single dependency of a formula.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dependency {
    /// Name of the depended-on formula
    pub name: String,
    /// Dependency tags in declaration order (`build`, `test`, ...)
    #[serde(default)]
    pub dep_types: Vec<String>,
    /// Conditional expression gating the dependency; empty means unconditional
    #[serde(default)]
    pub restriction: String,
}

impl Dependency {
    /// Create an unconditional dependency.
    pub fn new(name: impl Into<String>, dep_types: Vec<String>) -> Self {
        Self {
            name: name.into(),
            dep_types,
            restriction: String::new(),
        }
    }

    /// Attach a restriction expression.
    #[must_use]
    pub fn with_restriction(mut self, restriction: impl Into<String>) -> Self {
        self.restriction = restriction.into();
        self
    }

    /// Identity used for deduplication.
    #[must_use]
    pub fn identity(&self) -> DependencyId {
        DependencyId::new(&self.name, &self.dep_types)
    }

    /// Dependency tags joined the way the TSV output expects them.
    #[must_use]
    pub fn types_label(&self) -> String {
        self.dep_types.join(",")
    }
}

/// Identity of a dependency: its name plus the *set* of its tags.
///
/// `[:build, :test]` and `[:test, :build]` share an identity.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DependencyId {
    name: String,
    types: Vec<String>,
}

impl DependencyId {
    fn new(name: &str, types: &[String]) -> Self {
        let mut types = types.to_vec();
        types.sort();
        types.dedup();
        Self {
            name: name.to_string(),
            types,
        }
    }

    /// Dependency name part of the identity.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }
}

// ============================================================================
// Dependency Set
// ============================================================================

/// Insertion-ordered set of dependencies keyed by [`DependencyId`].
///
/// Equality ignores insertion order, so two sets built from the same
/// declarations in different orders compare equal.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<Dependency>", into = "Vec<Dependency>")]
pub struct DependencySet {
    entries: IndexMap<DependencyId, Dependency>,
}

impl DependencySet {
    /// Create an empty set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a dependency, merging restrictions when the identity exists.
    pub fn insert(&mut self, dep: Dependency) {
        let id = dep.identity();
        match self.entries.get_mut(&id) {
            Some(existing) => {
                existing.restriction = merge_restrictions(&existing.restriction, &dep.restriction);
            }
            None => {
                self.entries.insert(id, dep);
            }
        }
    }

    /// Merge every dependency of `other` into this set.
    pub fn extend(&mut self, other: Self) {
        for dep in other.entries.into_values() {
            self.insert(dep);
        }
    }

    /// Look up a dependency by name and tags.
    #[must_use]
    pub fn get(&self, name: &str, dep_types: &[&str]) -> Option<&Dependency> {
        let types: Vec<String> = dep_types.iter().map(ToString::to_string).collect();
        self.entries.get(&DependencyId::new(name, &types))
    }

    /// Iterate in first-sighting order.
    pub fn iter(&self) -> impl Iterator<Item = &Dependency> {
        self.entries.values()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl From<Vec<Dependency>> for DependencySet {
    fn from(deps: Vec<Dependency>) -> Self {
        deps.into_iter().collect()
    }
}

impl From<DependencySet> for Vec<Dependency> {
    fn from(set: DependencySet) -> Self {
        set.entries.into_values().collect()
    }
}

impl FromIterator<Dependency> for DependencySet {
    fn from_iter<I: IntoIterator<Item = Dependency>>(iter: I) -> Self {
        let mut set = Self::new();
        for dep in iter {
            set.insert(dep);
        }
        set
    }
}

impl<'a> IntoIterator for &'a DependencySet {
    type Item = &'a Dependency;
    type IntoIter = indexmap::map::Values<'a, DependencyId, Dependency>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.values()
    }
}

// ============================================================================
// Dependencies
// ============================================================================

/// Dependencies declared in one section of a formula, plus the formula-wide
/// system requirements found alongside them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dependencies {
    /// Declared dependencies
    pub list: DependencySet,
    /// Formula-wide requirements such as `macos >= catalina (or linux)`
    #[serde(default)]
    pub system_requirements: String,
}

impl Dependencies {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.list.is_empty() && self.system_requirements.is_empty()
    }
}

// ============================================================================
// Restriction merging
// ============================================================================

/// Combine the restrictions of two sightings of the same dependency.
///
/// An empty side is unconditional, which makes the union unconditional.
/// A restriction already present in the union is not repeated.
/// Sides holding a top-level `and` or `, ` are parenthesized before joining.
#[must_use]
pub fn merge_restrictions(existing: &str, incoming: &str) -> String {
    if existing.is_empty() || incoming.is_empty() {
        return String::new();
    }
    if existing == incoming {
        return existing.to_string();
    }
    if split_top_level(existing, " or ").any(|part| part == incoming) {
        return existing.to_string();
    }
    format!("{} or {}", group(existing), group(incoming))
}

fn group(expr: &str) -> String {
    let needs_parens = split_top_level(expr, " and ").nth(1).is_some()
        || split_top_level(expr, ", ").nth(1).is_some();
    if needs_parens {
        format!("({expr})")
    } else {
        expr.to_string()
    }
}

/// Split `expr` on `sep` occurrences outside parentheses.
fn split_top_level<'a>(expr: &'a str, sep: &'a str) -> impl Iterator<Item = &'a str> + 'a {
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut start = 0usize;
    let bytes = expr.as_bytes();
    let mut i = 0usize;
    while i < bytes.len() {
        match bytes[i] {
            b'(' => depth += 1,
            b')' => depth = depth.saturating_sub(1),
            _ if depth == 0 && bytes[i..].starts_with(sep.as_bytes()) => {
                parts.push(&expr[start..i]);
                i += sep.len();
                start = i;
                continue;
            }
            _ => {}
        }
        i += 1;
    }
    parts.push(&expr[start..]);
    parts.into_iter()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dep(name: &str, types: &[&str], restriction: &str) -> Dependency {
        Dependency::new(name, types.iter().map(ToString::to_string).collect())
            .with_restriction(restriction)
    }

    #[test]
    fn test_identity_ignores_type_order() {
        let a = dep("cmake", &["build", "test"], "");
        let b = dep("cmake", &["test", "build"], "");
        assert_eq!(a.identity(), b.identity());
        assert_ne!(a.identity(), dep("cmake", &["build"], "").identity());
    }

    #[test]
    fn test_insert_merges_with_or() {
        let mut set = DependencySet::new();
        set.insert(dep("ghostscript", &["build"], "macos: >= sonoma"));
        set.insert(dep("ghostscript", &["build"], "linux"));

        assert_eq!(set.len(), 1);
        let merged = set.get("ghostscript", &["build"]).unwrap();
        assert_eq!(merged.restriction, "macos: >= sonoma or linux");
    }

    #[test]
    fn test_merge_parenthesizes_and_joins() {
        assert_eq!(
            merge_restrictions("macos and arm", "linux"),
            "(macos and arm) or linux"
        );
        assert_eq!(
            merge_restrictions("linux", "macos, arm"),
            "linux or (macos, arm)"
        );
        // Already grouped expressions are not wrapped twice.
        assert_eq!(
            merge_restrictions("(macos and arm) or linux", "intel"),
            "(macos and arm) or linux or intel"
        );
    }

    #[test]
    fn test_merge_with_unconditional_is_unconditional() {
        assert_eq!(merge_restrictions("", "linux"), "");
        assert_eq!(merge_restrictions("linux", ""), "");
    }

    #[test]
    fn test_merge_skips_repeated_restriction() {
        assert_eq!(merge_restrictions("linux", "linux"), "linux");
        assert_eq!(merge_restrictions("macos or linux", "linux"), "macos or linux");
        assert_eq!(
            merge_restrictions("linux or macos: >= ventura", "linux or macos: >= ventura"),
            "linux or macos: >= ventura"
        );
        assert_eq!(
            merge_restrictions("macos and arm", "macos and arm"),
            "macos and arm"
        );
    }

    #[test]
    fn test_different_types_are_distinct() {
        let set: DependencySet = vec![
            dep("python@3.12", &["build"], ""),
            dep("python@3.12", &[], ""),
        ]
        .into();
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn test_equality_ignores_order() {
        let a: DependencySet = vec![dep("a", &[], ""), dep("b", &[], "linux")].into();
        let b: DependencySet = vec![dep("b", &[], "linux"), dep("a", &[], "")].into();
        assert_eq!(a, b);
    }

    #[test]
    fn test_serde_as_list() {
        let set: DependencySet = vec![dep("zlib", &[], "linux")].into();
        let json = serde_json::to_string(&set).unwrap();
        assert_eq!(
            json,
            r#"[{"name":"zlib","dep_types":[],"restriction":"linux"}]"#
        );
        let back: DependencySet = serde_json::from_str(&json).unwrap();
        assert_eq!(back, set);
    }
}
