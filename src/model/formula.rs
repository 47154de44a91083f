//! Source and resolved formula records.

use super::dependency::{Dependencies, DependencySet};
use super::license::normalize_license;
use super::repo_url::{resolve_repo_url, RepoCandidates};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Default value for a formula without a license statement.
pub const DEFAULT_FALLBACK_LICENSE: &str = "pseudo";

// ============================================================================
// Source Formula
// ============================================================================

/// Release archive of a formula, with dependencies scoped to it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stable {
    pub url: String,
    #[serde(default)]
    pub dependencies: Dependencies,
}

impl Stable {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            dependencies: Dependencies::default(),
        }
    }
}

/// Version-control checkout of a formula.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Head {
    pub url: String,
    /// VCS named by `using:`, when not git
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vcs: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub branch: Option<String>,
    #[serde(default)]
    pub dependencies: Dependencies,
}

impl Head {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Self::default()
        }
    }
}

/// Raw per-file extraction result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceFormula {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub homepage: Option<String>,
    pub stable: Stable,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mirror: Option<String>,
    /// License expression as written, before normalization
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub license: Option<String>,
    #[serde(default)]
    pub dependencies: Dependencies,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub head: Option<Head>,
}

// ============================================================================
// Formula
// ============================================================================

/// Settings that influence resolution of a [`SourceFormula`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolveOptions {
    /// Run repository heuristics when there is no head URL
    pub derive_repo: bool,
    /// License written when the formula has none
    pub fallback_license: String,
}

impl Default for ResolveOptions {
    fn default() -> Self {
        Self {
            derive_repo: true,
            fallback_license: DEFAULT_FALLBACK_LICENSE.to_string(),
        }
    }
}

/// Resolved formulas keyed by name.
pub type FormulaMap = HashMap<String, Formula>;

/// Resolved, emission-ready formula.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Formula {
    pub name: String,
    pub license: String,
    pub repo_url: String,
    pub archive_url: String,
    pub system_requirement: String,
    pub dependencies: DependencySet,
}

impl Formula {
    /// Resolve a source formula.
    ///
    /// Top-level, stable and head dependencies are merged into one set;
    /// their system requirements are joined with `, `.
    #[must_use]
    pub fn from_source(source: SourceFormula, options: &ResolveOptions) -> Self {
        let license = normalize_license(
            source.license.as_deref().unwrap_or_default(),
            &options.fallback_license,
        );

        let repo_url = resolve_repo_url(
            &RepoCandidates {
                head: source.head.as_ref().map(|h| h.url.as_str()),
                homepage: source.homepage.as_deref(),
                stable: Some(source.stable.url.as_str()),
                mirror: source.mirror.as_deref(),
            },
            options.derive_repo,
        );

        let mut requirements = Vec::new();
        let mut dependencies = DependencySet::new();
        let sections = std::iter::once(source.dependencies)
            .chain(std::iter::once(source.stable.dependencies))
            .chain(source.head.map(|h| h.dependencies));
        for section in sections {
            if !section.system_requirements.is_empty() {
                requirements.push(section.system_requirements);
            }
            dependencies.extend(section.list);
        }

        Self {
            name: source.name,
            license,
            repo_url,
            archive_url: source.stable.url,
            system_requirement: requirements.join(", "),
            dependencies,
        }
    }
}
