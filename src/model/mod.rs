//! Data model for mined formulas.
//!
//! Extraction produces a [`SourceFormula`] per file: the raw homepage,
//! stable/head blocks, mirror, license expression and dependency sections.
//! [`Formula::from_source`] resolves it into the emission-ready [`Formula`]
//! by normalizing the license, deriving the repository URL and flattening
//! all dependency sections into one [`DependencySet`].
//!
//! ```
//! use formula_miner::model::{Formula, ResolveOptions, SourceFormula, Stable, Dependencies};
//!
//! let source = SourceFormula {
//!     name: "jq".to_string(),
//!     homepage: Some("https://github.com/jqlang/jq".to_string()),
//!     stable: Stable::new("https://github.com/jqlang/jq/releases/download/jq-1.7.1/jq-1.7.1.tar.gz"),
//!     mirror: None,
//!     license: Some(r#""MIT""#.to_string()),
//!     dependencies: Dependencies::default(),
//!     head: None,
//! };
//! let formula = Formula::from_source(source, &ResolveOptions::default());
//! assert_eq!(formula.license, "MIT");
//! assert_eq!(formula.repo_url, "https://github.com/jqlang/jq.git");
//! ```

mod dependency;
mod formula;
mod license;
mod repo_url;

pub use dependency::{merge_restrictions, Dependencies, Dependency, DependencyId, DependencySet};
pub use formula::{Formula, FormulaMap, Head, ResolveOptions, SourceFormula, Stable, DEFAULT_FALLBACK_LICENSE};
pub use license::{normalize_license, to_spdx_expression};
pub use repo_url::{known_archive, known_repo, resolve_repo_url, RepoCandidates};
