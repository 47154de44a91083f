//! **Mine Homebrew formula files into a dependency graph.**
//!
//! `formula-miner` reads a checkout of a Homebrew formula repository, pulls
//! the metadata each formula declares in its Ruby DSL (homepage, source
//! URLs, license, head checkout, dependencies) and writes one dependency
//! graph for the whole corpus.
//!
//! No Ruby is evaluated. Each file is scanned line by line against a table
//! of field descriptors, and conditional dependency blocks (`on_linux`,
//! `on_macos`, `on_arm`, ...) are folded into restriction expressions such
//! as `arm and (linux or macos: >= ventura)`.
//!
//! ## Core Concepts & Modules
//!
//! - **[`parsers`]**: The regex pattern table, the field strategy parser and
//!   the dependency block walk. [`parsers::extract_source_formula`] turns one
//!   file into a [`SourceFormula`].
//! - **[`model`]**: [`SourceFormula`] as extracted, [`Formula`] after license
//!   normalization and repository URL resolution, and the identity-keyed
//!   [`DependencySet`].
//! - **[`pipeline`]**: The concurrent corpus reader and the emission stage.
//! - **[`reports`]**: TSV and JSON graph renderers.
//! - **[`config`]**: YAML configuration, discovery and validation.
//!
//! ## Getting Started
//!
//! ```no_run
//! use std::path::Path;
//! use formula_miner::pipeline::{read_corpus, ReaderOptions};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let formulas = read_corpus(Path::new("tmp/homebrew-core"), &ReaderOptions::default())?;
//!     println!("Read {} formulas", formulas.len());
//!     Ok(())
//! }
//! ```
//!
//! ### Extracting a Single Formula
//!
//! ```
//! use formula_miner::parsers::{extract_source_formula, ExtractOptions};
//! use formula_miner::model::{Formula, ResolveOptions};
//!
//! let content = r#"
//! class Pigz < Formula
//!   url "https://zlib.net/pigz/pigz-2.8.tar.gz"
//!   license "Zlib"
//!
//!   depends_on "zlib"
//! end
//! "#;
//!
//! let source = extract_source_formula("pigz", content, &ExtractOptions::default()).unwrap();
//! let formula = Formula::from_source(source, &ResolveOptions::default());
//! assert_eq!(formula.license, "Zlib");
//! assert_eq!(formula.dependencies.len(), 1);
//! ```

// Lint to discourage unwrap() in production code - prefer explicit error handling
#![warn(clippy::unwrap_used)]
#![allow(clippy::missing_errors_doc, clippy::missing_panics_doc, clippy::similar_names)]

pub mod cli;
pub mod config;
pub mod error;
pub mod model;
pub mod parsers;
pub mod pipeline;
pub mod reports;

pub use config::{ConfigError, MinerConfig, MinerConfigBuilder, Validatable};
pub use error::{EmitErrorKind, ErrorContext, MinerError, OptionContext, ParseErrorKind, Result};
pub use model::{Dependencies, Dependency, DependencySet, Formula, FormulaMap, SourceFormula};
pub use parsers::{extract_source_formula, parse_formula_file, ExtractOptions};
pub use pipeline::{read_corpus, ReaderOptions};
pub use reports::{GraphReporter, ReportFormat};
