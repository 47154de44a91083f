//! Formula file parsers.
//!
//! Formula files are Ruby DSL, but only a handful of statements matter for
//! the dependency graph. Instead of parsing Ruby, each file is scanned line
//! by line against an ordered table of field descriptors:
//!
//! - **single-line** fields (`homepage`, `mirror`) are one regex capture;
//! - **same-line multi** fields (`url ..., tag:`, `head ..., branch:`) add
//!   optional captures from the same line;
//! - **multi-line** constructs (`stable do`, `head do`, bracketed licenses,
//!   the dependency section) are delimited by begin/end predicates and
//!   handed to a clean function once closed.
//!
//! Dependency statements inside a construct are tokenized and walked with a
//! restriction stack, so `depends_on` inside `on_linux do` comes out as a
//! dependency restricted to `linux`.
//!
//! ## Usage
//!
//! ```no_run
//! use formula_miner::parsers::{parse_formula_file, ExtractOptions};
//! use std::path::Path;
//!
//! let formula = parse_formula_file(
//!     Path::new("homebrew-core/Formula/j/jq.rb"),
//!     &ExtractOptions::default(),
//! ).unwrap();
//! println!("{} -> {}", formula.name, formula.stable.url);
//! ```

mod boundary;
mod clean;
mod formula;
mod patterns;
mod restriction;
mod strategy;
mod tokens;

pub use boundary::{
    block_ends, dependency_begins, dependency_ends, head_begins, head_statement_begins,
    indentation, license_begins, license_ends, stable_begins, url_begins, url_ends,
};
pub use clean::tree_url;
pub use formula::{
    extract_source_formula, formula_fields, formula_name, parse_formula_file, ExtractOptions,
};
pub use restriction::{walk, WalkOutcome};
pub use strategy::{
    CleanContext, CleanFn, FieldDescriptor, FieldName, FieldStrategy, FieldValue, ParsedFields,
    ParserState,
};
pub use tokens::{tokenize, BlockKind, BlockToken, Bound, MacosVersion};
