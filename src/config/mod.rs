//! Configuration module for formula-miner.
//!
//! This module provides:
//! - Type-safe configuration structures with defaults
//! - Validation for all configuration values
//! - YAML config file loading and discovery
//! - CLI argument merging
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use formula_miner::config::MinerConfig;
//!
//! let config = MinerConfig::builder()
//!     .corpus_dir("tmp/homebrew-core")
//!     .max_workers(4)
//!     .build();
//!
//! use formula_miner::config::file::load_or_default;
//! let (config, loaded_from) = load_or_default(None);
//! ```
//!
//! # Configuration File
//!
//! Place a `.formula-miner.yaml` file in the working directory or
//! `~/.config/formula-miner/`:
//!
//! ```yaml
//! output_dir: out
//! corpus:
//!   dir: tmp/homebrew-core
//! reader:
//!   max_workers: 10
//!   fallback_license: pseudo
//! ```

pub mod defaults;
pub mod file;
mod types;
mod validation;

pub use types::{CorpusConfig, MinerConfig, MinerConfigBuilder, ReaderConfig};
pub use validation::{ConfigError, Validatable};

pub use file::{
    discover_config_file, generate_example_config, load_config_file, load_or_default,
    ConfigFileError,
};

/// Generate a JSON Schema for the `MinerConfig` configuration format.
///
/// The schema documents every option accepted in `.formula-miner.yaml`
/// and can be used by editors for validation and autocompletion.
#[must_use]
pub fn generate_json_schema() -> String {
    let schema = schemars::schema_for!(MinerConfig);
    serde_json::to_string_pretty(&schema).unwrap_or_default()
}
