//! Configuration types for mining runs.

use super::defaults::{
    DEFAULT_CORPUS_DIR, DEFAULT_EMPTY_POP_TOLERANCE, DEFAULT_FALLBACK_LICENSE, DEFAULT_OUTPUT_DIR,
    MAX_WORKERS,
};
use crate::model::ResolveOptions;
use crate::parsers::ExtractOptions;
use crate::pipeline::ReaderOptions;
use crate::reports::ReportFormat;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

// ============================================================================
// Miner Configuration
// ============================================================================

/// Top-level configuration, loaded from YAML and overridden by CLI flags.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct MinerConfig {
    /// Directory receiving `deps-brew-<date>` files
    pub output_dir: PathBuf,
    /// Graph output format
    pub format: ReportFormat,
    /// Formula corpus location
    #[serde(alias = "core_repo")]
    pub corpus: CorpusConfig,
    /// Corpus reader settings
    pub reader: ReaderConfig,
}

impl Default for MinerConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            format: ReportFormat::default(),
            corpus: CorpusConfig::default(),
            reader: ReaderConfig::default(),
        }
    }
}

impl MinerConfig {
    /// Create a `MinerConfig` builder.
    pub fn builder() -> MinerConfigBuilder {
        MinerConfigBuilder::default()
    }

    /// Options for the corpus reader.
    #[must_use]
    pub fn reader_options(&self) -> ReaderOptions {
        ReaderOptions {
            workers: self.reader.max_workers,
            extract: ExtractOptions {
                empty_pop_tolerance: self.reader.empty_pop_tolerance,
            },
            resolve: self.reader.resolve_options(),
        }
    }
}

/// Location of the formula corpus.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct CorpusConfig {
    /// Root directory holding `Formula/` and `Aliases/`
    pub dir: PathBuf,
}

impl Default for CorpusConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from(DEFAULT_CORPUS_DIR),
        }
    }
}

/// Corpus reader settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct ReaderConfig {
    /// Number of concurrent workers (> 0)
    pub max_workers: usize,
    /// Derive a repository URL from homepage, stable or mirror URLs
    pub derive_repo: bool,
    /// License written for formulas without one
    pub fallback_license: String,
    /// Unmatched `end` lines absorbed per dependency block before warning
    pub empty_pop_tolerance: usize,
}

impl Default for ReaderConfig {
    fn default() -> Self {
        Self {
            max_workers: MAX_WORKERS,
            derive_repo: true,
            fallback_license: DEFAULT_FALLBACK_LICENSE.to_string(),
            empty_pop_tolerance: DEFAULT_EMPTY_POP_TOLERANCE,
        }
    }
}

impl ReaderConfig {
    #[must_use]
    pub fn resolve_options(&self) -> ResolveOptions {
        ResolveOptions {
            derive_repo: self.derive_repo,
            fallback_license: self.fallback_license.clone(),
        }
    }
}

// ============================================================================
// Builder for MinerConfig
// ============================================================================

/// Builder for constructing `MinerConfig` with fluent API.
#[derive(Debug, Default)]
#[must_use]
pub struct MinerConfigBuilder {
    config: MinerConfig,
}

impl MinerConfigBuilder {
    /// Set the output directory.
    pub fn output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config.output_dir = dir.into();
        self
    }

    /// Set the output format.
    pub const fn format(mut self, format: ReportFormat) -> Self {
        self.config.format = format;
        self
    }

    /// Set the corpus root.
    pub fn corpus_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config.corpus.dir = dir.into();
        self
    }

    /// Set the reader worker count.
    pub const fn max_workers(mut self, workers: usize) -> Self {
        self.config.reader.max_workers = workers;
        self
    }

    /// Enable or disable repository URL derivation.
    pub const fn derive_repo(mut self, derive: bool) -> Self {
        self.config.reader.derive_repo = derive;
        self
    }

    /// Set the fallback license.
    pub fn fallback_license(mut self, license: impl Into<String>) -> Self {
        self.config.reader.fallback_license = license.into();
        self
    }

    /// Set the empty-pop tolerance.
    pub const fn empty_pop_tolerance(mut self, tolerance: usize) -> Self {
        self.config.reader.empty_pop_tolerance = tolerance;
        self
    }

    #[must_use]
    pub fn build(self) -> MinerConfig {
        self.config
    }
}
