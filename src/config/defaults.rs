//! Default values for formula-miner configuration.

/// Directory receiving dated graph files.
pub const DEFAULT_OUTPUT_DIR: &str = "out";

/// Checkout of the formula repository.
pub const DEFAULT_CORPUS_DIR: &str = "tmp/homebrew-core";

/// Reader worker count.
pub const MAX_WORKERS: usize = 10;

/// Unmatched `end` lines absorbed per dependency block.
pub const DEFAULT_EMPTY_POP_TOLERANCE: usize = 1;

pub use crate::model::DEFAULT_FALLBACK_LICENSE;
