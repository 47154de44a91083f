//! Pipeline orchestration for mining runs.
//!
//! A run is read → resolve → emit: the concurrent reader turns the corpus
//! into a name-keyed map of resolved formulas, and the emit stage renders
//! that map once the reader has returned.

mod emit_stage;
mod output;
mod reader;

pub use emit_stage::emit_graph;
pub use output::{output_file_name, prepare_output_dir, write_output, OutputTarget};
pub use reader::{enumerate_corpus, read_corpus, read_formula, ReaderOptions, CORPUS_PATTERNS};

/// Process exit codes
pub mod exit_codes {
    /// Run completed and the graph was written
    pub const SUCCESS: i32 = 0;
    /// An error occurred
    pub const ERROR: i32 = 1;
}
