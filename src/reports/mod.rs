//! Dependency graph emitters.
//!
//! - TSV: the line-oriented graph consumed downstream (`0` package rows,
//!   `1` dependency rows)
//! - JSON: the resolved formulas, for inspection and debugging
//!
//! Every emitter renders the full graph in memory before anything is
//! written, so a dangling dependency reference never leaves a partial
//! output file behind.

mod json;
mod tsv;

pub use json::JsonReporter;
pub use tsv::{TsvReporter, PACKAGE_MANAGER};

use crate::error::{EmitErrorKind, MinerError, Result};
use crate::model::FormulaMap;
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::io::Write;

/// Output format of the mined graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum, schemars::JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    /// Tab-separated graph records
    #[default]
    Tsv,
    /// Pretty-printed JSON array of resolved formulas
    Json,
}

impl ReportFormat {
    /// File extension used for dated output files.
    #[must_use]
    pub const fn extension(self) -> &'static str {
        match self {
            Self::Tsv => "tsv",
            Self::Json => "json",
        }
    }

    /// Whether repeated runs append to an existing output file.
    #[must_use]
    pub const fn appends(self) -> bool {
        matches!(self, Self::Tsv)
    }
}

impl std::fmt::Display for ReportFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.extension())
    }
}

/// Trait for graph emitters.
pub trait GraphReporter {
    /// Render the whole graph.
    fn generate(&self, formulas: &FormulaMap) -> Result<String>;

    /// Render the graph and write it to `writer`.
    fn write_graph(&self, formulas: &FormulaMap, writer: &mut dyn Write) -> Result<()> {
        let content = self.generate(formulas)?;
        writer.write_all(content.as_bytes()).map_err(|e| MinerError::Emit {
            context: "writing dependency graph".to_string(),
            source: EmitErrorKind::Write(e.to_string()),
        })
    }

    /// Get the format this reporter produces
    fn format(&self) -> ReportFormat;
}

/// Create the reporter for a format.
#[must_use]
pub fn create_reporter(format: ReportFormat) -> Box<dyn GraphReporter> {
    match format {
        ReportFormat::Tsv => Box::new(TsvReporter::new()),
        ReportFormat::Json => Box::new(JsonReporter::new()),
    }
}

/// Formulas in name order.
pub(crate) fn sorted_formulas(formulas: &FormulaMap) -> Vec<&crate::model::Formula> {
    let mut sorted: Vec<_> = formulas.values().collect();
    sorted.sort_by(|a, b| a.name.cmp(&b.name));
    sorted
}
