//! Graph emission stage.

use super::{write_output, OutputTarget};
use crate::model::FormulaMap;
use crate::reports::{create_reporter, ReportFormat};
use anyhow::{Context, Result};

/// Render the graph and write it to `target`.
///
/// Rendering completes before the target is opened, so a dangling
/// dependency leaves existing output untouched.
pub fn emit_graph(
    formulas: &FormulaMap,
    format: ReportFormat,
    target: &OutputTarget,
    quiet: bool,
) -> Result<()> {
    let reporter = create_reporter(format);
    let content = reporter
        .generate(formulas)
        .with_context(|| format!("Failed to render {format} graph"))?;
    if !quiet {
        let dependencies: usize = formulas.values().map(|f| f.dependencies.len()).sum();
        tracing::info!(
            formulas = formulas.len(),
            dependencies,
            "Emitting {} graph",
            reporter.format()
        );
    }
    write_output(&content, target, format.appends(), quiet)
}
