//! Mine command handler.
//!
//! Implements the `mine` subcommand: read the whole corpus, then emit the
//! dependency graph to a dated file under the output directory.

use crate::config::{MinerConfig, Validatable};
use crate::pipeline::{emit_graph, exit_codes, prepare_output_dir, read_corpus, OutputTarget};
use anyhow::{Context, Result};
use chrono::NaiveDate;

/// Run the mine command, returning the desired exit code.
///
/// The caller is responsible for calling `std::process::exit()` with the
/// returned code when it is non-zero.
#[allow(clippy::needless_pass_by_value)]
pub fn run_mine(config: MinerConfig, to_stdout: bool, quiet: bool) -> Result<i32> {
    mine_on(&config, chrono::Local::now().date_naive(), to_stdout, quiet)
}

/// Mine with an explicit run date.
pub(crate) fn mine_on(
    config: &MinerConfig,
    date: NaiveDate,
    to_stdout: bool,
    quiet: bool,
) -> Result<i32> {
    let errors = config.validate();
    if !errors.is_empty() {
        for error in &errors {
            tracing::error!("Invalid configuration: {error}");
        }
        return Ok(exit_codes::ERROR);
    }

    let target = if to_stdout {
        OutputTarget::Stdout
    } else {
        prepare_output_dir(&config.output_dir)?;
        OutputTarget::dated(&config.output_dir, date, config.format)
    };

    let formulas = read_corpus(&config.corpus.dir, &config.reader_options())
        .with_context(|| format!("Failed to read corpus {}", config.corpus.dir.display()))?;

    emit_graph(&formulas, config.format, &target, quiet)?;
    Ok(exit_codes::SUCCESS)
}
