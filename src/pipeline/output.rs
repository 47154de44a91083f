//! Output handling for the mined graph.
//!
//! Provides the dated output file naming and writes rendered graphs to
//! stdout or to a file under the output directory.

use crate::reports::{ReportFormat, PACKAGE_MANAGER};
use anyhow::{Context, Result};
use chrono::NaiveDate;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Target for output - either stdout or a file
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputTarget {
    /// Write to stdout
    Stdout,
    /// Write to a file
    File(PathBuf),
}

impl OutputTarget {
    /// Dated file under `dir`, e.g. `out/deps-brew-2024-05-01.tsv`.
    #[must_use]
    pub fn dated(dir: &Path, date: NaiveDate, format: ReportFormat) -> Self {
        Self::File(dir.join(output_file_name(date, format)))
    }
}

/// `deps-brew-<YYYY-MM-DD>.<ext>`
#[must_use]
pub fn output_file_name(date: NaiveDate, format: ReportFormat) -> String {
    format!(
        "deps-{PACKAGE_MANAGER}-{}.{}",
        date.format("%Y-%m-%d"),
        format.extension()
    )
}

/// Create the output directory when it does not exist yet.
pub fn prepare_output_dir(dir: &Path) -> Result<()> {
    std::fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create output directory {}", dir.display()))
}

/// Write output to the target (stdout or file).
///
/// With `append`, an existing file is extended instead of replaced.
pub fn write_output(content: &str, target: &OutputTarget, append: bool, quiet: bool) -> Result<()> {
    match target {
        OutputTarget::Stdout => {
            print!("{content}");
            Ok(())
        }
        OutputTarget::File(path) => {
            let mut file = OpenOptions::new()
                .create(true)
                .write(true)
                .append(append)
                .truncate(!append)
                .open(path)
                .with_context(|| format!("Failed to open output file {}", path.display()))?;
            file.write_all(content.as_bytes())
                .with_context(|| format!("Failed to write output to {}", path.display()))?;
            if !quiet {
                tracing::info!("Graph written to {}", path.display());
            }
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_output_file_name() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 9).unwrap();
        assert_eq!(output_file_name(date, ReportFormat::Tsv), "deps-brew-2024-03-09.tsv");
        assert_eq!(
            OutputTarget::dated(Path::new("out"), date, ReportFormat::Json),
            OutputTarget::File(PathBuf::from("out/deps-brew-2024-03-09.json"))
        );
    }

    #[test]
    fn test_append_and_truncate() {
        let dir = TempDir::new().unwrap();
        let nested = dir.path().join("a/b");
        prepare_output_dir(&nested).unwrap();
        let target = OutputTarget::File(nested.join("graph.tsv"));

        write_output("one\n", &target, true, true).unwrap();
        write_output("two\n", &target, true, true).unwrap();
        assert_eq!(
            std::fs::read_to_string(nested.join("graph.tsv")).unwrap(),
            "one\ntwo\n"
        );

        write_output("three\n", &target, false, true).unwrap();
        assert_eq!(
            std::fs::read_to_string(nested.join("graph.tsv")).unwrap(),
            "three\n"
        );
    }
}
