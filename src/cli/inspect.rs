//! Inspect command handler.
//!
//! Implements the `inspect` subcommand for examining a single formula file.

use crate::config::MinerConfig;
use crate::model::{normalize_license, to_spdx_expression, Formula};
use crate::parsers::parse_formula_file;
use crate::pipeline::exit_codes;
use anyhow::{Context, Result};
use serde::Serialize;
use std::path::Path;

/// A formula together with the SPDX rendering of its license.
#[derive(Debug, Serialize)]
struct Inspection<'a, T: Serialize> {
    #[serde(flatten)]
    formula: &'a T,
    #[serde(skip_serializing_if = "Option::is_none")]
    spdx_license: Option<String>,
}

/// Run the inspect command, printing JSON to stdout.
pub fn run_inspect(path: &Path, raw: bool, config: &MinerConfig) -> Result<i32> {
    println!("{}", inspect_formula(path, raw, config)?);
    Ok(exit_codes::SUCCESS)
}

/// Extract one formula file and render it as pretty JSON.
pub fn inspect_formula(path: &Path, raw: bool, config: &MinerConfig) -> Result<String> {
    let options = config.reader_options();
    let source = parse_formula_file(path, &options.extract)
        .with_context(|| format!("Failed to extract {}", path.display()))?;

    let json = if raw {
        let normalized = normalize_license(
            source.license.as_deref().unwrap_or_default(),
            &options.resolve.fallback_license,
        );
        serde_json::to_string_pretty(&Inspection {
            formula: &source,
            spdx_license: to_spdx_expression(&normalized),
        })
    } else {
        let formula = Formula::from_source(source, &options.resolve);
        serde_json::to_string_pretty(&Inspection {
            spdx_license: to_spdx_expression(&formula.license),
            formula: &formula,
        })
    };
    json.context("Failed to serialize formula")
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const FORMULA: &str = r#"class Jq < Formula
  desc "Lightweight and flexible command-line JSON processor"
  homepage "https://jqlang.github.io/jq/"
  url "https://github.com/jqlang/jq/releases/download/jq-1.7.1/jq-1.7.1.tar.gz"
  license "MIT"

  head do
    url "https://github.com/jqlang/jq.git", branch: "master"

    depends_on "autoconf" => :build
  end

  depends_on "oniguruma"

  def install
  end
end
"#;

    fn write(dir: &TempDir) -> std::path::PathBuf {
        let path = dir.path().join("jq.rb");
        std::fs::write(&path, FORMULA).unwrap();
        path
    }

    #[test]
    fn test_inspect_resolved() {
        let dir = TempDir::new().unwrap();
        let json = inspect_formula(&write(&dir), false, &MinerConfig::default()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["name"], "jq");
        assert_eq!(value["license"], "MIT");
        assert_eq!(value["spdx_license"], "MIT");
        assert_eq!(value["repo_url"], "https://github.com/jqlang/jq.git");
        assert_eq!(value["dependencies"].as_array().unwrap().len(), 2);
    }

    #[test]
    fn test_inspect_raw() {
        let dir = TempDir::new().unwrap();
        let json = inspect_formula(&write(&dir), true, &MinerConfig::default()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["homepage"], "https://jqlang.github.io/jq/");
        assert_eq!(value["license"], "\"MIT\"");
        assert!(value.get("head").is_some());
    }

    #[test]
    fn test_inspect_missing_file() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("nope.rb");
        assert!(inspect_formula(&missing, false, &MinerConfig::default()).is_err());
    }
}
