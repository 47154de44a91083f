//! TSV graph emitter.
//!
//! ```text
//! 0	"brew"	"<name>"	"<license>"	"<repo url>"	"<archive url>"	"<system requirement>"
//! 1	"brew"	"<dependency>"	"<dependency license>"	"<types>"	"<restriction>"
//! ```

use super::{sorted_formulas, GraphReporter, ReportFormat};
use crate::error::{MinerError, Result};
use crate::model::{Formula, FormulaMap};

/// Package-manager label carried in the second column of every record.
pub const PACKAGE_MANAGER: &str = "brew";

const PACKAGE_RECORD: u8 = 0;
const DEPENDENCY_RECORD: u8 = 1;

/// TSV reporter.
pub struct TsvReporter;

impl TsvReporter {
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl Default for TsvReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl GraphReporter for TsvReporter {
    fn generate(&self, formulas: &FormulaMap) -> Result<String> {
        let mut content = String::new();
        for formula in sorted_formulas(formulas) {
            write_formula(&mut content, formula, formulas)?;
        }
        Ok(content)
    }

    fn format(&self) -> ReportFormat {
        ReportFormat::Tsv
    }
}

fn write_formula(content: &mut String, formula: &Formula, formulas: &FormulaMap) -> Result<()> {
    push_record(
        content,
        PACKAGE_RECORD,
        &[
            formula.name.as_str(),
            formula.license.as_str(),
            formula.repo_url.as_str(),
            formula.archive_url.as_str(),
            formula.system_requirement.as_str(),
        ],
    );
    for dep in &formula.dependencies {
        let target = formulas
            .get(&dep.name)
            .ok_or_else(|| MinerError::dangling_dependency(&formula.name, &dep.name))?;
        push_record(
            content,
            DEPENDENCY_RECORD,
            &[
                dep.name.as_str(),
                target.license.as_str(),
                dep.types_label().as_str(),
                dep.restriction.as_str(),
            ],
        );
    }
    Ok(())
}

fn push_record(content: &mut String, kind: u8, fields: &[&str]) {
    content.push_str(&kind.to_string());
    content.push_str("\t\"");
    content.push_str(PACKAGE_MANAGER);
    content.push('"');
    for field in fields {
        content.push_str("\t\"");
        content.push_str(&escape_field(field));
        content.push('"');
    }
    content.push('\n');
}

/// Keep a field on one line and inside its quotes.
fn escape_field(field: &str) -> String {
    field
        .chars()
        .map(|c| match c {
            '\t' | '\n' | '\r' => ' ',
            '"' => '\'',
            other => other,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::EmitErrorKind;
    use crate::model::{Dependency, DependencySet};

    fn formula(name: &str, license: &str, deps: Vec<Dependency>) -> Formula {
        Formula {
            name: name.to_string(),
            license: license.to_string(),
            repo_url: format!("https://github.com/x/{name}.git"),
            archive_url: format!("https://x.org/{name}.tgz"),
            system_requirement: String::new(),
            dependencies: DependencySet::from(deps),
        }
    }

    fn map(formulas: Vec<Formula>) -> FormulaMap {
        formulas.into_iter().map(|f| (f.name.clone(), f)).collect()
    }

    #[test]
    fn test_records() {
        let formulas = map(vec![
            formula(
                "wget",
                "GPL-3.0-or-later",
                vec![
                    Dependency::new("pkgconf", vec!["build".to_string()]),
                    Dependency::new("openssl@3", vec![]).with_restriction("linux"),
                ],
            ),
            formula("pkgconf", "pkgconf", vec![]),
            formula("openssl@3", "Apache-2.0", vec![]),
        ]);
        let out = TsvReporter::new().generate(&formulas).unwrap();
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(
            lines,
            vec![
                "0\t\"brew\"\t\"openssl@3\"\t\"Apache-2.0\"\t\"https://github.com/x/openssl@3.git\"\t\"https://x.org/openssl@3.tgz\"\t\"\"",
                "0\t\"brew\"\t\"pkgconf\"\t\"pkgconf\"\t\"https://github.com/x/pkgconf.git\"\t\"https://x.org/pkgconf.tgz\"\t\"\"",
                "0\t\"brew\"\t\"wget\"\t\"GPL-3.0-or-later\"\t\"https://github.com/x/wget.git\"\t\"https://x.org/wget.tgz\"\t\"\"",
                "1\t\"brew\"\t\"pkgconf\"\t\"pkgconf\"\t\"build\"\t\"\"",
                "1\t\"brew\"\t\"openssl@3\"\t\"Apache-2.0\"\t\"\"\t\"linux\"",
            ]
        );
    }

    #[test]
    fn test_dangling_dependency() {
        let formulas = map(vec![formula(
            "wget",
            "GPL-3.0-or-later",
            vec![Dependency::new("libidn3", vec![])],
        )]);
        let err = TsvReporter::new().generate(&formulas).unwrap_err();
        match err {
            MinerError::Emit {
                source: EmitErrorKind::DanglingDependency { formula, dependency },
                ..
            } => {
                assert_eq!(formula, "wget");
                assert_eq!(dependency, "libidn3");
            }
            other => panic!("Expected dangling dependency, got {other:?}"),
        }
    }

    #[test]
    fn test_escape_field() {
        assert_eq!(escape_field("a\tb\"c\""), "a b'c'");
    }
}
