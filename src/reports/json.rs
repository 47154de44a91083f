//! JSON graph emitter.

use super::{sorted_formulas, GraphReporter, ReportFormat};
use crate::error::{EmitErrorKind, MinerError, Result};
use crate::model::FormulaMap;

/// JSON reporter: a name-ordered array of resolved formulas.
pub struct JsonReporter {
    pretty: bool,
}

impl JsonReporter {
    #[must_use]
    pub const fn new() -> Self {
        Self { pretty: true }
    }

    /// Emit compact JSON instead.
    #[must_use]
    pub const fn compact(mut self) -> Self {
        self.pretty = false;
        self
    }
}

impl Default for JsonReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl GraphReporter for JsonReporter {
    fn generate(&self, formulas: &FormulaMap) -> Result<String> {
        for formula in formulas.values() {
            if let Some(dep) = formula
                .dependencies
                .iter()
                .find(|d| !formulas.contains_key(&d.name))
            {
                return Err(MinerError::dangling_dependency(&formula.name, &dep.name));
            }
        }
        let sorted = sorted_formulas(formulas);
        let rendered = if self.pretty {
            serde_json::to_string_pretty(&sorted)
        } else {
            serde_json::to_string(&sorted)
        };
        rendered.map_err(|e| MinerError::Emit {
            context: "serializing formulas".to_string(),
            source: EmitErrorKind::Serialization(e.to_string()),
        })
    }

    fn format(&self) -> ReportFormat {
        ReportFormat::Json
    }
}
