//! Configuration validation.

use super::types::{CorpusConfig, MinerConfig, ReaderConfig};

// ============================================================================
// Configuration Error
// ============================================================================

/// Error type for configuration validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigError {
    /// The field that failed validation
    pub field: String,
    /// Description of the validation error
    pub message: String,
}

impl ConfigError {
    fn new(field: &str, message: impl Into<String>) -> Self {
        Self {
            field: field.to_string(),
            message: message.into(),
        }
    }
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

impl std::error::Error for ConfigError {}

// ============================================================================
// Validation Trait
// ============================================================================

/// Trait for validatable configuration types.
pub trait Validatable {
    /// Validate the configuration, returning any errors found.
    fn validate(&self) -> Vec<ConfigError>;

    /// Check if the configuration is valid.
    fn is_valid(&self) -> bool {
        self.validate().is_empty()
    }
}

// ============================================================================
// Validation Implementations
// ============================================================================

impl Validatable for MinerConfig {
    fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();

        if self.output_dir.as_os_str().is_empty() {
            errors.push(ConfigError::new("output_dir", "Output directory must not be empty"));
        } else if self.output_dir.exists() && !self.output_dir.is_dir() {
            errors.push(ConfigError::new(
                "output_dir",
                format!("{} exists and is not a directory", self.output_dir.display()),
            ));
        }

        errors.extend(self.corpus.validate());
        errors.extend(self.reader.validate());
        errors
    }
}

impl Validatable for CorpusConfig {
    fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();
        if self.dir.as_os_str().is_empty() {
            errors.push(ConfigError::new("corpus.dir", "Corpus directory must not be empty"));
        }
        errors
    }
}

impl Validatable for ReaderConfig {
    fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();
        if self.max_workers == 0 {
            errors.push(ConfigError::new(
                "reader.max_workers",
                "Worker count must be greater than 0",
            ));
        }
        if self.fallback_license.trim().is_empty() {
            errors.push(ConfigError::new(
                "reader.fallback_license",
                "Fallback license must not be empty",
            ));
        }
        errors
    }
}
