//! Unified error types for formula-miner.
//!
//! This module provides the error hierarchy for the library, with enough
//! context on each variant to point at the formula file or corpus entry
//! that caused the failure.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for formula-miner operations.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum MinerError {
    /// Errors while extracting a single formula file
    #[error("Failed to parse formula: {context}")]
    Parse {
        context: String,
        #[source]
        source: ParseErrorKind,
    },

    /// Errors while emitting the dependency graph
    #[error("Emission failed: {context}")]
    Emit {
        context: String,
        #[source]
        source: EmitErrorKind,
    },

    /// IO errors with context
    #[error("IO error at {path:?}: {message}")]
    Io {
        path: Option<PathBuf>,
        message: String,
        #[source]
        source: std::io::Error,
    },

    /// Corpus layout problems (missing root, bad glob)
    #[error("Invalid corpus: {0}")]
    Corpus(String),

    /// Worker pool construction or scheduling failures
    #[error("Worker pool failed: {0}")]
    Worker(String),

    /// Configuration errors
    #[error("Invalid configuration: {0}")]
    Config(String),
}

/// Specific parse error kinds
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ParseErrorKind {
    #[error("Missing required field: {field}")]
    MissingField { field: String },

    #[error("Unterminated {field} block at end of file")]
    UnterminatedSequence { field: String },

    #[error("Could not resolve interpolated variable '{variable}' in {url}")]
    UnresolvedInterpolation { variable: String, url: String },
}

/// Specific emission error kinds
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum EmitErrorKind {
    #[error("Formula '{formula}' depends on '{dependency}', which is not in the corpus")]
    DanglingDependency { formula: String, dependency: String },

    #[error("Write failed: {0}")]
    Write(String),

    #[error("Serialization failed: {0}")]
    Serialization(String),
}

// ============================================================================
// Result type alias
// ============================================================================

/// Convenient Result type for formula-miner operations
pub type Result<T> = std::result::Result<T, MinerError>;

// ============================================================================
// Error construction helpers
// ============================================================================

impl MinerError {
    /// Create a parse error with context
    pub fn parse(context: impl Into<String>, source: ParseErrorKind) -> Self {
        Self::Parse {
            context: context.into(),
            source,
        }
    }

    /// Create a parse error for a required field that never appeared
    pub fn missing_field(field: impl Into<String>, context: impl Into<String>) -> Self {
        Self::parse(
            context,
            ParseErrorKind::MissingField {
                field: field.into(),
            },
        )
    }

    /// Create an emission error for a dependency name absent from the map
    pub fn dangling_dependency(formula: impl Into<String>, dependency: impl Into<String>) -> Self {
        Self::Emit {
            context: "checking dependency references".to_string(),
            source: EmitErrorKind::DanglingDependency {
                formula: formula.into(),
                dependency: dependency.into(),
            },
        }
    }

    /// Create an IO error with path context
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        let path = path.into();
        let message = format!("{source}");
        Self::Io {
            path: Some(path),
            message,
            source,
        }
    }

    /// Create a corpus error
    pub fn corpus(message: impl Into<String>) -> Self {
        Self::Corpus(message.into())
    }

    /// Create a config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }
}

// ============================================================================
// Conversions from existing error types
// ============================================================================

impl From<std::io::Error> for MinerError {
    fn from(err: std::io::Error) -> Self {
        Self::Io {
            path: None,
            message: format!("{err}"),
            source: err,
        }
    }
}

impl From<glob::PatternError> for MinerError {
    fn from(err: glob::PatternError) -> Self {
        Self::Corpus(format!("invalid glob pattern: {err}"))
    }
}

impl From<rayon::ThreadPoolBuildError> for MinerError {
    fn from(err: rayon::ThreadPoolBuildError) -> Self {
        Self::Worker(err.to_string())
    }
}

// ============================================================================
// Error context extension trait
// ============================================================================

/// Extension trait for adding context to errors.
///
/// Context strings chain outward, so an error raised while cleaning a
/// dependency block inside `foo.rb` reads
/// `"reading /corpus/Formula/f/foo.rb: stable block: ..."`.
///
/// # Example
///
/// ```ignore
/// use formula_miner::error::ErrorContext;
///
/// fn load(path: &Path) -> Result<SourceFormula> {
///     let content = std::fs::read_to_string(path)
///         .with_context(|| format!("reading {}", path.display()))?;
///     extract_source_formula("foo", &content)
///         .context("extracting formula")
/// }
/// ```
pub trait ErrorContext<T> {
    /// Add context to an error.
    ///
    /// The context string is prepended to the error's existing context.
    fn context(self, context: impl Into<String>) -> Result<T>;

    /// Add context from a closure, evaluated only on error.
    fn with_context<F, C>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> C,
        C: Into<String>;
}

impl<T, E: Into<MinerError>> ErrorContext<T> for std::result::Result<T, E> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        let ctx: String = context.into();
        self.map_err(|e| add_context_to_error(e.into(), &ctx))
    }

    fn with_context<F, C>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> C,
        C: Into<String>,
    {
        self.map_err(|e| {
            let ctx: String = f().into();
            add_context_to_error(e.into(), &ctx)
        })
    }
}

/// Add context to an error, chaining with any existing context.
fn add_context_to_error(err: MinerError, new_ctx: &str) -> MinerError {
    match err {
        MinerError::Parse {
            context: existing,
            source,
        } => MinerError::Parse {
            context: chain_context(new_ctx, &existing),
            source,
        },
        MinerError::Emit {
            context: existing,
            source,
        } => MinerError::Emit {
            context: chain_context(new_ctx, &existing),
            source,
        },
        MinerError::Io {
            path,
            message,
            source,
        } => MinerError::Io {
            path,
            message: chain_context(new_ctx, &message),
            source,
        },
        MinerError::Corpus(msg) => MinerError::Corpus(chain_context(new_ctx, &msg)),
        MinerError::Worker(msg) => MinerError::Worker(chain_context(new_ctx, &msg)),
        MinerError::Config(msg) => MinerError::Config(chain_context(new_ctx, &msg)),
    }
}

/// Chain two context strings together.
///
/// If the existing context is empty, returns just the new context.
/// Otherwise, returns "`new_context`: `existing_context`".
fn chain_context(new: &str, existing: &str) -> String {
    if existing.is_empty() {
        new.to_string()
    } else {
        format!("{new}: {existing}")
    }
}

/// Extension trait for Option types to convert to errors with context.
pub trait OptionContext<T> {
    /// Convert None to a missing-field error for `field`.
    fn required(self, field: &str, context: impl Into<String>) -> Result<T>;
}

impl<T> OptionContext<T> for Option<T> {
    fn required(self, field: &str, context: impl Into<String>) -> Result<T> {
        self.ok_or_else(|| MinerError::missing_field(field, context))
    }
}
