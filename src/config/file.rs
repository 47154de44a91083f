//! Configuration file loading and discovery.
//!
//! Supports loading configuration from YAML files with automatic discovery.

use super::types::MinerConfig;
use std::path::{Path, PathBuf};

// ============================================================================
// Configuration File Discovery
// ============================================================================

/// Standard config file names to search for.
const CONFIG_FILE_NAMES: &[&str] = &[
    ".formula-miner.yaml",
    ".formula-miner.yml",
    "formula-miner.yaml",
    "formula-miner.yml",
    "config.yml",
];

/// Discover a config file by searching standard locations.
///
/// Search order:
/// 1. Explicit path if provided
/// 2. Current directory
/// 3. User config directory (~/.config/formula-miner/)
/// 4. Home directory
#[must_use]
pub fn discover_config_file(explicit_path: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit_path {
        if path.exists() {
            return Some(path.to_path_buf());
        }
    }

    let cwd = std::env::current_dir().ok();
    let user_dir = dirs::config_dir().map(|d| d.join("formula-miner"));
    let home = dirs::home_dir();

    [cwd, user_dir, home]
        .into_iter()
        .flatten()
        .find_map(|dir| find_config_in_dir(&dir))
}

/// Find a config file in a specific directory.
fn find_config_in_dir(dir: &Path) -> Option<PathBuf> {
    CONFIG_FILE_NAMES
        .iter()
        .map(|name| dir.join(name))
        .find(|path| path.exists())
}

// ============================================================================
// Configuration File Loading
// ============================================================================

/// Error type for config file operations.
#[derive(Debug)]
pub enum ConfigFileError {
    /// File not found
    NotFound(PathBuf),
    /// IO error reading file
    Io(std::io::Error),
    /// YAML parsing error
    Parse(serde_yaml::Error),
}

impl std::fmt::Display for ConfigFileError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotFound(path) => {
                write!(f, "Config file not found: {}", path.display())
            }
            Self::Io(e) => write!(f, "Failed to read config file: {e}"),
            Self::Parse(e) => write!(f, "Failed to parse config file: {e}"),
        }
    }
}

impl std::error::Error for ConfigFileError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::NotFound(_) => None,
            Self::Io(e) => Some(e),
            Self::Parse(e) => Some(e),
        }
    }
}

impl From<std::io::Error> for ConfigFileError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<serde_yaml::Error> for ConfigFileError {
    fn from(err: serde_yaml::Error) -> Self {
        Self::Parse(err)
    }
}

/// Load a `MinerConfig` from a YAML file.
pub fn load_config_file(path: &Path) -> Result<MinerConfig, ConfigFileError> {
    if !path.exists() {
        return Err(ConfigFileError::NotFound(path.to_path_buf()));
    }

    let content = std::fs::read_to_string(path)?;
    let config: MinerConfig = serde_yaml::from_str(&content)?;
    Ok(config)
}

/// Load config from discovered file, or return default.
#[must_use]
pub fn load_or_default(explicit_path: Option<&Path>) -> (MinerConfig, Option<PathBuf>) {
    discover_config_file(explicit_path).map_or_else(
        || (MinerConfig::default(), None),
        |path| match load_config_file(&path) {
            Ok(config) => (config, Some(path)),
            Err(e) => {
                tracing::warn!("Failed to load config from {}: {}", path.display(), e);
                (MinerConfig::default(), None)
            }
        },
    )
}

// ============================================================================
// Configuration Merging
// ============================================================================

impl MinerConfig {
    /// Merge another config into this one, with `other` taking precedence
    /// wherever it differs from the defaults.
    ///
    /// This is useful for layering CLI args over file config.
    pub fn merge(&mut self, other: &Self) {
        let defaults = Self::default();

        if other.output_dir != defaults.output_dir {
            self.output_dir.clone_from(&other.output_dir);
        }
        if other.format != defaults.format {
            self.format = other.format;
        }
        if other.corpus.dir != defaults.corpus.dir {
            self.corpus.dir.clone_from(&other.corpus.dir);
        }

        let reader = &other.reader;
        if reader.max_workers != defaults.reader.max_workers {
            self.reader.max_workers = reader.max_workers;
        }
        if !reader.derive_repo {
            self.reader.derive_repo = false;
        }
        if reader.fallback_license != defaults.reader.fallback_license {
            self.reader.fallback_license.clone_from(&reader.fallback_license);
        }
        if reader.empty_pop_tolerance != defaults.reader.empty_pop_tolerance {
            self.reader.empty_pop_tolerance = reader.empty_pop_tolerance;
        }
    }

    /// Load from file and merge with CLI overrides.
    #[must_use]
    pub fn from_file_with_overrides(
        config_path: Option<&Path>,
        cli_overrides: &Self,
    ) -> (Self, Option<PathBuf>) {
        let (mut config, loaded_from) = load_or_default(config_path);
        config.merge(cli_overrides);
        (config, loaded_from)
    }
}

// ============================================================================
// Example Config Generation
// ============================================================================

/// Generate an example config file content.
#[must_use]
pub fn generate_example_config() -> String {
    let example = MinerConfig::default();
    format!(
        r"# formula-miner configuration
# Place this file at .formula-miner.yaml in your working directory or ~/.config/formula-miner/

{}",
        serde_yaml::to_string(&example).unwrap_or_default()
    )
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reports::ReportFormat;
    use tempfile::TempDir;

    #[test]
    fn test_find_config_in_dir() {
        let tmp = TempDir::new().unwrap();
        let config_path = tmp.path().join(".formula-miner.yaml");
        std::fs::write(&config_path, "output_dir: graphs\n").unwrap();

        assert_eq!(find_config_in_dir(tmp.path()), Some(config_path));
    }

    #[test]
    fn test_find_config_in_dir_not_found() {
        let tmp = TempDir::new().unwrap();
        assert_eq!(find_config_in_dir(tmp.path()), None);
    }

    #[test]
    fn test_load_config_file() {
        let tmp = TempDir::new().unwrap();
        let config_path = tmp.path().join("config.yml");

        let yaml = r"
output_dir: graphs
format: json
corpus:
  dir: /srv/homebrew-core
reader:
  max_workers: 4
  derive_repo: false
";
        std::fs::write(&config_path, yaml).unwrap();

        let config = load_config_file(&config_path).unwrap();
        assert_eq!(config.output_dir, PathBuf::from("graphs"));
        assert_eq!(config.format, ReportFormat::Json);
        assert_eq!(config.corpus.dir, PathBuf::from("/srv/homebrew-core"));
        assert_eq!(config.reader.max_workers, 4);
        assert!(!config.reader.derive_repo);
        assert_eq!(config.reader.fallback_license, "pseudo");
    }

    #[test]
    fn test_load_config_file_not_found() {
        let result = load_config_file(Path::new("/nonexistent/config.yml"));
        assert!(matches!(result, Err(ConfigFileError::NotFound(_))));
    }

    #[test]
    fn test_load_config_file_invalid_yaml() {
        let tmp = TempDir::new().unwrap();
        let config_path = tmp.path().join("config.yml");
        std::fs::write(&config_path, "reader: [not, a, map]\n").unwrap();
        assert!(matches!(
            load_config_file(&config_path),
            Err(ConfigFileError::Parse(_))
        ));
    }

    #[test]
    fn test_config_merge() {
        let mut base = MinerConfig::builder()
            .corpus_dir("/from/file")
            .max_workers(3)
            .build();
        let overrides = MinerConfig::builder()
            .output_dir("elsewhere")
            .derive_repo(false)
            .build();

        base.merge(&overrides);

        assert_eq!(base.output_dir, PathBuf::from("elsewhere"));
        assert_eq!(base.corpus.dir, PathBuf::from("/from/file"));
        assert_eq!(base.reader.max_workers, 3);
        assert!(!base.reader.derive_repo);
    }

    #[test]
    fn test_generate_example_config() {
        let example = generate_example_config();
        assert!(example.contains("output_dir:"));
        assert!(example.contains("max_workers"));
        let parsed: MinerConfig = serde_yaml::from_str(&example).unwrap();
        assert_eq!(parsed, MinerConfig::default());
    }

    #[test]
    fn test_discover_explicit_path() {
        let tmp = TempDir::new().unwrap();
        let config_path = tmp.path().join("custom-config.yaml");
        std::fs::write(&config_path, "output_dir: x\n").unwrap();

        assert_eq!(discover_config_file(Some(&config_path)), Some(config_path));
    }
}
