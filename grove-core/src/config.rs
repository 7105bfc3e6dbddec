//! Analysis configuration.
//!
//! Stored as `.grove/config.json` next to the catalog. Every field has a
//! default, so a partial file (or none at all) is valid.

use crate::error::ConfigError;
use crate::node::{Category, Importance};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Directory holding Grove's per-project files.
pub const CONFIG_DIR: &str = ".grove";

/// Config file name inside [`CONFIG_DIR`].
pub const CONFIG_FILE: &str = "config.json";

/// Layout direction of generated diagrams.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Direction {
    /// Top to bottom.
    #[default]
    TD,
    /// Left to right.
    LR,
    /// Bottom to top.
    BT,
    /// Right to left.
    RL,
}

impl Direction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::TD => "TD",
            Self::LR => "LR",
            Self::BT => "BT",
            Self::RL => "RL",
        }
    }
}

/// Serializable description of a node subset for filtered diagrams.
///
/// An empty `categories` list means every category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterSpec {
    pub min_importance: Importance,
    pub categories: Vec<Category>,
}

impl Default for FilterSpec {
    fn default() -> Self {
        Self {
            min_importance: Importance::Critical,
            categories: Vec::new(),
        }
    }
}

/// Settings for one analysis run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Escalate cycles from warnings to errors.
    pub strict: bool,
    /// Maximum number of chains to report (0 = unlimited).
    pub chain_limit: usize,
    /// How many most-connected nodes the report lists.
    pub top_n: usize,
    pub direction: Direction,
    /// Node subset for the filtered diagram.
    pub filter: FilterSpec,
    /// Where exported artifacts go, relative to the working directory.
    pub output_dir: PathBuf,
    /// Extra attempts per artifact after a failed write.
    pub export_retries: usize,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            strict: false,
            chain_limit: 10,
            top_n: 10,
            direction: Direction::TD,
            filter: FilterSpec::default(),
            output_dir: PathBuf::from("grove-out"),
            export_retries: 1,
        }
    }
}

impl AnalysisConfig {
    /// Location of the config file for a project root.
    pub fn path_in(root: &Path) -> PathBuf {
        root.join(CONFIG_DIR).join(CONFIG_FILE)
    }

    /// Loads the config under `root`, falling back to defaults when the
    /// file does not exist.
    pub fn load_or_default(root: &Path) -> Result<Self, ConfigError> {
        let path = Self::path_in(root);
        if !path.exists() {
            tracing::debug!("no config at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let json = fs::read_to_string(&path).map_err(|source| ConfigError::Io {
            path: path.clone(),
            source,
        })?;
        Ok(serde_json::from_str(&json)?)
    }

    /// Writes this config under `root`, creating the config directory.
    pub fn save(&self, root: &Path) -> Result<PathBuf, ConfigError> {
        let dir = root.join(CONFIG_DIR);
        fs::create_dir_all(&dir).map_err(|source| ConfigError::Io {
            path: dir.clone(),
            source,
        })?;

        let path = dir.join(CONFIG_FILE);
        fs::write(&path, serde_json::to_string_pretty(self)?).map_err(|source| {
            ConfigError::Io {
                path: path.clone(),
                source,
            }
        })?;
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_partial_config_uses_defaults() {
        let config: AnalysisConfig = serde_json::from_str(r#"{"strict": true}"#).unwrap();
        assert!(config.strict);
        assert_eq!(config.chain_limit, 10);
        assert_eq!(config.filter.min_importance, Importance::Critical);
    }

    #[test]
    fn test_missing_file_is_default() {
        let dir = tempdir().unwrap();
        let config = AnalysisConfig::load_or_default(dir.path()).unwrap();
        assert_eq!(config, AnalysisConfig::default());
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempdir().unwrap();
        let config = AnalysisConfig {
            top_n: 3,
            direction: Direction::LR,
            ..AnalysisConfig::default()
        };

        let path = config.save(dir.path()).unwrap();
        assert!(path.ends_with(".grove/config.json"));
        assert_eq!(AnalysisConfig::load_or_default(dir.path()).unwrap(), config);
    }
}
