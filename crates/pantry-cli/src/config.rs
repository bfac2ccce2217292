//! Configuration management for the CLI.

use crate::error::{CliError, Result};
use pantry_extractor::ExtractorConfig;
use pantry_reconciler::ReconcilerConfig;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// CLI configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Global settings
    #[serde(default)]
    pub settings: Settings,

    /// Page extraction settings
    #[serde(default)]
    pub extractor: ExtractorConfig,

    /// Cross-source merge settings
    #[serde(default)]
    pub reconciler: ReconcilerConfig,
}

/// Global CLI settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// SQLite database file; defaults to `~/.pantry/pantry.db`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub database: Option<PathBuf>,

    /// Enable colored output
    #[serde(default = "default_true")]
    pub color: bool,

    /// Default output format
    #[serde(default = "default_format")]
    pub format: OutputFormat,
}

/// Output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Table format
    Table,
    /// JSON format
    Json,
    /// Quiet (minimal) format
    Quiet,
}

impl Config {
    /// Directory holding the default config file and database.
    pub fn home() -> Result<PathBuf> {
        let home = dirs::home_dir().ok_or_else(|| CliError::Config("Could not find home directory".into()))?;
        Ok(home.join(".pantry"))
    }

    /// Get the default configuration file path.
    pub fn path() -> Result<PathBuf> {
        Ok(Self::home()?.join("config.toml"))
    }

    /// Load configuration from the default path, or defaults if absent.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::path()?)
    }

    /// Load configuration from a file, or defaults if it does not exist.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let contents = fs::read_to_string(path)?;
        Self::from_toml(&contents)
    }

    /// Parse and validate configuration text.
    pub fn from_toml(contents: &str) -> Result<Self> {
        let config: Config = toml::from_str(contents)?;
        config.extractor.validate()?;
        config.reconciler.validate()?;
        Ok(config)
    }

    /// Render configuration as TOML.
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self)
            .map_err(|e| CliError::Config(format!("Failed to serialize config: {}", e)))
    }

    /// Save configuration to a file, creating parent directories.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, self.to_toml()?)?;
        Ok(())
    }

    /// Database file to open.
    pub fn database_path(&self) -> Result<PathBuf> {
        match &self.settings.database {
            Some(path) => Ok(path.clone()),
            None => Ok(Self::home()?.join("pantry.db")),
        }
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            database: None,
            color: true,
            format: OutputFormat::Table,
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_format() -> OutputFormat {
    OutputFormat::Table
}

#[cfg(test)]
mod tests {
    use super::*;
    use pantry_reconciler::IdentityStrategy;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert!(config.settings.color);
        assert_eq!(config.settings.format, OutputFormat::Table);
        assert!(config.settings.database.is_none());
        assert!(!config.extractor.parallel);
    }

    #[test]
    fn test_partial_file() {
        let config = Config::from_toml(
            r#"
            [settings]
            format = "json"
            database = "/tmp/pantry.db"

            [reconciler.identity]
            strategy = "normalized"
            "#,
        )
        .unwrap();
        assert_eq!(config.settings.format, OutputFormat::Json);
        assert!(config.settings.color);
        assert_eq!(config.database_path().unwrap(), PathBuf::from("/tmp/pantry.db"));
        assert_eq!(config.reconciler.identity, IdentityStrategy::Normalized);
    }

    #[test]
    fn test_invalid_threshold_rejected() {
        let result = Config::from_toml(
            r#"
            [extractor.labels]
            fuzzy_threshold = 1.5
            "#,
        );
        assert!(matches!(result, Err(CliError::Extractor(_))));
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut config = Config::default();
        config.settings.color = false;
        config.extractor.parallel = true;
        config.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert!(!loaded.settings.color);
        assert!(loaded.extractor.parallel);
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_from(&dir.path().join("absent.toml")).unwrap();
        assert!(config.settings.color);
    }
}
