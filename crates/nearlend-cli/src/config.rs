//! CLI configuration management

use std::path::PathBuf;

use nearlend_sdk::HarnessConfig;

use crate::CliError;

/// Environment variable pointing at an alternative config file
pub const ENV_CONFIG: &str = "NEARLEND_CONFIG";

/// CLI configuration
///
/// Keeps the file contents apart from the effective settings so that saving
/// never persists environment or command-line overrides.
#[derive(Debug, Clone)]
pub struct Config {
    /// Effective settings: file, then `NEARLEND_*` environment overrides
    pub harness: HarnessConfig,
    file: HarnessConfig,
    path: Option<PathBuf>,
}

impl Config {
    /// Get the config directory path
    pub fn config_dir() -> Option<PathBuf> {
        dirs::home_dir().map(|h| h.join(".nearlend"))
    }

    /// Get the config file path
    pub fn config_path() -> Option<PathBuf> {
        match std::env::var(ENV_CONFIG) {
            Ok(path) if !path.is_empty() => Some(PathBuf::from(path)),
            _ => Self::config_dir().map(|d| d.join("config.toml")),
        }
    }

    /// Load config from file or defaults
    pub fn load() -> Result<Self, CliError> {
        let path = Self::config_path();
        let file = match &path {
            Some(path) if path.exists() => HarnessConfig::from_file(path)?,
            _ => HarnessConfig::default(),
        };
        Ok(Self {
            harness: file.clone().with_env(),
            file,
            path,
        })
    }

    /// Settings as stored in the file
    pub fn file(&self) -> &HarnessConfig {
        &self.file
    }

    /// Change the stored settings; the effective settings follow
    pub fn update(&mut self, edit: impl FnOnce(&mut HarnessConfig)) -> Result<(), CliError> {
        let mut file = self.file.clone();
        edit(&mut file);
        file.validate()?;
        self.harness = file.clone().with_env();
        self.file = file;
        Ok(())
    }

    /// Save the stored settings
    pub fn save(&self) -> Result<PathBuf, CliError> {
        let path = self
            .path
            .clone()
            .ok_or_else(|| CliError::Config("Cannot determine config path".to_string()))?;

        // Create parent directory if needed
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        std::fs::write(&path, self.file.to_toml_string()?)?;
        Ok(path)
    }
}
