//! Configuration management for imgexport.
//!
//! Configuration is loaded from the platform config directory with sensible
//! defaults. All config structs implement `Default`.

mod types;
mod validate;

pub use types::*;

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Root configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Output location settings
    pub general: GeneralConfig,

    /// Directory-backed image store settings
    pub store: StoreConfig,

    /// TIFF encoder settings not exposed as node fields
    pub tiff: TiffConfig,

    /// Result record output settings
    pub output: OutputConfig,

    /// Logging settings
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from the default location.
    ///
    /// Returns default configuration if the file doesn't exist.
    pub fn load() -> Result<Self, ConfigError> {
        let path = Self::default_path();
        if path.exists() {
            Self::load_from(&path)
        } else {
            Ok(Self::default())
        }
    }

    /// Load configuration from a specific file path.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Parse and validate configuration from a TOML string.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Config = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Get the default config file path.
    ///
    /// Uses platform-appropriate directories:
    /// - macOS: ~/Library/Application Support/com.imgexport.imgexport/config.toml
    /// - Linux: ~/.config/imgexport/config.toml
    /// - Windows: C:\Users\<User>\AppData\Roaming\imgexport\config\config.toml
    ///
    /// Falls back to ~/.imgexport/config.toml if directory detection fails.
    pub fn default_path() -> PathBuf {
        directories::ProjectDirs::from("com", "imgexport", "imgexport")
            .map(|dirs| dirs.config_dir().to_path_buf().join("config.toml"))
            .unwrap_or_else(|| {
                let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
                PathBuf::from(home).join(".imgexport").join("config.toml")
            })
    }

    /// Get the resolved outputs root (with ~ expansion).
    pub fn outputs_dir(&self) -> PathBuf {
        expand(&self.general.outputs_dir)
    }

    /// Directory every node writes into: `{outputs_dir}/{export_subdir}`.
    pub fn export_dir(&self) -> PathBuf {
        self.outputs_dir().join(&self.general.export_subdir)
    }

    /// Get the resolved image store directory (with ~ expansion).
    pub fn images_dir(&self) -> PathBuf {
        expand(&self.store.images_dir)
    }

    /// Serialize the config to a pretty TOML string.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::ValidationError(e.to_string()))
    }
}

fn expand(path: &Path) -> PathBuf {
    let path_str = path.to_string_lossy();
    let expanded = shellexpand::tilde(&path_str);
    PathBuf::from(expanded.into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.general.export_subdir, "invoke_image_export");
        assert_eq!(config.store.max_file_size_mb, 100);
        assert_eq!(config.tiff.jpeg_quality, 75);
    }

    #[test]
    fn test_config_to_toml() {
        let config = Config::default();
        let toml = config.to_toml().unwrap();
        assert!(toml.contains("[general]"));
        assert!(toml.contains("[store]"));
        assert!(toml.contains("[tiff]"));
    }

    #[test]
    fn test_export_dir_joins_subdir() {
        let mut config = Config::default();
        config.general.outputs_dir = PathBuf::from("/srv/outputs");
        assert_eq!(
            config.export_dir(),
            PathBuf::from("/srv/outputs/invoke_image_export")
        );
    }

    #[test]
    fn test_tilde_is_expanded() {
        let config = Config::default();
        assert!(!config.outputs_dir().to_string_lossy().starts_with('~'));
        assert!(!config.images_dir().to_string_lossy().starts_with('~'));
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = Config::from_toml("[general]\noutputs_dir = \"/data/out\"\n").unwrap();
        assert_eq!(config.general.outputs_dir, PathBuf::from("/data/out"));
        assert_eq!(config.general.export_subdir, "invoke_image_export");
        assert_eq!(config.output.format, "json");
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[tiff]\njpeg_quality = 90\n").unwrap();
        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.tiff.jpeg_quality, 90);
    }

    #[test]
    fn test_load_from_rejects_invalid_values() {
        let err = Config::from_toml("[tiff]\njpeg_quality = 0\n").unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError(_)));
    }
}
