//! Configuration validation with range checks.

use crate::error::ConfigError;
use crate::output::OutputFormat;

use super::Config;

impl Config {
    /// Validate configuration values are within acceptable ranges.
    pub(crate) fn validate(&self) -> Result<(), ConfigError> {
        let subdir = &self.general.export_subdir;
        if subdir.is_empty() {
            return Err(ConfigError::ValidationError(
                "general.export_subdir must not be empty".into(),
            ));
        }
        if subdir.contains(['/', '\\']) || subdir == ".." || subdir == "." {
            return Err(ConfigError::ValidationError(
                "general.export_subdir must be a single directory name".into(),
            ));
        }
        if self.store.max_file_size_mb == 0 {
            return Err(ConfigError::ValidationError(
                "store.max_file_size_mb must be > 0".into(),
            ));
        }
        if self.store.max_image_dimension == 0 {
            return Err(ConfigError::ValidationError(
                "store.max_image_dimension must be > 0".into(),
            ));
        }
        if !(1..=100).contains(&self.tiff.jpeg_quality) {
            return Err(ConfigError::ValidationError(
                "tiff.jpeg_quality must be between 1 and 100".into(),
            ));
        }
        if OutputFormat::parse(&self.output.format).is_none() {
            return Err(ConfigError::ValidationError(format!(
                "output.format must be \"json\" or \"jsonl\", got {:?}",
                self.output.format
            )));
        }
        Ok(())
    }
}
