//! Sub-configuration structs with their defaults.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Output location settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Root directory for everything the host writes
    pub outputs_dir: PathBuf,

    /// Subdirectory of `outputs_dir` that receives exported images
    pub export_subdir: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            outputs_dir: PathBuf::from("~/.imgexport/outputs"),
            export_subdir: "invoke_image_export".to_string(),
        }
    }
}

/// Directory-backed image store settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Directory holding images addressable by file name
    pub images_dir: PathBuf,

    /// Maximum image file size in megabytes
    pub max_file_size_mb: u64,

    /// Maximum image dimension (width or height)
    pub max_image_dimension: u32,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            images_dir: PathBuf::from("~/.imgexport/images"),
            max_file_size_mb: 100,
            max_image_dimension: 16384,
        }
    }
}

/// TIFF encoder settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TiffConfig {
    /// Quality used for JPEG-compressed TIFF strips (1-100)
    pub jpeg_quality: u8,
}

impl Default for TiffConfig {
    fn default() -> Self {
        Self { jpeg_quality: 75 }
    }
}

/// Result record output settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Default output format ("json" or "jsonl")
    pub format: String,

    /// Pretty-print JSON output
    pub pretty: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: "json".to_string(),
            pretty: false,
        }
    }
}

/// Logging settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level: error, warn, info, debug, trace
    pub level: String,

    /// Log format: "pretty" or "json"
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}
