//! Error types for the image export nodes.
//!
//! Errors are split by where they arise (field validation, image lookup,
//! encoding) so the host can tell a bad request from a failed write.

use std::path::PathBuf;
use thiserror::Error;

use crate::format::ExportFormat;

/// Top-level error type for export operations.
#[derive(Error, Debug)]
pub enum ExportError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// An input field is outside its declared bounds
    #[error("Invalid input: {0}")]
    Field(#[from] FieldError),

    /// Image lookup failed
    #[error("Image store error: {0}")]
    Store(#[from] StoreError),

    /// The codec failed to write the output file
    #[error("Encode error: {0}")]
    Encode(#[from] EncodeError),

    /// General I/O errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to read the config file from disk
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    /// Failed to parse TOML configuration
    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),

    /// Configuration values are invalid
    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

/// Input field validation errors, raised before any image is fetched.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum FieldError {
    /// Numeric field outside its declared `[min, max]` range
    #[error("{node}.{field} = {value} is out of range ({min}..={max})")]
    OutOfRange {
        node: &'static str,
        field: &'static str,
        value: i64,
        min: i64,
        max: i64,
    },

    /// Field is not declared as a bounded integer on this node
    #[error("{node} declares no integer field named {field}")]
    UnknownField {
        node: &'static str,
        field: &'static str,
    },
}

/// Image store lookup errors.
#[derive(Error, Debug)]
pub enum StoreError {
    /// No image is registered under this name
    #[error("Image not found: {0}")]
    NotFound(String),

    /// Name would resolve outside the store
    #[error("Invalid image name: {0:?}")]
    InvalidName(String),

    /// Backing file exceeds size limit
    #[error("Image file too large: {name} ({size_mb}MB > {max_mb}MB)")]
    FileTooLarge {
        name: String,
        size_mb: u64,
        max_mb: u64,
    },

    /// Image dimensions exceed limit
    #[error("Image too large: {name} ({width}x{height} > {max_dim})")]
    ImageTooLarge {
        name: String,
        width: u32,
        height: u32,
        max_dim: u32,
    },

    /// Backing file does not look like an image
    #[error("Unsupported format for {name}: {reason}")]
    UnsupportedFormat { name: String, reason: String },

    /// Image decoding failed
    #[error("Decode error for {name}: {message}")]
    Decode { name: String, message: String },
}

/// A codec failed while writing an output file.
#[derive(Error, Debug)]
#[error("{format} encoding failed for {path}: {source}")]
pub struct EncodeError {
    /// Output format
    pub format: ExportFormat,
    /// File being written
    pub path: PathBuf,
    /// Underlying codec failure
    #[source]
    pub source: CodecError,
}

impl EncodeError {
    pub(crate) fn new(format: ExportFormat, path: impl Into<PathBuf>, source: CodecError) -> Self {
        Self {
            format,
            path: path.into(),
            source,
        }
    }
}

/// Failures reported by the codec crates.
#[derive(Error, Debug)]
pub enum CodecError {
    /// PNG and AVIF encoders from the `image` crate
    #[error(transparent)]
    Image(#[from] image::ImageError),

    /// JPEG encoder
    #[error(transparent)]
    Jpeg(#[from] jpeg_encoder::EncodingError),

    /// TIFF encoder
    #[error(transparent)]
    Tiff(#[from] tiff::TiffError),

    /// Writing encoded bytes failed
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Image cannot be represented by the target format
    #[error("{0}")]
    Unsupported(String),

    /// libwebp rejected the configuration or failed to encode
    #[error("libwebp: {0}")]
    WebP(String),
}

/// Convenience type alias for export results.
pub type Result<T> = std::result::Result<T, ExportError>;

/// Convenience type alias for image store results.
pub type StoreResult<T> = std::result::Result<T, StoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_out_of_range_message() {
        let err = FieldError::OutOfRange {
            node: "save_png",
            field: "compression",
            value: 10,
            min: 0,
            max: 9,
        };
        assert_eq!(
            err.to_string(),
            "save_png.compression = 10 is out of range (0..=9)"
        );
    }

    #[test]
    fn test_not_found_wraps_into_export_error() {
        let err: ExportError = StoreError::NotFound("cat.png".into()).into();
        assert!(matches!(err, ExportError::Store(StoreError::NotFound(_))));
        assert!(err.to_string().contains("Image not found: cat.png"));
    }

    #[test]
    fn test_encode_error_display() {
        let err = EncodeError::new(
            ExportFormat::WebP,
            "/tmp/out.webp",
            CodecError::WebP("VP8_ENC_ERROR_BAD_DIMENSION".into()),
        );
        assert_eq!(
            err.to_string(),
            "webp encoding failed for /tmp/out.webp: libwebp: VP8_ENC_ERROR_BAD_DIMENSION"
        );
    }
}
