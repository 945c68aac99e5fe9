//! The save nodes and the contract they share with the host.
//!
//! A node is a serde-deserializable record of typed inputs plus a static
//! [`InvocationSpec`]. Execution always runs [`Invocation::validate`] first,
//! so range violations surface before any image is fetched or file created.

pub mod avif;
pub mod fields;
pub mod jpeg;
pub mod png;
pub mod tiff;
pub mod webp;

pub use avif::SaveAvifInvocation;
pub use fields::{FieldKind, FieldSpec, InvocationSpec};
pub use jpeg::SaveJpegInvocation;
pub use png::SavePngInvocation;
pub use self::tiff::SaveTiffInvocation;
pub use self::webp::SaveWebpInvocation;

use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::PathBuf;

use crate::config::Config;
use crate::error::{CodecError, EncodeError, FieldError, Result};
use crate::format::ExportFormat;
use crate::output_path::{create_output_file, OutputFile};
use crate::store::ImageStore;

/// A node the host can execute.
pub trait Invocation {
    /// Static declaration of this node type.
    fn spec(&self) -> &'static InvocationSpec;

    /// Check every bounded field against its declaration.
    fn validate(&self) -> std::result::Result<(), FieldError>;

    /// Run the node. Assumes [`validate`](Self::validate) passed.
    fn invoke(&self, ctx: &InvocationContext<'_>) -> Result<PathOutput>;

    /// Validate, then invoke.
    fn execute(&self, ctx: &InvocationContext<'_>) -> Result<PathOutput> {
        self.validate()?;
        self.invoke(ctx)
    }
}

/// What the host provides to a running node.
#[derive(Clone, Copy)]
pub struct InvocationContext<'a> {
    pub images: &'a dyn ImageStore,
    pub config: &'a Config,
}

impl<'a> InvocationContext<'a> {
    pub fn new(images: &'a dyn ImageStore, config: &'a Config) -> Self {
        Self { images, config }
    }

    /// Create a fresh output file for `format` and let `encode` fill it.
    ///
    /// A failed encode leaves the partial file in place.
    pub(crate) fn save<F>(&self, format: ExportFormat, encode: F) -> Result<PathOutput>
    where
        F: FnOnce(&mut BufWriter<File>) -> std::result::Result<(), CodecError>,
    {
        let OutputFile { path, file } =
            create_output_file(&self.config.export_dir(), format.extension())?;
        let mut writer = BufWriter::new(file);

        encode(&mut writer)
            .and_then(|()| writer.flush().map_err(CodecError::from))
            .map_err(|e| EncodeError::new(format, &path, e))?;

        tracing::debug!("Wrote {} file {:?}", format, path);
        Ok(PathOutput::from(path))
    }
}

/// Reference to an image in the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageField {
    pub image_name: String,
}

impl ImageField {
    pub fn new(image_name: impl Into<String>) -> Self {
        Self {
            image_name: image_name.into(),
        }
    }
}

/// The single output of every save node: where the file was written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename = "path_output")]
pub struct PathOutput {
    pub path: String,
}

impl From<PathBuf> for PathOutput {
    fn from(path: PathBuf) -> Self {
        Self {
            path: path.to_string_lossy().into_owned(),
        }
    }
}

/// Any save node, tagged by node id (`{"type": "save_png", ...}`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum AnyInvocation {
    #[serde(rename = "save_png")]
    Png(SavePngInvocation),
    #[serde(rename = "save_jpeg")]
    Jpeg(SaveJpegInvocation),
    #[serde(rename = "save_webp")]
    Webp(SaveWebpInvocation),
    #[serde(rename = "save_avif")]
    Avif(SaveAvifInvocation),
    #[serde(rename = "save_tiff")]
    Tiff(SaveTiffInvocation),
}

impl AnyInvocation {
    pub fn as_invocation(&self) -> &dyn Invocation {
        match self {
            Self::Png(node) => node,
            Self::Jpeg(node) => node,
            Self::Webp(node) => node,
            Self::Avif(node) => node,
            Self::Tiff(node) => node,
        }
    }

    pub fn spec(&self) -> &'static InvocationSpec {
        self.as_invocation().spec()
    }

    /// Name of the image this record exports.
    pub fn image_name(&self) -> &str {
        match self {
            Self::Png(node) => &node.image.image_name,
            Self::Jpeg(node) => &node.image.image_name,
            Self::Webp(node) => &node.image.image_name,
            Self::Avif(node) => &node.image.image_name,
            Self::Tiff(node) => &node.image.image_name,
        }
    }

    pub fn execute(&self, ctx: &InvocationContext<'_>) -> Result<PathOutput> {
        self.as_invocation().execute(ctx)
    }
}

/// Declarations of every node this crate provides.
pub fn registry() -> [&'static InvocationSpec; 5] {
    [
        &png::SAVE_PNG_SPEC,
        &jpeg::SAVE_JPEG_SPEC,
        &webp::SAVE_WEBP_SPEC,
        &avif::SAVE_AVIF_SPEC,
        &tiff::SAVE_TIFF_SPEC,
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ExportError;
    use crate::test_support::TestHost;

    #[test]
    fn test_registry_ids_and_metadata() {
        let ids: Vec<_> = registry().iter().map(|spec| spec.id).collect();
        assert_eq!(
            ids,
            ["save_png", "save_jpeg", "save_webp", "save_avif", "save_tiff"]
        );
        for spec in registry() {
            assert_eq!(spec.category, "image");
            assert_eq!(spec.version, "0.0.2");
            assert!(!spec.use_cache);
            assert_eq!(&spec.tags[..3], &["image", "save", "export"]);
            assert_eq!(spec.fields[0].name, "image");
        }
    }

    #[test]
    fn test_record_type_matches_spec_id() {
        let json = r#"{"type": "save_webp", "image": {"image_name": "cat.png"}, "lossless": true}"#;
        let record: AnyInvocation = serde_json::from_str(json).unwrap();
        assert_eq!(record.spec().id, "save_webp");
        assert_eq!(record.image_name(), "cat.png");
        let AnyInvocation::Webp(node) = &record else {
            panic!("expected a webp record, got {record:?}");
        };
        assert!(node.lossless);
        assert_eq!(node.quality, webp::DEFAULT_QUALITY);
    }

    #[test]
    fn test_unknown_node_type_rejected() {
        let json = r#"{"type": "save_gif", "image": {"image_name": "cat.png"}}"#;
        assert!(serde_json::from_str::<AnyInvocation>(json).is_err());
    }

    #[test]
    fn test_path_output_serialization() {
        let output = PathOutput::from(PathBuf::from("/out/a.png"));
        assert_eq!(
            serde_json::to_string(&output).unwrap(),
            r#"{"type":"path_output","path":"/out/a.png"}"#
        );
    }

    #[test]
    fn test_dispatch_writes_file() {
        let host = TestHost::new();
        let record = AnyInvocation::Png(SavePngInvocation::new("rgb"));
        let output = record.execute(&host.ctx()).unwrap();
        assert!(output.path.ends_with(".png"));
        assert_eq!(host.exported_files(), 1);
    }

    #[test]
    fn test_validation_runs_before_lookup() {
        let host = TestHost::new();
        let mut node = SavePngInvocation::new("missing");
        node.compression = 10;
        let err = node.execute(&host.ctx()).unwrap_err();
        assert!(matches!(err, ExportError::Field(_)), "{err}");
    }
}
