//! `save_png`: lossless PNG with a zlib-style compression level.

use serde::{Deserialize, Serialize};

use super::fields::{FieldKind, FieldSpec, InvocationSpec, IMAGE_FIELD};
use super::{ImageField, Invocation, InvocationContext, PathOutput};
use crate::encode::{png, PngOptions};
use crate::error::{FieldError, Result};
use crate::format::ExportFormat;

pub const DEFAULT_COMPRESSION: u8 = 6;
pub const DEFAULT_OPTIMIZE: bool = true;

pub static SAVE_PNG_SPEC: InvocationSpec = InvocationSpec {
    id: "save_png",
    title: "Save Image as PNG",
    tags: &["image", "save", "export", "png"],
    category: "image",
    version: "0.0.2",
    use_cache: false,
    fields: &[
        IMAGE_FIELD,
        FieldSpec {
            name: "compression",
            description: "PNG compression level (0 = none, 9 = smallest)",
            kind: FieldKind::Int {
                min: 0,
                max: 9,
                default: DEFAULT_COMPRESSION as i64,
            },
        },
        FieldSpec {
            name: "optimize",
            description: "Spend extra effort to reduce file size",
            kind: FieldKind::Bool {
                default: DEFAULT_OPTIMIZE,
            },
        },
    ],
};

/// Save an image as PNG.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavePngInvocation {
    pub image: ImageField,
    #[serde(default = "default_compression")]
    pub compression: u8,
    #[serde(default = "default_optimize")]
    pub optimize: bool,
}

fn default_compression() -> u8 {
    DEFAULT_COMPRESSION
}

fn default_optimize() -> bool {
    DEFAULT_OPTIMIZE
}

impl SavePngInvocation {
    /// Node with default parameters for `image_name`.
    pub fn new(image_name: impl Into<String>) -> Self {
        Self {
            image: ImageField::new(image_name),
            compression: DEFAULT_COMPRESSION,
            optimize: DEFAULT_OPTIMIZE,
        }
    }
}

impl Invocation for SavePngInvocation {
    fn spec(&self) -> &'static InvocationSpec {
        &SAVE_PNG_SPEC
    }

    fn validate(&self) -> std::result::Result<(), FieldError> {
        SAVE_PNG_SPEC.check_int("compression", self.compression.into())
    }

    fn invoke(&self, ctx: &InvocationContext<'_>) -> Result<PathOutput> {
        let image = ctx.images.get(&self.image.image_name)?;
        let options = PngOptions {
            compression: self.compression,
            optimize: self.optimize,
        };
        ctx.save(ExportFormat::Png, |writer| {
            png::encode(&image, &options, writer)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{ExportError, StoreError};
    use crate::format::{sniff, Signature};
    use crate::test_support::{matches_output_pattern, TestHost};
    use std::path::Path;

    #[test]
    fn test_defaults_from_minimal_record() {
        let node: SavePngInvocation =
            serde_json::from_str(r#"{"image": {"image_name": "rgb"}}"#).unwrap();
        assert_eq!(node, SavePngInvocation::new("rgb"));
    }

    #[test]
    fn test_writes_png_into_export_dir() {
        let host = TestHost::new();
        let output = SavePngInvocation::new("rgba").execute(&host.ctx()).unwrap();

        let path = Path::new(&output.path);
        assert!(path.is_absolute());
        assert_eq!(path.parent().unwrap(), host.config.export_dir().as_path());
        let name = path.file_name().unwrap().to_str().unwrap();
        assert!(matches_output_pattern(name, "png"), "{name}");

        let bytes = std::fs::read(path).unwrap();
        assert_eq!(sniff(&bytes), Some(Signature::Png));
        let decoded = image::load_from_memory(&bytes).unwrap();
        assert_eq!(decoded.color(), image::ColorType::Rgba8);
    }

    #[test]
    fn test_compression_extremes_accepted() {
        let host = TestHost::new();
        for compression in [0, 9] {
            let mut node = SavePngInvocation::new("gray");
            node.compression = compression;
            node.optimize = false;
            node.execute(&host.ctx()).unwrap();
        }
        assert_eq!(host.exported_files(), 2);
    }

    #[test]
    fn test_compression_out_of_range_writes_nothing() {
        let host = TestHost::new();
        let mut node = SavePngInvocation::new("rgb");
        node.compression = 10;
        let err = node.execute(&host.ctx()).unwrap_err();
        assert!(matches!(
            err,
            ExportError::Field(FieldError::OutOfRange {
                field: "compression",
                value: 10,
                ..
            })
        ));
        assert_eq!(host.exported_files(), 0);
    }

    #[test]
    fn test_missing_image_writes_nothing() {
        let host = TestHost::new();
        let err = SavePngInvocation::new("ghost")
            .execute(&host.ctx())
            .unwrap_err();
        assert!(matches!(err, ExportError::Store(StoreError::NotFound(_))));
        assert_eq!(host.exported_files(), 0);
    }
}
