//! `save_webp`: lossy or lossless WebP.

use serde::{Deserialize, Serialize};

use super::fields::{FieldKind, FieldSpec, InvocationSpec, IMAGE_FIELD};
use super::{ImageField, Invocation, InvocationContext, PathOutput};
use crate::encode::{webp, WebpOptions};
use crate::error::{FieldError, Result};
use crate::format::ExportFormat;

pub const DEFAULT_QUALITY: u8 = 90;
pub const DEFAULT_LOSSLESS: bool = false;
pub const DEFAULT_METHOD: u8 = 4;

pub static SAVE_WEBP_SPEC: InvocationSpec = InvocationSpec {
    id: "save_webp",
    title: "Save Image as WebP",
    tags: &["image", "save", "export", "webp"],
    category: "image",
    version: "0.0.2",
    use_cache: false,
    fields: &[
        IMAGE_FIELD,
        FieldSpec {
            name: "quality",
            description: "WebP quality (1 = worst, 100 = best)",
            kind: FieldKind::Int {
                min: 1,
                max: 100,
                default: DEFAULT_QUALITY as i64,
            },
        },
        FieldSpec {
            name: "lossless",
            description: "Use lossless compression",
            kind: FieldKind::Bool {
                default: DEFAULT_LOSSLESS,
            },
        },
        FieldSpec {
            name: "method",
            description: "Compression method (0 = fast, 6 = slowest and smallest)",
            kind: FieldKind::Int {
                min: 0,
                max: 6,
                default: DEFAULT_METHOD as i64,
            },
        },
    ],
};

/// Save an image as WebP.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaveWebpInvocation {
    pub image: ImageField,
    #[serde(default = "default_quality")]
    pub quality: u8,
    #[serde(default)]
    pub lossless: bool,
    #[serde(default = "default_method")]
    pub method: u8,
}

fn default_quality() -> u8 {
    DEFAULT_QUALITY
}

fn default_method() -> u8 {
    DEFAULT_METHOD
}

impl SaveWebpInvocation {
    /// Node with default parameters for `image_name`.
    pub fn new(image_name: impl Into<String>) -> Self {
        Self {
            image: ImageField::new(image_name),
            quality: DEFAULT_QUALITY,
            lossless: DEFAULT_LOSSLESS,
            method: DEFAULT_METHOD,
        }
    }
}

impl Invocation for SaveWebpInvocation {
    fn spec(&self) -> &'static InvocationSpec {
        &SAVE_WEBP_SPEC
    }

    fn validate(&self) -> std::result::Result<(), FieldError> {
        SAVE_WEBP_SPEC.check_int("quality", self.quality.into())?;
        SAVE_WEBP_SPEC.check_int("method", self.method.into())
    }

    fn invoke(&self, ctx: &InvocationContext<'_>) -> Result<PathOutput> {
        let image = ctx.images.get(&self.image.image_name)?;
        let options = WebpOptions {
            quality: self.quality,
            lossless: self.lossless,
            method: self.method,
        };
        ctx.save(ExportFormat::WebP, |writer| {
            webp::encode(&image, &options, writer)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ExportError;
    use crate::format::{sniff, Signature};
    use crate::store::ImageStore;
    use crate::test_support::{matches_output_pattern, TestHost};
    use std::path::Path;

    #[test]
    fn test_writes_webp() {
        let host = TestHost::new();
        let output = SaveWebpInvocation::new("rgb").execute(&host.ctx()).unwrap();
        let name = Path::new(&output.path).file_name().unwrap().to_str().unwrap();
        assert!(matches_output_pattern(name, "webp"), "{name}");
        let bytes = std::fs::read(&output.path).unwrap();
        assert_eq!(sniff(&bytes), Some(Signature::WebP));
    }

    #[test]
    fn test_lossless_keeps_pixels() {
        let host = TestHost::new();
        let mut node = SaveWebpInvocation::new("rgba");
        node.lossless = true;
        node.method = 0;
        let output = node.execute(&host.ctx()).unwrap();

        let decoded = image::open(&output.path).unwrap();
        let original = host.store.get("rgba").unwrap();
        assert_eq!(decoded.to_rgba8(), original.to_rgba8());
    }

    #[test]
    fn test_method_out_of_range_writes_nothing() {
        let host = TestHost::new();
        let mut node = SaveWebpInvocation::new("rgb");
        node.method = 7;
        let err = node.execute(&host.ctx()).unwrap_err();
        assert!(matches!(
            err,
            ExportError::Field(FieldError::OutOfRange {
                field: "method",
                value: 7,
                min: 0,
                max: 6,
                ..
            })
        ));
        assert_eq!(host.exported_files(), 0);
    }

    #[test]
    fn test_quality_checked_before_method() {
        let mut node = SaveWebpInvocation::new("rgb");
        node.quality = 101;
        node.method = 9;
        assert!(matches!(
            node.validate(),
            Err(FieldError::OutOfRange { field: "quality", .. })
        ));
    }
}
