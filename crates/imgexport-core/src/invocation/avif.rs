//! `save_avif`: AVIF through the rav1e encoder.

use serde::{Deserialize, Serialize};

use super::fields::{FieldKind, FieldSpec, InvocationSpec, IMAGE_FIELD};
use super::{ImageField, Invocation, InvocationContext, PathOutput};
use crate::encode::{avif, AvifOptions};
use crate::error::{FieldError, Result};
use crate::format::ExportFormat;

pub const DEFAULT_QUALITY: u8 = 85;
pub const DEFAULT_SPEED: u8 = 6;

pub static SAVE_AVIF_SPEC: InvocationSpec = InvocationSpec {
    id: "save_avif",
    title: "Save Image as AVIF",
    tags: &["image", "save", "export", "avif"],
    category: "image",
    version: "0.0.2",
    use_cache: false,
    fields: &[
        IMAGE_FIELD,
        FieldSpec {
            name: "quality",
            description: "AVIF quality (1 = worst, 100 = best)",
            kind: FieldKind::Int {
                min: 1,
                max: 100,
                default: DEFAULT_QUALITY as i64,
            },
        },
        FieldSpec {
            name: "speed",
            description: "Encoding speed (0 = slowest and best, 10 = fastest)",
            kind: FieldKind::Int {
                min: 0,
                max: 10,
                default: DEFAULT_SPEED as i64,
            },
        },
    ],
};

/// Save an image as AVIF.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaveAvifInvocation {
    pub image: ImageField,
    #[serde(default = "default_quality")]
    pub quality: u8,
    #[serde(default = "default_speed")]
    pub speed: u8,
}

fn default_quality() -> u8 {
    DEFAULT_QUALITY
}

fn default_speed() -> u8 {
    DEFAULT_SPEED
}

impl SaveAvifInvocation {
    /// Node with default parameters for `image_name`.
    pub fn new(image_name: impl Into<String>) -> Self {
        Self {
            image: ImageField::new(image_name),
            quality: DEFAULT_QUALITY,
            speed: DEFAULT_SPEED,
        }
    }
}

impl Invocation for SaveAvifInvocation {
    fn spec(&self) -> &'static InvocationSpec {
        &SAVE_AVIF_SPEC
    }

    fn validate(&self) -> std::result::Result<(), FieldError> {
        SAVE_AVIF_SPEC.check_int("quality", self.quality.into())?;
        SAVE_AVIF_SPEC.check_int("speed", self.speed.into())
    }

    fn invoke(&self, ctx: &InvocationContext<'_>) -> Result<PathOutput> {
        let image = ctx.images.get(&self.image.image_name)?;
        let options = AvifOptions {
            quality: self.quality,
            speed: self.speed,
        };
        ctx.save(ExportFormat::Avif, |writer| {
            avif::encode(&image, &options, writer)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ExportError;
    use crate::format::{sniff, Signature};
    use crate::test_support::{matches_output_pattern, TestHost};
    use std::path::Path;

    #[test]
    fn test_writes_avif() {
        let host = TestHost::new();
        let mut node = SaveAvifInvocation::new("rgba");
        node.speed = 10;
        let output = node.execute(&host.ctx()).unwrap();
        let name = Path::new(&output.path).file_name().unwrap().to_str().unwrap();
        assert!(matches_output_pattern(name, "avif"), "{name}");
        let bytes = std::fs::read(&output.path).unwrap();
        assert_eq!(sniff(&bytes), Some(Signature::Avif));
    }

    #[test]
    fn test_speed_bounds() {
        let mut node = SaveAvifInvocation::new("rgb");
        node.speed = 0;
        assert!(node.validate().is_ok());
        node.speed = 11;
        assert!(node.validate().is_err());
    }

    #[test]
    fn test_quality_out_of_range_writes_nothing() {
        let host = TestHost::new();
        let mut node = SaveAvifInvocation::new("rgb");
        node.quality = 0;
        let err = node.execute(&host.ctx()).unwrap_err();
        assert!(matches!(err, ExportError::Field(_)));
        assert_eq!(host.exported_files(), 0);
    }
}
