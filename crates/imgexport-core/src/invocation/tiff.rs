//! `save_tiff`: single-page TIFF with a choice of strip compression.

use serde::{Deserialize, Serialize};

use super::fields::{FieldKind, FieldSpec, InvocationSpec, IMAGE_FIELD};
use super::{ImageField, Invocation, InvocationContext, PathOutput};
use crate::encode::{tiff, TiffCompression, TiffOptions};
use crate::error::{FieldError, Result};
use crate::format::ExportFormat;

pub static SAVE_TIFF_SPEC: InvocationSpec = InvocationSpec {
    id: "save_tiff",
    title: "Save Image as TIFF",
    tags: &["image", "save", "export", "tiff"],
    category: "image",
    version: "0.0.2",
    use_cache: false,
    fields: &[
        IMAGE_FIELD,
        FieldSpec {
            name: "compression",
            description: "TIFF compression",
            kind: FieldKind::Choice {
                options: &["none", "lzw", "jpeg", "zip"],
                default: "lzw",
            },
        },
    ],
};

/// Save an image as TIFF.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaveTiffInvocation {
    pub image: ImageField,
    #[serde(default)]
    pub compression: TiffCompression,
}

impl SaveTiffInvocation {
    /// Node with default parameters for `image_name`.
    pub fn new(image_name: impl Into<String>) -> Self {
        Self {
            image: ImageField::new(image_name),
            compression: TiffCompression::default(),
        }
    }
}

impl Invocation for SaveTiffInvocation {
    fn spec(&self) -> &'static InvocationSpec {
        &SAVE_TIFF_SPEC
    }

    /// The only parameter is an enum, so serde has already checked it.
    fn validate(&self) -> std::result::Result<(), FieldError> {
        Ok(())
    }

    fn invoke(&self, ctx: &InvocationContext<'_>) -> Result<PathOutput> {
        let image = ctx.images.get(&self.image.image_name)?;
        let options = TiffOptions {
            compression: self.compression,
            jpeg_quality: ctx.config.tiff.jpeg_quality,
        };
        ctx.save(ExportFormat::Tiff, |writer| {
            tiff::encode(&image, &options, writer)
        })
    }
}
