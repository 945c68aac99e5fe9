//! `save_jpeg`: baseline or progressive JPEG with selectable chroma subsampling.

use serde::{Deserialize, Serialize};

use super::fields::{FieldKind, FieldSpec, InvocationSpec, IMAGE_FIELD};
use super::{ImageField, Invocation, InvocationContext, PathOutput};
use crate::encode::{jpeg, JpegOptions, JpegSubsampling};
use crate::error::{FieldError, Result};
use crate::format::ExportFormat;

pub const DEFAULT_QUALITY: u8 = 95;
pub const DEFAULT_PROGRESSIVE: bool = false;
pub const DEFAULT_OPTIMIZE: bool = true;

pub static SAVE_JPEG_SPEC: InvocationSpec = InvocationSpec {
    id: "save_jpeg",
    title: "Save Image as JPEG",
    tags: &["image", "save", "export", "jpeg", "jpg"],
    category: "image",
    version: "0.0.2",
    use_cache: false,
    fields: &[
        IMAGE_FIELD,
        FieldSpec {
            name: "quality",
            description: "JPEG quality (1 = worst, 100 = best)",
            kind: FieldKind::Int {
                min: 1,
                max: 100,
                default: DEFAULT_QUALITY as i64,
            },
        },
        FieldSpec {
            name: "progressive",
            description: "Write a progressive JPEG",
            kind: FieldKind::Bool {
                default: DEFAULT_PROGRESSIVE,
            },
        },
        FieldSpec {
            name: "optimize",
            description: "Optimize Huffman tables for a smaller file",
            kind: FieldKind::Bool {
                default: DEFAULT_OPTIMIZE,
            },
        },
        FieldSpec {
            name: "subsampling",
            description: "Chroma subsampling",
            kind: FieldKind::Choice {
                options: &["4:4:4", "4:2:2", "4:2:0"],
                default: "4:2:0",
            },
        },
    ],
};

/// Save an image as JPEG. Alpha is dropped before encoding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaveJpegInvocation {
    pub image: ImageField,
    #[serde(default = "default_quality")]
    pub quality: u8,
    #[serde(default)]
    pub progressive: bool,
    #[serde(default = "default_optimize")]
    pub optimize: bool,
    #[serde(default)]
    pub subsampling: JpegSubsampling,
}

fn default_quality() -> u8 {
    DEFAULT_QUALITY
}

fn default_optimize() -> bool {
    DEFAULT_OPTIMIZE
}

impl SaveJpegInvocation {
    /// Node with default parameters for `image_name`.
    pub fn new(image_name: impl Into<String>) -> Self {
        Self {
            image: ImageField::new(image_name),
            quality: DEFAULT_QUALITY,
            progressive: DEFAULT_PROGRESSIVE,
            optimize: DEFAULT_OPTIMIZE,
            subsampling: JpegSubsampling::default(),
        }
    }
}

impl Invocation for SaveJpegInvocation {
    fn spec(&self) -> &'static InvocationSpec {
        &SAVE_JPEG_SPEC
    }

    fn validate(&self) -> std::result::Result<(), FieldError> {
        SAVE_JPEG_SPEC.check_int("quality", self.quality.into())
    }

    fn invoke(&self, ctx: &InvocationContext<'_>) -> Result<PathOutput> {
        let image = ctx.images.get(&self.image.image_name)?;
        let image = jpeg::flatten_alpha(&image);
        let options = JpegOptions {
            quality: self.quality,
            progressive: self.progressive,
            optimize: self.optimize,
            subsampling: self.subsampling,
        };
        ctx.save(ExportFormat::Jpeg, |writer| {
            jpeg::encode(&image, &options, writer)
        })
    }
}
