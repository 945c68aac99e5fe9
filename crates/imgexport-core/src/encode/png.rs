//! PNG encoding through the `image` crate's PNG encoder.

use image::codecs::png::{CompressionType, FilterType, PngEncoder};
use image::DynamicImage;
use std::borrow::Cow;
use std::io::Write;

use crate::error::CodecError;

/// PNG encoder parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PngOptions {
    /// zlib-style compression level, 0-9
    pub compression: u8,
    /// Spend extra effort choosing per-row filters
    pub optimize: bool,
}

/// Deflate level for a 0-9 compression setting; 0 stores the data uncompressed.
pub fn compression_type(level: u8) -> CompressionType {
    CompressionType::Level(level)
}

/// Adaptive filtering tries every filter per row; `Sub` is the cheap fixed choice.
pub fn filter_type(optimize: bool) -> FilterType {
    if optimize {
        FilterType::Adaptive
    } else {
        FilterType::Sub
    }
}

/// Encode `image` as PNG into `writer`.
///
/// 8- and 16-bit grey/RGB images (with or without alpha) are written as-is;
/// floating point images are stored as 16-bit.
pub fn encode<W: Write>(
    image: &DynamicImage,
    options: &PngOptions,
    writer: W,
) -> Result<(), CodecError> {
    let encoder = PngEncoder::new_with_quality(
        writer,
        compression_type(options.compression),
        filter_type(options.optimize),
    );
    normalize(image).write_with_encoder(encoder)?;
    Ok(())
}

fn normalize(image: &DynamicImage) -> Cow<'_, DynamicImage> {
    match image {
        DynamicImage::ImageRgb32F(_) => Cow::Owned(DynamicImage::ImageRgb16(image.to_rgb16())),
        DynamicImage::ImageRgba32F(_) => {
            Cow::Owned(DynamicImage::ImageRgba16(image.to_rgba16()))
        }
        _ => Cow::Borrowed(image),
    }
}
