//! Codec adapters, one module per output format.
//!
//! Each adapter maps a small option struct onto a third-party encoder and
//! writes the encoded file to any `Write` (TIFF additionally needs `Seek`).
//! Colour-mode normalisation happens here, so callers can pass any decoded
//! image.

pub mod avif;
pub mod jpeg;
pub mod png;
pub mod tiff;
pub mod webp;

pub use avif::AvifOptions;
pub use jpeg::{JpegOptions, JpegSubsampling};
pub use png::PngOptions;
pub use self::tiff::{TiffCompression, TiffOptions};
pub use self::webp::WebpOptions;

use image::DynamicImage;
use std::borrow::Cow;

/// Reduce an image to 8-bit RGB or RGBA, keeping alpha only when present.
pub(crate) fn to_rgb8_or_rgba8(image: &DynamicImage) -> Cow<'_, DynamicImage> {
    match image {
        DynamicImage::ImageRgb8(_) | DynamicImage::ImageRgba8(_) => Cow::Borrowed(image),
        other if other.color().has_alpha() => {
            Cow::Owned(DynamicImage::ImageRgba8(other.to_rgba8()))
        }
        other => Cow::Owned(DynamicImage::ImageRgb8(other.to_rgb8())),
    }
}
