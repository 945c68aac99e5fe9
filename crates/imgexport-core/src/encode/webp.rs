//! WebP encoding through libwebp (`webp` crate).

use image::{DynamicImage, GenericImageView};
use std::io::Write;

use super::to_rgb8_or_rgba8;
use crate::error::CodecError;

/// WebP encoder parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WebpOptions {
    /// Quality, 1-100 (compression effort when lossless)
    pub quality: u8,
    /// Use lossless compression
    pub lossless: bool,
    /// Speed/size trade-off, 0 (fast) to 6 (slowest, smallest)
    pub method: u8,
}

/// Build the libwebp configuration for `options`.
fn config(options: &WebpOptions) -> Result<webp::WebPConfig, CodecError> {
    let mut config = webp::WebPConfig::new()
        .map_err(|_| CodecError::WebP("failed to initialise encoder config".into()))?;
    config.quality = f32::from(options.quality);
    config.lossless = i32::from(options.lossless);
    config.method = i32::from(options.method);
    Ok(config)
}

/// Encode `image` as WebP into `writer`.
pub fn encode<W: Write>(
    image: &DynamicImage,
    options: &WebpOptions,
    mut writer: W,
) -> Result<(), CodecError> {
    let config = config(options)?;
    let pixels = to_rgb8_or_rgba8(image);
    let (width, height) = pixels.dimensions();

    let encoded = match pixels.as_ref() {
        DynamicImage::ImageRgba8(rgba) => {
            webp::Encoder::from_rgba(rgba.as_raw(), width, height).encode_advanced(&config)
        }
        other => {
            let rgb = other.to_rgb8();
            webp::Encoder::from_rgb(rgb.as_raw(), width, height).encode_advanced(&config)
        }
    }
    .map_err(|e| CodecError::WebP(format!("{e:?}")))?;

    writer.write_all(&encoded)?;
    Ok(())
}
