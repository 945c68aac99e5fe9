//! AVIF encoding through the `image` crate's rav1e-backed encoder.

use image::codecs::avif::AvifEncoder;
use image::DynamicImage;
use std::io::Write;

use super::to_rgb8_or_rgba8;
use crate::error::CodecError;

/// AVIF encoder parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AvifOptions {
    /// Quality, 1-100
    pub quality: u8,
    /// Encoder speed, 0 (slowest, best) to 10 (fastest).
    /// The encoder's own floor is 1, so 0 and 1 behave the same.
    pub speed: u8,
}

/// Encode `image` as AVIF into `writer`.
pub fn encode<W: Write>(
    image: &DynamicImage,
    options: &AvifOptions,
    writer: W,
) -> Result<(), CodecError> {
    let encoder = AvifEncoder::new_with_speed_quality(writer, options.speed, options.quality);
    to_rgb8_or_rgba8(image).write_with_encoder(encoder)?;
    Ok(())
}
