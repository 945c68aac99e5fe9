//! JPEG encoding through `jpeg-encoder`.
//!
//! The encoder takes 8-bit greyscale or RGB input; anything carrying alpha
//! must be flattened first (see [`flatten_alpha`]).

use image::{DynamicImage, GenericImageView};
use jpeg_encoder::{ColorType, Encoder, SamplingFactor};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::io::Write;
use std::str::FromStr;

use crate::error::CodecError;

/// Chroma subsampling choices exposed to users.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum JpegSubsampling {
    /// Full chroma resolution
    #[serde(rename = "4:4:4")]
    Full,
    /// Half horizontal chroma resolution
    #[serde(rename = "4:2:2")]
    Half,
    /// Half horizontal and vertical chroma resolution
    #[default]
    #[serde(rename = "4:2:0")]
    Quarter,
}

impl JpegSubsampling {
    /// All options in declaration order.
    pub const ALL: [JpegSubsampling; 3] = [Self::Full, Self::Half, Self::Quarter];

    /// The user-facing label ("4:4:4", "4:2:2", "4:2:0").
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Full => "4:4:4",
            Self::Half => "4:2:2",
            Self::Quarter => "4:2:0",
        }
    }

    /// Numeric subsampling code: 0 = 4:4:4, 1 = 4:2:2, 2 = 4:2:0.
    pub fn code(self) -> u8 {
        match self {
            Self::Full => 0,
            Self::Half => 1,
            Self::Quarter => 2,
        }
    }

    /// Luma sampling factors (horizontal, vertical) this choice produces.
    pub fn luma_factors(self) -> (u8, u8) {
        match self {
            Self::Full => (1, 1),
            Self::Half => (2, 1),
            Self::Quarter => (2, 2),
        }
    }
}

impl std::fmt::Display for JpegSubsampling {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for JpegSubsampling {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|option| option.as_str() == s)
            .ok_or_else(|| format!("unknown subsampling {s:?}, expected 4:4:4, 4:2:2 or 4:2:0"))
    }
}

/// Encoder sampling factor for a numeric subsampling code.
pub fn sampling_factor(code: u8) -> Option<SamplingFactor> {
    match code {
        0 => Some(SamplingFactor::R_4_4_4),
        1 => Some(SamplingFactor::R_4_2_2),
        2 => Some(SamplingFactor::R_4_2_0),
        _ => None,
    }
}

/// JPEG encoder parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JpegOptions {
    /// Quality, 1-100
    pub quality: u8,
    /// Write a progressive (multi-scan) file
    pub progressive: bool,
    /// Build optimized Huffman tables
    pub optimize: bool,
    /// Chroma subsampling
    pub subsampling: JpegSubsampling,
}

/// Convert images with an alpha channel to RGB.
///
/// Palette sources arrive here already expanded to RGB or RGBA by the
/// decoder, so dropping alpha covers them too.
pub fn flatten_alpha(image: &DynamicImage) -> Cow<'_, DynamicImage> {
    if image.color().has_alpha() {
        Cow::Owned(DynamicImage::ImageRgb8(image.to_rgb8()))
    } else {
        Cow::Borrowed(image)
    }
}

/// Encode `image` as JPEG into `writer`.
///
/// Greyscale stays single-channel; every other layout is written as 8-bit RGB.
pub fn encode<W: Write>(
    image: &DynamicImage,
    options: &JpegOptions,
    writer: W,
) -> Result<(), CodecError> {
    let (width, height) = image.dimensions();
    let (width, height) = match (u16::try_from(width), u16::try_from(height)) {
        (Ok(w), Ok(h)) => (w, h),
        _ => {
            return Err(CodecError::Unsupported(format!(
                "{width}x{height} exceeds the JPEG limit of 65535 pixels per side"
            )))
        }
    };

    let (pixels, color_type) = match image {
        DynamicImage::ImageLuma8(gray) => (Cow::Borrowed(gray.as_raw()), ColorType::Luma),
        DynamicImage::ImageLuma16(_) => (Cow::Owned(image.to_luma8().into_raw()), ColorType::Luma),
        DynamicImage::ImageRgb8(rgb) => (Cow::Borrowed(rgb.as_raw()), ColorType::Rgb),
        _ => (Cow::Owned(image.to_rgb8().into_raw()), ColorType::Rgb),
    };

    let mut encoder = Encoder::new(writer, options.quality);
    encoder.set_progressive(options.progressive);
    encoder.set_optimized_huffman_tables(options.optimize);
    if let Some(factor) = sampling_factor(options.subsampling.code()) {
        encoder.set_sampling_factor(factor);
    }
    encoder.encode(&pixels, width, height, color_type)?;
    Ok(())
}
