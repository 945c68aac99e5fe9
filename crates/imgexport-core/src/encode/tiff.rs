//! TIFF encoding through the `tiff` crate.
//!
//! `none`, `lzw` and `zip` go through the crate's strip writer. The crate has
//! no JPEG compressor, so `jpeg` writes the directory by hand: one strip that
//! holds a complete baseline JPEG stream (compression tag 7, YCbCr).

use image::{DynamicImage, GenericImageView};
use jpeg_encoder::{ColorType as JpegColorType, Encoder as JpegEncoder, SamplingFactor};
use serde::{Deserialize, Serialize};
use std::io::{Seek, Write};
use std::str::FromStr;
use tiff::encoder::compression::{Compression, Deflate, Lzw, Uncompressed};
use tiff::encoder::{colortype, Rational, TiffEncoder};
use tiff::tags::Tag;

use crate::error::CodecError;

/// TIFF `Compression` tag value for new-style JPEG.
const COMPRESSION_JPEG: u16 = 7;
/// TIFF `PhotometricInterpretation` value for YCbCr.
const PHOTOMETRIC_YCBCR: u16 = 6;
/// `YCbCrSubSampling` tag, not named by the tiff crate.
const TAG_YCBCR_SUBSAMPLING: u16 = 530;

/// TIFF compression choices exposed to users.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TiffCompression {
    None,
    #[default]
    Lzw,
    Jpeg,
    Zip,
}

impl TiffCompression {
    /// All options in declaration order.
    pub const ALL: [TiffCompression; 4] = [Self::None, Self::Lzw, Self::Jpeg, Self::Zip];

    /// The user-facing label.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Lzw => "lzw",
            Self::Jpeg => "jpeg",
            Self::Zip => "zip",
        }
    }
}

impl std::fmt::Display for TiffCompression {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TiffCompression {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|option| option.as_str() == s)
            .ok_or_else(|| format!("unknown TIFF compression {s:?}, expected none, lzw, jpeg or zip"))
    }
}

/// TIFF encoder parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TiffOptions {
    /// Strip compression
    pub compression: TiffCompression,
    /// Quality of the JPEG stream when `compression` is `Jpeg`
    pub jpeg_quality: u8,
}

/// Encode `image` as a single-page TIFF into `writer`.
pub fn encode<W: Write + Seek>(
    image: &DynamicImage,
    options: &TiffOptions,
    writer: W,
) -> Result<(), CodecError> {
    let mut encoder = TiffEncoder::new(writer)?;
    match options.compression {
        TiffCompression::None => write_strips(&mut encoder, image, Uncompressed::default()),
        TiffCompression::Lzw => write_strips(&mut encoder, image, Lzw::default()),
        TiffCompression::Zip => write_strips(&mut encoder, image, Deflate::default()),
        TiffCompression::Jpeg => write_jpeg_strip(&mut encoder, image, options.jpeg_quality),
    }
}

fn write_strips<W: Write + Seek, D: Compression>(
    encoder: &mut TiffEncoder<W>,
    image: &DynamicImage,
    compression: D,
) -> Result<(), CodecError> {
    let (width, height) = image.dimensions();
    match image {
        DynamicImage::ImageLuma8(gray) => encoder
            .write_image_with_compression::<colortype::Gray8, _>(
                width,
                height,
                compression,
                gray.as_raw(),
            )?,
        other if other.color().has_alpha() => {
            let rgba = other.to_rgba8();
            encoder.write_image_with_compression::<colortype::RGBA8, _>(
                width,
                height,
                compression,
                rgba.as_raw(),
            )?
        }
        other => {
            let rgb = other.to_rgb8();
            encoder.write_image_with_compression::<colortype::RGB8, _>(
                width,
                height,
                compression,
                rgb.as_raw(),
            )?
        }
    }
    Ok(())
}

fn write_jpeg_strip<W: Write + Seek>(
    encoder: &mut TiffEncoder<W>,
    image: &DynamicImage,
    quality: u8,
) -> Result<(), CodecError> {
    let (width, height) = image.dimensions();
    let (jpeg_width, jpeg_height) = match (u16::try_from(width), u16::try_from(height)) {
        (Ok(w), Ok(h)) => (w, h),
        _ => {
            return Err(CodecError::Unsupported(format!(
                "{width}x{height} exceeds the 65535 pixel limit of JPEG-compressed TIFF"
            )))
        }
    };

    let rgb = image.to_rgb8();
    let mut strip = Vec::new();
    let mut jpeg = JpegEncoder::new(&mut strip, quality);
    jpeg.set_sampling_factor(SamplingFactor::R_4_4_4);
    jpeg.encode(rgb.as_raw(), jpeg_width, jpeg_height, JpegColorType::Rgb)?;

    let strip_len = u32::try_from(strip.len())
        .map_err(|_| CodecError::Unsupported("JPEG strip exceeds 4 GiB".into()))?;

    let mut dir = encoder.new_directory()?;
    let offset = dir.write_data(strip.as_slice())?;
    let offset = u32::try_from(offset)
        .map_err(|_| CodecError::Unsupported("strip offset exceeds classic TIFF range".into()))?;

    dir.write_tag(Tag::ImageWidth, width)?;
    dir.write_tag(Tag::ImageLength, height)?;
    dir.write_tag(Tag::BitsPerSample, &[8u16, 8, 8][..])?;
    dir.write_tag(Tag::Compression, COMPRESSION_JPEG)?;
    dir.write_tag(Tag::PhotometricInterpretation, PHOTOMETRIC_YCBCR)?;
    dir.write_tag(Tag::StripOffsets, offset)?;
    dir.write_tag(Tag::SamplesPerPixel, 3u16)?;
    dir.write_tag(Tag::RowsPerStrip, height)?;
    dir.write_tag(Tag::StripByteCounts, strip_len)?;
    dir.write_tag(Tag::XResolution, Rational { n: 1, d: 1 })?;
    dir.write_tag(Tag::YResolution, Rational { n: 1, d: 1 })?;
    dir.write_tag(Tag::ResolutionUnit, 1u16)?;
    dir.write_tag(Tag::PlanarConfiguration, 1u16)?;
    dir.write_tag(Tag::Unknown(TAG_YCBCR_SUBSAMPLING), &[1u16, 1][..])?;
    dir.finish()?;
    Ok(())
}
