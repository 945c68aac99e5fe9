//! Fixtures and file inspection helpers shared by unit tests.

use image::{DynamicImage, RgbImage, RgbaImage};
use std::io::Cursor;
use tempfile::TempDir;

use crate::config::Config;
use crate::invocation::InvocationContext;
use crate::store::MemoryImageStore;

/// Horizontal/vertical colour ramp, so codecs have real content to compress.
pub fn gradient_rgb(width: u32, height: u32) -> RgbImage {
    RgbImage::from_fn(width, height, |x, y| {
        image::Rgb([
            (x * 255 / width.max(1)) as u8,
            (y * 255 / height.max(1)) as u8,
            ((x + y) % 256) as u8,
        ])
    })
}

/// Colour ramp with alpha kept in 128..=255 (libwebp rewrites RGB under
/// fully transparent pixels, which would break exact comparisons).
pub fn gradient_rgba(width: u32, height: u32) -> RgbaImage {
    let rgb = gradient_rgb(width, height);
    RgbaImage::from_fn(width, height, |x, y| {
        let image::Rgb([r, g, b]) = *rgb.get_pixel(x, y);
        image::Rgba([r, g, b, 255 - ((x * 4) % 128) as u8])
    })
}

/// True when `name` is `YYYY-MM-DD-HHMM-xxxxxxxx.{extension}` with eight
/// lowercase hex digits in the suffix.
pub fn matches_output_pattern(name: &str, extension: &str) -> bool {
    let Some(stem) = name.strip_suffix(&format!(".{extension}")) else {
        return false;
    };
    let bytes = stem.as_bytes();
    if bytes.len() != 24 {
        return false;
    }
    let digit_positions = [0, 1, 2, 3, 5, 6, 8, 9, 11, 12, 13, 14];
    let dash_positions = [4, 7, 10, 15];
    digit_positions.iter().all(|&i| bytes[i].is_ascii_digit())
        && dash_positions.iter().all(|&i| bytes[i] == b'-')
        && bytes[16..]
            .iter()
            .all(|b| b.is_ascii_digit() || (b'a'..=b'f').contains(b))
}

/// Fields of a JPEG start-of-frame segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameHeader {
    /// SOFn marker byte (0xC0 baseline, 0xC2 progressive, ...)
    pub marker: u8,
    /// Number of colour components
    pub components: u8,
    /// Horizontal and vertical sampling factors of the first component
    pub luma_factors: (u8, u8),
}

/// Walk JPEG marker segments up to the first start-of-frame.
pub fn jpeg_frame_header(bytes: &[u8]) -> Option<FrameHeader> {
    if !bytes.starts_with(&[0xFF, 0xD8]) {
        return None;
    }
    let mut pos = 2;
    while pos + 4 <= bytes.len() {
        if bytes[pos] != 0xFF {
            return None;
        }
        let marker = bytes[pos + 1];
        let len = u16::from_be_bytes([bytes[pos + 2], bytes[pos + 3]]) as usize;
        let is_sof = matches!(marker, 0xC0..=0xCF) && !matches!(marker, 0xC4 | 0xC8 | 0xCC);
        if is_sof {
            // precision(1) height(2) width(2) count(1), then id(1) HV(1) Tq(1) per component
            let segment = bytes.get(pos + 4..pos + 2 + len)?;
            let components = *segment.get(5)?;
            let sampling = *segment.get(7)?;
            return Some(FrameHeader {
                marker,
                components,
                luma_factors: (sampling >> 4, sampling & 0x0F),
            });
        }
        pos += 2 + len;
    }
    None
}

/// Read the `Compression` tag of the first TIFF directory.
pub fn tiff_compression_tag(bytes: &[u8]) -> u32 {
    let mut decoder = tiff::decoder::Decoder::new(Cursor::new(bytes)).unwrap();
    decoder.get_tag_u32(tiff::tags::Tag::Compression).unwrap()
}

/// Scratch outputs directory plus an in-memory store with a few images.
pub struct TestHost {
    pub config: Config,
    pub store: MemoryImageStore,
    _root: TempDir,
}

impl TestHost {
    pub fn new() -> Self {
        let root = tempfile::tempdir().unwrap();
        let mut config = Config::default();
        config.general.outputs_dir = root.path().join("outputs");

        let mut store = MemoryImageStore::new();
        store.insert("rgb", DynamicImage::ImageRgb8(gradient_rgb(40, 30)));
        store.insert("rgba", DynamicImage::ImageRgba8(gradient_rgba(40, 30)));
        store.insert(
            "la",
            DynamicImage::ImageLumaA8(DynamicImage::ImageRgba8(gradient_rgba(40, 30)).to_luma_alpha8()),
        );
        store.insert("gray", DynamicImage::new_luma8(40, 30));

        Self {
            config,
            store,
            _root: root,
        }
    }

    pub fn ctx(&self) -> InvocationContext<'_> {
        InvocationContext::new(&self.store, &self.config)
    }

    /// Number of files currently in the export directory.
    pub fn exported_files(&self) -> usize {
        std::fs::read_dir(self.config.export_dir())
            .map(|entries| entries.count())
            .unwrap_or(0)
    }
}
