//! Export formats and magic-byte detection.

use serde::Serialize;

/// Formats the save nodes can write.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    Png,
    Jpeg,
    WebP,
    Avif,
    Tiff,
}

impl ExportFormat {
    /// File extension used for output files.
    pub fn extension(self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Jpeg => "jpg",
            Self::WebP => "webp",
            Self::Avif => "avif",
            Self::Tiff => "tiff",
        }
    }

    /// Lowercase format name used in logs and errors.
    pub fn name(self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Jpeg => "jpeg",
            Self::WebP => "webp",
            Self::Avif => "avif",
            Self::Tiff => "tiff",
        }
    }
}

impl std::fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Container signature recognised from the first bytes of a file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Signature {
    Jpeg,
    Png,
    Gif,
    WebP,
    Bmp,
    Tiff,
    /// ISO-BMFF with an `avif`/`avis` brand
    Avif,
    /// Any other ISO-BMFF image (HEIC, HEIF)
    Heif,
}

impl Signature {
    /// The export format that produces this signature, if any.
    pub fn export_format(self) -> Option<ExportFormat> {
        match self {
            Self::Jpeg => Some(ExportFormat::Jpeg),
            Self::Png => Some(ExportFormat::Png),
            Self::WebP => Some(ExportFormat::WebP),
            Self::Tiff => Some(ExportFormat::Tiff),
            Self::Avif => Some(ExportFormat::Avif),
            Self::Gif | Self::Bmp | Self::Heif => None,
        }
    }
}

/// Number of header bytes [`sniff`] needs to recognise every signature.
pub const SNIFF_LEN: usize = 12;

/// Identify an image container from its leading bytes.
pub fn sniff(header: &[u8]) -> Option<Signature> {
    if header.len() < 4 {
        return None;
    }

    // JPEG: FF D8 FF
    if header.starts_with(&[0xFF, 0xD8, 0xFF]) {
        return Some(Signature::Jpeg);
    }

    // PNG: 89 50 4E 47
    if header.starts_with(&[0x89, b'P', b'N', b'G']) {
        return Some(Signature::Png);
    }

    // GIF: GIF8
    if header.starts_with(b"GIF8") {
        return Some(Signature::Gif);
    }

    // WebP: RIFF....WEBP
    if header.starts_with(b"RIFF") {
        return (header.len() >= 12 && &header[8..12] == b"WEBP").then_some(Signature::WebP);
    }

    // BMP: BM
    if header.starts_with(b"BM") {
        return Some(Signature::Bmp);
    }

    // TIFF: II (little-endian) or MM (big-endian) followed by version 42
    if header.starts_with(&[b'I', b'I', 0x2A, 0x00]) || header.starts_with(&[b'M', b'M', 0x00, 0x2A])
    {
        return Some(Signature::Tiff);
    }

    // HEIC/HEIF/AVIF: ftyp box at offset 4, major brand at offset 8
    if header.len() >= 12 && &header[4..8] == b"ftyp" {
        return match &header[8..12] {
            b"avif" | b"avis" => Some(Signature::Avif),
            _ => Some(Signature::Heif),
        };
    }

    None
}
