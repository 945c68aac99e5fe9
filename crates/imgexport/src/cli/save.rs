//! The `imgexport save` command: export one image with one node.

use clap::{Args, Subcommand};
use imgexport_core::encode::{JpegSubsampling, TiffCompression};
use imgexport_core::invocation::{avif, jpeg, png, webp};
use imgexport_core::{
    AnyInvocation, Exporter, ImageField, SaveAvifInvocation, SaveJpegInvocation,
    SavePngInvocation, SaveTiffInvocation, SaveWebpInvocation,
};
use std::path::Path;

/// Arguments for the `save` command.
#[derive(Args, Debug)]
pub struct SaveArgs {
    #[command(subcommand)]
    pub format: SaveFormat,
}

/// One subcommand per output format.
#[derive(Subcommand, Debug)]
pub enum SaveFormat {
    /// Save as PNG
    Png(PngArgs),
    /// Save as JPEG (alpha is dropped)
    Jpeg(JpegArgs),
    /// Save as WebP
    Webp(WebpArgs),
    /// Save as AVIF
    Avif(AvifArgs),
    /// Save as TIFF
    Tiff(TiffArgs),
}

/// Arguments for `save png`.
#[derive(Args, Debug)]
pub struct PngArgs {
    /// Image name in the image directory
    #[arg(short, long)]
    pub image: String,

    /// Compression level, 0-9
    #[arg(short, long, default_value_t = png::DEFAULT_COMPRESSION)]
    pub compression: u8,

    /// Skip adaptive filter selection
    #[arg(long)]
    pub no_optimize: bool,
}

/// Arguments for `save jpeg`.
#[derive(Args, Debug)]
pub struct JpegArgs {
    /// Image name in the image directory
    #[arg(short, long)]
    pub image: String,

    /// Quality, 1-100
    #[arg(short, long, default_value_t = jpeg::DEFAULT_QUALITY)]
    pub quality: u8,

    /// Write a progressive JPEG
    #[arg(long)]
    pub progressive: bool,

    /// Use the standard Huffman tables
    #[arg(long)]
    pub no_optimize: bool,

    /// Chroma subsampling: 4:4:4, 4:2:2 or 4:2:0
    #[arg(short, long, default_value = "4:2:0")]
    pub subsampling: JpegSubsampling,
}

/// Arguments for `save webp`.
#[derive(Args, Debug)]
pub struct WebpArgs {
    /// Image name in the image directory
    #[arg(short, long)]
    pub image: String,

    /// Quality, 1-100
    #[arg(short, long, default_value_t = webp::DEFAULT_QUALITY)]
    pub quality: u8,

    /// Use lossless compression
    #[arg(long)]
    pub lossless: bool,

    /// Compression method, 0 (fast) to 6 (smallest)
    #[arg(short, long, default_value_t = webp::DEFAULT_METHOD)]
    pub method: u8,
}

/// Arguments for `save avif`.
#[derive(Args, Debug)]
pub struct AvifArgs {
    /// Image name in the image directory
    #[arg(short, long)]
    pub image: String,

    /// Quality, 1-100
    #[arg(short, long, default_value_t = avif::DEFAULT_QUALITY)]
    pub quality: u8,

    /// Encoder speed, 0 (slowest) to 10 (fastest)
    #[arg(short, long, default_value_t = avif::DEFAULT_SPEED)]
    pub speed: u8,
}

/// Arguments for `save tiff`.
#[derive(Args, Debug)]
pub struct TiffArgs {
    /// Image name in the image directory
    #[arg(short, long)]
    pub image: String,

    /// Compression: none, lzw, jpeg or zip
    #[arg(short, long, default_value = "lzw")]
    pub compression: TiffCompression,
}

impl SaveFormat {
    /// Build the invocation record for these arguments.
    ///
    /// Numeric bounds are left to node validation.
    pub fn into_record(self) -> AnyInvocation {
        match self {
            Self::Png(args) => AnyInvocation::Png(SavePngInvocation {
                image: ImageField::new(args.image),
                compression: args.compression,
                optimize: !args.no_optimize,
            }),
            Self::Jpeg(args) => AnyInvocation::Jpeg(SaveJpegInvocation {
                image: ImageField::new(args.image),
                quality: args.quality,
                progressive: args.progressive,
                optimize: !args.no_optimize,
                subsampling: args.subsampling,
            }),
            Self::Webp(args) => AnyInvocation::Webp(SaveWebpInvocation {
                image: ImageField::new(args.image),
                quality: args.quality,
                lossless: args.lossless,
                method: args.method,
            }),
            Self::Avif(args) => AnyInvocation::Avif(SaveAvifInvocation {
                image: ImageField::new(args.image),
                quality: args.quality,
                speed: args.speed,
            }),
            Self::Tiff(args) => AnyInvocation::Tiff(SaveTiffInvocation {
                image: ImageField::new(args.image),
                compression: args.compression,
            }),
        }
    }
}

/// Execute the save command.
pub async fn execute(args: SaveArgs, config_path: Option<&Path>) -> anyhow::Result<()> {
    let config = super::load_config(config_path)?;
    let pretty = config.output.pretty;
    let record = args.format.into_record();
    tracing::info!("Saving {:?} with {}", record.image_name(), record.spec().id);

    let exporter = Exporter::from_config(config);
    let output = tokio::task::spawn_blocking(move || exporter.run(&record)).await??;

    let json = if pretty {
        serde_json::to_string_pretty(&output)?
    } else {
        serde_json::to_string(&output)?
    };
    println!("{json}");
    Ok(())
}
