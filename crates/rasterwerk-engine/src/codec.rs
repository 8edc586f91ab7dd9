// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Format codec adapter — decodes arbitrary encoded bytes into a Raster and
// encodes a Raster into a target container at a given quality factor.
// Alpha flattening for formats without native transparency happens here,
// never in transform code.

use std::io::Cursor;

use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::{CompressionType, FilterType as PngFilterType, PngEncoder};
use image::codecs::webp::WebPEncoder;
use image::{DynamicImage, ExtendedColorType, ImageEncoder, ImageFormat, ImageReader, RgbImage, RgbaImage};
use rasterwerk_core::error::{EngineError, Result};
use rasterwerk_core::types::RasterFormat;
use tracing::{debug, instrument};

use crate::raster::Raster;

/// Decode encoded image bytes into an owned RGBA raster.
///
/// Magic bytes are honoured first so mismatched extensions still decode;
/// a plain guess-everything pass is the fallback.
#[instrument(skip(bytes), fields(bytes_len = bytes.len()))]
pub fn decode(bytes: &[u8]) -> Result<Raster> {
    if bytes.is_empty() {
        return Err(EngineError::Decode("input image is empty".into()));
    }

    let decoded = match ImageReader::new(Cursor::new(bytes)).with_guessed_format() {
        Ok(reader) => reader.decode(),
        Err(err) => return Err(EngineError::Decode(format!("unreadable input: {err}"))),
    };
    let dynamic = decoded
        .or_else(|_| image::load_from_memory(bytes))
        .map_err(|err| EngineError::Decode(format!("failed to decode image: {err}")))?;

    debug!(
        width = dynamic.width(),
        height = dynamic.height(),
        "Image decoded"
    );
    Ok(Raster::from_image(dynamic.to_rgba8()))
}

/// Encode a raster into `format` at `quality` in (0, 1].
///
/// The quality factor only matters for lossy containers; formats without a
/// native alpha channel are composited onto opaque white first.
#[instrument(skip(raster), fields(format = ?format, quality))]
pub fn encode(raster: &Raster, format: RasterFormat, quality: f32) -> Result<Vec<u8>> {
    if !quality.is_finite() || quality <= 0.0 || quality > 1.0 {
        return Err(EngineError::Parameter(format!(
            "encode quality {quality} outside (0, 1]"
        )));
    }

    let rgba = raster.as_image();
    let (width, height) = rgba.dimensions();
    let mut buffer = Vec::new();

    match format {
        RasterFormat::Png => {
            let encoder = PngEncoder::new_with_quality(
                Cursor::new(&mut buffer),
                CompressionType::Default,
                PngFilterType::Adaptive,
            );
            encoder
                .write_image(rgba.as_raw(), width, height, ExtendedColorType::Rgba8)
                .map_err(|err| EngineError::Encode(format!("PNG encoding failed: {err}")))?;
        }
        RasterFormat::Jpeg => {
            let rgb = flatten_onto_white(rgba);
            let jpeg_quality = (quality * 100.0).round().clamp(1.0, 100.0) as u8;
            let mut encoder =
                JpegEncoder::new_with_quality(Cursor::new(&mut buffer), jpeg_quality);
            encoder
                .encode(rgb.as_raw(), width, height, ExtendedColorType::Rgb8)
                .map_err(|err| EngineError::Encode(format!("JPEG encoding failed: {err}")))?;
        }
        RasterFormat::Webp => {
            let encoder = WebPEncoder::new_lossless(Cursor::new(&mut buffer));
            encoder
                .encode(rgba.as_raw(), width, height, ExtendedColorType::Rgba8)
                .map_err(|err| EngineError::Encode(format!("WebP encoding failed: {err}")))?;
        }
        RasterFormat::Gif => {
            write_dynamic(&mut buffer, DynamicImage::ImageRgba8(rgba.clone()), ImageFormat::Gif)?;
        }
        RasterFormat::Bmp => {
            let rgb = flatten_onto_white(rgba);
            write_dynamic(&mut buffer, DynamicImage::ImageRgb8(rgb), ImageFormat::Bmp)?;
        }
        RasterFormat::Tiff => {
            write_dynamic(&mut buffer, DynamicImage::ImageRgba8(rgba.clone()), ImageFormat::Tiff)?;
        }
    }

    debug!(encoded_len = buffer.len(), "Image encoded");
    Ok(buffer)
}

fn write_dynamic(buffer: &mut Vec<u8>, image: DynamicImage, format: ImageFormat) -> Result<()> {
    image
        .write_to(&mut Cursor::new(buffer), format)
        .map_err(|err| EngineError::Encode(format!("{format:?} encoding failed: {err}")))
}

/// Composite an RGBA buffer onto an opaque white background.
///
/// Required by containers without native alpha (JPEG, BMP) and by the
/// document assembler's RGB page images.
pub(crate) fn flatten_onto_white(rgba: &RgbaImage) -> RgbImage {
    RgbImage::from_fn(rgba.width(), rgba.height(), |x, y| {
        let image::Rgba([r, g, b, a]) = *rgba.get_pixel(x, y);
        let alpha = a as u16;
        let inv = 255 - alpha;
        let over = |channel: u8| -> u8 { ((channel as u16 * alpha + 255 * inv) / 255) as u8 };
        image::Rgb([over(r), over(g), over(b)])
    })
}
