// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Conversion orchestrator — validates a request, sequences
// decode → transform(s) → encode/assemble, and wraps the outcome in a
// result descriptor. Every call is stateless and exclusively owns its
// buffers; failures surface as typed errors, never partial output.

use std::path::Path;

use rasterwerk_core::EngineConfig;
use rasterwerk_core::catalog::{self, Fidelity};
use rasterwerk_core::error::{EngineError, Result};
use rasterwerk_core::types::{
    MirrorAxis, RasterFormat, ResultDescriptor, SizeReport, TargetFormat, TransformRequest,
};
use tracing::{info, instrument};

use crate::codec;
use crate::page::assembler::PageAssembler;
use crate::page::vector::rasterize_svg;
use crate::raster::Raster;

/// One named input file.
#[derive(Debug, Clone, Copy)]
pub struct SourceInput<'a> {
    /// Original file name; its extension drives catalog validation and its
    /// stem the suggested output name.
    pub name: &'a str,
    /// Raw encoded bytes.
    pub bytes: &'a [u8],
}

/// Runs conversion requests end to end.
#[derive(Debug, Clone, Default)]
pub struct Converter {
    config: EngineConfig,
}

impl Converter {
    pub fn new(config: EngineConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Convert or transform a single source file.
    ///
    /// Parameters are validated before any decode work; a request that
    /// fails validation performs no I/O at all.
    #[instrument(skip(self, bytes), fields(file = name, op = request.name(), bytes_len = bytes.len()))]
    pub fn convert(
        &self,
        name: &str,
        bytes: &[u8],
        request: &TransformRequest,
    ) -> Result<ResultDescriptor> {
        request.validate()?;

        match request {
            TransformRequest::Convert { to } => self.run_convert(name, bytes, *to),
            TransformRequest::Compress => self.run_compress(name, bytes),

            TransformRequest::Resize { width, height } => self.transformed(
                name,
                codec::decode(bytes)?.resize(*width, *height),
                format!("Resized to {width}x{height}"),
            ),
            TransformRequest::Grayscale => self.transformed(
                name,
                codec::decode(bytes)?.grayscale(),
                "Converted to grayscale".into(),
            ),
            TransformRequest::Rotate90 => self.transformed(
                name,
                codec::decode(bytes)?.rotate90(),
                "Rotated 90 degrees clockwise".into(),
            ),
            TransformRequest::Flip => self.transformed(
                name,
                codec::decode(bytes)?.flip(),
                "Flipped left-to-right".into(),
            ),
            TransformRequest::Mirror { axis } => {
                let note = match axis {
                    MirrorAxis::Horizontal => "Mirrored left-to-right",
                    MirrorAxis::Vertical => "Mirrored top-to-bottom",
                };
                self.transformed(name, codec::decode(bytes)?.mirror(*axis), note.into())
            }
            TransformRequest::CropCenter => self.transformed(
                name,
                codec::decode(bytes)?.crop_center(),
                "Cropped to centered square".into(),
            ),
            TransformRequest::BrightnessContrast {
                brightness,
                contrast,
            } => self.transformed(
                name,
                codec::decode(bytes)?.brightness_contrast(*brightness, *contrast),
                "Adjusted brightness and contrast".into(),
            ),
            TransformRequest::Blur => {
                self.transformed(name, codec::decode(bytes)?.blur(), "Applied blur".into())
            }
            TransformRequest::Sharpen { intensity } => self.transformed(
                name,
                codec::decode(bytes)?.sharpen(*intensity),
                "Sharpened".into(),
            ),
            TransformRequest::Watermark(spec) => self.transformed(
                name,
                codec::decode(bytes)?.watermark(spec, self.config.watermark_padding),
                format!("Watermarked with \"{}\"", spec.text.trim()),
            ),
        }
    }

    /// Lay several images out as one document, one page per image.
    ///
    /// Every input's (extension, pdf) pair must be declared multi-capable
    /// in the catalog before any decode work starts.
    #[instrument(skip(self, inputs), fields(count = inputs.len()))]
    pub fn assemble(&self, inputs: &[SourceInput<'_>]) -> Result<ResultDescriptor> {
        for input in inputs {
            let from = source_extension(input.name);
            let entry = catalog::find_entry(&from, "pdf").ok_or_else(|| {
                EngineError::UnsupportedConversion {
                    from: from.clone(),
                    to: "pdf".into(),
                }
            })?;
            if inputs.len() > 1 && !entry.allows_multiple {
                return Err(EngineError::UnsupportedConversion {
                    from: from.clone(),
                    to: "pdf".into(),
                });
            }
        }

        let mut assembler = PageAssembler::new(self.config.page_size);
        if let Some(first) = inputs.first() {
            assembler.set_title(file_stem(first.name));
        }

        let images: Vec<&[u8]> = inputs.iter().map(|input| input.bytes).collect();
        let bytes = assembler.assemble_images(&images)?;
        info!(pages = inputs.len(), "Document assembled");

        let file_name = match inputs.first() {
            Some(first) => derive_file_name(first.name, "pdf"),
            None => "document.pdf".into(),
        };
        Ok(ResultDescriptor {
            bytes,
            media_type: "application/pdf".into(),
            file_name,
            note: Some(format!("{} page document", inputs.len())),
            sizes: None,
        })
    }

    // -- Operation bodies -----------------------------------------------------

    fn run_convert(
        &self,
        name: &str,
        bytes: &[u8],
        to: TargetFormat,
    ) -> Result<ResultDescriptor> {
        let from = source_extension(name);
        let entry = catalog::find_entry(&from, to.extension()).ok_or_else(|| {
            EngineError::UnsupportedConversion {
                from: from.clone(),
                to: to.extension().into(),
            }
        })?;

        match to.as_raster() {
            Some(target) => self.convert_to_raster(name, bytes, &from, target),
            None => self.convert_to_document(name, bytes, &from, entry.fidelity),
        }
    }

    fn convert_to_raster(
        &self,
        name: &str,
        bytes: &[u8],
        from: &str,
        target: RasterFormat,
    ) -> Result<ResultDescriptor> {
        let raster = if from == "svg" {
            rasterize_svg(utf8_text(bytes)?)?
        } else {
            codec::decode(bytes)?
        };
        let encoded = codec::encode(&raster, target, self.config.encode_quality)?;
        Ok(ResultDescriptor {
            bytes: encoded,
            media_type: target.media_type().into(),
            file_name: derive_file_name(name, target.extension()),
            note: None,
            sizes: None,
        })
    }

    fn convert_to_document(
        &self,
        name: &str,
        bytes: &[u8],
        from: &str,
        fidelity: Fidelity,
    ) -> Result<ResultDescriptor> {
        let mut assembler = PageAssembler::new(self.config.page_size);
        assembler.set_title(file_stem(name));

        let (document, note) = match fidelity {
            Fidelity::BestEffort => {
                // Office / ebook sources: substitute readable text when the
                // payload is text-like, otherwise a notice page. Never
                // presented as a faithful rendition.
                let body = match std::str::from_utf8(bytes) {
                    Ok(text) if !text.trim().is_empty() => text.to_string(),
                    _ => format!(
                        "Preview of {name}.\nThe original document format cannot be rendered here."
                    ),
                };
                (
                    assembler.text_document(&body),
                    Some(format!(
                        "Best-effort text substitute for {from} — not a faithful conversion"
                    )),
                )
            }
            Fidelity::Faithful => match from {
                "svg" => {
                    let raster = rasterize_svg(utf8_text(bytes)?)?;
                    (assembler.single_raster(&raster), None)
                }
                "txt" => (assembler.text_document(utf8_text(bytes)?), None),
                _ => (assembler.single_image(bytes)?, None),
            },
        };

        Ok(ResultDescriptor {
            bytes: document,
            media_type: "application/pdf".into(),
            file_name: derive_file_name(name, "pdf"),
            note,
            sizes: None,
        })
    }

    fn run_compress(&self, name: &str, bytes: &[u8]) -> Result<ResultDescriptor> {
        let raster = codec::decode(bytes)?;
        let encoded = codec::encode(&raster, RasterFormat::Jpeg, self.config.compress_quality)?;
        let sizes = SizeReport {
            original: bytes.len() as u64,
            encoded: encoded.len() as u64,
        };
        info!(original = sizes.original, encoded = sizes.encoded, "Compressed");

        Ok(ResultDescriptor {
            bytes: encoded,
            media_type: RasterFormat::Jpeg.media_type().into(),
            file_name: derive_file_name(name, "jpg"),
            note: Some(format!(
                "Compressed as JPEG at {:.0}% quality",
                self.config.compress_quality * 100.0
            )),
            sizes: Some(sizes),
        })
    }

    /// Package a transformed raster: re-encoded as PNG so alpha survives.
    fn transformed(
        &self,
        name: &str,
        raster: Raster,
        note: String,
    ) -> Result<ResultDescriptor> {
        let encoded = codec::encode(&raster, RasterFormat::Png, 1.0)?;
        Ok(ResultDescriptor {
            bytes: encoded,
            media_type: RasterFormat::Png.media_type().into(),
            file_name: derive_file_name(name, "png"),
            note: Some(note),
            sizes: None,
        })
    }
}

// -- Name helpers -------------------------------------------------------------

/// Lower-cased extension of a file name; empty when absent.
fn source_extension(name: &str) -> String {
    Path::new(name)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase())
        .unwrap_or_default()
}

/// File stem with path separators replaced, defaulting to "converted".
fn file_stem(name: &str) -> String {
    let stem = Path::new(name)
        .file_stem()
        .and_then(|s| s.to_str())
        .filter(|s| !s.trim().is_empty())
        .unwrap_or("converted");
    stem.chars()
        .map(|ch| if ch == '/' || ch == '\\' { '_' } else { ch })
        .collect()
}

/// Suggested download name: sanitized stem plus the target extension.
fn derive_file_name(name: &str, target_ext: &str) -> String {
    format!("{}.{}", file_stem(name), target_ext)
}

fn utf8_text(bytes: &[u8]) -> Result<&str> {
    std::str::from_utf8(bytes)
        .map_err(|err| EngineError::Decode(format!("source is not valid UTF-8 text: {err}")))
}
