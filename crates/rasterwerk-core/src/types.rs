// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Core domain types for the Rasterwerk conversion engine.

use serde::{Deserialize, Serialize};

use crate::error::{EngineError, Result};

/// Raster container formats the codec adapter can decode and encode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RasterFormat {
    Png,
    Jpeg,
    Webp,
    Gif,
    Bmp,
    Tiff,
}

impl RasterFormat {
    /// MIME type string declared on encoded output.
    pub fn media_type(&self) -> &'static str {
        match self {
            Self::Png => "image/png",
            Self::Jpeg => "image/jpeg",
            Self::Webp => "image/webp",
            Self::Gif => "image/gif",
            Self::Bmp => "image/bmp",
            Self::Tiff => "image/tiff",
        }
    }

    /// Canonical file extension (no dot).
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Jpeg => "jpg",
            Self::Webp => "webp",
            Self::Gif => "gif",
            Self::Bmp => "bmp",
            Self::Tiff => "tiff",
        }
    }

    /// Infer a raster format from a file extension.
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "png" => Some(Self::Png),
            "jpg" | "jpeg" => Some(Self::Jpeg),
            "webp" => Some(Self::Webp),
            "gif" => Some(Self::Gif),
            "bmp" => Some(Self::Bmp),
            "tif" | "tiff" => Some(Self::Tiff),
            _ => None,
        }
    }

    /// Whether the container carries an alpha channel natively.
    ///
    /// Formats without one must be composited onto an opaque background
    /// before encode.
    pub fn supports_alpha(&self) -> bool {
        match self {
            Self::Png | Self::Webp | Self::Gif | Self::Tiff => true,
            Self::Jpeg | Self::Bmp => false,
        }
    }
}

/// Output formats the convert operation accepts: every raster container
/// plus paginated document output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TargetFormat {
    Png,
    Jpeg,
    Webp,
    Gif,
    Bmp,
    Tiff,
    Pdf,
}

impl TargetFormat {
    /// The raster format this target maps to, if it is one.
    pub fn as_raster(&self) -> Option<RasterFormat> {
        match self {
            Self::Png => Some(RasterFormat::Png),
            Self::Jpeg => Some(RasterFormat::Jpeg),
            Self::Webp => Some(RasterFormat::Webp),
            Self::Gif => Some(RasterFormat::Gif),
            Self::Bmp => Some(RasterFormat::Bmp),
            Self::Tiff => Some(RasterFormat::Tiff),
            Self::Pdf => None,
        }
    }

    /// Canonical file extension (no dot).
    pub fn extension(&self) -> &'static str {
        match self.as_raster() {
            Some(fmt) => fmt.extension(),
            None => "pdf",
        }
    }

    /// MIME type string declared on encoded output.
    pub fn media_type(&self) -> &'static str {
        match self.as_raster() {
            Some(fmt) => fmt.media_type(),
            None => "application/pdf",
        }
    }
}

/// Standard document page sizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PageSize {
    A4,
    A3,
    A5,
    Letter,
    Legal,
    Custom { width_mm: u32, height_mm: u32 },
}

impl PageSize {
    /// Portrait dimensions in millimetres (width, height).
    pub fn dimensions_mm(&self) -> (u32, u32) {
        match self {
            Self::A4 => (210, 297),
            Self::A3 => (297, 420),
            Self::A5 => (148, 210),
            Self::Letter => (216, 279),
            Self::Legal => (216, 356),
            Self::Custom {
                width_mm,
                height_mm,
            } => (*width_mm, *height_mm),
        }
    }

    /// Dimensions in millimetres with the given orientation applied.
    pub fn oriented_mm(&self, orientation: PageOrientation) -> (u32, u32) {
        let (w, h) = self.dimensions_mm();
        match orientation {
            PageOrientation::Portrait => (w, h),
            PageOrientation::Landscape => (h, w),
        }
    }
}

/// Document page orientation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PageOrientation {
    Portrait,
    Landscape,
}

/// Axis for the mirror operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MirrorAxis {
    /// Reflect columns (left-to-right), same as flip.
    Horizontal,
    /// Reflect rows (top-to-bottom).
    Vertical,
}

/// Anchor positions for watermark placement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum WatermarkAnchor {
    TopLeft,
    TopRight,
    BottomLeft,
    #[default]
    BottomRight,
    Center,
}

/// Watermark parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WatermarkSpec {
    /// Text to render onto the image.
    pub text: String,
    /// Placement anchor; corner anchors keep a fixed padding from the edges.
    #[serde(default)]
    pub anchor: WatermarkAnchor,
    /// Glyph height in pixels.
    #[serde(default = "default_watermark_font_size")]
    pub font_size: u32,
    /// Opacity in [0.0, 1.0].
    #[serde(default = "default_watermark_opacity")]
    pub opacity: f32,
    /// Fill color in hex (#RRGGBB, RRGGBB, or #RRGGBBAA).
    #[serde(default = "default_watermark_color")]
    pub color: String,
}

fn default_watermark_font_size() -> u32 {
    24
}

fn default_watermark_opacity() -> f32 {
    0.5
}

fn default_watermark_color() -> String {
    "#ffffff".into()
}

impl Default for WatermarkSpec {
    fn default() -> Self {
        Self {
            text: "watermark".into(),
            anchor: WatermarkAnchor::default(),
            font_size: default_watermark_font_size(),
            opacity: default_watermark_opacity(),
            color: default_watermark_color(),
        }
    }
}

impl WatermarkSpec {
    /// Reject out-of-domain parameters up front.
    pub fn validate(&self) -> Result<()> {
        if self.text.trim().is_empty() {
            return Err(EngineError::Parameter("watermark text cannot be empty".into()));
        }
        if self.font_size == 0 {
            return Err(EngineError::Parameter(
                "watermark font size must be positive".into(),
            ));
        }
        if !self.opacity.is_finite() || !(0.0..=1.0).contains(&self.opacity) {
            return Err(EngineError::Parameter(format!(
                "watermark opacity {} outside [0, 1]",
                self.opacity
            )));
        }
        if parse_hex_color(&self.color).is_none() {
            return Err(EngineError::Parameter(format!(
                "watermark color {:?} is not a valid RGB hex string",
                self.color
            )));
        }
        Ok(())
    }
}

/// An RGBA color parsed from a hex string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RgbaColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

/// Parse `#RRGGBB`, `RRGGBB`, or `#RRGGBBAA` into an [`RgbaColor`].
pub fn parse_hex_color(input: &str) -> Option<RgbaColor> {
    let trimmed = input.trim().trim_start_matches('#');
    if !trimmed.is_ascii() || (trimmed.len() != 6 && trimmed.len() != 8) {
        return None;
    }
    let (rgb, alpha) = if trimmed.len() == 6 {
        (trimmed, "ff")
    } else {
        trimmed.split_at(6)
    };
    let r = u8::from_str_radix(&rgb[0..2], 16).ok()?;
    let g = u8::from_str_radix(&rgb[2..4], 16).ok()?;
    let b = u8::from_str_radix(&rgb[4..6], 16).ok()?;
    let a = u8::from_str_radix(alpha, 16).ok()?;
    Some(RgbaColor { r, g, b, a })
}

/// A single conversion or transformation request.
///
/// The closed tag set replaces the string-keyed dispatch of older converter
/// designs: unrecognized operations cannot be constructed, and every match
/// over the variants is checked at compile time.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "kebab-case")]
pub enum TransformRequest {
    /// Re-encode into the target container or document format.
    Convert { to: TargetFormat },
    /// Resample to exactly (width, height); stretching is the caller's choice.
    Resize { width: u32, height: u32 },
    /// Reduce to the unweighted channel mean.
    Grayscale,
    /// Rotate 90° clockwise.
    Rotate90,
    /// Horizontal mirror.
    Flip,
    /// Mirror about the given axis.
    Mirror { axis: MirrorAxis },
    /// Crop to the largest centered square.
    CropCenter,
    /// Remap channel values around the mid-point pivot.
    BrightnessContrast { brightness: u32, contrast: u32 },
    /// Fixed-radius low-pass smoothing.
    Blur,
    /// Unsharp-style 3x3 convolution.
    Sharpen { intensity: f32 },
    /// Composite a translucent text overlay.
    Watermark(WatermarkSpec),
    /// Re-encode as JPEG at a fixed low quality and report both sizes.
    Compress,
}

impl TransformRequest {
    /// Operation tag for logs and error messages.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Convert { .. } => "convert",
            Self::Resize { .. } => "resize",
            Self::Grayscale => "grayscale",
            Self::Rotate90 => "rotate90",
            Self::Flip => "flip",
            Self::Mirror { .. } => "mirror",
            Self::CropCenter => "crop-center",
            Self::BrightnessContrast { .. } => "brightness-contrast",
            Self::Blur => "blur",
            Self::Sharpen { .. } => "sharpen",
            Self::Watermark(_) => "watermark",
            Self::Compress => "compress",
        }
    }

    /// Check every parameter against its declared domain.
    ///
    /// Runs before any decode work; a request that fails here performs no
    /// I/O at all. Channel math saturates by definition, but request
    /// parameters never clamp silently.
    pub fn validate(&self) -> Result<()> {
        match self {
            Self::Resize { width, height } => {
                if *width == 0 || *height == 0 {
                    return Err(EngineError::Parameter(format!(
                        "resize target {width}x{height} must have positive dimensions"
                    )));
                }
                Ok(())
            }
            Self::BrightnessContrast {
                brightness,
                contrast,
            } => {
                if *brightness > 200 {
                    return Err(EngineError::Parameter(format!(
                        "brightness {brightness} outside [0, 200]"
                    )));
                }
                if *contrast > 200 {
                    return Err(EngineError::Parameter(format!(
                        "contrast {contrast} outside [0, 200]"
                    )));
                }
                Ok(())
            }
            Self::Sharpen { intensity } => {
                if !intensity.is_finite() || !(0.0..=2.0).contains(intensity) {
                    return Err(EngineError::Parameter(format!(
                        "sharpen intensity {intensity} outside [0, 2]"
                    )));
                }
                Ok(())
            }
            Self::Watermark(spec) => spec.validate(),
            _ => Ok(()),
        }
    }
}

/// Size accounting for the compress operation.
///
/// Both figures are reported truthfully even when the encoded payload ends
/// up larger than the original.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SizeReport {
    pub original: u64,
    pub encoded: u64,
}

/// The outcome of a conversion, handed to the caller.
///
/// Immutable once produced; the caller owns the payload and is responsible
/// for releasing any transient URI it exposes the bytes through.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResultDescriptor {
    /// Encoded output payload.
    pub bytes: Vec<u8>,
    /// Declared media type of the payload.
    pub media_type: String,
    /// Suggested download file name.
    pub file_name: String,
    /// Human-readable note (e.g. "Mirrored left-to-right").
    pub note: Option<String>,
    /// Original vs encoded byte counts; set by compress only.
    pub sizes: Option<SizeReport>,
}

impl ResultDescriptor {
    /// Write the payload to a file.
    pub fn save(&self, path: impl AsRef<std::path::Path>) -> Result<()> {
        std::fs::write(path.as_ref(), &self.bytes)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn raster_format_extension_round_trip() {
        for fmt in [
            RasterFormat::Png,
            RasterFormat::Jpeg,
            RasterFormat::Webp,
            RasterFormat::Gif,
            RasterFormat::Bmp,
            RasterFormat::Tiff,
        ] {
            assert_eq!(RasterFormat::from_extension(fmt.extension()), Some(fmt));
        }
        assert_eq!(RasterFormat::from_extension("jpeg"), Some(RasterFormat::Jpeg));
        assert_eq!(RasterFormat::from_extension("xyz"), None);
    }

    #[test]
    fn jpeg_and_bmp_need_a_background() {
        assert!(!RasterFormat::Jpeg.supports_alpha());
        assert!(!RasterFormat::Bmp.supports_alpha());
        assert!(RasterFormat::Png.supports_alpha());
    }

    #[test]
    fn page_size_orientation_swaps_dimensions() {
        assert_eq!(PageSize::A4.oriented_mm(PageOrientation::Portrait), (210, 297));
        assert_eq!(PageSize::A4.oriented_mm(PageOrientation::Landscape), (297, 210));
    }

    #[test]
    fn hex_color_parses_with_and_without_hash() {
        assert_eq!(
            parse_hex_color("#ff8000"),
            Some(RgbaColor {
                r: 255,
                g: 128,
                b: 0,
                a: 255
            })
        );
        assert_eq!(
            parse_hex_color("10203040"),
            Some(RgbaColor {
                r: 0x10,
                g: 0x20,
                b: 0x30,
                a: 0x40
            })
        );
        assert_eq!(parse_hex_color("#fff"), None);
        assert_eq!(parse_hex_color("not a color"), None);
    }

    #[test]
    fn resize_rejects_zero_dimensions() {
        let req = TransformRequest::Resize {
            width: 0,
            height: 100,
        };
        assert!(matches!(
            req.validate(),
            Err(crate::error::EngineError::Parameter(_))
        ));
    }

    #[test]
    fn brightness_contrast_bounds_are_enforced() {
        let ok = TransformRequest::BrightnessContrast {
            brightness: 200,
            contrast: 0,
        };
        assert!(ok.validate().is_ok());

        let too_bright = TransformRequest::BrightnessContrast {
            brightness: 201,
            contrast: 100,
        };
        assert!(too_bright.validate().is_err());
    }

    #[test]
    fn sharpen_intensity_domain() {
        assert!(TransformRequest::Sharpen { intensity: 0.0 }.validate().is_ok());
        assert!(TransformRequest::Sharpen { intensity: 2.0 }.validate().is_ok());
        assert!(TransformRequest::Sharpen { intensity: 2.1 }.validate().is_err());
        assert!(
            TransformRequest::Sharpen {
                intensity: f32::NAN
            }
            .validate()
            .is_err()
        );
    }

    #[test]
    fn watermark_spec_validation() {
        let mut spec = WatermarkSpec {
            text: "DRAFT".into(),
            ..WatermarkSpec::default()
        };
        assert!(spec.validate().is_ok());

        spec.opacity = 1.5;
        assert!(spec.validate().is_err());

        spec.opacity = 0.5;
        spec.color = "#zzzzzz".into();
        assert!(spec.validate().is_err());

        spec.color = "#ffffff".into();
        spec.text = "   ".into();
        assert!(spec.validate().is_err());
    }

    #[test]
    fn request_tags_serialize_kebab_case() {
        let req = TransformRequest::BrightnessContrast {
            brightness: 120,
            contrast: 80,
        };
        let json = serde_json::to_string(&req).unwrap();
        assert!(json.contains("\"op\":\"brightness-contrast\""), "json: {json}");

        let back: TransformRequest =
            serde_json::from_str("{\"op\":\"crop-center\"}").unwrap();
        assert_eq!(back.name(), "crop-center");
    }
}
