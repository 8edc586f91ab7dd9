// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Pixel transform library — grayscale, brightness/contrast remapping,
// convolution sharpening, low-pass blur, and watermark compositing.
// All operations are pure per-pixel or neighbourhood functions; alpha
// passes through untouched unless a transform explicitly composites it.

use font8x8::{BASIC_FONTS, UnicodeFonts};
use image::{Rgba, RgbaImage};
use imageproc::filter::gaussian_blur_f32;
use rasterwerk_core::types::{WatermarkAnchor, WatermarkSpec, parse_hex_color};
use tracing::{debug, info, instrument};

use super::Raster;

/// Sigma for the fixed-radius blur. Not part of any bit-exact contract.
const BLUR_SIGMA: f32 = 1.5;

impl Raster {
    /// Reduce each pixel to the unweighted arithmetic mean of its R, G, B
    /// channels (integer truncation); alpha unchanged.
    #[instrument(skip(self))]
    pub fn grayscale(self) -> Self {
        info!(width = self.width(), height = self.height(), "Converting to grayscale");

        let src = self.into_image();
        let gray = RgbaImage::from_fn(src.width(), src.height(), |x, y| {
            let Rgba([r, g, b, a]) = *src.get_pixel(x, y);
            let mean = ((r as u16 + g as u16 + b as u16) / 3) as u8;
            Rgba([mean, mean, mean, a])
        });
        Self::from_image(gray)
    }

    /// Remap brightness and contrast.
    ///
    /// Both inputs live in [0, 200] with 100 as the neutral point: brightness
    /// maps to an additive offset of (b - 100) * 1.28 and contrast to a
    /// multiplicative factor of c / 100. Contrast pivots around 128 first,
    /// then the brightness offset is added; the result saturates to [0, 255].
    /// The ordering is part of the contract.
    #[instrument(skip(self), fields(brightness, contrast))]
    pub fn brightness_contrast(self, brightness: u32, contrast: u32) -> Self {
        let offset = (brightness as f32 - 100.0) * 1.28;
        let factor = contrast as f32 / 100.0;
        info!(offset, factor, "Adjusting brightness/contrast");

        let src = self.into_image();
        let adjusted = RgbaImage::from_fn(src.width(), src.height(), |x, y| {
            let Rgba([r, g, b, a]) = *src.get_pixel(x, y);
            let remap = |channel: u8| -> u8 {
                let val = (channel as f32 - 128.0) * factor + 128.0 + offset;
                val.clamp(0.0, 255.0) as u8
            };
            Rgba([remap(r), remap(g), remap(b), a])
        });
        Self::from_image(adjusted)
    }

    /// Sharpen with a 3x3 convolution: center weight 1 + 4 * intensity, the
    /// four orthogonal neighbours -intensity, diagonals zero.
    ///
    /// Border pixels use a clipped kernel: taps outside the buffer are
    /// excluded from the weighted sum, with no reflection, wrapping, or
    /// renormalization. Alpha is copied from the source pixel. Output is
    /// bit-exact for a given input and intensity.
    #[instrument(skip(self), fields(intensity))]
    pub fn sharpen(self, intensity: f32) -> Self {
        info!(intensity, "Sharpening");

        let src = self.into_image();
        let (width, height) = src.dimensions();
        let center_weight = 1.0 + 4.0 * intensity;
        let neighbor_weight = -intensity;

        let mut output = RgbaImage::new(width, height);
        for y in 0..height {
            for x in 0..width {
                let Rgba([r, g, b, a]) = *src.get_pixel(x, y);
                let mut sums = [
                    r as f32 * center_weight,
                    g as f32 * center_weight,
                    b as f32 * center_weight,
                ];

                // Orthogonal taps only; out-of-bounds positions are skipped.
                let neighbors = [
                    (x as i64, y as i64 - 1),
                    (x as i64, y as i64 + 1),
                    (x as i64 - 1, y as i64),
                    (x as i64 + 1, y as i64),
                ];
                for (nx, ny) in neighbors {
                    if nx < 0 || ny < 0 || nx >= width as i64 || ny >= height as i64 {
                        continue;
                    }
                    let Rgba([nr, ng, nb, _]) = *src.get_pixel(nx as u32, ny as u32);
                    sums[0] += nr as f32 * neighbor_weight;
                    sums[1] += ng as f32 * neighbor_weight;
                    sums[2] += nb as f32 * neighbor_weight;
                }

                output.put_pixel(
                    x,
                    y,
                    Rgba([
                        sums[0].clamp(0.0, 255.0) as u8,
                        sums[1].clamp(0.0, 255.0) as u8,
                        sums[2].clamp(0.0, 255.0) as u8,
                        a,
                    ]),
                );
            }
        }
        Self::from_image(output)
    }

    /// Fixed-radius Gaussian low-pass smoothing. The kernel is an
    /// implementation choice; only visually-equivalent smoothing is promised.
    #[instrument(skip(self))]
    pub fn blur(self) -> Self {
        info!(sigma = BLUR_SIGMA, "Applying blur");
        let blurred = gaussian_blur_f32(self.as_image(), BLUR_SIGMA);
        Self::from_image(blurred)
    }

    /// Composite a translucent text overlay at the requested anchor.
    ///
    /// Corner anchors keep `padding` pixels from their nearest edges; the
    /// center anchor centers the text block on the buffer center. Glyphs come
    /// from a compact 8x8 bitmap font scaled to the requested pixel size, and
    /// are blended over existing pixels with the standard alpha-over operator.
    #[instrument(skip(self, spec), fields(anchor = ?spec.anchor, text_len = spec.text.len()))]
    pub fn watermark(self, spec: &WatermarkSpec, padding: u32) -> Self {
        let color = parse_hex_color(&spec.color).unwrap_or(rasterwerk_core::types::RgbaColor {
            r: 255,
            g: 255,
            b: 255,
            a: 255,
        });
        let alpha = ((spec.opacity * color.a as f32).clamp(0.0, 255.0)).round() as u8;
        let scale = (spec.font_size / 8).max(1);

        let (bitmap, text_w, text_h) = render_text_bitmap(&spec.text, scale);
        let mut canvas = self.into_image();
        let (img_w, img_h) = canvas.dimensions();

        let (origin_x, origin_y) =
            anchor_origin(spec.anchor, img_w, img_h, text_w, text_h, padding);
        debug!(origin_x, origin_y, text_w, text_h, "Watermark placed");

        if alpha > 0 {
            for (px, py) in bitmap.iter().copied() {
                let tx = origin_x + px;
                let ty = origin_y + py;
                if tx < 0 || ty < 0 || tx >= img_w as i32 || ty >= img_h as i32 {
                    continue;
                }
                let dst = canvas.get_pixel_mut(tx as u32, ty as u32);
                // Standard "over" alpha blending.
                let inv = 255u16 - alpha as u16;
                let blend = |dst_c: u8, src_c: u8| -> u8 {
                    (((dst_c as u16 * inv) + (src_c as u16 * alpha as u16)) / 255) as u8
                };
                let out_alpha = alpha as u16 + (dst[3] as u16 * inv + 127) / 255;
                *dst = Rgba([
                    blend(dst[0], color.r),
                    blend(dst[1], color.g),
                    blend(dst[2], color.b),
                    out_alpha.min(255) as u8,
                ]);
            }
        }

        Self::from_image(canvas)
    }
}

/// Resolve an anchor to the top-left corner of a text block of
/// (text_w, text_h) pixels inside a (img_w, img_h) buffer.
///
/// Corner anchors sit `padding` pixels from their nearest edge(s); the
/// center anchor centers the block so its midpoint lands on
/// (img_w / 2, img_h / 2).
pub fn anchor_origin(
    anchor: WatermarkAnchor,
    img_w: u32,
    img_h: u32,
    text_w: i32,
    text_h: i32,
    padding: u32,
) -> (i32, i32) {
    let pad = padding as i32;
    let img_w = img_w as i32;
    let img_h = img_h as i32;
    match anchor {
        WatermarkAnchor::TopLeft => (pad, pad),
        WatermarkAnchor::TopRight => (img_w - pad - text_w, pad),
        WatermarkAnchor::BottomLeft => (pad, img_h - pad - text_h),
        WatermarkAnchor::BottomRight => (img_w - pad - text_w, img_h - pad - text_h),
        WatermarkAnchor::Center => (img_w / 2 - text_w / 2, img_h / 2 - text_h / 2),
    }
}

/// Rasterize `text` into lit pixel offsets using the 8x8 bitmap font,
/// scaled up by `scale` with nearest-neighbour replication. Returns the
/// offsets plus the block's width and height.
fn render_text_bitmap(text: &str, scale: u32) -> (Vec<(i32, i32)>, i32, i32) {
    let glyph_gap = scale as i32;
    let mut cursor_x: i32 = 0;
    let mut pixels: Vec<(i32, i32)> = Vec::new();

    let total = text.chars().count();
    for (idx, ch) in text.chars().enumerate() {
        let glyph = BASIC_FONTS
            .get(ch)
            .or_else(|| BASIC_FONTS.get('?'))
            .unwrap_or_default();

        for (row, bits) in glyph.iter().enumerate() {
            for col in 0..8u32 {
                if (bits >> col) & 1 == 0 {
                    continue;
                }
                let base_x = cursor_x + (col * scale) as i32;
                let base_y = (row as u32 * scale) as i32;
                for dx in 0..scale as i32 {
                    for dy in 0..scale as i32 {
                        pixels.push((base_x + dx, base_y + dy));
                    }
                }
            }
        }

        cursor_x += (8 * scale) as i32 + glyph_gap;
        if idx + 1 == total {
            cursor_x -= glyph_gap;
        }
    }

    let width = cursor_x.max(1);
    let height = (8 * scale).max(1) as i32;
    (pixels, width, height)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gradient(width: u32, height: u32) -> Raster {
        Raster::from_fn(width, height, |x, y| {
            Rgba([
                ((x * 13 + y * 7) % 256) as u8,
                ((x * 5 + y * 11) % 256) as u8,
                ((x * 3 + y * 17) % 256) as u8,
                255,
            ])
        })
    }

    #[test]
    fn grayscale_uses_unweighted_mean() {
        let raster = Raster::from_fn(1, 1, |_, _| Rgba([10, 20, 40, 200]));
        let gray = raster.grayscale();
        // (10 + 20 + 40) / 3 = 23 (integer truncation).
        assert_eq!(gray.pixel(0, 0), Rgba([23, 23, 23, 200]));
    }

    #[test]
    fn grayscale_is_idempotent() {
        let once = gradient(16, 16).grayscale();
        let twice = once.clone().grayscale();
        assert_eq!(once, twice);
    }

    #[test]
    fn grayscale_preserves_length_invariant() {
        let gray = gradient(9, 4).grayscale();
        assert_eq!(gray.len(), 9 * 4 * 4);
    }

    #[test]
    fn neutral_brightness_contrast_is_identity() {
        let input = gradient(12, 12);
        let output = input.clone().brightness_contrast(100, 100);
        assert_eq!(input, output);
    }

    #[test]
    fn brightness_extremes_map_to_plus_minus_128() {
        let mid = Raster::from_fn(1, 1, |_, _| Rgba([128, 128, 128, 255]));
        // b=200 adds +128: 128 -> 255 (saturated).
        assert_eq!(
            mid.clone().brightness_contrast(200, 100).pixel(0, 0),
            Rgba([255, 255, 255, 255])
        );
        // b=0 subtracts 128: 128 -> 0.
        assert_eq!(
            mid.brightness_contrast(0, 100).pixel(0, 0),
            Rgba([0, 0, 0, 255])
        );
    }

    #[test]
    fn contrast_pivots_before_brightness() {
        // in=64, c=50 (factor 0.5), b=140 (offset +51.2):
        //   (64 - 128) * 0.5 + 128 + 51.2 = 147.2 -> 147.
        // Adding brightness before the contrast pivot would give 121 instead.
        let raster = Raster::from_fn(1, 1, |_, _| Rgba([64, 64, 64, 255]));
        let out = raster.brightness_contrast(140, 50);
        assert_eq!(out.pixel(0, 0), Rgba([147, 147, 147, 255]));
    }

    #[test]
    fn alpha_is_untouched_by_brightness_contrast() {
        let raster = Raster::from_fn(2, 2, |_, _| Rgba([10, 10, 10, 77]));
        let out = raster.brightness_contrast(180, 150);
        assert_eq!(out.pixel(1, 1)[3], 77);
    }

    #[test]
    fn sharpen_zero_intensity_is_identity() {
        let input = gradient(10, 10);
        let output = input.clone().sharpen(0.0);
        assert_eq!(input, output);
    }

    #[test]
    fn sharpen_uniform_interior_is_unchanged() {
        // On a constant image the kernel sums to the original value for
        // interior pixels: v*(1+4i) - 4*v*i = v.
        let flat = Raster::from_fn(5, 5, |_, _| Rgba([100, 100, 100, 255]));
        let out = flat.sharpen(1.0);
        assert_eq!(out.pixel(2, 2), Rgba([100, 100, 100, 255]));
    }

    #[test]
    fn sharpen_clipped_border_excludes_missing_taps() {
        // 1x1 buffer: no neighbours at all, so out = v*(1+4i), clamped.
        let single = Raster::from_fn(1, 1, |_, _| Rgba([50, 50, 50, 9]));
        let out = single.sharpen(1.0);
        // 50 * (1 + 4) = 250, alpha copied from source.
        assert_eq!(out.pixel(0, 0), Rgba([250, 250, 250, 9]));
    }

    #[test]
    fn sharpen_corner_has_two_taps() {
        // 2x2 constant buffer: each corner has exactly two in-bounds
        // neighbours, so out = v*(1+4i) - 2*v*i = v*(1+2i).
        let flat = Raster::from_fn(2, 2, |_, _| Rgba([40, 40, 40, 255]));
        let out = flat.sharpen(0.5);
        // 40 * (1 + 1) = 80.
        assert_eq!(out.pixel(0, 0), Rgba([80, 80, 80, 255]));
    }

    #[test]
    fn blur_smooths_but_keeps_dimensions() {
        let input = gradient(20, 20);
        let output = input.clone().blur();
        assert_eq!(output.width(), 20);
        assert_eq!(output.height(), 20);
        assert_eq!(output.len(), 20 * 20 * 4);
        assert_ne!(input, output);
    }

    #[test]
    fn center_anchor_centers_the_text_block() {
        // Whatever the buffer size, the block midpoint must land on
        // (width / 2, height / 2).
        for (w, h) in [(100u32, 60u32), (333, 77), (64, 64)] {
            let (x, y) = anchor_origin(WatermarkAnchor::Center, w, h, 40, 16, 20);
            assert_eq!(x + 20, w as i32 / 2);
            assert_eq!(y + 8, h as i32 / 2);
        }
    }

    #[test]
    fn corner_anchors_respect_padding() {
        let (x, y) = anchor_origin(WatermarkAnchor::TopLeft, 200, 100, 40, 16, 20);
        assert_eq!((x, y), (20, 20));

        let (x, y) = anchor_origin(WatermarkAnchor::BottomRight, 200, 100, 40, 16, 20);
        assert_eq!((x, y), (200 - 20 - 40, 100 - 20 - 16));

        let (x, y) = anchor_origin(WatermarkAnchor::TopRight, 200, 100, 40, 16, 20);
        assert_eq!((x, y), (140, 20));

        let (x, y) = anchor_origin(WatermarkAnchor::BottomLeft, 200, 100, 40, 16, 20);
        assert_eq!((x, y), (20, 64));
    }

    #[test]
    fn watermark_changes_pixels_and_keeps_dimensions() {
        let input = Raster::from_fn(120, 80, |_, _| Rgba([0, 0, 0, 255]));
        let spec = WatermarkSpec {
            text: "DRAFT".into(),
            anchor: WatermarkAnchor::Center,
            font_size: 16,
            opacity: 1.0,
            color: "#ffffff".into(),
        };
        let output = input.clone().watermark(&spec, 20);
        assert_eq!(output.width(), 120);
        assert_eq!(output.height(), 80);
        assert_ne!(input, output);
    }

    #[test]
    fn zero_opacity_watermark_is_a_no_op() {
        let input = gradient(40, 40);
        let spec = WatermarkSpec {
            text: "X".into(),
            opacity: 0.0,
            ..WatermarkSpec::default()
        };
        let output = input.clone().watermark(&spec, 20);
        assert_eq!(input, output);
    }
}
