// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Geometric transform library — whole-buffer reshaping: resize, rotate 90°,
// flip, mirror, and center-crop.

use image::imageops::{self, FilterType};
use rasterwerk_core::types::MirrorAxis;
use tracing::{info, instrument};

use super::Raster;

impl Raster {
    /// Resample to exactly (width, height) with bilinear filtering.
    ///
    /// No aspect-ratio enforcement; stretching is the caller's choice.
    #[instrument(skip(self), fields(width, height))]
    pub fn resize(self, width: u32, height: u32) -> Self {
        info!(
            from_w = self.width(),
            from_h = self.height(),
            width,
            height,
            "Resizing"
        );
        let resized = imageops::resize(self.as_image(), width, height, FilterType::Triangle);
        Self::from_image(resized)
    }

    /// Rotate 90° clockwise; output dimensions are (height, width).
    #[instrument(skip(self))]
    pub fn rotate90(self) -> Self {
        Self::from_image(imageops::rotate90(self.as_image()))
    }

    /// Horizontal mirror: column x maps to column (width - 1 - x).
    #[instrument(skip(self))]
    pub fn flip(self) -> Self {
        Self::from_image(imageops::flip_horizontal(self.as_image()))
    }

    /// Mirror about an axis. The horizontal axis behaves exactly like
    /// [`Raster::flip`]; the vertical axis reflects rows instead.
    #[instrument(skip(self), fields(axis = ?axis))]
    pub fn mirror(self, axis: MirrorAxis) -> Self {
        match axis {
            MirrorAxis::Horizontal => self.flip(),
            MirrorAxis::Vertical => Self::from_image(imageops::flip_vertical(self.as_image())),
        }
    }

    /// Crop to the largest centered square of side min(width, height),
    /// with the offset floored on both axes.
    #[instrument(skip(self))]
    pub fn crop_center(self) -> Self {
        let (width, height) = (self.width(), self.height());
        let side = width.min(height);
        let x = (width - side) / 2;
        let y = (height - side) / 2;
        info!(side, x, y, "Cropping to centered square");
        let cropped = imageops::crop_imm(self.as_image(), x, y, side, side).to_image();
        Self::from_image(cropped)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    fn gradient(width: u32, height: u32) -> Raster {
        Raster::from_fn(width, height, |x, y| {
            Rgba([
                ((x * 31 + y) % 256) as u8,
                ((y * 29 + x) % 256) as u8,
                ((x + y * 3) % 256) as u8,
                255,
            ])
        })
    }

    #[test]
    fn resize_hits_exact_target_dimensions() {
        let out = gradient(10, 20).resize(37, 5);
        assert_eq!((out.width(), out.height()), (37, 5));
        assert_eq!(out.len(), 37 * 5 * 4);
    }

    #[test]
    fn rotate90_swaps_dimensions() {
        let out = gradient(10, 6).rotate90();
        assert_eq!((out.width(), out.height()), (6, 10));
    }

    #[test]
    fn rotate90_four_times_is_identity() {
        let input = gradient(8, 5);
        let out = input.clone().rotate90().rotate90().rotate90().rotate90();
        assert_eq!(input, out);
    }

    #[test]
    fn rotate90_moves_top_left_to_top_right() {
        // Clockwise: source (0, 0) lands at (height - 1, 0).
        let input = gradient(4, 3);
        let marker = input.pixel(0, 0);
        let out = input.rotate90();
        assert_eq!(out.pixel(2, 0), marker);
    }

    #[test]
    fn flip_reflects_columns() {
        let input = gradient(5, 4);
        let out = input.clone().flip();
        for y in 0..4 {
            for x in 0..5 {
                assert_eq!(out.pixel(x, y), input.pixel(4 - x, y));
            }
        }
    }

    #[test]
    fn flip_equals_horizontal_mirror() {
        let input = gradient(7, 7);
        assert_eq!(
            input.clone().flip(),
            input.mirror(MirrorAxis::Horizontal)
        );
    }

    #[test]
    fn mirror_twice_is_identity() {
        let input = gradient(6, 9);
        assert_eq!(
            input.clone(),
            input
                .clone()
                .mirror(MirrorAxis::Vertical)
                .mirror(MirrorAxis::Vertical)
        );
        assert_eq!(input.clone(), input.clone().flip().flip());
    }

    #[test]
    fn vertical_mirror_reflects_rows() {
        let input = gradient(3, 5);
        let out = input.clone().mirror(MirrorAxis::Vertical);
        for y in 0..5 {
            for x in 0..3 {
                assert_eq!(out.pixel(x, y), input.pixel(x, 4 - y));
            }
        }
    }

    #[test]
    fn crop_center_on_10x6_gives_6x6_at_offset_2_0() {
        let input = gradient(10, 6);
        let out = input.clone().crop_center();
        assert_eq!((out.width(), out.height()), (6, 6));
        // Offset is ((10 - 6) / 2, (6 - 6) / 2) = (2, 0).
        assert_eq!(out.pixel(0, 0), input.pixel(2, 0));
        assert_eq!(out.pixel(5, 5), input.pixel(7, 5));
    }

    #[test]
    fn crop_center_floors_odd_offsets() {
        let input = gradient(7, 4);
        let out = input.clone().crop_center();
        assert_eq!((out.width(), out.height()), (4, 4));
        // (7 - 4) / 2 floors to 1.
        assert_eq!(out.pixel(0, 0), input.pixel(1, 0));
    }
}
