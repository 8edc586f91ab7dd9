// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Page layout — aspect-preserving scale and centering offsets placing one
// raster image on a fixed-size document page.

use rasterwerk_core::types::PageOrientation;

/// The computed placement of one image on one page, in points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageLayout {
    /// Page width in points.
    pub page_w: f32,
    /// Page height in points.
    pub page_h: f32,
    /// Uniform scale applied to the image.
    pub scale: f32,
    /// Horizontal offset of the image's lower-left corner.
    pub offset_x: f32,
    /// Vertical offset of the image's lower-left corner.
    pub offset_y: f32,
}

impl PageLayout {
    /// Fit an (img_w x img_h) image onto a (page_w x page_h) page.
    ///
    /// The scale is min(page_w / img_w, page_h / img_h) — the image fills
    /// the page along its limiting axis and is centered along the other.
    pub fn compute(page_w: f32, page_h: f32, img_w: f32, img_h: f32) -> Self {
        let scale = (page_w / img_w).min(page_h / img_h);
        let rendered_w = img_w * scale;
        let rendered_h = img_h * scale;
        Self {
            page_w,
            page_h,
            scale,
            offset_x: (page_w - rendered_w) / 2.0,
            offset_y: (page_h - rendered_h) / 2.0,
        }
    }

    /// Page orientation for a single-image document: landscape when the
    /// image is wider than tall, portrait otherwise.
    pub fn orientation_for(img_w: u32, img_h: u32) -> PageOrientation {
        if img_w > img_h {
            PageOrientation::Landscape
        } else {
            PageOrientation::Portrait
        }
    }
}
