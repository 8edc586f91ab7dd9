// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Vector sources — rasterizes SVG markup to an RGBA buffer so vector input
// can enter the same placement pipeline as raster images.

use image::RgbaImage;
use rasterwerk_core::error::{EngineError, Result};
use resvg::{tiny_skia, usvg};
use tracing::{debug, instrument};

use crate::raster::Raster;

/// Rasterize SVG markup at its declared dimensions.
///
/// The output size comes from the markup's explicit width/height attributes,
/// or is derived from the viewBox when those are absent (usvg resolves
/// both). The pixmap's premultiplied samples are demultiplied into straight
/// RGBA before the buffer is handed on.
#[instrument(skip(markup), fields(markup_len = markup.len()))]
pub fn rasterize_svg(markup: &str) -> Result<Raster> {
    let options = usvg::Options::default();
    let tree = usvg::Tree::from_str(markup, &options)
        .map_err(|err| EngineError::Vector(format!("failed to parse SVG: {err}")))?;

    let size = tree.size();
    let width = size.width().ceil() as u32;
    let height = size.height().ceil() as u32;
    if width == 0 || height == 0 {
        return Err(EngineError::Vector(format!(
            "SVG declares a degenerate size {width}x{height}"
        )));
    }
    debug!(width, height, "SVG dimensions resolved");

    let mut pixmap = tiny_skia::Pixmap::new(width, height).ok_or_else(|| {
        EngineError::Vector(format!("cannot allocate a {width}x{height} pixmap"))
    })?;
    resvg::render(&tree, tiny_skia::Transform::identity(), &mut pixmap.as_mut());

    let mut data = Vec::with_capacity((width * height * 4) as usize);
    for pixel in pixmap.pixels() {
        let color = pixel.demultiply();
        data.extend_from_slice(&[color.red(), color.green(), color.blue(), color.alpha()]);
    }

    let image = RgbaImage::from_raw(width, height, data)
        .ok_or_else(|| EngineError::Vector("pixmap length mismatch".into()))?;
    Ok(Raster::from_image(image))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_dimensions_set_the_buffer_size() {
        let markup = r##"<svg xmlns="http://www.w3.org/2000/svg" width="40" height="20">
            <rect width="40" height="20" fill="#ff0000"/>
        </svg>"##;
        let raster = rasterize_svg(markup).unwrap();
        assert_eq!((raster.width(), raster.height()), (40, 20));
        assert_eq!(raster.len(), 40 * 20 * 4);

        let px = raster.pixel(10, 10);
        assert_eq!((px[0], px[1], px[2]), (255, 0, 0));
    }

    #[test]
    fn view_box_drives_size_when_dimensions_are_absent() {
        let markup = r##"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 30 10">
            <rect width="30" height="10" fill="#0000ff"/>
        </svg>"##;
        let raster = rasterize_svg(markup).unwrap();
        assert_eq!((raster.width(), raster.height()), (30, 10));
    }

    #[test]
    fn malformed_markup_is_a_vector_error() {
        let err = rasterize_svg("<svg this is not xml").unwrap_err();
        assert!(matches!(err, EngineError::Vector(_)));
    }

    #[test]
    fn unpainted_regions_stay_transparent() {
        let markup = r##"<svg xmlns="http://www.w3.org/2000/svg" width="10" height="10">
            <rect x="0" y="0" width="5" height="10" fill="#00ff00"/>
        </svg>"##;
        let raster = rasterize_svg(markup).unwrap();
        assert_eq!(raster.pixel(8, 5)[3], 0);
        assert_eq!(raster.pixel(2, 5)[3], 255);
    }
}
