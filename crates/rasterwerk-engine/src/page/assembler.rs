// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Document page assembler — lays decoded raster images out on fixed-size
// pages and drives `printpdf` 0.8 to serialise the result.
//
// printpdf 0.8 uses a data-oriented API: documents are built by constructing
// `PdfPage` structs containing `Vec<Op>` operation lists, then serialised via
// `PdfDocument::save()`.

use printpdf::{
    BuiltinFont, Mm, Op, PdfDocument, PdfPage, PdfSaveOptions, PdfWarnMsg, Point, Pt, RawImage,
    RawImageData, RawImageFormat, TextItem, XObjectTransform,
};
use rasterwerk_core::error::{EngineError, Result};
use rasterwerk_core::types::{PageOrientation, PageSize};
use tracing::{debug, info, instrument};

use crate::codec;
use crate::page::layout::PageLayout;
use crate::raster::Raster;

/// Images are embedded at 72 dpi so one pixel maps to one point and the
/// layout math stays 1:1.
const IMAGE_DPI: f32 = 72.0;

/// Assembles raster content into single- or multi-page documents.
pub struct PageAssembler {
    /// Page size for all produced pages.
    page_size: PageSize,
    /// Title metadata embedded in the document.
    title: Option<String>,
}

impl PageAssembler {
    /// Create an assembler targeting the given page size.
    pub fn new(page_size: PageSize) -> Self {
        Self {
            page_size,
            title: None,
        }
    }

    /// Create an assembler defaulting to A4.
    pub fn a4() -> Self {
        Self::new(PageSize::A4)
    }

    /// Set a title for the document metadata.
    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = Some(title.into());
    }

    fn title(&self) -> &str {
        self.title.as_deref().unwrap_or("Rasterwerk Document")
    }

    /// Page dimensions in printpdf's Mm units.
    fn page_dimensions(&self, orientation: PageOrientation) -> (Mm, Mm) {
        let (w_mm, h_mm) = self.page_size.oriented_mm(orientation);
        (Mm(w_mm as f32), Mm(h_mm as f32))
    }

    // -- Multi-image documents ------------------------------------------------

    /// Assemble one page per input image, in input order.
    ///
    /// Every page is portrait regardless of individual image proportions, so
    /// multi-page output stays uniform. An empty input produces a zero-page
    /// document. A decode failure at any index aborts the whole assembly and
    /// reports that index; no document bytes are returned.
    #[instrument(skip(self, images), fields(count = images.len()))]
    pub fn assemble_images(&self, images: &[&[u8]]) -> Result<Vec<u8>> {
        let doc = self.build_multi_page(images)?;
        debug!(pages = doc.pages.len(), "Assembly complete");
        Ok(save_document(doc))
    }

    fn build_multi_page(&self, images: &[&[u8]]) -> Result<PdfDocument> {
        let (page_w, page_h) = self.page_dimensions(PageOrientation::Portrait);
        info!(paper = ?self.page_size, count = images.len(), "Assembling document");

        let mut doc = PdfDocument::new(self.title());
        let mut pages: Vec<PdfPage> = Vec::new();

        // Each image is fully decoded and placed before the next one is
        // considered; page N+1 depends on page N being finalised.
        for (index, bytes) in images.iter().enumerate() {
            let raster = codec::decode(bytes).map_err(|err| EngineError::Assembly {
                index,
                reason: err.to_string(),
            })?;
            let ops = place_raster(&mut doc, &raster, page_w, page_h);
            pages.push(PdfPage::new(page_w, page_h, ops));
        }

        doc.with_pages(pages);
        Ok(doc)
    }

    // -- Single-image documents -----------------------------------------------

    /// Create a single-page document from encoded image bytes.
    ///
    /// Page orientation follows the image: landscape when it is wider than
    /// tall, portrait otherwise.
    #[instrument(skip(self, bytes), fields(bytes_len = bytes.len()))]
    pub fn single_image(&self, bytes: &[u8]) -> Result<Vec<u8>> {
        let raster = codec::decode(bytes)?;
        Ok(self.single_raster(&raster))
    }

    /// Create a single-page document from an already-decoded raster.
    #[instrument(skip(self, raster), fields(width = raster.width(), height = raster.height()))]
    pub fn single_raster(&self, raster: &Raster) -> Vec<u8> {
        let orientation = PageLayout::orientation_for(raster.width(), raster.height());
        let (page_w, page_h) = self.page_dimensions(orientation);
        info!(paper = ?self.page_size, ?orientation, "Placing single image");

        let mut doc = PdfDocument::new(self.title());
        let ops = place_raster(&mut doc, raster, page_w, page_h);
        doc.with_pages(vec![PdfPage::new(page_w, page_h, ops)]);
        save_document(doc)
    }

    // -- Text documents -------------------------------------------------------

    /// Create a document from plain text content.
    ///
    /// The text is laid out top-to-bottom in the built-in Helvetica font;
    /// long lines wrap at an estimated character width and pages break
    /// automatically. Used for txt conversions and best-effort substitutes.
    #[instrument(skip(self, text), fields(text_len = text.len()))]
    pub fn text_document(&self, text: &str) -> Vec<u8> {
        let (page_w, page_h) = self.page_dimensions(PageOrientation::Portrait);
        info!(paper = ?self.page_size, "Creating text document");

        let font_size_pt: f32 = 11.0;
        let line_height_pt: f32 = 14.0;
        let margin_mm: f32 = 20.0;
        let margin_pt: f32 = Mm(margin_mm).into_pt().0;
        let usable_width_mm = page_w.0 - 2.0 * margin_mm;

        // Approximate characters per line for Helvetica at 11pt: average
        // glyph width is roughly 0.50 * font size in pt (1pt = 0.3528mm).
        let avg_char_width_mm: f32 = 0.50 * font_size_pt * 0.3528;
        let max_chars_per_line = (usable_width_mm / avg_char_width_mm) as usize;

        let wrapped_lines = wrap_text(text, max_chars_per_line);
        let page_h_pt = page_h.into_pt().0;
        let usable_height_pt = page_h_pt - 2.0 * margin_pt;
        let lines_per_page = (usable_height_pt / line_height_pt) as usize;

        let mut doc = PdfDocument::new(self.title());
        let mut pages: Vec<PdfPage> = Vec::new();

        let mut line_iter = wrapped_lines.iter().peekable();
        while line_iter.peek().is_some() {
            let mut ops: Vec<Op> = Vec::new();

            let mut line_idx: usize = 0;
            while line_idx < lines_per_page {
                let line = match line_iter.next() {
                    Some(l) => l,
                    None => break,
                };

                let y_pt = page_h_pt - margin_pt - (line_idx as f32 * line_height_pt);

                ops.push(Op::StartTextSection);
                ops.push(Op::SetTextCursor {
                    pos: Point {
                        x: Pt(margin_pt),
                        y: Pt(y_pt),
                    },
                });
                ops.push(Op::SetFontSizeBuiltinFont {
                    size: Pt(font_size_pt),
                    font: BuiltinFont::Helvetica,
                });
                ops.push(Op::WriteTextBuiltinFont {
                    items: vec![TextItem::Text(line.clone())],
                    font: BuiltinFont::Helvetica,
                });
                ops.push(Op::EndTextSection);

                line_idx += 1;
            }

            pages.push(PdfPage::new(page_w, page_h, ops));
        }

        // No lines at all still yields one blank page.
        if pages.is_empty() {
            pages.push(PdfPage::new(page_w, page_h, Vec::new()));
        }

        doc.with_pages(pages);
        debug!(total_lines = wrapped_lines.len(), "Text layout complete");
        save_document(doc)
    }
}

/// Register a raster as a document image and emit the placement op for it.
///
/// The image fills its page along the limiting axis and is centered along
/// the other, per [`PageLayout::compute`].
fn place_raster(doc: &mut PdfDocument, raster: &Raster, page_w: Mm, page_h: Mm) -> Vec<Op> {
    // Document images carry no alpha; composite onto white first.
    let rgb = codec::flatten_onto_white(raster.as_image());
    let raw = RawImage {
        pixels: RawImageData::U8(rgb.into_raw()),
        width: raster.width() as usize,
        height: raster.height() as usize,
        data_format: RawImageFormat::RGB8,
        tag: Vec::new(),
    };
    let xobject_id = doc.add_image(&raw);

    let layout = PageLayout::compute(
        page_w.into_pt().0,
        page_h.into_pt().0,
        raster.width() as f32,
        raster.height() as f32,
    );
    debug!(scale = layout.scale, x = layout.offset_x, y = layout.offset_y, "Image placed");

    vec![Op::UseXobject {
        id: xobject_id,
        transform: XObjectTransform {
            translate_x: Some(Pt(layout.offset_x)),
            translate_y: Some(Pt(layout.offset_y)),
            scale_x: Some(layout.scale),
            scale_y: Some(layout.scale),
            dpi: Some(IMAGE_DPI),
            rotate: None,
        },
    }]
}

fn save_document(doc: PdfDocument) -> Vec<u8> {
    let mut warnings: Vec<PdfWarnMsg> = Vec::new();
    doc.save(&PdfSaveOptions::default(), &mut warnings)
}

// -- Text wrapping helper -----------------------------------------------------

/// Wrap a multi-line string so that no line exceeds `max_width` characters.
///
/// Splits on existing newlines first, then performs simple word-wrap within
/// each paragraph. Words longer than `max_width` are force-broken.
fn wrap_text(text: &str, max_width: usize) -> Vec<String> {
    let mut result = Vec::new();

    for paragraph in text.split('\n') {
        if paragraph.is_empty() {
            result.push(String::new());
            continue;
        }

        let words: Vec<&str> = paragraph.split_whitespace().collect();
        if words.is_empty() {
            result.push(String::new());
            continue;
        }

        let mut current_line = String::with_capacity(max_width);

        for word in words {
            if word.len() > max_width {
                if !current_line.is_empty() {
                    result.push(current_line.clone());
                    current_line.clear();
                }
                let mut remaining = word;
                while remaining.len() > max_width {
                    let (chunk, rest) = remaining.split_at(max_width);
                    result.push(chunk.to_string());
                    remaining = rest;
                }
                if !remaining.is_empty() {
                    current_line.push_str(remaining);
                }
            } else if current_line.is_empty() {
                current_line.push_str(word);
            } else if current_line.len() + 1 + word.len() <= max_width {
                current_line.push(' ');
                current_line.push_str(word);
            } else {
                result.push(current_line.clone());
                current_line.clear();
                current_line.push_str(word);
            }
        }

        if !current_line.is_empty() {
            result.push(current_line);
        }
    }

    result
}
