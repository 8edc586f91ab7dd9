// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Static conversion catalog: which (from, to) pairs the engine declares.
//
// The raster family entries are a generated cross product; everything that
// crosses a family boundary (image to PDF, SVG to anything, best-effort
// document substitutes) is hand-authored. Built once at first use; the
// constructor is duplicate-free by design and a test enforces it.

use std::sync::LazyLock;

use serde::{Deserialize, Serialize};

/// Pure format metadata: extension, media type, optional display label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormatDescriptor {
    pub extension: &'static str,
    pub media_type: &'static str,
    pub label: Option<&'static str>,
}

/// Whether a declared conversion is faithful or a best-effort substitute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Fidelity {
    /// The output is a true rendition of the input.
    Faithful,
    /// The output is a text or placeholder substitute; the result note
    /// must say so.
    BestEffort,
}

/// One declared (from, to) conversion pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConverterEntry {
    pub from: &'static str,
    pub to: &'static str,
    /// Accepted input media-type filter for file pickers.
    pub media_filter: &'static str,
    /// Whether the conversion accepts several inputs at once.
    pub allows_multiple: bool,
    pub fidelity: Fidelity,
}

/// Raster formats that participate in the intra-family cross product.
pub const RASTER_FAMILY: &[FormatDescriptor] = &[
    FormatDescriptor {
        extension: "png",
        media_type: "image/png",
        label: Some("PNG"),
    },
    FormatDescriptor {
        extension: "jpg",
        media_type: "image/jpeg",
        label: Some("JPG"),
    },
    FormatDescriptor {
        extension: "webp",
        media_type: "image/webp",
        label: Some("WebP"),
    },
    FormatDescriptor {
        extension: "gif",
        media_type: "image/gif",
        label: Some("GIF"),
    },
    FormatDescriptor {
        extension: "bmp",
        media_type: "image/bmp",
        label: Some("BMP"),
    },
    FormatDescriptor {
        extension: "tiff",
        media_type: "image/tiff",
        label: Some("TIFF"),
    },
];

/// Hand-authored cross-family entries.
const CROSS_FAMILY: &[ConverterEntry] = &[
    ConverterEntry {
        from: "svg",
        to: "png",
        media_filter: "image/svg+xml",
        allows_multiple: false,
        fidelity: Fidelity::Faithful,
    },
    ConverterEntry {
        from: "svg",
        to: "pdf",
        media_filter: "image/svg+xml",
        allows_multiple: false,
        fidelity: Fidelity::Faithful,
    },
    ConverterEntry {
        from: "txt",
        to: "pdf",
        media_filter: "text/plain",
        allows_multiple: false,
        fidelity: Fidelity::Faithful,
    },
    ConverterEntry {
        from: "docx",
        to: "pdf",
        media_filter: "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
        allows_multiple: false,
        fidelity: Fidelity::BestEffort,
    },
    ConverterEntry {
        from: "epub",
        to: "pdf",
        media_filter: "application/epub+zip",
        allows_multiple: false,
        fidelity: Fidelity::BestEffort,
    },
];

/// All declared conversions.
pub static CATALOG: LazyLock<Vec<ConverterEntry>> = LazyLock::new(build_catalog);

fn build_catalog() -> Vec<ConverterEntry> {
    let mut entries = Vec::new();

    // Raster family cross product, self-pairs excluded.
    for from in RASTER_FAMILY {
        for to in RASTER_FAMILY {
            if from.extension == to.extension {
                continue;
            }
            entries.push(ConverterEntry {
                from: from.extension,
                to: to.extension,
                media_filter: from.media_type,
                allows_multiple: false,
                fidelity: Fidelity::Faithful,
            });
        }
    }

    // Every raster format can be laid out onto document pages, one or many
    // images at a time.
    for from in RASTER_FAMILY {
        entries.push(ConverterEntry {
            from: from.extension,
            to: "pdf",
            media_filter: from.media_type,
            allows_multiple: true,
            fidelity: Fidelity::Faithful,
        });
    }

    entries.extend_from_slice(CROSS_FAMILY);
    entries
}

/// Normalize an extension to its catalog spelling.
fn canonical(ext: &str) -> String {
    let lower = ext.to_ascii_lowercase();
    match lower.as_str() {
        "jpeg" => "jpg".into(),
        "tif" => "tiff".into(),
        _ => lower,
    }
}

/// Look up the declared entry for a (from, to) pair, if any.
pub fn find_entry(from: &str, to: &str) -> Option<&'static ConverterEntry> {
    let from = canonical(from);
    let to = canonical(to);
    CATALOG
        .iter()
        .find(|entry| entry.from == from && entry.to == to)
}

/// Whether a (from, to) pair is declared at all.
pub fn is_supported(from: &str, to: &str) -> bool {
    find_entry(from, to).is_some()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn catalog_has_no_duplicate_pairs() {
        let mut seen = HashSet::new();
        for entry in CATALOG.iter() {
            assert!(
                seen.insert((entry.from, entry.to)),
                "duplicate catalog entry {} -> {}",
                entry.from,
                entry.to
            );
        }
    }

    #[test]
    fn raster_cross_product_excludes_self_pairs() {
        assert!(!is_supported("png", "png"));
        assert!(is_supported("png", "jpg"));
        assert!(is_supported("webp", "gif"));
    }

    #[test]
    fn extension_aliases_resolve() {
        assert!(is_supported("JPEG", "png"));
        assert!(is_supported("tif", "png"));
    }

    #[test]
    fn image_to_pdf_allows_multiple_inputs() {
        let entry = find_entry("jpg", "pdf").expect("jpg->pdf declared");
        assert!(entry.allows_multiple);
        assert_eq!(entry.fidelity, Fidelity::Faithful);
    }

    #[test]
    fn office_substitutes_are_flagged_best_effort() {
        let entry = find_entry("docx", "pdf").expect("docx->pdf declared");
        assert_eq!(entry.fidelity, Fidelity::BestEffort);
        assert!(find_entry("pdf", "pdf").is_none());
    }
}
