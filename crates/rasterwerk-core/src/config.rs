// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Engine configuration.

use serde::{Deserialize, Serialize};

/// Tunable settings for the conversion engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Page size used by the document assembler.
    pub page_size: crate::PageSize,
    /// Quality factor in (0, 1] applied when encoding lossy formats.
    pub encode_quality: f32,
    /// Fixed quality factor used by the compress operation.
    pub compress_quality: f32,
    /// Edge padding in pixels for corner-anchored watermarks.
    pub watermark_padding: u32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            page_size: crate::PageSize::A4,
            encode_quality: 0.92,
            compress_quality: 0.6,
            watermark_padding: 20,
        }
    }
}
