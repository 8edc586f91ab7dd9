// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// rasterwerk-engine — Image transformation and document assembly for Rasterwerk.
//
// Provides the in-memory raster buffer model with pixel and geometric
// transforms, a multi-format codec adapter (decode/encode), SVG
// rasterization, a multi-page document assembler, and the conversion
// orchestrator tying them together.
//
// Every conversion runs as a synchronous pure pipeline over buffers it
// exclusively owns; requests share no mutable state and may run
// concurrently from any number of threads.

pub mod codec;
pub mod convert;
pub mod page;
pub mod raster;

// Re-export the primary types so callers can use `rasterwerk_engine::Converter` etc.
pub use convert::{Converter, SourceInput};
pub use page::assembler::PageAssembler;
pub use page::layout::PageLayout;
pub use page::vector::rasterize_svg;
pub use raster::Raster;
