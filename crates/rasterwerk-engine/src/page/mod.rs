// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Document page assembly — layout computation, multi-page placement, and
// vector-source rasterization.

pub mod assembler;
pub mod layout;
pub mod vector;

pub use assembler::PageAssembler;
pub use layout::PageLayout;
