// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Rasterwerk — Core types, errors, and the static conversion catalog shared
// across all crates.

pub mod catalog;
pub mod config;
pub mod error;
pub mod human;
pub mod types;

pub use config::EngineConfig;
pub use error::EngineError;
pub use types::*;
