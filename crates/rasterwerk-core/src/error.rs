// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Unified error types for Rasterwerk.

use thiserror::Error;

/// Top-level error type for all Rasterwerk operations.
#[derive(Debug, Error)]
pub enum EngineError {
    // -- Codec errors --
    #[error("decode failed: {0}")]
    Decode(String),

    #[error("encode failed: {0}")]
    Encode(String),

    // -- Request errors --
    #[error("invalid parameter: {0}")]
    Parameter(String),

    #[error("unsupported conversion: {from} to {to}")]
    UnsupportedConversion { from: String, to: String },

    // -- Document assembly --
    #[error("assembly failed at image {index}: {reason}")]
    Assembly { index: usize, reason: String },

    #[error("document writer error: {0}")]
    Document(String),

    // -- Vector sources --
    #[error("vector source error: {0}")]
    Vector(String),

    // -- Ambient --
    #[error("file I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl EngineError {
    /// The pipeline stage this error belongs to, for user-facing messages.
    pub fn stage(&self) -> &'static str {
        match self {
            Self::Decode(_) => "decode",
            Self::Encode(_) => "encode",
            Self::Parameter(_) | Self::UnsupportedConversion { .. } => "validate",
            Self::Assembly { .. } | Self::Document(_) => "assembly",
            Self::Vector(_) => "decode",
            Self::Io(_) | Self::Serialization(_) => "io",
        }
    }
}

/// Alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, EngineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn assembly_error_names_failing_index() {
        let err = EngineError::Assembly {
            index: 1,
            reason: "bad header".into(),
        };
        let msg = err.to_string();
        assert!(msg.contains("image 1"), "message was: {msg}");
        assert_eq!(err.stage(), "assembly");
    }

    #[test]
    fn stages_cover_the_pipeline() {
        assert_eq!(EngineError::Decode("x".into()).stage(), "decode");
        assert_eq!(EngineError::Encode("x".into()).stage(), "encode");
        assert_eq!(EngineError::Parameter("x".into()).stage(), "validate");
    }
}
