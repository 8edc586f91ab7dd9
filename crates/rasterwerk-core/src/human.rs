// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Human-readable error messages. Every technical error is mapped to plain
// English with a clear suggestion so the UI layer never has to interpret
// error internals.

use crate::error::EngineError;

/// A human-readable error with plain English message and actionable suggestion.
#[derive(Debug, Clone)]
pub struct HumanMessage {
    /// Plain English summary (shown as a heading).
    pub message: String,
    /// What the user should try (shown as body text).
    pub suggestion: String,
}

/// Convert an [`EngineError`] into something a non-technical user can act on.
pub fn humanize_error(err: &EngineError) -> HumanMessage {
    match err {
        EngineError::Decode(detail) => HumanMessage {
            message: "We couldn't read this image.".into(),
            suggestion: format!(
                "The file may be damaged or in an unusual format. Try re-exporting it as PNG or JPG. ({detail})"
            ),
        },

        EngineError::Encode(detail) => HumanMessage {
            message: "We couldn't produce the requested format.".into(),
            suggestion: format!("Try a different output format. ({detail})"),
        },

        EngineError::Parameter(detail) => HumanMessage {
            message: "One of the settings is out of range.".into(),
            suggestion: format!("Adjust the highlighted value and try again. ({detail})"),
        },

        EngineError::UnsupportedConversion { from, to } => HumanMessage {
            message: format!("Converting {from} to {to} isn't supported."),
            suggestion: "Pick one of the conversions listed in the menu.".into(),
        },

        EngineError::Assembly { index, .. } => HumanMessage {
            message: format!("Image {} couldn't be added to the document.", index + 1),
            suggestion: "Remove or replace that image, then try again.".into(),
        },

        EngineError::Document(detail) => HumanMessage {
            message: "The document couldn't be written.".into(),
            suggestion: format!("Try again with fewer or smaller images. ({detail})"),
        },

        EngineError::Vector(detail) => HumanMessage {
            message: "This vector file couldn't be drawn.".into(),
            suggestion: format!(
                "Check that the file is valid SVG with a declared size. ({detail})"
            ),
        },

        EngineError::Io(detail) => HumanMessage {
            message: "A file couldn't be read or written.".into(),
            suggestion: format!("Check disk space and permissions. ({detail})"),
        },

        EngineError::Serialization(detail) => HumanMessage {
            message: "Settings couldn't be saved or loaded.".into(),
            suggestion: format!("Reset the settings to defaults. ({detail})"),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn assembly_message_uses_one_based_position() {
        let err = EngineError::Assembly {
            index: 1,
            reason: "truncated".into(),
        };
        let human = humanize_error(&err);
        assert!(human.message.contains("Image 2"), "was: {}", human.message);
    }

    #[test]
    fn unsupported_conversion_names_both_formats() {
        let err = EngineError::UnsupportedConversion {
            from: "pdf".into(),
            to: "docx".into(),
        };
        let human = humanize_error(&err);
        assert!(human.message.contains("pdf"));
        assert!(human.message.contains("docx"));
    }
}
