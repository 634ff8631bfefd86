//! Structured error types for the label-sheet engine.
//!
//! Configuration problems are fatal and detected before any page is
//! produced. Everything else (unbound placeholders, oversized QR payloads)
//! degrades gracefully and is reported through `tracing` instead.

use thiserror::Error;

/// The unified error type returned by all public API functions.
#[derive(Debug, Error)]
pub enum EtiquetaError {
    /// JSON input failed to deserialize into a sheet config.
    #[error("Failed to parse sheet config: {source}{hint}")]
    Parse {
        source: serde_json::Error,
        /// Pre-formatted hint line, empty when no hint applies.
        hint: String,
    },

    /// The sheet config cannot produce any layout. Rejected before
    /// composition starts; no partial output is ever emitted.
    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    /// PDF serialization failed.
    #[error("Render error: {0}")]
    Render(String),
}

impl From<serde_json::Error> for EtiquetaError {
    fn from(e: serde_json::Error) -> Self {
        let hint = match e.classify() {
            serde_json::error::Category::Syntax => {
                "\n  Hint: check for trailing commas, missing quotes, or unescaped characters."
            }
            serde_json::error::Category::Data => {
                "\n  Hint: the JSON is valid but doesn't match the sheet config schema. Check field names and types."
            }
            serde_json::error::Category::Eof => {
                "\n  Hint: unexpected end of input — is the JSON truncated?"
            }
            serde_json::error::Category::Io => "",
        };
        EtiquetaError::Parse {
            source: e,
            hint: hint.to_string(),
        }
    }
}
