//! Domain error types
//!
//! This module defines the error hierarchy for Layerport. All errors are
//! domain-specific and don't expose third-party types.
//!
//! Cancellation is modelled as an error variant so that it unwinds the
//! pipeline through the usual `?` paths, but callers must treat it as a
//! normal early-termination outcome rather than a failure.

use std::path::PathBuf;
use thiserror::Error;

/// Main Layerport error type
///
/// This is the primary error type used throughout the application.
/// It wraps specific error conditions and provides context for error handling.
#[derive(Debug, Error)]
pub enum LayerportError {
    /// Export was stopped by the user or the caller. Not a failure;
    /// already-exported items remain on disk.
    #[error("export cancelled")]
    Cancelled,

    /// An output directory could not be created
    #[error("invalid output directory \"{path}\" for '{item_name}': {message}")]
    InvalidOutputDirectory {
        /// Name of the item being exported when directory creation failed
        item_name: String,
        /// The path that could not be created
        path: PathBuf,
        /// Underlying failure reason
        message: String,
    },

    /// A configured procedure or constraint references an unresolvable function
    #[error("invalid procedure or constraint '{0}'")]
    InvalidProcedure(String),

    /// The export backend failed after exhausting the retry transitions
    #[error("export failed for '{item_name}' (file extension: {extension}): {message}")]
    ExportFailed {
        /// Name of the item that failed to export
        item_name: String,
        /// The file extension in effect for the failing attempt
        extension: String,
        /// Backend error message
        message: String,
    },

    /// A named entity (operation, subfilter, callable) was not found
    #[error("'{0}' not found")]
    NotFound(String),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Project manifest errors
    #[error("Manifest error: {0}")]
    Manifest(String),

    /// Execution engine errors (missing context, bad positions)
    #[error("Execution error: {0}")]
    Execution(String),

    /// Image host errors (unknown handles, failed primitives)
    #[error("Host error: {0}")]
    Host(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(String),
}

impl LayerportError {
    /// Returns `true` if this error represents a user cancellation rather
    /// than a failure.
    pub fn is_cancellation(&self) -> bool {
        matches!(self, LayerportError::Cancelled)
    }
}

// Conversion from std::io::Error
impl From<std::io::Error> for LayerportError {
    fn from(err: std::io::Error) -> Self {
        LayerportError::Io(err.to_string())
    }
}

// Conversion from serde_json::Error
impl From<serde_json::Error> for LayerportError {
    fn from(err: serde_json::Error) -> Self {
        LayerportError::Manifest(err.to_string())
    }
}

// Conversion from toml parse errors
impl From<toml::de::Error> for LayerportError {
    fn from(err: toml::de::Error) -> Self {
        LayerportError::Configuration(format!("TOML parse error: {err}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cancelled_display() {
        let err = LayerportError::Cancelled;
        assert_eq!(err.to_string(), "export cancelled");
        assert!(err.is_cancellation());
    }

    #[test]
    fn test_export_failed_display() {
        let err = LayerportError::ExportFailed {
            item_name: "background".to_string(),
            extension: "png".to_string(),
            message: "disk full".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "export failed for 'background' (file extension: png): disk full"
        );
        assert!(!err.is_cancellation());
    }

    #[test]
    fn test_invalid_output_directory_display() {
        let err = LayerportError::InvalidOutputDirectory {
            item_name: "group".to_string(),
            path: PathBuf::from("/nope/out"),
            message: "permission denied".to_string(),
        };
        assert!(err.to_string().contains("/nope/out"));
        assert!(err.to_string().contains("group"));
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "File not found");
        let err: LayerportError = io_err.into();
        assert!(matches!(err, LayerportError::Io(_)));
    }

    #[test]
    fn test_toml_error_conversion() {
        let toml_err = toml::from_str::<toml::Value>("invalid = toml = syntax").unwrap_err();
        let err: LayerportError = toml_err.into();
        assert!(matches!(err, LayerportError::Configuration(_)));
        assert!(err.to_string().contains("TOML parse error"));
    }

    #[test]
    fn test_error_implements_std_error() {
        let err = LayerportError::NotFound("op".to_string());
        let _: &dyn std::error::Error = &err;
    }
}
