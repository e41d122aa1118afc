//! Unified fatal error types for the scrgen workspace.
//!
//! Only a malformed header is fatal to a compilation run; everything else is
//! accumulated as a [`crate::diagnostics::Diagnostic`] and returned alongside
//! whatever output was produced.

use std::path::PathBuf;

use thiserror::Error;

/// Top-level error type shared across the workspace.
#[derive(Debug, Error)]
pub enum ScrError {
    /// The Service-Component header is syntactically malformed.
    ///
    /// Aborts the whole run with no output; there is no partial recovery
    /// at the parsing stage.
    #[error("invalid Service-Component header: {message}")]
    Parse {
        /// Description of the syntax error.
        message: String,
    },

    /// An I/O operation failed.
    #[error("I/O error at {}: {source}", path.display())]
    Io {
        /// Path where the I/O error occurred.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// Serialization or deserialization failed.
    #[error("serialization error: {source}")]
    Serialization {
        /// Underlying serialization error.
        #[from]
        source: serde_json::Error,
    },
}

/// Convenience alias used throughout the workspace.
pub type Result<T> = std::result::Result<T, ScrError>;
