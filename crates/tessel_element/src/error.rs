//! Error types for tessel_element
//!
//! Only loading configuration and documents can fail. Interaction itself is
//! infallible: missing animation, unknown display modes and repeated
//! teardown are treated as no-ops.

use std::path::PathBuf;

use thiserror::Error;

/// Errors from loading element configuration or data
#[derive(Error, Debug)]
pub enum ElementError {
    /// Failed to read a file
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Malformed TOML configuration
    #[error("invalid configuration: {0}")]
    Config(#[from] toml::de::Error),

    /// Malformed JSON element data
    #[error("invalid element data: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type for tessel_element operations
pub type Result<T> = std::result::Result<T, ElementError>;
