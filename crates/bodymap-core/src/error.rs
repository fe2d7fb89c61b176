//! Error types for the body map core.

use thiserror::Error;

/// Result type alias for body map operations.
pub type BodyMapResult<T> = Result<T, BodyMapError>;

/// Errors raised while building a diagram or writing the annotation store.
///
/// User actions on the [`Controller`](crate::Controller) never surface these;
/// they report a [`Status`](crate::Status) instead.
#[derive(Debug, Error)]
pub enum BodyMapError {
    /// Region geometry could not be parsed.
    #[error("invalid path data for region {region}: {message}")]
    InvalidPath { region: String, message: String },

    /// Two regions in one diagram share an identifier.
    #[error("duplicate region id: {id}")]
    DuplicateRegion { id: String },

    /// A region references a structure key missing from the dictionary.
    #[error("region {region} references unknown structure {structure}")]
    UnknownStructure { region: String, structure: String },

    /// JSON serialization/deserialization error.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O error (file operations).
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
}

impl BodyMapError {
    /// Create a path data error for the given region.
    pub fn invalid_path(region: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidPath {
            region: region.into(),
            message: message.into(),
        }
    }
}
