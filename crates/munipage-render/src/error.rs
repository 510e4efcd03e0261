//! Error types for edit actions and rendering.

use thiserror::Error;

use crate::edit::UploadError;

/// Errors from applying an edit action to a block.
///
/// None of these change the block: edits are applied to a copy.
#[derive(Error, Debug)]
pub enum EditError {
    /// The field does not exist on this block kind.
    #[error("field `{field}` does not apply to a {kind} block")]
    FieldMismatch { field: String, kind: String },

    /// The action does not apply to this block kind.
    #[error("action `{action}` does not apply to a {kind} block")]
    UnsupportedAction { action: &'static str, kind: String },

    #[error("upload slot `{slot}` does not exist on a {kind} block")]
    SlotMismatch { slot: String, kind: String },

    #[error("index {index} out of range for list of length {len}")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("invalid value {value:?} for field `{field}`")]
    InvalidValue { field: String, value: String },

    #[error(transparent)]
    Upload(#[from] UploadError),
}

/// Errors from rendering a stored page.
#[derive(Error, Debug)]
pub enum RenderError {
    /// The page JSON does not decode (including malformed known blocks).
    #[error("page decode failed: {0}")]
    Decode(#[source] serde_json::Error),

    #[error("layout summary serialization failed: {0}")]
    Summary(#[source] serde_json::Error),
}
