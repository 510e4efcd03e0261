//! Error types for edit sessions and their collaborators.

use thiserror::Error;

use munipage_render::{EditError, UploadError};
use munipage_types::BlockId;

use crate::validate::Issue;

/// Errors that can occur during an edit session.
///
/// The session turns upload, save and validation failures into
/// notifications as well; the error is still returned so callers can react.
#[derive(Error, Debug)]
pub enum EditorError {
    /// Block not found in the page.
    #[error("block not found: {0:?}")]
    BlockNotFound(BlockId),

    /// Duplicate block ID.
    #[error("block already exists: {0:?}")]
    DuplicateBlock(BlockId),

    /// Save refused: the page has blocking issues.
    #[error("page has {} blocking issue(s)", .0.iter().filter(|i| i.is_blocking()).count())]
    Validation(Vec<Issue>),

    #[error("image upload failed: {0}")]
    Upload(UploadError),

    #[error(transparent)]
    Edit(EditError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("config error: {0}")]
    Config(String),
}

impl From<EditError> for EditorError {
    fn from(err: EditError) -> Self {
        match err {
            EditError::Upload(e) => EditorError::Upload(e),
            other => EditorError::Edit(other),
        }
    }
}

/// Errors from page stores and the featured-card mirror.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("store I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A stored document does not decode.
    #[error("stored document is malformed: {0}")]
    Decode(#[from] serde_json::Error),

    /// The page path cannot be mapped to a storage key.
    #[error("invalid page path: {0:?}")]
    InvalidPath(String),

    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// Result type for store operations.
pub type StoreResult<T> = std::result::Result<T, StoreError>;
