//! Error types for the block schema.

use thiserror::Error;

/// Errors that can occur while decoding or constructing blocks.
#[derive(Error, Debug)]
pub enum BlockError {
    /// An id was empty or whitespace.
    #[error("invalid {0}: must be a non-empty string")]
    InvalidId(&'static str),

    /// A block entry was not a JSON object, or had no string `type` tag.
    #[error("block entry is not a tagged object")]
    Untagged,

    /// A block with a known `type` tag failed to decode.
    #[error("malformed {kind} block: {source}")]
    Malformed {
        kind: &'static str,
        #[source]
        source: serde_json::Error,
    },

    /// Serialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
