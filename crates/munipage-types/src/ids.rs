//! Typed identifiers for blocks and cards.
//!
//! Stored pages carry ids as plain strings (historically `crypto.randomUUID()`
//! output), so both id types wrap a `String` and accept any non-empty text on
//! decode. Fresh ids are UUIDv7 rendered as hyphenated text. An id is assigned
//! once, when the block or card is created, and never reassigned; identity is
//! the only thing reordering operates on.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::BlockError;

/// A block identifier, unique within a page.
#[derive(Clone, Hash, Eq, PartialEq, Ord, PartialOrd, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct BlockId(String);

/// A card identifier, unique within a `cards_grid` block.
#[derive(Clone, Hash, Eq, PartialEq, Ord, PartialOrd, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CardId(String);

// ── Shared behavior ─────────────────────────────────────────────────────────

macro_rules! impl_typed_id {
    ($T:ident, $name:literal) => {
        impl $T {
            /// Create a new time-ordered ID (UUIDv7 text).
            pub fn new() -> Self {
                Self(uuid::Uuid::now_v7().to_string())
            }

            /// Wrap an existing id string. Empty strings are rejected.
            pub fn parse(s: impl Into<String>) -> Result<Self, BlockError> {
                let s = s.into();
                if s.trim().is_empty() {
                    return Err(BlockError::InvalidId($name));
                }
                Ok(Self(s))
            }

            /// The id text as stored.
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// First 8 characters, for human display only.
            pub fn short(&self) -> &str {
                let end = self
                    .0
                    .char_indices()
                    .nth(8)
                    .map(|(i, _)| i)
                    .unwrap_or(self.0.len());
                &self.0[..end]
            }
        }

        impl Default for $T {
            fn default() -> Self {
                Self::new()
            }
        }

        impl TryFrom<String> for $T {
            type Error = BlockError;

            fn try_from(s: String) -> Result<Self, Self::Error> {
                Self::parse(s)
            }
        }

        impl TryFrom<&str> for $T {
            type Error = BlockError;

            fn try_from(s: &str) -> Result<Self, Self::Error> {
                Self::parse(s)
            }
        }

        impl From<$T> for String {
            fn from(id: $T) -> String {
                id.0
            }
        }

        impl AsRef<str> for $T {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $T {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl fmt::Debug for $T {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", $name, self.short())
            }
        }
    };
}

impl_typed_id!(BlockId, "BlockId");
impl_typed_id!(CardId, "CardId");
