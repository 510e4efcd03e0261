//! Block schema for munipage navigation pages.
//!
//! This crate is the single source of truth for what a page can contain:
//! typed ids, the closed set of block variants, style overrides, and the page
//! record itself. It has **no internal munipage dependencies**: a pure leaf
//! crate the renderer and the editor build on.
//!
//! # Key Types
//!
//! |--------------------|----------------------------------------------------|
//! | Type               | Purpose                                            |
//! |--------------------|----------------------------------------------------|
//! | [`Block`]          | Tagged union over the seven variants (+ unknown)   |
//! | [`BlockKind`]      | The stored `type` tag                              |
//! | [`BlockId`]        | Stable block identity, assigned once at creation   |
//! | [`Width`]          | Declared grid width (`full` / `half`)              |
//! | [`BlockStyles`]    | Optional per-block style overrides                 |
//! | [`PageContent`]    | Stored page: metadata + ordered blocks             |
//! | [`FeaturedCard`]   | Mirrored featured-card payload                     |
//! |--------------------|----------------------------------------------------|

pub mod block;
pub mod error;
pub mod ids;
pub mod page;
pub mod style;

pub use block::{
    Block, BlockKind, Card, CardsGridBlock, CarouselBlock, CtaBlock, GalleryBlock, HeroBlock,
    ImageItem, RichTextBlock, SpacerBlock, UnknownBlock, non_empty,
};
pub use error::BlockError;
pub use ids::{BlockId, CardId};
pub use page::{FeaturedCard, PageContent, featured_cards};
pub use style::{
    BlockStyles, CarouselAnimation, EntranceAnimation, PaddingY, PageLayout, SizeTier, TextAlign,
    Theme, Width,
};

/// Result type for schema operations.
pub type Result<T> = std::result::Result<T, BlockError>;

/// Decode a stored block list.
///
/// Unknown entries are kept as [`Block::Unknown`]; see [`Block::from_value`].
pub fn decode_blocks(value: serde_json::Value) -> Result<Vec<Block>> {
    match value {
        serde_json::Value::Null => Ok(Vec::new()),
        serde_json::Value::Array(items) => items.into_iter().map(Block::from_value).collect(),
        _ => Err(BlockError::Untagged),
    }
}

/// Encode a block list to its stored JSON shape, preserving order.
pub fn encode_blocks(blocks: &[Block]) -> Result<serde_json::Value> {
    Ok(serde_json::to_value(blocks)?)
}
