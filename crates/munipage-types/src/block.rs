//! Block variants and the tagged block union.
//!
//! A page is an ordered `Vec<Block>`; the vector order *is* the display order.
//! Each variant is a plain struct carrying its own `id`, and [`Block`] is the
//! closed union over them keyed by the stored `type` tag.
//!
//! ## Forward compatibility
//!
//! Entries whose `type` is not one of the seven known tags decode into
//! [`Block::Unknown`], which keeps the raw JSON so a load → save cycle writes it
//! back untouched. Renderers skip unknown blocks; nothing errors on them.
//!
//! ## Wire shape
//!
//! Field names are camelCase (`imageUrl`, `ctaLabel`, `buttonText`, …) and the
//! tag values are `hero`, `richText`, `gallery`, `carousel`, `cards_grid`,
//! `cta`, `spacer`, matching pages already in the document store.

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use strum::EnumString;

use crate::error::BlockError;
use crate::ids::{BlockId, CardId};
use crate::style::{BlockStyles, CarouselAnimation, SizeTier, Width};

/// What a block *is*: the stored `type` tag.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, EnumString)]
#[strum(ascii_case_insensitive)]
pub enum BlockKind {
    #[serde(rename = "hero")]
    #[strum(serialize = "hero")]
    Hero,
    #[serde(rename = "richText")]
    #[strum(serialize = "richText", serialize = "rich_text", serialize = "text")]
    RichText,
    #[serde(rename = "gallery")]
    #[strum(serialize = "gallery")]
    Gallery,
    #[serde(rename = "carousel")]
    #[strum(serialize = "carousel")]
    Carousel,
    #[serde(rename = "cards_grid")]
    #[strum(serialize = "cards_grid", serialize = "cardsGrid", serialize = "cards")]
    CardsGrid,
    #[serde(rename = "cta")]
    #[strum(serialize = "cta")]
    Cta,
    #[serde(rename = "spacer")]
    #[strum(serialize = "spacer")]
    Spacer,
}

impl BlockKind {
    pub const ALL: [BlockKind; 7] = [
        BlockKind::Hero,
        BlockKind::RichText,
        BlockKind::Gallery,
        BlockKind::Carousel,
        BlockKind::CardsGrid,
        BlockKind::Cta,
        BlockKind::Spacer,
    ];

    /// Parse from string (case-insensitive, accepts a few aliases).
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Self> {
        <Self as FromStr>::from_str(s).ok()
    }

    /// Exact stored tag. Unlike [`BlockKind::from_str`] this does not accept aliases.
    pub fn from_tag(tag: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.as_str() == tag)
    }

    /// The stored `type` tag.
    pub fn as_str(&self) -> &'static str {
        match self {
            BlockKind::Hero => "hero",
            BlockKind::RichText => "richText",
            BlockKind::Gallery => "gallery",
            BlockKind::Carousel => "carousel",
            BlockKind::CardsGrid => "cards_grid",
            BlockKind::Cta => "cta",
            BlockKind::Spacer => "spacer",
        }
    }

    /// Whether the block's width is user-settable.
    pub fn has_width(&self) -> bool {
        !matches!(self, BlockKind::Hero)
    }
}

impl std::fmt::Display for BlockKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Helper for `#[serde(skip_serializing_if)]` on bool fields.
fn is_false(v: &bool) -> bool {
    !v
}

/// Full-width banner with optional background image and call to action.
///
/// Has no width field: a hero always spans the full grid. A stored `width`
/// is ignored on decode.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HeroBlock {
    pub id: BlockId,
    #[serde(default)]
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subtitle: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cta_label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cta_href: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub styles: Option<BlockStyles>,
}

impl HeroBlock {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            id: BlockId::new(),
            title: title.into(),
            subtitle: None,
            image_url: None,
            cta_label: None,
            cta_href: None,
            styles: None,
        }
    }

    /// The call-to-action pair, only when both halves are non-empty.
    pub fn cta(&self) -> Option<(&str, &str)> {
        let label = non_empty(self.cta_label.as_deref())?;
        let href = non_empty(self.cta_href.as_deref())?;
        Some((label, href))
    }
}

/// HTML fragment edited through the rich-text toolbar.
///
/// The HTML is sanitized upstream before persistence; renderers inject it
/// verbatim.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RichTextBlock {
    pub id: BlockId,
    #[serde(default)]
    pub html: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<Width>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub styles: Option<BlockStyles>,
}

impl RichTextBlock {
    pub fn new(html: impl Into<String>) -> Self {
        Self {
            id: BlockId::new(),
            html: html.into(),
            width: None,
            styles: None,
        }
    }
}

/// One image in a gallery or carousel.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageItem {
    #[serde(default)]
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub caption: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<SizeTier>,
}

impl ImageItem {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            caption: None,
            size: None,
        }
    }

    pub fn with_size(mut self, size: SizeTier) -> Self {
        self.size = Some(size);
        self
    }

    pub fn with_caption(mut self, caption: impl Into<String>) -> Self {
        self.caption = Some(caption.into());
        self
    }
}

/// Grid of images with per-image size tiers.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GalleryBlock {
    pub id: BlockId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default)]
    pub images: Vec<ImageItem>,
    /// Stored column count. May be out of range in old data; clamp before use.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub columns: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<Width>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub styles: Option<BlockStyles>,
}

/// Horizontally scrolling image strip.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CarouselBlock {
    pub id: BlockId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default)]
    pub images: Vec<ImageItem>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub animation: Option<CarouselAnimation>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<SizeTier>,
    #[serde(default, skip_serializing_if = "is_false")]
    pub autoplay: bool,
    /// Autoplay interval in milliseconds. Only meaningful when `autoplay` is set.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interval: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<Width>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub styles: Option<BlockStyles>,
}

/// One card in a `cards_grid` block.
///
/// The modal fields are persisted with the card; the "Leer más" overlay reads
/// them directly and falls back to the primary fields when they are empty.
/// This is also the payload mirrored into the featured-cards collection.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Card {
    #[serde(default)]
    pub id: CardId,
    #[serde(default)]
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub button_text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub modal_title: Option<String>,
    /// Modal body HTML (sanitized upstream, like rich text).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub modal_content: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub modal_images: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title_font: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub desc_font: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title_size: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub desc_size: Option<String>,
    #[serde(default, skip_serializing_if = "is_false")]
    pub featured: bool,
}

impl Card {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            id: CardId::new(),
            title: title.into(),
            description: None,
            image_url: None,
            button_text: None,
            modal_title: None,
            modal_content: None,
            modal_images: Vec::new(),
            title_font: None,
            desc_font: None,
            title_size: None,
            desc_size: None,
            featured: false,
        }
    }

    /// Modal title, falling back to the card title.
    pub fn effective_modal_title(&self) -> &str {
        non_empty(self.modal_title.as_deref()).unwrap_or(&self.title)
    }

    /// Modal body, falling back to the card description.
    pub fn effective_modal_body(&self) -> Option<&str> {
        non_empty(self.modal_content.as_deref()).or_else(|| non_empty(self.description.as_deref()))
    }

    /// Modal images, falling back to the card image.
    pub fn effective_modal_images(&self) -> Vec<&str> {
        let extra: Vec<&str> = self
            .modal_images
            .iter()
            .map(String::as_str)
            .filter(|u| !u.trim().is_empty())
            .collect();
        if !extra.is_empty() {
            return extra;
        }
        non_empty(self.image_url.as_deref()).into_iter().collect()
    }
}

/// Grid of cards, each with a "Leer más" modal.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CardsGridBlock {
    pub id: BlockId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Stored column count. May be out of range in old data; clamp before use.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub columns: Option<i64>,
    #[serde(default)]
    pub cards: Vec<Card>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<Width>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub styles: Option<BlockStyles>,
}

impl CardsGridBlock {
    pub fn card(&self, id: &CardId) -> Option<&Card> {
        self.cards.iter().find(|c| &c.id == id)
    }
}

/// Call-to-action strip.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CtaBlock {
    pub id: BlockId,
    #[serde(default)]
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub href: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<Width>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub styles: Option<BlockStyles>,
}

impl CtaBlock {
    /// The button pair, only when both halves are non-empty.
    pub fn button(&self) -> Option<(&str, &str)> {
        let label = non_empty(self.label.as_deref())?;
        let href = non_empty(self.href.as_deref())?;
        Some((label, href))
    }
}

/// Empty cell used for grid-gap control.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpacerBlock {
    pub id: BlockId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<Width>,
}

/// A block whose `type` this build does not know.
///
/// `raw` is the entry exactly as decoded and is what gets written back.
#[derive(Clone, Debug, PartialEq)]
pub struct UnknownBlock {
    /// Stored id, or a session-local one when the entry had none.
    pub id: BlockId,
    /// The unrecognised `type` tag (empty when the entry had none).
    pub kind: String,
    pub raw: serde_json::Value,
}

/// A page block: one of the seven known variants, or an unknown entry kept
/// for round-tripping.
#[derive(Clone, Debug, PartialEq)]
pub enum Block {
    Hero(HeroBlock),
    RichText(RichTextBlock),
    Gallery(GalleryBlock),
    Carousel(CarouselBlock),
    CardsGrid(CardsGridBlock),
    Cta(CtaBlock),
    Spacer(SpacerBlock),
    Unknown(UnknownBlock),
}

/// Borrowed, internally-tagged view used for serialization.
#[derive(Serialize)]
#[serde(tag = "type")]
enum TaggedRef<'a> {
    #[serde(rename = "hero")]
    Hero(&'a HeroBlock),
    #[serde(rename = "richText")]
    RichText(&'a RichTextBlock),
    #[serde(rename = "gallery")]
    Gallery(&'a GalleryBlock),
    #[serde(rename = "carousel")]
    Carousel(&'a CarouselBlock),
    #[serde(rename = "cards_grid")]
    CardsGrid(&'a CardsGridBlock),
    #[serde(rename = "cta")]
    Cta(&'a CtaBlock),
    #[serde(rename = "spacer")]
    Spacer(&'a SpacerBlock),
}

impl Block {
    /// The block's identity.
    pub fn id(&self) -> &BlockId {
        match self {
            Block::Hero(b) => &b.id,
            Block::RichText(b) => &b.id,
            Block::Gallery(b) => &b.id,
            Block::Carousel(b) => &b.id,
            Block::CardsGrid(b) => &b.id,
            Block::Cta(b) => &b.id,
            Block::Spacer(b) => &b.id,
            Block::Unknown(b) => &b.id,
        }
    }

    /// Known kind, or `None` for an unknown entry.
    pub fn kind(&self) -> Option<BlockKind> {
        match self {
            Block::Hero(_) => Some(BlockKind::Hero),
            Block::RichText(_) => Some(BlockKind::RichText),
            Block::Gallery(_) => Some(BlockKind::Gallery),
            Block::Carousel(_) => Some(BlockKind::Carousel),
            Block::CardsGrid(_) => Some(BlockKind::CardsGrid),
            Block::Cta(_) => Some(BlockKind::Cta),
            Block::Spacer(_) => Some(BlockKind::Spacer),
            Block::Unknown(_) => None,
        }
    }

    /// The stored `type` tag.
    pub fn type_tag(&self) -> &str {
        match self {
            Block::Unknown(b) => &b.kind,
            other => other.kind().map(|k| k.as_str()).unwrap_or_default(),
        }
    }

    pub fn is_unknown(&self) -> bool {
        matches!(self, Block::Unknown(_))
    }

    /// The width as stored. Always `None` for hero and unknown blocks.
    pub fn stored_width(&self) -> Option<Width> {
        match self {
            Block::RichText(b) => b.width,
            Block::Gallery(b) => b.width,
            Block::Carousel(b) => b.width,
            Block::CardsGrid(b) => b.width,
            Block::Cta(b) => b.width,
            Block::Spacer(b) => b.width,
            Block::Hero(_) | Block::Unknown(_) => None,
        }
    }

    /// Set the stored width. Returns `false` (and changes nothing) for blocks
    /// whose width is not user-settable.
    pub fn set_width(&mut self, width: Width) -> bool {
        let slot = match self {
            Block::RichText(b) => &mut b.width,
            Block::Gallery(b) => &mut b.width,
            Block::Carousel(b) => &mut b.width,
            Block::CardsGrid(b) => &mut b.width,
            Block::Cta(b) => &mut b.width,
            Block::Spacer(b) => &mut b.width,
            Block::Hero(_) | Block::Unknown(_) => return false,
        };
        *slot = Some(width);
        true
    }

    /// Per-block style overrides, if any were stored.
    pub fn styles(&self) -> Option<&BlockStyles> {
        match self {
            Block::Hero(b) => b.styles.as_ref(),
            Block::RichText(b) => b.styles.as_ref(),
            Block::Gallery(b) => b.styles.as_ref(),
            Block::Carousel(b) => b.styles.as_ref(),
            Block::CardsGrid(b) => b.styles.as_ref(),
            Block::Cta(b) => b.styles.as_ref(),
            Block::Spacer(_) | Block::Unknown(_) => None,
        }
    }

    /// Decode one stored entry.
    ///
    /// Unknown or missing `type` tags yield [`Block::Unknown`]; a known tag with
    /// malformed fields is an error.
    pub fn from_value(value: serde_json::Value) -> Result<Self, BlockError> {
        let serde_json::Value::Object(map) = &value else {
            return Err(BlockError::Untagged);
        };
        let tag = map.get("type").and_then(|t| t.as_str()).unwrap_or_default();
        let Some(kind) = BlockKind::from_tag(tag) else {
            let id = map
                .get("id")
                .and_then(|v| v.as_str())
                .and_then(|s| BlockId::parse(s).ok())
                .unwrap_or_default();
            return Ok(Block::Unknown(UnknownBlock {
                id,
                kind: tag.to_string(),
                raw: value,
            }));
        };

        let malformed = |source| BlockError::Malformed {
            kind: kind.as_str(),
            source,
        };
        let block = match kind {
            BlockKind::Hero => Block::Hero(serde_json::from_value(value).map_err(malformed)?),
            BlockKind::RichText => {
                Block::RichText(serde_json::from_value(value).map_err(malformed)?)
            }
            BlockKind::Gallery => Block::Gallery(serde_json::from_value(value).map_err(malformed)?),
            BlockKind::Carousel => {
                Block::Carousel(serde_json::from_value(value).map_err(malformed)?)
            }
            BlockKind::CardsGrid => {
                Block::CardsGrid(serde_json::from_value(value).map_err(malformed)?)
            }
            BlockKind::Cta => Block::Cta(serde_json::from_value(value).map_err(malformed)?),
            BlockKind::Spacer => Block::Spacer(serde_json::from_value(value).map_err(malformed)?),
        };
        Ok(block)
    }

    /// Encode to the stored JSON shape.
    pub fn to_value(&self) -> Result<serde_json::Value, BlockError> {
        Ok(serde_json::to_value(self)?)
    }
}

impl Serialize for Block {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let tagged = match self {
            Block::Hero(b) => TaggedRef::Hero(b),
            Block::RichText(b) => TaggedRef::RichText(b),
            Block::Gallery(b) => TaggedRef::Gallery(b),
            Block::Carousel(b) => TaggedRef::Carousel(b),
            Block::CardsGrid(b) => TaggedRef::CardsGrid(b),
            Block::Cta(b) => TaggedRef::Cta(b),
            Block::Spacer(b) => TaggedRef::Spacer(b),
            Block::Unknown(b) => return b.raw.serialize(serializer),
        };
        tagged.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Block {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = serde_json::Value::deserialize(deserializer)?;
        Block::from_value(value).map_err(serde::de::Error::custom)
    }
}

macro_rules! impl_from_variant {
    ($T:ident, $V:ident) => {
        impl From<$T> for Block {
            fn from(b: $T) -> Self {
                Block::$V(b)
            }
        }
    };
}

impl_from_variant!(HeroBlock, Hero);
impl_from_variant!(RichTextBlock, RichText);
impl_from_variant!(GalleryBlock, Gallery);
impl_from_variant!(CarouselBlock, Carousel);
impl_from_variant!(CardsGridBlock, CardsGrid);
impl_from_variant!(CtaBlock, Cta);
impl_from_variant!(SpacerBlock, Spacer);

/// `Some(s)` when `s` has non-whitespace content.
pub fn non_empty(s: Option<&str>) -> Option<&str> {
    s.filter(|s| !s.trim().is_empty())
}
