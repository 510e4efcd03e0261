//! Page content and the featured-card payload derived from it.

use serde::{Deserialize, Serialize};

use crate::block::{Block, Card};
use crate::ids::BlockId;
use crate::style::PageLayout;

/// A navigation page as stored in the page collection.
///
/// `blocks` is persisted wholesale on save; its order is the display order.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageContent {
    /// Site path, e.g. `/delegaciones/martinez`. The page's key.
    pub path: String,
    #[serde(default)]
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subtitle: Option<String>,
    /// Legacy free-text body, shown only when the page has no blocks.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(default)]
    pub layout: PageLayout,
    #[serde(default)]
    pub blocks: Vec<Block>,
    /// ISO-8601 timestamp written by the store on upsert.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

impl PageContent {
    /// An empty page at `path`.
    pub fn new(path: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            title: title.into(),
            subtitle: None,
            body: None,
            image_url: None,
            layout: PageLayout::default(),
            blocks: Vec::new(),
            updated_at: None,
        }
    }

    pub fn block(&self, id: &BlockId) -> Option<&Block> {
        self.blocks.iter().find(|b| b.id() == id)
    }

    pub fn position(&self, id: &BlockId) -> Option<usize> {
        self.blocks.iter().position(|b| b.id() == id)
    }

    /// Whether the first block is a hero (the page header is then omitted).
    pub fn starts_with_hero(&self) -> bool {
        matches!(self.blocks.first(), Some(Block::Hero(_)))
    }

    /// Cards flagged `featured`, in page order.
    pub fn featured(&self) -> impl Iterator<Item = &Card> {
        self.blocks
            .iter()
            .filter_map(|b| match b {
                Block::CardsGrid(grid) => Some(grid.cards.iter()),
                _ => None,
            })
            .flatten()
            .filter(|c| c.featured)
    }
}

/// One entry of the flat featured-cards collection consumed by the landing page.
///
/// Carries the card payload plus the owning page's path and title. The
/// collection is rebuilt per page on every save: every entry for `page_path`
/// is deleted, then these are inserted.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeaturedCard {
    #[serde(flatten)]
    pub card: Card,
    pub page_path: String,
    pub page_title: String,
    pub updated_at: String,
}

/// Build the featured-card mirror entries for `page`.
pub fn featured_cards(page: &PageContent, updated_at: &str) -> Vec<FeaturedCard> {
    page.featured()
        .map(|card| FeaturedCard {
            card: card.clone(),
            page_path: page.path.clone(),
            page_title: page.title.clone(),
            updated_at: updated_at.to_string(),
        })
        .collect()
}
