//! In-memory page store and featured mirror.
//!
//! Used for testing. All data is ephemeral.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::RwLock;

use munipage_types::{FeaturedCard, PageContent};

use super::{FeaturedMirror, PageStore, mirror_featured, newest_first, timestamp};
use crate::error::StoreResult;

#[derive(Debug, Default)]
pub struct MemoryFeaturedMirror {
    cards: RwLock<Vec<FeaturedCard>>,
}

impl MemoryFeaturedMirror {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.cards.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.read().is_empty()
    }
}

#[async_trait]
impl FeaturedMirror for MemoryFeaturedMirror {
    async fn replace_for_page(&self, page_path: &str, cards: Vec<FeaturedCard>) -> StoreResult<()> {
        let mut all = self.cards.write();
        all.retain(|c| c.page_path != page_path);
        all.extend(cards);
        Ok(())
    }

    async fn all(&self) -> StoreResult<Vec<FeaturedCard>> {
        let mut cards = self.cards.read().clone();
        newest_first(&mut cards);
        Ok(cards)
    }
}

/// In-memory page store keyed by path.
///
/// Mirrors featured cards into its own [`MemoryFeaturedMirror`] unless
/// another mirror is supplied.
pub struct MemoryPageStore {
    pages: RwLock<HashMap<String, PageContent>>,
    mirror: Arc<dyn FeaturedMirror>,
}

impl Default for MemoryPageStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryPageStore {
    pub fn new() -> Self {
        Self::with_mirror(Arc::new(MemoryFeaturedMirror::new()))
    }

    pub fn with_mirror(mirror: Arc<dyn FeaturedMirror>) -> Self {
        Self {
            pages: RwLock::new(HashMap::new()),
            mirror,
        }
    }

    pub fn mirror(&self) -> &Arc<dyn FeaturedMirror> {
        &self.mirror
    }

    pub fn len(&self) -> usize {
        self.pages.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.pages.read().is_empty()
    }
}

#[async_trait]
impl PageStore for MemoryPageStore {
    async fn get_by_path(&self, path: &str) -> StoreResult<Option<PageContent>> {
        Ok(self.pages.read().get(path).cloned())
    }

    async fn upsert(&self, mut page: PageContent) -> StoreResult<PageContent> {
        let updated_at = timestamp();
        page.updated_at = Some(updated_at.clone());
        self.pages.write().insert(page.path.clone(), page.clone());
        mirror_featured(self.mirror.as_ref(), &page, &updated_at).await;
        Ok(page)
    }
}
