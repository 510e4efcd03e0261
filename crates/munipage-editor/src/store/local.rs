//! JSON-directory page store.
//!
//! Layout under `root`:
//!
//! ```text
//! pages/<key>.json        one page per file, key from `page_key`
//! featured_cards.json     the flat featured-card collection
//! ```
//!
//! Writes go to a temporary sibling first and are renamed into place.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::fs;
use tracing::debug;

use munipage_types::{FeaturedCard, PageContent};

use super::{FeaturedMirror, PageStore, mirror_featured, newest_first, page_key, timestamp};
use crate::error::StoreResult;

const PAGES_DIR: &str = "pages";
const FEATURED_FILE: &str = "featured_cards.json";

#[derive(Debug, Clone)]
pub struct LocalPageStore {
    root: PathBuf,
}

impl LocalPageStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// File holding the page at `path`.
    pub fn page_file(&self, path: &str) -> StoreResult<PathBuf> {
        Ok(self
            .root
            .join(PAGES_DIR)
            .join(format!("{}.json", page_key(path)?)))
    }

    pub fn featured_file(&self) -> PathBuf {
        self.root.join(FEATURED_FILE)
    }

    /// Paths of every stored page, sorted.
    pub async fn list_paths(&self) -> StoreResult<Vec<String>> {
        let dir = self.root.join(PAGES_DIR);
        let mut entries = match fs::read_dir(&dir).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };
        let mut paths = Vec::new();
        while let Some(entry) = entries.next_entry().await? {
            let file = entry.path();
            if file.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            let page: PageContent = serde_json::from_slice(&fs::read(&file).await?)?;
            paths.push(page.path);
        }
        paths.sort();
        Ok(paths)
    }

    async fn write_atomic(&self, file: &Path, bytes: &[u8]) -> StoreResult<()> {
        if let Some(parent) = file.parent() {
            fs::create_dir_all(parent).await?;
        }
        let tmp = file.with_extension("json.tmp");
        fs::write(&tmp, bytes).await?;
        fs::rename(&tmp, file).await?;
        Ok(())
    }

    async fn read_featured(&self) -> StoreResult<Vec<FeaturedCard>> {
        match fs::read(self.featured_file()).await {
            Ok(bytes) => Ok(serde_json::from_slice(&bytes)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Vec::new()),
            Err(e) => Err(e.into()),
        }
    }
}

#[async_trait]
impl PageStore for LocalPageStore {
    async fn get_by_path(&self, path: &str) -> StoreResult<Option<PageContent>> {
        let file = self.page_file(path)?;
        match fs::read(&file).await {
            Ok(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn upsert(&self, mut page: PageContent) -> StoreResult<PageContent> {
        let file = self.page_file(&page.path)?;
        let updated_at = timestamp();
        page.updated_at = Some(updated_at.clone());
        self.write_atomic(&file, &serde_json::to_vec_pretty(&page)?)
            .await?;
        debug!(path = %page.path, file = %file.display(), blocks = page.blocks.len(), "page saved");
        mirror_featured(self, &page, &updated_at).await;
        Ok(page)
    }
}

#[async_trait]
impl FeaturedMirror for LocalPageStore {
    async fn replace_for_page(&self, page_path: &str, cards: Vec<FeaturedCard>) -> StoreResult<()> {
        let mut all = self.read_featured().await?;
        all.retain(|c| c.page_path != page_path);
        all.extend(cards);
        self.write_atomic(&self.featured_file(), &serde_json::to_vec_pretty(&all)?)
            .await
    }

    async fn all(&self) -> StoreResult<Vec<FeaturedCard>> {
        let mut cards = self.read_featured().await?;
        newest_first(&mut cards);
        Ok(cards)
    }
}
