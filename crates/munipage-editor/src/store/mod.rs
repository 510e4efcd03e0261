//! Page content store and featured-card mirror.
//!
//! A save writes the whole page (blocks included) in one upsert, stamps
//! `updatedAt`, then rebuilds the page's entries in the featured-card
//! collection: every entry for the page path is deleted and the page's
//! currently featured cards are inserted. A failed mirror is logged and does
//! not fail the save. Last write wins; there is no version check.
//!
//! Backends:
//! - [`MemoryPageStore`] / [`MemoryFeaturedMirror`]: ephemeral, for tests
//! - [`LocalPageStore`]: JSON files under a directory

mod local;
mod memory;

pub use local::LocalPageStore;
pub use memory::{MemoryFeaturedMirror, MemoryPageStore};

use async_trait::async_trait;
use chrono::{SecondsFormat, Utc};
use tracing::{debug, warn};

use munipage_types::{FeaturedCard, PageContent, featured_cards};

use crate::error::{StoreError, StoreResult};

/// Page content collaborator.
#[async_trait]
pub trait PageStore: Send + Sync {
    async fn get_by_path(&self, path: &str) -> StoreResult<Option<PageContent>>;

    /// Insert or replace the page at `page.path`.
    ///
    /// Returns the page as stored, with `updated_at` set.
    async fn upsert(&self, page: PageContent) -> StoreResult<PageContent>;
}

/// The flat featured-card collection read by the landing page.
#[async_trait]
pub trait FeaturedMirror: Send + Sync {
    /// Delete every entry for `page_path`, then insert `cards`.
    async fn replace_for_page(&self, page_path: &str, cards: Vec<FeaturedCard>) -> StoreResult<()>;

    /// All entries, most recently updated first.
    async fn all(&self) -> StoreResult<Vec<FeaturedCard>>;
}

/// Current time as an ISO-8601 UTC timestamp with milliseconds.
pub fn timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Rebuild `page`'s featured entries. Failures are logged, not returned.
pub async fn mirror_featured(mirror: &dyn FeaturedMirror, page: &PageContent, updated_at: &str) {
    let cards = featured_cards(page, updated_at);
    let count = cards.len();
    match mirror.replace_for_page(&page.path, cards).await {
        Ok(()) => debug!(path = %page.path, count, "featured cards mirrored"),
        Err(e) => warn!(path = %page.path, error = %e, "failed to mirror featured cards"),
    }
}

/// Sort featured entries newest first.
pub(crate) fn newest_first(cards: &mut [FeaturedCard]) {
    cards.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
}

/// Key of the root page. No other path can produce it: segments never start
/// with `_`.
const ROOT_KEY: &str = "__index";

/// Map a site path to a file-safe key: `/delegaciones/martinez` →
/// `delegaciones__martinez`, `/` → `__index`.
///
/// Distinct paths get distinct keys. Segments are joined with `__`, so a
/// segment may not contain `__` nor start or end with `_`; a trailing `/` is
/// rejected rather than folded into the same key as the path without it.
pub fn page_key(path: &str) -> StoreResult<String> {
    let invalid = || StoreError::InvalidPath(path.to_string());
    let rest = path.strip_prefix('/').ok_or_else(invalid)?;
    if rest.is_empty() {
        return Ok(ROOT_KEY.to_string());
    }
    let mut segments = Vec::new();
    for segment in rest.split('/') {
        let ok = !segment.is_empty()
            && segment != "."
            && segment != ".."
            && !segment.contains("__")
            && !segment.starts_with('_')
            && !segment.ends_with('_')
            && segment
                .chars()
                .all(|c| c.is_alphanumeric() || c == '-' || c == '_' || c == '.');
        if !ok {
            return Err(invalid());
        }
        segments.push(segment);
    }
    Ok(segments.join("__"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_key() {
        assert_eq!(page_key("/").unwrap(), "__index");
        assert_eq!(page_key("/index").unwrap(), "index");
        assert_eq!(page_key("/deportes").unwrap(), "deportes");
        assert_eq!(page_key("/delegaciones/martinez").unwrap(), "delegaciones__martinez");
        assert_eq!(page_key("/mi_barrio/club").unwrap(), "mi_barrio__club");
        assert_eq!(page_key("/institución").unwrap(), "institución");
        assert!(page_key("deportes").is_err());
        assert!(page_key("/a/../b").is_err());
        assert!(page_key("/a//b").is_err());
        assert!(page_key("/a b").is_err());
    }

    #[test]
    fn test_page_key_is_injective() {
        assert!(page_key("/a__b").is_err());
        assert!(page_key("/a_/b").is_err());
        assert!(page_key("/a/_b").is_err());
        assert!(page_key("/_index").is_err());
        assert!(page_key("/delegaciones/martinez/").is_err());

        let paths = ["/", "/index", "/a/b", "/a_b", "/a/b_c", "/a_b/c", "/a.b/c", "/a/b.c"];
        let keys: std::collections::HashSet<_> =
            paths.iter().map(|p| page_key(p).unwrap()).collect();
        assert_eq!(keys.len(), paths.len());
    }

    #[test]
    fn test_timestamp_shape() {
        let ts = timestamp();
        assert!(ts.ends_with('Z'));
        assert_eq!(ts.len(), "2026-01-01T00:00:00.000Z".len());
    }
}
