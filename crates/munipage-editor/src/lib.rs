//! Editing municipal pages.
//!
//! An [`EditSession`] holds one page's block list in memory while an editor
//! works on it: adding and removing blocks, field edits routed through
//! [`munipage_render::dispatch`], drag-to-reorder, image uploads and a single
//! whole-page save.
//!
//! # Collaborators
//!
//! | Trait | Backends |
//! |-------|----------|
//! | [`PageStore`] | [`MemoryPageStore`], [`LocalPageStore`] |
//! | [`FeaturedMirror`] | [`MemoryFeaturedMirror`], [`LocalPageStore`] |
//! | [`munipage_render::UploadService`] | [`MemoryUploader`], [`LocalUploader`] |
//!
//! Saving always writes the whole page, then rebuilds that page's entries in
//! the featured-card collection.

pub mod config;
mod error;
pub mod notify;
pub mod reorder;
pub mod session;
pub mod store;
pub mod templates;
pub mod upload;
pub mod validate;

pub use config::EditorConfig;
pub use error::{EditorError, StoreError, StoreResult};
pub use notify::{Level, Notification, Notifications};
pub use reorder::{DEFAULT_ACTIVATION_DISTANCE, DragOutcome, DragTracker, array_move, reorder};
pub use session::{EditSession, SavingIndicator, ensure_path};
pub use store::{
    FeaturedMirror, LocalPageStore, MemoryFeaturedMirror, MemoryPageStore, PageStore, timestamp,
};
pub use templates::{PageSeed, default_blocks, new_block};
pub use upload::{LocalUploader, MemoryUploader};
pub use validate::{Issue, Severity, validate_blocks, validate_page};

/// Result type for editor operations.
pub type Result<T> = std::result::Result<T, EditorError>;
