//! Edit session: one page's in-memory block list, owned by one editor.
//!
//! Every mutation is synchronous and applies to the in-memory page only.
//! The two suspension points are image upload and save. Nothing is persisted
//! until [`EditSession::save`]; [`EditSession::discard`] drops all changes.
//!
//! Failures never escape as panics: uploads, saves and validation push a
//! one-shot notification, leave the in-memory state as it was, and return the
//! error.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tracing::{debug, info, warn};

use munipage_render::{
    EditAction, EditUiState, ImagePolicy, ImageSlot, ModalState, Node, RenderContext, UploadFile,
    UploadService, dispatch, render_page, upload_into,
};
use munipage_types::{Block, BlockId, BlockKind, CardId, PageContent, PageLayout, Width};

use crate::config::EditorConfig;
use crate::error::EditorError;
use crate::notify::{Notification, Notifications};
use crate::reorder::{DragOutcome, DragTracker, reorder_in_place};
use crate::store::PageStore;
use crate::templates::{PageSeed, default_blocks, new_block};
use crate::validate::{Issue, has_blocking, validate_page};

/// Prefix `path` with `/` when missing.
pub fn ensure_path(path: &str) -> String {
    let path = path.trim();
    if path.starts_with('/') {
        path.to_string()
    } else {
        format!("/{path}")
    }
}

/// Read-only view of a session's "saving" state, for disabling the save
/// action while a save runs.
#[derive(Clone, Debug, Default)]
pub struct SavingIndicator(Arc<AtomicBool>);

impl SavingIndicator {
    pub fn is_saving(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}

/// Sets the flag for its lifetime, including when the save future is dropped.
struct SavingGuard<'a>(&'a AtomicBool);

impl<'a> SavingGuard<'a> {
    fn new(flag: &'a AtomicBool) -> Self {
        flag.store(true, Ordering::Release);
        Self(flag)
    }
}

impl Drop for SavingGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

pub struct EditSession {
    page: PageContent,
    /// Last state known to be persisted; `None` for a page never saved.
    saved: Option<PageContent>,
    store: Arc<dyn PageStore>,
    uploader: Arc<dyn UploadService>,
    images: ImagePolicy,
    drag: DragTracker,
    ui: EditUiState,
    modal: ModalState,
    notifications: Notifications,
    saving: SavingIndicator,
}

impl EditSession {
    /// Open the page at `path` for editing.
    ///
    /// A missing page starts from the default blocks, titled `label` and
    /// linking to `path`. A stored page without blocks gets default blocks
    /// seeded from its own metadata.
    pub async fn open(
        path: &str,
        label: &str,
        store: Arc<dyn PageStore>,
        uploader: Arc<dyn UploadService>,
        config: &EditorConfig,
    ) -> Result<Self, EditorError> {
        let path = ensure_path(path);
        let stored = store.get_by_path(&path).await.inspect_err(|e| {
            warn!(path = %path, error = %e, "failed to load page");
        })?;

        let page = match &stored {
            Some(page) if !page.blocks.is_empty() => page.clone(),
            Some(page) => PageContent {
                blocks: default_blocks(&PageSeed::from_page(page)),
                ..page.clone()
            },
            None => PageContent {
                blocks: default_blocks(&PageSeed::new(label).with_href(path.as_str())),
                ..PageContent::new(path.as_str(), label)
            },
        };
        info!(path = %path, blocks = page.blocks.len(), new = stored.is_none(), "edit session opened");

        Ok(Self {
            page,
            saved: stored,
            store,
            uploader,
            images: config.image_policy(),
            drag: DragTracker::new(config.drag_activation_distance),
            ui: EditUiState::new(),
            modal: ModalState::closed(),
            notifications: Notifications::new(),
            saving: SavingIndicator::default(),
        })
    }

    pub fn page(&self) -> &PageContent {
        &self.page
    }

    pub fn blocks(&self) -> &[Block] {
        &self.page.blocks
    }

    pub fn block(&self, id: &BlockId) -> Option<&Block> {
        self.page.block(id)
    }

    pub fn image_policy(&self) -> &ImagePolicy {
        &self.images
    }

    /// Whether the page has never been saved.
    pub fn is_new(&self) -> bool {
        self.saved.is_none()
    }

    /// Whether there are unsaved changes.
    pub fn is_dirty(&self) -> bool {
        self.saved.as_ref() != Some(&self.page)
    }

    pub fn is_saving(&self) -> bool {
        self.saving.is_saving()
    }

    pub fn saving_indicator(&self) -> SavingIndicator {
        self.saving.clone()
    }

    fn position(&self, id: &BlockId) -> Result<usize, EditorError> {
        self.page
            .position(id)
            .ok_or_else(|| EditorError::BlockNotFound(id.clone()))
    }

    // ── Page metadata ─────────────────────────────────────────────────────

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.page.title = title.into();
    }

    pub fn set_subtitle(&mut self, subtitle: Option<String>) {
        self.page.subtitle = subtitle;
    }

    pub fn set_layout(&mut self, layout: PageLayout) {
        self.page.layout = layout;
    }

    // ── Blocks ────────────────────────────────────────────────────────────

    /// Append a new block from the "add block" templates.
    pub fn add_block(&mut self, kind: BlockKind) -> BlockId {
        let block = new_block(kind, &PageSeed::from_page(&self.page));
        let id = block.id().clone();
        debug!(block = %id, kind = %kind, "block added");
        self.page.blocks.push(block);
        id
    }

    /// Append a block built elsewhere. Its id must not already be on the page.
    pub fn insert_block(&mut self, block: Block) -> Result<(), EditorError> {
        if self.page.position(block.id()).is_some() {
            return Err(EditorError::DuplicateBlock(block.id().clone()));
        }
        self.page.blocks.push(block);
        Ok(())
    }

    /// Replace the block with the same id (the renderer's update callback).
    pub fn update_block(&mut self, block: Block) -> Result<(), EditorError> {
        let pos = self.position(block.id())?;
        self.page.blocks[pos] = block;
        Ok(())
    }

    /// Apply one edit-mode input event to a block.
    pub fn apply(&mut self, id: &BlockId, action: &EditAction) -> Result<(), EditorError> {
        let pos = self.position(id)?;
        let mut updated = None;
        dispatch(&self.page.blocks[pos], action, &mut |block: Block| {
            updated = Some(block)
        })?;
        if let Some(block) = updated {
            self.page.blocks[pos] = block;
        }
        Ok(())
    }

    /// Remove a block. Saving afterwards drops it permanently.
    pub fn remove_block(&mut self, id: &BlockId) -> Result<Block, EditorError> {
        let pos = self.position(id)?;
        let removed = self.page.blocks.remove(pos);
        self.ui.retain(&self.page.blocks);
        if self.modal.open_in(id).is_some() {
            self.modal.close();
        }
        debug!(block = %id, "block removed");
        Ok(removed)
    }

    /// Set a block's width. Returns `false` for blocks whose width is fixed.
    pub fn set_width(&mut self, id: &BlockId, width: Width) -> Result<bool, EditorError> {
        let pos = self.position(id)?;
        Ok(self.page.blocks[pos].set_width(width))
    }

    /// Move `active` to where `over` is. Returns whether the order changed.
    pub fn reorder(&mut self, active: &BlockId, over: &BlockId) -> bool {
        reorder_in_place(&mut self.page.blocks, active, over)
    }

    // ── Drag gesture ──────────────────────────────────────────────────────

    pub fn pointer_down(&mut self, id: &BlockId, x: f32, y: f32) {
        if self.page.position(id).is_some() {
            self.drag.pointer_down(id.clone(), x, y);
        }
    }

    pub fn pointer_move(&mut self, x: f32, y: f32, over: Option<&BlockId>) -> bool {
        self.drag.pointer_move(x, y, over.cloned())
    }

    /// Finish the gesture, reordering when it ended over a block.
    pub fn pointer_up(&mut self) -> DragOutcome {
        let outcome = self.drag.pointer_up();
        if let DragOutcome::Drop { active, over } = &outcome {
            if self.reorder(active, over) {
                debug!(active = %active, over = %over, "blocks reordered");
            }
        }
        outcome
    }

    pub fn cancel_drag(&mut self) -> DragOutcome {
        self.drag.cancel()
    }

    // ── Ephemeral UI state ────────────────────────────────────────────────

    pub fn toggle_settings(&mut self, id: &BlockId) -> bool {
        self.ui.toggle_settings(id)
    }

    pub fn open_modal(&mut self, block: &BlockId, card: &CardId) {
        self.modal.open(block.clone(), card.clone());
    }

    pub fn close_modal(&mut self) {
        self.modal.close();
    }

    /// The editing surface.
    pub fn render_edit(&self) -> Node {
        let ctx = RenderContext::edit(&self.images)
            .with_ui(&self.ui)
            .with_modal(&self.modal);
        render_page(&self.page, &ctx)
    }

    /// The page as visitors would see it with the current changes.
    pub fn render_preview(&self) -> Node {
        let ctx = RenderContext::display(&self.images).with_modal(&self.modal);
        render_page(&self.page, &ctx)
    }

    // ── I/O ───────────────────────────────────────────────────────────────

    /// Upload `file` and write its URL into `slot` of block `id`.
    ///
    /// The field changes only once the upload has completed.
    pub async fn upload(
        &mut self,
        id: &BlockId,
        slot: ImageSlot,
        file: UploadFile,
    ) -> Result<(), EditorError> {
        let pos = self.position(id)?;
        match upload_into(&self.page.blocks[pos], slot, file, self.uploader.as_ref()).await {
            Ok(updated) => {
                self.page.blocks[pos] = updated;
                Ok(())
            }
            Err(e) => {
                self.notifications
                    .error(format!("No se pudo subir la imagen: {e}"));
                Err(e.into())
            }
        }
    }

    pub fn validate(&self) -> Vec<Issue> {
        validate_page(&self.page, &self.images)
    }

    /// Persist the whole page.
    ///
    /// Blocking validation issues refuse the save without calling the store.
    /// On failure the in-memory page is kept so the save can be retried.
    pub async fn save(&mut self) -> Result<PageContent, EditorError> {
        let issues = self.validate();
        if has_blocking(&issues) {
            if let Some(first) = issues.iter().find(|i| i.is_blocking()) {
                self.notifications.error(first.message.clone());
            }
            warn!(path = %self.page.path, issues = issues.len(), "save refused by validation");
            return Err(EditorError::Validation(issues));
        }
        for warning in &issues {
            self.notifications.info(warning.message.clone());
        }

        let result = {
            let _saving = SavingGuard::new(&self.saving.0);
            self.store.upsert(self.page.clone()).await
        };
        match result {
            Ok(stored) => {
                self.page.updated_at = stored.updated_at.clone();
                self.saved = Some(self.page.clone());
                self.notifications.success("Página guardada");
                info!(path = %self.page.path, blocks = self.page.blocks.len(), "page saved");
                Ok(stored)
            }
            Err(e) => {
                warn!(path = %self.page.path, error = %e, "page save failed");
                self.notifications
                    .error(format!("Error al guardar la página: {e}"));
                Err(e.into())
            }
        }
    }

    /// Close the session without saving.
    pub fn discard(self) {
        info!(path = %self.page.path, dirty = self.is_dirty(), "edit session discarded");
    }

    pub fn notifications(&mut self) -> &mut Notifications {
        &mut self.notifications
    }

    /// Take all pending notifications, oldest first.
    pub fn take_notifications(&mut self) -> Vec<Notification> {
        self.notifications.drain()
    }
}
