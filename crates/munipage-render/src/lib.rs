//! Layout, rendering and composition for munipage blocks.
//!
//! Takes the block list of a [`munipage_types::PageContent`] and produces a
//! node tree that serialises to HTML, either read-only or as an editing
//! surface.
//!
//! # Pipeline
//!
//! ```text
//! blocks ──► resolve_width ──► render_block ──► compose ──► Node / HTML
//!              (layout)          (render)       (compose)
//! ```
//!
//! - **Layout** is pure: width defaults per kind, column clamps, size tiers.
//! - **Render** is stateless: one block plus a [`RenderContext`] in, an
//!   optional [`Node`] out. Unknown kinds render nothing in display mode.
//! - **Compose** keeps list order, drops blocks that rendered nothing, and in
//!   edit mode wraps each cell with a drag handle and controls.
//!
//! Edit-mode inputs carry `data-field` bindings; [`edit::dispatch`] turns an
//! input event back into an updated block. Image URLs go through
//! [`ImagePolicy`] and untrusted ones are treated as absent.

pub mod compose;
pub mod edit;
mod error;
pub mod image;
pub mod ir;
pub mod layout;
pub mod page;
pub mod render;
pub mod style;

pub use compose::{Cell, CellSummary, Composition, ControlsProvider, StandardControls, compose};
pub use edit::{
    BlockCallbacks, CardField, EditAction, Field, ImageSlot, StyleField, UploadError, UploadFile,
    UploadService, UploadedImage, apply_edit, apply_upload, dispatch, upload_into,
};
pub use error::{EditError, RenderError};
pub use image::{CDN_HOST, ImagePolicy, is_allowed_image};
pub use ir::{Element, Node};
pub use layout::{resolve_width, span_class};
pub use page::{render_page, render_page_json, render_page_with};
pub use render::{EditUiState, Mode, ModalState, RenderContext, render_block};
pub use style::ResolvedStyles;

/// Result type for edit operations.
pub type Result<T> = std::result::Result<T, EditError>;
