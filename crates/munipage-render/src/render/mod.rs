//! Block Renderer: one block in, one node tree out.
//!
//! [`render_block`] is stateless. Everything that varies between calls comes
//! in through [`RenderContext`]: the mode, the image policy, which card modal
//! is open, and the ephemeral edit-surface toggles.
//!
//! In [`Mode::Display`] only block fields are rendered and unknown block kinds
//! produce nothing. In [`Mode::Edit`] every text field becomes a bound input
//! (see [`crate::edit`] for the binding scheme) and unknown blocks render a
//! placeholder so they can still be deleted.

mod cards;
mod carousel;
mod cta;
mod gallery;
mod hero;
mod rich_text;
mod spacer;

use std::collections::BTreeSet;

use tracing::debug;

use munipage_types::{Block, BlockId, CardId, UnknownBlock};

use crate::edit::{Field, ImageSlot};
use crate::image::ImagePolicy;
use crate::ir::{Element, Node};
use crate::style::ResolvedStyles;

pub use cards::css_declarations;
pub use rich_text::plain_text_to_html;

/// Read-only page or interactive editor.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Mode {
    #[default]
    Display,
    Edit,
}

impl Mode {
    pub fn is_edit(&self) -> bool {
        matches!(self, Mode::Edit)
    }
}

/// Which card's "Leer más" overlay is open, if any.
///
/// Owned by the consuming page and passed into every render call.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ModalState {
    open: Option<(BlockId, CardId)>,
}

impl ModalState {
    pub const fn closed() -> Self {
        Self { open: None }
    }

    pub fn open(&mut self, block: BlockId, card: CardId) {
        self.open = Some((block, card));
    }

    pub fn close(&mut self) {
        self.open = None;
    }

    pub fn is_open(&self) -> bool {
        self.open.is_some()
    }

    /// The open card, when it belongs to `block`.
    pub fn open_in(&self, block: &BlockId) -> Option<&CardId> {
        match &self.open {
            Some((b, c)) if b == block => Some(c),
            _ => None,
        }
    }
}

/// Ephemeral edit-surface toggles. Never persisted.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct EditUiState {
    settings_open: BTreeSet<BlockId>,
}

impl EditUiState {
    pub const fn new() -> Self {
        Self {
            settings_open: BTreeSet::new(),
        }
    }

    /// Flip the settings popover of `block`. Returns the new state.
    pub fn toggle_settings(&mut self, block: &BlockId) -> bool {
        if self.settings_open.remove(block) {
            false
        } else {
            self.settings_open.insert(block.clone());
            true
        }
    }

    pub fn settings_open(&self, block: &BlockId) -> bool {
        self.settings_open.contains(block)
    }

    /// Drop toggles for blocks that no longer exist.
    pub fn retain(&mut self, live: &[Block]) {
        self.settings_open
            .retain(|id| live.iter().any(|b| b.id() == id));
    }
}

static CLOSED_MODAL: ModalState = ModalState::closed();
static NO_TOGGLES: EditUiState = EditUiState::new();

/// Inputs for one render pass.
#[derive(Clone, Copy, Debug)]
pub struct RenderContext<'a> {
    pub mode: Mode,
    pub images: &'a ImagePolicy,
    pub modal: &'a ModalState,
    pub ui: &'a EditUiState,
    /// Whether upload affordances are shown in edit mode.
    pub uploads: bool,
}

impl<'a> RenderContext<'a> {
    pub fn display(images: &'a ImagePolicy) -> Self {
        Self {
            mode: Mode::Display,
            images,
            modal: &CLOSED_MODAL,
            ui: &NO_TOGGLES,
            uploads: false,
        }
    }

    pub fn edit(images: &'a ImagePolicy) -> Self {
        Self {
            mode: Mode::Edit,
            uploads: true,
            ..Self::display(images)
        }
    }

    pub fn with_modal(mut self, modal: &'a ModalState) -> Self {
        self.modal = modal;
        self
    }

    pub fn with_ui(mut self, ui: &'a EditUiState) -> Self {
        self.ui = ui;
        self
    }

    pub fn with_uploads(mut self, uploads: bool) -> Self {
        self.uploads = uploads;
        self
    }

    pub fn is_edit(&self) -> bool {
        self.mode.is_edit()
    }

    fn show_uploads(&self) -> bool {
        self.is_edit() && self.uploads
    }
}

/// Render one block.
///
/// Returns `None` when the block has nothing to show: unknown kinds in display
/// mode, or a rich-text body that is empty.
pub fn render_block(block: &Block, ctx: &RenderContext<'_>) -> Option<Node> {
    let styles = ResolvedStyles::for_block(block);
    let node = match block {
        Block::Hero(b) => hero::render(b, &styles, ctx),
        Block::RichText(b) => rich_text::render(b, &styles, ctx),
        Block::Gallery(b) => gallery::render(b, &styles, ctx),
        Block::Carousel(b) => carousel::render(b, &styles, ctx),
        Block::CardsGrid(b) => cards::render(b, &styles, ctx),
        Block::Cta(b) => cta::render(b, &styles, ctx),
        Block::Spacer(b) => spacer::render(b, ctx),
        Block::Unknown(b) => render_unknown(b, ctx),
    };
    let mut node = node?;
    if let Some(root) = node.as_element_mut() {
        root.set_attr("data-block-id", block.id().as_str());
        root.set_attr("data-block-type", block.type_tag());
    }
    Some(node)
}

fn render_unknown(block: &UnknownBlock, ctx: &RenderContext<'_>) -> Option<Node> {
    if !ctx.is_edit() {
        debug!(block = %block.id, kind = %block.kind, "skipping unknown block");
        return None;
    }
    let label = if block.kind.is_empty() {
        "Bloque no soportado".to_string()
    } else {
        format!("Bloque no soportado ({})", block.kind)
    };
    Some(
        Element::new("div")
            .class("rounded-xl border-2 border-dashed border-amber-300 bg-amber-50 p-4 text-xs text-amber-700")
            .text(label)
            .into(),
    )
}

// Shared building blocks for the per-kind renderers.

/// An `<img>` for a trusted URL, or `None` when the URL is not allowed.
fn image(
    ctx: &RenderContext<'_>,
    url: Option<&str>,
    width: u32,
    alt: &str,
    class: &str,
) -> Option<Element> {
    let src = ctx.images.src(url, width)?;
    Some(
        Element::new("img")
            .attr("src", src)
            .attr("alt", alt)
            .class(class)
            .attr("loading", "lazy")
            .attr("decoding", "async"),
    )
}

fn no_image() -> Element {
    Element::new("div")
        .class("flex items-center justify-center h-full text-xs text-slate-400")
        .text("Sin imagen")
}

fn text_input(field: Field, value: &str, placeholder: &str, class: &str) -> Element {
    Element::new("input")
        .attr("type", "text")
        .attr("data-field", field.binding())
        .attr("value", value)
        .attr("placeholder", placeholder)
        .class(class)
}

fn textarea(field: Field, value: &str, placeholder: &str, rows: u8, class: &str) -> Element {
    Element::new("textarea")
        .attr("data-field", field.binding())
        .attr("placeholder", placeholder)
        .attr("rows", rows.to_string())
        .class(class)
        .text(value)
}

fn select<'o>(
    field: Field,
    options: impl IntoIterator<Item = (String, &'o str)>,
    selected: &str,
    class: &str,
) -> Element {
    let options = options.into_iter().map(|(value, label)| {
        let on = value == selected;
        Element::new("option").attr("value", value).flag("selected", on).text(label)
    });
    Element::new("select")
        .attr("data-field", field.binding())
        .class(class)
        .children(options)
}

fn checkbox(field: Field, checked: bool, label: &str) -> Element {
    Element::new("label")
        .class("inline-flex items-center gap-2 text-xs text-slate-600")
        .child(
            Element::new("input")
                .attr("type", "checkbox")
                .attr("data-field", field.binding())
                .flag("checked", checked),
        )
        .text(label)
}

/// A hidden file input bound to an upload slot.
fn file_input(slot: ImageSlot) -> Element {
    Element::new("input")
        .attr("type", "file")
        .attr("accept", "image/*")
        .attr("data-upload", slot.binding())
        .class("hidden")
}

fn action_button(action: &str, label: &str, class: &str) -> Element {
    Element::new("button")
        .attr("type", "button")
        .attr("data-action", action)
        .class(class)
        .text(label)
}

const REMOVE_BUTTON_CLASS: &str = "bg-red-500 text-white rounded-full p-1 w-6 h-6 flex items-center justify-center text-xs shadow hover:bg-red-600";

const CAPTION_INPUT_CLASS: &str =
    "w-full bg-transparent text-white text-xs border-none focus:ring-0 placeholder-white/50 p-0";

/// The "+ Agregar" tile used by list editors.
fn add_tile(slot: ImageSlot, class: &str) -> Element {
    Element::new("label")
        .class(class)
        .child(Element::new("span").class("text-2xl text-slate-400").text("+"))
        .child(
            Element::new("span")
                .class("text-xs text-slate-500 font-medium")
                .text("Agregar"),
        )
        .child(file_input(slot))
}

#[cfg(test)]
mod tests {
    use super::*;
    use munipage_types::{HeroBlock, RichTextBlock};
    use serde_json::json;

    #[test]
    fn test_unknown_block_skipped_in_display() {
        let block: Block = serde_json::from_value(json!({"id": "m", "type": "map"})).unwrap();
        let policy = ImagePolicy::default();
        assert!(render_block(&block, &RenderContext::display(&policy)).is_none());
        let placeholder = render_block(&block, &RenderContext::edit(&policy)).unwrap();
        assert!(placeholder.text_content().contains("Bloque no soportado (map)"));
    }

    #[test]
    fn test_root_carries_identity() {
        let hero = Block::from(HeroBlock::new("T"));
        let policy = ImagePolicy::default();
        let node = render_block(&hero, &RenderContext::display(&policy)).unwrap();
        let root = node.as_element().unwrap();
        assert_eq!(root.get_attr("data-block-id"), Some(hero.id().as_str()));
        assert_eq!(root.get_attr("data-block-type"), Some("hero"));
    }

    #[test]
    fn test_display_has_no_controls() {
        let policy = ImagePolicy::default();
        let blocks: Vec<Block> = serde_json::from_value(json!([
            {"id": "h", "type": "hero", "title": "T", "ctaLabel": "Ir", "ctaHref": "/x"},
            {"id": "r", "type": "richText", "html": "<p>x</p>"},
            {"id": "g", "type": "gallery", "images": [{"url": "https://res.cloudinary.com/a.jpg"}]},
            {"id": "k", "type": "carousel", "images": [{"url": "https://res.cloudinary.com/a.jpg"}]},
            {"id": "c", "type": "cards_grid", "cards": [{"id": "c1", "title": "A"}]},
            {"id": "t", "type": "cta", "title": "T", "label": "Ir", "href": "/x"},
            {"id": "s", "type": "spacer"}
        ]))
        .unwrap();
        for block in &blocks {
            let node = render_block(block, &RenderContext::display(&policy)).unwrap();
            let controls = node.find_all(&|el| {
                matches!(el.tag, "input" | "textarea" | "select")
                    || el.get_attr("data-field").is_some()
                    || el.get_attr("data-upload").is_some()
            });
            assert!(controls.is_empty(), "{} rendered controls", block.type_tag());
        }
    }

    #[test]
    fn test_edit_mode_binds_fields() {
        let policy = ImagePolicy::default();
        let text = Block::from(RichTextBlock::new("<p>x</p>"));
        let node = render_block(&text, &RenderContext::edit(&policy)).unwrap();
        let editable = node.find_all(&|el| el.get_attr("contenteditable").is_some());
        assert_eq!(editable.len(), 1);
        assert_eq!(editable[0].get_attr("data-field"), Some("html"));
    }

    #[test]
    fn test_modal_and_toggle_state() {
        let mut modal = ModalState::default();
        let block = BlockId::new();
        let card = CardId::new();
        modal.open(block.clone(), card.clone());
        assert_eq!(modal.open_in(&block), Some(&card));
        assert_eq!(modal.open_in(&BlockId::new()), None);
        modal.close();
        assert!(!modal.is_open());

        let mut ui = EditUiState::default();
        assert!(ui.toggle_settings(&block));
        assert!(ui.settings_open(&block));
        ui.retain(&[]);
        assert!(!ui.settings_open(&block));
    }
}
