//! Edit-mode actions: field bindings, list mutations and upload delegation.
//!
//! Edit-mode markup carries three kinds of hooks for the host UI:
//!
//! - `data-field="<binding>"` on every input bound to a block field
//! - `data-action="<action>"` (plus `data-index` / `data-card`) on list buttons
//! - `data-upload="<slot>"` on file inputs
//!
//! The host turns an input event into an [`EditAction`] and hands it to
//! [`dispatch`], which applies it to a copy of the block and re-emits the whole
//! updated block through [`BlockCallbacks`]. The renderer itself keeps no state.

use async_trait::async_trait;
use tracing::warn;

use munipage_types::{Block, Card, CarouselAnimation, ImageItem, SizeTier, non_empty};

use crate::error::EditError;
use crate::layout::{CARDS_COLUMNS, GALLERY_COLUMNS};

/// A card field addressable from edit mode.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CardField {
    Title,
    Description,
    ImageUrl,
    ButtonText,
    ModalTitle,
    ModalContent,
    TitleFont,
    DescFont,
    TitleSize,
    DescSize,
    Featured,
}

impl CardField {
    pub const ALL: [CardField; 11] = [
        CardField::Title,
        CardField::Description,
        CardField::ImageUrl,
        CardField::ButtonText,
        CardField::ModalTitle,
        CardField::ModalContent,
        CardField::TitleFont,
        CardField::DescFont,
        CardField::TitleSize,
        CardField::DescSize,
        CardField::Featured,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            CardField::Title => "title",
            CardField::Description => "description",
            CardField::ImageUrl => "imageUrl",
            CardField::ButtonText => "buttonText",
            CardField::ModalTitle => "modalTitle",
            CardField::ModalContent => "modalContent",
            CardField::TitleFont => "titleFont",
            CardField::DescFont => "descFont",
            CardField::TitleSize => "titleSize",
            CardField::DescSize => "descSize",
            CardField::Featured => "featured",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|f| f.as_str() == s)
    }
}

/// A style override addressable from edit mode.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum StyleField {
    PaddingY,
    Animation,
    TextAlign,
    Theme,
}

impl StyleField {
    pub fn as_str(&self) -> &'static str {
        match self {
            StyleField::PaddingY => "paddingY",
            StyleField::Animation => "animation",
            StyleField::TextAlign => "textAlign",
            StyleField::Theme => "theme",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "paddingY" => Some(StyleField::PaddingY),
            "animation" => Some(StyleField::Animation),
            "textAlign" => Some(StyleField::TextAlign),
            "theme" => Some(StyleField::Theme),
            _ => None,
        }
    }
}

/// A block field bound to an edit-mode input.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Field {
    Title,
    Subtitle,
    ImageUrl,
    CtaLabel,
    CtaHref,
    Html,
    Description,
    Label,
    Href,
    Columns,
    Animation,
    Size,
    Autoplay,
    Interval,
    ImageCaption(usize),
    ImageSize(usize),
    Card(usize, CardField),
    Style(StyleField),
}

impl Field {
    /// The `data-field` value for this field.
    pub fn binding(&self) -> String {
        match self {
            Field::Title => "title".into(),
            Field::Subtitle => "subtitle".into(),
            Field::ImageUrl => "imageUrl".into(),
            Field::CtaLabel => "ctaLabel".into(),
            Field::CtaHref => "ctaHref".into(),
            Field::Html => "html".into(),
            Field::Description => "description".into(),
            Field::Label => "label".into(),
            Field::Href => "href".into(),
            Field::Columns => "columns".into(),
            Field::Animation => "animation".into(),
            Field::Size => "size".into(),
            Field::Autoplay => "autoplay".into(),
            Field::Interval => "interval".into(),
            Field::ImageCaption(i) => format!("images.{i}.caption"),
            Field::ImageSize(i) => format!("images.{i}.size"),
            Field::Card(i, f) => format!("cards.{i}.{}", f.as_str()),
            Field::Style(s) => format!("styles.{}", s.as_str()),
        }
    }

    /// Parse a `data-field` value.
    pub fn parse(binding: &str) -> Option<Self> {
        let parts: Vec<&str> = binding.split('.').collect();
        let field = match parts.as_slice() {
            ["title"] => Field::Title,
            ["subtitle"] => Field::Subtitle,
            ["imageUrl"] => Field::ImageUrl,
            ["ctaLabel"] => Field::CtaLabel,
            ["ctaHref"] => Field::CtaHref,
            ["html"] => Field::Html,
            ["description"] => Field::Description,
            ["label"] => Field::Label,
            ["href"] => Field::Href,
            ["columns"] => Field::Columns,
            ["animation"] => Field::Animation,
            ["size"] => Field::Size,
            ["autoplay"] => Field::Autoplay,
            ["interval"] => Field::Interval,
            ["images", i, "caption"] => Field::ImageCaption(i.parse().ok()?),
            ["images", i, "size"] => Field::ImageSize(i.parse().ok()?),
            ["cards", i, f] => Field::Card(i.parse().ok()?, CardField::parse(f)?),
            ["styles", s] => Field::Style(StyleField::parse(s)?),
            _ => return None,
        };
        Some(field)
    }
}

impl std::fmt::Display for Field {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.binding())
    }
}

/// One user edit against a single block.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum EditAction {
    /// Replace a field with the input's current value.
    Set { field: Field, value: String },
    /// Append an image to a gallery or carousel.
    AddImage { url: String },
    RemoveImage { index: usize },
    /// Append an empty card to a cards grid.
    AddCard,
    RemoveCard { index: usize },
    RemoveModalImage { card: usize, index: usize },
}

impl EditAction {
    pub fn set(field: Field, value: impl Into<String>) -> Self {
        EditAction::Set {
            field,
            value: value.into(),
        }
    }

    /// The `data-action` name used on buttons, for actions that have one.
    pub fn name(&self) -> &'static str {
        match self {
            EditAction::Set { .. } => "set",
            EditAction::AddImage { .. } => "add-image",
            EditAction::RemoveImage { .. } => "remove-image",
            EditAction::AddCard => "add-card",
            EditAction::RemoveCard { .. } => "remove-card",
            EditAction::RemoveModalImage { .. } => "remove-modal-image",
        }
    }
}

/// Receives the full updated block after every edit.
pub trait BlockCallbacks {
    fn on_update_block(&mut self, block: Block);
}

impl<F: FnMut(Block)> BlockCallbacks for F {
    fn on_update_block(&mut self, block: Block) {
        self(block)
    }
}

/// Apply `action` to a copy of `block` and emit the result.
///
/// On error nothing is emitted and `block` is untouched.
pub fn dispatch(
    block: &Block,
    action: &EditAction,
    callbacks: &mut dyn BlockCallbacks,
) -> Result<(), EditError> {
    let mut updated = block.clone();
    apply_edit(&mut updated, action)?;
    callbacks.on_update_block(updated);
    Ok(())
}

fn opt(value: &str) -> Option<String> {
    non_empty(Some(value)).map(|_| value.to_string())
}

fn mismatch(field: &Field, block: &Block) -> EditError {
    EditError::FieldMismatch {
        field: field.binding(),
        kind: block.type_tag().to_string(),
    }
}

fn invalid(field: &Field, value: &str) -> EditError {
    EditError::InvalidValue {
        field: field.binding(),
        value: value.to_string(),
    }
}

fn at<T>(items: &mut [T], index: usize) -> Result<&mut T, EditError> {
    let len = items.len();
    items
        .get_mut(index)
        .ok_or(EditError::IndexOutOfRange { index, len })
}

fn parse_enum<T: std::str::FromStr>(field: &Field, value: &str) -> Result<Option<T>, EditError> {
    if value.trim().is_empty() {
        return Ok(None);
    }
    value
        .trim()
        .parse()
        .map(Some)
        .map_err(|_| invalid(field, value))
}

fn parse_flag(field: &Field, value: &str) -> Result<bool, EditError> {
    match value.trim() {
        "true" | "on" | "1" => Ok(true),
        "false" | "off" | "0" | "" => Ok(false),
        _ => Err(invalid(field, value)),
    }
}

/// Apply one edit in place.
pub fn apply_edit(block: &mut Block, action: &EditAction) -> Result<(), EditError> {
    match action {
        EditAction::Set { field, value } => set_field(block, field, value),
        EditAction::AddImage { url } => match block {
            Block::Gallery(b) => {
                b.images.push(ImageItem::new(url.clone()).with_size(SizeTier::Sm));
                Ok(())
            }
            Block::Carousel(b) => {
                b.images.push(ImageItem::new(url.clone()));
                Ok(())
            }
            other => Err(unsupported(action, other)),
        },
        EditAction::RemoveImage { index } => {
            let images = match block {
                Block::Gallery(b) => &mut b.images,
                Block::Carousel(b) => &mut b.images,
                other => return Err(unsupported(action, other)),
            };
            remove_at(images, *index)
        }
        EditAction::AddCard => match block {
            Block::CardsGrid(b) => {
                b.cards.push(Card::new(""));
                Ok(())
            }
            other => Err(unsupported(action, other)),
        },
        EditAction::RemoveCard { index } => match block {
            Block::CardsGrid(b) => remove_at(&mut b.cards, *index),
            other => Err(unsupported(action, other)),
        },
        EditAction::RemoveModalImage { card, index } => match block {
            Block::CardsGrid(b) => remove_at(&mut at(&mut b.cards, *card)?.modal_images, *index),
            other => Err(unsupported(action, other)),
        },
    }
}

fn unsupported(action: &EditAction, block: &Block) -> EditError {
    EditError::UnsupportedAction {
        action: action.name(),
        kind: block.type_tag().to_string(),
    }
}

fn remove_at<T>(items: &mut Vec<T>, index: usize) -> Result<(), EditError> {
    if index >= items.len() {
        return Err(EditError::IndexOutOfRange {
            index,
            len: items.len(),
        });
    }
    items.remove(index);
    Ok(())
}

fn set_field(block: &mut Block, field: &Field, value: &str) -> Result<(), EditError> {
    if let Field::Style(style) = field {
        return set_style(block, field, *style, value);
    }
    match (&mut *block, field) {
        (Block::Hero(b), Field::Title) => b.title = value.to_string(),
        (Block::Hero(b), Field::Subtitle) => b.subtitle = opt(value),
        (Block::Hero(b), Field::ImageUrl) => b.image_url = opt(value),
        (Block::Hero(b), Field::CtaLabel) => b.cta_label = opt(value),
        (Block::Hero(b), Field::CtaHref) => b.cta_href = opt(value),

        (Block::RichText(b), Field::Html) => b.html = value.to_string(),

        (Block::Gallery(b), Field::Title) => b.title = opt(value),
        (Block::Gallery(b), Field::Columns) => {
            let n: i64 = value.trim().parse().map_err(|_| invalid(field, value))?;
            b.columns = Some(i64::from(GALLERY_COLUMNS.clamp(Some(n))));
        }
        (Block::Gallery(b), Field::ImageCaption(i)) => at(&mut b.images, *i)?.caption = opt(value),
        (Block::Gallery(b), Field::ImageSize(i)) => {
            let size = parse_enum::<SizeTier>(field, value)?;
            at(&mut b.images, *i)?.size = size;
        }

        (Block::Carousel(b), Field::Title) => b.title = opt(value),
        (Block::Carousel(b), Field::Animation) => {
            b.animation = parse_enum::<CarouselAnimation>(field, value)?;
        }
        (Block::Carousel(b), Field::Size) => b.size = parse_enum::<SizeTier>(field, value)?,
        (Block::Carousel(b), Field::Autoplay) => b.autoplay = parse_flag(field, value)?,
        (Block::Carousel(b), Field::Interval) => {
            b.interval = if value.trim().is_empty() {
                None
            } else {
                Some(value.trim().parse().map_err(|_| invalid(field, value))?)
            };
        }
        (Block::Carousel(b), Field::ImageCaption(i)) => {
            at(&mut b.images, *i)?.caption = opt(value)
        }

        (Block::CardsGrid(b), Field::Title) => b.title = opt(value),
        (Block::CardsGrid(b), Field::Columns) => {
            let n: i64 = value.trim().parse().map_err(|_| invalid(field, value))?;
            b.columns = Some(i64::from(CARDS_COLUMNS.clamp(Some(n))));
        }
        (Block::CardsGrid(b), Field::Card(i, card_field)) => {
            set_card_field(at(&mut b.cards, *i)?, field, *card_field, value)?
        }

        (Block::Cta(b), Field::Title) => b.title = value.to_string(),
        (Block::Cta(b), Field::Description) => b.description = opt(value),
        (Block::Cta(b), Field::ImageUrl) => b.image_url = opt(value),
        (Block::Cta(b), Field::Label) => b.label = opt(value),
        (Block::Cta(b), Field::Href) => b.href = opt(value),

        (other, _) => return Err(mismatch(field, other)),
    }
    Ok(())
}

fn set_card_field(
    card: &mut Card,
    field: &Field,
    card_field: CardField,
    value: &str,
) -> Result<(), EditError> {
    match card_field {
        CardField::Title => card.title = value.to_string(),
        CardField::Description => card.description = opt(value),
        CardField::ImageUrl => card.image_url = opt(value),
        CardField::ButtonText => card.button_text = opt(value),
        CardField::ModalTitle => card.modal_title = opt(value),
        CardField::ModalContent => card.modal_content = opt(value),
        CardField::TitleFont => card.title_font = opt(value),
        CardField::DescFont => card.desc_font = opt(value),
        CardField::TitleSize => card.title_size = opt(value),
        CardField::DescSize => card.desc_size = opt(value),
        CardField::Featured => card.featured = parse_flag(field, value)?,
    }
    Ok(())
}

fn set_style(
    block: &mut Block,
    field: &Field,
    style: StyleField,
    value: &str,
) -> Result<(), EditError> {
    let slot = match block {
        Block::Hero(b) => &mut b.styles,
        Block::RichText(b) => &mut b.styles,
        Block::Gallery(b) => &mut b.styles,
        Block::Carousel(b) => &mut b.styles,
        Block::CardsGrid(b) => &mut b.styles,
        Block::Cta(b) => &mut b.styles,
        other => return Err(mismatch(field, other)),
    };
    let mut styles = slot.clone().unwrap_or_default();
    match style {
        StyleField::PaddingY => styles.padding_y = parse_enum(field, value)?,
        StyleField::Animation => styles.animation = parse_enum(field, value)?,
        StyleField::TextAlign => styles.text_align = parse_enum(field, value)?,
        StyleField::Theme => styles.theme = parse_enum(field, value)?,
    }
    *slot = (!styles.is_empty()).then_some(styles);
    Ok(())
}

/// Where an uploaded image URL is written.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ImageSlot {
    /// `imageUrl` of a hero or CTA.
    Primary,
    /// New entry at the end of a gallery or carousel.
    AppendImage,
    /// `imageUrl` of the card at this index.
    CardImage(usize),
    /// New modal image on the card at this index.
    AppendModalImage(usize),
}

impl ImageSlot {
    /// The `data-upload` value for this slot.
    pub fn binding(&self) -> String {
        match self {
            ImageSlot::Primary => "primary".into(),
            ImageSlot::AppendImage => "append-image".into(),
            ImageSlot::CardImage(i) => format!("card-image:{i}"),
            ImageSlot::AppendModalImage(i) => format!("modal-image:{i}"),
        }
    }

    pub fn parse(binding: &str) -> Option<Self> {
        match binding.split_once(':') {
            None if binding == "primary" => Some(ImageSlot::Primary),
            None if binding == "append-image" => Some(ImageSlot::AppendImage),
            Some(("card-image", i)) => i.parse().ok().map(ImageSlot::CardImage),
            Some(("modal-image", i)) => i.parse().ok().map(ImageSlot::AppendModalImage),
            _ => None,
        }
    }

    /// Whether this slot exists on `block`.
    pub fn accepts(&self, block: &Block) -> bool {
        match (self, block) {
            (ImageSlot::Primary, Block::Hero(_) | Block::Cta(_)) => true,
            (ImageSlot::AppendImage, Block::Gallery(_) | Block::Carousel(_)) => true,
            (ImageSlot::CardImage(i) | ImageSlot::AppendModalImage(i), Block::CardsGrid(b)) => {
                *i < b.cards.len()
            }
            _ => false,
        }
    }
}

/// Write an uploaded URL into `slot`.
pub fn apply_upload(block: &mut Block, slot: ImageSlot, url: &str) -> Result<(), EditError> {
    if !slot.accepts(block) {
        return Err(EditError::SlotMismatch {
            slot: slot.binding(),
            kind: block.type_tag().to_string(),
        });
    }
    if slot == ImageSlot::AppendImage {
        return apply_edit(block, &EditAction::AddImage { url: url.to_string() });
    }
    match (block, slot) {
        (Block::Hero(b), ImageSlot::Primary) => b.image_url = Some(url.to_string()),
        (Block::Cta(b), ImageSlot::Primary) => b.image_url = Some(url.to_string()),
        (Block::CardsGrid(b), ImageSlot::CardImage(i)) => {
            at(&mut b.cards, i)?.image_url = Some(url.to_string())
        }
        (Block::CardsGrid(b), ImageSlot::AppendModalImage(i)) => {
            at(&mut b.cards, i)?.modal_images.push(url.to_string())
        }
        _ => {}
    }
    Ok(())
}

/// A file picked in an upload affordance.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UploadFile {
    pub name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl UploadFile {
    pub fn new(name: impl Into<String>, content_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            content_type: content_type.into(),
            bytes,
        }
    }

    pub fn is_image(&self) -> bool {
        self.content_type.starts_with("image/")
    }
}

/// Result of a successful upload.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UploadedImage {
    pub url: String,
}

#[derive(thiserror::Error, Debug)]
pub enum UploadError {
    #[error("upload rejected: {0}")]
    Rejected(String),

    #[error("upload service unavailable: {0}")]
    Unavailable(String),

    #[error("upload I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Image upload collaborator.
#[async_trait]
pub trait UploadService: Send + Sync {
    async fn upload(&self, file: UploadFile) -> Result<UploadedImage, UploadError>;
}

/// Upload `file` and return `block` with the URL written into `slot`.
///
/// The upload completes before any field changes; on failure the caller's
/// block is left exactly as it was.
pub async fn upload_into(
    block: &Block,
    slot: ImageSlot,
    file: UploadFile,
    uploader: &dyn UploadService,
) -> Result<Block, EditError> {
    if !slot.accepts(block) {
        return Err(EditError::SlotMismatch {
            slot: slot.binding(),
            kind: block.type_tag().to_string(),
        });
    }
    let name = file.name.clone();
    let uploaded = uploader.upload(file).await.map_err(|e| {
        warn!(block = %block.id(), file = %name, error = %e, "image upload failed");
        EditError::Upload(e)
    })?;
    let mut updated = block.clone();
    apply_upload(&mut updated, slot, &uploaded.url)?;
    Ok(updated)
}

#[cfg(test)]
mod tests {
    use super::*;
    use munipage_types::{CardsGridBlock, CtaBlock, GalleryBlock, HeroBlock, RichTextBlock};
    use serde_json::json;

    fn gallery() -> Block {
        Block::Gallery(
            serde_json::from_value::<GalleryBlock>(json!({
                "id": "g",
                "images": [
                    {"url": "https://res.cloudinary.com/a.jpg"},
                    {"url": "https://res.cloudinary.com/b.jpg"}
                ]
            }))
            .unwrap(),
        )
    }

    fn grid() -> Block {
        Block::CardsGrid(
            serde_json::from_value::<CardsGridBlock>(json!({
                "id": "cg",
                "cards": [{"id": "c1", "title": "Uno", "modalImages": ["https://res.cloudinary.com/m.jpg"]}]
            }))
            .unwrap(),
        )
    }

    #[test]
    fn test_field_binding_round_trip() {
        let fields = [
            Field::Title,
            Field::CtaHref,
            Field::ImageCaption(3),
            Field::ImageSize(0),
            Field::Card(2, CardField::ModalContent),
            Field::Style(StyleField::TextAlign),
        ];
        for field in fields {
            assert_eq!(Field::parse(&field.binding()), Some(field));
        }
        assert_eq!(Field::parse("images.x.caption"), None);
        assert_eq!(Field::parse("cards.0.nope"), None);
        assert_eq!(Field::parse(""), None);
    }

    #[test]
    fn test_dispatch_emits_full_block() {
        let hero = Block::from(HeroBlock::new("Viejo"));
        let mut emitted = Vec::new();
        dispatch(
            &hero,
            &EditAction::set(Field::Title, "Nuevo"),
            &mut |b: Block| emitted.push(b),
        )
        .unwrap();
        assert_eq!(emitted.len(), 1);
        let Block::Hero(updated) = &emitted[0] else { panic!("expected hero") };
        assert_eq!(updated.title, "Nuevo");
        assert_eq!(updated.id, *hero.id());
    }

    #[test]
    fn test_dispatch_error_emits_nothing() {
        let text = Block::from(RichTextBlock::new("<p>x</p>"));
        let mut count = 0;
        let err = dispatch(
            &text,
            &EditAction::set(Field::CtaLabel, "x"),
            &mut |_: Block| count += 1,
        )
        .unwrap_err();
        assert!(matches!(err, EditError::FieldMismatch { .. }));
        assert_eq!(count, 0);
    }

    #[test]
    fn test_empty_optional_clears() {
        let mut hero = Block::from(HeroBlock::new("T"));
        apply_edit(&mut hero, &EditAction::set(Field::Subtitle, "Sub")).unwrap();
        apply_edit(&mut hero, &EditAction::set(Field::Subtitle, "  ")).unwrap();
        let Block::Hero(h) = hero else { panic!() };
        assert_eq!(h.subtitle, None);
    }

    #[test]
    fn test_list_add_remove() {
        let mut g = gallery();
        apply_edit(&mut g, &EditAction::RemoveImage { index: 0 }).unwrap();
        apply_edit(&mut g, &EditAction::AddImage { url: "https://res.cloudinary.com/c.jpg".into() }).unwrap();
        let Block::Gallery(b) = &g else { panic!() };
        let urls: Vec<_> = b.images.iter().map(|i| i.url.as_str()).collect();
        assert_eq!(urls, vec!["https://res.cloudinary.com/b.jpg", "https://res.cloudinary.com/c.jpg"]);
        assert_eq!(b.images[1].size, Some(SizeTier::Sm));

        let err = apply_edit(&mut g, &EditAction::RemoveImage { index: 9 }).unwrap_err();
        assert!(matches!(err, EditError::IndexOutOfRange { index: 9, len: 2 }));
    }

    #[test]
    fn test_columns_clamped_on_set() {
        let mut g = gallery();
        apply_edit(&mut g, &EditAction::set(Field::Columns, "7")).unwrap();
        let Block::Gallery(b) = &g else { panic!() };
        assert_eq!(b.columns, Some(4));

        let mut c = grid();
        apply_edit(&mut c, &EditAction::set(Field::Columns, "1")).unwrap();
        let Block::CardsGrid(b) = &c else { panic!() };
        assert_eq!(b.columns, Some(2));

        assert!(matches!(
            apply_edit(&mut c, &EditAction::set(Field::Columns, "many")),
            Err(EditError::InvalidValue { .. })
        ));
    }

    #[test]
    fn test_card_fields() {
        let mut c = grid();
        apply_edit(&mut c, &EditAction::set(Field::Card(0, CardField::Featured), "true")).unwrap();
        apply_edit(&mut c, &EditAction::set(Field::Card(0, CardField::ModalTitle), "Más")).unwrap();
        apply_edit(&mut c, &EditAction::AddCard).unwrap();
        apply_edit(&mut c, &EditAction::RemoveModalImage { card: 0, index: 0 }).unwrap();
        let Block::CardsGrid(b) = &c else { panic!() };
        assert!(b.cards[0].featured);
        assert_eq!(b.cards[0].modal_title.as_deref(), Some("Más"));
        assert!(b.cards[0].modal_images.is_empty());
        assert_eq!(b.cards.len(), 2);
        assert_ne!(b.cards[0].id, b.cards[1].id);
    }

    #[test]
    fn test_style_override_set_and_clear() {
        let mut cta = Block::Cta(
            serde_json::from_value::<CtaBlock>(json!({"id": "c", "title": "T"})).unwrap(),
        );
        apply_edit(&mut cta, &EditAction::set(Field::Style(StyleField::Theme), "dark")).unwrap();
        assert!(cta.styles().is_some());
        apply_edit(&mut cta, &EditAction::set(Field::Style(StyleField::Theme), "")).unwrap();
        assert!(cta.styles().is_none());
        assert!(matches!(
            apply_edit(&mut cta, &EditAction::set(Field::Style(StyleField::Theme), "neon")),
            Err(EditError::InvalidValue { .. })
        ));
    }

    #[test]
    fn test_image_slot_binding() {
        for slot in [
            ImageSlot::Primary,
            ImageSlot::AppendImage,
            ImageSlot::CardImage(1),
            ImageSlot::AppendModalImage(0),
        ] {
            assert_eq!(ImageSlot::parse(&slot.binding()), Some(slot));
        }
        assert_eq!(ImageSlot::parse("card-image:x"), None);
    }

    #[test]
    fn test_apply_upload_slots() {
        let mut c = grid();
        apply_upload(&mut c, ImageSlot::CardImage(0), "https://res.cloudinary.com/n.jpg").unwrap();
        apply_upload(&mut c, ImageSlot::AppendModalImage(0), "https://res.cloudinary.com/o.jpg").unwrap();
        let Block::CardsGrid(b) = &c else { panic!() };
        assert_eq!(b.cards[0].image_url.as_deref(), Some("https://res.cloudinary.com/n.jpg"));
        assert_eq!(b.cards[0].modal_images.len(), 2);

        assert!(matches!(
            apply_upload(&mut c, ImageSlot::CardImage(5), "u"),
            Err(EditError::SlotMismatch { .. })
        ));
        let mut text = Block::from(RichTextBlock::new(""));
        assert!(apply_upload(&mut text, ImageSlot::Primary, "u").is_err());
    }

    struct FixedUploader(Result<String, String>);

    #[async_trait]
    impl UploadService for FixedUploader {
        async fn upload(&self, _file: UploadFile) -> Result<UploadedImage, UploadError> {
            match &self.0 {
                Ok(url) => Ok(UploadedImage { url: url.clone() }),
                Err(msg) => Err(UploadError::Rejected(msg.clone())),
            }
        }
    }

    fn png() -> UploadFile {
        UploadFile::new("foto.png", "image/png", vec![0x89, b'P', b'N', b'G'])
    }

    #[tokio::test]
    async fn test_upload_into_success() {
        let hero = Block::from(HeroBlock::new("T"));
        let uploader = FixedUploader(Ok("https://res.cloudinary.com/new.jpg".into()));
        let updated = upload_into(&hero, ImageSlot::Primary, png(), &uploader).await.unwrap();
        let Block::Hero(h) = updated else { panic!() };
        assert_eq!(h.image_url.as_deref(), Some("https://res.cloudinary.com/new.jpg"));
    }

    #[tokio::test]
    async fn test_upload_failure_keeps_block() {
        let mut hero = HeroBlock::new("T");
        hero.image_url = Some("https://res.cloudinary.com/old.jpg".into());
        let hero = Block::from(hero);
        let before = hero.clone();
        let uploader = FixedUploader(Err("too large".into()));
        let err = upload_into(&hero, ImageSlot::Primary, png(), &uploader).await.unwrap_err();
        assert!(matches!(err, EditError::Upload(UploadError::Rejected(_))));
        assert_eq!(hero, before);
    }
}
