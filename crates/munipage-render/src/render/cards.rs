//! Cards grid and its "Leer más" modal.

use munipage_types::{Card, CardsGridBlock, non_empty};

use super::{
    REMOVE_BUTTON_CLASS, RenderContext, action_button, checkbox, file_input, image, no_image,
    select, text_input, textarea,
};
use crate::edit::{CardField, Field, ImageSlot};
use crate::ir::{Element, Node};
use crate::layout::{CARDS_COLUMNS, grid_cols_class};
use crate::style::ResolvedStyles;

const CARD_IMAGE_WIDTH: u32 = 600;
const MODAL_IMAGE_WIDTH: u32 = 1200;

const SMALL_INPUT_CLASS: &str = "w-full rounded border border-slate-200 px-2 py-1 text-xs";

/// Inline `font-family` / `font-size` declarations for a card text element.
///
/// Values that could break out of the declaration are dropped.
pub fn css_declarations(font: Option<&str>, size: Option<&str>) -> Option<String> {
    let family = non_empty(font)
        .map(str::trim)
        .filter(|f| f.chars().all(|c| c.is_alphanumeric() || " -_,'".contains(c)));
    let size = non_empty(size)
        .map(str::trim)
        .filter(|s| s.chars().all(|c| c.is_ascii_alphanumeric() || ".%".contains(c)));
    let decls: Vec<String> = family
        .map(|f| format!("font-family: {f}"))
        .into_iter()
        .chain(size.map(|s| format!("font-size: {s}")))
        .collect();
    (!decls.is_empty()).then(|| decls.join("; "))
}

pub(super) fn render(
    block: &CardsGridBlock,
    styles: &ResolvedStyles,
    ctx: &RenderContext<'_>,
) -> Option<Node> {
    let columns = CARDS_COLUMNS.clamp(block.columns);
    let section = Element::new("section")
        .class("space-y-4")
        .class(styles.classes());
    let grid = Element::new("div")
        .class("grid gap-6 grid-cols-1 sm:grid-cols-2")
        .class(grid_cols_class(columns));

    if ctx.is_edit() {
        return Some(edit(block, section, grid, columns, ctx).into());
    }

    let heading = block
        .title
        .as_deref()
        .filter(|t| !t.trim().is_empty())
        .map(|t| {
            Element::new("h3")
                .class("text-xl font-semibold text-slate-900")
                .text(t)
        });
    let grid = grid.children(block.cards.iter().map(|card| card_view(card, ctx)));
    let modal = ctx
        .modal
        .open_in(&block.id)
        .and_then(|card_id| block.card(card_id))
        .map(|card| modal_view(card, ctx));

    Some(section.opt_child(heading).child(grid).opt_child(modal).into())
}

fn card_view(card: &Card, ctx: &RenderContext<'_>) -> Element {
    let picture = image(
        ctx,
        card.image_url.as_deref(),
        CARD_IMAGE_WIDTH,
        &card.title,
        "h-full w-full object-cover transition-transform duration-500 group-hover:scale-105",
    )
    .map(|img| {
        Element::new("div")
            .class("relative h-48 w-full overflow-hidden bg-slate-100")
            .child(img)
    });
    let description = non_empty(card.description.as_deref()).map(|d| {
        Element::new("p")
            .class("mt-2 text-sm text-slate-600 line-clamp-3")
            .opt_attr(
                "style",
                css_declarations(card.desc_font.as_deref(), card.desc_size.as_deref()),
            )
            .text(d)
    });
    let button_label = non_empty(card.button_text.as_deref()).unwrap_or("Leer más");
    let body = Element::new("div")
        .class("flex flex-1 flex-col p-5")
        .child(
            Element::new("h4")
                .class("text-lg font-bold text-slate-900")
                .opt_attr(
                    "style",
                    css_declarations(card.title_font.as_deref(), card.title_size.as_deref()),
                )
                .text(&card.title),
        )
        .opt_child(description)
        .child(
            Element::new("div").class("mt-auto pt-4").child(
                action_button(
                    "open-modal",
                    &format!("{button_label} →"),
                    "text-sm font-semibold text-sky-600 hover:text-sky-700 hover:underline",
                )
                .attr("data-card", card.id.as_str()),
            ),
        );
    Element::new("article")
        .attr("data-card-id", card.id.as_str())
        .class("group flex flex-col overflow-hidden rounded-2xl bg-white shadow-sm transition-all hover:shadow-md border border-slate-100")
        .opt_child(picture)
        .child(body)
}

fn modal_view(card: &Card, ctx: &RenderContext<'_>) -> Element {
    let title = card.effective_modal_title();
    let images: Vec<Element> = card
        .effective_modal_images()
        .into_iter()
        .filter_map(|url| image(ctx, Some(url), MODAL_IMAGE_WIDTH, "", "h-full w-full object-cover"))
        .map(|img| {
            Element::new("div")
                .class("relative aspect-square rounded-lg overflow-hidden bg-slate-100")
                .child(img)
        })
        .collect();
    let gallery = (!images.is_empty())
        .then(|| Element::new("div").class("grid grid-cols-3 gap-2").children(images));

    // Modal HTML is sanitized upstream; the description fallback is plain text.
    let body = match non_empty(card.modal_content.as_deref()) {
        Some(html) => Element::new("div").child(Node::Raw(html.to_string())),
        None => Element::new("div").opt_child(
            card.effective_modal_body()
                .map(|text| Element::new("p").text(text)),
        ),
    }
    .class("prose prose-slate max-w-none text-slate-600");

    let dialog = Element::new("div")
        .class("relative max-h-[90vh] w-full max-w-4xl overflow-y-auto rounded-2xl bg-white p-6 shadow-xl")
        .child(
            Element::new("div")
                .class("flex items-start justify-between gap-4")
                .child(
                    Element::new("h2")
                        .attr("id", format!("modal-{}", card.id.as_str()))
                        .class("text-3xl font-bold text-slate-900 font-serif leading-tight")
                        .text(title),
                )
                .child(action_button("close-modal", "Cerrar", "text-sm text-slate-500 hover:text-slate-700")),
        )
        .child(
            Element::new("div")
                .class("grid grid-cols-1 md:grid-cols-[1.2fr_2fr] gap-8 mt-4")
                .child(Element::new("div").class("space-y-4").opt_child(gallery))
                .child(
                    Element::new("div")
                        .class("space-y-4")
                        .child(Element::new("div").class("h-1 w-20 bg-sky-500 rounded-full"))
                        .child(body),
                ),
        );

    Element::new("div")
        .attr("role", "dialog")
        .attr("aria-modal", "true")
        .attr("aria-labelledby", format!("modal-{}", card.id.as_str()))
        .attr("data-modal-card", card.id.as_str())
        .class("fixed inset-0 z-50 flex items-center justify-center bg-black/60 p-4")
        .child(dialog)
}

fn edit(
    block: &CardsGridBlock,
    section: Element,
    grid: Element,
    columns: u8,
    ctx: &RenderContext<'_>,
) -> Element {
    let header = Element::new("div")
        .class("flex items-center justify-between")
        .child(text_input(
            Field::Title,
            block.title.as_deref().unwrap_or_default(),
            "Título de la sección (opcional)",
            "bg-transparent text-xl font-semibold text-slate-900 rounded px-1 -ml-1",
        ))
        .child(select(
            Field::Columns,
            CARDS_COLUMNS
                .options()
                .map(|n| (n.to_string(), columns_label(n))),
            &columns.to_string(),
            "text-xs border-slate-200 rounded py-1",
        ));

    let cards = block
        .cards
        .iter()
        .enumerate()
        .map(|(idx, card)| card_editor(idx, card, ctx));

    section
        .class("rounded-xl border border-dashed border-slate-200 p-4")
        .child(header)
        .child(grid.children(cards))
        .child(action_button(
            "add-card",
            "+ Agregar tarjeta",
            "rounded-full border border-slate-200 px-3 py-1 text-xs font-semibold text-slate-600",
        ))
}

fn card_editor(idx: usize, card: &Card, ctx: &RenderContext<'_>) -> Element {
    let field = |f: CardField| Field::Card(idx, f);
    let value = |v: &Option<String>| v.as_deref().unwrap_or_default().to_string();

    let mut picture = Element::new("div")
        .class("relative h-40 w-full overflow-hidden rounded-lg bg-slate-100 group/card")
        .child(
            image(ctx, card.image_url.as_deref(), CARD_IMAGE_WIDTH, &card.title, "h-full w-full object-cover")
                .unwrap_or_else(no_image),
        );
    if ctx.show_uploads() {
        picture = picture.child(
            Element::new("label")
                .class("absolute inset-0 flex items-center justify-center bg-black/30 opacity-0 group-hover/card:opacity-100 cursor-pointer transition-opacity text-white text-xs font-semibold")
                .text("Cambiar")
                .child(file_input(ImageSlot::CardImage(idx))),
        );
    }

    let modal_images = card.modal_images.iter().enumerate().map(|(j, url)| {
        Element::new("div")
            .class("relative h-16 w-16 overflow-hidden rounded bg-slate-100")
            .child(
                image(ctx, Some(url.as_str()), CARD_IMAGE_WIDTH, "", "h-full w-full object-cover")
                    .unwrap_or_else(no_image),
            )
            .child(
                action_button("remove-modal-image", "×", REMOVE_BUTTON_CLASS)
                    .attr("data-card", idx.to_string())
                    .attr("data-index", j.to_string()),
            )
    });
    let mut modal_strip = Element::new("div")
        .class("flex flex-wrap gap-2")
        .children(modal_images);
    if ctx.show_uploads() {
        modal_strip = modal_strip.child(
            Element::new("label")
                .class("flex h-16 w-16 items-center justify-center rounded border-2 border-dashed border-slate-300 text-slate-400 cursor-pointer")
                .text("+")
                .child(file_input(ImageSlot::AppendModalImage(idx))),
        );
    }

    let typography = Element::new("div")
        .class("grid grid-cols-2 gap-2")
        .child(text_input(field(CardField::TitleFont), &value(&card.title_font), "Fuente título", SMALL_INPUT_CLASS))
        .child(text_input(field(CardField::TitleSize), &value(&card.title_size), "Tamaño título", SMALL_INPUT_CLASS))
        .child(text_input(field(CardField::DescFont), &value(&card.desc_font), "Fuente descripción", SMALL_INPUT_CLASS))
        .child(text_input(field(CardField::DescSize), &value(&card.desc_size), "Tamaño descripción", SMALL_INPUT_CLASS));

    let modal = Element::new("details")
        .class("rounded border border-slate-200 p-2")
        .child(Element::new("summary").class("cursor-pointer text-xs font-semibold text-slate-600").text("Modal \"Leer más\""))
        .child(text_input(field(CardField::ModalTitle), &value(&card.modal_title), "Título del modal", SMALL_INPUT_CLASS))
        .child(textarea(field(CardField::ModalContent), &value(&card.modal_content), "Contenido del modal (HTML)", 4, SMALL_INPUT_CLASS))
        .child(modal_strip);

    Element::new("article")
        .attr("data-card-id", card.id.as_str())
        .class("space-y-2 rounded-2xl border border-slate-200 bg-white p-3 shadow-sm")
        .child(picture)
        .child(text_input(field(CardField::Title), &card.title, "Título", "w-full rounded px-1 text-lg font-bold text-slate-900"))
        .child(textarea(field(CardField::Description), &value(&card.description), "Descripción", 3, SMALL_INPUT_CLASS))
        .child(text_input(field(CardField::ButtonText), &value(&card.button_text), "Leer más", SMALL_INPUT_CLASS))
        .child(checkbox(field(CardField::Featured), card.featured, "Destacar en la portada"))
        .child(typography)
        .child(modal)
        .child(
            action_button("remove-card", "Eliminar tarjeta", "text-xs font-semibold text-red-600")
                .attr("data-index", idx.to_string()),
        )
}

fn columns_label(n: u8) -> &'static str {
    match n {
        2 => "2 Cols",
        3 => "3 Cols",
        _ => "4 Cols",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::image::ImagePolicy;
    use crate::render::ModalState;
    use munipage_types::{Block, BlockId, CardId};
    use serde_json::json;

    fn grid() -> CardsGridBlock {
        serde_json::from_value(json!({
            "id": "cg",
            "title": "Escuelas",
            "columns": 9,
            "cards": [
                {
                    "id": "a",
                    "title": "Fútbol",
                    "description": "Sub 12 & sub 14",
                    "imageUrl": "https://res.cloudinary.com/demo/image/upload/a.jpg",
                    "titleFont": "Georgia",
                    "titleSize": "1.5rem"
                },
                {
                    "id": "b",
                    "title": "Hockey",
                    "buttonText": "Ver horarios",
                    "modalTitle": "Horarios de hockey",
                    "modalContent": "<p>Lunes <b>18hs</b></p>",
                    "modalImages": ["https://res.cloudinary.com/m1.jpg", "https://evil.example/m2.jpg"]
                }
            ]
        }))
        .unwrap()
    }

    fn run(b: &CardsGridBlock, ctx: &RenderContext<'_>) -> Node {
        let styles = ResolvedStyles::for_block(&Block::from(b.clone()));
        render(b, &styles, ctx).unwrap()
    }

    #[test]
    fn test_css_declarations() {
        assert_eq!(
            css_declarations(Some("Georgia"), Some("18px")).as_deref(),
            Some("font-family: Georgia; font-size: 18px")
        );
        assert_eq!(css_declarations(None, Some("2rem")).as_deref(), Some("font-size: 2rem"));
        assert_eq!(css_declarations(Some("x; background: url(evil)"), None), None);
        assert_eq!(css_declarations(Some(" "), Some("")), None);
    }

    #[test]
    fn test_display_cards() {
        let policy = ImagePolicy::default();
        let node = run(&grid(), &RenderContext::display(&policy));
        let html = node.to_html();
        assert!(html.contains("md:grid-cols-4"));
        assert!(html.contains("style=\"font-family: Georgia; font-size: 1.5rem\""));
        assert!(html.contains("Sub 12 &amp; sub 14"));
        assert!(html.contains("Leer más →"));
        assert!(html.contains("Ver horarios →"));
        assert!(node.find_all(&|el| el.get_attr("role") == Some("dialog")).is_empty());
    }

    #[test]
    fn test_modal_uses_modal_fields() {
        let policy = ImagePolicy::default();
        let mut modal = ModalState::default();
        modal.open(BlockId::parse("cg").unwrap(), CardId::parse("b").unwrap());
        let node = run(&grid(), &RenderContext::display(&policy).with_modal(&modal));
        let dialogs = node.find_all(&|el| el.get_attr("role") == Some("dialog"));
        assert_eq!(dialogs.len(), 1);
        let dialog = Node::Element(dialogs[0].clone());
        let html = dialog.to_html();
        assert!(html.contains("Horarios de hockey"));
        assert!(html.contains("<p>Lunes <b>18hs</b></p>"));
        assert_eq!(dialog.find_all(&|el| el.tag == "img").len(), 1);
    }

    #[test]
    fn test_modal_falls_back_to_card() {
        let policy = ImagePolicy::default();
        let mut modal = ModalState::default();
        modal.open(BlockId::parse("cg").unwrap(), CardId::parse("a").unwrap());
        let node = run(&grid(), &RenderContext::display(&policy).with_modal(&modal));
        let dialogs = node.find_all(&|el| el.get_attr("role") == Some("dialog"));
        let dialog = Node::Element(dialogs[0].clone());
        let html = dialog.to_html();
        assert!(html.contains("Fútbol"));
        // Description is plain text, escaped.
        assert!(html.contains("<p>Sub 12 &amp; sub 14</p>"));
        assert_eq!(dialog.find_all(&|el| el.tag == "img").len(), 1);
    }

    #[test]
    fn test_modal_for_other_block_ignored() {
        let policy = ImagePolicy::default();
        let mut modal = ModalState::default();
        modal.open(BlockId::parse("other").unwrap(), CardId::parse("a").unwrap());
        let node = run(&grid(), &RenderContext::display(&policy).with_modal(&modal));
        assert!(node.find_all(&|el| el.get_attr("role") == Some("dialog")).is_empty());
    }

    #[test]
    fn test_edit_card_bindings() {
        let policy = ImagePolicy::default();
        let node = run(&grid(), &RenderContext::edit(&policy));
        for binding in ["cards.0.title", "cards.1.modalContent", "cards.1.featured", "cards.0.descSize"] {
            assert_eq!(
                node.find_all(&|el| el.get_attr("data-field") == Some(binding)).len(),
                1,
                "{binding}"
            );
        }
        assert_eq!(
            node.find_all(&|el| el.get_attr("data-upload") == Some("modal-image:1")).len(),
            1
        );
        let removes = node.find_all(&|el| el.get_attr("data-action") == Some("remove-modal-image"));
        assert_eq!(removes.len(), 2);
        assert_eq!(removes[1].get_attr("data-index"), Some("1"));
        assert_eq!(
            node.find_all(&|el| el.get_attr("data-action") == Some("add-card")).len(),
            1
        );
    }
}
