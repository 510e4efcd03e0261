use munipage_types::{CtaBlock, non_empty};

use super::{RenderContext, file_input, image, no_image, text_input, textarea};
use crate::edit::{Field, ImageSlot};
use crate::ir::{Element, Node};
use crate::style::ResolvedStyles;

const CTA_IMAGE_WIDTH: u32 = 200;

pub(super) fn render(
    block: &CtaBlock,
    styles: &ResolvedStyles,
    ctx: &RenderContext<'_>,
) -> Option<Node> {
    let section = Element::new("section")
        .class("rounded-2xl border border-slate-200 p-6 flex flex-col md:flex-row gap-4 items-center")
        .class(styles.classes());
    let picture = image(
        ctx,
        block.image_url.as_deref(),
        CTA_IMAGE_WIDTH,
        &block.title,
        "h-full w-full object-cover",
    );

    if ctx.is_edit() {
        let mut avatar = Element::new("div")
            .class("relative h-24 w-24 flex-shrink-0 overflow-hidden rounded-full bg-slate-200 group-hover/cta:ring-2 ring-sky-500/50 transition-all")
            .child(picture.unwrap_or_else(no_image));
        if ctx.show_uploads() {
            avatar = avatar.child(
                Element::new("label")
                    .class("absolute inset-0 flex items-center justify-center bg-black/30 opacity-0 group-hover/cta:opacity-100 cursor-pointer transition-opacity text-white text-xs font-semibold")
                    .text("Cambiar")
                    .child(file_input(ImageSlot::Primary)),
            );
        }
        let text = Element::new("div")
            .class("flex-1 space-y-1 w-full")
            .child(text_input(
                Field::Title,
                &block.title,
                "Título CTA",
                "w-full bg-transparent text-xl font-semibold text-slate-900 rounded px-1 -ml-1",
            ))
            .child(textarea(
                Field::Description,
                block.description.as_deref().unwrap_or_default(),
                "Descripción",
                2,
                "w-full bg-transparent text-sm text-slate-600 resize-none rounded px-1 -ml-1",
            ));
        let button = Element::new("div")
            .class("flex flex-col gap-2 items-end")
            .child(text_input(
                Field::Label,
                block.label.as_deref().unwrap_or_default(),
                "Texto Botón",
                "rounded-full bg-sky-600 px-4 py-2 text-white font-semibold shadow text-center w-32",
            ))
            .child(text_input(
                Field::Href,
                block.href.as_deref().unwrap_or_default(),
                "Enlace (ej: /registro)",
                "text-xs text-slate-400 text-right bg-transparent",
            ));
        return Some(
            section
                .class("group/cta relative")
                .child(avatar)
                .child(text)
                .child(button)
                .into(),
        );
    }

    let avatar = picture.map(|img| {
        Element::new("div")
            .class("relative h-24 w-24 overflow-hidden rounded-full bg-slate-200")
            .child(img)
    });
    let description = non_empty(block.description.as_deref())
        .map(|d| Element::new("p").class("text-sm text-slate-600").text(d));
    let button = block.button().map(|(label, href)| {
        Element::new("a")
            .attr("href", href)
            .class("rounded-full bg-sky-600 px-4 py-2 text-white font-semibold shadow hover:bg-sky-700")
            .text(label)
    });
    Some(
        section
            .opt_child(avatar)
            .child(
                Element::new("div")
                    .class("flex-1 space-y-1")
                    .child(
                        Element::new("h3")
                            .class("text-xl font-semibold text-slate-900")
                            .text(&block.title),
                    )
                    .opt_child(description),
            )
            .opt_child(button)
            .into(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::image::ImagePolicy;
    use munipage_types::Block;
    use serde_json::json;

    fn run(v: serde_json::Value, edit: bool) -> Node {
        let policy = ImagePolicy::default();
        let block: CtaBlock = serde_json::from_value(v).unwrap();
        let styles = ResolvedStyles::for_block(&Block::from(block.clone()));
        let ctx = if edit {
            RenderContext::edit(&policy)
        } else {
            RenderContext::display(&policy)
        };
        render(&block, &styles, &ctx).unwrap()
    }

    #[test]
    fn test_display_button_needs_label_and_href() {
        let html = run(json!({"id": "c", "title": "Sumate", "label": "Inscribirme"}), false).to_html();
        assert!(!html.contains("<a "));
        let html = run(
            json!({"id": "c", "title": "Sumate", "label": "Inscribirme", "href": "/registro"}),
            false,
        )
        .to_html();
        assert!(html.contains("<a href=\"/registro\""));
        assert!(html.contains("from-slate-50"));
    }

    #[test]
    fn test_display_image_optional() {
        let node = run(json!({"id": "c", "title": "T", "imageUrl": "https://evil.example/a.jpg"}), false);
        assert!(node.find_all(&|el| el.has_class("rounded-full") && el.tag == "div").is_empty());
        let node = run(json!({"id": "c", "title": "T", "imageUrl": "https://res.cloudinary.com/a.jpg"}), false);
        assert_eq!(node.find_all(&|el| el.tag == "img").len(), 1);
    }

    #[test]
    fn test_edit_fields() {
        let node = run(json!({"id": "c", "title": "T"}), true);
        let fields: Vec<_> = node
            .find_all(&|el| el.get_attr("data-field").is_some())
            .iter()
            .filter_map(|el| el.get_attr("data-field"))
            .collect();
        assert_eq!(fields, vec!["title", "description", "label", "href"]);
        assert!(node.to_html().contains("Sin imagen"));
    }
}
