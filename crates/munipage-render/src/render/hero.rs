use munipage_types::HeroBlock;

use super::{RenderContext, file_input, image, text_input, textarea};
use crate::edit::{Field, ImageSlot};
use crate::ir::{Element, Node};
use crate::style::ResolvedStyles;

const HERO_IMAGE_WIDTH: u32 = 1600;

pub(super) fn render(
    block: &HeroBlock,
    styles: &ResolvedStyles,
    ctx: &RenderContext<'_>,
) -> Option<Node> {
    let background = image(
        ctx,
        block.image_url.as_deref(),
        HERO_IMAGE_WIDTH,
        &block.title,
        "h-full w-full object-cover",
    )
    .map(|img| Element::new("div").class("absolute inset-0 opacity-30").child(img));

    let mut section = Element::new("section")
        .class("relative overflow-hidden rounded-2xl")
        .class(styles.classes())
        .opt_child(background);

    let eyebrow = Element::new("p")
        .class("text-xs uppercase tracking-[0.3em] text-white/80")
        .text("Destacado");
    let body = Element::new("div")
        .class("relative p-10 md:p-14 space-y-4 max-w-4xl")
        .child(eyebrow);

    if ctx.is_edit() {
        section = section.class("group/hero");
        if ctx.show_uploads() {
            section = section.child(
                Element::new("div")
                    .class("absolute top-4 right-4 z-20 opacity-0 group-hover/hero:opacity-100 transition-opacity")
                    .child(
                        Element::new("label")
                            .class("cursor-pointer rounded-full bg-white/90 px-3 py-1.5 text-xs font-semibold text-slate-800 shadow hover:bg-white flex items-center gap-2")
                            .child(Element::new("span").text("📷 Cambiar fondo"))
                            .child(file_input(ImageSlot::Primary)),
                    ),
            );
        }
        let cta = Element::new("div")
            .class("flex flex-wrap gap-2 items-center")
            .child(text_input(
                Field::CtaLabel,
                block.cta_label.as_deref().unwrap_or_default(),
                "Texto Botón",
                "bg-white/10 px-3 py-1.5 text-white placeholder-white/50 rounded-full border border-white/20 text-sm font-semibold w-32",
            ))
            .child(text_input(
                Field::CtaHref,
                block.cta_href.as_deref().unwrap_or_default(),
                "Enlace (ej: /contacto)",
                "bg-white/10 px-3 py-1.5 text-white placeholder-white/50 rounded-full border border-white/20 text-sm w-48",
            ));
        let body = body
            .child(text_input(
                Field::Title,
                &block.title,
                "Título del Hero",
                "w-full bg-transparent text-3xl md:text-4xl font-bold drop-shadow-sm placeholder-white/50 rounded px-1 -ml-1",
            ))
            .child(textarea(
                Field::Subtitle,
                block.subtitle.as_deref().unwrap_or_default(),
                "Subtítulo (opcional)",
                2,
                "w-full bg-transparent text-lg text-white/85 max-w-3xl resize-none rounded px-1 -ml-1",
            ))
            .child(cta);
        return Some(section.child(body).into());
    }

    let subtitle = block
        .subtitle
        .as_deref()
        .filter(|s| !s.trim().is_empty())
        .map(|s| Element::new("p").class("text-lg text-white/85 max-w-3xl").text(s));
    let cta = block.cta().map(|(label, href)| {
        Element::new("a")
            .attr("href", href)
            .class("inline-flex items-center gap-2 rounded-full bg-white px-4 py-2 text-sky-800 font-semibold shadow")
            .text(label)
    });
    let body = body
        .child(
            Element::new("h2")
                .class("text-3xl md:text-4xl font-bold drop-shadow-sm")
                .text(&block.title),
        )
        .opt_child(subtitle)
        .opt_child(cta);
    Some(section.child(body).into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::image::ImagePolicy;

    fn hero() -> HeroBlock {
        let mut hero = HeroBlock::new("Bienvenidos");
        hero.subtitle = Some("Deportes en el barrio".into());
        hero.image_url = Some("https://res.cloudinary.com/demo/image/upload/hero.jpg".into());
        hero
    }

    fn display(block: &HeroBlock) -> Node {
        let policy = ImagePolicy::default();
        let styles = ResolvedStyles::for_block(&block.clone().into());
        render(block, &styles, &RenderContext::display(&policy)).unwrap()
    }

    #[test]
    fn test_display_markup() {
        let html = display(&hero()).to_html();
        assert!(html.contains("<h2 class=\"text-3xl md:text-4xl font-bold drop-shadow-sm\">Bienvenidos</h2>"));
        assert!(html.contains("Deportes en el barrio"));
        assert!(html.contains("f_auto,q_auto,w_1600/hero.jpg"));
        assert!(html.contains("from-sky-600"));
        assert!(!html.contains("<a "));
    }

    #[test]
    fn test_cta_requires_both_halves() {
        let mut half = hero();
        half.cta_label = Some("Inscribite".into());
        assert!(!display(&half).to_html().contains("<a "));

        half.cta_href = Some("/inscripciones".into());
        let html = display(&half).to_html();
        assert!(html.contains("href=\"/inscripciones\""));
        assert!(html.contains(">Inscribite</a>"));
    }

    #[test]
    fn test_untrusted_background_dropped() {
        let mut evil = hero();
        evil.image_url = Some("https://evil.example/x.jpg".into());
        let node = display(&evil);
        assert!(node.find_all(&|el| el.tag == "img").is_empty());
    }

    #[test]
    fn test_title_is_escaped() {
        let mut h = hero();
        h.title = "<script>alert(1)</script>".into();
        let html = display(&h).to_html();
        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;"));
    }

    #[test]
    fn test_edit_inputs() {
        let policy = ImagePolicy::default();
        let block = hero();
        let styles = ResolvedStyles::for_block(&block.clone().into());
        let node = render(&block, &styles, &RenderContext::edit(&policy)).unwrap();
        let fields: Vec<_> = node
            .find_all(&|el| el.get_attr("data-field").is_some())
            .iter()
            .filter_map(|el| el.get_attr("data-field"))
            .collect();
        assert_eq!(fields, vec!["title", "subtitle", "ctaLabel", "ctaHref"]);
        let uploads = node.find_all(&|el| el.get_attr("data-upload") == Some("primary"));
        assert_eq!(uploads.len(), 1);

        let no_uploads = render(&block, &styles, &RenderContext::edit(&policy).with_uploads(false)).unwrap();
        assert!(no_uploads.find_all(&|el| el.get_attr("data-upload").is_some()).is_empty());
    }
}
