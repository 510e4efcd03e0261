use munipage_types::{CarouselAnimation, CarouselBlock, SizeTier};

use super::{
    CAPTION_INPUT_CLASS, REMOVE_BUTTON_CLASS, RenderContext, action_button, add_tile, checkbox,
    image, no_image, select, text_input,
};
use crate::edit::{Field, ImageSlot};
use crate::ir::{Element, Node};
use crate::layout::carousel_slide_class;
use crate::style::ResolvedStyles;

const SLIDE_IMAGE_WIDTH: u32 = 800;

/// Autoplay interval used when autoplay is on but no interval was stored.
pub const DEFAULT_INTERVAL_MS: u32 = 5000;

const ANIMATIONS: [(CarouselAnimation, &str); 3] = [
    (CarouselAnimation::Slide, "Deslizar"),
    (CarouselAnimation::Fade, "Fundido"),
    (CarouselAnimation::Coverflow, "Coverflow"),
];

fn track() -> Element {
    Element::new("div").class("flex gap-3 overflow-x-auto pb-2 snap-x snap-mandatory")
}

pub(super) fn render(
    block: &CarouselBlock,
    styles: &ResolvedStyles,
    ctx: &RenderContext<'_>,
) -> Option<Node> {
    let animation = block.animation.unwrap_or_default();
    let size = block.size.unwrap_or_default();
    let slide_class = carousel_slide_class(Some(size));
    let title = block
        .title
        .as_deref()
        .filter(|t| !t.trim().is_empty())
        .unwrap_or("Carrusel");

    let mut section = Element::new("section")
        .class("space-y-3")
        .class(styles.classes())
        .attr("data-animation", animation.as_str())
        .attr("data-size", size.as_str());
    if block.autoplay {
        section = section
            .attr("data-autoplay", "true")
            .attr(
                "data-interval",
                block.interval.unwrap_or(DEFAULT_INTERVAL_MS).to_string(),
            );
    }

    if ctx.is_edit() {
        return Some(edit(block, section, slide_class, ctx).into());
    }

    let slides: Vec<Element> = block
        .images
        .iter()
        .filter_map(|img| {
            let alt = img
                .caption
                .as_deref()
                .filter(|c| !c.is_empty())
                .unwrap_or("Imagen de carrusel");
            let picture = image(ctx, Some(img.url.as_str()), SLIDE_IMAGE_WIDTH, alt, "h-full w-full object-cover")?;
            Some(
                Element::new("div")
                    .class("relative flex-shrink-0 overflow-hidden rounded-lg bg-slate-100 snap-center")
                    .class(slide_class)
                    .child(picture),
            )
        })
        .collect();
    let empty = slides.is_empty();

    Some(
        section
            .child(
                Element::new("h3")
                    .class("text-xl font-semibold text-slate-900")
                    .text(title),
            )
            .child(track().children(slides))
            .opt_child(empty.then(|| {
                Element::new("p")
                    .class("text-xs text-slate-500")
                    .text("Añadí imágenes válidas (Cloudinary).")
            }))
            .child(
                Element::new("p")
                    .class("text-xs text-slate-500")
                    .text("Arrastrá para ver el carrusel."),
            )
            .into(),
    )
}

fn edit(
    block: &CarouselBlock,
    section: Element,
    slide_class: &str,
    ctx: &RenderContext<'_>,
) -> Element {
    let settings_open = ctx.ui.settings_open(&block.id);
    let header = Element::new("div")
        .class("flex items-center justify-between")
        .child(text_input(
            Field::Title,
            block.title.as_deref().unwrap_or_default(),
            "Carrusel",
            "bg-transparent text-xl font-semibold text-slate-900 rounded px-1 -ml-1",
        ))
        .child(
            action_button("toggle-settings", "Ajustes", "text-xs rounded border border-slate-200 px-2 py-1")
                .attr("aria-expanded", settings_open.to_string()),
        );

    let slides = block.images.iter().enumerate().map(|(idx, img)| {
        let picture = image(
            ctx,
            Some(img.url.as_str()),
            SLIDE_IMAGE_WIDTH,
            img.caption.as_deref().unwrap_or_default(),
            "h-full w-full object-cover",
        )
        .unwrap_or_else(no_image);
        Element::new("div")
            .class("relative flex-shrink-0 overflow-hidden rounded-lg bg-slate-100 snap-center group/img")
            .class(slide_class)
            .child(picture)
            .child(
                Element::new("div")
                    .class("absolute top-1 right-1 opacity-0 group-hover/img:opacity-100 transition-opacity z-10")
                    .child(
                        action_button("remove-image", "×", REMOVE_BUTTON_CLASS)
                            .attr("data-index", idx.to_string()),
                    ),
            )
            .child(
                Element::new("div")
                    .class("absolute inset-x-0 bottom-0 bg-black/60 p-2 opacity-0 group-hover/img:opacity-100 transition-opacity")
                    .child(text_input(
                        Field::ImageCaption(idx),
                        img.caption.as_deref().unwrap_or_default(),
                        "Leyenda...",
                        CAPTION_INPUT_CLASS,
                    )),
            )
    });

    let mut track = track().children(slides);
    if ctx.show_uploads() {
        track = track.child(add_tile(
            ImageSlot::AppendImage,
            "flex flex-col items-center justify-center h-44 w-32 flex-shrink-0 rounded-lg border-2 border-dashed border-slate-300 bg-slate-50 hover:bg-slate-100 cursor-pointer transition-colors",
        ));
    }

    section
        .class("group/carousel relative rounded-xl border border-dashed border-slate-200 p-4 hover:border-sky-300 transition-colors")
        .child(header)
        .opt_child(settings_open.then(|| settings(block)))
        .child(track)
}

/// The settings popover: animation, size, autoplay.
fn settings(block: &CarouselBlock) -> Element {
    let animation = block.animation.unwrap_or_default();
    let size = block.size.unwrap_or_default();
    let mut panel = Element::new("div")
        .attr("role", "dialog")
        .class("grid gap-2 rounded-lg border border-slate-200 bg-white p-3 text-xs shadow")
        .child(select(
            Field::Animation,
            ANIMATIONS
                .iter()
                .map(|(a, label)| (a.as_str().to_string(), *label)),
            animation.as_str(),
            "rounded border-slate-200 py-1",
        ))
        .child(select(
            Field::Size,
            SizeTier::ALL.iter().map(|t| (t.as_str().to_string(), t.label())),
            size.as_str(),
            "rounded border-slate-200 py-1",
        ))
        .child(checkbox(Field::Autoplay, block.autoplay, "Reproducción automática"));
    if block.autoplay {
        panel = panel.child(
            Element::new("input")
                .attr("type", "number")
                .attr("min", "1000")
                .attr("step", "500")
                .attr("data-field", Field::Interval.binding())
                .attr(
                    "value",
                    block.interval.unwrap_or(DEFAULT_INTERVAL_MS).to_string(),
                )
                .class("rounded border-slate-200 py-1"),
        );
    }
    panel
}
