//! Whole-page view: header, legacy body, or the block grid.

use munipage_types::{PageContent, PageLayout, non_empty};

use crate::compose::{ControlsProvider, StandardControls, compose};
use crate::error::RenderError;
use crate::ir::{Element, Node};
use crate::render::RenderContext;

const PAGE_IMAGE_WIDTH: u32 = 1400;

/// Render a page.
///
/// - No blocks: the legacy layout (title, subtitle, main image, body).
/// - Blocks: the grid, preceded by a title header unless the first block is a
///   hero.
///
/// In edit mode cells get [`StandardControls`].
pub fn render_page(page: &PageContent, ctx: &RenderContext<'_>) -> Node {
    let standard: &dyn ControlsProvider = &StandardControls;
    render_page_with(page, ctx, ctx.is_edit().then_some(standard))
}

/// [`render_page`] with caller-supplied cell controls.
pub fn render_page_with(
    page: &PageContent,
    ctx: &RenderContext<'_>,
    controls: Option<&dyn ControlsProvider>,
) -> Node {
    let root = Element::new("div")
        .attr("data-page-path", page.path.as_str())
        .attr("data-layout", page.layout.as_str())
        .class("max-w-5xl mx-auto px-4 py-16 space-y-8");

    if page.blocks.is_empty() {
        return legacy(page, ctx, root).into();
    }

    let grid = compose(&page.blocks, ctx, controls).to_node();
    let content = Element::new("div")
        .class("space-y-6")
        .opt_child((!page.starts_with_hero()).then(|| header(page)))
        .child(grid);
    root.child(content).into()
}

/// Decode a stored page from JSON text and render it.
pub fn render_page_json(json: &str, ctx: &RenderContext<'_>) -> Result<Node, RenderError> {
    let page: PageContent = serde_json::from_str(json).map_err(RenderError::Decode)?;
    Ok(render_page(&page, ctx))
}

fn header(page: &PageContent) -> Element {
    let subtitle = non_empty(page.subtitle.as_deref())
        .map(|s| Element::new("p").class("text-lg text-slate-600").text(s));
    Element::new("div")
        .class("space-y-2")
        .child(
            Element::new("h1")
                .class("text-3xl md:text-4xl font-bold text-slate-900")
                .text(&page.title),
        )
        .opt_child(subtitle)
}

/// Body text with line breaks, injected like rich text (sanitized upstream).
fn body_html(body: &str) -> Element {
    Element::new("div")
        .class("prose prose-slate max-w-none")
        .child(Node::Raw(body.replace('\n', "<br />")))
}

fn legacy(page: &PageContent, ctx: &RenderContext<'_>, root: Element) -> Element {
    let image = ctx.images.src(page.image_url.as_deref(), PAGE_IMAGE_WIDTH).map(|src| {
        Element::new("div")
            .class("relative h-72 w-full overflow-hidden rounded-2xl bg-slate-100")
            .child(
                Element::new("img")
                    .attr("src", src)
                    .attr("alt", page.title.as_str())
                    .class("h-full w-full object-cover")
                    .attr("loading", "lazy")
                    .attr("decoding", "async"),
            )
    });

    let body = page.body.as_deref().unwrap_or_default();
    let body = match page.layout {
        PageLayout::Simple => Some(body_html(body)),
        PageLayout::HeroGallery => Some(
            Element::new("div")
                .class("space-y-6")
                .opt_child((!body.is_empty()).then(|| body_html(body))),
        ),
        PageLayout::HeroText => (!body.is_empty()).then(|| body_html(body)),
    };

    root.child(header(page)).opt_child(image).opt_child(body)
}
