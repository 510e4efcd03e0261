use munipage_types::{GalleryBlock, SizeTier};

use super::{
    CAPTION_INPUT_CLASS, REMOVE_BUTTON_CLASS, RenderContext, action_button, add_tile, image,
    no_image, select, text_input,
};
use crate::edit::{Field, ImageSlot};
use crate::ir::{Element, Node};
use crate::layout::{GALLERY_COLUMNS, gallery_tile, grid_cols_class};
use crate::style::ResolvedStyles;

const TILE_IMAGE_WIDTH: u32 = 800;
const EMPTY_NOTICE: &str = "Añadí imágenes válidas (Cloudinary).";

fn grid(columns: u8) -> Element {
    Element::new("div")
        .class("grid gap-3 grid-cols-1 sm:grid-cols-2")
        .class(grid_cols_class(columns))
        .class("auto-rows-[minmax(140px,auto)] grid-flow-dense")
}

pub(super) fn render(
    block: &GalleryBlock,
    styles: &ResolvedStyles,
    ctx: &RenderContext<'_>,
) -> Option<Node> {
    let columns = GALLERY_COLUMNS.clamp(block.columns);
    let title = block
        .title
        .as_deref()
        .filter(|t| !t.trim().is_empty())
        .unwrap_or("Galería");
    let section = Element::new("section")
        .class("space-y-3")
        .class(styles.classes());

    if ctx.is_edit() {
        return Some(edit(block, section, columns, ctx).into());
    }

    let tiles: Vec<Element> = block
        .images
        .iter()
        .filter_map(|img| {
            let tile = gallery_tile(img.size);
            let alt = img
                .caption
                .as_deref()
                .filter(|c| !c.is_empty())
                .unwrap_or("Imagen de galería");
            let picture = image(ctx, Some(img.url.as_str()), TILE_IMAGE_WIDTH, alt, "h-full w-full object-cover")?;
            let caption = img
                .caption
                .as_deref()
                .filter(|c| !c.trim().is_empty())
                .map(|c| {
                    Element::new("div")
                        .class("absolute inset-x-0 bottom-0 bg-black/50 px-3 py-2 text-xs text-white")
                        .text(c)
                });
            Some(
                Element::new("div")
                    .class("relative overflow-hidden rounded-xl bg-slate-100")
                    .class(tile.class)
                    .child(picture)
                    .opt_child(caption),
            )
        })
        .collect();

    let mut grid = grid(columns);
    if tiles.is_empty() {
        grid = grid.child(Element::new("p").class("text-sm text-slate-500").text(EMPTY_NOTICE));
    } else {
        grid = grid.children(tiles);
    }

    Some(
        section
            .child(
                Element::new("h3")
                    .class("text-xl font-semibold text-slate-900")
                    .text(title),
            )
            .child(grid)
            .into(),
    )
}

fn edit(block: &GalleryBlock, section: Element, columns: u8, ctx: &RenderContext<'_>) -> Element {
    let header = Element::new("div")
        .class("flex items-center justify-between")
        .child(text_input(
            Field::Title,
            block.title.as_deref().unwrap_or_default(),
            "Galería",
            "bg-transparent text-xl font-semibold text-slate-900 rounded px-1 -ml-1",
        ))
        .child(select(
            Field::Columns,
            GALLERY_COLUMNS.options().map(|n| (n.to_string(), cols_label(n))),
            &columns.to_string(),
            "text-xs border-slate-200 rounded py-1",
        ));

    let tiles = block.images.iter().enumerate().map(|(idx, img)| {
        let size = img.size.unwrap_or(SizeTier::Sm);
        let picture = image(
            ctx,
            Some(img.url.as_str()),
            TILE_IMAGE_WIDTH,
            img.caption.as_deref().unwrap_or_default(),
            "h-full w-full object-cover",
        )
        .unwrap_or_else(no_image);
        let remove = Element::new("div")
            .class("absolute top-1 right-1 opacity-0 group-hover/img:opacity-100 transition-opacity flex gap-1 z-10")
            .child(
                action_button("remove-image", "×", REMOVE_BUTTON_CLASS).attr("data-index", idx.to_string()),
            );
        let overlay = Element::new("div")
            .class("absolute inset-x-0 bottom-0 bg-black/60 p-2 opacity-0 group-hover/img:opacity-100 transition-opacity space-y-1")
            .child(text_input(
                Field::ImageCaption(idx),
                img.caption.as_deref().unwrap_or_default(),
                "Leyenda...",
                CAPTION_INPUT_CLASS,
            ))
            .child(select(
                Field::ImageSize(idx),
                SizeTier::ALL.iter().map(|t| (t.as_str().to_string(), t.label())),
                size.as_str(),
                "w-full bg-white/10 text-white text-[10px] border-none rounded py-0.5 px-1",
            ));
        Element::new("div")
            .class("relative overflow-hidden rounded-xl bg-slate-100 group/img")
            .class(gallery_tile(Some(size)).class)
            .child(picture)
            .child(remove)
            .child(overlay)
    });

    let mut grid = grid(columns).children(tiles);
    if ctx.show_uploads() {
        grid = grid.child(add_tile(
            ImageSlot::AppendImage,
            "flex flex-col items-center justify-center h-44 rounded-xl border-2 border-dashed border-slate-300 bg-slate-50 hover:bg-slate-100 cursor-pointer transition-colors",
        ));
    }

    section
        .class("group/gallery relative rounded-xl border border-dashed border-slate-200 p-4 hover:border-sky-300 transition-colors")
        .child(header)
        .child(grid)
}

fn cols_label(n: u8) -> &'static str {
    match n {
        1 => "1 Col",
        2 => "2 Cols",
        3 => "3 Cols",
        _ => "4 Cols",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::image::ImagePolicy;
    use munipage_types::Block;
    use serde_json::json;

    fn block(v: serde_json::Value) -> GalleryBlock {
        serde_json::from_value(v).unwrap()
    }

    fn display(b: &GalleryBlock) -> Node {
        let policy = ImagePolicy::default();
        let styles = ResolvedStyles::for_block(&Block::from(b.clone()));
        render(b, &styles, &RenderContext::display(&policy)).unwrap()
    }

    #[test]
    fn test_untrusted_images_filtered() {
        let g = block(json!({
            "id": "g",
            "images": [
                {"url": "https://res.cloudinary.com/a.jpg", "caption": "Cancha"},
                {"url": "https://evil.example/b.jpg"}
            ]
        }));
        let node = display(&g);
        assert_eq!(node.find_all(&|el| el.tag == "img").len(), 1);
        assert!(node.to_html().contains("Cancha"));
    }

    #[test]
    fn test_empty_notice() {
        let g = block(json!({"id": "g", "images": [{"url": "https://evil.example/b.jpg"}]}));
        assert!(display(&g).to_html().contains(EMPTY_NOTICE));
    }

    #[test]
    fn test_column_clamp_in_markup() {
        let g = block(json!({"id": "g", "columns": 12}));
        let html = display(&g).to_html();
        assert!(html.contains("md:grid-cols-4"));
        let g = block(json!({"id": "g", "columns": 0}));
        assert!(display(&g).to_html().contains("md:grid-cols-1"));
        let g = block(json!({"id": "g"}));
        assert!(display(&g).to_html().contains("md:grid-cols-3"));
    }

    #[test]
    fn test_size_tiers_span() {
        let g = block(json!({
            "id": "g",
            "images": [
                {"url": "https://res.cloudinary.com/a.jpg", "size": "xl"},
                {"url": "https://res.cloudinary.com/b.jpg"}
            ]
        }));
        let node = display(&g);
        let tiles = node.find_all(&|el| el.has_class("rounded-xl") && el.has_class("bg-slate-100"));
        assert!(tiles[0].has_class("sm:row-span-2"));
        assert!(tiles[0].has_class("h-80"));
        assert!(tiles[1].has_class("h-44"));
    }

    #[test]
    fn test_edit_list_controls() {
        let g = block(json!({
            "id": "g",
            "images": [{"url": "https://res.cloudinary.com/a.jpg"}, {"url": ""}]
        }));
        let policy = ImagePolicy::default();
        let styles = ResolvedStyles::for_block(&Block::from(g.clone()));
        let node = render(&g, &styles, &RenderContext::edit(&policy)).unwrap();
        let removes = node.find_all(&|el| el.get_attr("data-action") == Some("remove-image"));
        let indexes: Vec<_> = removes.iter().filter_map(|el| el.get_attr("data-index")).collect();
        assert_eq!(indexes, vec!["0", "1"]);
        assert!(node.to_html().contains("Sin imagen"));
        assert_eq!(
            node.find_all(&|el| el.get_attr("data-upload") == Some("append-image")).len(),
            1
        );
        assert_eq!(
            node.find_all(&|el| el.get_attr("data-field") == Some("images.1.size")).len(),
            1
        );
    }
}
