//! Page Composition Surface: an ordered block list laid out on the page grid.
//!
//! The grid has two columns on wide viewports. Each block becomes one cell
//! whose span comes from [`resolve_width`]; cells appear in list order and CSS
//! handles wrapping. Blocks the renderer returns nothing for take no cell.
//!
//! In edit mode every cell is wrapped with a drag handle and, optionally, the
//! per-block controls supplied by a [`ControlsProvider`].

use serde::Serialize;

use munipage_types::{Block, Width};

use crate::error::RenderError;
use crate::ir::{Element, Node};
use crate::layout::{resolve_width, span_class};
use crate::render::{RenderContext, render_block};

/// Supplies the editor controls shown under a cell.
pub trait ControlsProvider {
    fn controls(&self, block: &Block) -> Option<Element>;
}

impl<F> ControlsProvider for F
where
    F: Fn(&Block) -> Option<Element>,
{
    fn controls(&self, block: &Block) -> Option<Element> {
        self(block)
    }
}

/// Width toggle plus delete button.
///
/// The width toggle is omitted for blocks whose width is not settable (hero).
#[derive(Clone, Copy, Debug, Default)]
pub struct StandardControls;

impl ControlsProvider for StandardControls {
    fn controls(&self, block: &Block) -> Option<Element> {
        let mut controls = Element::new("div").class("flex flex-wrap items-center gap-2");
        if block.kind().is_some_and(|k| k.has_width()) {
            let current = resolve_width(block);
            let toggle = [(Width::Half, "1/2"), (Width::Full, "Full")]
                .into_iter()
                .map(|(width, label)| {
                    let active = width == current;
                    Element::new("button")
                        .attr("type", "button")
                        .attr("data-action", "set-width")
                        .attr("data-width", width.as_str())
                        .attr("aria-pressed", active.to_string())
                        .class("rounded-full border px-3 py-1 text-xs font-semibold")
                        .class(if active {
                            "border-sky-500 bg-sky-50 text-sky-700"
                        } else {
                            "border-slate-200 text-slate-600"
                        })
                        .text(label)
                });
            controls = controls.child(Element::new("div").class("inline-flex gap-1").children(toggle));
        }
        Some(
            controls.child(
                Element::new("button")
                    .attr("type", "button")
                    .attr("data-action", "delete-block")
                    .class("ml-auto rounded-full border border-red-200 px-3 py-1 text-xs font-semibold text-red-600 hover:bg-red-50")
                    .text("Eliminar"),
            ),
        )
    }
}

/// One rendered grid cell.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Cell {
    pub block_id: String,
    /// Stored `type` tag.
    pub kind: String,
    pub width: Width,
    /// Grid columns spanned on wide viewports (1 or 2).
    pub columns: u8,
    pub node: Node,
}

/// Serializable view of a cell, without markup.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct CellSummary {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub width: Width,
    pub columns: u8,
}

/// The composed grid.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Composition {
    pub cells: Vec<Cell>,
}

impl Composition {
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn to_node(&self) -> Node {
        Element::new("div")
            .class("grid gap-10 md:grid-cols-2")
            .children(self.cells.iter().map(|c| c.node.clone()))
            .into()
    }

    pub fn to_html(&self) -> String {
        self.to_node().to_html()
    }

    pub fn summary(&self) -> Vec<CellSummary> {
        self.cells
            .iter()
            .map(|c| CellSummary {
                id: c.block_id.clone(),
                kind: c.kind.clone(),
                width: c.width,
                columns: c.columns,
            })
            .collect()
    }

    pub fn summary_json(&self) -> Result<String, RenderError> {
        serde_json::to_string_pretty(&self.summary()).map_err(RenderError::Summary)
    }
}

/// Lay out `blocks` in list order.
pub fn compose(
    blocks: &[Block],
    ctx: &RenderContext<'_>,
    controls: Option<&dyn ControlsProvider>,
) -> Composition {
    let cells = blocks
        .iter()
        .filter_map(|block| {
            let width = resolve_width(block);
            let rendered = render_block(block, ctx)?;
            let node = if ctx.is_edit() {
                sortable(block, width, rendered, controls.and_then(|c| c.controls(block)))
            } else {
                with_span(rendered, width)
            };
            Some(Cell {
                block_id: block.id().as_str().to_string(),
                kind: block.type_tag().to_string(),
                width,
                columns: width.columns(),
                node,
            })
        })
        .collect();
    Composition { cells }
}

fn with_span(mut node: Node, width: Width) -> Node {
    if let Some(root) = node.as_element_mut() {
        root.add_class(span_class(width));
    }
    node
}

/// Wrap an edit-mode cell with its drag handle and controls.
fn sortable(block: &Block, width: Width, rendered: Node, controls: Option<Element>) -> Node {
    let handle = Element::new("div")
        .class("absolute right-2 top-2 z-10 opacity-0 transition group-hover:opacity-100")
        .child(
            Element::new("button")
                .attr("type", "button")
                .attr("aria-label", "Arrastrar bloque")
                .attr("data-drag-handle", block.id().as_str())
                .class("h-8 w-8 rounded-full border border-slate-200 bg-white text-slate-500 shadow-sm cursor-grab")
                .text("⇅"),
        );
    let controls = controls.map(|c| {
        Element::new("div")
            .class("mt-3 space-y-2 rounded-lg border border-dashed border-slate-200 bg-white/70 p-3 text-sm")
            .child(c)
    });
    Element::new("div")
        .attr("data-sortable-id", block.id().as_str())
        .class(span_class(width))
        .class("relative rounded-xl")
        .child(handle)
        .child(Element::new("div").class("group").child(rendered).opt_child(controls))
        .into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::image::ImagePolicy;
    use serde_json::json;

    fn blocks(v: serde_json::Value) -> Vec<Block> {
        serde_json::from_value(v).unwrap()
    }

    #[test]
    fn test_cells_follow_list_order_and_width() {
        let policy = ImagePolicy::default();
        let list = blocks(json!([
            {"id": "h", "type": "hero", "width": "half", "title": "T"},
            {"id": "r", "type": "richText", "html": "<p>x</p>"}
        ]));
        let comp = compose(&list, &RenderContext::display(&policy), None);
        let summary = comp.summary();
        assert_eq!(summary.len(), 2);
        assert_eq!((summary[0].id.as_str(), summary[0].columns), ("h", 2));
        assert_eq!((summary[1].id.as_str(), summary[1].columns), ("r", 1));
        let first = comp.cells[0].node.as_element().unwrap();
        assert!(first.has_class("md:col-span-2"));
        let second = comp.cells[1].node.as_element().unwrap();
        assert!(!second.has_class("md:col-span-2"));
    }

    #[test]
    fn test_skipped_blocks_take_no_cell() {
        let policy = ImagePolicy::default();
        let list = blocks(json!([
            {"id": "a", "type": "richText", "html": ""},
            {"id": "b", "type": "map"},
            {"id": "c", "type": "spacer"}
        ]));
        let comp = compose(&list, &RenderContext::display(&policy), None);
        assert_eq!(comp.cells.len(), 1);
        assert_eq!(comp.cells[0].block_id, "c");
    }

    #[test]
    fn test_edit_cells_wrapped() {
        let policy = ImagePolicy::default();
        let list = blocks(json!([
            {"id": "h", "type": "hero", "title": "T"},
            {"id": "r", "type": "richText", "html": "<p>x</p>", "width": "full"}
        ]));
        let comp = compose(&list, &RenderContext::edit(&policy), Some(&StandardControls));
        let hero = &comp.cells[0].node;
        let wrapper = hero.as_element().unwrap();
        assert_eq!(wrapper.get_attr("data-sortable-id"), Some("h"));
        assert!(wrapper.has_class("md:col-span-2"));
        assert_eq!(hero.find_all(&|el| el.get_attr("aria-label") == Some("Arrastrar bloque")).len(), 1);
        assert!(hero.find_all(&|el| el.get_attr("data-action") == Some("set-width")).is_empty());
        assert_eq!(hero.find_all(&|el| el.get_attr("data-action") == Some("delete-block")).len(), 1);

        let text = &comp.cells[1].node;
        let toggles = text.find_all(&|el| el.get_attr("data-action") == Some("set-width"));
        assert_eq!(toggles.len(), 2);
        assert_eq!(toggles[1].get_attr("aria-pressed"), Some("true"));
    }

    #[test]
    fn test_closure_controls() {
        let policy = ImagePolicy::default();
        let list = blocks(json!([{"id": "s", "type": "spacer"}]));
        let custom = |b: &Block| Some(Element::new("span").text(format!("#{}", b.id())));
        let comp = compose(&list, &RenderContext::edit(&policy), Some(&custom));
        assert!(comp.to_html().contains("<span>#s</span>"));
    }

    #[test]
    fn test_summary_json_shape() {
        let policy = ImagePolicy::default();
        let list = blocks(json!([{"id": "c", "type": "cta", "title": "T"}]));
        let comp = compose(&list, &RenderContext::display(&policy), None);
        let value: serde_json::Value = serde_json::from_str(&comp.summary_json().unwrap()).unwrap();
        assert_eq!(value, json!([{"id": "c", "type": "cta", "width": "full", "columns": 2}]));
    }

    #[test]
    fn test_grid_wrapper() {
        let policy = ImagePolicy::default();
        let comp = compose(&[], &RenderContext::display(&policy), None);
        assert!(comp.is_empty());
        assert_eq!(comp.to_html(), "<div class=\"grid gap-10 md:grid-cols-2\"></div>");
    }
}
