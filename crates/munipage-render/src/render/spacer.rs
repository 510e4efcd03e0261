use munipage_types::SpacerBlock;

use super::RenderContext;
use crate::ir::{Element, Node};

pub(super) fn render(_block: &SpacerBlock, ctx: &RenderContext<'_>) -> Option<Node> {
    if ctx.is_edit() {
        return Some(
            Element::new("div")
                .class("min-h-[100px] rounded-xl border-2 border-dashed border-slate-200 bg-slate-50/50 flex items-center justify-center")
                .child(
                    Element::new("span")
                        .class("text-xs text-slate-400 font-medium uppercase tracking-wider")
                        .text("Espacio vacío"),
                )
                .into(),
        );
    }
    Some(Element::new("div").class("hidden md:block").into())
}
