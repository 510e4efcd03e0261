use munipage_types::RichTextBlock;

use super::RenderContext;
use crate::edit::Field;
use crate::ir::{Element, Node, escape_text};
use crate::style::ResolvedStyles;

/// Toolbar buttons: `(execCommand name, label)`.
const TOOLBAR_COMMANDS: [(&str, &str); 4] = [
    ("bold", "Negrita"),
    ("italic", "Cursiva"),
    ("insertUnorderedList", "Lista"),
    ("createLink", "Enlace"),
];

const FONT_NAMES: [&str; 4] = ["Arial", "Georgia", "Times New Roman", "Verdana"];

/// `fontSize` command values (1-7) offered in the toolbar.
const FONT_SIZES: [(&str, &str); 4] = [
    ("2", "Pequeño"),
    ("3", "Normal"),
    ("5", "Grande"),
    ("6", "Muy grande"),
];

const TOOLBAR_BUTTON_CLASS: &str = "rounded px-1 hover:bg-slate-800";

/// Convert a body with no markup into paragraphs.
///
/// A body containing `<` is assumed to be HTML and returned unchanged.
/// Otherwise each non-blank line becomes an escaped `<p>`.
pub fn plain_text_to_html(body: &str) -> String {
    if body.contains('<') {
        return body.to_string();
    }
    body.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(|line| format!("<p>{}</p>", escape_text(line)))
        .collect()
}

pub(super) fn render(
    block: &RichTextBlock,
    styles: &ResolvedStyles,
    ctx: &RenderContext<'_>,
) -> Option<Node> {
    let section = Element::new("section")
        .class("prose prose-slate max-w-none")
        .class(styles.classes());

    if ctx.is_edit() {
        return Some(section.class("relative group/text").child(editor(&block.html)).into());
    }

    let html = plain_text_to_html(&block.html);
    if html.trim().is_empty() {
        return None;
    }
    Some(
        section
            .child(Element::new("div").child(Node::Raw(html)))
            .into(),
    )
}

fn editor(html: &str) -> Element {
    let buttons = TOOLBAR_COMMANDS.iter().map(|(command, label)| {
        Element::new("button")
            .attr("type", "button")
            .attr("data-command", *command)
            .class(TOOLBAR_BUTTON_CLASS)
            .text(*label)
    });
    let font_name = Element::new("select")
        .attr("data-command", "fontName")
        .class("rounded bg-transparent px-1")
        .children(
            FONT_NAMES
                .iter()
                .map(|name| Element::new("option").attr("value", *name).text(*name)),
        );
    let font_size = Element::new("select")
        .attr("data-command", "fontSize")
        .class("rounded bg-transparent px-1")
        .children(
            FONT_SIZES
                .iter()
                .map(|(value, label)| Element::new("option").attr("value", *value).text(*label)),
        );
    let toolbar = Element::new("div")
        .class("flex items-center gap-1 rounded-md border border-slate-700 bg-slate-950/40 px-2 py-1 text-[11px] text-slate-200")
        .children(buttons)
        .child(font_name)
        .child(font_size);
    let surface = Element::new("div")
        .flag("contenteditable", true)
        .attr("data-field", Field::Html.binding())
        .class("min-h-[160px] rounded-md border border-slate-200 px-2 py-1.5 outline-none ring-sky-500/40 focus:ring-2")
        .child(Node::Raw(html.to_string()));
    Element::new("div").class("space-y-1").child(toolbar).child(surface)
}
