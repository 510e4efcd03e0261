//! Render IR: a small element tree that serialises to HTML.
//!
//! Renderers build [`Node`] trees instead of writing strings so that the
//! composition surface can adjust a block's root element (span classes, drag
//! wrappers) and tests can assert on structure rather than on markup text.
//!
//! Text and attribute values are escaped on output. [`Node::Raw`] is emitted
//! verbatim and is reserved for HTML that was sanitized before persistence
//! (rich-text bodies, card modal bodies).

use std::fmt::Write;

/// Elements that never have children or a closing tag.
const VOID_ELEMENTS: &[&str] = &["br", "hr", "img", "input", "meta", "source"];

/// One node of the render tree.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Node {
    Element(Element),
    /// Escaped on output.
    Text(String),
    /// Trusted, pre-sanitized HTML. Emitted as-is.
    Raw(String),
}

/// An HTML element with ordered attributes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Element {
    pub tag: &'static str,
    pub attrs: Vec<(&'static str, String)>,
    pub children: Vec<Node>,
}

impl Element {
    pub fn new(tag: &'static str) -> Self {
        Self {
            tag,
            attrs: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Set an attribute, replacing any previous value.
    pub fn attr(mut self, name: &'static str, value: impl Into<String>) -> Self {
        self.set_attr(name, value);
        self
    }

    /// Set an attribute only when `value` is `Some`.
    pub fn opt_attr(self, name: &'static str, value: Option<impl Into<String>>) -> Self {
        match value {
            Some(v) => self.attr(name, v),
            None => self,
        }
    }

    /// A valueless attribute (`hidden`, `checked`, `contenteditable`, …).
    pub fn flag(self, name: &'static str, on: bool) -> Self {
        if on { self.attr(name, "") } else { self }
    }

    /// Append classes. Empty input is a no-op.
    pub fn class(mut self, classes: impl AsRef<str>) -> Self {
        self.add_class(classes.as_ref());
        self
    }

    pub fn child(mut self, node: impl Into<Node>) -> Self {
        self.children.push(node.into());
        self
    }

    pub fn opt_child(self, node: Option<impl Into<Node>>) -> Self {
        match node {
            Some(n) => self.child(n),
            None => self,
        }
    }

    pub fn children<I, N>(mut self, nodes: I) -> Self
    where
        I: IntoIterator<Item = N>,
        N: Into<Node>,
    {
        self.children.extend(nodes.into_iter().map(Into::into));
        self
    }

    /// Append an escaped text child.
    pub fn text(self, text: impl Into<String>) -> Self {
        self.child(Node::Text(text.into()))
    }

    pub fn set_attr(&mut self, name: &'static str, value: impl Into<String>) {
        let value = value.into();
        match self.attrs.iter_mut().find(|(n, _)| *n == name) {
            Some(slot) => slot.1 = value,
            None => self.attrs.push((name, value)),
        }
    }

    pub fn add_class(&mut self, classes: &str) {
        let classes = classes.trim();
        if classes.is_empty() {
            return;
        }
        match self.attrs.iter_mut().find(|(n, _)| *n == "class") {
            Some((_, existing)) if !existing.is_empty() => {
                existing.push(' ');
                existing.push_str(classes);
            }
            Some((_, existing)) => existing.push_str(classes),
            None => self.attrs.push(("class", classes.to_string())),
        }
    }

    pub fn get_attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(n, _)| *n == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.get_attr("class")
            .is_some_and(|c| c.split_whitespace().any(|c| c == class))
    }
}

impl From<Element> for Node {
    fn from(el: Element) -> Self {
        Node::Element(el)
    }
}

impl Node {
    pub fn text(s: impl Into<String>) -> Self {
        Node::Text(s.into())
    }

    pub fn as_element(&self) -> Option<&Element> {
        match self {
            Node::Element(el) => Some(el),
            _ => None,
        }
    }

    pub fn as_element_mut(&mut self) -> Option<&mut Element> {
        match self {
            Node::Element(el) => Some(el),
            _ => None,
        }
    }

    /// Serialise to an HTML string.
    pub fn to_html(&self) -> String {
        let mut out = String::new();
        self.write_html(&mut out);
        out
    }

    pub fn write_html(&self, out: &mut String) {
        match self {
            Node::Text(t) => out.push_str(&escape_text(t)),
            Node::Raw(html) => out.push_str(html),
            Node::Element(el) => {
                let _ = write!(out, "<{}", el.tag);
                for (name, value) in &el.attrs {
                    if value.is_empty() && name != &"alt" && name != &"class" {
                        let _ = write!(out, " {name}");
                    } else {
                        let _ = write!(out, " {name}=\"{}\"", escape_attr(value));
                    }
                }
                out.push('>');
                if VOID_ELEMENTS.contains(&el.tag) {
                    return;
                }
                for child in &el.children {
                    child.write_html(out);
                }
                let _ = write!(out, "</{}>", el.tag);
            }
        }
    }

    /// Depth-first search for elements matching `pred`, in document order.
    pub fn find_all<'a>(&'a self, pred: &dyn Fn(&Element) -> bool) -> Vec<&'a Element> {
        let mut found = Vec::new();
        self.collect(pred, &mut found);
        found
    }

    fn collect<'a>(&'a self, pred: &dyn Fn(&Element) -> bool, found: &mut Vec<&'a Element>) {
        if let Node::Element(el) = self {
            if pred(el) {
                found.push(el);
            }
            for child in &el.children {
                child.collect(pred, found);
            }
        }
    }

    /// Concatenated text content (raw HTML included as-is).
    pub fn text_content(&self) -> String {
        match self {
            Node::Text(t) | Node::Raw(t) => t.clone(),
            Node::Element(el) => el.children.iter().map(Node::text_content).collect(),
        }
    }
}

/// Escape text content.
pub fn escape_text(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

/// Escape an attribute value (double-quoted).
pub fn escape_attr(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escaping() {
        let node: Node = Element::new("p")
            .attr("title", "a \"b\" <c>")
            .text("x < y & z")
            .into();
        assert_eq!(
            node.to_html(),
            "<p title=\"a &quot;b&quot; &lt;c&gt;\">x &lt; y &amp; z</p>"
        );
    }

    #[test]
    fn test_raw_is_verbatim() {
        let node: Node = Element::new("div").child(Node::Raw("<p><b>ok</b></p>".into())).into();
        assert_eq!(node.to_html(), "<div><p><b>ok</b></p></div>");
    }

    #[test]
    fn test_void_and_flags() {
        let node: Node = Element::new("input")
            .attr("type", "checkbox")
            .flag("checked", true)
            .flag("disabled", false)
            .into();
        assert_eq!(node.to_html(), "<input type=\"checkbox\" checked>");
        let img: Node = Element::new("img").attr("src", "x").attr("alt", "").into();
        assert_eq!(img.to_html(), "<img src=\"x\" alt=\"\">");
    }

    #[test]
    fn test_class_append() {
        let mut el = Element::new("div").class("a").class("").class("b c");
        el.add_class("d");
        assert_eq!(el.get_attr("class"), Some("a b c d"));
        assert!(el.has_class("c"));
        assert!(!el.has_class("b c"));
    }

    #[test]
    fn test_find_all_document_order() {
        let node: Node = Element::new("div")
            .child(Element::new("h2").text("one"))
            .child(Element::new("section").child(Element::new("h2").text("two")))
            .into();
        let heads = node.find_all(&|el| el.tag == "h2");
        let texts: Vec<_> = heads
            .iter()
            .map(|el| Node::Element((*el).clone()).text_content())
            .collect();
        assert_eq!(texts, vec!["one", "two"]);
    }
}
