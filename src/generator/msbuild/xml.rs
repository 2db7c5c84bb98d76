//! A small owned XML tree for MSBuild documents.
//!
//! Templates are read with `roxmltree` and copied into [`Element`]s that the
//! generators edit in place. Whitespace-only text is dropped on load and the
//! writer lays the document out again with two-space indentation and CRLF
//! line endings, as Visual Studio does.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum XmlError {
    #[error("invalid XML template: {0}")]
    Parse(#[from] roxmltree::Error),
}

/// A child of an element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Element(Element),
    Text(String),
    Comment(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    pub name: String,
    pub attributes: Vec<(String, String)>,
    pub children: Vec<Node>,
}

impl Element {
    pub fn new(name: impl Into<String>) -> Self {
        Element {
            name: name.into(),
            attributes: Vec::new(),
            children: Vec::new(),
        }
    }

    pub fn with_attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.set_attr(name, value);
        self
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.children = vec![Node::Text(text.into())];
        self
    }

    pub fn with_child(mut self, child: Element) -> Self {
        self.children.push(Node::Element(child));
        self
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn set_attr(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self.attributes.iter_mut().find(|(k, _)| *k == name) {
            Some(slot) => slot.1 = value,
            None => self.attributes.push((name, value)),
        }
    }

    /// Concatenated text content of direct text children.
    pub fn text(&self) -> String {
        self.children
            .iter()
            .filter_map(|n| match n {
                Node::Text(t) => Some(t.as_str()),
                _ => None,
            })
            .collect()
    }

    pub fn elements(&self) -> impl Iterator<Item = &Element> {
        self.children.iter().filter_map(|n| match n {
            Node::Element(e) => Some(e),
            _ => None,
        })
    }

    pub fn elements_mut(&mut self) -> impl Iterator<Item = &mut Element> {
        self.children.iter_mut().filter_map(|n| match n {
            Node::Element(e) => Some(e),
            _ => None,
        })
    }

    pub fn has_elements(&self) -> bool {
        self.elements().next().is_some()
    }

    /// First child element with `name`.
    pub fn child(&self, name: &str) -> Option<&Element> {
        self.elements().find(|e| e.name == name)
    }

    /// First child element with `name`, appended when missing.
    pub fn child_or_insert(&mut self, name: &str) -> &mut Element {
        let index = match self.position(|e| e.name == name) {
            Some(index) => index,
            None => {
                self.children.push(Node::Element(Element::new(name)));
                self.children.len() - 1
            }
        };
        match &mut self.children[index] {
            Node::Element(e) => e,
            _ => unreachable!("position only returns element indices"),
        }
    }

    /// Replace the text of the first child element `name`, creating it if needed.
    pub fn set_child_text(&mut self, name: &str, text: impl Into<String>) {
        self.child_or_insert(name).children = vec![Node::Text(text.into())];
    }

    /// Index in `children` of the first element matching `predicate`.
    pub fn position(&self, predicate: impl Fn(&Element) -> bool) -> Option<usize> {
        self.children
            .iter()
            .position(|n| matches!(n, Node::Element(e) if predicate(e)))
    }

    /// Index in `children` of the last element matching `predicate`.
    pub fn rposition(&self, predicate: impl Fn(&Element) -> bool) -> Option<usize> {
        self.children
            .iter()
            .rposition(|n| matches!(n, Node::Element(e) if predicate(e)))
    }

    /// Mutable element at a `children` index returned by [`position`](Self::position).
    pub fn element_at_mut(&mut self, index: usize) -> Option<&mut Element> {
        match self.children.get_mut(index) {
            Some(Node::Element(e)) => Some(e),
            _ => None,
        }
    }

    pub fn insert(&mut self, index: usize, child: Element) {
        self.children.insert(index, Node::Element(child));
    }

    pub fn push(&mut self, child: Element) {
        self.children.push(Node::Element(child));
    }

    /// Keep only the child elements for which `keep` holds; other nodes stay.
    pub fn retain_elements(&mut self, mut keep: impl FnMut(&mut Element) -> bool) {
        self.children.retain_mut(|n| match n {
            Node::Element(e) => keep(e),
            _ => true,
        });
    }
}

/// A parsed document. Only the root element is kept; the XML declaration is
/// always written back as UTF-8.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    pub root: Element,
}

impl Document {
    pub fn parse(text: &str) -> Result<Self, XmlError> {
        let text = text.strip_prefix('\u{feff}').unwrap_or(text);
        let doc = roxmltree::Document::parse(text)?;
        let root_node = doc.root_element();
        let mut root = convert(root_node);

        let mut namespaces = Vec::new();
        for ns in root_node.namespaces() {
            match ns.name() {
                Some("xml") => {}
                Some(prefix) => namespaces.push((format!("xmlns:{}", prefix), ns.uri().to_string())),
                None => namespaces.push(("xmlns".to_string(), ns.uri().to_string())),
            }
        }
        // Declarations come after the other root attributes, as Visual Studio writes them.
        root.attributes.extend(namespaces);
        Ok(Document { root })
    }

    /// Serialize with CRLF line endings and two-space indentation.
    pub fn to_xml(&self) -> String {
        let mut out = String::from("<?xml version=\"1.0\" encoding=\"utf-8\"?>\r\n");
        write_element(&mut out, &self.root, 0);
        out
    }
}

fn convert(node: roxmltree::Node<'_, '_>) -> Element {
    let mut element = Element::new(node.tag_name().name());
    for attr in node.attributes() {
        element
            .attributes
            .push((attr.name().to_string(), attr.value().to_string()));
    }
    for child in node.children() {
        if child.is_element() {
            element.children.push(Node::Element(convert(child)));
        } else if child.is_text() {
            let text = child.text().unwrap_or_default();
            if !text.trim().is_empty() {
                element.children.push(Node::Text(text.to_string()));
            }
        } else if child.is_comment() {
            element
                .children
                .push(Node::Comment(child.text().unwrap_or_default().to_string()));
        }
    }
    element
}

fn escape(text: &str, attribute: bool) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' if attribute => out.push_str("&quot;"),
            c => out.push(c),
        }
    }
    out
}

fn write_element(out: &mut String, element: &Element, depth: usize) {
    let indent = "  ".repeat(depth);
    out.push_str(&indent);
    out.push('<');
    out.push_str(&element.name);
    for (name, value) in &element.attributes {
        out.push(' ');
        out.push_str(name);
        out.push_str("=\"");
        out.push_str(&escape(value, true));
        out.push('"');
    }

    if element.children.is_empty() {
        out.push_str(" />\r\n");
        return;
    }
    if let [Node::Text(text)] = element.children.as_slice() {
        out.push('>');
        out.push_str(&escape(text, false));
        out.push_str(&format!("</{}>\r\n", element.name));
        return;
    }

    out.push_str(">\r\n");
    for child in &element.children {
        match child {
            Node::Element(e) => write_element(out, e, depth + 1),
            Node::Text(text) => {
                out.push_str(&indent);
                out.push_str("  ");
                out.push_str(&escape(text, false));
                out.push_str("\r\n");
            }
            Node::Comment(text) => {
                out.push_str(&indent);
                out.push_str(&format!("  <!--{}-->\r\n", text));
            }
        }
    }
    out.push_str(&indent);
    out.push_str(&format!("</{}>\r\n", element.name));
}
