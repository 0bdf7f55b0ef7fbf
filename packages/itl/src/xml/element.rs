//! Owned, immutable XML element tree.
//!
//! `roxmltree` documents borrow their input, which makes them awkward to keep
//! around inside parsed values. `Element` is an owned snapshot of one element
//! and its descendants with the ElementTree-style text model the plist
//! vocabulary needs: `text` is the character data before the first child
//! element and each child's `tail` is the character data that follows it.

use std::collections::BTreeMap;

use roxmltree::{Document, Node, NodeType, ParsingOptions};

use crate::error::{ItlError, Result};
use crate::xml::get_tag_name;

/// An XML element with its attributes, text and element children.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Element {
    tag: String,
    attributes: BTreeMap<String, String>,
    text: Option<String>,
    tail: Option<String>,
    children: Vec<Element>,
}

impl Element {
    /// Create an element with the given tag and nothing else.
    #[must_use]
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            ..Self::default()
        }
    }

    /// Set the text content. An empty string counts as no text.
    #[must_use]
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = non_empty(text.into());
        self
    }

    /// Set the tail text (character data following this element).
    #[must_use]
    pub fn with_tail(mut self, tail: impl Into<String>) -> Self {
        self.tail = non_empty(tail.into());
        self
    }

    /// Add an attribute.
    #[must_use]
    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }

    /// Append a child element.
    #[must_use]
    pub fn with_child(mut self, child: Element) -> Self {
        self.children.push(child);
        self
    }

    /// Append several child elements.
    #[must_use]
    pub fn with_children(mut self, children: impl IntoIterator<Item = Element>) -> Self {
        self.children.extend(children);
        self
    }

    /// Parse an XML document and snapshot its root element.
    ///
    /// # Examples
    /// ```
    /// use idi_itl::xml::Element;
    ///
    /// let e = Element::parse("<dict><key>Name</key> <string>Foo</string></dict>").unwrap();
    /// assert_eq!(e.tag(), "dict");
    /// assert_eq!(e.children().len(), 2);
    /// assert_eq!(e.children()[0].tail(), Some(" "));
    /// ```
    pub fn parse(xml: &str) -> Result<Self> {
        // Exported libraries carry a plist DOCTYPE declaration.
        let options = ParsingOptions {
            allow_dtd: true,
            ..ParsingOptions::default()
        };
        let doc = Document::parse_with_options(xml, options)?;
        Self::from_node(doc.root_element())
    }

    /// Snapshot a `roxmltree` node.
    ///
    /// # Errors
    /// Returns `NotAnElement` if the node is text, a comment, a processing
    /// instruction or the document root.
    pub fn from_node(node: Node<'_, '_>) -> Result<Self> {
        if !node.is_element() {
            return Err(ItlError::NotAnElement(node_type_name(node).to_string()));
        }
        Ok(Self::snapshot(node))
    }

    fn snapshot(node: Node<'_, '_>) -> Self {
        let mut element = Self::new(qualified_tag(node));
        element.attributes = node
            .attributes()
            .map(|a| (a.name().to_string(), a.value().to_string()))
            .chain(namespace_declarations(node))
            .collect();

        // Comments and processing instructions are transparent: text on
        // either side of them joins up.
        let mut text = String::new();
        for child in node.children() {
            if child.is_element() {
                element.children.push(Self::snapshot(child));
            } else if child.is_text() {
                let chunk = child.text().unwrap_or_default();
                match element.children.last_mut() {
                    Some(last) => last.tail.get_or_insert_with(String::new).push_str(chunk),
                    None => text.push_str(chunk),
                }
            }
        }
        element.text = non_empty(text);
        element
    }

    /// Tag name. Namespaced elements use `{uri}name`, so they never match a
    /// plain plist tag.
    #[must_use]
    pub fn tag(&self) -> &str {
        &self.tag
    }

    /// Attributes by name.
    #[must_use]
    pub fn attributes(&self) -> &BTreeMap<String, String> {
        &self.attributes
    }

    /// Character data before the first child element, if any.
    #[must_use]
    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }

    /// Character data after this element inside its parent, if any.
    #[must_use]
    pub fn tail(&self) -> Option<&str> {
        self.tail.as_deref()
    }

    /// Child elements in document order.
    #[must_use]
    pub fn children(&self) -> &[Element] {
        &self.children
    }

    /// A copy of this element without its tail, for keeping as diagnostics.
    #[must_use]
    pub(crate) fn detached(&self) -> Self {
        Self {
            tail: None,
            ..self.clone()
        }
    }
}

fn non_empty(s: String) -> Option<String> {
    if s.is_empty() {
        None
    } else {
        Some(s)
    }
}

fn qualified_tag(node: Node<'_, '_>) -> String {
    let name = get_tag_name(node);
    match node.tag_name().namespace() {
        Some(uri) => format!("{{{uri}}}{name}"),
        None => name.to_string(),
    }
}

/// `xmlns` declarations made on `node` itself, as `(attribute, uri)` pairs.
///
/// `roxmltree` reports them as in-scope namespaces rather than attributes;
/// anything already in scope on the parent was declared higher up.
fn namespace_declarations(node: Node<'_, '_>) -> Vec<(String, String)> {
    let inherited: Vec<(Option<&str>, &str)> = node
        .parent_element()
        .map(|parent| parent.namespaces().map(|ns| (ns.name(), ns.uri())).collect())
        .unwrap_or_default();
    node.namespaces()
        .filter(|ns| ns.name() != Some("xml") && !inherited.contains(&(ns.name(), ns.uri())))
        .map(|ns| {
            let attribute = match ns.name() {
                Some(prefix) => format!("xmlns:{prefix}"),
                None => "xmlns".to_string(),
            };
            (attribute, ns.uri().to_string())
        })
        .collect()
}

fn node_type_name(node: Node<'_, '_>) -> &'static str {
    match node.node_type() {
        NodeType::Root => "document root",
        NodeType::Element => "element",
        NodeType::PI => "processing instruction",
        NodeType::Comment => "comment",
        NodeType::Text => "text",
    }
}
