//! XML element content.

use indexmap::IndexMap;

/// Attributes of an element keyed by qualified name, in document order.
pub type Attributes = IndexMap<String, String>;

/// An XML element with its attributes, leading text and child elements.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct XmlElement {
    /// The qualified name of the element (e.g., "Order", "ns0:Order").
    name: String,
    /// Attributes as key-value pairs. The key is the qualified attribute name.
    attributes: Attributes,
    /// Character data before the first child element, untrimmed.
    text: String,
    /// Child elements in document order.
    children: Vec<XmlElement>,
}

impl XmlElement {
    /// Creates a new element with the given name and attributes.
    pub fn new(name: impl Into<String>, attributes: Attributes) -> Self {
        XmlElement {
            name: name.into(),
            attributes,
            text: String::new(),
            children: Vec::new(),
        }
    }

    /// Creates an element with no attributes.
    pub fn named(name: impl Into<String>) -> Self {
        Self::new(name, Attributes::new())
    }

    /// Adds an attribute, replacing any previous value.
    pub fn with_attr(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }

    /// Sets the leading text.
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    /// Appends a child element.
    pub fn with_child(mut self, child: XmlElement) -> Self {
        self.children.push(child);
        self
    }

    /// Returns the qualified name of the element.
    pub fn qname(&self) -> &str {
        &self.name
    }

    /// Returns the attributes.
    pub fn attributes(&self) -> &Attributes {
        &self.attributes
    }

    /// Returns the character data that precedes the first child element.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Appends character data to the leading text.
    ///
    /// Ignored once the element has children: text after a child element is
    /// that child's tail, not part of this element's content.
    pub fn push_text(&mut self, text: &str) {
        if self.children.is_empty() {
            self.text.push_str(text);
        }
    }

    /// Appends a child element.
    pub fn add_child(&mut self, child: XmlElement) {
        self.children.push(child);
    }

    /// Returns the child elements.
    pub fn children(&self) -> &[XmlElement] {
        &self.children
    }

    /// Returns the number of child elements.
    pub fn child_count(&self) -> usize {
        self.children.len()
    }
}
