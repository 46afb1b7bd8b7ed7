//! The element tree the XML side of the converters works on.
mod name;
pub use name::*;

/// An element in the document tree, with a name, attributes, children and text:
/// `<name attr="value">...</name>`
///
/// Elements built by the encoder carry either children or text. Parsed elements keep the
/// direct text they contained even when they also have children.
///
/// Documents with duplicate attributes are rejected by the parser. Searches use the last
/// attribute with a matching name.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Element {
    /// The name of the element.
    pub name: NodeName,

    /// The attributes of the element, in source order.
    pub attributes: Vec<Attribute>,

    /// The child elements, in source order.
    pub children: Vec<Element>,

    /// The direct text content of the element, if any.
    pub text: Option<String>,
}
impl Element {
    /// Create a new element with no attributes, children or text.
    pub fn new(name: impl Into<NodeName>) -> Self {
        Self {
            name: name.into(),
            attributes: vec![],
            children: vec![],
            text: None,
        }
    }

    /// Create a new element whose only content is `text`.
    pub fn with_text(name: impl Into<NodeName>, text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            ..Self::new(name)
        }
    }

    /// Add an attribute to the element.
    pub fn push_attribute(&mut self, attribute: Attribute) {
        self.attributes.push(attribute);
    }

    /// Add a child element.
    pub fn push_child(&mut self, child: Element) {
        self.children.push(child);
    }

    /// Append to the direct text content of the element.
    pub fn push_text(&mut self, text: &str) {
        self.text.get_or_insert_with(String::new).push_str(text);
    }

    /// Get an attribute by name.
    ///
    /// Searches the attributes in reverse order, so the last attribute with the same name is returned.
    #[must_use]
    pub fn get_attribute(&self, prefix: Option<&str>, name: &str) -> Option<&Attribute> {
        self.attributes
            .iter()
            .rev()
            .find(|a| a.name.equals(prefix, name))
    }

    /// Get the first child element with the given unprefixed name.
    #[must_use]
    pub fn child(&self, name: &str) -> Option<&Element> {
        self.children.iter().find(|c| c.name.equals(None, name))
    }

    /// Returns the text content, or `""` if there is none.
    #[must_use]
    pub fn text(&self) -> &str {
        self.text.as_deref().unwrap_or_default()
    }

    /// Returns true if the element has no children and no non-empty text.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.children.is_empty() && self.text().is_empty()
    }
}

/// An attribute set on an element, with a name and value:
/// `name="value"`
#[derive(Debug, Clone, PartialEq)]
pub struct Attribute {
    /// The name of the attribute.
    pub name: NodeName,

    /// The value of the attribute, with entities resolved.
    pub value: String,
}
impl Attribute {
    /// Create a new attribute.
    pub fn new(name: impl Into<NodeName>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}
