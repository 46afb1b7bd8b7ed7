//! XML to tree conversion.
//!
//! Decoding is the partial inverse of [`crate::XmlEncoder`]: every value comes back as a
//! string or a map, repeated sibling tags become lists, and list index tags such as
//! `item0` are kept as they are.
//!
//! ```rust
//! use dataconv::{Value, from_xml_str};
//!
//! let tree = from_xml_str("<root><tag>one</tag><tag>two</tag><n>3</n></root>").unwrap();
//! assert_eq!(tree["tag"], Value::List(vec!["one".into(), "two".into()]));
//! assert_eq!(tree["n"], Value::from("3"));
//! ```
use crate::{Document, Element, Map, Value, error::Result};
use tracing::{debug, instrument};

/// Key prefix for attributes.
pub const ATTRIBUTE_PREFIX: char = '@';

/// Key holding the text of an element that also has attributes.
pub const TEXT_KEY: &str = "#text";

/// Converts XML documents into value trees.
///
/// For each element:
/// 1. Attributes become `@name` keys, in source order. Namespace declarations and
///    prefixed attributes such as `xsi:nil` are skipped.
/// 2. Child elements are converted recursively and stored under their tag. Repeated
///    tags are collected into a list, in document order.
/// 3. An element without children whose text is not blank becomes that text, or a
///    `#text` key if it also has attributes.
///
/// Text next to child elements is discarded, and an element with nothing in it
/// becomes an empty map.
#[derive(Debug, Clone, Copy, Default)]
pub struct XmlDecoder;
impl XmlDecoder {
    /// Creates a new decoder.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Parses `xml` and converts its root element into a map.
    ///
    /// A root element that holds only text comes back as `{"#text": text}`.
    ///
    /// # Errors
    /// Returns [`crate::ErrorKind::MalformedXml`] if the text is not a well-formed document.
    #[instrument(skip_all, fields(bytes = xml.len()))]
    pub fn decode(&self, xml: &str) -> Result<Map> {
        let document = Document::parse_str(xml)?;
        let map = self.decode_document(&document);

        debug!(keys = map.len(), "decoded document");
        Ok(map)
    }

    /// Converts the root element of an already parsed document into a map.
    #[must_use]
    pub fn decode_document(&self, document: &Document) -> Map {
        match convert_element(&document.root) {
            Value::Map(map) => map,
            text => Map::from([(TEXT_KEY.to_string(), text)]),
        }
    }
}

/// Parses `xml` and converts it with [`XmlDecoder::decode`].
///
/// # Errors
/// Returns [`crate::ErrorKind::MalformedXml`] if the text is not a well-formed document.
pub fn from_xml_str(xml: &str) -> Result<Map> {
    XmlDecoder::new().decode(xml)
}

/// Converts one element into either a [`Value::Map`] or a [`Value::String`].
#[must_use]
pub fn convert_element(element: &Element) -> Value {
    let mut result = Map::new();

    for attribute in &element.attributes {
        if attribute.name.is_prefixed() || attribute.name.is_namespace_declaration() {
            continue;
        }

        result.insert(
            format!("{ATTRIBUTE_PREFIX}{}", attribute.name.local),
            Value::String(attribute.value.clone()),
        );
    }

    for child in &element.children {
        let value = convert_element(child);
        match result.get_mut(&child.name.to_string()) {
            Some(Value::List(items)) => items.push(value),
            Some(existing) => {
                let first = std::mem::take(existing);
                *existing = Value::List(vec![first, value]);
            }
            None => {
                result.insert(child.name.to_string(), value);
            }
        }
    }

    let text = element.text();
    if element.children.is_empty() && !text.trim().is_empty() {
        if result.is_empty() {
            return Value::String(text.to_string());
        }

        result.insert(TEXT_KEY.to_string(), Value::String(text.to_string()));
    }

    Value::Map(result)
}
