//! Tree to XML conversion.
//!
//! ```rust
//! use dataconv::{EncodingConfig, Value, XmlEncoder};
//! use serde_json::json;
//!
//! let encoder = XmlEncoder::new(EncodingConfig::default().with_xml_declaration(false)).unwrap();
//! let tree = Value::from(json!({"name": "Alice", "skills": ["PHP", "XML"]}));
//!
//! let xml = encoder.encode_to_string(&tree).unwrap();
//! assert_eq!(
//!     xml,
//!     "<root>\n  <name>Alice</name>\n  <skills>\n    <item0>PHP</item0>\n    <item1>XML</item1>\n  </skills>\n</root>\n"
//! );
//! ```
use crate::{
    Attribute, Document, Element, Map, Value,
    document::Declaration,
    error::{ConvertError, ErrorKind, Result},
    node::{is_numeric_key, is_valid_tag_name},
    sanitize::strip_invalid_xml_chars,
    to_xml::INDENT,
};
use std::io::Write;
use tracing::{debug, instrument, trace};

/// Namespace of the `xsi:nil` attribute.
pub const XSI_NAMESPACE: &str = "http://www.w3.org/2001/XMLSchema-instance";

/// Options for [`XmlEncoder`].
///
/// The root element name is checked when the encoder is built, not here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodingConfig {
    /// Name of the document root element.
    pub root_element: String,

    /// Whether the output starts with `<?xml version="1.0" encoding="UTF-8"?>`.
    pub xml_declaration: bool,

    /// Render `null` as an empty element marked `xsi:nil="true"`, instead of empty text.
    pub null_as_xsi_nil: bool,

    /// Render booleans as `true`/`false`, instead of `1` and empty text.
    pub bool_as_string: bool,

    /// Indentation unit of the formatted output.
    pub indent: String,
}
impl Default for EncodingConfig {
    fn default() -> Self {
        Self {
            root_element: "root".to_string(),
            xml_declaration: true,
            null_as_xsi_nil: false,
            bool_as_string: false,
            indent: INDENT.to_string(),
        }
    }
}
impl EncodingConfig {
    /// Sets the root element name.
    #[must_use]
    pub fn with_root_element(mut self, name: impl Into<String>) -> Self {
        self.root_element = name.into();
        self
    }

    /// Sets whether the XML declaration is written.
    #[must_use]
    pub fn with_xml_declaration(mut self, enabled: bool) -> Self {
        self.xml_declaration = enabled;
        self
    }

    /// Sets whether `null` is written as `xsi:nil`.
    #[must_use]
    pub fn with_null_as_xsi_nil(mut self, enabled: bool) -> Self {
        self.null_as_xsi_nil = enabled;
        self
    }

    /// Sets whether booleans are written as `true`/`false`.
    #[must_use]
    pub fn with_bool_as_string(mut self, enabled: bool) -> Self {
        self.bool_as_string = enabled;
        self
    }

    /// Sets the indentation unit.
    #[must_use]
    pub fn with_indent(mut self, indent: impl Into<String>) -> Self {
        self.indent = indent.into();
        self
    }
}

/// Renders value trees as XML documents.
///
/// Each map entry becomes an element named after its key, in insertion order:
/// - Maps become elements with one child per entry
/// - Lists become elements with one child per item, named `item0`, `item1`, ...
/// - Integer keys become `item{key}`; other keys must be valid tag names, and
///   any `.` in them is written as `_`
/// - Scalars become text, with invalid XML characters removed
#[derive(Debug, Clone)]
pub struct XmlEncoder {
    config: EncodingConfig,
}
impl XmlEncoder {
    /// Creates an encoder with the given configuration.
    ///
    /// # Errors
    /// Returns [`ErrorKind::InvalidRootName`] if the root element name is not a valid tag name.
    pub fn new(config: EncodingConfig) -> Result<Self> {
        if !is_valid_tag_name(&config.root_element) {
            return Err(ErrorKind::InvalidRootName(config.root_element).into());
        }

        Ok(Self { config })
    }

    /// Returns the configuration of this encoder.
    #[must_use]
    pub fn config(&self) -> &EncodingConfig {
        &self.config
    }

    /// Builds a document from a value, which must be a map.
    ///
    /// # Errors
    /// - [`ErrorKind::InvalidInput`] if the value is not a map
    /// - [`ErrorKind::InvalidKey`] if a key cannot be used as a tag name
    pub fn encode(&self, value: &Value) -> Result<Document> {
        match value {
            Value::Map(map) => self.encode_map(map),
            other => Err(ErrorKind::InvalidInput(format!(
                "expected a map at the top level, found {}",
                other.type_name()
            ))
            .into()),
        }
    }

    /// Builds a document from a map.
    ///
    /// # Errors
    /// Returns [`ErrorKind::InvalidKey`] if a key cannot be used as a tag name.
    #[instrument(skip_all, fields(root = %self.config.root_element))]
    pub fn encode_map(&self, map: &Map) -> Result<Document> {
        debug!(entries = map.len(), "encoding tree");

        let mut root = Element::new(self.config.root_element.as_str());
        if self.config.null_as_xsi_nil && map.values().any(contains_null) {
            root.push_attribute(Attribute::new("xmlns:xsi", XSI_NAMESPACE));
        }
        root.children = self.build_map(map)?;

        Ok(Document {
            declaration: self.config.xml_declaration.then(Declaration::default),
            root,
        })
    }

    /// Builds a document from a value, and formats it.
    ///
    /// # Errors
    /// Fails for the same reasons as [`XmlEncoder::encode`].
    pub fn encode_to_string(&self, value: &Value) -> Result<String> {
        let document = self.encode(value)?;
        let xml = document.to_xml(Some(&self.config.indent))?;

        debug!(bytes = xml.len(), "formatted document");
        Ok(xml)
    }

    /// Builds a document from a value, and writes it formatted to `writer`.
    ///
    /// # Errors
    /// Fails for the same reasons as [`XmlEncoder::encode`], or with [`ErrorKind::Io`]
    /// if the writer fails.
    pub fn write_to<W: Write>(&self, value: &Value, writer: &mut W) -> Result<()> {
        let document = self.encode(value)?;
        document.to_xml_with_writer(writer, Some(&self.config.indent))?;
        Ok(())
    }

    fn build_map(&self, map: &Map) -> Result<Vec<Element>> {
        map.iter()
            .map(|(key, value)| self.build_element(key, value))
            .collect()
    }

    fn build_list(&self, items: &[Value]) -> Result<Vec<Element>> {
        items
            .iter()
            .enumerate()
            .map(|(index, value)| self.build_element(&index.to_string(), value))
            .collect()
    }

    fn build_element(&self, key: &str, value: &Value) -> Result<Element> {
        let tag = tag_for_key(key)?;
        trace!(key, %tag, kind = value.type_name(), "element");

        let element = match value {
            Value::Map(map) => Element {
                children: self.build_map(map)?,
                ..Element::new(tag)
            },

            Value::List(items) => Element {
                children: self.build_list(items)?,
                ..Element::new(tag)
            },

            Value::Null if self.config.null_as_xsi_nil => {
                let mut element = Element::new(tag);
                element.push_attribute(Attribute::new("xsi:nil", "true"));
                element
            }

            Value::Null => Element::new(tag),
            Value::Bool(b) => Element::with_text(tag, self.bool_text(*b)),
            Value::Number(n) => Element::with_text(tag, n.to_string()),
            Value::String(s) => Element::with_text(tag, strip_invalid_xml_chars(s)),
        };

        Ok(element)
    }

    fn bool_text(&self, value: bool) -> &'static str {
        match (self.config.bool_as_string, value) {
            (true, true) => "true",
            (true, false) => "false",
            (false, true) => "1",
            (false, false) => "",
        }
    }
}

/// Turns a map key into an element name.
///
/// Integer keys are prefixed with `item`. Other keys must already be valid tag names;
/// characters outside `[A-Za-z0-9_-]` are then replaced by `_`.
///
/// # Errors
/// Returns [`ErrorKind::InvalidKey`] for keys that are neither integers nor valid tag names.
pub fn tag_for_key(key: &str) -> Result<String> {
    if is_numeric_key(key) {
        return Ok(format!("item{key}"));
    }

    if !is_valid_tag_name(key) {
        return Err(ConvertError::new(ErrorKind::InvalidKey(key.to_string())));
    }

    Ok(key
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '_' | '-') {
                c
            } else {
                '_'
            }
        })
        .collect())
}

/// Convenience for encoding with the default configuration and a custom root element.
///
/// # Errors
/// Fails for the same reasons as [`XmlEncoder::new`] and [`XmlEncoder::encode`].
pub fn to_xml_string(value: &Value, root_element: &str) -> Result<String> {
    XmlEncoder::new(EncodingConfig::default().with_root_element(root_element))?
        .encode_to_string(value)
}

fn contains_null(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::List(items) => items.iter().any(contains_null),
        Value::Map(map) => map.values().any(contains_null),
        Value::Bool(_) | Value::Number(_) | Value::String(_) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn encode(config: EncodingConfig, tree: serde_json::Value) -> Result<String> {
        XmlEncoder::new(config)?.encode_to_string(&Value::from(tree))
    }

    fn kind(result: Result<String>) -> ErrorKind {
        result.expect_err("expected an error").kind
    }

    #[test]
    fn test_simple_map() {
        let xml = encode(
            EncodingConfig::default(),
            json!({"name": "Alice", "age": 30, "skills": ["PHP", "XML"]}),
        )
        .unwrap();

        assert_eq!(
            xml,
            concat!(
                "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n",
                "<root>\n",
                "  <name>Alice</name>\n",
                "  <age>30</age>\n",
                "  <skills>\n",
                "    <item0>PHP</item0>\n",
                "    <item1>XML</item1>\n",
                "  </skills>\n",
                "</root>\n",
            )
        );
    }

    #[test]
    fn test_deeply_nested_map() {
        let xml = encode(
            EncodingConfig::default(),
            json!({"level1": {"level2": {"level3": {"value": "deep"}}}}),
        )
        .unwrap();

        assert!(xml.contains("    <level3>\n      <value>deep</value>\n    </level3>\n"));
    }

    #[test]
    fn test_custom_root_without_declaration() {
        let config = EncodingConfig::default()
            .with_root_element("data")
            .with_xml_declaration(false);
        let xml = encode(config, json!({"value": 42})).unwrap();

        assert_eq!(xml, "<data>\n  <value>42</value>\n</data>\n");
    }

    #[test]
    fn test_null_as_xsi_nil() {
        let config = EncodingConfig::default()
            .with_root_element("data")
            .with_null_as_xsi_nil(true);
        let xml = encode(config, json!({"name": null, "tags": [null, "x"]})).unwrap();

        assert!(xml.contains(
            "<data xmlns:xsi=\"http://www.w3.org/2001/XMLSchema-instance\">\n"
        ));
        assert!(xml.contains("  <name xsi:nil=\"true\" />\n"));
        assert!(xml.contains("    <item0 xsi:nil=\"true\" />\n"));
        assert_eq!(xml.matches("xmlns:xsi").count(), 1);
    }

    #[test]
    fn test_null_without_xsi_nil() {
        let xml = encode(EncodingConfig::default(), json!({"name": null})).unwrap();
        assert!(xml.contains("  <name />\n"));
        assert!(!xml.contains("xsi"));
    }

    #[test]
    fn test_namespace_only_declared_when_needed() {
        let config = EncodingConfig::default().with_null_as_xsi_nil(true);
        let xml = encode(config, json!({"name": "x"})).unwrap();
        assert!(!xml.contains("xmlns:xsi"));
    }

    #[test]
    fn test_bool_as_string() {
        let config = EncodingConfig::default()
            .with_root_element("flags")
            .with_bool_as_string(true);
        let xml = encode(config, json!({"active": true, "deleted": false})).unwrap();

        assert!(xml.contains("<active>true</active>"));
        assert!(xml.contains("<deleted>false</deleted>"));
    }

    #[test]
    fn test_bool_default_representation() {
        let xml = encode(EncodingConfig::default(), json!({"active": true, "deleted": false}))
            .unwrap();

        assert!(xml.contains("<active>1</active>"));
        assert!(xml.contains("<deleted />"));
    }

    #[test]
    fn test_removes_invalid_xml_characters() {
        let xml = encode(EncodingConfig::default(), json!({"data": "Hello\u{1}\u{2} World"}))
            .unwrap();
        assert!(xml.contains("<data>Hello World</data>"));
    }

    #[test]
    fn test_escapes_markup_in_text() {
        let xml = encode(EncodingConfig::default(), json!({"html": "<b>&</b>"})).unwrap();
        assert!(xml.contains("<html>&lt;b&gt;&amp;&lt;/b&gt;</html>"));
    }

    #[test]
    fn test_numeric_and_dotted_keys() {
        let mut map = Map::new();
        map.insert("0".to_string(), Value::from("zero"));
        map.insert("5".to_string(), Value::from("five"));
        map.insert("-1".to_string(), Value::from("minus"));
        map.insert("a.b-c".to_string(), Value::from("dotted"));

        let xml = XmlEncoder::new(EncodingConfig::default())
            .unwrap()
            .encode_to_string(&Value::Map(map))
            .unwrap();

        assert!(xml.contains("<item0>zero</item0>"));
        assert!(xml.contains("<item5>five</item5>"));
        assert!(xml.contains("<item-1>minus</item-1>"));
        assert!(xml.contains("<a_b-c>dotted</a_b-c>"));
    }

    #[test]
    fn test_nested_lists() {
        let xml = encode(EncodingConfig::default(), json!({"grid": [[1, 2], [3]]})).unwrap();
        assert!(xml.contains(concat!(
            "  <grid>\n",
            "    <item0>\n",
            "      <item0>1</item0>\n",
            "      <item1>2</item1>\n",
            "    </item0>\n",
            "    <item1>\n",
            "      <item0>3</item0>\n",
            "    </item1>\n",
            "  </grid>\n",
        )));
    }

    #[test]
    fn test_rejects_invalid_root() {
        let err = XmlEncoder::new(EncodingConfig::default().with_root_element("123Invalid"))
            .unwrap_err();
        assert!(matches!(err.kind, ErrorKind::InvalidRootName(name) if name == "123Invalid"));

        assert!(XmlEncoder::new(EncodingConfig::default().with_root_element("root")).is_ok());
    }

    #[test]
    fn test_rejects_invalid_key() {
        let result = encode(
            EncodingConfig::default(),
            json!({"valid": "yes", "🤖invalid": "no"}),
        );
        assert!(matches!(kind(result), ErrorKind::InvalidKey(key) if key == "🤖invalid"));

        let result = encode(EncodingConfig::default(), json!({"nested": {"": 1}}));
        assert!(matches!(kind(result), ErrorKind::InvalidKey(key) if key.is_empty()));
    }

    #[test]
    fn test_rejects_non_map_input() {
        for tree in [json!("not-a-map"), json!(["a"]), json!(null), json!(1)] {
            let result = encode(EncodingConfig::default(), tree);
            assert!(matches!(kind(result), ErrorKind::InvalidInput(_)));
        }
    }

    #[test]
    fn test_encode_builds_document() {
        let encoder = XmlEncoder::new(EncodingConfig::default().with_root_element("data")).unwrap();
        let document = encoder
            .encode(&Value::from(json!({"name": "XML"})))
            .unwrap();

        assert_eq!(document.root.name, "data");
        assert_eq!(document.root.child("name").map(Element::text), Some("XML"));
    }

    #[test]
    fn test_write_to() {
        let encoder = XmlEncoder::new(EncodingConfig::default().with_xml_declaration(false))
            .unwrap();
        let mut output = Vec::new();
        encoder
            .write_to(&Value::from(json!({"a": "b"})), &mut output)
            .unwrap();

        assert_eq!(String::from_utf8(output).unwrap(), "<root>\n  <a>b</a>\n</root>\n");
    }

    #[test]
    fn test_to_xml_string() {
        let xml = to_xml_string(&Value::from(json!({"greeting": "Hi"})), "message").unwrap();
        assert!(xml.contains("<message>"));
        assert!(xml.contains("<greeting>Hi</greeting>"));
    }

    #[test]
    fn test_tag_for_key() {
        assert_eq!(tag_for_key("12").unwrap(), "item12");
        assert_eq!(tag_for_key("first.name").unwrap(), "first_name");
        assert_eq!(tag_for_key("_x-y").unwrap(), "_x-y");
        assert!(tag_for_key("1.5").is_err());
        assert!(tag_for_key("has space").is_err());
    }
}
