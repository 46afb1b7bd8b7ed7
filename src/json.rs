//! JSON conversion, delegated to `serde_json`.
//!
//! ```rust
//! use dataconv::{JsonDecoder, JsonEncoder, JsonFlags, Value};
//!
//! let tree = JsonDecoder::new().decode(r#"{"url": "https://example.com", "ok": true}"#).unwrap();
//! assert_eq!(tree.get("ok"), Some(&Value::Bool(true)));
//!
//! let compact = JsonEncoder::with_flags(JsonFlags::default().with_pretty(false));
//! assert_eq!(
//!     compact.encode(&tree).unwrap(),
//!     r#"{"url":"https:\/\/example.com","ok":true}"#
//! );
//! ```
use crate::{
    Value,
    error::{ErrorKind, Result},
};
use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use tracing::{debug, instrument};

/// Indentation of pretty-printed output.
const PRETTY_INDENT: &[u8] = b"    ";

/// Formatting options for [`JsonEncoder`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JsonFlags {
    /// Write one value per line, indented by four spaces.
    pub pretty: bool,

    /// Write `/` as `\/`.
    pub escape_slashes: bool,
}
impl Default for JsonFlags {
    fn default() -> Self {
        Self {
            pretty: true,
            escape_slashes: true,
        }
    }
}
impl JsonFlags {
    /// Sets whether the output is pretty-printed.
    #[must_use]
    pub fn with_pretty(mut self, enabled: bool) -> Self {
        self.pretty = enabled;
        self
    }

    /// Sets whether `/` is escaped.
    #[must_use]
    pub fn with_escape_slashes(mut self, enabled: bool) -> Self {
        self.escape_slashes = enabled;
        self
    }
}

/// Writes value trees as JSON text.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonEncoder {
    flags: JsonFlags,
}
impl JsonEncoder {
    /// Creates an encoder with the default flags: pretty-printed, slashes escaped.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an encoder with the given flags.
    #[must_use]
    pub fn with_flags(flags: JsonFlags) -> Self {
        Self { flags }
    }

    /// Returns the flags of this encoder.
    #[must_use]
    pub fn flags(&self) -> JsonFlags {
        self.flags
    }

    /// Encodes a value as JSON.
    ///
    /// # Errors
    /// Returns [`ErrorKind::InvalidInput`] if the serializer rejects the value.
    #[instrument(skip_all)]
    pub fn encode(&self, value: &Value) -> Result<String> {
        let mut buffer = Vec::new();
        let written = if self.flags.pretty {
            let formatter = PrettyFormatter::with_indent(PRETTY_INDENT);
            let mut serializer = serde_json::Serializer::with_formatter(&mut buffer, formatter);
            value.serialize(&mut serializer)
        } else {
            let mut serializer = serde_json::Serializer::new(&mut buffer);
            value.serialize(&mut serializer)
        };
        written.map_err(|e| ErrorKind::InvalidInput(format!("cannot encode as JSON: {e}")))?;

        let json = String::from_utf8(buffer)
            .map_err(|e| ErrorKind::InvalidInput(format!("cannot encode as JSON: {e}")))?;

        debug!(bytes = json.len(), "encoded JSON");

        // `/` can only occur inside strings
        if self.flags.escape_slashes {
            Ok(json.replace('/', "\\/"))
        } else {
            Ok(json)
        }
    }
}

/// Reads value trees from JSON text.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonDecoder;
impl JsonDecoder {
    /// Creates a new decoder.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Decodes JSON text whose top level is an object or an array.
    ///
    /// # Errors
    /// - [`ErrorKind::MalformedJson`] if the text is not valid JSON
    /// - [`ErrorKind::InvalidInput`] if the top level is a scalar or `null`
    #[instrument(skip_all, fields(bytes = text.len()))]
    pub fn decode(&self, text: &str) -> Result<Value> {
        let value: Value = serde_json::from_str(text)?;

        match value {
            Value::Map(_) | Value::List(_) => Ok(value),
            other => Err(ErrorKind::InvalidInput(format!(
                "expected JSON to decode to a map or list, found {}",
                other.type_name()
            ))
            .into()),
        }
    }
}

/// Encodes a value with the default [`JsonFlags`].
///
/// # Errors
/// See [`JsonEncoder::encode`].
pub fn to_json_string(value: &Value) -> Result<String> {
    JsonEncoder::new().encode(value)
}

/// Decodes JSON text with [`JsonDecoder::decode`].
///
/// # Errors
/// See [`JsonDecoder::decode`].
pub fn from_json_str(text: &str) -> Result<Value> {
    JsonDecoder::new().decode(text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_simple_map_to_json() {
        let value = Value::from(json!({"name": "Alice", "active": true}));
        let json = to_json_string(&value).unwrap();

        assert_eq!(json, "{\n    \"name\": \"Alice\",\n    \"active\": true\n}");
    }

    #[test]
    fn test_custom_flags() {
        let value = Value::from(json!({"url": "https://example.com"}));
        let flags = JsonEncoder::new().flags().with_escape_slashes(false);
        let json = JsonEncoder::with_flags(flags).encode(&value).unwrap();

        assert!(json.contains("https://example.com"));
        assert!(!json.contains("\\/"));
    }

    #[test]
    fn test_slashes_escaped_by_default() {
        let value = Value::from(json!(["a/b"]));
        let json = JsonEncoder::with_flags(JsonFlags::default().with_pretty(false))
            .encode(&value)
            .unwrap();

        assert_eq!(json, r#"["a\/b"]"#);
        assert_eq!(from_json_str(&json).unwrap(), value);
    }

    #[test]
    fn test_simple_json_to_tree() {
        let value = from_json_str(r#"{"name":"Alice","active":true}"#).unwrap();
        assert_eq!(value, Value::from(json!({"name": "Alice", "active": true})));
    }

    #[test]
    fn test_invalid_json() {
        let err = from_json_str(r#"{"name": "Alice", "#).unwrap_err();
        assert!(matches!(err.kind, ErrorKind::MalformedJson(_)));
    }

    #[test]
    fn test_scalar_top_level_rejected() {
        for text in [r#""just a string""#, "42", "null", "true"] {
            let err = from_json_str(text).unwrap_err();
            assert!(matches!(err.kind, ErrorKind::InvalidInput(_)), "{text}");
        }
    }

    #[test]
    fn test_list_top_level_accepted() {
        let value = from_json_str("[1, 2]").unwrap();
        assert_eq!(value.as_list().map(<[Value]>::len), Some(2));
    }
}
