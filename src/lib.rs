//! Converts generic value trees to and from XML and JSON.
//!
//! The tree is a [`Value`]: null, bool, number, string, list, or an insertion-ordered
//! [`Map`]. The XML mapping is intentionally lossy:
//! - [`XmlEncoder`] writes map keys as element names, list items as `item0`, `item1`, ...
//!   and scalars as text
//! - [`XmlDecoder`] reads attributes as `@name` keys, repeated tags as lists, and
//!   every scalar back as a string
//!
//! JSON goes through `serde_json` with [`JsonEncoder`] and [`JsonDecoder`].
//!
//! # Example
//! ```rust
//! use dataconv::{EncodingConfig, Value, XmlDecoder, XmlEncoder};
//! use serde_json::json;
//!
//! let encoder = XmlEncoder::new(EncodingConfig::default()).unwrap();
//! let xml = encoder
//!     .encode_to_string(&Value::from(json!({"name": "Alice", "age": 30})))
//!     .unwrap();
//! assert!(xml.contains("<name>Alice</name>"));
//! assert!(xml.contains("<age>30</age>"));
//!
//! let tree = XmlDecoder::new().decode(&xml).unwrap();
//! assert_eq!(Value::Map(tree), Value::from(json!({"name": "Alice", "age": "30"})));
//! ```
#![warn(missing_docs)]

mod decoder;
mod document;
mod encoder;
mod error;
mod json;
mod node;
mod sanitize;
mod value;

pub mod to_xml;

pub use decoder::{ATTRIBUTE_PREFIX, TEXT_KEY, XmlDecoder, convert_element, from_xml_str};
pub use document::{Declaration, Document};
pub use encoder::{EncodingConfig, XSI_NAMESPACE, XmlEncoder, tag_for_key, to_xml_string};
pub use error::{ConvertError, ErrorContext, ErrorKind, Result, XmlSyntaxError};
pub use json::{JsonDecoder, JsonEncoder, JsonFlags, from_json_str, to_json_string};
pub use node::{Attribute, Element, NodeName, is_numeric_key, is_valid_tag_name};
pub use sanitize::{is_invalid_xml_char, strip_invalid_xml_chars};
pub use value::{Map, Number, Value};
