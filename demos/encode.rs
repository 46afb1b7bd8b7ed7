//! XML Encoder Example
//!
//! This example turns a JSON document into XML using the `dataconv` crate.
//!
//! It shows the encoder configuration, and what happens to lists, nulls and booleans on the way.
use dataconv::{EncodingConfig, JsonDecoder, XmlEncoder};

const SRC: &str = r#"{
    "name": "Alice",
    "active": true,
    "nickname": null,
    "skills": ["Rust", "XML"],
    "address": {"city": "Paris", "zip.code": "75001"}
}"#;

fn main() {
    //
    // Any JSON object or array is a valid tree.
    // Only objects can be encoded as XML though, since the top level becomes the root's children.
    let tree = JsonDecoder::new().decode(SRC).unwrap();

    //
    // The root name is checked up front, so a bad one fails here and not halfway through a document.
    //
    // With `null_as_xsi_nil`, `nickname` becomes `<nickname xsi:nil="true" />`,
    // and the root gets the matching `xmlns:xsi` declaration.
    //
    // Without `bool_as_string`, booleans are written as `1` and an empty string.
    let config = EncodingConfig::default()
        .with_root_element("person")
        .with_null_as_xsi_nil(true)
        .with_bool_as_string(true)
        .with_indent("    ");
    let encoder = XmlEncoder::new(config).unwrap();

    //
    // Lists have no tag of their own, so their items are written as `item0`, `item1`, ...
    // Keys that are valid tag names but contain a `.` have it replaced: `zip.code` -> `zip_code`.
    //
    // Keys that are not valid tag names at all, like `@id` or `first name`, are an error.
    let xml = encoder.encode_to_string(&tree).unwrap();
    println!("{xml}");

    //
    // You can also build the document first, and change it before writing it out.
    let mut document = encoder.encode(&tree).unwrap();
    document.declaration = None;
    println!("{}", document.to_xml(Some("\t")).unwrap());
}
