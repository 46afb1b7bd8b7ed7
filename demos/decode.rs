//! XML Decoder Example
//!
//! This example reads an XML document into a tree using the `dataconv` crate, and prints it as JSON.
//!
//! It shows how attributes, repeated tags and text are mapped.
use dataconv::{JsonEncoder, JsonFlags, Value, XmlDecoder};

const DOCUMENT: &str = include_str!("../tests/fixtures/bookstore.xml");

fn main() {
    //
    // Parse and convert the document.
    //
    // If an error occurs, the error message is designed to be human-readable;
    //      | </bookstore>
    //      = At 25:3
    //      = Invalid XML input: Expected </address>, found </bookstore>
    let tree = match XmlDecoder::new().decode(DOCUMENT) {
        Ok(tree) => tree,
        Err(e) => panic!("Error decoding XML document:\n{e}"),
    };

    //
    // Attributes are stored under `@name` keys, ahead of the children.
    if let Some(name) = tree.get("@name") {
        println!("The bookstore name is {name}");
    }

    //
    // Tags that repeat under one parent become a list, in document order.
    // A tag that occurs once stays a single value, so check for both.
    match &tree["book"] {
        Value::List(books) => println!("There are {} books", books.len()),
        _ => println!("There is one book"),
    }

    //
    // Everything is text in XML, so all scalars come back as strings.
    // An element with attributes and text keeps the text under `#text`.
    let json = JsonEncoder::with_flags(JsonFlags::default().with_escape_slashes(false))
        .encode(&Value::Map(tree))
        .unwrap();
    println!("{json}");
}
