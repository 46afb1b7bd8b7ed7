//! XML formatting module
//!
//! Use [`Document::to_xml`] unless you need to write the XML to a file or other writer.
use crate::{Document, Element, NodeName};
use htmlentity::entity::ICodedDataTrait;
use htmlentity::entity::{CharacterSet, EncodeType, encode};
use std::io::Write;

/// Default indentation unit.
pub const INDENT: &str = "  ";

/// Flatten a document as a formatted XML string using the given writer.
///
/// Elements with children are written over several lines, one `indent` per depth.
/// Elements with only text are written on one line, `<name>text</name>`, and elements
/// with neither are self-closing.
///
/// # Errors
/// This function will return an error if the writer fails to write the XML string.
pub fn write_xml(
    writer: &mut dyn Write,
    document: &Document,
    indent: Option<&str>,
) -> std::io::Result<()> {
    let indent = indent.unwrap_or(INDENT);

    //
    // Write the XML declaration
    if let Some(declaration) = &document.declaration {
        let version = encode_entities(&declaration.version)?;
        write!(writer, r#"<?xml version="{version}""#)?;

        if let Some(encoding) = &declaration.encoding {
            let encoding = encode_entities(encoding)?;
            write!(writer, r#" encoding="{encoding}""#)?;
        }

        if let Some(standalone) = declaration.standalone {
            let standalone = if standalone { "yes" } else { "no" };
            write!(writer, r#" standalone="{standalone}""#)?;
        }

        writer.write_all(b"?>\n")?;
    }

    //
    // Write the root element
    let mut stack = vec![(ElementTask::Open(&document.root), 0)];
    while let Some((task, depth)) = stack.pop() {
        let tab = indent.repeat(depth);

        match task {
            ElementTask::Close(name) => {
                writeln!(writer, "{tab}</{name}>")?;
            }

            ElementTask::Open(element) => {
                let name = &element.name;
                write!(writer, "{tab}<{name}")?;

                for attr in &element.attributes {
                    let value = encode_entities(&attr.value)?;
                    write!(writer, r#" {}="{value}""#, attr.name)?;
                }

                let text = element.text();
                if element.children.is_empty() {
                    if text.is_empty() {
                        writer.write_all(b" />\n")?;
                    } else {
                        let text = encode_entities(text)?;
                        writeln!(writer, ">{text}</{name}>")?;
                    }
                    continue;
                }

                writer.write_all(b">\n")?;

                // Mixed content only comes from parsed documents
                let text = text.trim();
                if !text.is_empty() {
                    let text = encode_entities(text)?;
                    writeln!(writer, "{tab}{indent}{text}")?;
                }

                stack.push((ElementTask::Close(name), depth));
                for child in element.children.iter().rev() {
                    stack.push((ElementTask::Open(child), depth + 1));
                }
            }
        }
    }

    Ok(())
}

/// Escapes `&`, `<`, `>`, `"` and `'`.
fn encode_entities(input: &str) -> std::io::Result<String> {
    encode(
        input.as_bytes(),
        &EncodeType::NamedOrHex,
        &CharacterSet::SpecialChars,
    )
    .to_string()
    .map_err(std::io::Error::other)
}

enum ElementTask<'doc> {
    Open(&'doc Element),
    Close(&'doc NodeName),
}
