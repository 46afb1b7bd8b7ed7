use crate::{
    error::{ConvertError, ErrorContext, ErrorKind, Result, XmlSyntaxError},
    node::{Attribute, Element, NodeName},
};
use std::io::Write;
use xmlparser::{ElementEnd, Reference, StrSpan, Stream, TextPos, Token};

macro_rules! bail {
    ($src:expr, $start:expr, msg = $($fmt:tt)+) => {
        bail!($src, $start, XmlSyntaxError::Unexpected(format!($($fmt)+)))
    };

    ($src:expr, $start:expr, $kind:expr) => {
        return Err(ConvertError::with_context(
            ErrorKind::MalformedXml($kind),
            ErrorContext::new($src, $start),
        ))
    };
}

/// An XML document: an optional declaration and a root element.
///
/// Documents are produced either by parsing text with [`Document::parse_str`], or by
/// the tree encoder. Comments, processing instructions and DTDs are accepted by the
/// parser but not kept.
///
/// Other things to note:
/// - Names of elements and attributes can have a namespace prefix, kept verbatim
/// - Text and CDATA directly inside an element are concatenated into [`Element::text`]
/// - The predefined entities and character references are resolved; any other `&` is an error
/// - The parser will not attempt to recover from invalid closing tags, or unclosed tags.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    /// The `<?xml` declaration, if present.
    pub declaration: Option<Declaration>,

    /// The root of the tree.
    pub root: Element,
}
impl Document {
    /// Creates a new document, with a `1.0`/`UTF-8` declaration, and a root element with the given name.
    pub fn new(root_name: impl Into<NodeName>) -> Self {
        Self {
            declaration: Some(Declaration::default()),
            root: Element::new(root_name),
        }
    }

    /// Parses a document from the given source string.
    ///
    /// # Errors
    /// Returns [`ErrorKind::MalformedXml`] if the text is not a well-formed document.
    ///
    /// # Example
    /// ```rust
    /// use dataconv::Document;
    ///
    /// let doc = Document::parse_str("<test><test2>test</test2></test>").unwrap();
    /// assert_eq!(doc.root.name, "test");
    /// assert_eq!(doc.root.children.len(), 1);
    /// ```
    #[expect(clippy::too_many_lines, reason = "State machine; what did you expect")]
    pub fn parse_str(src: &str) -> Result<Self> {
        let mut tokenizer = xmlparser::Tokenizer::from(src);

        let mut state = ParserState::Prolog;
        let mut stack: Vec<(Element, usize)> = vec![];

        let mut declaration = None;
        let mut prolog_started = false;
        let mut root = None;

        loop {
            // Get the next token
            let Some(next) = tokenizer.next() else {
                if let Some((last, start)) = stack.pop() {
                    bail!(src, start, XmlSyntaxError::UnclosedTag(last.name.to_string()));
                }

                let Some(root) = root else {
                    bail!(src, src.len(), XmlSyntaxError::UnexpectedEof);
                };

                return Ok(Self { declaration, root });
            };
            let next = next.map_err(|e| tokenizer_error(src, e))?;
            let start = token_start(&next);

            match state {
                ParserState::Prolog => match next {
                    Token::ElementStart { prefix, local, .. } => {
                        stack.push((Element::new(node_name(prefix, local)), start));
                        state = ParserState::TagAttributes;
                    }

                    Token::Declaration {
                        version,
                        encoding,
                        standalone,
                        ..
                    } => {
                        if prolog_started {
                            bail!(src, start, msg = "<?xml> declaration after the start of the document");
                        }

                        prolog_started = true;
                        declaration = Some(Declaration {
                            version: version.as_str().to_string(),
                            encoding: encoding.map(|e| e.as_str().to_string()),
                            standalone,
                        });
                    }

                    Token::Comment { .. }
                    | Token::ProcessingInstruction { .. }
                    | Token::EmptyDtd { .. }
                    | Token::DtdStart { .. }
                    | Token::EntityDeclaration { .. }
                    | Token::DtdEnd { .. } => prolog_started = true,

                    Token::Text { text } if text.as_str().trim().is_empty() => (),

                    _ => bail!(src, start, msg = "{} in prolog section", token_name(&next)),
                },

                ParserState::TagAttributes => match next {
                    Token::Attribute {
                        prefix,
                        local,
                        value,
                        ..
                    } => {
                        let value = decode_entities(src, value)?;
                        let Some((element, _)) = stack.last_mut() else {
                            bail!(src, start, msg = "attribute outside of a tag");
                        };

                        let name = node_name(prefix, local);
                        if element.get_attribute(name.prefix.as_deref(), &name.local).is_some() {
                            bail!(src, start, msg = "duplicate attribute {name}");
                        }

                        element.push_attribute(Attribute::new(name, value));
                    }

                    Token::ElementEnd {
                        end: ElementEnd::Open,
                        ..
                    } => {
                        state = ParserState::TagChildren;
                    }

                    Token::ElementEnd {
                        end: ElementEnd::Empty,
                        ..
                    } => {
                        let Some((element, _)) = stack.pop() else {
                            bail!(src, start, msg = "end of a tag that was never opened");
                        };

                        state = close_element(element, &mut stack, &mut root);
                    }

                    Token::Text { .. } => {
                        // ignore
                    }

                    _ => bail!(src, start, msg = "{} in tag attributes", token_name(&next)),
                },

                ParserState::TagChildren => match next {
                    Token::ElementStart { prefix, local, .. } => {
                        stack.push((Element::new(node_name(prefix, local)), start));
                        state = ParserState::TagAttributes;
                    }

                    Token::Text { text } => {
                        let text = decode_entities(src, text)?;
                        let Some((element, _)) = stack.last_mut() else {
                            bail!(src, start, msg = "text outside of the root element");
                        };

                        element.push_text(&text);
                    }

                    Token::Cdata { text, .. } => {
                        let Some((element, _)) = stack.last_mut() else {
                            bail!(src, start, msg = "CDATA outside of the root element");
                        };

                        element.push_text(text.as_str());
                    }

                    Token::Comment { .. } | Token::ProcessingInstruction { .. } => (),

                    Token::ElementEnd {
                        end: ElementEnd::Close(prefix, local),
                        ..
                    } => {
                        let Some((element, _)) = stack.pop() else {
                            bail!(src, start, msg = "closing tag that was never opened");
                        };

                        let name = node_name(prefix, local);
                        if element.name != name {
                            bail!(
                                src,
                                start,
                                XmlSyntaxError::MismatchedTag {
                                    expected: element.name.to_string(),
                                    found: name.to_string(),
                                }
                            );
                        }

                        state = close_element(element, &mut stack, &mut root);
                    }

                    _ => bail!(src, start, msg = "{} inside tag", token_name(&next)),
                },

                ParserState::Epilog => match next {
                    Token::Comment { .. } | Token::ProcessingInstruction { .. } => (),

                    Token::Text { text } if text.as_str().trim().is_empty() => (),

                    _ => bail!(src, start, msg = "{} after root", token_name(&next)),
                },
            }
        }
    }

    /// Create a formatted XML string from this document.
    ///
    /// `indent` is repeated once per nesting level. If `None`, two spaces are used.
    ///
    /// # Errors
    /// Can fail if a string in the document cannot be entity encoded.
    ///
    /// # Example
    /// ```rust
    /// use dataconv::{Document, Element};
    ///
    /// let mut doc = Document::new("test");
    /// doc.root.push_child(Element::with_text("test2", "test"));
    ///
    /// let formatted = doc.to_xml(None).unwrap();
    /// assert_eq!(
    ///     formatted,
    ///     "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<test>\n  <test2>test</test2>\n</test>\n"
    /// );
    /// ```
    pub fn to_xml(&self, indent: Option<&str>) -> std::io::Result<String> {
        let mut buffer = vec![];
        self.to_xml_with_writer(&mut buffer, indent)?;

        let buffer = String::from_utf8(buffer).map_err(|e| {
            std::io::Error::new(
                std::io::ErrorKind::InvalidData,
                format!("Failed to convert to UTF-8: {e}"),
            )
        })?;
        Ok(buffer)
    }

    /// Write this document as a formatted XML string using the given writer.
    ///
    /// See [`Document::to_xml`] for more details.
    ///
    /// # Errors
    /// Can fail if the writer fails, or if a string cannot be entity encoded.
    pub fn to_xml_with_writer<W: Write>(
        &self,
        writer: &mut W,
        indent: Option<&str>,
    ) -> std::io::Result<()> {
        crate::to_xml::write_xml(writer, self, indent)
    }
}

#[derive(PartialEq, Debug)]
enum ParserState {
    Prolog,
    TagAttributes,
    TagChildren,
    Epilog,
}

/// Attaches a finished element to its parent, or makes it the root.
fn close_element(
    element: Element,
    stack: &mut [(Element, usize)],
    root: &mut Option<Element>,
) -> ParserState {
    match stack.last_mut() {
        Some((parent, _)) => {
            parent.push_child(element);
            ParserState::TagChildren
        }

        None => {
            *root = Some(element);
            ParserState::Epilog
        }
    }
}

fn node_name(prefix: StrSpan<'_>, local: StrSpan<'_>) -> NodeName {
    let prefix = Some(prefix.as_str()).filter(|p| !p.is_empty());
    NodeName::new(prefix, local.as_str())
}

/// Resolves the predefined entities and character references in a span of text.
///
/// A `&` that does not start one of those is an error, as are references to any
/// other entity.
fn decode_entities(src: &str, span: StrSpan<'_>) -> Result<String> {
    let text = span.as_str();
    if !text.contains('&') {
        return Ok(text.to_string());
    }

    let mut stream = Stream::from_substr(src, span.range());
    let mut decoded = String::with_capacity(text.len());
    while !stream.at_end() {
        if !stream.starts_with(b"&") {
            decoded.push_str(stream.consume_bytes(|_, c| c != b'&').as_str());
            continue;
        }

        let start = stream.pos();
        match stream.consume_reference() {
            Ok(Reference::Char(c)) => decoded.push(c),
            Ok(Reference::Entity(name)) => bail!(src, start, msg = "entity reference &{name};"),
            Err(_) => bail!(src, start, msg = "`&` that does not start a valid reference"),
        }
    }

    Ok(decoded)
}

fn tokenizer_error(src: &str, error: xmlparser::Error) -> ConvertError {
    let start = text_offset(src, error.pos());
    ConvertError::with_context(
        ErrorKind::MalformedXml(error.into()),
        ErrorContext::new(src, start),
    )
}

/// Byte offset of a 1-based row and column, with the column counted in characters.
fn text_offset(src: &str, pos: TextPos) -> usize {
    let row = pos.row.saturating_sub(1) as usize;
    let col = pos.col.saturating_sub(1) as usize;

    let line_start: usize = src.split_inclusive('\n').take(row).map(str::len).sum();
    let line = src[line_start..].split('\n').next().unwrap_or_default();
    let column = line.char_indices().nth(col).map_or(line.len(), |(i, _)| i);

    line_start + column
}

fn token_start(token: &Token<'_>) -> usize {
    match token {
        Token::Declaration { span, .. }
        | Token::ProcessingInstruction { span, .. }
        | Token::Comment { span, .. }
        | Token::DtdStart { span, .. }
        | Token::EmptyDtd { span, .. }
        | Token::EntityDeclaration { span, .. }
        | Token::DtdEnd { span }
        | Token::ElementStart { span, .. }
        | Token::Attribute { span, .. }
        | Token::ElementEnd { span, .. }
        | Token::Cdata { span, .. } => span.start(),
        Token::Text { text } => text.start(),
    }
}

fn token_name(token: &Token<'_>) -> &'static str {
    match token {
        Token::Declaration { .. } => "declaration",
        Token::ProcessingInstruction { .. } => "processing instruction",
        Token::Comment { .. } => "comment",
        Token::DtdStart { .. } | Token::EmptyDtd { .. } | Token::DtdEnd { .. } => "DTD",
        Token::EntityDeclaration { .. } => "entity declaration",
        Token::ElementStart { .. } => "element",
        Token::Attribute { .. } => "attribute",
        Token::ElementEnd { .. } => "closing tag",
        Token::Text { .. } => "text",
        Token::Cdata { .. } => "CDATA",
    }
}

/// The XML declaration.
#[derive(Debug, Clone, PartialEq)]
pub struct Declaration {
    /// The version of the XML declaration.
    pub version: String,

    /// The encoding of the XML declaration.
    pub encoding: Option<String>,

    /// The standalone attribute of the XML declaration.
    pub standalone: Option<bool>,
}
impl Default for Declaration {
    fn default() -> Self {
        Self {
            version: "1.0".to_string(),
            encoding: Some("UTF-8".to_string()),
            standalone: None,
        }
    }
}
