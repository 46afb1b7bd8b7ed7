//! Error handling for tree conversions
use std::fmt;

/// A result type for conversions, which can be either a successful value or an error.
pub type Result<T> = std::result::Result<T, ConvertError>;

/// An error that occurred while converting a tree or a document.
#[derive(Debug)]
pub struct ConvertError {
    /// Source location of the error, for errors raised while parsing XML
    pub context: Option<Box<ErrorContext>>,

    /// The kind of error that occurred
    pub kind: ErrorKind,
}
impl ConvertError {
    /// Creates a new `ConvertError` with no source context
    #[must_use]
    pub fn new(kind: ErrorKind) -> Self {
        Self {
            context: None,
            kind,
        }
    }

    /// Creates a new `ConvertError` pointing at a byte offset of the given source
    #[must_use]
    pub fn with_context(kind: ErrorKind, context: ErrorContext) -> Self {
        Self {
            context: Some(Box::new(context)),
            kind,
        }
    }

    /// Returns the kind of error that occurred.
    #[must_use]
    pub fn kind(&self) -> &ErrorKind {
        &self.kind
    }
}
impl fmt::Display for ConvertError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Some(context) = &self.context else {
            return write!(f, "{}", self.kind);
        };

        write!(f, "{context}")?;
        for line in self.kind.to_string().lines() {
            writeln!(f, "= {line}")?;
        }
        Ok(())
    }
}
impl std::error::Error for ConvertError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        std::error::Error::source(&self.kind)
    }
}
impl From<ErrorKind> for ConvertError {
    fn from(kind: ErrorKind) -> Self {
        Self::new(kind)
    }
}
impl From<std::io::Error> for ConvertError {
    fn from(err: std::io::Error) -> Self {
        Self::new(ErrorKind::Io(err))
    }
}
impl From<serde_json::Error> for ConvertError {
    fn from(err: serde_json::Error) -> Self {
        Self::new(ErrorKind::MalformedJson(err))
    }
}

/// The kind of error that occurred during a conversion.
#[derive(Debug, thiserror::Error)]
pub enum ErrorKind {
    /// The configured root element name is not a legal tag name
    #[error("Invalid XML root element name: '{0}'")]
    InvalidRootName(String),

    /// A map key cannot be turned into a legal tag name
    #[error("Invalid XML element name: '{0}'")]
    InvalidKey(String),

    /// The top-level value does not have the shape the entry point expects
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// The input text is not well-formed XML
    #[error("Invalid XML input: {0}")]
    MalformedXml(#[from] XmlSyntaxError),

    /// The input text is not well-formed JSON
    #[error("Invalid JSON input: {0}")]
    MalformedJson(#[source] serde_json::Error),

    /// Writing the output failed
    #[error("IO error: {0}")]
    Io(#[source] std::io::Error),
}

/// The reason an XML document was rejected by the parser.
#[derive(Debug, thiserror::Error)]
pub enum XmlSyntaxError {
    /// A tag in the document was never closed
    #[error("Unclosed tag: {0}")]
    UnclosedTag(String),

    /// A closing tag does not match the open tag
    #[error("Expected </{expected}>, found </{found}>")]
    MismatchedTag {
        /// Name of the tag that is open
        expected: String,

        /// Name found in the closing tag
        found: String,
    },

    /// File ended unexpectedly
    #[error("End of file reached unexpectedly")]
    UnexpectedEof,

    /// A token that cannot appear at this position
    #[error("Unexpected {0}")]
    Unexpected(String),

    /// XML tokenizing failed
    #[error("XML parser error: {0}")]
    Tokenizer(#[from] xmlparser::Error),
}

/// Context describing the error location in the XML source.
#[derive(Debug, Clone)]
pub struct ErrorContext {
    /// Full source of the document that was parsed, for row/col calculation.
    pub source: String,

    /// Byte offset of the error in the source.
    pub start: usize,
}
impl ErrorContext {
    /// Creates a new `ErrorContext` for the given source and byte offset.
    #[must_use]
    pub fn new(source: &str, start: usize) -> Self {
        Self {
            source: source.to_string(),
            start,
        }
    }

    /// Returns the row and column of the error in the source.
    ///
    /// Both are 1-based.
    #[must_use]
    pub fn position(&self) -> (usize, usize) {
        let mut row = 1;
        let mut col = 1;
        for (i, c) in self.source.char_indices() {
            if i >= self.start {
                break;
            }
            if c == '\n' {
                row += 1;
                col = 1;
            } else {
                col += 1;
            }
        }

        (row, col)
    }

    /// Returns the source line containing the error.
    #[must_use]
    pub fn line(&self) -> &str {
        let start = self.start.min(self.source.len());
        let line_start = self.source[..start].rfind('\n').map_or(0, |i| i + 1);
        let rest = &self.source[line_start..];
        rest.split('\n').next().unwrap_or(rest)
    }
}
impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let line = self.line().trim_end();
        if !line.is_empty() {
            writeln!(f, "| {line}")?;
        }

        let (row, col) = self.position();
        writeln!(f, "= At {row}:{col}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_position() {
        let context = ErrorContext::new("<a>\n  <b>\n</a>", 12);
        assert_eq!(context.position(), (3, 3));
        assert_eq!(context.line(), "</a>");
    }

    #[test]
    fn test_display_without_context() {
        let err = ConvertError::new(ErrorKind::InvalidKey("1abc".to_string()));
        assert_eq!(err.to_string(), "Invalid XML element name: '1abc'");
    }

    #[test]
    fn test_display_with_context() {
        let kind = ErrorKind::MalformedXml(XmlSyntaxError::UnclosedTag("a".to_string()));
        let err = ConvertError::with_context(kind, ErrorContext::new("<a>", 0));
        let text = err.to_string();
        assert!(text.contains("| <a>"));
        assert!(text.contains("= At 1:1"));
        assert!(text.contains("= Invalid XML input: Unclosed tag: a"));
    }
}
