use std::fmt;

/// The name of an element or attribute, with an optional prefix:
/// `prefix:local`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct NodeName {
    /// The namespace prefix, if any.
    pub prefix: Option<String>,

    /// The local portion of the name.
    pub local: String,
}
impl NodeName {
    /// Create a new node name.
    pub fn new<T: Into<String>>(prefix: Option<T>, local: T) -> Self {
        Self {
            prefix: prefix.map(Into::into),
            local: local.into(),
        }
    }

    /// Compare the name with a prefix and local name.
    #[must_use]
    pub fn equals(&self, prefix: Option<&str>, local: &str) -> bool {
        self.prefix.as_deref() == prefix && self.local == local
    }

    /// Returns true if the name carries a namespace prefix.
    #[must_use]
    pub fn is_prefixed(&self) -> bool {
        self.prefix.is_some()
    }

    /// Returns true for `xmlns` and `xmlns:*` declarations.
    #[must_use]
    pub fn is_namespace_declaration(&self) -> bool {
        match &self.prefix {
            Some(prefix) => prefix == "xmlns",
            None => self.local == "xmlns",
        }
    }
}
impl fmt::Display for NodeName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(prefix) = &self.prefix {
            write!(f, "{prefix}:{local}", local = self.local)
        } else {
            write!(f, "{local}", local = self.local)
        }
    }
}
impl PartialEq<&str> for NodeName {
    fn eq(&self, other: &&str) -> bool {
        self.to_string().as_str() == *other
    }
}
impl PartialEq<str> for NodeName {
    fn eq(&self, other: &str) -> bool {
        self.to_string().as_str() == other
    }
}
impl From<&str> for NodeName {
    /// Splits on the first `:`; anything after it is the local name.
    fn from(name: &str) -> Self {
        match name.split_once(':') {
            Some((prefix, local)) => NodeName::new(Some(prefix), local),
            None => NodeName::new(None, name),
        }
    }
}
impl From<String> for NodeName {
    fn from(name: String) -> Self {
        NodeName::from(name.as_str())
    }
}

/// Checks whether `name` can be used as an element name.
///
/// A name is valid if it starts with an ASCII letter or `_`, followed by any number of
/// ASCII letters, digits, `_`, `-` or `.`.
#[must_use]
pub fn is_valid_tag_name(name: &str) -> bool {
    let mut chars = name.chars();
    let Some(first) = chars.next() else {
        return false;
    };

    (first.is_ascii_alphabetic() || first == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.'))
}

/// Checks whether a map key is an integer, such as a list index.
///
/// Only an optional leading `-` followed by ASCII digits counts; `"1.5"` or `" 1"` do not.
#[must_use]
pub fn is_numeric_key(key: &str) -> bool {
    let digits = key.strip_prefix('-').unwrap_or(key);
    !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit())
}
