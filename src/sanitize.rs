//! Removal of characters XML 1.0 cannot carry in text content.
use std::borrow::Cow;

/// Returns true for the C0 control characters other than tab, newline and carriage
/// return, and for DEL.
#[inline]
#[must_use]
pub fn is_invalid_xml_char(c: char) -> bool {
    matches!(c, '\u{00}'..='\u{08}' | '\u{0B}' | '\u{0C}' | '\u{0E}'..='\u{1F}' | '\u{7F}')
}

/// Strips the characters rejected by [`is_invalid_xml_char`] from `text`.
///
/// Everything else, including tabs, newlines and non-ASCII text, is left untouched.
/// Borrows when there is nothing to strip.
#[must_use]
pub fn strip_invalid_xml_chars(text: &str) -> Cow<'_, str> {
    if text.chars().any(is_invalid_xml_char) {
        Cow::Owned(text.chars().filter(|c| !is_invalid_xml_char(*c)).collect())
    } else {
        Cow::Borrowed(text)
    }
}
