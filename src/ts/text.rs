//! Escaped character data that survives a load/save cycle untouched.

use std::fmt;

use quick_xml::escape::{
    escape,
    unescape,
};

use super::TsError;

/// Character data of a `.ts` element.
///
/// Keeps the text exactly as it appeared in the file (`raw`) next to the
/// decoded value used for lookup. The writer only ever emits `raw`, so
/// `&amp;Cancel` is written back as `&amp;Cancel` even when the decoded
/// form could be escaped in more than one way.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct XmlText {
    raw: String,
    value: String,
}

impl XmlText {
    /// Creates text from a decoded value, escaping it like `lupdate` does.
    #[must_use]
    pub fn new(value: impl Into<String>) -> Self {
        let value = value.into();
        let raw = escape(value.as_str()).into_owned();
        Self { raw, value }
    }

    /// Creates text from raw, still-escaped character data.
    pub fn from_raw(raw: impl Into<String>) -> Result<Self, TsError> {
        let raw = raw.into();
        let value = unescape(&raw)
            .map_err(|source| TsError::Escape { raw: raw.clone(), source })?
            .into_owned();
        Ok(Self { raw, value })
    }

    /// Builds text from already separated parts.
    ///
    /// Used by the reader for Qt's `<byte value="..."/>` escapes, where the
    /// raw form is markup that `unescape` cannot decode.
    pub(crate) const fn from_parts(raw: String, value: String) -> Self {
        Self { raw, value }
    }

    /// The text as it appears in the file.
    #[must_use]
    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// The decoded text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.value
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.value.is_empty()
    }
}

impl fmt::Display for XmlText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.value)
    }
}

impl From<&str> for XmlText {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use googletest::prelude::*;
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case::ampersand("&amp;Cancel", "&Cancel")]
    #[case::markup("&lt;i&gt;(Restart needed)&lt;/I&gt;", "<i>(Restart needed)</I>")]
    #[case::apostrophe("Don&apos;t ask again", "Don't ask again")]
    #[case::quote("&quot;quoted&quot;", "\"quoted\"")]
    #[case::char_ref("tab&#x9;here", "tab\there")]
    #[case::plain("选择颜色", "选择颜色")]
    fn test_from_raw_decodes(#[case] raw: &str, #[case] expected: &str) {
        let text = XmlText::from_raw(raw).unwrap();

        assert_eq!(text.as_str(), expected);
        assert_eq!(text.raw(), raw);
    }

    #[rstest]
    #[case::ampersand("&Cancel", "&amp;Cancel")]
    #[case::markup("<br/>", "&lt;br/&gt;")]
    #[case::apostrophe("G'MIC", "G&apos;MIC")]
    #[case::quote("say \"hi\"", "say &quot;hi&quot;")]
    fn test_new_escapes_like_lupdate(#[case] value: &str, #[case] expected_raw: &str) {
        let text = XmlText::new(value);

        assert_eq!(text.raw(), expected_raw);
        assert_eq!(text.as_str(), value);
    }

    #[googletest::test]
    fn test_raw_form_is_preserved_even_when_not_canonical() {
        // `&#39;` decodes to an apostrophe, but lupdate would write `&apos;`.
        let text = XmlText::from_raw("Qt&#39;s").unwrap();

        expect_that!(text.as_str(), eq("Qt's"));
        expect_that!(text.raw(), eq("Qt&#39;s"));
        expect_that!(XmlText::new(text.as_str()).raw(), eq("Qt&apos;s"));
    }

    #[googletest::test]
    fn test_from_raw_rejects_unknown_entity() {
        let result = XmlText::from_raw("&bogus;");

        expect_that!(result, err(anything()));
    }

    #[googletest::test]
    fn test_empty_text() {
        let text = XmlText::default();

        expect_that!(text.is_empty(), eq(true));
        expect_that!(text.raw(), eq(""));
    }
}
