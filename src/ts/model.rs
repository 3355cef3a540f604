//! Document model of a Qt Linguist `.ts` file.

use super::XmlText;
use crate::types::Location;

/// Prologue `lupdate` writes before the root element.
pub const DEFAULT_PROLOGUE: &str = "<?xml version=\"1.0\" encoding=\"utf-8\"?>\n<!DOCTYPE TS>\n";

/// Format version written by current `lupdate`.
pub const DEFAULT_VERSION: &str = "2.1";

/// A whole `.ts` document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TsDocument {
    /// Everything before `<TS`, kept verbatim (XML declaration, comments,
    /// doctype).
    pub prologue: String,
    /// Everything after `</TS>`, kept verbatim.
    pub epilogue: String,
    pub version: Option<String>,
    /// Target language declared by the `language` attribute.
    pub language: Option<String>,
    pub source_language: Option<String>,
    pub contexts: Vec<Context>,
    /// Root-level elements such as `<dependencies>`.
    pub unknown_elements: Vec<UnknownElement>,
}

impl Default for TsDocument {
    fn default() -> Self {
        Self {
            prologue: DEFAULT_PROLOGUE.to_string(),
            epilogue: "\n".to_string(),
            version: Some(DEFAULT_VERSION.to_string()),
            language: None,
            source_language: None,
            contexts: Vec::new(),
            unknown_elements: Vec::new(),
        }
    }
}

impl TsDocument {
    /// Creates an empty document for the given target language.
    #[must_use]
    pub fn new(language: impl Into<String>) -> Self {
        Self { language: Some(language.into()), ..Self::default() }
    }

    /// Finds the first context with the given name.
    #[must_use]
    pub fn context(&self, name: &str) -> Option<&Context> {
        self.contexts.iter().find(|context| context.name.as_str() == name)
    }

    /// Iterates over every message with the name of its context.
    pub fn messages(&self) -> impl Iterator<Item = (&Context, &Message)> {
        self.contexts
            .iter()
            .flat_map(|context| context.messages.iter().map(move |message| (context, message)))
    }
}

/// 解釈しない要素。書き出し時にそのまま復元する。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownElement {
    /// 開始タグの `<` から終了タグの `>` までの原文
    pub markup: String,
    /// この要素より前にある既知の子要素（context / message）の数
    pub position: usize,
}

/// A named group of messages, usually one UI class.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Context {
    pub name: XmlText,
    pub comment: Option<XmlText>,
    pub messages: Vec<Message>,
    pub unknown_elements: Vec<UnknownElement>,
}

impl Context {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: XmlText::new(name), ..Self::default() }
    }

    #[must_use]
    pub fn with_message(mut self, message: Message) -> Self {
        self.messages.push(message);
        self
    }

    /// Keeps markup found after the messages read so far.
    pub(crate) fn keep_unknown(&mut self, markup: String) {
        let position = self.messages.len();
        self.unknown_elements.push(UnknownElement { markup, position });
    }
}

/// One translatable unit.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Message {
    pub id: Option<String>,
    /// `numerus="yes"`: the translation holds plural forms.
    pub numerus: bool,
    pub locations: Vec<Location>,
    pub source: XmlText,
    pub old_source: Option<XmlText>,
    /// Disambiguation comment given by the developer.
    pub comment: Option<XmlText>,
    pub old_comment: Option<XmlText>,
    pub extra_comment: Option<XmlText>,
    pub translator_comment: Option<XmlText>,
    pub translation: Translation,
    /// `<userdata>`, `<extra-*>` and other elements, written after the
    /// translation the way `lupdate` orders them.
    pub unknown_elements: Vec<String>,
}

impl Message {
    /// Creates a finished message with a single-form translation.
    #[must_use]
    pub fn new(source: impl Into<String>, translation: impl Into<String>) -> Self {
        Self {
            source: XmlText::new(source),
            translation: Translation::finished(translation),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_location(mut self, location: Location) -> Self {
        self.locations.push(location);
        self
    }

    #[must_use]
    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = Some(XmlText::new(comment));
        self
    }

    #[must_use]
    pub fn with_type(mut self, kind: TranslationType) -> Self {
        self.translation.kind = kind;
        self
    }

    /// Disambiguation comment, empty when absent.
    #[must_use]
    pub fn disambiguation(&self) -> &str {
        self.comment.as_ref().map_or("", XmlText::as_str)
    }
}

/// Status carried by the `type` attribute of `<translation>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TranslationType {
    /// No `type` attribute.
    #[default]
    Finished,
    Unfinished,
    /// Source string no longer exists in the code (Qt 5+ name).
    Vanished,
    /// Source string no longer exists in the code (legacy name).
    Obsolete,
}

impl TranslationType {
    /// Value of the `type` attribute, `None` for finished translations.
    #[must_use]
    pub const fn attribute(self) -> Option<&'static str> {
        match self {
            Self::Finished => None,
            Self::Unfinished => Some("unfinished"),
            Self::Vanished => Some("vanished"),
            Self::Obsolete => Some("obsolete"),
        }
    }

    #[must_use]
    pub fn from_attribute(value: &str) -> Option<Self> {
        match value {
            "unfinished" => Some(Self::Unfinished),
            "vanished" => Some(Self::Vanished),
            "obsolete" => Some(Self::Obsolete),
            _ => None,
        }
    }

    /// Vanished and obsolete messages are kept for translators only.
    #[must_use]
    pub const fn is_retired(self) -> bool {
        matches!(self, Self::Vanished | Self::Obsolete)
    }
}

/// Translated text of a message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TranslationForms {
    Single(XmlText),
    /// One `<numerusform>` per plural form of the target language.
    Plural(Vec<XmlText>),
    /// `<lengthvariant>` children of a `variants="yes"` translation, longest
    /// first.
    Variants(Vec<XmlText>),
}

impl Default for TranslationForms {
    fn default() -> Self {
        Self::Single(XmlText::default())
    }
}

/// The `<translation>` element.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Translation {
    pub kind: TranslationType,
    /// `variants="yes"`: length variants are present.
    pub variants: bool,
    pub forms: TranslationForms,
}

impl Translation {
    #[must_use]
    pub fn finished(text: impl Into<String>) -> Self {
        Self { forms: TranslationForms::Single(XmlText::new(text)), ..Self::default() }
    }

    #[must_use]
    pub fn plural<I, S>(forms: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            forms: TranslationForms::Plural(forms.into_iter().map(XmlText::new).collect()),
            ..Self::default()
        }
    }

    /// Translation with length variants, longest first.
    #[must_use]
    pub fn variants<I, S>(variants: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            variants: true,
            forms: TranslationForms::Variants(variants.into_iter().map(XmlText::new).collect()),
            ..Self::default()
        }
    }

    /// All forms as decoded text; a single translation yields one item.
    pub fn texts(&self) -> impl Iterator<Item = &str> {
        let forms: &[XmlText] = match &self.forms {
            TranslationForms::Single(text) => std::slice::from_ref(text),
            TranslationForms::Plural(forms) | TranslationForms::Variants(forms) => forms,
        };
        forms.iter().map(XmlText::as_str)
    }

    /// True when no form carries any text.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.texts().all(str::is_empty)
    }
}

#[cfg(test)]
mod tests {
    use googletest::prelude::*;
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case::finished(TranslationType::Finished, None)]
    #[case::unfinished(TranslationType::Unfinished, Some("unfinished"))]
    #[case::vanished(TranslationType::Vanished, Some("vanished"))]
    #[case::obsolete(TranslationType::Obsolete, Some("obsolete"))]
    fn test_translation_type_attribute(
        #[case] kind: TranslationType,
        #[case] expected: Option<&str>,
    ) {
        assert_eq!(kind.attribute(), expected);
        if let Some(value) = expected {
            assert_eq!(TranslationType::from_attribute(value), Some(kind));
        }
    }

    #[googletest::test]
    fn test_plural_translation_is_empty_only_when_all_forms_are() {
        expect_that!(Translation::plural(["", ""]).is_empty(), eq(true));
        expect_that!(Translation::plural(["", "%n files"]).is_empty(), eq(false));
        expect_that!(Translation::finished("").is_empty(), eq(true));
    }

    #[googletest::test]
    fn test_variants_translation() {
        let translation = Translation::variants(["可用滤镜", "滤镜"]);

        expect_that!(translation.variants, eq(true));
        expect_that!(translation.texts().collect::<Vec<_>>(), elements_are![eq(&"可用滤镜"), eq(&"滤镜")]);
        expect_that!(Translation::variants(["", ""]).is_empty(), eq(true));
    }

    #[googletest::test]
    fn test_document_messages_iterates_in_order() {
        let mut document = TsDocument::new("zh");
        document.contexts.push(Context::new("A").with_message(Message::new("one", "一")));
        document.contexts.push(
            Context::new("B").with_message(Message::new("two", "二")).with_message(Message::new(
                "three", "三",
            )),
        );

        let sources: Vec<_> = document
            .messages()
            .map(|(context, message)| format!("{}/{}", context.name, message.source))
            .collect();

        expect_that!(sources, elements_are![eq("A/one"), eq("B/two"), eq("B/three")]);
        expect_that!(document.context("B").map(|c| c.messages.len()), some(eq(2)));
        expect_that!(document.context("C"), none());
    }

    #[googletest::test]
    fn test_disambiguation_defaults_to_empty() {
        let plain = Message::new("Open", "打开");
        let commented = Message::new("Open", "打开").with_comment("menu");

        expect_that!(plain.disambiguation(), eq(""));
        expect_that!(commented.disambiguation(), eq("menu"));
    }
}
