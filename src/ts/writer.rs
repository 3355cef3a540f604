//! `.ts` document writer producing `lupdate` layout.

use quick_xml::escape::escape;

use super::{
    Context,
    Message,
    Translation,
    TranslationForms,
    TsDocument,
    UnknownElement,
    XmlText,
};
use crate::types::Location;

const INDENT: &str = "    ";

/// 文書を `lupdate` と同じレイアウトで書き出す
///
/// 文字データは原文のまま出力するため、`lupdate` が生成したファイルを
/// [`super::parse_document`] で読んだ文書はバイト単位で同じ内容に戻る。
/// 未知の要素は読み込み時の位置に書き戻す。
#[must_use]
pub fn write_document(document: &TsDocument) -> String {
    let mut writer = TsWriter::default();

    writer.out.push_str(&document.prologue);
    writer.out.push_str("<TS");
    writer.attribute("version", document.version.as_deref());
    writer.attribute("language", document.language.as_deref());
    writer.attribute("sourcelanguage", document.source_language.as_deref());
    writer.out.push_str(">\n");

    for (index, context) in document.contexts.iter().enumerate() {
        writer.unknown_elements(0, &document.unknown_elements, index);
        writer.context(context);
    }
    writer.trailing_unknown_elements(0, &document.unknown_elements, document.contexts.len());

    writer.out.push_str("</TS>");
    writer.out.push_str(&document.epilogue);
    writer.out
}

#[derive(Default)]
struct TsWriter {
    out: String,
}

impl TsWriter {
    fn indent(&mut self, level: usize) {
        for _ in 0..level {
            self.out.push_str(INDENT);
        }
    }

    fn attribute(&mut self, name: &str, value: Option<&str>) {
        if let Some(value) = value {
            self.out.push(' ');
            self.out.push_str(name);
            self.out.push_str("=\"");
            self.out.push_str(&escape(value));
            self.out.push('"');
        }
    }

    fn text_element(&mut self, level: usize, name: &str, text: &XmlText) {
        self.indent(level);
        self.out.push('<');
        self.out.push_str(name);
        self.out.push('>');
        self.out.push_str(text.raw());
        self.out.push_str("</");
        self.out.push_str(name);
        self.out.push_str(">\n");
    }

    /// One element kept verbatim by the reader, on its own line.
    fn raw_element(&mut self, level: usize, markup: &str) {
        self.indent(level);
        self.out.push_str(markup);
        self.out.push('\n');
    }

    /// Elements recorded before the known child at `position`.
    fn unknown_elements(&mut self, level: usize, elements: &[UnknownElement], position: usize) {
        for element in elements.iter().filter(|element| element.position == position) {
            self.raw_element(level, &element.markup);
        }
    }

    /// Elements recorded past the last known child.
    fn trailing_unknown_elements(
        &mut self,
        level: usize,
        elements: &[UnknownElement],
        children: usize,
    ) {
        for element in elements.iter().filter(|element| element.position >= children) {
            self.raw_element(level, &element.markup);
        }
    }

    fn optional_text_element(&mut self, level: usize, name: &str, text: Option<&XmlText>) {
        if let Some(text) = text {
            self.text_element(level, name, text);
        }
    }

    fn context(&mut self, context: &Context) {
        self.out.push_str("<context>\n");
        self.text_element(1, "name", &context.name);
        self.optional_text_element(1, "comment", context.comment.as_ref());
        for (index, message) in context.messages.iter().enumerate() {
            self.unknown_elements(1, &context.unknown_elements, index);
            self.message(message);
        }
        self.trailing_unknown_elements(1, &context.unknown_elements, context.messages.len());
        self.out.push_str("</context>\n");
    }

    fn message(&mut self, message: &Message) {
        self.indent(1);
        self.out.push_str("<message");
        self.attribute("id", message.id.as_deref());
        self.attribute("numerus", message.numerus.then_some("yes"));
        self.out.push_str(">\n");

        for location in &message.locations {
            self.location(location);
        }
        self.text_element(2, "source", &message.source);
        self.optional_text_element(2, "oldsource", message.old_source.as_ref());
        self.optional_text_element(2, "comment", message.comment.as_ref());
        self.optional_text_element(2, "oldcomment", message.old_comment.as_ref());
        self.optional_text_element(2, "extracomment", message.extra_comment.as_ref());
        self.optional_text_element(2, "translatorcomment", message.translator_comment.as_ref());
        self.translation(&message.translation);
        for markup in &message.unknown_elements {
            self.raw_element(2, markup);
        }

        self.indent(1);
        self.out.push_str("</message>\n");
    }

    fn location(&mut self, location: &Location) {
        self.indent(2);
        self.out.push_str("<location");
        self.attribute("filename", location.filename.as_deref());
        let line = location.line.map(|line| line.to_string());
        self.attribute("line", line.as_deref());
        self.out.push_str("/>\n");
    }

    fn translation(&mut self, translation: &Translation) {
        self.indent(2);
        self.out.push_str("<translation");
        self.attribute("type", translation.kind.attribute());
        self.attribute("variants", translation.variants.then_some("yes"));
        self.out.push('>');

        match &translation.forms {
            TranslationForms::Single(text) => self.out.push_str(text.raw()),
            TranslationForms::Plural(forms) => self.forms("numerusform", forms),
            TranslationForms::Variants(variants) => self.forms("lengthvariant", variants),
        }

        self.out.push_str("</translation>\n");
    }

    fn forms(&mut self, name: &str, forms: &[XmlText]) {
        if forms.is_empty() {
            return;
        }
        self.out.push('\n');
        for form in forms {
            self.text_element(3, name, form);
        }
        self.indent(2);
    }
}
