//! `.ts` document reader built on `quick-xml`.

use quick_xml::Reader;
use quick_xml::events::{
    BytesStart,
    Event,
};

use super::{
    Context,
    Message,
    Translation,
    TranslationForms,
    TranslationType,
    TsDocument,
    TsError,
    UnknownElement,
    XmlText,
};
use crate::types::{
    LineNumber,
    Location,
};

/// `.ts` 文書を読み込む
///
/// `<TS>` の前後のテキストと、モデルが解釈しない要素・コメントは原文のまま
/// 保持し、[`super::write_document`] で復元する。
///
/// # Errors
/// Returns [`TsError`] when the input is not well-formed XML or lacks the
/// elements the format requires.
pub fn parse_document(input: &str) -> Result<TsDocument, TsError> {
    TsReader::new(input).read_document()
}

/// A reader event together with its byte span in the input.
struct Spanned<'a> {
    event: Event<'a>,
    start: usize,
    end: usize,
}

struct TsReader<'a> {
    input: &'a str,
    reader: Reader<&'a [u8]>,
}

impl<'a> TsReader<'a> {
    fn new(input: &'a str) -> Self {
        Self { input, reader: Reader::from_str(input) }
    }

    fn position(&self) -> usize {
        usize::try_from(self.reader.buffer_position()).unwrap_or(usize::MAX)
    }

    fn next(&mut self) -> Result<Spanned<'a>, TsError> {
        let start = self.position();
        let event = self
            .reader
            .read_event()
            .map_err(|source| TsError::Xml { position: start, source })?;
        Ok(Spanned { event, start, end: self.position() })
    }

    fn slice(&self, start: usize, end: usize) -> Result<&'a str, TsError> {
        self.input.get(start..end).ok_or(TsError::Utf8(start))
    }

    /// Byte offset of the `<` opening the tag read from `position`.
    ///
    /// The reader may already have consumed the `<` while reading the text
    /// before the tag.
    fn markup_start(&self, position: usize) -> usize {
        self.input
            .get(..=position)
            .and_then(|head| head.rfind('<'))
            .unwrap_or(position)
    }

    fn read_document(mut self) -> Result<TsDocument, TsError> {
        let mut document = TsDocument::default();

        let root_start = loop {
            let spanned = self.next()?;
            match spanned.event {
                Event::Start(start) if start.name().as_ref() == b"TS" => {
                    self.read_root_attributes(&start, &mut document)?;
                    break self.markup_start(spanned.start);
                }
                Event::Empty(start) if start.name().as_ref() == b"TS" => {
                    self.read_root_attributes(&start, &mut document)?;
                    let root_start = self.markup_start(spanned.start);
                    document.prologue = self.slice(0, root_start)?.to_string();
                    document.epilogue = self.slice(spanned.end, self.input.len())?.to_string();
                    return Ok(document);
                }
                Event::Start(_) | Event::Empty(_) | Event::Eof => return Err(TsError::MissingRoot),
                _ => {}
            }
        };
        document.prologue = self.slice(0, root_start)?.to_string();

        loop {
            let spanned = self.next()?;
            let markup = match spanned.event {
                Event::Start(start) if start.name().as_ref() == b"context" => {
                    let context = self.read_context()?;
                    document.contexts.push(context);
                    continue;
                }
                Event::Start(start) => self.capture_element(spanned.start, &start)?,
                Event::Empty(_) | Event::Comment(_) => self.markup(spanned.start, spanned.end)?,
                Event::End(_) => {
                    document.epilogue = self.slice(spanned.end, self.input.len())?.to_string();
                    break;
                }
                Event::Eof => return Err(TsError::UnexpectedEof("TS".to_string())),
                _ => continue,
            };
            let position = document.contexts.len();
            document.unknown_elements.push(UnknownElement { markup, position });
        }

        tracing::debug!(
            contexts = document.contexts.len(),
            unknown_elements = document.unknown_elements.len(),
            language = ?document.language,
            "Parsed translation document"
        );
        Ok(document)
    }

    fn read_root_attributes(
        &self,
        start: &BytesStart<'_>,
        document: &mut TsDocument,
    ) -> Result<(), TsError> {
        document.version = self.attribute(start, b"version")?;
        document.language = self.attribute(start, b"language")?;
        document.source_language = self.attribute(start, b"sourcelanguage")?;
        Ok(())
    }

    fn read_context(&mut self) -> Result<Context, TsError> {
        let mut name = None;
        let mut context = Context::default();

        loop {
            let spanned = self.next()?;
            match spanned.event {
                Event::Start(start) => match start.name().as_ref() {
                    b"name" => name = Some(self.read_text("name")?),
                    b"comment" => context.comment = Some(self.read_text("comment")?),
                    b"message" => {
                        let message = self.read_message(&start, false)?;
                        context.messages.push(message);
                    }
                    _ => {
                        let markup = self.capture_element(spanned.start, &start)?;
                        context.keep_unknown(markup);
                    }
                },
                Event::Empty(start) => match start.name().as_ref() {
                    b"name" => name = Some(XmlText::default()),
                    b"comment" => context.comment = Some(XmlText::default()),
                    b"message" => {
                        let message = self.read_message(&start, true)?;
                        context.messages.push(message);
                    }
                    _ => context.keep_unknown(self.markup(spanned.start, spanned.end)?),
                },
                Event::Comment(_) => {
                    context.keep_unknown(self.markup(spanned.start, spanned.end)?);
                }
                Event::End(_) => break,
                Event::Eof => return Err(TsError::UnexpectedEof("context".to_string())),
                _ => {}
            }
        }

        context.name = name.ok_or(TsError::MissingElement {
            parent: "context",
            child: "name",
            position: self.position(),
        })?;
        Ok(context)
    }

    fn read_message(&mut self, start: &BytesStart<'_>, empty: bool) -> Result<Message, TsError> {
        let mut message = Message {
            id: self.attribute(start, b"id")?,
            numerus: self.attribute(start, b"numerus")?.as_deref() == Some("yes"),
            ..Message::default()
        };
        let mut source = None;

        while !empty {
            let spanned = self.next()?;
            match spanned.event {
                Event::Start(child) => match child.name().as_ref() {
                    b"location" => {
                        message.locations.push(self.read_location(&child)?);
                        self.skip_element(&child)?;
                    }
                    b"source" => source = Some(self.read_text("source")?),
                    b"oldsource" => message.old_source = Some(self.read_text("oldsource")?),
                    b"comment" => message.comment = Some(self.read_text("comment")?),
                    b"oldcomment" => message.old_comment = Some(self.read_text("oldcomment")?),
                    b"extracomment" => {
                        message.extra_comment = Some(self.read_text("extracomment")?);
                    }
                    b"translatorcomment" => {
                        message.translator_comment = Some(self.read_text("translatorcomment")?);
                    }
                    b"translation" => {
                        message.translation = self.read_translation(&child, message.numerus)?;
                    }
                    other => {
                        tracing::debug!(
                            element = %String::from_utf8_lossy(other),
                            "Keeping unsupported message element verbatim"
                        );
                        let markup = self.capture_element(spanned.start, &child)?;
                        message.unknown_elements.push(markup);
                    }
                },
                Event::Empty(child) => match child.name().as_ref() {
                    b"location" => message.locations.push(self.read_location(&child)?),
                    b"source" => source = Some(XmlText::default()),
                    b"oldsource" => message.old_source = Some(XmlText::default()),
                    b"comment" => message.comment = Some(XmlText::default()),
                    b"oldcomment" => message.old_comment = Some(XmlText::default()),
                    b"extracomment" => message.extra_comment = Some(XmlText::default()),
                    b"translatorcomment" => message.translator_comment = Some(XmlText::default()),
                    b"translation" => {
                        let (kind, variants) = self.translation_attributes(&child)?;
                        let forms = if message.numerus {
                            TranslationForms::Plural(Vec::new())
                        } else if variants {
                            TranslationForms::Variants(Vec::new())
                        } else {
                            TranslationForms::default()
                        };
                        message.translation = Translation { kind, variants, forms };
                    }
                    _ => message.unknown_elements.push(self.markup(spanned.start, spanned.end)?),
                },
                Event::Comment(_) => {
                    message.unknown_elements.push(self.markup(spanned.start, spanned.end)?);
                }
                Event::End(_) => break,
                Event::Eof => return Err(TsError::UnexpectedEof("message".to_string())),
                _ => {}
            }
        }

        message.source = source.ok_or(TsError::MissingElement {
            parent: "message",
            child: "source",
            position: self.position(),
        })?;
        Ok(message)
    }

    fn read_location(&self, start: &BytesStart<'_>) -> Result<Location, TsError> {
        let filename = self.attribute(start, b"filename")?;
        let line = self
            .attribute(start, b"line")?
            .map(|value| {
                value
                    .parse::<LineNumber>()
                    .map_err(|_| TsError::InvalidAttributeValue { attribute: "line", value })
            })
            .transpose()?;
        Ok(Location { filename, line })
    }

    fn translation_attributes(
        &self,
        start: &BytesStart<'_>,
    ) -> Result<(TranslationType, bool), TsError> {
        let kind = match self.attribute(start, b"type")? {
            None => TranslationType::Finished,
            Some(value) => TranslationType::from_attribute(&value)
                .ok_or(TsError::InvalidAttributeValue { attribute: "type", value })?,
        };
        let variants = self.attribute(start, b"variants")?.as_deref() == Some("yes");
        Ok((kind, variants))
    }

    fn read_translation(
        &mut self,
        start: &BytesStart<'_>,
        numerus: bool,
    ) -> Result<Translation, TsError> {
        let (kind, variants) = self.translation_attributes(start)?;

        let forms = if numerus {
            TranslationForms::Plural(self.read_forms("numerusform")?)
        } else if variants {
            TranslationForms::Variants(self.read_forms("lengthvariant")?)
        } else {
            TranslationForms::Single(self.read_text("translation")?)
        };
        Ok(Translation { kind, variants, forms })
    }

    /// Reads the `<numerusform>` or `<lengthvariant>` children of a
    /// translation.
    fn read_forms(&mut self, form: &str) -> Result<Vec<XmlText>, TsError> {
        let mut forms = Vec::new();
        loop {
            let spanned = self.next()?;
            match spanned.event {
                Event::Start(child) if child.name().as_ref() == form.as_bytes() => {
                    forms.push(self.read_text(form)?);
                }
                Event::Empty(child) if child.name().as_ref() == form.as_bytes() => {
                    forms.push(XmlText::default());
                }
                Event::Start(child) => {
                    tracing::warn!(
                        element = %String::from_utf8_lossy(child.name().as_ref()),
                        form,
                        "Dropping unexpected element between translation forms"
                    );
                    self.skip_element(&child)?;
                }
                Event::End(_) => break,
                Event::Eof => return Err(TsError::UnexpectedEof("translation".to_string())),
                _ => {}
            }
        }
        Ok(forms)
    }

    /// Reads character data up to the end tag of the current element.
    fn read_text(&mut self, element: &str) -> Result<XmlText, TsError> {
        let mut raw = String::new();
        let mut value = String::new();

        loop {
            let spanned = self.next()?;
            match spanned.event {
                Event::Text(text) => {
                    let slice =
                        std::str::from_utf8(&text).map_err(|_| TsError::Utf8(spanned.start))?;
                    let text = XmlText::from_raw(slice)?;
                    raw.push_str(slice);
                    value.push_str(text.as_str());
                }
                Event::CData(data) => {
                    let decoded =
                        std::str::from_utf8(&data).map_err(|_| TsError::Utf8(spanned.start))?;
                    value.push_str(decoded);
                    raw.push_str("<![CDATA[");
                    raw.push_str(decoded);
                    raw.push_str("]]>");
                }
                // Qt escapes control characters as `<byte value="x1b"/>`.
                Event::Empty(child) if child.name().as_ref() == b"byte" => {
                    let (code, character) = self.byte_value(&child)?;
                    value.push(character);
                    raw.push_str("<byte value=\"");
                    raw.push_str(&code);
                    raw.push_str("\"/>");
                }
                // Raw only: nested markup such as length variants of a
                // numerus form does not take part in lookup.
                Event::Start(child) => {
                    raw.push_str(&self.capture_element(spanned.start, &child)?);
                }
                Event::End(_) => break,
                Event::Eof => return Err(TsError::UnexpectedEof(element.to_string())),
                _ => {}
            }
        }

        Ok(XmlText::from_parts(raw, value))
    }

    fn byte_value(&self, start: &BytesStart<'_>) -> Result<(String, char), TsError> {
        let value = self.attribute(start, b"value")?.unwrap_or_default();
        let code = value
            .strip_prefix('x')
            .map_or_else(|| value.parse::<u32>().ok(), |hex| u32::from_str_radix(hex, 16).ok());
        match code.and_then(char::from_u32) {
            Some(character) => Ok((value, character)),
            None => Err(TsError::InvalidAttributeValue { attribute: "value", value }),
        }
    }

    /// Input text from the `<` of the markup read at `opened_at` up to `end`.
    fn markup(&self, opened_at: usize, end: usize) -> Result<String, TsError> {
        Ok(self.slice(self.markup_start(opened_at), end)?.to_string())
    }

    /// Skips the element opened by `start` and returns its markup verbatim.
    fn capture_element(
        &mut self,
        opened_at: usize,
        start: &BytesStart<'_>,
    ) -> Result<String, TsError> {
        self.skip_element(start)?;
        self.markup(opened_at, self.position())
    }

    fn skip_element(&mut self, start: &BytesStart<'_>) -> Result<(), TsError> {
        let mut depth = 0_usize;
        loop {
            match self.next()?.event {
                Event::Start(_) => depth += 1,
                Event::End(_) if depth == 0 => return Ok(()),
                Event::End(_) => depth -= 1,
                Event::Eof => {
                    return Err(TsError::UnexpectedEof(
                        String::from_utf8_lossy(start.name().as_ref()).into_owned(),
                    ));
                }
                _ => {}
            }
        }
    }

    fn attribute(&self, start: &BytesStart<'_>, name: &[u8]) -> Result<Option<String>, TsError> {
        for attribute in start.attributes() {
            let attribute = attribute
                .map_err(|source| TsError::Attribute { position: self.position(), source })?;
            if attribute.key.as_ref() == name {
                let value = attribute
                    .unescape_value()
                    .map_err(|source| TsError::Xml { position: self.position(), source })?;
                return Ok(Some(value.into_owned()));
            }
        }
        Ok(None)
    }
}
