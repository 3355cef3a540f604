use thiserror::Error;

/// `.ts` 文書の読み込みエラー
#[derive(Error, Debug)]
pub enum TsError {
    /// XML として不正
    #[error("Malformed XML at byte {position}: {source}")]
    Xml {
        position: usize,
        #[source]
        source: quick_xml::Error,
    },
    /// 属性を読み取れない
    #[error("Invalid attribute at byte {position}: {source}")]
    Attribute {
        position: usize,
        #[source]
        source: quick_xml::events::attributes::AttrError,
    },
    /// 未知または壊れた実体参照
    #[error("Invalid escape sequence in '{raw}': {source}")]
    Escape {
        raw: String,
        #[source]
        source: quick_xml::escape::EscapeError,
    },
    /// Text is not valid UTF-8
    #[error("Invalid UTF-8 at byte {0}")]
    Utf8(usize),
    /// ルート要素 `<TS>` がない
    #[error("Missing <TS> root element")]
    MissingRoot,
    /// 必須の子要素がない
    #[error("<{parent}> ending at byte {position} has no <{child}> element")]
    MissingElement { parent: &'static str, child: &'static str, position: usize },
    /// An attribute holds a value the format does not allow
    #[error("Invalid value '{value}' for attribute '{attribute}'")]
    InvalidAttributeValue { attribute: &'static str, value: String },
    /// 要素の途中で入力が終わった
    #[error("Unexpected end of input inside <{0}>")]
    UnexpectedEof(String),
}
