//! Qt Linguist `.ts` の読み書き
//!
//! 文字データはエスケープされた原文とデコード済みの値の両方を保持するので、
//! 読み込みと保存を経てもエスケープはバイト単位で変わらない。

mod error;
mod model;
mod reader;
mod text;
mod writer;

pub use error::TsError;
pub use model::{
    Context,
    DEFAULT_PROLOGUE,
    DEFAULT_VERSION,
    Message,
    Translation,
    TranslationForms,
    TranslationType,
    TsDocument,
    UnknownElement,
};
pub use reader::parse_document;
pub use text::XmlText;
pub use writer::write_document;
