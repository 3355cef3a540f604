//! カタログの翻訳進捗

use std::fmt;

use serde::Serialize;

use crate::ts::{
    TranslationType,
    TsDocument,
};

/// カタログ 1 つ分のメッセージ数
///
/// vanished / obsolete のメッセージは別に数え、他の数値には含めない。
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogStats {
    pub language: Option<String>,
    pub contexts: usize,
    /// Active messages.
    pub messages: usize,
    /// Finished and non-empty.
    pub finished: usize,
    pub unfinished: usize,
    /// Finished but empty.
    pub empty: usize,
    pub retired: usize,
    pub numerus: usize,
    /// 完了メッセージの割合（切り捨て、0-100）
    pub percent_finished: usize,
}

impl CatalogStats {
    #[must_use]
    pub fn from_document(document: &TsDocument) -> Self {
        let mut stats = Self {
            language: document.language.clone(),
            contexts: document.contexts.len(),
            ..Self::default()
        };

        for (_, message) in document.messages() {
            let translation = &message.translation;
            if translation.kind.is_retired() {
                stats.retired += 1;
                continue;
            }
            stats.messages += 1;
            if message.numerus {
                stats.numerus += 1;
            }
            match translation.kind {
                TranslationType::Unfinished => stats.unfinished += 1,
                _ if translation.is_empty() => stats.empty += 1,
                _ => stats.finished += 1,
            }
        }

        stats.percent_finished =
            if stats.messages == 0 { 100 } else { stats.finished * 100 / stats.messages };
        stats
    }
}

impl fmt::Display for CatalogStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {} contexts, {} messages, {} finished ({}%), {} unfinished, {} empty, {} retired",
            self.language.as_deref().unwrap_or("unknown"),
            self.contexts,
            self.messages,
            self.finished,
            self.percent_finished,
            self.unfinished,
            self.empty,
            self.retired,
        )
    }
}
