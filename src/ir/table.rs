//! ルックアップ用の翻訳テーブル
//!
//! 文書はメッセージをコンテキストごとにまとめ、出所のメタデータも持つ。
//! テーブルはそれを `context -> source -> disambiguation -> entry` に縮約し、
//! ルックアップに不要な情報を捨てる。
//!
//! # 不変条件
//!
//! 1. **不変**: [`TranslationTable::from_document`] の後は変更されない
//! 2. **空エントリなし**: 全ての形が空のメッセージは登録しないので、
//!    ルックアップは原文にフォールバックする
//! 3. **最初の訳文が優先**: 重複キーは最初の空でない訳文を残し、
//!    異なる訳文は [`Conflict`] として記録する

use std::collections::HashMap;

use crate::ts::{
    TranslationType,
    TsDocument,
};

/// Options controlling which messages enter the table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableOptions {
    /// Ship `type="unfinished"` translations (`lrelease` default).
    pub include_unfinished: bool,
}

impl Default for TableOptions {
    fn default() -> Self {
        Self { include_unfinished: true }
    }
}

/// Translated text of one message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableEntry {
    /// One item for simple messages, one per numerus form or length variant
    /// otherwise.
    forms: Vec<String>,
    numerus: bool,
}

impl TableEntry {
    /// The translation of a simple message; the longest variant when the
    /// message has length variants.
    #[must_use]
    pub fn text(&self) -> &str {
        self.forms.first().map_or("", String::as_str)
    }

    /// The numerus form at `index`, if present.
    #[must_use]
    pub fn form(&self, index: usize) -> Option<&str> {
        self.forms.get(index).map(String::as_str)
    }

    #[must_use]
    pub fn forms(&self) -> &[String] {
        &self.forms
    }

    #[must_use]
    pub const fn is_numerus(&self) -> bool {
        self.numerus
    }
}

/// 同じキーで競合する 2 つの訳文
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Conflict {
    pub context: String,
    pub source: String,
    pub disambiguation: String,
    pub kept: Vec<String>,
    pub ignored: Vec<String>,
}

type MessageMap = HashMap<String, HashMap<String, TableEntry>>;

/// Immutable `context -> source -> disambiguation -> translation` mapping.
#[derive(Debug, Clone, Default)]
pub struct TranslationTable {
    language: Option<String>,
    contexts: HashMap<String, MessageMap>,
    len: usize,
    conflicts: Vec<Conflict>,
}

impl TranslationTable {
    /// 解析済みの文書からテーブルを構築する
    ///
    /// vanished / obsolete と空の訳文は登録しない。
    #[must_use]
    pub fn from_document(document: &TsDocument, options: &TableOptions) -> Self {
        let mut table = Self { language: document.language.clone(), ..Self::default() };

        for (context, message) in document.messages() {
            let kind = message.translation.kind;
            if kind.is_retired()
                || (kind == TranslationType::Unfinished && !options.include_unfinished)
                || message.translation.is_empty()
            {
                continue;
            }

            let entry = TableEntry {
                forms: message.translation.texts().map(str::to_string).collect(),
                numerus: message.numerus,
            };
            table.insert(
                context.name.as_str(),
                message.source.as_str(),
                message.disambiguation(),
                entry,
            );
        }

        tracing::debug!(
            language = ?table.language,
            contexts = table.contexts.len(),
            entries = table.len,
            conflicts = table.conflicts.len(),
            "Built translation table"
        );
        table
    }

    fn insert(&mut self, context: &str, source: &str, disambiguation: &str, entry: TableEntry) {
        let variants = self
            .contexts
            .entry(context.to_string())
            .or_default()
            .entry(source.to_string())
            .or_default();

        match variants.get(disambiguation) {
            None => {
                variants.insert(disambiguation.to_string(), entry);
                self.len += 1;
            }
            Some(existing) if existing.forms == entry.forms => {}
            Some(existing) => {
                tracing::warn!(
                    context,
                    source,
                    disambiguation,
                    "Conflicting duplicate translation, keeping the first one"
                );
                self.conflicts.push(Conflict {
                    context: context.to_string(),
                    source: source.to_string(),
                    disambiguation: disambiguation.to_string(),
                    kept: existing.forms.clone(),
                    ignored: entry.forms,
                });
            }
        }
    }

    /// メッセージを検索する
    ///
    /// `disambiguation` に一致するエントリがなければ、Qt と同様に
    /// 曖昧さ回避なしのエントリを使う。
    #[must_use]
    pub fn get(
        &self,
        context: &str,
        source: &str,
        disambiguation: Option<&str>,
    ) -> Option<&TableEntry> {
        let variants = self.contexts.get(context)?.get(source)?;
        match disambiguation {
            Some(comment) if !comment.is_empty() => {
                variants.get(comment).or_else(|| variants.get(""))
            }
            _ => variants.get(""),
        }
    }

    /// Target language declared by the source document.
    #[must_use]
    pub fn language(&self) -> Option<&str> {
        self.language.as_deref()
    }

    /// Number of distinct entries.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.len
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Names of all contexts with at least one entry.
    pub fn contexts(&self) -> impl Iterator<Item = &str> {
        self.contexts.keys().map(String::as_str)
    }

    /// 構築中に見つかった競合
    #[must_use]
    pub fn conflicts(&self) -> &[Conflict] {
        &self.conflicts
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use googletest::prelude::*;
    use rstest::rstest;

    use super::*;
    use crate::ts::{
        Context,
        Message,
        Translation,
    };

    fn sample_document() -> TsDocument {
        let mut document = TsDocument::new("zh_CN");
        document.contexts.push(
            Context::new("HeadlessProgressDialog")
                .with_message(Message::new("TextLabel", ""))
                .with_message(Message::new("Cancel", "取消")),
        );
        document.contexts.push(
            Context::new("ProgressInfoWindow")
                .with_message(Message::new("TextLabel", "TextLabel"))
                .with_message(Message::new("Cancel", "取消处理")),
        );
        document.contexts.push(
            Context::new("InOutPanel")
                .with_message(Message::new("-", "-"))
                .with_message(Message::new("-", "-"))
                .with_message(Message::new("Open", "打开"))
                .with_message(Message::new("Open", "打开文件").with_comment("file menu"))
                .with_message(
                    Message::new("Draft", "草稿").with_type(TranslationType::Unfinished),
                )
                .with_message(Message::new("Old", "旧").with_type(TranslationType::Vanished))
                .with_message(Message::new("Older", "更旧").with_type(TranslationType::Obsolete)),
        );
        document
    }

    #[rstest]
    #[case::first_context("HeadlessProgressDialog", "Cancel", "取消")]
    #[case::second_context("ProgressInfoWindow", "Cancel", "取消处理")]
    #[case::identity_translation("ProgressInfoWindow", "TextLabel", "TextLabel")]
    #[case::tolerated_duplicate("InOutPanel", "-", "-")]
    fn test_get_per_context(#[case] context: &str, #[case] source: &str, #[case] expected: &str) {
        let table = TranslationTable::from_document(&sample_document(), &TableOptions::default());

        assert_eq!(table.get(context, source, None).map(TableEntry::text), Some(expected));
    }

    #[rstest]
    #[case::empty_translation("HeadlessProgressDialog", "TextLabel")]
    #[case::unknown_source("HeadlessProgressDialog", "Apply")]
    #[case::unknown_context("NoSuchWidget", "Cancel")]
    #[case::vanished("InOutPanel", "Old")]
    #[case::obsolete("InOutPanel", "Older")]
    fn test_get_absent(#[case] context: &str, #[case] source: &str) {
        let table = TranslationTable::from_document(&sample_document(), &TableOptions::default());

        assert!(table.get(context, source, None).is_none());
    }

    #[googletest::test]
    fn test_disambiguation_falls_back_to_plain_entry() {
        let table = TranslationTable::from_document(&sample_document(), &TableOptions::default());

        expect_that!(
            table.get("InOutPanel", "Open", Some("file menu")).map(TableEntry::text),
            some(eq("打开文件"))
        );
        expect_that!(
            table.get("InOutPanel", "Open", Some("toolbar")).map(TableEntry::text),
            some(eq("打开"))
        );
        expect_that!(table.get("InOutPanel", "Open", None).map(TableEntry::text), some(eq("打开")));
    }

    #[googletest::test]
    fn test_unfinished_translations_follow_options() {
        let document = sample_document();

        let with = TranslationTable::from_document(&document, &TableOptions::default());
        let without =
            TranslationTable::from_document(&document, &TableOptions { include_unfinished: false });

        expect_that!(with.get("InOutPanel", "Draft", None).map(TableEntry::text), some(eq("草稿")));
        expect_that!(without.get("InOutPanel", "Draft", None), none());
    }

    #[googletest::test]
    fn test_len_counts_distinct_entries() {
        let table = TranslationTable::from_document(&sample_document(), &TableOptions::default());

        // Cancel x2, TextLabel, "-", Open x2, Draft
        expect_that!(table.len(), eq(7));
        expect_that!(table.is_empty(), eq(false));
        expect_that!(table.conflicts().is_empty(), eq(true));
        expect_that!(table.language(), some(eq("zh_CN")));

        let mut contexts: Vec<_> = table.contexts().collect();
        contexts.sort_unstable();
        assert_eq!(contexts, vec!["HeadlessProgressDialog", "InOutPanel", "ProgressInfoWindow"]);
    }

    #[googletest::test]
    fn test_conflicting_duplicate_keeps_first() {
        let mut document = TsDocument::new("zh");
        document.contexts.push(
            Context::new("MainWindow")
                .with_message(Message::new("Apply", "应用"))
                .with_message(Message::new("Apply", "套用")),
        );

        let table = TranslationTable::from_document(&document, &TableOptions::default());

        expect_that!(table.get("MainWindow", "Apply", None).map(TableEntry::text), some(eq("应用")));
        expect_that!(table.conflicts().len(), eq(1));
        let conflict = &table.conflicts()[0];
        assert_eq!(conflict.kept, vec!["应用".to_string()]);
        assert_eq!(conflict.ignored, vec!["套用".to_string()]);
    }

    #[googletest::test]
    fn test_numerus_entry_keeps_forms() {
        let mut message = Message::new("%n file(s)", "");
        message.numerus = true;
        message.translation = Translation::plural(["%n 个文件"]);
        let mut document = TsDocument::new("zh");
        document.contexts.push(Context::new("FileList").with_message(message));

        let table = TranslationTable::from_document(&document, &TableOptions::default());
        let entry = table.get("FileList", "%n file(s)", None).unwrap();

        expect_that!(entry.is_numerus(), eq(true));
        expect_that!(entry.form(0), some(eq("%n 个文件")));
        expect_that!(entry.form(1), none());
        expect_that!(entry.forms().len(), eq(1));
    }
}
