//! 翻訳ルックアップ
//!
//! # 失敗時の動作
//!
//! | 状況 | 動作 |
//! |------|------|
//! | どのカタログにもコンテキスト・原文がない | 原文を返す |
//! | 訳文が空 | 原文を返す |
//! | 選ばれた複数形が存在しない・空 | 原文を返す |
//! | 対応する引数のない `%N` | そのまま残す |
//!
//! [`Localizer`] の操作はすべて全域関数で、エラーを返さない。

use crate::format::{
    substitute,
    substitute_with_count,
};
use crate::ir::{
    TableEntry,
    TableOptions,
    TranslationTable,
};
use crate::plural::PluralRule;
use crate::ts::TsDocument;

/// 読み込んだカタログ 1 つ分（翻訳テーブルと、その言語の複数形規則）
#[derive(Debug, Clone)]
pub struct Translator {
    table: TranslationTable,
    plural_rule: PluralRule,
}

impl Translator {
    /// `language` から複数形規則を選んでテーブルを包む
    #[must_use]
    pub fn new(table: TranslationTable, language: &str) -> Self {
        Self { table, plural_rule: PluralRule::for_language(language) }
    }

    /// 文書から直接作成する。複数形規則は宣言された言語で決まる。
    #[must_use]
    pub fn from_document(document: &TsDocument, options: &TableOptions) -> Self {
        let table = TranslationTable::from_document(document, options);
        let language = document.language.clone().unwrap_or_default();
        Self::new(table, &language)
    }

    #[must_use]
    pub const fn table(&self) -> &TranslationTable {
        &self.table
    }

    #[must_use]
    pub const fn plural_rule(&self) -> PluralRule {
        self.plural_rule
    }

    /// 登録済みの訳文。なければ `None`
    #[must_use]
    pub fn find(&self, context: &str, source: &str, disambiguation: Option<&str>) -> Option<&str> {
        self.table
            .get(context, source, disambiguation)
            .map(TableEntry::text)
            .filter(|text| !text.is_empty())
    }

    /// `n` に対応する複数形。なければ `None`
    ///
    /// 複数形を持たないメッセージは単一の訳文を返す。
    #[must_use]
    pub fn find_plural(
        &self,
        context: &str,
        source: &str,
        disambiguation: Option<&str>,
        n: u64,
    ) -> Option<&str> {
        let entry = self.table.get(context, source, disambiguation)?;
        let form = if entry.is_numerus() {
            entry.form(self.plural_rule.form_index(n))
        } else {
            Some(entry.text())
        };
        form.filter(|text| !text.is_empty())
    }
}

/// ルックアップに答えるトランスレーターの列
///
/// Qt と同じく、後から追加したトランスレーターが優先される。
/// 内部可変性を持たないので `Send + Sync` である。
#[derive(Debug, Clone, Default)]
pub struct Localizer {
    translators: Vec<Translator>,
}

impl Localizer {
    #[must_use]
    pub const fn new() -> Self {
        Self { translators: Vec::new() }
    }

    /// 既存のものより優先度の高いトランスレーターを追加
    #[must_use]
    pub fn with_translator(mut self, translator: Translator) -> Self {
        self.translators.push(translator);
        self
    }

    #[must_use]
    pub fn translators(&self) -> &[Translator] {
        &self.translators
    }

    fn lookup(&self, context: &str, source: &str, disambiguation: Option<&str>) -> Option<&str> {
        self.translators
            .iter()
            .rev()
            .find_map(|translator| translator.find(context, source, disambiguation))
    }

    /// `context` 内の `source` を翻訳する。見つからなければ `source` を返す。
    #[must_use]
    pub fn tr(&self, context: &str, source: &str) -> String {
        self.lookup(context, source, None).unwrap_or(source).to_string()
    }

    /// 翻訳して `%1`, `%2`, ... を `args` で置換
    #[must_use]
    pub fn tr_args<S: AsRef<str>>(&self, context: &str, source: &str, args: &[S]) -> String {
        self.tr_disambiguated(context, source, None, args)
    }

    /// 曖昧さ回避コメント付きのメッセージを翻訳
    #[must_use]
    pub fn tr_disambiguated<S: AsRef<str>>(
        &self,
        context: &str,
        source: &str,
        disambiguation: Option<&str>,
        args: &[S],
    ) -> String {
        let template = self.lookup(context, source, disambiguation).unwrap_or(source);
        substitute(template, args)
    }

    /// 件数 `n` の複数形メッセージを翻訳
    ///
    /// `%n` と位置引数は一度の走査でまとめて置換する。
    #[must_use]
    pub fn tr_n<S: AsRef<str>>(
        &self,
        context: &str,
        source: &str,
        disambiguation: Option<&str>,
        n: u64,
        args: &[S],
    ) -> String {
        let template = self
            .translators
            .iter()
            .rev()
            .find_map(|translator| translator.find_plural(context, source, disambiguation, n))
            .unwrap_or(source);
        substitute_with_count(template, n, args)
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
        parse_document,
    };

    const NO_ARGS: &[&str] = &[];

    fn chinese() -> Translator {
        let mut document = TsDocument::new("zh_CN");
        let mut files = Message::new("%n file(s)", "");
        files.numerus = true;
        files.translation = Translation::plural(["%n 个文件"]);
        document.contexts.push(
            Context::new("ProgressInfoWidget")
                .with_message(Message::new("[Processing %1 | %2]", "[处理中 %1 | %2]"))
                .with_message(Message::new("TextLabel", ""))
                .with_message(Message::new("Cancel", "取消"))
                .with_message(files),
        );
        document.contexts.push(Context::new("Updater").with_message(Message::new(
            "Error downloading %1",
            "下载错误 %1",
        )));
        Translator::from_document(&document, &TableOptions::default())
    }

    fn russian_files() -> Translator {
        let mut document = TsDocument::new("ru");
        let mut files = Message::new("%n file(s)", "");
        files.numerus = true;
        files.translation = Translation::plural(["%n файл", "%n файла", ""]);
        document.contexts.push(Context::new("ProgressInfoWidget").with_message(files));
        Translator::from_document(&document, &TableOptions::default())
    }

    #[rstest]
    #[case::translated("ProgressInfoWidget", "Cancel", "取消")]
    #[case::empty_translation("ProgressInfoWidget", "TextLabel", "TextLabel")]
    #[case::unknown_source("ProgressInfoWidget", "Apply", "Apply")]
    #[case::unknown_context("MainWindow", "Cancel", "Cancel")]
    fn test_tr(#[case] context: &str, #[case] source: &str, #[case] expected: &str) {
        let localizer = Localizer::new().with_translator(chinese());

        assert_eq!(localizer.tr(context, source), expected);
    }

    #[googletest::test]
    fn test_tr_args_substitutes_translation() {
        let localizer = Localizer::new().with_translator(chinese());

        expect_that!(
            localizer.tr_args("ProgressInfoWidget", "[Processing %1 | %2]", &["3", "10"]),
            eq("[处理中 3 | 10]")
        );
        expect_that!(
            localizer.tr_args("Updater", "Error downloading %1", &["https://gmic.eu/update.gmic"]),
            eq("下载错误 https://gmic.eu/update.gmic")
        );
    }

    #[googletest::test]
    fn test_tr_args_substitutes_fallback() {
        let localizer = Localizer::new();

        expect_that!(
            localizer.tr_args("ProgressInfoWidget", "[Processing %1 | %2]", &["3", "10"]),
            eq("[Processing 3 | 10]")
        );
        expect_that!(localizer.tr_args("Updater", "Timeout: %1 %2", &["x"]), eq("Timeout: x %2"));
    }

    #[googletest::test]
    fn test_later_translator_takes_precedence() {
        let mut document = TsDocument::new("zh_TW");
        document
            .contexts
            .push(Context::new("ProgressInfoWidget").with_message(Message::new("Cancel", "取消!")));
        let override_translator = Translator::from_document(&document, &TableOptions::default());

        let localizer =
            Localizer::new().with_translator(chinese()).with_translator(override_translator);

        expect_that!(localizer.tr("ProgressInfoWidget", "Cancel"), eq("取消!"));
        // 上書き側にないキーは先のトランスレーターで引く
        expect_that!(
            localizer.tr_args("Updater", "Error downloading %1", &["a"]),
            eq("下载错误 a")
        );
        expect_that!(localizer.translators().len(), eq(2));
    }

    #[rstest]
    #[case::one(1, "1 файл")]
    #[case::few(3, "3 файла")]
    #[case::many_empty_form_falls_back(5, "5 file(s)")]
    fn test_tr_n_russian(#[case] n: u64, #[case] expected: &str) {
        let localizer = Localizer::new().with_translator(russian_files());

        assert_eq!(localizer.tr_n("ProgressInfoWidget", "%n file(s)", None, n, NO_ARGS), expected);
    }

    #[googletest::test]
    fn test_tr_n_single_form_language() {
        let localizer = Localizer::new().with_translator(chinese());

        expect_that!(
            localizer.tr_n("ProgressInfoWidget", "%n file(s)", None, 7, NO_ARGS),
            eq("7 个文件")
        );
        expect_that!(
            localizer.tr_n("ProgressInfoWidget", "Cancel", None, 7, NO_ARGS),
            eq("取消")
        );
    }

    #[googletest::test]
    fn test_tr_uses_first_length_variant() {
        let input = r#"<TS version="2.1" language="zh_CN">
<context>
    <name>MainWindow</name>
    <message>
        <source>Available filters</source>
        <translation variants="yes">
            <lengthvariant>可用滤镜</lengthvariant>
            <lengthvariant>滤镜</lengthvariant>
        </translation>
    </message>
    <message>
        <source>Available filters (%1)</source>
        <translation variants="yes">
            <lengthvariant>可用滤镜 (%1)</lengthvariant>
            <lengthvariant>滤镜 (%1)</lengthvariant>
        </translation>
    </message>
</context>
</TS>"#;
        let document = parse_document(input).unwrap();
        let localizer = Localizer::new()
            .with_translator(Translator::from_document(&document, &TableOptions::default()));

        expect_that!(localizer.tr("MainWindow", "Available filters"), eq("可用滤镜"));
        expect_that!(
            localizer.tr_args("MainWindow", "Available filters (%1)", &["42"]),
            eq("可用滤镜 (42)")
        );
    }

    #[rstest]
    #[case::escaped_count("%%n items", &["X", "Y"], "%2 items")]
    #[case::count_then_arg("%n items in %1", &["C"], "2 items in C")]
    fn test_tr_n_substitutes_in_one_pass(
        #[case] source: &str,
        #[case] args: &[&str],
        #[case] expected: &str,
    ) {
        let localizer = Localizer::new();

        assert_eq!(localizer.tr_n("C", source, None, 2, args), expected);
    }

    #[googletest::test]
    fn test_translator_find() {
        let translator = chinese();

        expect_that!(translator.find("ProgressInfoWidget", "Cancel", None), some(eq("取消")));
        expect_that!(translator.find("ProgressInfoWidget", "TextLabel", None), none());
        expect_that!(translator.plural_rule(), eq(PluralRule::Invariant));
        expect_that!(translator.table().len(), eq(4));
    }

    #[test]
    fn test_localizer_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Localizer>();
    }
}
