//! テスト用ユーティリティ関数
//!
//! 複数のテストモジュールで使用される共通のヘルパー関数を提供します。
#![cfg(test)]

use crate::input::CatalogFile;

/// `ProgressInfoWidget` コンテキストにメッセージを 1 つ持つ `.ts` ファイルの内容を作成する
///
/// # Arguments
/// * `language` - `language` 属性の値（例: "zh", "fr"）
/// * `source` - 原文
/// * `translation` - 訳文
pub(crate) fn catalog_xml(language: &str, source: &str, translation: &str) -> String {
    format!(
        r#"<?xml version="1.0" encoding="utf-8"?>
<!DOCTYPE TS>
<TS version="2.1" language="{language}">
<context>
    <name>ProgressInfoWidget</name>
    <message>
        <location filename="../src/Widgets/ProgressInfoWidget.ui" line="20"/>
        <source>{source}</source>
        <translation>{translation}</translation>
    </message>
</context>
</TS>
"#
    )
}

/// テスト用の `CatalogFile` を作成する
///
/// 内容が壊れている場合はパニックする。
#[allow(clippy::expect_used)]
pub(crate) fn create_catalog(path: &str, content: &str) -> CatalogFile {
    CatalogFile::parse(path, content).expect("test catalog should parse")
}
