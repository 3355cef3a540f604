//! 同梱の中国語カタログ（`tests/fixtures/zh.ts`）を使った結合テスト

#![allow(clippy::unwrap_used)]
#![allow(missing_docs)]

use std::path::Path;

use googletest::prelude::*;
use pretty_assertions::assert_eq;
use tempfile::TempDir;
use ts_translator::cli::{
    self,
    Command,
    Status,
};
use ts_translator::diagnostics::{
    DiagnosticKind,
    check_catalog,
};
use ts_translator::config::{
    DiagnosticsConfig,
    Severity,
};
use ts_translator::input::load_catalog_file;
use ts_translator::ir::TableOptions;
use ts_translator::stats::CatalogStats;
use ts_translator::ts::{
    parse_document,
    write_document,
};
use ts_translator::Localizer;

const FIXTURE: &str = include_str!("fixtures/zh.ts");

fn fixture_path() -> &'static Path {
    Path::new(concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures/zh.ts"))
}

fn localizer() -> Localizer {
    let catalog = load_catalog_file(fixture_path()).unwrap();
    Localizer::new().with_translator(catalog.translator(&TableOptions::default()))
}

#[test]
fn test_round_trip_is_byte_identical() {
    let document = parse_document(FIXTURE).unwrap();

    assert_eq!(write_document(&document), FIXTURE);
}

#[test]
fn test_round_trip_keeps_escaped_accelerators() {
    let document = parse_document(FIXTURE).unwrap();
    let written = write_document(&document);

    assert!(written.contains("<source>&amp;Cancel</source>"));
    assert!(written.contains("<translation>取消(&amp;C)</translation>"));
    assert!(written.contains("<source>G&apos;MIC Plug-in progression</source>"));
}

#[googletest::test]
fn test_lookup_resolves_per_context() {
    let localizer = localizer();

    expect_that!(localizer.tr("HeadlessProgressDialog", "Cancel"), eq("取消"));
    expect_that!(localizer.tr("ProgressInfoWindow", "Cancel"), eq("取消"));
    // MainWindow only knows "&Cancel"
    expect_that!(localizer.tr("MainWindow", "Cancel"), eq("Cancel"));
    expect_that!(localizer.tr("MainWindow", "&Cancel"), eq("取消(&C)"));
}

#[googletest::test]
fn test_lookup_falls_back_to_source() {
    let localizer = localizer();

    // Blank translation
    expect_that!(localizer.tr("HeadlessProgressDialog", "TextLabel"), eq("TextLabel"));
    // Identity translation
    expect_that!(localizer.tr("ProgressInfoWidget", "TextLabel"), eq("TextLabel"));
    // Unknown key and context
    expect_that!(localizer.tr("ProgressInfoWidget", "Pause"), eq("Pause"));
    expect_that!(localizer.tr("NoSuchWidget", "Abort"), eq("Abort"));
}

#[googletest::test]
fn test_lookup_substitutes_placeholders() {
    let localizer = localizer();

    expect_that!(
        localizer.tr_args("ProgressInfoWidget", "[Processing %1 | %2]", &["3", "10"]),
        eq("[进度 3 | 10]")
    );
    expect_that!(
        localizer.tr_args("Updater", "Error downloading %1", &["https://gmic.eu/update.json"]),
        eq("下载错误 https://gmic.eu/update.json")
    );
    expect_that!(
        localizer.tr_args("Updater", "Download timeout: %1", &[] as &[&str]),
        eq("下载超时: %1")
    );
}

#[googletest::test]
fn test_declared_language_disagrees_with_path() {
    let catalog = load_catalog_file(fixture_path()).unwrap();

    expect_that!(catalog.language(), some(eq("fr")));
    expect_that!(catalog.language_mismatch(), some(eq(("fr", "zh"))));

    let diagnostics = check_catalog(&catalog, &DiagnosticsConfig::default());
    expect_that!(diagnostics.first().map(|d| d.kind), some(eq(DiagnosticKind::LanguageMismatch)));
    expect_that!(diagnostics.iter().any(|d| d.severity == Severity::Error), eq(false));
}

#[googletest::test]
fn test_stats() {
    let stats = CatalogStats::from_document(&parse_document(FIXTURE).unwrap());

    expect_that!(stats.contexts, eq(14));
    expect_that!(stats.messages, eq(130));
    expect_that!(stats.empty, eq(3));
    expect_that!(stats.finished, eq(127));
    expect_that!(stats.percent_finished, eq(97));
}

#[tokio::test]
async fn test_cli_over_workspace() {
    let temp_dir = TempDir::new().unwrap();
    let translations = temp_dir.path().join("translations");
    std::fs::create_dir_all(&translations).unwrap();
    std::fs::write(translations.join("zh.ts"), FIXTURE).unwrap();

    let mut out = Vec::new();
    let command = Command::Lookup {
        path: temp_dir.path().to_path_buf(),
        context: "ProgressInfoWidget".to_string(),
        source: "[Processing %1 | %2]".to_string(),
        comment: None,
        count: None,
        args: vec!["3".to_string(), "10".to_string()],
    };
    let status = cli::run(command, &mut out).await.unwrap();

    assert_eq!(status, Status::Success);
    assert_eq!(String::from_utf8(out).unwrap(), "[进度 3 | 10]\n");

    let mut out = Vec::new();
    let status =
        cli::run(Command::Check { path: temp_dir.path().to_path_buf(), json: false }, &mut out)
            .await
            .unwrap();
    assert_eq!(status, Status::Success);
    assert!(String::from_utf8(out).unwrap().contains("[language-mismatch]"));
}
