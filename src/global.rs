//! プロセス全体で共有するローカライザー
//!
//! 起動時にカタログを一度だけ読み込んで [`Localizer`] をインストールし、
//! 以降のルックアップはロックなしで参照する。

use std::sync::OnceLock;

use crate::translator::Localizer;

static LOCALIZER: OnceLock<Localizer> = OnceLock::new();

/// Errors returned by [`install`].
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum InstallError {
    #[error("a localizer is already installed for this process")]
    AlreadyInstalled,
}

/// `localizer` をプロセス終了までインストールする
///
/// # Errors
/// Returns [`InstallError::AlreadyInstalled`] on every call after the first.
pub fn install(localizer: Localizer) -> Result<(), InstallError> {
    let translators = localizer.translators().len();
    LOCALIZER.set(localizer).map_err(|_| InstallError::AlreadyInstalled)?;
    tracing::debug!(translators, "Installed process-wide localizer");
    Ok(())
}

/// インストール済みのローカライザー
#[must_use]
pub fn installed() -> Option<&'static Localizer> {
    LOCALIZER.get()
}

/// [`Localizer::tr`] on the installed localizer.
///
/// 未インストールの場合は `source` をそのまま返す。
#[must_use]
pub fn tr(context: &str, source: &str) -> String {
    installed().map_or_else(|| source.to_string(), |localizer| localizer.tr(context, source))
}

/// [`Localizer::tr_args`] on the installed localizer.
#[must_use]
pub fn tr_args<S: AsRef<str>>(context: &str, source: &str, args: &[S]) -> String {
    match installed() {
        Some(localizer) => localizer.tr_args(context, source, args),
        None => crate::format::substitute(source, args),
    }
}

/// [`Localizer::tr_n`] on the installed localizer.
#[must_use]
pub fn tr_n<S: AsRef<str>>(context: &str, source: &str, n: u64, args: &[S]) -> String {
    match installed() {
        Some(localizer) => localizer.tr_n(context, source, None, n, args),
        None => crate::format::substitute_with_count(source, n, args),
    }
}

// プロセス全体のスロットはテストバイナリごとに一度しか埋められないため、
// インストールは 1 つのテストでまとめて確認する
#[cfg(test)]
mod tests {
    use googletest::prelude::*;

    use super::*;
    use crate::ir::TableOptions;
    use crate::translator::Translator;
    use crate::ts::{
        Context,
        Message,
        TsDocument,
    };

    #[googletest::test]
    fn test_install_once_then_lookup() {
        let mut document = TsDocument::new("zh");
        document.contexts.push(
            Context::new("DialogSettings")
                .with_message(Message::new("Cancel", "取消"))
                .with_message(Message::new("Timeout: %1", "超时: %1")),
        );
        let localizer = Localizer::new()
            .with_translator(Translator::from_document(&document, &TableOptions::default()));

        assert_eq!(install(localizer), Ok(()));
        assert_eq!(install(Localizer::new()), Err(InstallError::AlreadyInstalled));

        expect_that!(installed().map(|localizer| localizer.translators().len()), some(eq(1)));
        expect_that!(tr("DialogSettings", "Cancel"), eq("取消"));
        expect_that!(tr("DialogSettings", "Apply"), eq("Apply"));
        expect_that!(tr_args("DialogSettings", "Timeout: %1", &["30"]), eq("超时: 30"));
        expect_that!(tr_n("DialogSettings", "%n item(s)", 4, &[] as &[&str]), eq("4 item(s)"));
    }
}
