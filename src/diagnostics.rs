//! 翻訳カタログの検査
//!
//! Qt Linguist の検証と同じ観点でカタログをチェックし、診断メッセージを生成する。

use std::collections::{
    BTreeSet,
    HashMap,
};
use std::fmt;
use std::path::PathBuf;

use serde::Serialize;

use crate::config::{
    DiagnosticsConfig,
    Severity,
};
use crate::format::placeholders;
use crate::input::CatalogFile;
use crate::ts::{
    Message,
    TranslationType,
    TsDocument,
};
use crate::types::{
    Location,
    ResolvedLocation,
};

/// 診断の種類
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum DiagnosticKind {
    Unfinished,
    EmptyTranslation,
    ConflictingDuplicate,
    PlaceholderMismatch,
    AcceleratorMismatch,
    LanguageMismatch,
}

impl DiagnosticKind {
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::Unfinished => "unfinished",
            Self::EmptyTranslation => "empty-translation",
            Self::ConflictingDuplicate => "conflicting-duplicate",
            Self::PlaceholderMismatch => "placeholder-mismatch",
            Self::AcceleratorMismatch => "accelerator-mismatch",
            Self::LanguageMismatch => "language-mismatch",
        }
    }

    const fn severity(self, config: &DiagnosticsConfig) -> Severity {
        match self {
            Self::Unfinished => config.unfinished,
            Self::EmptyTranslation => config.empty_translation,
            Self::ConflictingDuplicate => config.conflicting_duplicate,
            Self::PlaceholderMismatch => config.placeholder_mismatch,
            Self::AcceleratorMismatch => config.accelerator_mismatch,
            Self::LanguageMismatch => config.language_mismatch,
        }
    }
}

/// 診断メッセージ
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    pub kind: DiagnosticKind,
    pub severity: Severity,
    /// 対象のカタログファイル
    pub file: PathBuf,
    pub context: Option<String>,
    pub source: Option<String>,
    /// 原文の最初の出現位置
    #[serde(serialize_with = "serialize_location")]
    pub location: Option<ResolvedLocation>,
    pub message: String,
}

#[allow(clippy::ref_option)]
fn serialize_location<S: serde::Serializer>(
    location: &Option<ResolvedLocation>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    match location {
        Some(location) => serializer.serialize_some(&location.to_string()),
        None => serializer.serialize_none(),
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {} [{}]", self.file.display(), self.severity, self.kind.code())?;
        if let Some(context) = &self.context {
            write!(f, " {context}")?;
        }
        if let Some(location) = &self.location {
            write!(f, " ({location})")?;
        }
        write!(f, ": {}", self.message)
    }
}

/// カタログの診断メッセージを生成
///
/// `off` に設定された種類は出力しない。
#[must_use]
pub fn check_catalog(catalog: &CatalogFile, config: &DiagnosticsConfig) -> Vec<Diagnostic> {
    let mut diagnostics = Vec::new();
    let mut push = |kind: DiagnosticKind,
                    context: Option<&str>,
                    message: Option<(&Message, Option<&ResolvedLocation>)>,
                    text: String| {
        let severity = kind.severity(config);
        if severity == Severity::Off {
            return;
        }
        diagnostics.push(Diagnostic {
            kind,
            severity,
            file: catalog.path.clone(),
            context: context.map(str::to_string),
            source: message.map(|(message, _)| message.source.as_str().to_string()),
            location: message.and_then(|(_, location)| location.cloned()),
            message: text,
        });
    };

    tracing::debug!(path = %catalog.path.display(), "Checking catalog");

    if let Some((declared, detected)) = catalog.language_mismatch() {
        push(
            DiagnosticKind::LanguageMismatch,
            None,
            None,
            format!("Catalog declares language '{declared}' but its path suggests '{detected}'"),
        );
    }

    // (context, source, disambiguation) -> 最初の訳文
    let mut seen: HashMap<(&str, &str, &str), Vec<&str>> = HashMap::new();

    let locations = first_locations(&catalog.document);
    for ((context, message), location) in catalog.document.messages().zip(&locations) {
        let translation = &message.translation;
        if translation.kind.is_retired() {
            continue;
        }
        let context_name = Some(context.name.as_str());
        let source = message.source.as_str();

        if translation.kind == TranslationType::Unfinished {
            push(
                DiagnosticKind::Unfinished,
                context_name,
                Some((message, location.as_ref())),
                format!("Translation of '{source}' is unfinished"),
            );
        } else if translation.is_empty() {
            push(
                DiagnosticKind::EmptyTranslation,
                context_name,
                Some((message, location.as_ref())),
                format!("Translation of '{source}' is empty"),
            );
        }

        if translation.is_empty() {
            continue;
        }

        let texts: Vec<&str> = translation.texts().collect();
        let key = (context.name.as_str(), source, message.disambiguation());
        match seen.get(&key) {
            Some(first) if *first != texts => push(
                DiagnosticKind::ConflictingDuplicate,
                context_name,
                Some((message, location.as_ref())),
                format!(
                    "'{source}' is translated differently elsewhere in this context: '{}' and '{}'",
                    first.join(" | "),
                    texts.join(" | ")
                ),
            ),
            Some(_) => {}
            None => {
                seen.insert(key, texts.clone());
            }
        }

        let expected = placeholders(source);
        for text in texts.iter().filter(|text| !text.is_empty()) {
            let found = placeholders(text);
            if found != expected {
                push(
                    DiagnosticKind::PlaceholderMismatch,
                    context_name,
                    Some((message, location.as_ref())),
                    format!(
                        "Placeholders differ: source uses {}, translation '{text}' uses {}",
                        describe_placeholders(&expected),
                        describe_placeholders(&found)
                    ),
                );
            }

            if has_accelerator(source) != has_accelerator(text) {
                let (with, without) = if has_accelerator(source) {
                    ("source", "translation")
                } else {
                    ("translation", "source")
                };
                push(
                    DiagnosticKind::AcceleratorMismatch,
                    context_name,
                    Some((message, location.as_ref())),
                    format!(
                        "The {with} of '{source}' has a keyboard accelerator but the {without} has none"
                    ),
                );
            }
        }
    }

    diagnostics
}

/// メッセージごとの最初の出現位置
///
/// 相対位置（`line="+3"`）は直前のメッセージから引き継ぐため、文書全体を
/// 出現順にまとめて解決する。
fn first_locations(document: &TsDocument) -> Vec<Option<ResolvedLocation>> {
    let all: Vec<Location> = document
        .messages()
        .flat_map(|(_, message)| message.locations.iter().cloned())
        .collect();
    let mut resolved = Location::resolve_all(&all).into_iter();

    document
        .messages()
        .map(|(_, message)| {
            let mut own = resolved.by_ref().take(message.locations.len());
            let first = own.next();
            own.for_each(drop);
            first
        })
        .collect()
}

fn describe_placeholders(set: &BTreeSet<usize>) -> String {
    if set.is_empty() {
        return "none".to_string();
    }
    set.iter().map(|index| format!("%{index}")).collect::<Vec<_>>().join(", ")
}

/// `&X` marks a keyboard accelerator; `&&` is a literal ampersand.
#[must_use]
pub fn has_accelerator(text: &str) -> bool {
    let mut chars = text.chars();
    while let Some(c) = chars.next() {
        if c != '&' {
            continue;
        }
        match chars.next() {
            Some('&') | None => {}
            Some(next) if next.is_whitespace() => {}
            Some(_) => return true,
        }
    }
    false
}
