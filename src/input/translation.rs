//! Translation catalog input definitions

use std::path::{
    Path,
    PathBuf,
};

use thiserror::Error;

use crate::ir::{
    TableOptions,
    TranslationTable,
};
use crate::translator::Translator;
use crate::ts::{
    TsDocument,
    TsError,
    parse_document,
};

/// ISO 639 base codes recognized in catalog paths.
const LANGUAGE_CODES: &[&str] = &[
    "af", "am", "ar", "as", "az", "be", "bg", "bn", "bo", "bs", "ca", "cs", "cy", "da", "de", "dv",
    "el", "en", "eo", "es", "et", "eu", "fa", "fi", "fil", "fo", "fr", "ga", "gd", "gl", "gu", "he",
    "hi", "hr", "hu", "hy", "id", "is", "it", "ja", "ka", "kk", "km", "kn", "ko", "kok", "ky", "lo",
    "lt", "lv", "mk", "ml", "mn", "mr", "ms", "mt", "my", "nb", "ne", "nl", "nn", "no", "or", "pa",
    "pl", "ps", "pt", "ro", "ru", "sa", "si", "sk", "sl", "sq", "sr", "sv", "sw", "ta", "te", "th",
    "tk", "tl", "tr", "tt", "ug", "uk", "ur", "uz", "vi", "zh",
];

#[derive(Error, Debug)]
pub enum LoadError {
    #[error("Failed to read translation file {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse translation file {path:?}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: TsError,
    },
}

/// A catalog loaded from a file.
#[derive(Debug, Clone)]
pub struct CatalogFile {
    pub path: PathBuf,
    /// Language guessed from the file path.
    pub detected_language: Option<String>,
    pub document: TsDocument,
}

impl CatalogFile {
    /// Parses `content` as the catalog stored at `path`.
    ///
    /// # Errors
    /// Returns [`LoadError::Parse`] for malformed content.
    pub fn parse(path: impl Into<PathBuf>, content: &str) -> Result<Self, LoadError> {
        let path = path.into();
        let document = parse_document(content)
            .map_err(|source| LoadError::Parse { path: path.clone(), source })?;
        let detected_language = detect_language_from_path(&path);

        let catalog = Self { path, detected_language, document };
        if let Some((declared, detected)) = catalog.language_mismatch() {
            tracing::warn!(
                path = %catalog.path.display(),
                declared,
                detected,
                "Declared catalog language does not match the file name"
            );
        }
        Ok(catalog)
    }

    /// The catalog language: the `language` attribute, else the path guess.
    #[must_use]
    pub fn language(&self) -> Option<&str> {
        self.document
            .language
            .as_deref()
            .filter(|language| !language.is_empty())
            .or(self.detected_language.as_deref())
    }

    /// `(declared, detected)` when both are known and name different languages.
    #[must_use]
    pub fn language_mismatch(&self) -> Option<(&str, &str)> {
        let declared = self.document.language.as_deref().filter(|language| !language.is_empty())?;
        let detected = self.detected_language.as_deref()?;
        (!same_language(declared, detected)).then_some((declared, detected))
    }

    /// Builds a translator from this catalog.
    #[must_use]
    pub fn translator(&self, options: &TableOptions) -> Translator {
        let table = TranslationTable::from_document(&self.document, options);
        Translator::new(table, self.language().unwrap_or_default())
    }
}

/// Reads and parses a `.ts` file.
///
/// # Errors
/// Returns error if the file cannot be read or is not a valid catalog.
pub fn load_catalog_file(path: &Path) -> Result<CatalogFile, LoadError> {
    tracing::debug!(path = %path.display(), "Loading translation file");
    let content = std::fs::read_to_string(path)
        .map_err(|source| LoadError::Io { path: path.to_path_buf(), source })?;
    CatalogFile::parse(path, &content)
}

/// [`load_catalog_file`] の非同期版。インデクサと CLI から使う。
///
/// # Errors
/// Returns error if the file cannot be read or is not a valid catalog.
pub async fn read_catalog_file(path: &Path) -> Result<CatalogFile, LoadError> {
    tracing::debug!(path = %path.display(), "Loading translation file");
    let content = tokio::fs::read_to_string(path)
        .await
        .map_err(|source| LoadError::Io { path: path.to_path_buf(), source })?;
    CatalogFile::parse(path, &content)
}

/// Detect language from a catalog path.
///
/// The file stem is tried first, whole and by its last `_`-separated parts
/// (`app_zh_CN.ts` -> `zh_CN`), then the parent directories from the
/// innermost outwards.
///
/// # Examples
/// ```
/// use std::path::Path;
/// use ts_translator::input::detect_language_from_path;
///
/// assert_eq!(detect_language_from_path(Path::new("translations/zh.ts")).as_deref(), Some("zh"));
/// assert_eq!(detect_language_from_path(Path::new("i18n/gmic_qt_pt_BR.ts")).as_deref(), Some("pt_BR"));
/// ```
#[must_use]
pub fn detect_language_from_path(file_path: &Path) -> Option<String> {
    if let Some(stem) = file_path.file_stem().and_then(|stem| stem.to_str())
        && let Some(language) = language_in_stem(stem)
    {
        return Some(language.to_string());
    }

    file_path
        .parent()?
        .components()
        .rev()
        .filter_map(|component| component.as_os_str().to_str())
        .find(|part| is_language_code(part))
        .map(str::to_string)
}

fn language_in_stem(stem: &str) -> Option<&str> {
    if is_language_code(stem) {
        return Some(stem);
    }
    let mut separators = stem.rmatch_indices('_').map(|(index, _)| index);
    let last = separators.next()?;
    if let Some(second_last) = separators.next() {
        let tail = stem.get(second_last + 1..)?;
        if is_language_code(tail) {
            return Some(tail);
        }
    }
    stem.get(last + 1..).filter(|tail| is_language_code(tail))
}

/// `zh`, `zh_CN`, `zh-Hans`, `sr_Latn_RS`, `es_419`.
fn is_language_code(candidate: &str) -> bool {
    let mut parts = candidate.split(['_', '-']);
    let Some(base) = parts.next() else {
        return false;
    };
    if !LANGUAGE_CODES.contains(&base) {
        return false;
    }
    let subtags: Vec<&str> = parts.collect();
    subtags.len() <= 2
        && subtags.iter().all(|subtag| {
            let region = subtag.len() == 2 && subtag.bytes().all(|b| b.is_ascii_alphabetic());
            let numeric = subtag.len() == 3 && subtag.bytes().all(|b| b.is_ascii_digit());
            let script = subtag.len() == 4
                && subtag.bytes().next().is_some_and(|b| b.is_ascii_uppercase())
                && subtag.bytes().all(|b| b.is_ascii_alphabetic());
            region || numeric || script
        })
}

/// Compares two codes by their base language.
fn same_language(a: &str, b: &str) -> bool {
    let base = |code: &str| {
        code.split(['_', '-']).next().unwrap_or_default().to_ascii_lowercase()
    };
    base(a) == base(b)
}
