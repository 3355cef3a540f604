use serde::{
    Deserialize,
    Serialize,
};
use thiserror::Error;

use crate::ir::TableOptions;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Configuration error in '{field_path}': {message}")]
pub struct ValidationError {
    /// JSON path to the field (e.g., "translationFiles.includePatterns[0]")
    pub field_path: String,
    pub message: String,
}

impl ValidationError {
    #[must_use]
    pub fn new(field_path: impl Into<String>, message: impl Into<String>) -> Self {
        Self { field_path: field_path.into(), message: message.into() }
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Configuration validation failed:\n{}", format_validation_errors(.0))]
    ValidationErrors(Vec<ValidationError>),

    #[error("Failed to load configuration file: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Failed to parse configuration: {0}")]
    ParseError(#[from] serde_json::Error),
}

fn format_validation_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .enumerate()
        .map(|(i, err)| format!("  {}. {} - {}", i + 1, err.field_path, err.message))
        .collect::<Vec<_>>()
        .join("\n")
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct TranslatorSettings {
    pub translation_files: TranslationFilesConfig,

    /// Applied to every walked path, catalogs included.
    pub exclude_patterns: Vec<String>,

    /// Language priority when several catalogs are available.
    pub primary_languages: Option<Vec<String>>,

    /// Whether `type="unfinished"` translations are used for lookup.
    pub include_unfinished: bool,

    pub indexing: IndexingConfig,
    pub diagnostics: DiagnosticsConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct TranslationFilesConfig {
    pub include_patterns: Vec<String>,
    pub exclude_patterns: Vec<String>,
}

#[derive(Debug, Clone, Copy, Deserialize, Serialize, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct IndexingConfig {
    /// Parallel loads while indexing.
    /// Default: 80% of CPU cores (minimum 1).
    pub num_threads: Option<usize>,
}

/// Severity assigned to a diagnostic kind.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
    Information,
    Hint,
    /// The check is disabled.
    Off,
}

impl Severity {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Error => "error",
            Self::Warning => "warning",
            Self::Information => "information",
            Self::Hint => "hint",
            Self::Off => "off",
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct DiagnosticsConfig {
    pub unfinished: Severity,
    pub empty_translation: Severity,
    pub conflicting_duplicate: Severity,
    pub placeholder_mismatch: Severity,
    pub accelerator_mismatch: Severity,
    pub language_mismatch: Severity,
}

impl Default for DiagnosticsConfig {
    fn default() -> Self {
        Self {
            unfinished: Severity::Information,
            empty_translation: Severity::Hint,
            conflicting_duplicate: Severity::Warning,
            placeholder_mismatch: Severity::Error,
            accelerator_mismatch: Severity::Warning,
            language_mismatch: Severity::Warning,
        }
    }
}

impl TranslatorSettings {
    /// Options for building translation tables from these settings.
    #[must_use]
    pub const fn table_options(&self) -> TableOptions {
        TableOptions { include_unfinished: self.include_unfinished }
    }

    /// # Errors
    /// - Required field is empty
    /// - Invalid glob pattern
    /// - Zero thread count
    pub fn validate(&self) -> Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();

        if self.translation_files.include_patterns.is_empty() {
            errors.push(ValidationError::new(
                "translationFiles.includePatterns",
                "At least one pattern is required. Example: [\"**/translations/**/*.ts\"]",
            ));
        }

        check_globs(
            "translationFiles.includePatterns",
            &self.translation_files.include_patterns,
            &mut errors,
        );
        check_globs(
            "translationFiles.excludePatterns",
            &self.translation_files.exclude_patterns,
            &mut errors,
        );
        check_globs("excludePatterns", &self.exclude_patterns, &mut errors);

        if let Some(languages) = &self.primary_languages {
            for (index, language) in languages.iter().enumerate() {
                if language.trim().is_empty() {
                    errors.push(ValidationError::new(
                        format!("primaryLanguages[{index}]"),
                        "The language code cannot be empty. Example: \"zh_CN\"",
                    ));
                }
            }
        }

        if self.indexing.num_threads == Some(0) {
            errors.push(ValidationError::new(
                "indexing.numThreads",
                "The thread count must be at least 1, or remove this field to use the default",
            ));
        }

        if errors.is_empty() { Ok(()) } else { Err(errors) }
    }
}

fn check_globs(field: &str, patterns: &[String], errors: &mut Vec<ValidationError>) {
    for (index, pattern) in patterns.iter().enumerate() {
        if let Err(e) = globset::Glob::new(pattern) {
            errors.push(ValidationError::new(
                format!("{field}[{index}]"),
                format!("Invalid glob pattern '{pattern}': {e}"),
            ));
        }
    }
}

impl Default for TranslationFilesConfig {
    fn default() -> Self {
        Self {
            include_patterns: vec![
                "**/translations/**/*.ts".to_string(),
                "**/i18n/**/*.ts".to_string(),
            ],
            exclude_patterns: Vec::new(),
        }
    }
}

impl Default for TranslatorSettings {
    fn default() -> Self {
        Self {
            translation_files: TranslationFilesConfig::default(),
            exclude_patterns: vec!["node_modules/**".to_string(), "target/**".to_string()],
            primary_languages: None,
            include_unfinished: true,
            indexing: IndexingConfig::default(),
            diagnostics: DiagnosticsConfig::default(),
        }
    }
}
