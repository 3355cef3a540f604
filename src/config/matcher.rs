//! Decides which workspace files are translation catalogs.

use std::fmt;
use std::path::{
    Path,
    PathBuf,
};

use globset::{
    Glob,
    GlobSet,
    GlobSetBuilder,
};

use super::TranslatorSettings;

/// Setting a glob pattern came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatternSource {
    /// `excludePatterns`
    Exclude,
    /// `translationFiles.includePatterns`
    CatalogInclude,
    /// `translationFiles.excludePatterns`
    CatalogExclude,
}

impl fmt::Display for PatternSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Exclude => "excludePatterns",
            Self::CatalogInclude => "translationFiles.includePatterns",
            Self::CatalogExclude => "translationFiles.excludePatterns",
        })
    }
}

#[derive(Debug, thiserror::Error)]
pub enum MatcherError {
    #[error("Invalid glob '{pattern}' in {setting}: {source}")]
    InvalidPattern {
        setting: PatternSource,
        pattern: String,
        #[source]
        source: globset::Error,
    },

    #[error("Failed to build glob set: {0}")]
    GlobSetBuild(#[from] globset::Error),
}

/// Catalog file filter for one workspace.
///
/// Patterns are matched against paths relative to the workspace root.
#[derive(Debug, Clone)]
pub struct FileMatcher {
    workspace_root: PathBuf,
    /// `excludePatterns`: never walked, never loaded.
    excluded: GlobSet,
    catalogs: GlobSet,
    excluded_catalogs: GlobSet,
}

fn compile(patterns: &[String], setting: PatternSource) -> Result<GlobSet, MatcherError> {
    patterns
        .iter()
        .try_fold(GlobSetBuilder::new(), |mut builder, pattern| {
            let glob = Glob::new(pattern).map_err(|source| MatcherError::InvalidPattern {
                setting,
                pattern: pattern.clone(),
                source,
            })?;
            builder.add(glob);
            Ok::<_, MatcherError>(builder)
        })?
        .build()
        .map_err(MatcherError::from)
}

impl FileMatcher {
    /// # Errors
    /// Returns [`MatcherError::InvalidPattern`] naming the offending setting.
    pub fn new(
        workspace_root: PathBuf,
        settings: &TranslatorSettings,
    ) -> Result<Self, MatcherError> {
        let files = &settings.translation_files;
        Ok(Self {
            excluded: compile(&settings.exclude_patterns, PatternSource::Exclude)?,
            catalogs: compile(&files.include_patterns, PatternSource::CatalogInclude)?,
            excluded_catalogs: compile(&files.exclude_patterns, PatternSource::CatalogExclude)?,
            workspace_root,
        })
    }

    #[must_use]
    pub fn workspace_root(&self) -> &Path {
        &self.workspace_root
    }

    /// Absolute-path form of [`Self::is_translation_file_relative`].
    ///
    /// Paths outside the workspace root never match.
    #[must_use]
    pub fn is_translation_file(&self, absolute_path: &Path) -> bool {
        absolute_path
            .strip_prefix(&self.workspace_root)
            .is_ok_and(|relative| self.is_translation_file_relative(relative))
    }

    /// True when the path is a catalog: included by
    /// `translationFiles.includePatterns` and excluded by neither exclude list.
    #[must_use]
    pub fn is_translation_file_relative(&self, relative_path: &Path) -> bool {
        self.catalogs.is_match(relative_path)
            && !self.excluded_catalogs.is_match(relative_path)
            && !self.is_excluded_relative(relative_path)
    }

    /// True when `excludePatterns` rules the path out; the indexer skips
    /// such directories entirely.
    #[must_use]
    pub fn is_excluded_relative(&self, relative_path: &Path) -> bool {
        self.excluded.is_match(relative_path)
    }
}
