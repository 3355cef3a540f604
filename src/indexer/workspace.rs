//! Catalog discovery and concurrent loading.
use std::path::{
    Path,
    PathBuf,
};

use futures::StreamExt;
use ignore::WalkBuilder;

use crate::config::{
    ConfigManager,
    FileMatcher,
    TranslatorSettings,
};
use crate::indexer::types::IndexerError;
use crate::input::{
    CatalogFile,
    read_catalog_file,
};
use crate::translator::Localizer;

/// 並列読み込み数のデフォルト値（CPU コア数の 80%、最低 1）
#[must_use]
pub fn default_num_threads() -> usize {
    (num_cpus::get() * 4 / 5).max(1)
}

/// Finds and loads every catalog in a workspace.
#[derive(Clone, Debug, Default)]
pub struct CatalogIndexer;

impl CatalogIndexer {
    /// 新しいインデクサーを作成
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// ワークスペースをインデックス
    ///
    /// 読み込めないファイルや壊れたファイルは警告を出してスキップする。
    /// 結果はパス順。
    ///
    /// # Errors
    /// - ルートがディレクトリでない
    /// - 不正な glob パターン
    pub async fn index_workspace(
        &self,
        workspace_path: &Path,
        config_manager: &ConfigManager,
    ) -> Result<Vec<CatalogFile>, IndexerError> {
        tracing::debug!(workspace_path = %workspace_path.display(), "Indexing workspace");
        if !workspace_path.is_dir() {
            return Err(IndexerError::InvalidPath(workspace_path.to_path_buf()));
        }

        let settings = config_manager.get_settings();
        let matcher = config_manager.file_matcher(workspace_path.to_path_buf())?;
        let files = Self::find_catalog_files(&matcher);
        let num_threads = settings.indexing.num_threads.unwrap_or_else(default_num_threads);
        tracing::debug!(files = files.len(), num_threads, "Found translation files");

        // 並列処理でファイルを読み込み
        let mut catalogs: Vec<CatalogFile> = futures::stream::iter(files)
            .map(Self::load_file)
            .buffer_unordered(num_threads)
            .filter_map(|catalog| async move { catalog })
            .collect()
            .await;

        catalogs.sort_by(|a, b| a.path.cmp(&b.path));
        tracing::debug!(catalogs = catalogs.len(), "Indexed workspace");
        Ok(catalogs)
    }

    /// 単一ファイルを読み込む
    async fn load_file(file_path: PathBuf) -> Option<CatalogFile> {
        match read_catalog_file(&file_path).await {
            Ok(catalog) => Some(catalog),
            Err(e) => {
                tracing::warn!("{e}");
                None
            }
        }
    }

    /// 翻訳ファイルを検索
    ///
    /// `excludePatterns` に一致するディレクトリは中に入らない。
    fn find_catalog_files(matcher: &FileMatcher) -> Vec<PathBuf> {
        let workspace_path = matcher.workspace_root();
        let pruning = matcher.clone();

        WalkBuilder::new(workspace_path)
            .hidden(false)
            .git_ignore(true)
            .git_global(true)
            .git_exclude(true)
            .follow_links(false)
            .filter_entry(move |entry| {
                entry
                    .path()
                    .strip_prefix(pruning.workspace_root())
                    .map_or(true, |relative| !pruning.is_excluded_relative(relative))
            })
            .build()
            .filter_map(|result| {
                result.map_err(|err| tracing::debug!(?err, "Failed to read directory entry")).ok()
            })
            .filter(|entry| entry.file_type().is_some_and(|ft| ft.is_file()))
            .filter(|entry| matcher.is_translation_file(entry.path()))
            .map(ignore::DirEntry::into_path)
            .collect()
    }
}

/// Builds a localizer from indexed catalogs.
///
/// With `primaryLanguages` set, one catalog per listed language is
/// installed and earlier languages take precedence. Without it every
/// catalog is installed in path order.
#[must_use]
pub fn localizer_for(catalogs: &[CatalogFile], settings: &TranslatorSettings) -> Localizer {
    let options = settings.table_options();

    let selected: Vec<&CatalogFile> = match &settings.primary_languages {
        Some(languages) => languages
            .iter()
            .filter_map(|wanted| {
                catalogs.iter().find(|catalog| {
                    catalog.language().is_some_and(|language| language_matches(wanted, language))
                })
            })
            .collect(),
        None => catalogs.iter().collect(),
    };

    // 後から追加した翻訳が優先されるので、優先度の低い順に追加する
    selected
        .into_iter()
        .rev()
        .fold(Localizer::new(), |localizer, catalog| {
            tracing::debug!(path = %catalog.path.display(), language = ?catalog.language(), "Using catalog");
            localizer.with_translator(catalog.translator(&options))
        })
}

/// `zh` matches `zh_CN`; `zh_CN` only matches `zh_CN` / `zh-CN`.
fn language_matches(wanted: &str, language: &str) -> bool {
    let normalize = |code: &str| code.to_ascii_lowercase().replace('-', "_");
    let wanted = normalize(wanted);
    let language = normalize(language);
    wanted == language
        || (!wanted.contains('_') && language.split('_').next() == Some(wanted.as_str()))
}
