//! 設定管理を行うモジュール

use std::path::{
    Path,
    PathBuf,
};

use super::{
    ConfigError,
    FileMatcher,
    MatcherError,
    TranslatorSettings,
    loader,
};
use crate::ir::TableOptions;

/// 設定管理を行う
#[derive(Default, Debug, Clone)]
pub struct ConfigManager {
    /// 現在の設定
    current_settings: TranslatorSettings,

    /// ワークスペースのルートパス
    workspace_root: Option<PathBuf>,
}

impl ConfigManager {
    /// 新しい設定マネージャーを作成
    #[must_use]
    pub fn new() -> Self {
        Self { current_settings: TranslatorSettings::default(), workspace_root: None }
    }

    /// ワークスペースの `.ts-translator.json` を読み込んで検証する
    ///
    /// 設定ファイルが無ければデフォルト値。検証に失敗した場合は現在の設定を保持する。
    ///
    /// # Errors
    /// - ファイル読み込みエラー
    /// - JSON パースエラー
    /// - バリデーションエラー
    pub fn load_settings(&mut self, workspace_root: Option<PathBuf>) -> Result<(), ConfigError> {
        let settings = match workspace_root.as_deref() {
            Some(root) => loader::load_from_workspace(root)?.unwrap_or_default(),
            None => TranslatorSettings::default(),
        };
        settings.validate().map_err(ConfigError::ValidationErrors)?;

        tracing::debug!(
            workspace_root = ?workspace_root,
            include_patterns = ?settings.translation_files.include_patterns,
            primary_languages = ?settings.primary_languages,
            include_unfinished = settings.include_unfinished,
            "Settings loaded"
        );
        self.current_settings = settings;
        self.workspace_root = workspace_root;
        Ok(())
    }

    /// 設定を差し替える（ワークスペースルートはそのまま）
    ///
    /// # Errors
    /// バリデーションエラー
    pub fn update_settings(&mut self, new_settings: TranslatorSettings) -> Result<(), ConfigError> {
        new_settings.validate().map_err(ConfigError::ValidationErrors)?;
        if new_settings.translation_files != self.current_settings.translation_files {
            tracing::debug!("Translation file patterns changed, catalogs need re-indexing");
        }
        self.current_settings = new_settings;
        Ok(())
    }

    /// 現在の設定を取得
    #[must_use]
    pub const fn get_settings(&self) -> &TranslatorSettings {
        &self.current_settings
    }

    /// ワークスペースルートを取得
    #[must_use]
    pub fn workspace_root(&self) -> Option<&Path> {
        self.workspace_root.as_deref()
    }

    /// 現在の設定からファイルマッチャーを作る
    ///
    /// # Errors
    /// 不正な glob パターン
    pub fn file_matcher(&self, workspace_root: PathBuf) -> Result<FileMatcher, MatcherError> {
        FileMatcher::new(workspace_root, &self.current_settings)
    }

    /// 翻訳テーブルの構築オプション
    #[must_use]
    pub const fn table_options(&self) -> TableOptions {
        self.current_settings.table_options()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::fs;

    use rstest::rstest;
    use tempfile::TempDir;

    use super::*;
    use crate::config::{
        CONFIG_FILE_NAME,
        IndexingConfig,
    };

    /// new: デフォルト値で作成される
    #[rstest]
    fn test_new_creates_default_settings() {
        let manager = ConfigManager::new();

        assert_eq!(manager.get_settings(), &TranslatorSettings::default());
        assert!(manager.workspace_root().is_none());
    }

    /// load_settings: workspace_root が None の場合
    #[rstest]
    fn test_load_settings_without_workspace() {
        let mut manager = ConfigManager::new();

        let result = manager.load_settings(None);

        assert!(result.is_ok());
        assert!(manager.get_settings().include_unfinished);
        assert!(manager.workspace_root().is_none());
    }

    /// load_settings: 設定ファイルがある場合
    #[rstest]
    fn test_load_settings_with_config_file() {
        let temp_dir = TempDir::new().unwrap();
        let config_content = r#"{"indexing": {"numThreads": 2}}"#;
        fs::write(temp_dir.path().join(CONFIG_FILE_NAME), config_content).unwrap();

        let mut manager = ConfigManager::new();
        let result = manager.load_settings(Some(temp_dir.path().to_path_buf()));

        assert!(result.is_ok());
        assert_eq!(manager.get_settings().indexing.num_threads, Some(2));
        assert_eq!(manager.workspace_root(), Some(temp_dir.path()));
    }

    /// load_settings: バリデーションエラーなら設定は変わらない
    #[rstest]
    fn test_load_settings_invalid_config_keeps_previous() {
        let temp_dir = TempDir::new().unwrap();
        let config_content = r#"{"indexing": {"numThreads": 0}}"#;
        fs::write(temp_dir.path().join(CONFIG_FILE_NAME), config_content).unwrap();

        let mut manager = ConfigManager::new();
        let result = manager.load_settings(Some(temp_dir.path().to_path_buf()));

        assert!(matches!(result, Err(ConfigError::ValidationErrors(_))));
        assert_eq!(manager.get_settings().indexing.num_threads, None);
        assert!(manager.workspace_root().is_none());
    }

    /// update_settings: 有効な設定で更新成功
    #[rstest]
    fn test_update_settings_valid() {
        let mut manager = ConfigManager::new();
        let new_settings =
            TranslatorSettings { include_unfinished: false, ..TranslatorSettings::default() };

        let result = manager.update_settings(new_settings);

        assert!(result.is_ok());
        assert!(!manager.get_settings().include_unfinished);
    }

    /// update_settings: 無効な設定でエラー
    #[rstest]
    fn test_update_settings_invalid() {
        let mut manager = ConfigManager::new();
        let new_settings = TranslatorSettings {
            indexing: IndexingConfig { num_threads: Some(0) },
            ..TranslatorSettings::default()
        };

        let result = manager.update_settings(new_settings);

        assert!(result.is_err());
    }

    #[rstest]
    fn test_file_matcher_uses_current_settings() {
        let manager = ConfigManager::new();

        let matcher = manager.file_matcher(PathBuf::from("/workspace")).unwrap();

        assert!(matcher.is_translation_file(Path::new("/workspace/translations/zh.ts")));
        assert!(!matcher.is_translation_file(Path::new("/workspace/src/main.ts")));
    }

    /// table_options: includeUnfinished が反映される
    #[rstest]
    #[case(r#"{}"#, true)]
    #[case(r#"{"includeUnfinished": false}"#, false)]
    fn test_table_options(#[case] config: &str, #[case] include_unfinished: bool) {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join(CONFIG_FILE_NAME), config).unwrap();

        let mut manager = ConfigManager::new();
        manager.load_settings(Some(temp_dir.path().to_path_buf())).unwrap();

        assert_eq!(manager.table_options(), TableOptions { include_unfinished });
    }
}
