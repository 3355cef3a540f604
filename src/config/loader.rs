//! 設定ファイルの読み込み関数

use std::io::ErrorKind;
use std::path::Path;

use super::{
    ConfigError,
    TranslatorSettings,
};

/// ワークスペース直下の設定ファイル名
pub const CONFIG_FILE_NAME: &str = ".ts-translator.json";

/// ワークスペース直下の `.ts-translator.json` を読み込む
///
/// ファイルが無ければ `Ok(None)`。
///
/// # Errors
/// - 読み込みエラー（ファイルが無い場合を除く）
/// - JSON パースエラー
pub(super) fn load_from_workspace(
    workspace_root: &Path,
) -> Result<Option<TranslatorSettings>, ConfigError> {
    let config_path = workspace_root.join(CONFIG_FILE_NAME);

    let content = match std::fs::read_to_string(&config_path) {
        Ok(content) => content,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            tracing::debug!(path = %config_path.display(), "No configuration file, using defaults");
            return Ok(None);
        }
        Err(e) => return Err(e.into()),
    };

    tracing::debug!(path = %config_path.display(), "Loaded configuration file");
    Ok(Some(serde_json::from_str(&content)?))
}
