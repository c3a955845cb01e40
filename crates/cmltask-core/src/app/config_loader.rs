//! ConfigLoader - YAML 設定ファイルの読み込み
//!
//! 呼び出しのたびに読み直します（キャッシュしない）。
//! 読み込みに失敗しても呼び出しは止めず、診断メッセージを出して空の設定で続行します。

use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use tracing::warn;

use crate::domain::{ConfigError, FileConfig};

/// Read and parse `path`, distinguishing every failure mode.
pub fn try_load_params(path: &Path) -> Result<FileConfig, ConfigError> {
    let contents = fs::read_to_string(path).map_err(|source| match source.kind() {
        ErrorKind::NotFound => ConfigError::NotFound {
            path: path.to_path_buf(),
        },
        _ => ConfigError::Read {
            path: path.to_path_buf(),
            source,
        },
    })?;

    if contents.trim().is_empty() {
        return Ok(FileConfig::default());
    }

    // トップレベルが null（`~` だけのファイルなど）も空の設定として扱う
    let parsed: Option<FileConfig> =
        serde_yaml::from_str(&contents).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;

    Ok(parsed.unwrap_or_default())
}

/// Load `path`, degrading any failure to an empty configuration.
///
/// The diagnostic goes to standard output and is also emitted as a `warn` event.
pub fn load_params(path: &Path) -> FileConfig {
    match try_load_params(path) {
        Ok(config) => config,
        Err(err) => {
            println!("{}", diagnostic(&err));
            warn!(path = %path.display(), error = %err, "falling back to empty task configuration");
            FileConfig::default()
        }
    }
}

/// Human-readable message printed when the configuration file can't be used.
pub fn diagnostic(err: &ConfigError) -> String {
    format!("Error: {err}")
}
