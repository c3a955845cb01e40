//! Errors - エラー型と分類
//!
//! 3 系統に分かれます。
//! - ConfigError: 設定ファイルの読み込み失敗（呼び出し側には伝播しない）
//! - TrackerError: 外部 tracker（init / publish / report / close）の失敗
//! - TaskError<E>: ラップした関数の呼び出し結果として返すエラー

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur when loading the YAML configuration file.
///
/// `load_params` は全て「空の設定」に落とします。
/// 種別を区別したい場合は `try_load_params` を使ってください。
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file '{}' not found", path.display())]
    NotFound { path: PathBuf },

    #[error("failed to read config file '{}': {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse YAML in '{}': {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },
}

/// Errors reported by a `Tracker` implementation.
#[derive(Debug, Error)]
pub enum TrackerError {
    #[error("tracker I/O error while {action}: {source}")]
    Io {
        action: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to encode tracker record: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("invalid artifact name '{0}'")]
    InvalidArtifactName(String),

    #[error("{0}")]
    Other(String),
}

impl TrackerError {
    pub fn io(action: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            action: action.into(),
            source,
        }
    }
}

/// Publication of a single artifact failed; later artifacts were not published.
#[derive(Debug, Error)]
#[error("failed to publish artifact '{name}': {source}")]
pub struct PublishError {
    pub name: String,
    #[source]
    pub source: TrackerError,
}

/// Error returned by a wrapped call.
///
/// `Function(e)` は関数自身のエラーをそのまま運びます（型もメッセージも変えない）。
/// 呼び出し側は `into_function_error()` で元のエラーを取り出せます。
#[derive(Debug, Error)]
pub enum TaskError<E> {
    #[error("failed to initialize task: {0}")]
    Init(#[source] TrackerError),

    #[error(transparent)]
    Artifact(#[from] PublishError),

    #[error("{0}")]
    Function(E),
}

impl<E> TaskError<E> {
    pub fn is_function_error(&self) -> bool {
        matches!(self, TaskError::Function(_))
    }

    pub fn function_error(&self) -> Option<&E> {
        match self {
            TaskError::Function(e) => Some(e),
            _ => None,
        }
    }

    pub fn into_function_error(self) -> Option<E> {
        match self {
            TaskError::Function(e) => Some(e),
            _ => None,
        }
    }
}
