//! Tracker port - 実験管理サービスの抽象化
//!
//! wrapper が外部サービスに要求する操作は 4 つだけです。
//! - `Tracker::init` で task を作成し handle を得る
//! - `TaskHandle::publish_artifact` で artifact を登録（失敗しうる）
//! - `TaskHandle::logger().report_text` でテキストを記録
//! - `TaskHandle::close` で task を閉じる
//!
//! # 実装
//! - **InMemoryTracker**: 呼び出しを記録するだけ（開発・テスト用）
//! - **LocalTracker**: ディレクトリに task を書き出す（offline mode 相当）

use serde::{Deserialize, Serialize};

use crate::domain::{ArtifactValue, TaskId, TrackerError};

/// Parameters passed to `Tracker::init`, taken from the effective configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskInit {
    pub project_name: Option<String>,
    pub task_name: String,
    pub tags: Vec<String>,
}

/// Tracker は task を作成する
///
/// # Thread Safety
/// - `Send + Sync` を要求（wrapper を複数スレッドから呼べる）
/// - 呼び出しごとに独立した handle を返すこと
pub trait Tracker: Send + Sync {
    fn init(&self, init: &TaskInit) -> Result<Box<dyn TaskHandle>, TrackerError>;
}

/// One live task record. The wrapper owns it for the duration of one call.
pub trait TaskHandle: Send + Sync {
    fn id(&self) -> TaskId;

    fn publish_artifact(&self, name: &str, value: &ArtifactValue) -> Result<(), TrackerError>;

    fn logger(&self) -> &dyn TaskLogger;

    /// Called exactly once per handle by the wrapper.
    fn close(&self) -> Result<(), TrackerError>;
}

pub trait TaskLogger: Send + Sync {
    fn report_text(&self, message: &str) -> Result<(), TrackerError>;
}
