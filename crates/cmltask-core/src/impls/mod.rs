//! Impls - ports の実装
//!
//! - **InMemoryTracker**: 呼び出しを記録するだけ（開発・テスト用）
//! - **LocalTracker**: ディレクトリに task を書き出す（offline mode 相当）

pub mod inmem_tracker;
pub mod local_tracker;

pub use self::inmem_tracker::{InMemoryTracker, RecordedTask};
pub use self::local_tracker::{LocalTracker, TaskRecord, TaskStatus};
