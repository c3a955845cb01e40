//! App - アプリケーション層
//!
//! ports（Tracker）と domain（設定、artifact）を組み合わせて、
//! 関数呼び出しを task として記録する流れを実装します。
//!
//! # 主要コンポーネント
//! - **CmlTask**: 静的設定を捕まえるデコレータ（builder）
//! - **Tracked**: ラップされた関数（呼び出しごとに init → publish → run → report → close）
//! - **config_loader**: YAML の読み込み（失敗しても空の設定で続行）
//! - **publisher**: artifact の順次公開

pub mod builder;
pub mod config_loader;
pub mod publisher;
pub mod wrapper;

pub use self::builder::{CmlTask, cml_task};
pub use self::config_loader::{load_params, try_load_params};
pub use self::publisher::publish_artifacts;
pub use self::wrapper::Tracked;
