//! Ports - 抽象化レイヤー
//!
//! 外部システム（実験管理サービス、時刻、ID 発行）へのインターフェースを定義します。
//! wrapper はこの trait だけに依存し、実装の詳細は impls 側に置きます。

pub mod clock;
pub mod id_generator;
pub mod tracker;

pub use self::clock::{Clock, FixedClock, SystemClock};
pub use self::id_generator::{IdGenerator, UlidGenerator};
pub use self::tracker::{TaskHandle, TaskInit, TaskLogger, Tracker};
