//! cmltask-core
//!
//! 関数呼び出しを実験管理サービスの task として記録するためのライブラリ。
//!
//! # モジュール構成
//! - **domain**: ドメインモデル（config, artifact, ids, outcome, errors）
//! - **ports**: 抽象化レイヤー（Tracker, TaskHandle, TaskLogger, Clock, IdGenerator）
//! - **app**: アプリケーションロジック（CmlTask, Tracked, config_loader, publisher）
//! - **impls**: 実装（InMemoryTracker, LocalTracker）
//!
//! # 使用例
//! ```ignore
//! use cmltask_core::cml_task;
//!
//! fn example_function() -> Result<(), std::io::Error> {
//!     println!("Task is running...");
//!     Ok(())
//! }
//!
//! let task = cml_task!(cmltask_core::cml_task().yaml_file("conf/task.yaml"), example_function);
//! task.run()?;
//! ```

pub mod app;
pub mod domain;
pub mod impls;
pub mod ports;

pub use app::{CmlTask, Tracked, cml_task};
pub use domain::{Artifacts, EffectiveConfig, StaticConfig, TaskError};
pub use ports::{TaskHandle, TaskInit, TaskLogger, Tracker};

/// Wrap a function item, using its identifier as the fallback task name.
///
/// `cml_task!(builder, func)` is `builder.wrap("func", func)`.
#[macro_export]
macro_rules! cml_task {
    ($builder:expr, $func:ident) => {
        $builder.wrap(stringify!($func), $func)
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::impls::InMemoryTracker;
    use std::sync::Arc;

    fn example_function() -> Result<u32, String> {
        Ok(42)
    }

    #[test]
    fn macro_uses_function_identifier_as_task_name() {
        let tracker = Arc::new(InMemoryTracker::new());
        let task = cml_task!(cml_task().tracker(tracker.clone()), example_function);

        assert_eq!(task.name(), "example_function");
        assert_eq!(task.run().unwrap(), 42);
        assert_eq!(tracker.tasks()[0].init.task_name, "example_function");
    }
}
