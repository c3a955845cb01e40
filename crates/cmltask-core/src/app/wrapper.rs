//! Tracked - ラップされた関数（1 回の呼び出し = 1 task）
//!
//! # 呼び出しフロー
//! 1. YAML があれば読み込む（毎回読み直す）
//! 2. 実効設定を解決（YAML → 静的設定 → フォールバック）
//! 3. `Tracker::init` で task を作成
//! 4. artifact があれば公開（失敗はそのまま返す、レポートはしない）
//! 5. 関数を実行し、成功/失敗のどちらか 1 回だけレポート
//!
//! handle は TaskGuard が所有し、Drop で必ず 1 回だけ close します
//! （Err を返したときも panic したときも同じ）。

use std::fmt::Display;
use std::future::Future;
use std::sync::Arc;

use tracing::{debug, error};

use crate::app::config_loader::load_params;
use crate::app::publisher::publish_artifacts;
use crate::domain::{EffectiveConfig, FileConfig, Outcome, StaticConfig, TaskError};
use crate::ports::{TaskHandle, TaskInit, Tracker};

/// A function wrapped with task tracking. Built by `CmlTask::wrap`.
pub struct Tracked<F> {
    name: String,
    config: StaticConfig,
    tracker: Arc<dyn Tracker>,
    func: F,
}

impl<F> Tracked<F> {
    pub(crate) fn new(name: String, config: StaticConfig, tracker: Arc<dyn Tracker>, func: F) -> Self {
        Self {
            name,
            config,
            tracker,
            func,
        }
    }

    /// Identifier of the wrapped function.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn config(&self) -> &StaticConfig {
        &self.config
    }

    /// Resolve the configuration the next call would use. Reads the YAML file.
    pub fn effective_config(&self) -> EffectiveConfig {
        let loaded = match &self.config.yaml_file {
            Some(path) => load_params(path),
            None => FileConfig::default(),
        };
        EffectiveConfig::resolve(loaded, &self.config, &self.name)
    }

    /// Call a function taking one argument (use a tuple for several).
    pub fn call<A, R, E>(&self, args: A) -> Result<R, TaskError<E>>
    where
        F: Fn(A) -> Result<R, E>,
        E: Display,
    {
        let guard = self.open::<E>()?;
        let result = (self.func)(args);
        guard.finish(result)
    }

    /// Call a function taking no arguments.
    pub fn run<R, E>(&self) -> Result<R, TaskError<E>>
    where
        F: Fn() -> Result<R, E>,
        E: Display,
    {
        let guard = self.open::<E>()?;
        let result = (self.func)();
        guard.finish(result)
    }

    /// Same sequencing as `call`, awaiting the function's future.
    ///
    /// If the returned future is dropped early, the task is still closed.
    pub async fn call_async<A, Fut, R, E>(&self, args: A) -> Result<R, TaskError<E>>
    where
        F: Fn(A) -> Fut,
        Fut: Future<Output = Result<R, E>>,
        E: Display,
    {
        let guard = self.open::<E>()?;
        let result = (self.func)(args).await;
        guard.finish(result)
    }

    // steps 1-4
    fn open<E>(&self) -> Result<TaskGuard, TaskError<E>> {
        let effective = self.effective_config();
        let init = TaskInit {
            project_name: effective.project_name,
            task_name: effective.task_name,
            tags: effective.tags,
        };

        let handle = self.tracker.init(&init).map_err(TaskError::<E>::Init)?;
        debug!(
            task_id = %handle.id(),
            task_name = %init.task_name,
            project = ?init.project_name,
            "task initialized"
        );
        let guard = TaskGuard { handle };

        if !effective.artifacts.is_empty() {
            publish_artifacts(guard.handle.as_ref(), &effective.artifacts)?;
        }

        Ok(guard)
    }
}

/// Owns the task handle for one call and closes it on drop.
struct TaskGuard {
    handle: Box<dyn TaskHandle>,
}

impl TaskGuard {
    fn finish<R, E: Display>(self, result: Result<R, E>) -> Result<R, TaskError<E>> {
        let outcome = Outcome::of(&result);
        if let Err(err) = self.handle.logger().report_text(&outcome.report_text()) {
            error!(task_id = %self.handle.id(), error = %err, "failed to report task outcome");
        }
        result.map_err(TaskError::Function)
    }
}

impl Drop for TaskGuard {
    fn drop(&mut self) {
        match self.handle.close() {
            Ok(()) => debug!(task_id = %self.handle.id(), "task closed"),
            Err(err) => error!(task_id = %self.handle.id(), error = %err, "failed to close task"),
        }
    }
}
