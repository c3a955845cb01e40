//! InMemoryTracker - 開発・テスト用の tracker
//!
//! すべての呼び出しをメモリ上に記録するだけです。
//! `fail_artifact` / `fail_init` で失敗を注入できます。

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::domain::{ArtifactValue, TaskId, TrackerError};
use crate::ports::{IdGenerator, SystemClock, TaskHandle, TaskInit, TaskLogger, Tracker, UlidGenerator};

/// Everything the tracker observed for one task.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedTask {
    pub id: TaskId,
    pub init: TaskInit,
    pub artifacts: Vec<(String, ArtifactValue)>,
    pub reports: Vec<String>,
    pub close_count: usize,
}

type SharedTasks = Arc<Mutex<Vec<RecordedTask>>>;

fn lock(tasks: &SharedTasks) -> MutexGuard<'_, Vec<RecordedTask>> {
    tasks.lock().unwrap_or_else(PoisonError::into_inner)
}

pub struct InMemoryTracker {
    tasks: SharedTasks,
    ids: Box<dyn IdGenerator>,
    fail_artifact: Option<String>,
    fail_init: bool,
}

impl InMemoryTracker {
    pub fn new() -> Self {
        Self {
            tasks: Arc::new(Mutex::new(Vec::new())),
            ids: Box::new(UlidGenerator::new(SystemClock)),
            fail_artifact: None,
            fail_init: false,
        }
    }

    /// Publishing an artifact with this name fails.
    pub fn fail_artifact(mut self, name: impl Into<String>) -> Self {
        self.fail_artifact = Some(name.into());
        self
    }

    /// Every `init` fails.
    pub fn fail_init(mut self) -> Self {
        self.fail_init = true;
        self
    }

    /// Snapshot of recorded tasks, in creation order.
    pub fn tasks(&self) -> Vec<RecordedTask> {
        lock(&self.tasks).clone()
    }
}

impl Default for InMemoryTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl Tracker for InMemoryTracker {
    fn init(&self, init: &TaskInit) -> Result<Box<dyn TaskHandle>, TrackerError> {
        if self.fail_init {
            return Err(TrackerError::Other("tracker unavailable".to_string()));
        }

        let id = self.ids.generate_task_id();
        let mut tasks = lock(&self.tasks);
        tasks.push(RecordedTask {
            id,
            init: init.clone(),
            artifacts: Vec::new(),
            reports: Vec::new(),
            close_count: 0,
        });

        Ok(Box::new(InMemoryTaskHandle {
            logger: InMemoryLogger {
                tasks: Arc::clone(&self.tasks),
                index: tasks.len() - 1,
            },
            id,
            fail_artifact: self.fail_artifact.clone(),
        }))
    }
}

struct InMemoryTaskHandle {
    id: TaskId,
    logger: InMemoryLogger,
    fail_artifact: Option<String>,
}

impl InMemoryTaskHandle {
    fn update(&self, f: impl FnOnce(&mut RecordedTask)) {
        let mut tasks = lock(&self.logger.tasks);
        f(&mut tasks[self.logger.index]);
    }
}

impl TaskHandle for InMemoryTaskHandle {
    fn id(&self) -> TaskId {
        self.id
    }

    fn publish_artifact(&self, name: &str, value: &ArtifactValue) -> Result<(), TrackerError> {
        if self.fail_artifact.as_deref() == Some(name) {
            return Err(TrackerError::Other(format!("upload of '{name}' rejected")));
        }
        self.update(|task| task.artifacts.push((name.to_string(), value.clone())));
        Ok(())
    }

    fn logger(&self) -> &dyn TaskLogger {
        &self.logger
    }

    fn close(&self) -> Result<(), TrackerError> {
        self.update(|task| task.close_count += 1);
        Ok(())
    }
}

struct InMemoryLogger {
    tasks: SharedTasks,
    index: usize,
}

impl TaskLogger for InMemoryLogger {
    fn report_text(&self, message: &str) -> Result<(), TrackerError> {
        lock(&self.tasks)[self.index].reports.push(message.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn init(name: &str) -> TaskInit {
        TaskInit {
            project_name: None,
            task_name: name.to_string(),
            tags: vec!["t".to_string()],
        }
    }

    #[test]
    fn records_each_task_independently() {
        let tracker = InMemoryTracker::new();
        let first = tracker.init(&init("first")).unwrap();
        let second = tracker.init(&init("second")).unwrap();

        first.publish_artifact("model", &json!(1)).unwrap();
        second.logger().report_text("hello").unwrap();
        second.close().unwrap();

        let tasks = tracker.tasks();
        assert_eq!(tasks.len(), 2);
        assert_eq!(tasks[0].init.task_name, "first");
        assert_eq!(tasks[0].artifacts, vec![("model".to_string(), json!(1))]);
        assert_eq!(tasks[0].close_count, 0);
        assert_eq!(tasks[1].reports, vec!["hello".to_string()]);
        assert_eq!(tasks[1].close_count, 1);
        assert_eq!(tasks[1].id, second.id());
    }

    #[test]
    fn injected_failures() {
        let tracker = InMemoryTracker::new().fail_artifact("bad");
        let handle = tracker.init(&init("x")).unwrap();
        assert!(handle.publish_artifact("bad", &json!(null)).is_err());
        assert!(handle.publish_artifact("good", &json!(null)).is_ok());

        let down = InMemoryTracker::new().fail_init();
        assert!(down.init(&init("x")).is_err());
        assert!(down.tasks().is_empty());
    }
}
