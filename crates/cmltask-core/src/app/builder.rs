//! CmlTask - 関数をラップする「デコレータ」の構築
//!
//! `cml_task()` で静的設定を組み立て、`wrap()` で関数に適用します。
//! この段階では I/O も tracker 呼び出しも行いません（設定を捕まえるだけ）。

use std::path::PathBuf;
use std::sync::Arc;

use crate::app::wrapper::Tracked;
use crate::domain::{ArtifactValue, Artifacts, StaticConfig};
use crate::impls::LocalTracker;
use crate::ports::Tracker;

/// Start building a task decorator.
///
/// # Example
/// ```ignore
/// let train = cml_task()
///     .yaml_file("conf/train.yaml")
///     .project_name("vision")
///     .tag("baseline")
///     .wrap("train", |epochs: u32| run_training(epochs));
///
/// let loss = train.call(10)?;
/// ```
pub fn cml_task() -> CmlTask {
    CmlTask::new()
}

/// Static configuration plus the tracker every wrapped call will talk to.
#[derive(Clone)]
pub struct CmlTask {
    config: StaticConfig,
    tracker: Option<Arc<dyn Tracker>>,
}

impl CmlTask {
    pub fn new() -> Self {
        Self {
            config: StaticConfig::default(),
            tracker: None,
        }
    }

    pub fn yaml_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.yaml_file = Some(path.into());
        self
    }

    pub fn project_name(mut self, name: impl Into<String>) -> Self {
        self.config.project_name = Some(name.into());
        self
    }

    pub fn task_name(mut self, name: impl Into<String>) -> Self {
        self.config.task_name = Some(name.into());
        self
    }

    /// Replace the tag list.
    pub fn tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.config.tags = Some(tags.into_iter().map(Into::into).collect());
        self
    }

    /// Append one tag.
    pub fn tag(mut self, tag: impl Into<String>) -> Self {
        self.config.tags.get_or_insert_with(Vec::new).push(tag.into());
        self
    }

    /// Replace the artifact mapping.
    pub fn artifacts(mut self, artifacts: Artifacts) -> Self {
        self.config.artifacts = Some(artifacts);
        self
    }

    /// Add (or replace) one artifact, keeping insertion order.
    pub fn artifact(mut self, name: impl Into<String>, value: impl Into<ArtifactValue>) -> Self {
        self.config
            .artifacts
            .get_or_insert_with(Artifacts::new)
            .insert(name, value);
        self
    }

    /// Tracker used by wrapped calls. Defaults to `LocalTracker::default()`.
    pub fn tracker(mut self, tracker: Arc<dyn Tracker>) -> Self {
        self.tracker = Some(tracker);
        self
    }

    pub fn config(&self) -> &StaticConfig {
        &self.config
    }

    /// Apply the decorator. `name` is the task name of last resort.
    pub fn wrap<F>(self, name: impl Into<String>, func: F) -> Tracked<F> {
        let tracker = self
            .tracker
            .unwrap_or_else(|| Arc::new(LocalTracker::default()));
        Tracked::new(name.into(), self.config, tracker, func)
    }
}

impl Default for CmlTask {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::impls::InMemoryTracker;
    use serde_json::json;

    #[test]
    fn captures_static_configuration() {
        let task = cml_task()
            .yaml_file("conf/train.yaml")
            .project_name("vision")
            .task_name("train-resnet")
            .tag("baseline")
            .tag("gpu")
            .artifact("model", json!({"layers": 50}))
            .artifact("notes", "first");

        let config = task.config();
        assert_eq!(config.yaml_file, Some(PathBuf::from("conf/train.yaml")));
        assert_eq!(config.project_name.as_deref(), Some("vision"));
        assert_eq!(config.task_name.as_deref(), Some("train-resnet"));
        assert_eq!(
            config.tags,
            Some(vec!["baseline".to_string(), "gpu".to_string()])
        );
        let artifacts = config.artifacts.as_ref().unwrap();
        assert_eq!(artifacts.names().collect::<Vec<_>>(), vec!["model", "notes"]);
    }

    #[test]
    fn tags_replaces_previous_tags() {
        let task = cml_task().tag("old").tags(["a", "b"]);
        assert_eq!(
            task.config().tags,
            Some(vec!["a".to_string(), "b".to_string()])
        );
    }

    #[test]
    fn wrapping_does_not_touch_the_tracker() {
        let tracker = Arc::new(InMemoryTracker::new());
        let wrapped = cml_task()
            .project_name("vision")
            .tracker(tracker.clone())
            .wrap("train", |x: u32| Ok::<_, String>(x + 1));

        assert_eq!(wrapped.name(), "train");
        assert!(tracker.tasks().is_empty());
    }
}
