//! LocalTracker - ディレクトリに task を書き出す tracker（offline mode 相当）
//!
//! # レイアウト
//! ```text
//! <root>/<project | "default">/<task-id>/
//!   task.json             id, project, name, tags, status, created_at, closed_at
//!   log.txt               report_text 1 回につき 1 行
//!   artifacts/<name>.json JSON 値
//!   artifacts/<name>/<f>  既存ファイルのパスを指す文字列はファイルごとコピー
//! ```

use std::ffi::OsStr;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{ArtifactValue, TaskId, TrackerError};
use crate::ports::{
    Clock, IdGenerator, SystemClock, TaskHandle, TaskInit, TaskLogger, Tracker, UlidGenerator,
};

pub const DEFAULT_ROOT: &str = ".cmltask";
const DEFAULT_PROJECT: &str = "default";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    Running,
    Closed,
}

/// Contents of `task.json`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskRecord {
    pub id: TaskId,
    pub project_name: Option<String>,
    pub task_name: String,
    pub tags: Vec<String>,
    pub status: TaskStatus,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub closed_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub artifacts: Vec<String>,
}

pub struct LocalTracker {
    root: PathBuf,
    clock: Arc<dyn Clock>,
    ids: Box<dyn IdGenerator>,
}

impl LocalTracker {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self::with_clock(root, Arc::new(SystemClock))
    }

    /// Use `clock` for record timestamps and id generation.
    pub fn with_clock(root: impl Into<PathBuf>, clock: Arc<dyn Clock>) -> Self {
        Self {
            root: root.into(),
            ids: Box::new(UlidGenerator::new(Arc::clone(&clock))),
            clock,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Directory a task with this project and id is written to.
    pub fn task_dir(&self, project_name: Option<&str>, id: TaskId) -> PathBuf {
        self.root
            .join(project_name.unwrap_or(DEFAULT_PROJECT))
            .join(id.to_string())
    }

    pub fn read_record(task_dir: &Path) -> Result<TaskRecord, TrackerError> {
        let path = task_dir.join("task.json");
        let bytes = fs::read(&path)
            .map_err(|e| TrackerError::io(format!("reading {}", path.display()), e))?;
        Ok(serde_json::from_slice(&bytes)?)
    }
}

impl Default for LocalTracker {
    fn default() -> Self {
        Self::new(DEFAULT_ROOT)
    }
}

impl Tracker for LocalTracker {
    fn init(&self, init: &TaskInit) -> Result<Box<dyn TaskHandle>, TrackerError> {
        let id = self.ids.generate_task_id();
        let dir = self.task_dir(init.project_name.as_deref(), id);
        fs::create_dir_all(dir.join("artifacts"))
            .map_err(|e| TrackerError::io(format!("creating {}", dir.display()), e))?;

        let record = TaskRecord {
            id,
            project_name: init.project_name.clone(),
            task_name: init.task_name.clone(),
            tags: init.tags.clone(),
            status: TaskStatus::Running,
            created_at: self.clock.now(),
            closed_at: None,
            artifacts: Vec::new(),
        };
        write_record(&dir, &record)?;

        Ok(Box::new(LocalTaskHandle {
            logger: LocalLogger {
                path: dir.join("log.txt"),
                clock: Arc::clone(&self.clock),
            },
            dir,
            clock: Arc::clone(&self.clock),
            record: Mutex::new(record),
        }))
    }
}

fn write_record(dir: &Path, record: &TaskRecord) -> Result<(), TrackerError> {
    let path = dir.join("task.json");
    let json = serde_json::to_vec_pretty(record)?;
    fs::write(&path, json).map_err(|e| TrackerError::io(format!("writing {}", path.display()), e))
}

// artifact 名はそのままファイル名になるのでパス区切りを拒否する
fn validate_artifact_name(name: &str) -> Result<(), TrackerError> {
    let invalid = name.is_empty()
        || name == "."
        || name == ".."
        || name.contains(['/', '\\'])
        || name.contains('\0');
    if invalid {
        return Err(TrackerError::InvalidArtifactName(name.to_string()));
    }
    Ok(())
}

struct LocalTaskHandle {
    dir: PathBuf,
    clock: Arc<dyn Clock>,
    logger: LocalLogger,
    record: Mutex<TaskRecord>,
}

impl TaskHandle for LocalTaskHandle {
    fn id(&self) -> TaskId {
        self.record
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .id
    }

    fn publish_artifact(&self, name: &str, value: &ArtifactValue) -> Result<(), TrackerError> {
        validate_artifact_name(name)?;
        let artifacts_dir = self.dir.join("artifacts");

        match value.as_str().map(Path::new).filter(|p| p.is_file()) {
            Some(source) => {
                let target_dir = artifacts_dir.join(name);
                fs::create_dir_all(&target_dir)
                    .map_err(|e| TrackerError::io(format!("creating {}", target_dir.display()), e))?;
                let file_name = source.file_name().unwrap_or(OsStr::new(name));
                fs::copy(source, target_dir.join(file_name))
                    .map_err(|e| TrackerError::io(format!("copying {}", source.display()), e))?;
            }
            None => {
                let path = artifacts_dir.join(format!("{name}.json"));
                let json = serde_json::to_vec_pretty(value)?;
                fs::write(&path, json)
                    .map_err(|e| TrackerError::io(format!("writing {}", path.display()), e))?;
            }
        }

        let mut record = self.record.lock().unwrap_or_else(PoisonError::into_inner);
        if !record.artifacts.iter().any(|n| n == name) {
            record.artifacts.push(name.to_string());
        }
        write_record(&self.dir, &record)
    }

    fn logger(&self) -> &dyn TaskLogger {
        &self.logger
    }

    fn close(&self) -> Result<(), TrackerError> {
        let mut record = self.record.lock().unwrap_or_else(PoisonError::into_inner);
        record.status = TaskStatus::Closed;
        record.closed_at = Some(self.clock.now());
        write_record(&self.dir, &record)
    }
}

struct LocalLogger {
    path: PathBuf,
    clock: Arc<dyn Clock>,
}

impl TaskLogger for LocalLogger {
    fn report_text(&self, message: &str) -> Result<(), TrackerError> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(|e| TrackerError::io(format!("opening {}", self.path.display()), e))?;
        writeln!(file, "{} {}", self.clock.now().to_rfc3339(), message)
            .map_err(|e| TrackerError::io(format!("appending to {}", self.path.display()), e))
    }
}
