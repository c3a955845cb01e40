//! Task configuration: static (decoration time), loaded (YAML), effective (per call).
//!
//! # 解決順序
//! 各フィールドは「YAML → 静的設定 → フォールバック」の順で決まります。
//! - task_name のフォールバック: ラップした関数の名前
//! - tags のフォールバック: 空の Vec
//! - project_name / artifacts はフォールバックなし

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use super::artifact::Artifacts;

/// Configuration captured when a function is wrapped. Never changes afterwards.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StaticConfig {
    pub yaml_file: Option<PathBuf>,
    pub project_name: Option<String>,
    pub task_name: Option<String>,
    pub tags: Option<Vec<String>>,
    pub artifacts: Option<Artifacts>,
}

/// Keys recognized in the YAML file. Unknown keys are ignored; `null` counts as absent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    pub project_name: Option<String>,
    pub task_name: Option<String>,
    pub tags: Option<Vec<String>>,
    pub artifacts: Option<Artifacts>,
}

impl FileConfig {
    pub fn is_empty(&self) -> bool {
        *self == FileConfig::default()
    }
}

/// Per-call configuration after merging.
#[derive(Debug, Clone, PartialEq)]
pub struct EffectiveConfig {
    pub project_name: Option<String>,
    pub task_name: String,
    pub tags: Vec<String>,
    pub artifacts: Artifacts,
}

impl EffectiveConfig {
    pub fn resolve(loaded: FileConfig, fixed: &StaticConfig, function_name: &str) -> Self {
        Self {
            project_name: loaded.project_name.or_else(|| fixed.project_name.clone()),
            task_name: loaded
                .task_name
                .or_else(|| fixed.task_name.clone())
                .unwrap_or_else(|| function_name.to_string()),
            tags: loaded
                .tags
                .or_else(|| fixed.tags.clone())
                .unwrap_or_default(),
            artifacts: loaded
                .artifacts
                .or_else(|| fixed.artifacts.clone())
                .unwrap_or_default(),
        }
    }
}
