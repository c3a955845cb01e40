//! ArtifactPublisher - artifact を task に登録
//!
//! # フロー
//! 1. Artifacts を順番に走査
//! 2. 1 件ごとに `TaskHandle::publish_artifact` を呼ぶ
//! 3. 失敗したらその時点で中断（リトライしない、残りは公開しない）

use tracing::debug;

use crate::domain::{Artifacts, PublishError};
use crate::ports::TaskHandle;

pub fn publish_artifacts(handle: &dyn TaskHandle, artifacts: &Artifacts) -> Result<(), PublishError> {
    for (name, value) in artifacts.iter() {
        handle
            .publish_artifact(name, value)
            .map_err(|source| PublishError {
                name: name.to_string(),
                source,
            })?;
        debug!(task_id = %handle.id(), artifact = name, "artifact published");
    }
    Ok(())
}
