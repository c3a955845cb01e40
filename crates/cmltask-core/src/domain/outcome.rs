//! Outcome model: what gets reported to the task logger after a call.
//!
//! A wrapped call produces exactly one outcome, and the outcome turns into
//! exactly one text report.

use serde::{Deserialize, Serialize};

/// Report text for a call that returned `Ok`.
pub const SUCCESS_REPORT: &str = "Task completed successfully.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OutcomeKind {
    Success,
    Failure,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Outcome {
    pub kind: OutcomeKind,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl Outcome {
    pub fn success() -> Self {
        Self {
            kind: OutcomeKind::Success,
            reason: None,
        }
    }

    pub fn failure(reason: impl Into<String>) -> Self {
        Self {
            kind: OutcomeKind::Failure,
            reason: Some(reason.into()),
        }
    }

    /// Build an outcome from a call result without consuming it.
    pub fn of<R, E: std::fmt::Display>(result: &Result<R, E>) -> Self {
        match result {
            Ok(_) => Self::success(),
            Err(e) => Self::failure(e.to_string()),
        }
    }

    /// Text sent to `TaskLogger::report_text`.
    pub fn report_text(&self) -> String {
        match self.kind {
            OutcomeKind::Success => SUCCESS_REPORT.to_string(),
            OutcomeKind::Failure => {
                format!("Error: {}", self.reason.as_deref().unwrap_or_default())
            }
        }
    }
}
