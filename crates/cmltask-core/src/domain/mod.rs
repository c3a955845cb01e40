//! Domain model (configuration, artifacts, ids, outcomes, errors).

pub mod artifact;
pub mod config;
pub mod errors;
pub mod ids;
pub mod outcome;

pub use self::artifact::{ArtifactValue, Artifacts};
pub use self::config::{EffectiveConfig, FileConfig, StaticConfig};
pub use self::errors::{ConfigError, PublishError, TaskError, TrackerError};
pub use self::ids::TaskId;
pub use self::outcome::{Outcome, OutcomeKind, SUCCESS_REPORT};
