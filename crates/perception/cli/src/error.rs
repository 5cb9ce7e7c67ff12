//! Error types for scenario replay

use perception_types::{ConfigError, EntityId};
use thiserror::Error;

pub type ScenarioResult<T> = Result<T, ScenarioError>;

#[derive(Debug, Error)]
pub enum ScenarioError {
    #[error("Failed to read scenario: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid scenario JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("Source entity not found: {0}")]
    UnknownSource(EntityId),

    #[error("Duplicate entity id: {0}")]
    DuplicateEntity(EntityId),

    #[error("Roll override for {0} has no roll id")]
    MissingRollId(EntityId),

    #[error("Roll overrides for {0} name more than one roll id")]
    ConflictingRollIds(EntityId),
}
