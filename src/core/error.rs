use std::fmt;

use thiserror::Error;

use crate::command::goal::{GoalAction, GoalField};

/// Role a goal reference plays when it is looked up in the scene
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SceneRole {
    TargetObject,
    Destination,
}

impl fmt::Display for SceneRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SceneRole::TargetObject => f.write_str("target object"),
            SceneRole::Destination => f.write_str("destination"),
        }
    }
}

/// Terminal planning failures
///
/// Gaps in action synthesis and conflict-resolution faults are not part of
/// this enum: the planner absorbs them and reports them in `PlanOutcome`.
#[derive(Error, Debug)]
pub enum PlanError {
    #[error("{role} '{name}' not found in scene")]
    NotFound { role: SceneRole, name: String },

    #[error("'{action}' goal requires a {field}")]
    MissingField { action: GoalAction, field: GoalField },

    #[error("No executable plan could be produced")]
    NoPlan,

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerdeError(#[from] serde_json::Error),

    #[error("Config parse error: {0}")]
    TomlError(#[from] toml::de::Error),
}

impl PlanError {
    pub fn not_found(role: SceneRole, name: impl Into<String>) -> Self {
        Self::NotFound {
            role,
            name: name.into(),
        }
    }

    pub fn missing_field(action: GoalAction, field: GoalField) -> Self {
        Self::MissingField { action, field }
    }
}

pub type Result<T> = std::result::Result<T, PlanError>;
