//! Planner configuration with documented defaults
//!
//! Every constant the planning pipeline relies on lives here. All fields are
//! optional in a TOML file; missing ones keep their defaults.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::core::error::{PlanError, Result};
use crate::core::types::ActionType;

/// Static priority of each action type
///
/// Used by conflict resolution: when two actions compete for the same object,
/// a strictly higher priority pulls the later, lower-priority one in behind it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ActionPriorities {
    pub navigate: u8,
    pub grasp: u8,
    pub place: u8,
    #[serde(rename = "move")]
    pub move_: u8,
    pub rotate: u8,
}

impl Default for ActionPriorities {
    fn default() -> Self {
        Self {
            navigate: 1,
            grasp: 2,
            place: 3,
            move_: 2,
            rotate: 2,
        }
    }
}

impl ActionPriorities {
    pub fn get(&self, action: ActionType) -> u8 {
        match action {
            ActionType::Navigate => self.navigate,
            ActionType::Grasp => self.grasp,
            ActionType::Place => self.place,
            ActionType::Move => self.move_,
            ActionType::Rotate => self.rotate,
        }
    }
}

/// Configuration for the planning pipeline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlannerConfig {
    /// Conflict-resolution priority per action type
    pub priorities: ActionPriorities,

    /// Object category that always answers a destination lookup
    ///
    /// Any object of this type wins over name matching when resolving a
    /// destination, regardless of the destination text.
    pub cabinet_category: String,

    /// Name fragments treated as synonyms of the cabinet category
    ///
    /// Used both when matching destination names and when deciding whether a
    /// destination refers to a cabinet during validation.
    pub cabinet_keywords: Vec<String>,

    /// Angle used for rotate goals that do not specify one (degrees)
    pub default_rotation_angle: f64,

    /// Target of the detour inserted between two placements at the same spot
    pub safe_position: String,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            priorities: ActionPriorities::default(),
            cabinet_category: "cabinet".into(),
            cabinet_keywords: vec!["柜".into(), "橱柜".into(), "cabinet".into()],
            default_rotation_angle: 90.0,
            safe_position: "safe_position".into(),
        }
    }
}

impl PlannerConfig {
    /// Create a new config with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate configuration for internal consistency
    pub fn validate(&self) -> std::result::Result<(), String> {
        if self.cabinet_category.trim().is_empty() {
            return Err("cabinet_category must not be empty".into());
        }

        if self.cabinet_keywords.iter().any(|k| k.is_empty()) {
            // An empty keyword would match every object name
            return Err("cabinet_keywords must not contain empty entries".into());
        }

        if self.safe_position.trim().is_empty() {
            return Err("safe_position must not be empty".into());
        }

        if !self.default_rotation_angle.is_finite() {
            return Err(format!(
                "default_rotation_angle ({}) must be finite",
                self.default_rotation_angle
            ));
        }

        if let Some(action) = ActionType::ALL
            .iter()
            .find(|a| self.priorities.get(**a) == 0)
        {
            return Err(format!("priority for '{}' must be at least 1", action));
        }

        Ok(())
    }

    /// Whether `text` mentions the cabinet category through one of its synonyms
    pub fn mentions_cabinet(&self, text: &str) -> bool {
        self.cabinet_keywords.iter().any(|k| text.contains(k.as_str()))
    }
}

/// Parse a planner config from TOML text and validate it
pub fn parse_config(content: &str) -> Result<PlannerConfig> {
    let config: PlannerConfig = toml::from_str(content)?;
    config.validate().map_err(PlanError::Config)?;
    Ok(config)
}

/// Load a planner config from a TOML file
pub fn load_config(path: &Path) -> Result<PlannerConfig> {
    let content = fs::read_to_string(path)?;
    let config = parse_config(&content)?;
    tracing::debug!("Loaded planner config from {}", path.display());
    Ok(config)
}

// === GLOBAL CONFIG ACCESS ===

use std::sync::OnceLock;

static CONFIG: OnceLock<PlannerConfig> = OnceLock::new();

/// Get the global planner config (initializes with defaults if not set)
pub fn config() -> &'static PlannerConfig {
    CONFIG.get_or_init(PlannerConfig::default)
}

/// Set the global planner config (can only be called once)
///
/// Returns Err if config was already set.
pub fn set_config(config: PlannerConfig) -> std::result::Result<(), PlannerConfig> {
    CONFIG.set(config)
}
