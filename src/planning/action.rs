//! Atomic actions - the planner's output, consumed by motion execution

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::core::types::{ActionType, NavigationPurpose, RotationDirection};

/// Smallest directly executable robot action
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AtomicAction {
    #[serde(rename = "type")]
    pub action: ActionType,
    pub target: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub destination: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub purpose: Option<NavigationPurpose>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub parameters: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub angle: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub direction: Option<RotationDirection>,
}

impl AtomicAction {
    pub fn new(action: ActionType, target: impl Into<String>) -> Self {
        Self {
            action,
            target: target.into(),
            destination: None,
            purpose: None,
            parameters: BTreeMap::new(),
            angle: None,
            direction: None,
        }
    }

    pub fn navigate(target: impl Into<String>, purpose: NavigationPurpose) -> Self {
        Self::new(ActionType::Navigate, target).with_purpose(purpose)
    }

    pub fn rotate(target: impl Into<String>, angle: f64) -> Self {
        let mut action = Self::new(ActionType::Rotate, target);
        action.angle = Some(angle);
        action.direction = Some(RotationDirection::from_angle(angle));
        action
    }

    pub fn with_destination(mut self, destination: impl Into<String>) -> Self {
        self.destination = Some(destination.into());
        self
    }

    pub fn with_purpose(mut self, purpose: NavigationPurpose) -> Self {
        self.purpose = Some(purpose);
        self
    }

    pub fn with_parameter(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.parameters.insert(key.into(), value.into());
        self
    }

    pub fn parameter(&self, key: &str) -> Option<&str> {
        self.parameters.get(key).map(String::as_str)
    }

    /// Whether this is the detour inserted to keep two placements apart
    pub fn is_detour(&self, safe_position: &str) -> bool {
        self.action == ActionType::Navigate
            && self.purpose == Some(NavigationPurpose::AvoidConflict)
            && self.target == safe_position
    }
}

impl fmt::Display for AtomicAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.action, self.target)?;
        if let Some(destination) = &self.destination {
            write!(f, " -> {}", destination)?;
        }
        if let Some(purpose) = self.purpose {
            write!(f, " [{}]", purpose)?;
        }
        if let (Some(angle), Some(direction)) = (self.angle, self.direction) {
            write!(f, " {}° {}", angle, direction)?;
        }
        if !self.parameters.is_empty() {
            let params: Vec<String> = self
                .parameters
                .iter()
                .map(|(k, v)| format!("{}={}", k, v))
                .collect();
            write!(f, " ({})", params.join(", "))?;
        }
        Ok(())
    }
}
