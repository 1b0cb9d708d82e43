//! Core type definitions used throughout the codebase

use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of an atomic robot action
///
/// Closed set: decomposition, synthesis and conflict resolution all match
/// on it exhaustively.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionType {
    Navigate,
    Grasp,
    Place,
    Move,
    Rotate,
}

impl ActionType {
    pub const ALL: [ActionType; 5] = [
        ActionType::Navigate,
        ActionType::Grasp,
        ActionType::Place,
        ActionType::Move,
        ActionType::Rotate,
    ];

    /// Whether this action holds the target object while it runs
    ///
    /// Two holding actions on the same target compete for it.
    pub fn holds_target(&self) -> bool {
        match self {
            ActionType::Grasp | ActionType::Move => true,
            ActionType::Navigate | ActionType::Place | ActionType::Rotate => false,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ActionType::Navigate => "navigate",
            ActionType::Grasp => "grasp",
            ActionType::Place => "place",
            ActionType::Move => "move",
            ActionType::Rotate => "rotate",
        }
    }
}

impl fmt::Display for ActionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Why the robot is navigating
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NavigationPurpose {
    /// Approach the object that will be manipulated
    ReachObject,
    /// Approach the place the object is headed for
    ReachDestination,
    /// Step aside so two placements do not collide
    AvoidConflict,
}

impl NavigationPurpose {
    pub fn as_str(&self) -> &'static str {
        match self {
            NavigationPurpose::ReachObject => "reach_object",
            NavigationPurpose::ReachDestination => "reach_destination",
            NavigationPurpose::AvoidConflict => "avoid_conflict",
        }
    }
}

impl fmt::Display for NavigationPurpose {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Direction of a rotation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RotationDirection {
    Clockwise,
    Counterclockwise,
}

impl RotationDirection {
    /// Positive angles turn clockwise; zero and negative angles counterclockwise.
    pub fn from_angle(angle: f64) -> Self {
        if angle > 0.0 {
            RotationDirection::Clockwise
        } else {
            RotationDirection::Counterclockwise
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RotationDirection::Clockwise => "clockwise",
            RotationDirection::Counterclockwise => "counterclockwise",
        }
    }
}

impl fmt::Display for RotationDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_direction_from_angle() {
        assert_eq!(RotationDirection::from_angle(90.0), RotationDirection::Clockwise);
        assert_eq!(RotationDirection::from_angle(-45.0), RotationDirection::Counterclockwise);
        assert_eq!(RotationDirection::from_angle(0.0), RotationDirection::Counterclockwise);
    }

    #[test]
    fn test_holding_actions() {
        let holding: Vec<_> = ActionType::ALL.iter().filter(|a| a.holds_target()).collect();
        assert_eq!(holding, vec![&ActionType::Grasp, &ActionType::Move]);
    }

    #[test]
    fn test_action_type_serialization() {
        let json = serde_json::to_string(&ActionType::Navigate).unwrap();
        assert_eq!(json, "\"navigate\"");
        let purpose: NavigationPurpose = serde_json::from_str("\"avoid_conflict\"").unwrap();
        assert_eq!(purpose, NavigationPurpose::AvoidConflict);
    }
}
