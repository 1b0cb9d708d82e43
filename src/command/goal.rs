//! Structured task goals handed to the planner

use std::fmt;

use serde::{Deserialize, Serialize};

/// Verb of a task goal
///
/// Text that names none of the known verbs, including the empty string,
/// becomes `Unrecognized`; the decomposer treats that as "just go there".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum GoalAction {
    Place,
    Move,
    Grasp,
    Rotate,
    #[default]
    Unrecognized,
}

impl GoalAction {
    pub fn parse(text: &str) -> Self {
        match text.trim().to_lowercase().as_str() {
            "place" => GoalAction::Place,
            "move" => GoalAction::Move,
            "grasp" => GoalAction::Grasp,
            "rotate" => GoalAction::Rotate,
            _ => GoalAction::Unrecognized,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            GoalAction::Place => "place",
            GoalAction::Move => "move",
            GoalAction::Grasp => "grasp",
            GoalAction::Rotate => "rotate",
            GoalAction::Unrecognized => "",
        }
    }
}

impl From<String> for GoalAction {
    fn from(text: String) -> Self {
        GoalAction::parse(&text)
    }
}

impl From<GoalAction> for String {
    fn from(action: GoalAction) -> Self {
        action.as_str().to_string()
    }
}

impl fmt::Display for GoalAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GoalAction::Unrecognized => f.write_str("navigate"),
            other => f.write_str(other.as_str()),
        }
    }
}

/// A goal field that an action may require
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GoalField {
    TargetObject,
    Destination,
}

impl fmt::Display for GoalField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GoalField::TargetObject => f.write_str("target object"),
            GoalField::Destination => f.write_str("destination"),
        }
    }
}

/// What the robot has been asked to do
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TaskGoal {
    pub action: GoalAction,
    pub target_object: String,
    pub destination: String,
    /// Rotation in degrees; only meaningful for rotate goals
    #[serde(skip_serializing_if = "Option::is_none")]
    pub angle: Option<f64>,
    /// Carried through from instruction parsing; the planner does not read them yet
    pub constraints: Vec<String>,
}

impl TaskGoal {
    pub fn new(action: GoalAction, target_object: impl Into<String>) -> Self {
        Self {
            action,
            target_object: target_object.into(),
            ..Self::default()
        }
    }

    pub fn place(target_object: impl Into<String>, destination: impl Into<String>) -> Self {
        Self::new(GoalAction::Place, target_object).with_destination(destination)
    }

    pub fn move_to(target_object: impl Into<String>, destination: impl Into<String>) -> Self {
        Self::new(GoalAction::Move, target_object).with_destination(destination)
    }

    pub fn grasp(target_object: impl Into<String>) -> Self {
        Self::new(GoalAction::Grasp, target_object)
    }

    pub fn rotate(target_object: impl Into<String>, angle: Option<f64>) -> Self {
        Self {
            angle,
            ..Self::new(GoalAction::Rotate, target_object)
        }
    }

    pub fn with_destination(mut self, destination: impl Into<String>) -> Self {
        self.destination = destination.into();
        self
    }

    /// A goal with every field empty, produced when an instruction is not understood
    pub fn unrecognized() -> Self {
        Self::default()
    }
}
