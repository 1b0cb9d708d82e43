//! Action synthesis - sub-tasks expanded into parameterized atomic actions
//!
//! Lookups here are exact-name only. A sub-task whose object cannot be found
//! produces no actions; the planner logs the gap and moves on.

use thiserror::Error;

use crate::core::types::ActionType;
use crate::planning::action::AtomicAction;
use crate::planning::subtask::SubTask;
use crate::scene::model::{SceneModel, SceneObject};

/// Expands a location into the waypoints that lead there
///
/// Real path planning plugs in here; the synthesizer emits one action per
/// waypoint, in order.
pub trait WaypointPlanner: Send + Sync {
    fn waypoints(&self, location: &str) -> Vec<String>;
}

/// Goes straight to the location: a single waypoint
#[derive(Debug, Clone, Copy, Default)]
pub struct DirectWaypoints;

impl WaypointPlanner for DirectWaypoints {
    fn waypoints(&self, location: &str) -> Vec<String> {
        vec![location.to_string()]
    }
}

/// A sub-task that produced no atomic actions
///
/// Never fatal on its own: the planner skips the sub-task.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SynthesisGap {
    #[error("no scene object named '{name}' for {action} step")]
    UnknownObject { action: ActionType, name: String },

    #[error("no waypoints toward '{location}' for {action} step")]
    NoRoute { action: ActionType, location: String },
}

/// Builds atomic actions for sub-tasks against one scene
pub struct ActionSynthesizer<'a> {
    scene: &'a SceneModel,
    waypoints: &'a dyn WaypointPlanner,
}

impl<'a> ActionSynthesizer<'a> {
    pub fn new(scene: &'a SceneModel, waypoints: &'a dyn WaypointPlanner) -> Self {
        Self { scene, waypoints }
    }

    pub fn synthesize(&self, sub_task: &SubTask) -> Result<Vec<AtomicAction>, SynthesisGap> {
        match sub_task {
            SubTask::Navigate { target, purpose } => {
                let obj = self.lookup(ActionType::Navigate, target)?;
                let location = navigation_location(obj);
                let route = self.route(ActionType::Navigate, location)?;
                Ok(route
                    .into_iter()
                    .map(|waypoint| AtomicAction::navigate(waypoint, *purpose))
                    .collect())
            }
            SubTask::Grasp { target } => {
                let obj = self.lookup(ActionType::Grasp, target)?;
                let force = if obj.has_flag("fragile") { "gentle" } else { "normal" };
                Ok(vec![AtomicAction::new(ActionType::Grasp, target.as_str())
                    .with_parameter("force", force)
                    .with_parameter("orientation", "default")])
            }
            SubTask::Place {
                target,
                destination,
            } => {
                self.lookup(ActionType::Place, destination)?;
                Ok(vec![AtomicAction::new(ActionType::Place, target.as_str())
                    .with_destination(destination.as_str())
                    .with_parameter("height", placement_height(destination))
                    .with_parameter("orientation", "default")
                    .with_parameter("stability", "normal")])
            }
            SubTask::Move {
                target,
                destination,
            } => {
                let route = self.route(ActionType::Move, destination)?;
                Ok(route
                    .into_iter()
                    .map(|waypoint| AtomicAction::new(ActionType::Move, target.as_str()).with_destination(waypoint))
                    .collect())
            }
            SubTask::Rotate { target, angle } => Ok(vec![AtomicAction::rotate(target.as_str(), *angle)]),
        }
    }

    fn lookup(&self, action: ActionType, name: &str) -> Result<&'a SceneObject, SynthesisGap> {
        self.scene
            .find_exact(name)
            .ok_or_else(|| SynthesisGap::UnknownObject {
                action,
                name: name.to_string(),
            })
    }

    fn route(&self, action: ActionType, location: &str) -> Result<Vec<String>, SynthesisGap> {
        let route = self.waypoints.waypoints(location);
        if route.is_empty() {
            return Err(SynthesisGap::NoRoute {
                action,
                location: location.to_string(),
            });
        }
        Ok(route)
    }
}

/// Where to drive for an object: its location, else the object itself
///
/// Typed fixtures (cabinets, counters) are usually reported without a
/// location and are addressed by name.
fn navigation_location(obj: &SceneObject) -> &str {
    obj.location
        .as_deref()
        .filter(|location| !location.is_empty())
        .unwrap_or(&obj.name)
}

fn placement_height(destination: &str) -> &'static str {
    let destination = destination.to_lowercase();
    if destination.contains("shelf") {
        "shelf_height"
    } else if destination.contains("table") {
        "table_height"
    } else {
        "default"
    }
}
