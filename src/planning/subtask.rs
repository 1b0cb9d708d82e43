//! Task decomposition - goal verbs expanded into ordered sub-tasks

use std::fmt;

use crate::command::goal::{GoalAction, GoalField, TaskGoal};
use crate::command::resolver::GoalResolver;
use crate::core::error::{PlanError, Result};
use crate::core::types::{ActionType, NavigationPurpose};

/// Intermediate step between a goal and atomic actions
///
/// Lives only for the duration of one planning call.
#[derive(Debug, Clone, PartialEq)]
pub enum SubTask {
    Navigate {
        target: String,
        purpose: NavigationPurpose,
    },
    Grasp {
        target: String,
    },
    Place {
        target: String,
        destination: String,
    },
    Move {
        target: String,
        destination: String,
    },
    Rotate {
        target: String,
        angle: f64,
    },
}

impl SubTask {
    pub fn action_type(&self) -> ActionType {
        match self {
            SubTask::Navigate { .. } => ActionType::Navigate,
            SubTask::Grasp { .. } => ActionType::Grasp,
            SubTask::Place { .. } => ActionType::Place,
            SubTask::Move { .. } => ActionType::Move,
            SubTask::Rotate { .. } => ActionType::Rotate,
        }
    }

    pub fn target(&self) -> &str {
        match self {
            SubTask::Navigate { target, .. }
            | SubTask::Grasp { target }
            | SubTask::Place { target, .. }
            | SubTask::Move { target, .. }
            | SubTask::Rotate { target, .. } => target,
        }
    }
}

impl fmt::Display for SubTask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SubTask::Navigate { target, purpose } => write!(f, "navigate to '{}' ({})", target, purpose),
            SubTask::Grasp { target } => write!(f, "grasp '{}'", target),
            SubTask::Place { target, destination } => write!(f, "place '{}' at '{}'", target, destination),
            SubTask::Move { target, destination } => write!(f, "move '{}' to '{}'", target, destination),
            SubTask::Rotate { target, angle } => write!(f, "rotate '{}' by {}", target, angle),
        }
    }
}

/// Expand a goal into its ordered sub-tasks
///
/// | action       | sub-tasks                                   |
/// |--------------|---------------------------------------------|
/// | place        | navigate, grasp, navigate, place            |
/// | move         | navigate, grasp, navigate, move             |
/// | grasp        | navigate, grasp                             |
/// | rotate       | navigate, rotate                            |
/// | unrecognized | navigate                                    |
///
/// Object and destination references go through the resolver; when a lookup
/// fails the literal text from the goal is used instead.
pub fn decompose(goal: &TaskGoal, resolver: &GoalResolver<'_>) -> Result<Vec<SubTask>> {
    let action = goal.action;
    let target = goal.target_object.as_str();

    require(action, GoalField::TargetObject, target)?;
    if matches!(action, GoalAction::Place | GoalAction::Move) {
        require(action, GoalField::Destination, &goal.destination)?;
    }

    let reach_object = SubTask::Navigate {
        target: match resolver.resolve_object_location(target) {
            Some(location) => location.to_string(),
            None => {
                tracing::warn!("No location found for target object '{}'", target);
                target.to_string()
            }
        },
        purpose: NavigationPurpose::ReachObject,
    };

    let sub_tasks = match action {
        GoalAction::Place | GoalAction::Move => {
            let destination = resolve_destination(goal, resolver);
            let last = if action == GoalAction::Place {
                SubTask::Place {
                    target: target.to_string(),
                    destination: destination.clone(),
                }
            } else {
                SubTask::Move {
                    target: target.to_string(),
                    destination: destination.clone(),
                }
            };
            vec![
                reach_object,
                SubTask::Grasp {
                    target: target.to_string(),
                },
                SubTask::Navigate {
                    target: destination,
                    purpose: NavigationPurpose::ReachDestination,
                },
                last,
            ]
        }
        GoalAction::Grasp => vec![
            reach_object,
            SubTask::Grasp {
                target: target.to_string(),
            },
        ],
        GoalAction::Rotate => vec![
            reach_object,
            SubTask::Rotate {
                target: target.to_string(),
                angle: goal
                    .angle
                    .unwrap_or(resolver.config().default_rotation_angle),
            },
        ],
        GoalAction::Unrecognized => vec![reach_object],
    };

    tracing::debug!("Decomposed '{}' goal into {} sub-tasks", action, sub_tasks.len());
    Ok(sub_tasks)
}

fn require(action: GoalAction, field: GoalField, value: &str) -> Result<()> {
    if value.is_empty() {
        return Err(PlanError::missing_field(action, field));
    }
    Ok(())
}

fn resolve_destination(goal: &TaskGoal, resolver: &GoalResolver<'_>) -> String {
    match resolver.resolve_destination_name(&goal.destination) {
        Some(name) => name.to_string(),
        None => {
            tracing::warn!("No scene object found for destination '{}'", goal.destination);
            goal.destination.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::resolver::FirstSubstringMatch;
    use crate::core::config::PlannerConfig;
    use crate::scene::model::{SceneModel, SceneObject};

    fn kitchen() -> SceneModel {
        SceneModel::from_objects(vec![
            SceneObject::new("cup").with_location("counter"),
            SceneObject::new("counter").with_kind("counter"),
            SceneObject::new("kitchen cabinet").with_kind("cabinet"),
        ])
    }

    fn run(goal: &TaskGoal, scene: &SceneModel) -> Result<Vec<SubTask>> {
        let config = PlannerConfig::default();
        let resolver = GoalResolver::new(scene, &config, &FirstSubstringMatch);
        decompose(goal, &resolver)
    }

    fn kinds(tasks: &[SubTask]) -> Vec<ActionType> {
        tasks.iter().map(SubTask::action_type).collect()
    }

    #[test]
    fn test_place_decomposes_into_four_steps() {
        let tasks = run(&TaskGoal::place("cup", "cabinet"), &kitchen()).unwrap();
        assert_eq!(
            kinds(&tasks),
            vec![ActionType::Navigate, ActionType::Grasp, ActionType::Navigate, ActionType::Place]
        );
        assert_eq!(
            tasks[0],
            SubTask::Navigate {
                target: "counter".into(),
                purpose: NavigationPurpose::ReachObject
            }
        );
        assert_eq!(
            tasks[3],
            SubTask::Place {
                target: "cup".into(),
                destination: "kitchen cabinet".into()
            }
        );
    }

    #[test]
    fn test_move_ends_with_move() {
        let tasks = run(&TaskGoal::move_to("cup", "cabinet"), &kitchen()).unwrap();
        assert_eq!(tasks.len(), 4);
        assert_eq!(tasks[3].action_type(), ActionType::Move);
        assert_eq!(tasks[2].target(), "kitchen cabinet");
    }

    #[test]
    fn test_grasp_decomposes_into_two_steps() {
        let tasks = run(&TaskGoal::grasp("cup"), &kitchen()).unwrap();
        assert_eq!(kinds(&tasks), vec![ActionType::Navigate, ActionType::Grasp]);
    }

    #[test]
    fn test_rotate_uses_default_angle() {
        let tasks = run(&TaskGoal::rotate("cup", None), &kitchen()).unwrap();
        assert_eq!(
            tasks[1],
            SubTask::Rotate {
                target: "cup".into(),
                angle: 90.0
            }
        );

        let tasks = run(&TaskGoal::rotate("cup", Some(-45.0)), &kitchen()).unwrap();
        assert_eq!(
            tasks[1],
            SubTask::Rotate {
                target: "cup".into(),
                angle: -45.0
            }
        );
    }

    #[test]
    fn test_unrecognized_only_navigates() {
        let goal = TaskGoal::new(GoalAction::Unrecognized, "cup");
        let tasks = run(&goal, &kitchen()).unwrap();
        assert_eq!(kinds(&tasks), vec![ActionType::Navigate]);
    }

    #[test]
    fn test_unresolved_references_fall_back_to_literals() {
        let scene = SceneModel::from_objects(vec![SceneObject::new("plate")]);
        let tasks = run(&TaskGoal::place("plate", "sink"), &scene).unwrap();
        assert_eq!(tasks[0].target(), "plate");
        assert_eq!(tasks[2].target(), "sink");
    }

    #[test]
    fn test_missing_destination() {
        let err = run(&TaskGoal::place("cup", ""), &kitchen()).unwrap_err();
        assert!(matches!(
            err,
            PlanError::MissingField {
                action: GoalAction::Place,
                field: GoalField::Destination
            }
        ));
    }

    #[test]
    fn test_missing_target() {
        let err = run(&TaskGoal::unrecognized(), &kitchen()).unwrap_err();
        assert!(matches!(
            err,
            PlanError::MissingField {
                field: GoalField::TargetObject,
                ..
            }
        ));
    }

    #[test]
    fn test_missing_target_for_every_verb() {
        let goals = [
            TaskGoal::grasp(""),
            TaskGoal::rotate("", Some(30.0)),
            TaskGoal::move_to("", "cabinet"),
            TaskGoal::place("", "cabinet"),
        ];

        for goal in &goals {
            let err = run(goal, &kitchen()).unwrap_err();
            assert!(
                matches!(
                    err,
                    PlanError::MissingField {
                        field: GoalField::TargetObject,
                        ..
                    }
                ),
                "{:?} gave {:?}",
                goal.action,
                err
            );
        }
    }

    #[test]
    fn test_target_checked_before_destination() {
        let err = run(&TaskGoal::new(GoalAction::Move, ""), &kitchen()).unwrap_err();
        assert_eq!(err.to_string(), "'move' goal requires a target object");
    }
}
