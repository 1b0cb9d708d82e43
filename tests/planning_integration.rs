//! End-to-end planning: scene in, goal in, atomic actions out

use std::io::Write as _;

use tempfile::NamedTempFile;

use task_planner::command::{GoalAction, PatternInstructionParser, ShortestNameMatch, TaskGoal};
use task_planner::core::{ActionType, NavigationPurpose, PlanError, PlannerConfig, RotationDirection, SceneRole};
use task_planner::planning::{AtomicAction, Planner};
use task_planner::scene::{parse_scene, JsonSceneFile, SceneDescriptionFile, SceneModel, SceneObject, SceneSource};

fn living_room() -> SceneModel {
    SceneModel::from_objects(vec![
        SceneObject::new("cup")
            .with_kind("cup")
            .with_location("table")
            .with_attribute("fragile", "true"),
        SceneObject::new("book").with_kind("book").with_location("shelf"),
        SceneObject::new("table").with_kind("table"),
        SceneObject::new("shelf").with_kind("shelf"),
    ])
}

fn kitchen_zh() -> SceneModel {
    SceneModel::from_objects(vec![
        SceneObject::new("红色杯子").with_location("台面"),
        SceneObject::new("台面").with_kind("counter"),
        SceneObject::new("橱柜").with_kind("cabinet"),
    ])
}

fn planner() -> Planner {
    Planner::with_config(PlannerConfig::default())
}

fn kinds(actions: &[AtomicAction]) -> Vec<ActionType> {
    actions.iter().map(|a| a.action).collect()
}

#[test]
fn test_place_cup_on_shelf() {
    let actions = planner()
        .plan(&TaskGoal::place("cup", "shelf"), &living_room())
        .unwrap();

    assert_eq!(
        kinds(&actions),
        vec![ActionType::Navigate, ActionType::Grasp, ActionType::Navigate, ActionType::Place]
    );
    assert_eq!(actions[0].target, "table");
    assert_eq!(actions[0].purpose, Some(NavigationPurpose::ReachObject));
    assert_eq!(actions[1].parameter("force"), Some("gentle"));
    assert_eq!(actions[2].target, "shelf");
    assert_eq!(actions[3].destination.as_deref(), Some("shelf"));
    assert_eq!(actions[3].parameter("height"), Some("shelf_height"));
}

#[test]
fn test_grasp_sturdy_object_uses_normal_force() {
    let actions = planner().plan(&TaskGoal::grasp("book"), &living_room()).unwrap();

    assert_eq!(kinds(&actions), vec![ActionType::Navigate, ActionType::Grasp]);
    assert_eq!(actions[0].target, "shelf");
    assert_eq!(actions[1].parameter("force"), Some("normal"));
}

#[test]
fn test_rotate_uses_default_angle() {
    let actions = planner().plan(&TaskGoal::rotate("cup", None), &living_room()).unwrap();

    assert_eq!(kinds(&actions), vec![ActionType::Navigate, ActionType::Rotate]);
    assert_eq!(actions[1].angle, Some(90.0));
    assert_eq!(actions[1].direction, Some(RotationDirection::Clockwise));
}

#[test]
fn test_rotate_negative_angle_is_counterclockwise() {
    let actions = planner()
        .plan(&TaskGoal::rotate("cup", Some(-45.0)), &living_room())
        .unwrap();

    assert_eq!(actions[1].angle, Some(-45.0));
    assert_eq!(actions[1].direction, Some(RotationDirection::Counterclockwise));
}

#[test]
fn test_unknown_target_fails_before_planning() {
    let err = planner().plan(&TaskGoal::grasp("knife"), &living_room()).unwrap_err();

    assert!(matches!(err, PlanError::NotFound { role: SceneRole::TargetObject, ref name } if name == "knife"));
    assert_eq!(err.to_string(), "target object 'knife' not found in scene");
}

#[test]
fn test_unknown_destination_fails() {
    let err = planner()
        .plan(&TaskGoal::place("cup", "garage"), &living_room())
        .unwrap_err();

    assert!(matches!(err, PlanError::NotFound { role: SceneRole::Destination, .. }));
}

#[test]
fn test_configured_rotation_angle() {
    let config = PlannerConfig {
        default_rotation_angle: 180.0,
        ..PlannerConfig::default()
    };
    let actions = Planner::with_config(config)
        .plan(&TaskGoal::rotate("book", None), &living_room())
        .unwrap();

    assert_eq!(actions[1].angle, Some(180.0));
}

#[test]
fn test_chinese_instruction_in_kitchen() {
    let scene = kitchen_zh();
    let outcome = planner()
        .process_instruction(&scene, &PatternInstructionParser, "把红色杯子放进橱柜里")
        .unwrap();

    let targets: Vec<&str> = outcome.actions.iter().map(|a| a.target.as_str()).collect();
    assert_eq!(targets, vec!["台面", "红色杯子", "橱柜", "红色杯子"]);
    assert_eq!(outcome.actions[3].destination.as_deref(), Some("橱柜"));
    assert!(outcome.is_complete());
}

#[test]
fn test_shortest_name_matcher_prefers_exact_object() {
    let scene = SceneModel::from_objects(vec![
        SceneObject::new("cupboard").with_location("hall"),
        SceneObject::new("cup").with_location("table"),
        SceneObject::new("table"),
        SceneObject::new("hall"),
    ]);

    let default_plan = planner().plan(&TaskGoal::grasp("cup"), &scene).unwrap();
    assert_eq!(default_plan[0].target, "hall");

    let shortest = planner()
        .with_matcher(ShortestNameMatch)
        .plan(&TaskGoal::grasp("cup"), &scene)
        .unwrap();
    assert_eq!(shortest[0].target, "table");
}

#[test]
fn test_unrecognized_goal_only_navigates() {
    let goal = TaskGoal::new(GoalAction::Unrecognized, "cup");
    let actions = planner().plan(&goal, &living_room()).unwrap();

    assert_eq!(kinds(&actions), vec![ActionType::Navigate]);
    assert_eq!(actions[0].target, "table");
}

#[test]
fn test_scene_file_source() {
    let mut file = NamedTempFile::new().unwrap();
    write!(
        file,
        r#"{{"objects": [
            {{"name": "cup", "type": "cup", "location": "table", "attributes": {{"fragile": "yes"}}}},
            {{"name": "table", "type": "table"}},
            {{"name": "kitchen cabinet", "type": "cabinet"}}
        ]}}"#
    )
    .unwrap();
    file.flush().unwrap();

    let scene = JsonSceneFile::new(file.path()).observe().unwrap();
    assert_eq!(scene.objects.len(), 3);
    assert_eq!(scene.fact("cup").and_then(|f| f.location.as_deref()), Some("table"));

    let actions = planner().plan(&TaskGoal::place("cup", "cabinet"), &scene).unwrap();
    assert_eq!(actions[2].target, "kitchen cabinet");
    assert_eq!(actions[3].destination.as_deref(), Some("kitchen cabinet"));
}

#[test]
fn test_text_description_source() {
    let mut file = NamedTempFile::new().unwrap();
    write!(file, "红色杯子在台面。橱柜在水槽下面。").unwrap();
    file.flush().unwrap();

    let scene = SceneDescriptionFile::new(file.path()).observe().unwrap();
    let names: Vec<&str> = scene.objects.iter().map(|o| o.name.as_str()).collect();
    assert_eq!(names, vec!["红色杯子", "橱柜", "台面"]);

    let outcome = planner()
        .process_instruction(
            &SceneDescriptionFile::new(file.path()),
            &PatternInstructionParser,
            "把红色杯子放进橱柜",
        )
        .unwrap();
    let targets: Vec<&str> = outcome.actions.iter().map(|a| a.target.as_str()).collect();
    assert_eq!(targets, vec!["台面", "红色杯子", "水槽下面", "红色杯子"]);
    assert_eq!(outcome.actions[3].destination.as_deref(), Some("橱柜"));
}

#[test]
fn test_missing_scene_file_is_io_error() {
    let err = JsonSceneFile::new("/nonexistent/scene.json").observe().unwrap_err();
    assert!(matches!(err, PlanError::IoError(_)));
}

#[test]
fn test_malformed_scene_is_serde_error() {
    assert!(matches!(parse_scene("{\"objects\": 3}"), Err(PlanError::SerdeError(_))));
}

#[test]
fn test_goal_from_json() {
    let goal: TaskGoal =
        serde_json::from_str(r#"{"action": "move", "target_object": "book", "destination": "table"}"#).unwrap();
    assert_eq!(goal.action, GoalAction::Move);

    let actions = planner().plan(&goal, &living_room()).unwrap();
    assert_eq!(
        kinds(&actions),
        vec![ActionType::Navigate, ActionType::Grasp, ActionType::Navigate, ActionType::Move]
    );
    assert_eq!(actions[3].destination.as_deref(), Some("table"));
}
