//! Scene input: the symbolic model of what the robot observed

pub mod description;
pub mod model;
pub mod source;

pub use description::{PatternSceneParser, SceneDescriptionFile, FIXTURE_CATEGORIES};
pub use model::{Relationship, SceneFact, SceneModel, SceneObject, LOCATED_AT};
pub use source::{parse_scene, JsonSceneFile, SceneSource};
