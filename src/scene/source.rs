//! Scene sources - where the planner's scene model comes from
//!
//! Perception itself lives outside this crate. A source is called once per
//! planning request and either returns a complete scene or fails; the planner
//! never retries it or caches its results.

use std::fs;
use std::path::{Path, PathBuf};

use crate::core::error::Result;
use crate::scene::model::SceneModel;

/// Synchronous contract for anything that can report the current scene
pub trait SceneSource {
    fn observe(&self) -> Result<SceneModel>;
}

/// A scene stored as JSON on disk
#[derive(Debug, Clone)]
pub struct JsonSceneFile {
    path: PathBuf,
}

impl JsonSceneFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SceneSource for JsonSceneFile {
    fn observe(&self) -> Result<SceneModel> {
        let content = fs::read_to_string(self.path())?;
        let scene = parse_scene(&content)?;
        tracing::debug!(
            "Loaded {} scene objects from {}",
            scene.objects.len(),
            self.path().display()
        );
        Ok(scene)
    }
}

impl SceneSource for SceneModel {
    fn observe(&self) -> Result<SceneModel> {
        Ok(self.clone())
    }
}

/// Parse a JSON scene and fill in any derived facts it lacks
pub fn parse_scene(json: &str) -> Result<SceneModel> {
    let scene: SceneModel = serde_json::from_str(json)?;
    Ok(scene.with_derived_facts())
}
