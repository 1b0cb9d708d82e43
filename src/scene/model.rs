//! Symbolic scene model
//!
//! Produced by an external perception step and only read by the planner.
//! Objects keep their observed order, which every first-match lookup
//! depends on.

use std::collections::BTreeMap;

use ahash::AHashMap;
use serde::{Deserialize, Serialize};

/// Relation used for every derived object → location fact
pub const LOCATED_AT: &str = "located_at";

/// An object observed in the scene
///
/// Names are keys within a scene but are not unique: perception may report
/// the same name twice with different locations.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SceneObject {
    pub name: String,
    /// Category tag such as "cabinet" or "counter"
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    /// Free-text spatial description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default)]
    pub attributes: BTreeMap<String, String>,
}

impl SceneObject {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn with_kind(mut self, kind: impl Into<String>) -> Self {
        self.kind = Some(kind.into());
        self
    }

    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }

    /// Whether the object has a boolean-like attribute set to a truthy value
    ///
    /// Empty strings, "false", "no", "0" and "off" count as unset.
    pub fn has_flag(&self, key: &str) -> bool {
        self.attributes.get(key).is_some_and(|value| {
            let value = value.trim().to_lowercase();
            !matches!(value.as_str(), "" | "false" | "no" | "0" | "off")
        })
    }

    pub fn is_kind(&self, kind: &str) -> bool {
        self.kind.as_deref() == Some(kind)
    }
}

/// A subject-relation-object fact about the scene
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Relationship {
    pub subject: String,
    pub relation: String,
    pub object: String,
}

/// Indexed facts about one object name
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SceneFact {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
}

/// The full scene as handed to the planner
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SceneModel {
    pub objects: Vec<SceneObject>,
    #[serde(default)]
    pub relationships: Vec<Relationship>,
    #[serde(default)]
    pub scene_graph: AHashMap<String, SceneFact>,
}

impl SceneModel {
    /// Build a scene from observed objects, deriving relationships and the fact index
    pub fn from_objects(objects: Vec<SceneObject>) -> Self {
        let mut scene = Self {
            objects,
            relationships: Vec::new(),
            scene_graph: AHashMap::new(),
        };
        scene.derive_facts();
        scene
    }

    /// Rebuild whichever derived views are missing
    ///
    /// Scenes loaded from disk may carry their own relationships and index;
    /// those are kept as given.
    pub fn with_derived_facts(mut self) -> Self {
        if self.relationships.is_empty() && self.scene_graph.is_empty() {
            self.derive_facts();
        } else if self.scene_graph.is_empty() {
            self.scene_graph = Self::index(&self.objects);
        } else if self.relationships.is_empty() {
            self.relationships = Self::located_at(&self.objects);
        }
        self
    }

    fn derive_facts(&mut self) {
        self.relationships = Self::located_at(&self.objects);
        self.scene_graph = Self::index(&self.objects);
    }

    fn located_at(objects: &[SceneObject]) -> Vec<Relationship> {
        objects
            .iter()
            .filter_map(|obj| {
                let location = obj.location.as_deref().filter(|l| !l.is_empty())?;
                Some(Relationship {
                    subject: obj.name.clone(),
                    relation: LOCATED_AT.to_string(),
                    object: location.to_string(),
                })
            })
            .collect()
    }

    fn index(objects: &[SceneObject]) -> AHashMap<String, SceneFact> {
        let mut graph: AHashMap<String, SceneFact> = AHashMap::new();
        for obj in objects {
            let fact = graph.entry(obj.name.clone()).or_default();
            if obj.location.is_some() {
                fact.location = obj.location.clone();
            }
            if obj.kind.is_some() {
                fact.kind = obj.kind.clone();
            }
        }
        graph
    }

    /// First object whose name is exactly `name`
    pub fn find_exact(&self, name: &str) -> Option<&SceneObject> {
        self.objects.iter().find(|obj| obj.name == name)
    }

    /// First object of the given category
    pub fn find_kind(&self, kind: &str) -> Option<&SceneObject> {
        self.objects.iter().find(|obj| obj.is_kind(kind))
    }

    pub fn fact(&self, name: &str) -> Option<&SceneFact> {
        self.scene_graph.get(name)
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kitchen() -> SceneModel {
        SceneModel::from_objects(vec![
            SceneObject::new("锅")
                .with_location("台面右侧")
                .with_attribute("color", "pink"),
            SceneObject::new("橱柜").with_kind("cabinet"),
            SceneObject::new("锅").with_location("燃气灶"),
        ])
    }

    #[test]
    fn test_relationships_only_for_located_objects() {
        let scene = kitchen();
        assert_eq!(scene.relationships.len(), 2);
        assert_eq!(scene.relationships[0].subject, "锅");
        assert_eq!(scene.relationships[0].relation, LOCATED_AT);
        assert_eq!(scene.relationships[0].object, "台面右侧");
    }

    #[test]
    fn test_scene_graph_keeps_latest_location() {
        let scene = kitchen();
        assert_eq!(scene.fact("锅").unwrap().location.as_deref(), Some("燃气灶"));
        assert_eq!(scene.fact("橱柜").unwrap().kind.as_deref(), Some("cabinet"));
    }

    #[test]
    fn test_find_exact_returns_first_in_scan_order() {
        let scene = kitchen();
        let pot = scene.find_exact("锅").unwrap();
        assert_eq!(pot.location.as_deref(), Some("台面右侧"));
        assert!(scene.find_exact("锅子").is_none());
    }

    #[test]
    fn test_has_flag() {
        let cup = SceneObject::new("cup")
            .with_attribute("fragile", "true")
            .with_attribute("heavy", "false");
        assert!(cup.has_flag("fragile"));
        assert!(!cup.has_flag("heavy"));
        assert!(!cup.has_flag("sharp"));
    }

    #[test]
    fn test_deserialize_derives_missing_facts() {
        let json = r#"{
            "objects": [
                {"name": "cup", "location": "table", "attributes": {"fragile": "yes"}},
                {"name": "cabinet", "type": "cabinet"}
            ]
        }"#;
        let scene: SceneModel = serde_json::from_str(json).unwrap();
        let scene = scene.with_derived_facts();

        assert_eq!(scene.objects[1].kind.as_deref(), Some("cabinet"));
        assert_eq!(scene.relationships.len(), 1);
        assert_eq!(scene.fact("cup").unwrap().location.as_deref(), Some("table"));
    }
}
