//! Scene descriptions - perception output in prose, turned into a scene model
//!
//! A vision model describes the scene in sentences such as "锅在台面右侧".
//! The pattern parser extracts objects, their locations and a few visual
//! attributes from that text, then adds the kitchen fixtures it mentions.
//! It never fails: text it does not recognize contributes no objects.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use regex::Regex;

use crate::core::error::Result;
use crate::scene::model::{SceneModel, SceneObject};
use crate::scene::source::SceneSource;

/// "X在Y", "Y上有X" and "X是Y" phrasings, each within one clause
static RE_LOCATED: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"([^，。]+)(?:在|位于|上面|里面|旁边)([^，。]+)",
        r"([^，。]+)(?:上|里|中|旁)(?:有|放置着|放着)([^，。]+)",
        r"([^，。]+)(?:是|为)([^，。]+)",
    ]
    .iter()
    .map(|pattern| Regex::new(pattern).unwrap())
    .collect()
});

/// (keyword, attribute, value); later entries overwrite earlier ones
const ATTRIBUTE_KEYWORDS: &[(&str, &str, &str)] = &[
    ("白色", "color", "white"),
    ("粉色", "color", "pink"),
    ("黑色", "color", "black"),
    ("木质", "material", "wood"),
    ("光滑", "texture", "smooth"),
];

/// Cookware gets a line-based pass of its own: descriptions mention it in
/// phrasings the clause patterns miss.
const POT: &str = "锅";

/// First match wins
const POT_COLORS: &[(&str, &str)] = &[("粉色", "pink"), ("白色", "white"), ("黑色", "black")];

/// First match wins
const POT_LOCATIONS: &[(&str, &str)] = &[
    ("右侧", "台面右侧"),
    ("左侧", "台面左侧"),
    ("台面", "台面"),
    ("燃气灶", "燃气灶"),
];

/// Fixtures recognized by name anywhere in the text, with their category
pub const FIXTURE_CATEGORIES: &[(&str, &str)] = &[
    ("橱柜", "cabinet"),
    ("台面", "counter"),
    ("燃气灶", "stove"),
    ("洗碗机", "dishwasher"),
    ("抽油烟机", "range_hood"),
];

/// Rule-based parser for Chinese scene descriptions
#[derive(Debug, Clone, Copy, Default)]
pub struct PatternSceneParser;

impl PatternSceneParser {
    pub fn new() -> Self {
        Self
    }

    /// Build a scene from a description
    ///
    /// Objects come out in three groups: clause matches (pattern by pattern,
    /// in text order), then pots, then fixtures. A pot is skipped when one
    /// with the same location is already present; a fixture is skipped when
    /// any object already carries its name.
    pub fn parse(&self, description: &str) -> SceneModel {
        let mut objects = Self::located_objects(description);

        for line in description.lines().filter(|line| line.contains(POT)) {
            let location = first_keyword(line, POT_LOCATIONS);
            let duplicate = objects
                .iter()
                .any(|obj| obj.name == POT && obj.location.as_deref() == location);
            if duplicate {
                continue;
            }

            let mut pot = SceneObject::new(POT);
            if let Some(location) = location {
                pot = pot.with_location(location);
            }
            if let Some(color) = first_keyword(line, POT_COLORS) {
                pot = pot.with_attribute("color", color);
            }
            objects.push(pot);
        }

        for (name, kind) in FIXTURE_CATEGORIES {
            if description.contains(name) && !objects.iter().any(|obj| obj.name == *name) {
                objects.push(SceneObject::new(*name).with_kind(*kind));
            }
        }

        let scene = SceneModel::from_objects(objects);
        if scene.is_empty() {
            tracing::warn!("No objects recognized in scene description");
        } else {
            tracing::debug!("Scene description yielded {} objects", scene.objects.len());
        }
        scene
    }

    fn located_objects(description: &str) -> Vec<SceneObject> {
        let mut objects = Vec::new();
        for re in RE_LOCATED.iter() {
            for caps in re.captures_iter(description) {
                let (Some(phrase), Some(name), Some(location)) = (caps.get(0), caps.get(1), caps.get(2)) else {
                    continue;
                };

                let mut obj = SceneObject::new(name.as_str().trim()).with_location(location.as_str().trim());
                for (keyword, key, value) in ATTRIBUTE_KEYWORDS {
                    if phrase.as_str().contains(keyword) {
                        obj = obj.with_attribute(*key, *value);
                    }
                }
                objects.push(obj);
            }
        }
        objects
    }
}

fn first_keyword(text: &str, table: &[(&str, &'static str)]) -> Option<&'static str> {
    table
        .iter()
        .find(|(keyword, _)| text.contains(keyword))
        .map(|(_, value)| *value)
}

/// A scene description stored as plain text on disk
#[derive(Debug, Clone)]
pub struct SceneDescriptionFile {
    path: PathBuf,
    parser: PatternSceneParser,
}

impl SceneDescriptionFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            parser: PatternSceneParser,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SceneSource for SceneDescriptionFile {
    fn observe(&self) -> Result<SceneModel> {
        let description = fs::read_to_string(self.path())?;
        Ok(self.parser.parse(&description))
    }
}
