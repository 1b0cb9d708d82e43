//! Goal resolution - maps goal references onto concrete scene objects

use crate::command::goal::TaskGoal;
use crate::core::config::PlannerConfig;
use crate::core::error::{PlanError, Result, SceneRole};
use crate::scene::model::{SceneModel, SceneObject};

/// Policy for picking a scene object by name fragments
///
/// `select` scans the scene and returns the object that best answers any of
/// the queries. Queries are never empty strings.
pub trait MatchStrategy: Send + Sync {
    fn select<'s>(&self, objects: &'s [SceneObject], queries: &[&str]) -> Option<&'s SceneObject>;

    fn name(&self) -> &'static str;
}

/// First object in scan order whose name contains a query; no scoring
#[derive(Debug, Clone, Copy, Default)]
pub struct FirstSubstringMatch;

impl MatchStrategy for FirstSubstringMatch {
    fn select<'s>(&self, objects: &'s [SceneObject], queries: &[&str]) -> Option<&'s SceneObject> {
        objects
            .iter()
            .find(|obj| queries.iter().any(|q| obj.name.contains(q)))
    }

    fn name(&self) -> &'static str {
        "first-substring"
    }
}

/// Among all substring matches, the object with the shortest name
///
/// "cup" then wins over "cupboard" for the query "cup". Ties go to scan order.
#[derive(Debug, Clone, Copy, Default)]
pub struct ShortestNameMatch;

impl MatchStrategy for ShortestNameMatch {
    fn select<'s>(&self, objects: &'s [SceneObject], queries: &[&str]) -> Option<&'s SceneObject> {
        objects
            .iter()
            .filter(|obj| queries.iter().any(|q| obj.name.contains(q)))
            .min_by_key(|obj| obj.name.chars().count())
    }

    fn name(&self) -> &'static str {
        "shortest-name"
    }
}

/// Why a destination resolved to the object it did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchReason {
    /// The object carries the cabinet category
    Category,
    /// The object's name contains the destination or a cabinet synonym
    Name,
}

/// Resolves goal references against one scene
pub struct GoalResolver<'a> {
    scene: &'a SceneModel,
    config: &'a PlannerConfig,
    matcher: &'a dyn MatchStrategy,
}

impl<'a> GoalResolver<'a> {
    pub fn new(scene: &'a SceneModel, config: &'a PlannerConfig, matcher: &'a dyn MatchStrategy) -> Self {
        Self {
            scene,
            config,
            matcher,
        }
    }

    pub fn config(&self) -> &'a PlannerConfig {
        self.config
    }

    /// Location of the object whose name matches `target`
    ///
    /// None when nothing matches or the match has no location; callers fall
    /// back to the literal target.
    pub fn resolve_object_location(&self, target: &str) -> Option<&'a str> {
        if target.is_empty() {
            return None;
        }
        self.matcher
            .select(&self.scene.objects, &[target])
            .and_then(|obj| obj.location.as_deref())
            .filter(|location| !location.is_empty())
    }

    /// Name of the scene object that should receive the target
    pub fn resolve_destination_name(&self, destination: &str) -> Option<&'a str> {
        self.resolve_destination(destination)
            .map(|(obj, _)| obj.name.as_str())
    }

    /// Destination lookup with the reason for the match
    ///
    /// Any object of the cabinet category wins outright, whatever the
    /// destination says. Only without one are names matched against the
    /// destination and the cabinet synonyms.
    pub fn resolve_destination(&self, destination: &str) -> Option<(&'a SceneObject, MatchReason)> {
        if destination.is_empty() {
            return None;
        }

        if let Some(obj) = self.scene.find_kind(&self.config.cabinet_category) {
            return Some((obj, MatchReason::Category));
        }

        let mut queries = Vec::with_capacity(self.config.cabinet_keywords.len() + 1);
        queries.push(destination);
        queries.extend(self.config.cabinet_keywords.iter().map(String::as_str));

        self.matcher
            .select(&self.scene.objects, &queries)
            .map(|obj| (obj, MatchReason::Name))
    }

    /// Check that the goal's target object and destination exist in the scene
    ///
    /// Empty fields are not checked here; the decomposer decides whether the
    /// action needs them.
    pub fn validate(&self, goal: &TaskGoal) -> Result<()> {
        let target = goal.target_object.as_str();
        if !target.is_empty() && self.matcher.select(&self.scene.objects, &[target]).is_none() {
            return Err(PlanError::not_found(SceneRole::TargetObject, target));
        }

        let destination = goal.destination.as_str();
        if !destination.is_empty() && !self.destination_exists(destination) {
            return Err(PlanError::not_found(SceneRole::Destination, destination));
        }

        Ok(())
    }

    fn destination_exists(&self, destination: &str) -> bool {
        if self.matcher.select(&self.scene.objects, &[destination]).is_some() {
            return true;
        }

        // "the cabinet" is satisfied by any cabinet, whatever it is called
        self.config.mentions_cabinet(destination)
            && self.scene.find_kind(&self.config.cabinet_category).is_some()
    }
}
