//! Planner - orchestrates validation, decomposition, synthesis and conflict resolution
//!
//! TaskGoal -> validate -> decompose -> synthesize (per sub-task) -> resolve -> Vec<AtomicAction>
//!
//! A planner holds only read-only configuration and strategies, so one
//! instance can serve concurrent calls; every call works on its own copy of
//! the action sequence.

use std::fmt;

use crate::command::goal::TaskGoal;
use crate::command::parser::InstructionParser;
use crate::command::resolver::{FirstSubstringMatch, GoalResolver, MatchStrategy};
use crate::core::config::{config, PlannerConfig};
use crate::core::error::{PlanError, Result};
use crate::planning::action::AtomicAction;
use crate::planning::conflict::{ConflictResolver, PriorityPolicy, ResolutionFault};
use crate::planning::subtask::decompose;
use crate::planning::synthesis::{ActionSynthesizer, DirectWaypoints, SynthesisGap, WaypointPlanner};
use crate::scene::model::SceneModel;
use crate::scene::source::SceneSource;

/// A successful plan and everything that was absorbed on the way
#[derive(Debug, Clone)]
pub struct PlanOutcome {
    pub actions: Vec<AtomicAction>,
    pub sub_tasks: usize,
    /// Sub-tasks that produced no actions and were skipped
    pub gaps: Vec<SynthesisGap>,
    /// Set when conflict resolution stopped early and a partial result was kept
    pub fault: Option<ResolutionFault>,
    pub conflicts: usize,
}

impl PlanOutcome {
    pub fn is_complete(&self) -> bool {
        self.gaps.is_empty() && self.fault.is_none()
    }
}

/// Turns task goals into ordered atomic action sequences
pub struct Planner {
    config: PlannerConfig,
    matcher: Box<dyn MatchStrategy>,
    waypoints: Box<dyn WaypointPlanner>,
    priorities: Box<dyn PriorityPolicy>,
}

impl Default for Planner {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Planner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Planner")
            .field("config", &self.config)
            .field("matcher", &self.matcher.name())
            .finish()
    }
}

impl Planner {
    /// Planner using the global config
    pub fn new() -> Self {
        Self::with_config(config().clone())
    }

    pub fn with_config(config: PlannerConfig) -> Self {
        let priorities = Box::new(config.priorities.clone());
        Self {
            config,
            matcher: Box::new(FirstSubstringMatch),
            waypoints: Box::new(DirectWaypoints),
            priorities,
        }
    }

    pub fn with_matcher(mut self, matcher: impl MatchStrategy + 'static) -> Self {
        self.matcher = Box::new(matcher);
        self
    }

    pub fn with_waypoints(mut self, waypoints: impl WaypointPlanner + 'static) -> Self {
        self.waypoints = Box::new(waypoints);
        self
    }

    pub fn with_priority_policy(mut self, priorities: impl PriorityPolicy + 'static) -> Self {
        self.priorities = Box::new(priorities);
        self
    }

    pub fn config(&self) -> &PlannerConfig {
        &self.config
    }

    /// Plan a goal against a scene, returning only the action sequence
    pub fn plan(&self, goal: &TaskGoal, scene: &SceneModel) -> Result<Vec<AtomicAction>> {
        self.plan_detailed(goal, scene).map(|outcome| outcome.actions)
    }

    /// Plan a goal against a scene
    ///
    /// Fails with `NotFound` or `MissingField` before any action is produced,
    /// and with `NoPlan` if nothing survives synthesis. Synthesis gaps and
    /// resolution faults are logged and reported in the outcome instead.
    pub fn plan_detailed(&self, goal: &TaskGoal, scene: &SceneModel) -> Result<PlanOutcome> {
        let resolver = GoalResolver::new(scene, &self.config, self.matcher.as_ref());
        resolver.validate(goal)?;

        let sub_tasks = decompose(goal, &resolver)?;

        let synthesizer = ActionSynthesizer::new(scene, self.waypoints.as_ref());
        let mut actions = Vec::new();
        let mut gaps = Vec::new();
        for sub_task in &sub_tasks {
            match synthesizer.synthesize(sub_task) {
                Ok(synthesized) => actions.extend(synthesized),
                Err(gap) => {
                    tracing::warn!("Skipping sub-task '{}': {}", sub_task, gap);
                    gaps.push(gap);
                }
            }
        }

        let conflict_resolver = ConflictResolver::new(self.priorities.as_ref(), &self.config.safe_position);
        let (actions, conflicts, fault) = match conflict_resolver.resolve(&actions) {
            Ok(resolution) => {
                if resolution.conflicts > 0 {
                    tracing::debug!(
                        "Resolved {} conflicts: {} actions moved, {} detours inserted",
                        resolution.conflicts,
                        resolution.moved,
                        resolution.detours
                    );
                }
                (resolution.actions, resolution.conflicts, None)
            }
            Err(fault) => {
                tracing::warn!("{}", fault);
                (fault.partial.clone(), 0, Some(fault))
            }
        };

        if actions.is_empty() {
            return Err(PlanError::NoPlan);
        }

        tracing::info!(
            "Planned '{}' goal: {} sub-tasks -> {} actions",
            goal.action,
            sub_tasks.len(),
            actions.len()
        );

        Ok(PlanOutcome {
            actions,
            sub_tasks: sub_tasks.len(),
            gaps,
            fault,
            conflicts,
        })
    }

    /// Observe the scene, interpret the instruction against it, and plan
    ///
    /// Each collaborator is called exactly once.
    pub fn process_instruction(
        &self,
        source: &dyn SceneSource,
        parser: &dyn InstructionParser,
        instruction: &str,
    ) -> Result<PlanOutcome> {
        let scene = source.observe()?;
        let goal = parser.parse(instruction, &scene);
        tracing::debug!("Instruction '{}' -> {:?}", instruction, goal);
        self.plan_detailed(&goal, &scene)
    }
}
