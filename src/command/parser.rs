//! Turn instruction text into structured task goals
//!
//! Real language understanding is an external collaborator reached through
//! [`InstructionParser`]. The pattern parser here covers the two sentence
//! shapes the planner is routinely driven with, "put the X in the Y" and
//! "把X放进Y", and answers everything else with an unrecognized goal.

use std::sync::LazyLock;

use regex::Regex;

use crate::command::goal::{GoalAction, TaskGoal};
use crate::scene::model::SceneModel;

/// Synchronous contract for anything that can interpret an instruction
///
/// Implementations must always answer: text they cannot interpret becomes
/// [`TaskGoal::unrecognized`], which the planner rejects or degrades on its own.
pub trait InstructionParser {
    fn parse(&self, instruction: &str, scene: &SceneModel) -> TaskGoal;
}

static RE_PLACE_ZH: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"把(.+?)(?:放进|放到|放入|放在)(.+?)(?:[，。\n]|$)").unwrap()
});

static RE_PLACE_EN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)put the (.+?) (?:in|on|into|to) the (.+?)(?:[.,\n]|$)").unwrap()
});

/// Rule-based parser for placement instructions
#[derive(Debug, Clone, Copy, Default)]
pub struct PatternInstructionParser;

impl PatternInstructionParser {
    pub fn new() -> Self {
        Self
    }

    fn match_placement(instruction: &str) -> Option<(String, String)> {
        [&*RE_PLACE_ZH, &*RE_PLACE_EN].iter().find_map(|re| {
            let caps = re.captures(instruction)?;
            let target = caps.get(1)?.as_str().trim();
            let destination = caps.get(2)?.as_str().trim();
            Some((target.to_string(), destination.to_string()))
        })
    }
}

impl InstructionParser for PatternInstructionParser {
    fn parse(&self, instruction: &str, _scene: &SceneModel) -> TaskGoal {
        match Self::match_placement(instruction) {
            Some((target, destination)) => {
                tracing::debug!("Parsed placement: '{}' -> '{}'", target, destination);
                TaskGoal::new(GoalAction::Place, target).with_destination(destination)
            }
            None => {
                tracing::warn!("Instruction not understood: {}", instruction);
                TaskGoal::unrecognized()
            }
        }
    }
}
