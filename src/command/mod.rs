//! Command intake: structured goals and how they map onto the scene
//!
//! instruction text -> InstructionParser -> TaskGoal -> GoalResolver -> scene objects

pub mod goal;
pub mod parser;
pub mod resolver;

pub use goal::{GoalAction, GoalField, TaskGoal};
pub use parser::{InstructionParser, PatternInstructionParser};
pub use resolver::{FirstSubstringMatch, GoalResolver, MatchReason, MatchStrategy, ShortestNameMatch};
