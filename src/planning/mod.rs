//! Task planning pipeline
//!
//! TaskGoal -> decompose -> Vec<SubTask> -> synthesize -> Vec<AtomicAction> -> resolve conflicts

pub mod action;
pub mod conflict;
pub mod planner;
pub mod subtask;
pub mod synthesis;

pub use action::AtomicAction;
pub use conflict::{
    Conflict, ConflictGraph, ConflictKind, ConflictResolver, FaultReason, PriorityPolicy, Resolution,
    ResolutionFault,
};
pub use planner::{PlanOutcome, Planner};
pub use subtask::{decompose, SubTask};
pub use synthesis::{ActionSynthesizer, DirectWaypoints, SynthesisGap, WaypointPlanner};
