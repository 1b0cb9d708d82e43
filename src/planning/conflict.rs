//! Conflict detection and resolution over a flattened action sequence
//!
//! Detection builds a [`ConflictGraph`]: one node per action, one edge per
//! conflicting pair, always pointing from the earlier action to the later.
//!
//! Resolution runs two passes against that snapshot:
//!
//! - **Resource**: actions that hold the same target are grouped. An action
//!   with no earlier, strictly higher-priority partner is a group *head*; every
//!   other action joins the closest preceding head that outranks it. Groups are
//!   emitted contiguously at their head's position, members by descending
//!   priority and otherwise in their original order. With two actions this is
//!   exactly "move the lower-priority one to directly after the higher one".
//! - **Spatial**: every pair of placements at the same destination gets one
//!   detour to the safe position, directly after the first placement of the
//!   pair. A pair with a detour already somewhere between its two placements
//!   is mitigated and left alone.
//!
//! Resolving an already resolved sequence changes nothing: every resource
//! group is already contiguous and every spatial pair already separated.

use std::cmp::Reverse;

use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;
use petgraph::Direction;
use thiserror::Error;

use crate::core::config::ActionPriorities;
use crate::core::types::{ActionType, NavigationPurpose};
use crate::planning::action::AtomicAction;

/// Ranks actions when they compete for the same object
pub trait PriorityPolicy: Send + Sync {
    fn priority(&self, action: &AtomicAction) -> u8;
}

impl PriorityPolicy for ActionPriorities {
    fn priority(&self, action: &AtomicAction) -> u8 {
        self.get(action.action)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConflictKind {
    /// Both actions hold the same target object
    Resource,
    /// Both actions place something at the same spot
    Spatial,
}

/// A conflicting pair, by position in the detected sequence (`first < second`)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Conflict {
    pub kind: ConflictKind,
    pub first: usize,
    pub second: usize,
}

/// Placeholder proximity test: two destinations are nearby when textually equal.
fn is_nearby(a: &str, b: &str) -> bool {
    a == b
}

fn conflict_between(a: &AtomicAction, b: &AtomicAction) -> Option<ConflictKind> {
    if a.action.holds_target() && b.action.holds_target() && a.target == b.target {
        return Some(ConflictKind::Resource);
    }

    match (a.action, b.action, &a.destination, &b.destination) {
        (ActionType::Place, ActionType::Place, Some(da), Some(db)) if is_nearby(da, db) => {
            Some(ConflictKind::Spatial)
        }
        _ => None,
    }
}

/// Pairwise conflicts of one action sequence
#[derive(Debug, Clone, Default)]
pub struct ConflictGraph {
    graph: DiGraph<usize, ConflictKind>,
}

impl ConflictGraph {
    /// Scan every pair of actions (O(n²)) and record the conflicting ones
    pub fn detect(actions: &[AtomicAction]) -> Self {
        let mut graph = DiGraph::with_capacity(actions.len(), 0);
        let nodes: Vec<NodeIndex> = (0..actions.len()).map(|i| graph.add_node(i)).collect();

        for (i, first) in actions.iter().enumerate() {
            for (j, second) in actions.iter().enumerate().skip(i + 1) {
                if let Some(kind) = conflict_between(first, second) {
                    graph.add_edge(nodes[i], nodes[j], kind);
                }
            }
        }

        Self { graph }
    }

    /// Number of actions the graph was built over
    pub fn len(&self) -> usize {
        self.graph.node_count()
    }

    pub fn is_empty(&self) -> bool {
        self.graph.node_count() == 0
    }

    pub fn conflict_count(&self) -> usize {
        self.graph.edge_count()
    }

    pub fn conflicts(&self) -> Vec<Conflict> {
        let mut conflicts: Vec<Conflict> = self
            .graph
            .edge_references()
            .map(|edge| Conflict {
                kind: *edge.weight(),
                first: self.graph[edge.source()],
                second: self.graph[edge.target()],
            })
            .collect();
        conflicts.sort_by_key(|c| (c.first, c.second));
        conflicts
    }

    pub fn conflicts_of(&self, kind: ConflictKind) -> Vec<Conflict> {
        self.conflicts().into_iter().filter(|c| c.kind == kind).collect()
    }

    /// Earlier actions that conflict with `index` in the given way, ascending
    fn earlier_partners(&self, index: usize, kind: ConflictKind) -> Vec<usize> {
        let mut partners: Vec<usize> = self
            .graph
            .edges_directed(NodeIndex::new(index), Direction::Incoming)
            .filter(|edge| *edge.weight() == kind)
            .map(|edge| self.graph[edge.source()])
            .collect();
        partners.sort_unstable();
        partners
    }

    /// First recorded conflict that no longer holds for `actions`
    fn stale_conflict(&self, actions: &[AtomicAction]) -> Option<Conflict> {
        self.conflicts().into_iter().find(|c| {
            match (actions.get(c.first), actions.get(c.second)) {
                (Some(a), Some(b)) => conflict_between(a, b) != Some(c.kind),
                _ => true,
            }
        })
    }
}

/// What went wrong while resolving conflicts
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FaultReason {
    #[error("conflict graph covers {graph} actions but the sequence has {actions}")]
    SizeMismatch { graph: usize, actions: usize },

    #[error("recorded conflict between actions {first} and {second} no longer holds")]
    StaleConflict { first: usize, second: usize },

    #[error("action {index} is outranked but has no group head")]
    MissingHead { index: usize },
}

/// Resolution could not finish; `partial` is the best sequence obtained
///
/// Never fatal: the planner logs it and carries on with `partial`.
#[derive(Error, Debug, Clone)]
#[error("conflict resolution stopped early: {reason}")]
pub struct ResolutionFault {
    pub reason: FaultReason,
    pub partial: Vec<AtomicAction>,
}

/// Resolved sequence plus what resolution did to it
#[derive(Debug, Clone, PartialEq)]
pub struct Resolution {
    pub actions: Vec<AtomicAction>,
    pub conflicts: usize,
    /// Actions whose position changed in the resource pass
    pub moved: usize,
    /// Detours inserted by the spatial pass
    pub detours: usize,
}

impl Resolution {
    pub fn is_unchanged(&self) -> bool {
        self.moved == 0 && self.detours == 0
    }
}

/// Applies resource and spatial mitigation to an action sequence
pub struct ConflictResolver<'a> {
    priorities: &'a dyn PriorityPolicy,
    safe_position: &'a str,
}

impl<'a> ConflictResolver<'a> {
    pub fn new(priorities: &'a dyn PriorityPolicy, safe_position: &'a str) -> Self {
        Self {
            priorities,
            safe_position,
        }
    }

    /// Detect conflicts in `actions` and resolve them
    ///
    /// The graph is built from `actions` itself, so this never reports a stale
    /// or mismatched graph. Faults only come out of [`apply`](Self::apply)
    /// when the caller hands in a graph detected over a different sequence.
    pub fn resolve(&self, actions: &[AtomicAction]) -> Result<Resolution, ResolutionFault> {
        let graph = ConflictGraph::detect(actions);
        self.apply(actions, &graph)
    }

    /// Resolve `actions` using a previously detected conflict graph
    ///
    /// The graph must describe this very sequence; otherwise a fault is
    /// returned with the sequence unchanged.
    pub fn apply(&self, actions: &[AtomicAction], graph: &ConflictGraph) -> Result<Resolution, ResolutionFault> {
        let fault = |reason, partial: &[AtomicAction]| ResolutionFault {
            reason,
            partial: partial.to_vec(),
        };

        if graph.len() != actions.len() {
            let reason = FaultReason::SizeMismatch {
                graph: graph.len(),
                actions: actions.len(),
            };
            return Err(fault(reason, actions));
        }

        if let Some(stale) = graph.stale_conflict(actions) {
            let reason = FaultReason::StaleConflict {
                first: stale.first,
                second: stale.second,
            };
            return Err(fault(reason, actions));
        }

        let order = self
            .group_order(actions, graph)
            .map_err(|reason| fault(reason, actions))?;
        let moved = order.iter().enumerate().filter(|(pos, idx)| pos != *idx).count();

        let (resolved, detours) = self.insert_detours(actions, graph, &order);

        Ok(Resolution {
            actions: resolved,
            conflicts: graph.conflict_count(),
            moved,
            detours,
        })
    }

    /// Resource pass: a stable ordering in which every group follows its head
    fn group_order(&self, actions: &[AtomicAction], graph: &ConflictGraph) -> Result<Vec<usize>, FaultReason> {
        let n = actions.len();
        let priority: Vec<u8> = actions.iter().map(|a| self.priorities.priority(a)).collect();
        let mut head_of: Vec<Option<usize>> = vec![None; n];

        for index in 0..n {
            let partners = graph.earlier_partners(index, ConflictKind::Resource);
            if partners.iter().all(|&p| priority[p] <= priority[index]) {
                continue;
            }

            let head = partners
                .iter()
                .rev()
                .copied()
                .find(|&p| head_of[p].is_none() && priority[p] > priority[index])
                .ok_or(FaultReason::MissingHead { index })?;
            head_of[index] = Some(head);
        }

        let mut members: Vec<Vec<usize>> = vec![Vec::new(); n];
        for (index, head) in head_of.iter().enumerate() {
            if let Some(head) = head {
                members[*head].push(index);
            }
        }

        let mut order = Vec::with_capacity(n);
        for index in 0..n {
            if head_of[index].is_some() {
                continue;
            }
            order.push(index);

            let mut group = std::mem::take(&mut members[index]);
            group.sort_by_key(|&m| Reverse(priority[m]));
            order.extend(group);
        }

        Ok(order)
    }

    /// Spatial pass: one detour after the first placement of each unseparated pair
    ///
    /// Separation is judged on the input sequence. Placements keep their
    /// relative order through the resource pass, so a detour emitted after the
    /// first placement of a pair always lands before the second.
    fn insert_detours(
        &self,
        actions: &[AtomicAction],
        graph: &ConflictGraph,
        order: &[usize],
    ) -> (Vec<AtomicAction>, usize) {
        let mut pending = vec![0usize; actions.len()];
        for conflict in graph.conflicts_of(ConflictKind::Spatial) {
            if !self.separated(actions, conflict.first, conflict.second) {
                pending[conflict.first] += 1;
            }
        }

        let detours: usize = pending.iter().sum();
        let mut resolved = Vec::with_capacity(order.len() + detours);
        for &index in order {
            resolved.push(actions[index].clone());
            resolved.extend(
                (0..pending[index])
                    .map(|_| AtomicAction::navigate(self.safe_position, NavigationPurpose::AvoidConflict)),
            );
        }

        (resolved, detours)
    }

    /// Whether a detour already lies between two positions of `actions`
    fn separated(&self, actions: &[AtomicAction], first: usize, second: usize) -> bool {
        actions[first + 1..second]
            .iter()
            .any(|action| action.is_detour(self.safe_position))
    }
}
