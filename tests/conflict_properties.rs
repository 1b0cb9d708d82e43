//! Property tests for conflict resolution over arbitrary action sequences

use proptest::prelude::*;

use task_planner::core::{ActionPriorities, ActionType, NavigationPurpose};
use task_planner::planning::{AtomicAction, ConflictGraph, ConflictKind, ConflictResolver, PriorityPolicy};

const SAFE: &str = "safe_position";

/// Per-action priority, so two actions of the same type can outrank each other
struct ByParameter;

impl PriorityPolicy for ByParameter {
    fn priority(&self, action: &AtomicAction) -> u8 {
        action
            .parameter("priority")
            .and_then(|p| p.parse().ok())
            .unwrap_or(1)
    }
}

fn arb_action() -> impl Strategy<Value = AtomicAction> {
    let kind = prop::sample::select(ActionType::ALL.to_vec());
    let target = prop::sample::select(vec!["cup", "plate", "book"]);
    let destination = prop::sample::select(vec!["shelf", "table", "cabinet"]);

    (kind, target, destination, 1u8..=5).prop_map(|(kind, target, destination, priority)| {
        let action = match kind {
            ActionType::Navigate => AtomicAction::navigate(target, NavigationPurpose::ReachObject),
            ActionType::Rotate => AtomicAction::rotate(target, 90.0),
            ActionType::Place | ActionType::Move => AtomicAction::new(kind, target).with_destination(destination),
            ActionType::Grasp => AtomicAction::new(kind, target),
        };
        action.with_parameter("priority", priority.to_string())
    })
}

fn arb_sequence() -> impl Strategy<Value = Vec<AtomicAction>> {
    prop::collection::vec(arb_action(), 0..16)
}

/// Actions the resource pass never moves, in order, detours excluded
fn anchored(actions: &[AtomicAction]) -> Vec<AtomicAction> {
    actions
        .iter()
        .filter(|a| !a.action.holds_target() && !a.is_detour(SAFE))
        .cloned()
        .collect()
}

proptest! {
    #[test]
    fn resolution_never_faults_on_fresh_graph(actions in arb_sequence()) {
        let resolver = ConflictResolver::new(&ByParameter, SAFE);
        prop_assert!(resolver.resolve(&actions).is_ok());
    }

    #[test]
    fn resolving_twice_is_a_no_op(actions in arb_sequence()) {
        let resolver = ConflictResolver::new(&ByParameter, SAFE);
        let once = resolver.resolve(&actions).unwrap();
        let twice = resolver.resolve(&once.actions).unwrap();

        prop_assert_eq!(&twice.actions, &once.actions);
        prop_assert!(twice.is_unchanged());
    }

    #[test]
    fn length_grows_only_by_detours(actions in arb_sequence()) {
        let resolver = ConflictResolver::new(&ByParameter, SAFE);
        let resolution = resolver.resolve(&actions).unwrap();

        prop_assert_eq!(resolution.actions.len(), actions.len() + resolution.detours);
        prop_assert_eq!(resolution.conflicts, ConflictGraph::detect(&actions).conflict_count());
    }

    #[test]
    fn one_detour_per_spatial_pair(actions in arb_sequence()) {
        let resolver = ConflictResolver::new(&ByParameter, SAFE);
        let resolution = resolver.resolve(&actions).unwrap();
        let spatial = ConflictGraph::detect(&actions).conflicts_of(ConflictKind::Spatial);

        // Generated sequences never contain detours, so no pair starts out separated
        prop_assert_eq!(resolution.detours, spatial.len());
    }

    #[test]
    fn non_holding_actions_keep_their_order(actions in arb_sequence()) {
        let resolver = ConflictResolver::new(&ByParameter, SAFE);
        let resolution = resolver.resolve(&actions).unwrap();

        prop_assert_eq!(anchored(&resolution.actions), anchored(&actions));
    }

    #[test]
    fn every_action_survives_resolution(actions in arb_sequence()) {
        let resolver = ConflictResolver::new(&ByParameter, SAFE);
        let resolution = resolver.resolve(&actions).unwrap();

        let mut before: Vec<String> = actions.iter().map(|a| a.to_string()).collect();
        let mut after: Vec<String> = resolution
            .actions
            .iter()
            .filter(|a| !a.is_detour(SAFE))
            .map(|a| a.to_string())
            .collect();
        before.sort();
        after.sort();
        prop_assert_eq!(after, before);
    }

    #[test]
    fn equal_type_priorities_never_reorder(actions in arb_sequence()) {
        let priorities = ActionPriorities::default();
        let resolver = ConflictResolver::new(&priorities, SAFE);
        let resolution = resolver.resolve(&actions).unwrap();

        // Grasp and Move share a priority by default, so only detours can appear
        prop_assert_eq!(resolution.moved, 0);
    }
}
