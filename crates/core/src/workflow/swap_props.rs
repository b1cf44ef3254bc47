//! Property-based tests for SwapMachine.

use proptest::prelude::*;
use uuid::Uuid;

use rota_shared::types::UserId;

use crate::workflow::error::WorkflowError;
use crate::workflow::swap::SwapMachine;
use crate::workflow::types::{SwapAction, SwapStatus};

fn arb_status() -> impl Strategy<Value = SwapStatus> {
    prop::sample::select(SwapStatus::ALL.to_vec())
}

fn arb_action() -> impl Strategy<Value = SwapAction> {
    prop::sample::select(SwapAction::ALL.to_vec())
}

fn arb_user() -> impl Strategy<Value = UserId> {
    any::<u128>().prop_map(|n| UserId::from_uuid(Uuid::from_u128(n)))
}

fn target_of(action: SwapAction) -> SwapStatus {
    match action {
        SwapAction::AcceptByPeer => SwapStatus::PendingManager,
        SwapAction::RejectByPeer => SwapStatus::RejectedPeer,
        SwapAction::ApproveByManager => SwapStatus::Approved,
        SwapAction::RejectByManager => SwapStatus::RejectedManager,
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    #[test]
    fn prop_apply_matches_transition_table(
        current in arb_status(),
        action in arb_action(),
        actor in arb_user(),
    ) {
        let result = SwapMachine::apply(current, action, actor);
        let target = target_of(action);

        if SwapMachine::is_valid_transition(current, target) {
            let transition = result.unwrap();
            prop_assert_eq!(transition.new_status(), target);
            prop_assert_eq!(transition.from_status(), current);
        } else {
            let is_invalid_state = matches!(result, Err(WorkflowError::InvalidState { .. }));
            prop_assert!(is_invalid_state);
        }
    }

    #[test]
    fn prop_terminal_statuses_are_final(action in arb_action(), actor in arb_user()) {
        for status in SwapStatus::ALL.into_iter().filter(SwapStatus::is_terminal) {
            prop_assert!(SwapMachine::apply(status, action, actor).is_err());
        }
    }

    /// Any sequence of actions from PendingPeer walks one of the allowed paths,
    /// and Approved is reached at most once.
    #[test]
    fn prop_sequences_follow_allowed_paths(
        actions in prop::collection::vec(arb_action(), 1..10),
        actor in arb_user(),
    ) {
        let mut path = vec![SwapStatus::PendingPeer];
        for action in actions {
            let current = *path.last().unwrap();
            if let Ok(transition) = SwapMachine::apply(current, action, actor) {
                path.push(transition.new_status());
            }
        }

        let allowed: [&[SwapStatus]; 5] = [
            &[SwapStatus::PendingPeer],
            &[SwapStatus::PendingPeer, SwapStatus::PendingManager],
            &[SwapStatus::PendingPeer, SwapStatus::PendingManager, SwapStatus::Approved],
            &[SwapStatus::PendingPeer, SwapStatus::RejectedPeer],
            &[SwapStatus::PendingPeer, SwapStatus::PendingManager, SwapStatus::RejectedManager],
        ];
        prop_assert!(allowed.contains(&path.as_slice()), "unexpected path {:?}", path);
    }
}
