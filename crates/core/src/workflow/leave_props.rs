//! Property-based tests for LeaveMachine.

use proptest::prelude::*;
use uuid::Uuid;

use rota_shared::types::UserId;

use crate::workflow::error::WorkflowError;
use crate::workflow::leave::LeaveMachine;
use crate::workflow::types::{LeaveAction, LeaveStatus, LeaveTransition};

/// Strategy for generating random LeaveStatus values.
fn arb_status() -> impl Strategy<Value = LeaveStatus> {
    prop::sample::select(LeaveStatus::ALL.to_vec())
}

/// Strategy for generating random LeaveAction values.
fn arb_action() -> impl Strategy<Value = LeaveAction> {
    prop::sample::select(LeaveAction::ALL.to_vec())
}

/// Strategy for generating random user ids.
fn arb_user() -> impl Strategy<Value = UserId> {
    any::<u128>().prop_map(|n| UserId::from_uuid(Uuid::from_u128(n)))
}

/// The status an action leads to when it is allowed.
fn target_of(action: LeaveAction) -> LeaveStatus {
    match action {
        LeaveAction::ApproveByTeamLead => LeaveStatus::TlApproved,
        LeaveAction::ApproveByManager => LeaveStatus::Approved,
        LeaveAction::Reject => LeaveStatus::Rejected,
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// An action succeeds exactly when its (from, to) pair is in the transition table.
    #[test]
    fn prop_apply_matches_transition_table(
        current in arb_status(),
        action in arb_action(),
        actor in arb_user(),
    ) {
        let result = LeaveMachine::apply(current, action, actor);
        let target = target_of(action);

        if LeaveMachine::is_valid_transition(current, target) {
            let transition = result.unwrap();
            prop_assert_eq!(transition.new_status(), target);
            prop_assert_eq!(transition.from_status(), current);
        } else {
            let is_invalid_state = matches!(result, Err(WorkflowError::InvalidState { .. }));
            prop_assert!(is_invalid_state);
        }
    }

    /// Terminal statuses admit no action at all.
    #[test]
    fn prop_terminal_statuses_are_final(
        action in arb_action(),
        actor in arb_user(),
    ) {
        for status in [LeaveStatus::Approved, LeaveStatus::Rejected] {
            prop_assert!(LeaveMachine::apply(status, action, actor).is_err());
        }
    }

    /// Transitions record the acting user in the matching audit field.
    #[test]
    fn prop_transition_records_actor(action in arb_action(), actor in arb_user()) {
        let transition = LeaveMachine::apply(LeaveStatus::Pending, action, actor).unwrap();
        let recorded = match transition {
            LeaveTransition::TeamLeadApprove { approved_by, .. }
            | LeaveTransition::ManagerApprove { approved_by, .. } => approved_by,
            LeaveTransition::Reject { rejected_by, .. } => rejected_by,
        };
        prop_assert_eq!(recorded, actor);
    }

    /// Any sequence of actions from Pending walks one of the allowed paths.
    #[test]
    fn prop_sequences_follow_allowed_paths(
        actions in prop::collection::vec(arb_action(), 1..8),
        actor in arb_user(),
    ) {
        let mut path = vec![LeaveStatus::Pending];
        for action in actions {
            let current = *path.last().unwrap();
            if let Ok(transition) = LeaveMachine::apply(current, action, actor) {
                path.push(transition.new_status());
            }
        }

        let allowed: [&[LeaveStatus]; 6] = [
            &[LeaveStatus::Pending],
            &[LeaveStatus::Pending, LeaveStatus::TlApproved],
            &[LeaveStatus::Pending, LeaveStatus::TlApproved, LeaveStatus::Approved],
            &[LeaveStatus::Pending, LeaveStatus::TlApproved, LeaveStatus::Rejected],
            &[LeaveStatus::Pending, LeaveStatus::Approved],
            &[LeaveStatus::Pending, LeaveStatus::Rejected],
        ];
        prop_assert!(allowed.contains(&path.as_slice()), "unexpected path {:?}", path);
    }
}
