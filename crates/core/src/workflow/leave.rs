//! Leave request state machine.
//!
//! Pure transition logic: given the current status and the acting user, each
//! function either returns the `LeaveTransition` to persist or the reason the
//! transition is not allowed. Role gating happens in the access policy.

use chrono::Utc;

use rota_shared::types::UserId;

use crate::access::EntityKind;
use crate::workflow::error::WorkflowError;
use crate::workflow::types::{LeaveAction, LeaveStatus, LeaveTransition};

/// Stateless service for leave request transitions.
pub struct LeaveMachine;

impl LeaveMachine {
    /// First-level approval by a team lead.
    ///
    /// # Returns
    /// * `Ok(LeaveTransition::TeamLeadApprove)` if the request is Pending
    /// * `Err(WorkflowError::InvalidState)` otherwise
    pub fn approve_by_team_lead(
        current: LeaveStatus,
        approved_by: UserId,
    ) -> Result<LeaveTransition, WorkflowError> {
        match current {
            LeaveStatus::Pending => Ok(LeaveTransition::TeamLeadApprove {
                from: current,
                approved_by,
                approved_at: Utc::now(),
            }),
            _ => Err(invalid(current, LeaveAction::ApproveByTeamLead)),
        }
    }

    /// Final approval by a manager.
    ///
    /// A manager may approve straight from Pending, skipping the team lead.
    ///
    /// # Returns
    /// * `Ok(LeaveTransition::ManagerApprove)` if the request is Pending or TlApproved
    /// * `Err(WorkflowError::InvalidState)` otherwise
    pub fn approve_by_manager(
        current: LeaveStatus,
        approved_by: UserId,
    ) -> Result<LeaveTransition, WorkflowError> {
        match current {
            LeaveStatus::Pending | LeaveStatus::TlApproved => {
                Ok(LeaveTransition::ManagerApprove {
                    from: current,
                    approved_by,
                    approved_at: Utc::now(),
                })
            }
            _ => Err(invalid(current, LeaveAction::ApproveByManager)),
        }
    }

    /// Rejection by a team lead or manager.
    ///
    /// # Returns
    /// * `Ok(LeaveTransition::Reject)` if the request is not yet terminal
    /// * `Err(WorkflowError::InvalidState)` if it is Approved or Rejected
    pub fn reject(
        current: LeaveStatus,
        rejected_by: UserId,
    ) -> Result<LeaveTransition, WorkflowError> {
        if current.is_terminal() {
            return Err(invalid(current, LeaveAction::Reject));
        }
        Ok(LeaveTransition::Reject {
            from: current,
            rejected_by,
            rejected_at: Utc::now(),
        })
    }

    /// Dispatches `action` to the matching transition function.
    pub fn apply(
        current: LeaveStatus,
        action: LeaveAction,
        actor: UserId,
    ) -> Result<LeaveTransition, WorkflowError> {
        match action {
            LeaveAction::ApproveByTeamLead => Self::approve_by_team_lead(current, actor),
            LeaveAction::ApproveByManager => Self::approve_by_manager(current, actor),
            LeaveAction::Reject => Self::reject(current, actor),
        }
    }

    /// Check if a status transition is valid.
    ///
    /// Valid transitions:
    /// - Pending → TlApproved
    /// - Pending → Approved
    /// - Pending → Rejected
    /// - TlApproved → Approved
    /// - TlApproved → Rejected
    #[must_use]
    pub fn is_valid_transition(from: LeaveStatus, to: LeaveStatus) -> bool {
        matches!(
            (from, to),
            (
                LeaveStatus::Pending,
                LeaveStatus::TlApproved | LeaveStatus::Approved | LeaveStatus::Rejected
            ) | (
                LeaveStatus::TlApproved,
                LeaveStatus::Approved | LeaveStatus::Rejected
            )
        )
    }
}

fn invalid(current: LeaveStatus, action: LeaveAction) -> WorkflowError {
    WorkflowError::InvalidState {
        entity: EntityKind::Leave,
        status: current.as_str(),
        action: action.as_str(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_team_lead_approve_from_pending() {
        let lead = UserId::new();
        let transition = LeaveMachine::approve_by_team_lead(LeaveStatus::Pending, lead).unwrap();
        assert_eq!(transition.new_status(), LeaveStatus::TlApproved);
        assert!(matches!(
            transition,
            LeaveTransition::TeamLeadApprove { approved_by, .. } if approved_by == lead
        ));
    }

    #[test]
    fn test_team_lead_approve_from_approved_fails() {
        let result = LeaveMachine::approve_by_team_lead(LeaveStatus::Approved, UserId::new());
        assert!(matches!(
            result,
            Err(WorkflowError::InvalidState {
                status: "APPROVED",
                ..
            })
        ));
    }

    #[test]
    fn test_team_lead_cannot_approve_twice() {
        let result = LeaveMachine::approve_by_team_lead(LeaveStatus::TlApproved, UserId::new());
        assert!(matches!(result, Err(WorkflowError::InvalidState { .. })));
    }

    #[test]
    fn test_manager_approve_after_team_lead() {
        let transition =
            LeaveMachine::approve_by_manager(LeaveStatus::TlApproved, UserId::new()).unwrap();
        assert_eq!(transition.new_status(), LeaveStatus::Approved);
        assert_eq!(transition.from_status(), LeaveStatus::TlApproved);
    }

    #[test]
    fn test_manager_may_bypass_team_lead() {
        let transition =
            LeaveMachine::approve_by_manager(LeaveStatus::Pending, UserId::new()).unwrap();
        assert_eq!(transition.new_status(), LeaveStatus::Approved);
        assert_eq!(transition.from_status(), LeaveStatus::Pending);
    }

    #[test]
    fn test_manager_approve_from_rejected_fails() {
        let result = LeaveMachine::approve_by_manager(LeaveStatus::Rejected, UserId::new());
        assert!(matches!(result, Err(WorkflowError::InvalidState { .. })));
    }

    #[test]
    fn test_reject_from_open_statuses() {
        for status in [LeaveStatus::Pending, LeaveStatus::TlApproved] {
            let transition = LeaveMachine::reject(status, UserId::new()).unwrap();
            assert_eq!(transition.new_status(), LeaveStatus::Rejected);
        }
    }

    #[test]
    fn test_reject_terminal_fails() {
        for status in [LeaveStatus::Approved, LeaveStatus::Rejected] {
            let result = LeaveMachine::reject(status, UserId::new());
            assert!(matches!(result, Err(WorkflowError::InvalidState { .. })));
        }
    }

    #[test]
    fn test_is_valid_transition() {
        assert!(LeaveMachine::is_valid_transition(
            LeaveStatus::Pending,
            LeaveStatus::TlApproved
        ));
        assert!(LeaveMachine::is_valid_transition(
            LeaveStatus::Pending,
            LeaveStatus::Approved
        ));
        assert!(LeaveMachine::is_valid_transition(
            LeaveStatus::TlApproved,
            LeaveStatus::Rejected
        ));

        assert!(!LeaveMachine::is_valid_transition(
            LeaveStatus::TlApproved,
            LeaveStatus::Pending
        ));
        assert!(!LeaveMachine::is_valid_transition(
            LeaveStatus::Approved,
            LeaveStatus::Rejected
        ));
        assert!(!LeaveMachine::is_valid_transition(
            LeaveStatus::Rejected,
            LeaveStatus::Pending
        ));
    }
}
