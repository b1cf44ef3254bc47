//! Declarative role → action table.
//!
//! Services consult this table once per operation, before loading any entity.
//! Entity-level checks (current status, swap target ownership) stay in the
//! workflow services.

use crate::access::{Action, EntityKind, Principal, Role};
use crate::workflow::WorkflowError;

const EMPLOYEE_ACTIONS: &[Action] = &[
    Action::ListUsers,
    Action::ListShifts,
    Action::RequestLeave,
    Action::ListLeave,
    Action::ProposeSwap,
    Action::AcceptSwap,
    Action::RejectSwapAsPeer,
    Action::ListSwaps,
];

const TEAM_LEAD_ACTIONS: &[Action] = &[
    Action::ListUsers,
    Action::ListShifts,
    Action::ApproveLeaveAsTeamLead,
    Action::RejectLeave,
    Action::ListLeave,
    Action::ListSwaps,
];

const MANAGER_ACTIONS: &[Action] = &[
    Action::ListUsers,
    Action::AssignShift,
    Action::ListShifts,
    Action::ApproveLeaveAsManager,
    Action::RejectLeave,
    Action::ListLeave,
    Action::ApproveSwap,
    Action::RejectSwapAsManager,
    Action::ListSwaps,
];

/// Which records a listing returns for a role.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListScope {
    /// Only records owned by (or assigned to) the caller.
    Own,
    /// Every record.
    All,
}

/// Stateless access policy.
pub struct AccessPolicy;

impl AccessPolicy {
    /// Returns every action `role` may invoke.
    #[must_use]
    pub const fn allowed_actions(role: Role) -> &'static [Action] {
        match role {
            Role::Employee => EMPLOYEE_ACTIONS,
            Role::TeamLead => TEAM_LEAD_ACTIONS,
            Role::Manager => MANAGER_ACTIONS,
        }
    }

    /// Returns true if `role` may invoke `action`.
    #[must_use]
    pub fn permits(role: Role, action: Action) -> bool {
        Self::allowed_actions(role).contains(&action)
    }

    /// Checks that the principal's role may invoke `action`.
    ///
    /// # Errors
    ///
    /// Returns `WorkflowError::NotPermitted` if the role is not granted the action.
    pub fn authorize(principal: &Principal, action: Action) -> Result<(), WorkflowError> {
        if Self::permits(principal.role, action) {
            Ok(())
        } else {
            tracing::warn!(
                principal = %principal.id,
                role = %principal.role,
                action = %action,
                "action not permitted for role"
            );
            Err(WorkflowError::NotPermitted {
                role: principal.role,
                action,
            })
        }
    }

    /// Returns the read scope of `role` for listings of `entity`.
    #[must_use]
    pub const fn list_scope(role: Role, entity: EntityKind) -> ListScope {
        match (role, entity) {
            (Role::Employee, EntityKind::Leave)
            | (Role::Employee | Role::TeamLead, EntityKind::Shift) => ListScope::Own,
            _ => ListScope::All,
        }
    }
}
