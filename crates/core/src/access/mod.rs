//! Role-based access policy.
//!
//! This module provides:
//! - Staff roles and the authenticated [`Principal`]
//! - The [`Action`] catalogue of every gated operation
//! - [`AccessPolicy`], the single declarative role → action table

mod policy;

pub use policy::{AccessPolicy, ListScope};

use serde::{Deserialize, Serialize};

use rota_shared::types::UserId;

/// Staff role. Fixed for the lifetime of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    /// Requests leave and proposes or answers shift swaps.
    Employee,
    /// First-level leave approver.
    TeamLead,
    /// Final approver for leave and swaps; assigns shifts.
    Manager,
}

impl Role {
    /// All roles, in ascending order of authority.
    pub const ALL: [Self; 3] = [Self::Employee, Self::TeamLead, Self::Manager];

    /// Returns the string representation of the role.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Employee => "Employee",
            Self::TeamLead => "TeamLead",
            Self::Manager => "Manager",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The authenticated actor invoking an operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Principal {
    /// The caller's user id.
    pub id: UserId,
    /// The caller's role.
    pub role: Role,
}

impl Principal {
    /// Creates a principal.
    #[must_use]
    pub const fn new(id: UserId, role: Role) -> Self {
        Self { id, role }
    }
}

/// Entity type an [`Action`] operates on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    /// A registered user.
    User,
    /// A rostered shift.
    Shift,
    /// A leave request.
    Leave,
    /// A shift-swap request.
    Swap,
}

impl EntityKind {
    /// Returns the string representation of the entity kind.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Shift => "shift",
            Self::Leave => "leave request",
            Self::Swap => "swap request",
        }
    }
}

impl std::fmt::Display for EntityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Every operation gated by the access policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    /// List registered users.
    ListUsers,
    /// Create a shift for a user.
    AssignShift,
    /// List shifts.
    ListShifts,
    /// File a leave request.
    RequestLeave,
    /// First-level leave approval.
    ApproveLeaveAsTeamLead,
    /// Final leave approval.
    ApproveLeaveAsManager,
    /// Reject a leave request.
    RejectLeave,
    /// List leave requests.
    ListLeave,
    /// Propose a shift swap to a peer.
    ProposeSwap,
    /// Accept a swap as its target.
    AcceptSwap,
    /// Decline a swap as its target.
    RejectSwapAsPeer,
    /// Approve a peer-accepted swap and reassign the shifts.
    ApproveSwap,
    /// Decline a peer-accepted swap.
    RejectSwapAsManager,
    /// List swap requests.
    ListSwaps,
}

impl Action {
    /// Returns the string representation of the action.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::ListUsers => "list_users",
            Self::AssignShift => "assign_shift",
            Self::ListShifts => "list_shifts",
            Self::RequestLeave => "request_leave",
            Self::ApproveLeaveAsTeamLead => "approve_leave_as_team_lead",
            Self::ApproveLeaveAsManager => "approve_leave_as_manager",
            Self::RejectLeave => "reject_leave",
            Self::ListLeave => "list_leave",
            Self::ProposeSwap => "propose_swap",
            Self::AcceptSwap => "accept_swap",
            Self::RejectSwapAsPeer => "reject_swap_as_peer",
            Self::ApproveSwap => "approve_swap",
            Self::RejectSwapAsManager => "reject_swap_as_manager",
            Self::ListSwaps => "list_swaps",
        }
    }
}

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
