//! Workflow domain types for leave and swap lifecycles.
//!
//! This module defines the status domains of both request aggregates, the
//! actions that move them, and the transitions those actions produce.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use rota_shared::types::UserId;

/// Leave request status.
///
/// The valid transitions are:
/// - Pending → TlApproved (team lead approval)
/// - Pending → Approved (manager approval, bypassing the team lead)
/// - TlApproved → Approved (manager approval)
/// - Pending → Rejected, TlApproved → Rejected (reject)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LeaveStatus {
    /// Awaiting the first approval.
    Pending,
    /// Approved by a team lead, awaiting the manager.
    TlApproved,
    /// Fully approved (terminal).
    Approved,
    /// Rejected by a team lead or manager (terminal).
    Rejected,
}

impl LeaveStatus {
    /// All statuses.
    pub const ALL: [Self; 4] = [Self::Pending, Self::TlApproved, Self::Approved, Self::Rejected];

    /// Returns the string representation of the status.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "PENDING",
            Self::TlApproved => "TL_APPROVED",
            Self::Approved => "APPROVED",
            Self::Rejected => "REJECTED",
        }
    }

    /// Returns true if no further transition is defined.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Approved | Self::Rejected)
    }
}

impl fmt::Display for LeaveStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Shift-swap request status.
///
/// The valid transitions are:
/// - PendingPeer → PendingManager (peer accepts)
/// - PendingPeer → RejectedPeer (peer declines)
/// - PendingManager → Approved (manager approves, shifts are exchanged)
/// - PendingManager → RejectedManager (manager declines)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SwapStatus {
    /// Awaiting the target employee's answer.
    PendingPeer,
    /// Accepted by the peer, awaiting the manager.
    PendingManager,
    /// Approved and applied (terminal).
    Approved,
    /// Declined by the peer (terminal).
    RejectedPeer,
    /// Declined by the manager (terminal).
    RejectedManager,
}

impl SwapStatus {
    /// All statuses.
    pub const ALL: [Self; 5] = [
        Self::PendingPeer,
        Self::PendingManager,
        Self::Approved,
        Self::RejectedPeer,
        Self::RejectedManager,
    ];

    /// Returns the string representation of the status.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::PendingPeer => "PENDING_PEER",
            Self::PendingManager => "PENDING_MANAGER",
            Self::Approved => "APPROVED",
            Self::RejectedPeer => "REJECTED_PEER",
            Self::RejectedManager => "REJECTED_MANAGER",
        }
    }

    /// Returns true if no further transition is defined.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(
            self,
            Self::Approved | Self::RejectedPeer | Self::RejectedManager
        )
    }
}

impl fmt::Display for SwapStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Operations that move a leave request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LeaveAction {
    /// First-level approval.
    ApproveByTeamLead,
    /// Final approval.
    ApproveByManager,
    /// Rejection by a team lead or manager.
    Reject,
}

impl LeaveAction {
    /// All leave actions.
    pub const ALL: [Self; 3] = [Self::ApproveByTeamLead, Self::ApproveByManager, Self::Reject];

    /// Returns the string representation of the action.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::ApproveByTeamLead => "approve_by_team_lead",
            Self::ApproveByManager => "approve_by_manager",
            Self::Reject => "reject",
        }
    }
}

/// Operations that move a swap request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SwapAction {
    /// Target employee accepts.
    AcceptByPeer,
    /// Target employee declines.
    RejectByPeer,
    /// Manager approves and the shifts are exchanged.
    ApproveByManager,
    /// Manager declines.
    RejectByManager,
}

impl SwapAction {
    /// All swap actions.
    pub const ALL: [Self; 4] = [
        Self::AcceptByPeer,
        Self::RejectByPeer,
        Self::ApproveByManager,
        Self::RejectByManager,
    ];

    /// Returns the string representation of the action.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::AcceptByPeer => "accept_by_peer",
            Self::RejectByPeer => "reject_by_peer",
            Self::ApproveByManager => "approve_by_manager",
            Self::RejectByManager => "reject_by_manager",
        }
    }
}

/// A validated leave transition with its audit data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LeaveTransition {
    /// Team lead approval.
    TeamLeadApprove {
        /// Status the request moves from.
        from: LeaveStatus,
        /// The approving team lead.
        approved_by: UserId,
        /// When the approval happened.
        approved_at: DateTime<Utc>,
    },
    /// Manager approval.
    ManagerApprove {
        /// Status the request moves from.
        from: LeaveStatus,
        /// The approving manager.
        approved_by: UserId,
        /// When the approval happened.
        approved_at: DateTime<Utc>,
    },
    /// Rejection.
    Reject {
        /// Status the request moves from.
        from: LeaveStatus,
        /// The rejecting team lead or manager.
        rejected_by: UserId,
        /// When the rejection happened.
        rejected_at: DateTime<Utc>,
    },
}

impl LeaveTransition {
    /// Returns the status the request moves from.
    #[must_use]
    pub const fn from_status(&self) -> LeaveStatus {
        match self {
            Self::TeamLeadApprove { from, .. }
            | Self::ManagerApprove { from, .. }
            | Self::Reject { from, .. } => *from,
        }
    }

    /// Returns the status resulting from this transition.
    #[must_use]
    pub const fn new_status(&self) -> LeaveStatus {
        match self {
            Self::TeamLeadApprove { .. } => LeaveStatus::TlApproved,
            Self::ManagerApprove { .. } => LeaveStatus::Approved,
            Self::Reject { .. } => LeaveStatus::Rejected,
        }
    }

    /// Returns when the transition happened.
    #[must_use]
    pub const fn occurred_at(&self) -> DateTime<Utc> {
        match self {
            Self::TeamLeadApprove { approved_at, .. } | Self::ManagerApprove { approved_at, .. } => {
                *approved_at
            }
            Self::Reject { rejected_at, .. } => *rejected_at,
        }
    }
}

/// A validated swap transition with its audit data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SwapTransition {
    /// Peer acceptance.
    PeerAccept {
        /// The accepting target employee.
        accepted_by: UserId,
        /// When the acceptance happened.
        accepted_at: DateTime<Utc>,
    },
    /// Peer rejection.
    PeerReject {
        /// The declining target employee.
        rejected_by: UserId,
        /// When the rejection happened.
        rejected_at: DateTime<Utc>,
    },
    /// Manager approval.
    ManagerApprove {
        /// The approving manager.
        approved_by: UserId,
        /// When the approval happened.
        approved_at: DateTime<Utc>,
    },
    /// Manager rejection.
    ManagerReject {
        /// The declining manager.
        rejected_by: UserId,
        /// When the rejection happened.
        rejected_at: DateTime<Utc>,
    },
}

impl SwapTransition {
    /// Returns the status the request must currently hold.
    #[must_use]
    pub const fn from_status(&self) -> SwapStatus {
        match self {
            Self::PeerAccept { .. } | Self::PeerReject { .. } => SwapStatus::PendingPeer,
            Self::ManagerApprove { .. } | Self::ManagerReject { .. } => SwapStatus::PendingManager,
        }
    }

    /// Returns the status resulting from this transition.
    #[must_use]
    pub const fn new_status(&self) -> SwapStatus {
        match self {
            Self::PeerAccept { .. } => SwapStatus::PendingManager,
            Self::PeerReject { .. } => SwapStatus::RejectedPeer,
            Self::ManagerApprove { .. } => SwapStatus::Approved,
            Self::ManagerReject { .. } => SwapStatus::RejectedManager,
        }
    }

    /// Returns when the transition happened.
    #[must_use]
    pub const fn occurred_at(&self) -> DateTime<Utc> {
        match self {
            Self::PeerAccept { accepted_at, .. } => *accepted_at,
            Self::PeerReject { rejected_at, .. } | Self::ManagerReject { rejected_at, .. } => {
                *rejected_at
            }
            Self::ManagerApprove { approved_at, .. } => *approved_at,
        }
    }
}
