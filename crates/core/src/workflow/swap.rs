//! Shift-swap request state machine.
//!
//! Only status preconditions live here. Target ownership and shift ownership
//! are checked by the swap service against loaded entities.

use chrono::Utc;

use rota_shared::types::UserId;

use crate::access::EntityKind;
use crate::workflow::error::WorkflowError;
use crate::workflow::types::{SwapAction, SwapStatus, SwapTransition};

/// Stateless service for swap request transitions.
pub struct SwapMachine;

impl SwapMachine {
    /// Peer accepts the proposal. Requires PendingPeer.
    pub fn accept_by_peer(
        current: SwapStatus,
        accepted_by: UserId,
    ) -> Result<SwapTransition, WorkflowError> {
        match current {
            SwapStatus::PendingPeer => Ok(SwapTransition::PeerAccept {
                accepted_by,
                accepted_at: Utc::now(),
            }),
            _ => Err(invalid(current, SwapAction::AcceptByPeer)),
        }
    }

    /// Peer declines the proposal. Requires PendingPeer.
    pub fn reject_by_peer(
        current: SwapStatus,
        rejected_by: UserId,
    ) -> Result<SwapTransition, WorkflowError> {
        match current {
            SwapStatus::PendingPeer => Ok(SwapTransition::PeerReject {
                rejected_by,
                rejected_at: Utc::now(),
            }),
            _ => Err(invalid(current, SwapAction::RejectByPeer)),
        }
    }

    /// Manager approves a peer-accepted swap. Requires PendingManager.
    pub fn approve_by_manager(
        current: SwapStatus,
        approved_by: UserId,
    ) -> Result<SwapTransition, WorkflowError> {
        match current {
            SwapStatus::PendingManager => Ok(SwapTransition::ManagerApprove {
                approved_by,
                approved_at: Utc::now(),
            }),
            _ => Err(invalid(current, SwapAction::ApproveByManager)),
        }
    }

    /// Manager declines a peer-accepted swap. Requires PendingManager.
    pub fn reject_by_manager(
        current: SwapStatus,
        rejected_by: UserId,
    ) -> Result<SwapTransition, WorkflowError> {
        match current {
            SwapStatus::PendingManager => Ok(SwapTransition::ManagerReject {
                rejected_by,
                rejected_at: Utc::now(),
            }),
            _ => Err(invalid(current, SwapAction::RejectByManager)),
        }
    }

    /// Dispatches `action` to the matching transition function.
    pub fn apply(
        current: SwapStatus,
        action: SwapAction,
        actor: UserId,
    ) -> Result<SwapTransition, WorkflowError> {
        match action {
            SwapAction::AcceptByPeer => Self::accept_by_peer(current, actor),
            SwapAction::RejectByPeer => Self::reject_by_peer(current, actor),
            SwapAction::ApproveByManager => Self::approve_by_manager(current, actor),
            SwapAction::RejectByManager => Self::reject_by_manager(current, actor),
        }
    }

    /// Check if a status transition is valid.
    ///
    /// Valid transitions:
    /// - PendingPeer → PendingManager
    /// - PendingPeer → RejectedPeer
    /// - PendingManager → Approved
    /// - PendingManager → RejectedManager
    #[must_use]
    pub fn is_valid_transition(from: SwapStatus, to: SwapStatus) -> bool {
        matches!(
            (from, to),
            (
                SwapStatus::PendingPeer,
                SwapStatus::PendingManager | SwapStatus::RejectedPeer
            ) | (
                SwapStatus::PendingManager,
                SwapStatus::Approved | SwapStatus::RejectedManager
            )
        )
    }
}

fn invalid(current: SwapStatus, action: SwapAction) -> WorkflowError {
    WorkflowError::InvalidState {
        entity: EntityKind::Swap,
        status: current.as_str(),
        action: action.as_str(),
    }
}
