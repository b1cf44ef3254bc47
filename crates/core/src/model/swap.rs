use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use rota_shared::types::{ShiftId, SwapRequestId, UserId};

use crate::workflow::SwapStatus;

/// A proposal to exchange two shifts between two employees.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SwapRequest {
    /// Swap request ID.
    pub id: SwapRequestId,
    /// The employee proposing the swap.
    pub initiator: UserId,
    /// The peer asked to take the initiator's shift.
    pub target: UserId,
    /// Shift held by the initiator at proposal time.
    pub initiator_shift: ShiftId,
    /// Shift held by the target at proposal time.
    pub target_shift: ShiftId,
    /// Current status.
    pub status: SwapStatus,
    /// Manager who approved the swap.
    pub manager_approver: Option<UserId>,
    /// Peer or manager who declined the swap.
    pub rejected_by: Option<UserId>,
    /// When the swap was proposed.
    pub created_at: DateTime<Utc>,
    /// When the swap last changed status.
    pub updated_at: DateTime<Utc>,
}

/// Employee payload for proposing a swap.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SwapProposal {
    /// The peer to swap with.
    pub target_user_id: Option<UserId>,
    /// The caller's own shift.
    pub my_shift_id: Option<ShiftId>,
    /// The peer's shift.
    pub target_shift_id: Option<ShiftId>,
}
