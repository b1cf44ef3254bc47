//! Entity store ports.
//!
//! The workflow services reach persisted state only through these traits.
//! Adapters must make two guarantees:
//! - `update_*_if_status` writes only when the stored status still equals the
//!   expected one, so racing transitions on one entity have a single winner.
//! - `commit_swap_approval` applies the swap status change and both shift
//!   reassignments as one all-or-nothing unit.

pub mod memory;

pub use memory::InMemoryStore;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;
use uuid::Uuid;

use rota_shared::types::{LeaveRequestId, ShiftId, SwapRequestId, UserId};

use crate::access::EntityKind;
use crate::model::{LeaveRequest, Shift, SwapRequest, User};
use crate::workflow::{LeaveStatus, LeaveTransition, SwapStatus, SwapTransition};

/// Result type alias using `StoreError`.
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors surfaced by entity store adapters.
#[derive(Debug, Error)]
pub enum StoreError {
    /// No entity with this id.
    #[error("{entity} {id} not found")]
    NotFound {
        /// The kind of entity.
        entity: EntityKind,
        /// The missing id.
        id: Uuid,
    },

    /// A conditional update lost: the stored status moved on.
    #[error("{entity} {id} is no longer {expected} (now {actual})")]
    StatusMismatch {
        /// The kind of entity.
        entity: EntityKind,
        /// The entity id.
        id: Uuid,
        /// Status the caller expected.
        expected: &'static str,
        /// Status actually stored.
        actual: String,
    },

    /// A shift is no longer held by the user the swap expects.
    #[error("shift {shift_id} is no longer held by the expected user")]
    OwnershipChanged {
        /// The reassigned shift.
        shift_id: Uuid,
    },

    /// A uniqueness constraint was violated.
    #[error("duplicate {0}")]
    Duplicate(String),

    /// The backend aborted the unit of work in favour of a concurrent one
    /// (deadlock or serialization failure).
    #[error("concurrent update aborted: {0}")]
    Contention(String),

    /// The backing store failed.
    #[error("{0}")]
    Backend(String),
}

/// Filter for user listings. Unset fields match everything.
#[derive(Debug, Clone, Default)]
pub struct UserFilter {
    /// Exact (lower-cased) email.
    pub email: Option<String>,
}

impl UserFilter {
    /// Returns true if `user` satisfies the filter.
    #[must_use]
    pub fn matches(&self, user: &User) -> bool {
        self.email.as_ref().is_none_or(|email| &user.email == email)
    }
}

/// Filter for shift listings.
#[derive(Debug, Clone, Copy, Default)]
pub struct ShiftFilter {
    /// Shifts currently assigned to this user.
    pub assigned_to: Option<UserId>,
}

impl ShiftFilter {
    /// Returns true if `shift` satisfies the filter.
    #[must_use]
    pub fn matches(&self, shift: &Shift) -> bool {
        self.assigned_to.is_none_or(|user| shift.assigned_to == user)
    }
}

/// Filter for leave request listings.
#[derive(Debug, Clone, Copy, Default)]
pub struct LeaveFilter {
    /// Requests owned by this user.
    pub user: Option<UserId>,
}

impl LeaveFilter {
    /// Returns true if `leave` satisfies the filter.
    #[must_use]
    pub fn matches(&self, leave: &LeaveRequest) -> bool {
        self.user.is_none_or(|user| leave.user == user)
    }
}

/// Field changes written by a leave transition. `None` leaves a field untouched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeavePatch {
    /// New status.
    pub status: LeaveStatus,
    /// Team lead approver to record.
    pub team_lead_approver: Option<UserId>,
    /// Manager approver to record.
    pub manager_approver: Option<UserId>,
    /// Rejecting user to record.
    pub rejected_by: Option<UserId>,
    /// Modification time.
    pub updated_at: DateTime<Utc>,
}

impl LeavePatch {
    /// Applies the patch to an in-memory record.
    pub fn apply_to(&self, leave: &mut LeaveRequest) {
        leave.status = self.status;
        if let Some(user) = self.team_lead_approver {
            leave.team_lead_approver = Some(user);
        }
        if let Some(user) = self.manager_approver {
            leave.manager_approver = Some(user);
        }
        if let Some(user) = self.rejected_by {
            leave.rejected_by = Some(user);
        }
        leave.updated_at = self.updated_at;
    }
}

impl From<&LeaveTransition> for LeavePatch {
    fn from(transition: &LeaveTransition) -> Self {
        let mut patch = Self {
            status: transition.new_status(),
            team_lead_approver: None,
            manager_approver: None,
            rejected_by: None,
            updated_at: transition.occurred_at(),
        };
        match transition {
            LeaveTransition::TeamLeadApprove { approved_by, .. } => {
                patch.team_lead_approver = Some(*approved_by);
            }
            LeaveTransition::ManagerApprove { approved_by, .. } => {
                patch.manager_approver = Some(*approved_by);
            }
            LeaveTransition::Reject { rejected_by, .. } => {
                patch.rejected_by = Some(*rejected_by);
            }
        }
        patch
    }
}

/// Field changes written by a swap transition that touches no shift.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SwapPatch {
    /// New status.
    pub status: SwapStatus,
    /// Rejecting user to record.
    pub rejected_by: Option<UserId>,
    /// Modification time.
    pub updated_at: DateTime<Utc>,
}

impl SwapPatch {
    /// Applies the patch to an in-memory record.
    pub fn apply_to(&self, swap: &mut SwapRequest) {
        swap.status = self.status;
        if let Some(user) = self.rejected_by {
            swap.rejected_by = Some(user);
        }
        swap.updated_at = self.updated_at;
    }
}

impl From<&SwapTransition> for SwapPatch {
    fn from(transition: &SwapTransition) -> Self {
        let rejected_by = match transition {
            SwapTransition::PeerReject { rejected_by, .. }
            | SwapTransition::ManagerReject { rejected_by, .. } => Some(*rejected_by),
            SwapTransition::PeerAccept { .. } | SwapTransition::ManagerApprove { .. } => None,
        };
        Self {
            status: transition.new_status(),
            rejected_by,
            updated_at: transition.occurred_at(),
        }
    }
}

/// Everything the store needs to commit a manager-approved swap atomically.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SwapApproval {
    /// The swap being approved.
    pub swap_id: SwapRequestId,
    /// The approving manager.
    pub approved_by: UserId,
    /// Approval time.
    pub approved_at: DateTime<Utc>,
    /// The initiator, expected to still hold `initiator_shift`.
    pub initiator: UserId,
    /// The target, expected to still hold `target_shift`.
    pub target: UserId,
    /// Shift moving from initiator to target.
    pub initiator_shift: ShiftId,
    /// Shift moving from target to initiator.
    pub target_shift: ShiftId,
}

impl SwapApproval {
    /// Builds the commit for `swap`, approved by `approved_by` at `approved_at`.
    #[must_use]
    pub fn for_swap(swap: &SwapRequest, approved_by: UserId, approved_at: DateTime<Utc>) -> Self {
        Self {
            swap_id: swap.id,
            approved_by,
            approved_at,
            initiator: swap.initiator,
            target: swap.target,
            initiator_shift: swap.initiator_shift,
            target_shift: swap.target_shift,
        }
    }

    /// The two shift moves, in ascending shift id order.
    ///
    /// Adapters that lock rows must reassign in this order so that opposing
    /// swaps over the same pair of shifts cannot deadlock.
    #[must_use]
    pub fn moves(&self) -> [ShiftMove; 2] {
        let mut moves = [
            ShiftMove {
                shift_id: self.initiator_shift,
                from: self.initiator,
                to: self.target,
            },
            ShiftMove {
                shift_id: self.target_shift,
                from: self.target,
                to: self.initiator,
            },
        ];
        moves.sort_by_key(|m| m.shift_id);
        moves
    }
}

/// One side of an approved swap: `shift_id` passes from `from` to `to`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShiftMove {
    /// The reassigned shift.
    pub shift_id: ShiftId,
    /// Expected current holder.
    pub from: UserId,
    /// New holder.
    pub to: UserId,
}

/// Persistence port for users.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Inserts a new user. Fails with `Duplicate` on a taken email.
    async fn insert_user(&self, user: User) -> StoreResult<User>;

    /// Finds a user by id.
    async fn find_user(&self, id: UserId) -> StoreResult<Option<User>>;

    /// Lists users matching `filter`, oldest first.
    async fn find_users(&self, filter: &UserFilter) -> StoreResult<Vec<User>>;
}

/// Persistence port for shifts.
#[async_trait]
pub trait ShiftStore: Send + Sync {
    /// Inserts a new shift.
    async fn insert_shift(&self, shift: Shift) -> StoreResult<Shift>;

    /// Finds a shift by id.
    async fn find_shift(&self, id: ShiftId) -> StoreResult<Option<Shift>>;

    /// Lists shifts matching `filter`, oldest first.
    async fn find_shifts(&self, filter: &ShiftFilter) -> StoreResult<Vec<Shift>>;
}

/// Persistence port for leave requests.
#[async_trait]
pub trait LeaveStore: Send + Sync {
    /// Inserts a new leave request.
    async fn insert_leave(&self, leave: LeaveRequest) -> StoreResult<LeaveRequest>;

    /// Finds a leave request by id.
    async fn find_leave(&self, id: LeaveRequestId) -> StoreResult<Option<LeaveRequest>>;

    /// Lists leave requests matching `filter`, oldest first.
    async fn find_leaves(&self, filter: &LeaveFilter) -> StoreResult<Vec<LeaveRequest>>;

    /// Applies `patch` only if the stored status equals `expected`.
    async fn update_leave_if_status(
        &self,
        id: LeaveRequestId,
        expected: LeaveStatus,
        patch: &LeavePatch,
    ) -> StoreResult<LeaveRequest>;
}

/// Persistence port for swap requests.
#[async_trait]
pub trait SwapStore: Send + Sync {
    /// Inserts a new swap request.
    async fn insert_swap(&self, swap: SwapRequest) -> StoreResult<SwapRequest>;

    /// Finds a swap request by id.
    async fn find_swap(&self, id: SwapRequestId) -> StoreResult<Option<SwapRequest>>;

    /// Lists every swap request, oldest first.
    async fn find_swaps(&self) -> StoreResult<Vec<SwapRequest>>;

    /// Applies `patch` only if the stored status equals `expected`.
    async fn update_swap_if_status(
        &self,
        id: SwapRequestId,
        expected: SwapStatus,
        patch: &SwapPatch,
    ) -> StoreResult<SwapRequest>;

    /// Marks the swap Approved and exchanges `assigned_to` between its two
    /// shifts, all or nothing.
    ///
    /// Fails with `StatusMismatch` unless the swap is PendingManager, and with
    /// `OwnershipChanged` unless each shift is still held by its expected user.
    async fn commit_swap_approval(&self, approval: &SwapApproval) -> StoreResult<SwapRequest>;
}

/// The complete entity store consumed by the workflow services.
pub trait EntityStore: UserStore + ShiftStore + LeaveStore + SwapStore {}

impl<T> EntityStore for T where T: UserStore + ShiftStore + LeaveStore + SwapStore {}
