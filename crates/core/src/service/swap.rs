use std::sync::Arc;

use chrono::Utc;

use rota_shared::types::{ShiftId, SwapRequestId, UserId};

use crate::access::{AccessPolicy, Action, EntityKind, Principal};
use crate::model::{Shift, SwapProposal, SwapRequest, required};
use crate::notify::{DomainEvent, NotificationSink};
use crate::store::{EntityStore, SwapApproval, SwapPatch};
use crate::workflow::{SwapAction, SwapMachine, SwapStatus, SwapTransition, WorkflowError};

/// Shift-swap lifecycle: proposal, peer answer, manager decision.
///
/// Shift ownership is verified at proposal and again at approval, where the
/// store commits the status change and both reassignments atomically.
#[derive(Clone)]
pub struct SwapWorkflow {
    store: Arc<dyn EntityStore>,
    sink: Arc<dyn NotificationSink>,
}

impl SwapWorkflow {
    /// Creates the workflow over `store`, publishing to `sink`.
    #[must_use]
    pub fn new(store: Arc<dyn EntityStore>, sink: Arc<dyn NotificationSink>) -> Self {
        Self { store, sink }
    }

    /// Proposes exchanging the caller's shift for a peer's shift.
    ///
    /// # Errors
    ///
    /// `Validation` if a field is missing, the peer is the caller, both shift
    /// ids are equal, a shift does not exist, or either shift is not held by
    /// the expected user.
    pub async fn propose(
        &self,
        principal: &Principal,
        proposal: SwapProposal,
    ) -> Result<SwapRequest, WorkflowError> {
        AccessPolicy::authorize(principal, Action::ProposeSwap)?;
        let target = required(proposal.target_user_id, "targetUserId")?;
        let my_shift = required(proposal.my_shift_id, "myShiftId")?;
        let target_shift = required(proposal.target_shift_id, "targetShiftId")?;
        if target == principal.id {
            return Err(WorkflowError::Validation(
                "cannot swap a shift with yourself".to_string(),
            ));
        }
        if my_shift == target_shift {
            return Err(WorkflowError::Validation(
                "myShiftId and targetShiftId must differ".to_string(),
            ));
        }

        self.expect_holder(my_shift, principal.id).await?;
        self.expect_holder(target_shift, target).await?;

        let now = Utc::now();
        let swap = SwapRequest {
            id: SwapRequestId::new(),
            initiator: principal.id,
            target,
            initiator_shift: my_shift,
            target_shift,
            status: SwapStatus::PendingPeer,
            manager_approver: None,
            rejected_by: None,
            created_at: now,
            updated_at: now,
        };
        let swap = self.store.insert_swap(swap).await?;
        tracing::info!(
            swap_id = %swap.id,
            initiator = %swap.initiator,
            target = %swap.target,
            "swap proposed"
        );
        Ok(swap)
    }

    /// The peer accepts: PendingPeer → PendingManager.
    ///
    /// # Errors
    ///
    /// `InvalidState` unless PendingPeer, `Forbidden` unless the caller is the target.
    pub async fn accept_by_peer(
        &self,
        principal: &Principal,
        id: SwapRequestId,
    ) -> Result<SwapRequest, WorkflowError> {
        AccessPolicy::authorize(principal, Action::AcceptSwap)?;
        self.peer_answer(principal, id, SwapAction::AcceptByPeer)
            .await
    }

    /// The peer declines: PendingPeer → RejectedPeer. Emits `swapRejected`.
    pub async fn reject_by_peer(
        &self,
        principal: &Principal,
        id: SwapRequestId,
    ) -> Result<SwapRequest, WorkflowError> {
        AccessPolicy::authorize(principal, Action::RejectSwapAsPeer)?;
        let swap = self
            .peer_answer(principal, id, SwapAction::RejectByPeer)
            .await?;
        self.sink.publish(DomainEvent::SwapRejected(swap.clone()));
        Ok(swap)
    }

    /// Manager approval: re-checks shift ownership, then commits the status
    /// change and both reassignments as one unit. Emits `swapApproved`.
    ///
    /// # Errors
    ///
    /// `InvalidState` unless PendingManager, `Conflict` if either shift has
    /// changed hands since the proposal or a concurrent approval won.
    pub async fn approve_by_manager(
        &self,
        principal: &Principal,
        id: SwapRequestId,
    ) -> Result<SwapRequest, WorkflowError> {
        AccessPolicy::authorize(principal, Action::ApproveSwap)?;
        let current = self.load(id).await?;
        let approved_at =
            SwapMachine::approve_by_manager(current.status, principal.id)?.occurred_at();

        let initiator_shift = self.load_shift(current.initiator_shift).await?;
        let target_shift = self.load_shift(current.target_shift).await?;
        for (shift, holder) in [
            (&initiator_shift, current.initiator),
            (&target_shift, current.target),
        ] {
            if shift.assigned_to != holder {
                tracing::warn!(
                    swap_id = %id,
                    shift_id = %shift.id,
                    expected = %holder,
                    actual = %shift.assigned_to,
                    "swap approval refused, shift changed hands"
                );
                return Err(WorkflowError::Conflict(format!(
                    "shift {} is no longer held by {holder}",
                    shift.id
                )));
            }
        }

        let approval = SwapApproval::for_swap(&current, principal.id, approved_at);
        let swap = self
            .store
            .commit_swap_approval(&approval)
            .await
            .map_err(|err| {
                tracing::warn!(swap_id = %id, error = %err, "swap commit refused");
                WorkflowError::from(err)
            })?;

        tracing::info!(
            swap_id = %id,
            by = %principal.id,
            initiator_shift = %swap.initiator_shift,
            target_shift = %swap.target_shift,
            "swap approved, shifts exchanged"
        );
        self.sink.publish(DomainEvent::SwapApproved(swap.clone()));
        Ok(swap)
    }

    /// Manager declines: PendingManager → RejectedManager. No shift is touched.
    /// Emits `swapRejected`.
    pub async fn reject_by_manager(
        &self,
        principal: &Principal,
        id: SwapRequestId,
    ) -> Result<SwapRequest, WorkflowError> {
        AccessPolicy::authorize(principal, Action::RejectSwapAsManager)?;
        let current = self.load(id).await?;
        let transition = SwapMachine::reject_by_manager(current.status, principal.id)?;
        let swap = self.persist(&current, &transition).await?;
        self.sink.publish(DomainEvent::SwapRejected(swap.clone()));
        Ok(swap)
    }

    /// Lists every swap request. Open to all roles.
    pub async fn list(&self, principal: &Principal) -> Result<Vec<SwapRequest>, WorkflowError> {
        AccessPolicy::authorize(principal, Action::ListSwaps)?;
        Ok(self.store.find_swaps().await?)
    }

    async fn peer_answer(
        &self,
        principal: &Principal,
        id: SwapRequestId,
        action: SwapAction,
    ) -> Result<SwapRequest, WorkflowError> {
        let current = self.load(id).await?;
        let transition = SwapMachine::apply(current.status, action, principal.id)?;
        if current.target != principal.id {
            return Err(WorkflowError::Forbidden(format!(
                "only the swap target may {}",
                action.as_str()
            )));
        }
        self.persist(&current, &transition).await
    }

    async fn persist(
        &self,
        current: &SwapRequest,
        transition: &SwapTransition,
    ) -> Result<SwapRequest, WorkflowError> {
        let patch = SwapPatch::from(transition);
        let updated = self
            .store
            .update_swap_if_status(current.id, current.status, &patch)
            .await
            .map_err(|err| {
                tracing::warn!(swap_id = %current.id, error = %err, "swap update lost a race");
                WorkflowError::from(err)
            })?;
        tracing::info!(
            swap_id = %current.id,
            from = %current.status,
            to = %updated.status,
            "swap request transitioned"
        );
        Ok(updated)
    }

    async fn expect_holder(&self, id: ShiftId, holder: UserId) -> Result<(), WorkflowError> {
        let shift = self
            .store
            .find_shift(id)
            .await?
            .ok_or_else(|| WorkflowError::Validation(format!("shift {id} does not exist")))?;
        if shift.assigned_to == holder {
            Ok(())
        } else {
            Err(WorkflowError::Validation(format!(
                "shift {id} is not assigned to {holder}"
            )))
        }
    }

    async fn load(&self, id: SwapRequestId) -> Result<SwapRequest, WorkflowError> {
        self.store
            .find_swap(id)
            .await?
            .ok_or(WorkflowError::NotFound {
                entity: EntityKind::Swap,
                id: id.into_inner(),
            })
    }

    async fn load_shift(&self, id: ShiftId) -> Result<Shift, WorkflowError> {
        self.store
            .find_shift(id)
            .await?
            .ok_or(WorkflowError::NotFound {
                entity: EntityKind::Shift,
                id: id.into_inner(),
            })
    }
}
