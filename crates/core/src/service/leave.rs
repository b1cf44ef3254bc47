use std::sync::Arc;

use rota_shared::types::LeaveRequestId;

use crate::access::{AccessPolicy, Action, EntityKind, ListScope, Principal};
use crate::model::{LeaveRequest, LeaveRequestInput};
use crate::notify::{DomainEvent, NotificationSink};
use crate::store::{EntityStore, LeaveFilter, LeavePatch};
use crate::workflow::{LeaveAction, LeaveMachine, WorkflowError};

/// Leave request lifecycle: request, team-lead approval, manager approval,
/// rejection and listing.
#[derive(Clone)]
pub struct LeaveWorkflow {
    store: Arc<dyn EntityStore>,
    sink: Arc<dyn NotificationSink>,
}

impl LeaveWorkflow {
    /// Creates the workflow over `store`, publishing to `sink`.
    #[must_use]
    pub fn new(store: Arc<dyn EntityStore>, sink: Arc<dyn NotificationSink>) -> Self {
        Self { store, sink }
    }

    /// Files a new Pending leave request owned by the caller.
    ///
    /// # Errors
    ///
    /// `Validation` if a field is missing or `end_date < start_date`.
    pub async fn request_leave(
        &self,
        principal: &Principal,
        input: LeaveRequestInput,
    ) -> Result<LeaveRequest, WorkflowError> {
        AccessPolicy::authorize(principal, Action::RequestLeave)?;
        let leave = input.into_request(principal.id)?;
        let leave = self.store.insert_leave(leave).await?;
        tracing::info!(
            leave_id = %leave.id,
            user_id = %leave.user,
            start = %leave.start_date,
            end = %leave.end_date,
            "leave requested"
        );
        Ok(leave)
    }

    /// First-level approval: Pending → TlApproved.
    pub async fn approve_by_team_lead(
        &self,
        principal: &Principal,
        id: LeaveRequestId,
    ) -> Result<LeaveRequest, WorkflowError> {
        AccessPolicy::authorize(principal, Action::ApproveLeaveAsTeamLead)?;
        self.transition(principal, id, LeaveAction::ApproveByTeamLead)
            .await
    }

    /// Final approval from Pending or TlApproved. Emits `leaveApproved`.
    pub async fn approve_by_manager(
        &self,
        principal: &Principal,
        id: LeaveRequestId,
    ) -> Result<LeaveRequest, WorkflowError> {
        AccessPolicy::authorize(principal, Action::ApproveLeaveAsManager)?;
        let leave = self
            .transition(principal, id, LeaveAction::ApproveByManager)
            .await?;
        self.sink.publish(DomainEvent::LeaveApproved(leave.clone()));
        Ok(leave)
    }

    /// Rejects a non-terminal request. Emits `leaveRejected`.
    pub async fn reject(
        &self,
        principal: &Principal,
        id: LeaveRequestId,
    ) -> Result<LeaveRequest, WorkflowError> {
        AccessPolicy::authorize(principal, Action::RejectLeave)?;
        let leave = self.transition(principal, id, LeaveAction::Reject).await?;
        self.sink.publish(DomainEvent::LeaveRejected(leave.clone()));
        Ok(leave)
    }

    /// Lists leave requests: all for team leads and managers, own for employees.
    pub async fn list(&self, principal: &Principal) -> Result<Vec<LeaveRequest>, WorkflowError> {
        AccessPolicy::authorize(principal, Action::ListLeave)?;
        let filter = match AccessPolicy::list_scope(principal.role, EntityKind::Leave) {
            ListScope::Own => LeaveFilter {
                user: Some(principal.id),
            },
            ListScope::All => LeaveFilter::default(),
        };
        Ok(self.store.find_leaves(&filter).await?)
    }

    /// Load, check, and persist conditionally on the status that was checked.
    async fn transition(
        &self,
        principal: &Principal,
        id: LeaveRequestId,
        action: LeaveAction,
    ) -> Result<LeaveRequest, WorkflowError> {
        let current = self.load(id).await?;
        let transition = LeaveMachine::apply(current.status, action, principal.id)
            .inspect_err(|_| {
                tracing::debug!(
                    leave_id = %id,
                    status = %current.status,
                    action = action.as_str(),
                    "leave transition refused"
                );
            })?;

        let patch = LeavePatch::from(&transition);
        let updated = self
            .store
            .update_leave_if_status(id, current.status, &patch)
            .await
            .map_err(|err| {
                tracing::warn!(leave_id = %id, error = %err, "leave update lost a race");
                WorkflowError::from(err)
            })?;

        tracing::info!(
            leave_id = %id,
            by = %principal.id,
            from = %current.status,
            to = %updated.status,
            "leave request transitioned"
        );
        Ok(updated)
    }

    async fn load(&self, id: LeaveRequestId) -> Result<LeaveRequest, WorkflowError> {
        self.store
            .find_leave(id)
            .await?
            .ok_or(WorkflowError::NotFound {
                entity: EntityKind::Leave,
                id: id.into_inner(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notify::MockNotificationSink;
    use crate::service::fixtures::Harness;
    use crate::workflow::LeaveStatus;
    use chrono::NaiveDate;
    use futures::future::join_all;

    fn input(from: u32, to: u32) -> LeaveRequestInput {
        LeaveRequestInput {
            start_date: NaiveDate::from_ymd_opt(2025, 1, from),
            end_date: NaiveDate::from_ymd_opt(2025, 1, to),
            reason: Some("family".to_string()),
        }
    }

    #[tokio::test]
    async fn test_two_stage_approval() {
        let h = Harness::new().await;
        let leave = h
            .services
            .leave
            .request_leave(&h.alice, input(10, 12))
            .await
            .unwrap();
        assert_eq!(leave.status, LeaveStatus::Pending);

        let leave = h
            .services
            .leave
            .approve_by_team_lead(&h.lead, leave.id)
            .await
            .unwrap();
        assert_eq!(leave.status, LeaveStatus::TlApproved);
        assert_eq!(leave.team_lead_approver, Some(h.lead.id));

        let leave = h
            .services
            .leave
            .approve_by_manager(&h.manager, leave.id)
            .await
            .unwrap();
        assert_eq!(leave.status, LeaveStatus::Approved);
        assert_eq!(leave.team_lead_approver, Some(h.lead.id));
        assert_eq!(leave.manager_approver, Some(h.manager.id));
        assert!(leave.status.is_terminal());
    }

    #[tokio::test]
    async fn test_team_lead_cannot_approve_approved_request() {
        let h = Harness::new().await;
        let leave = h
            .services
            .leave
            .request_leave(&h.alice, input(10, 12))
            .await
            .unwrap();
        h.services
            .leave
            .approve_by_manager(&h.manager, leave.id)
            .await
            .unwrap();

        let err = h
            .services
            .leave
            .approve_by_team_lead(&h.lead, leave.id)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            WorkflowError::InvalidState {
                entity: EntityKind::Leave,
                status: "APPROVED",
                ..
            }
        ));
    }

    #[tokio::test]
    async fn test_manager_bypass_leaves_team_lead_empty() {
        let h = Harness::new().await;
        let leave = h
            .services
            .leave
            .request_leave(&h.alice, input(3, 3))
            .await
            .unwrap();
        let leave = h
            .services
            .leave
            .approve_by_manager(&h.manager, leave.id)
            .await
            .unwrap();
        assert_eq!(leave.status, LeaveStatus::Approved);
        assert!(leave.team_lead_approver.is_none());
    }

    #[tokio::test]
    async fn test_reject_records_rejecter_and_is_final() {
        let h = Harness::new().await;
        let leave = h
            .services
            .leave
            .request_leave(&h.alice, input(5, 6))
            .await
            .unwrap();
        let leave = h
            .services
            .leave
            .reject(&h.lead, leave.id)
            .await
            .unwrap();
        assert_eq!(leave.status, LeaveStatus::Rejected);
        assert_eq!(leave.rejected_by, Some(h.lead.id));

        let err = h
            .services
            .leave
            .approve_by_manager(&h.manager, leave.id)
            .await
            .unwrap_err();
        assert!(matches!(err, WorkflowError::InvalidState { .. }));
    }

    #[tokio::test]
    async fn test_manager_reject_after_team_lead_keeps_team_lead_approver() {
        let h = Harness::new().await;
        let leave = h
            .services
            .leave
            .request_leave(&h.alice, input(7, 8))
            .await
            .unwrap();
        h.services
            .leave
            .approve_by_team_lead(&h.lead, leave.id)
            .await
            .unwrap();

        let leave = h
            .services
            .leave
            .reject(&h.manager, leave.id)
            .await
            .unwrap();
        assert_eq!(leave.status, LeaveStatus::Rejected);
        assert_eq!(leave.rejected_by, Some(h.manager.id));
        assert_eq!(leave.team_lead_approver, Some(h.lead.id));
        assert_eq!(leave.manager_approver, None);
    }

    #[tokio::test]
    async fn test_role_gates() {
        let h = Harness::new().await;
        let leave = h
            .services
            .leave
            .request_leave(&h.alice, input(5, 6))
            .await
            .unwrap();

        let err = h
            .services
            .leave
            .approve_by_team_lead(&h.manager, leave.id)
            .await
            .unwrap_err();
        assert!(matches!(err, WorkflowError::NotPermitted { .. }));

        let err = h
            .services
            .leave
            .approve_by_manager(&h.lead, leave.id)
            .await
            .unwrap_err();
        assert!(matches!(err, WorkflowError::NotPermitted { .. }));

        let err = h
            .services
            .leave
            .reject(&h.bob, leave.id)
            .await
            .unwrap_err();
        assert!(matches!(err, WorkflowError::NotPermitted { .. }));

        let err = h
            .services
            .leave
            .request_leave(&h.manager, input(1, 2))
            .await
            .unwrap_err();
        assert!(matches!(err, WorkflowError::NotPermitted { .. }));
    }

    #[tokio::test]
    async fn test_unknown_request_not_found() {
        let h = Harness::new().await;
        let err = h
            .services
            .leave
            .approve_by_team_lead(&h.lead, LeaveRequestId::new())
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            WorkflowError::NotFound {
                entity: EntityKind::Leave,
                ..
            }
        ));
    }

    #[tokio::test]
    async fn test_invalid_dates_write_nothing() {
        let h = Harness::new().await;
        let err = h
            .services
            .leave
            .request_leave(&h.alice, input(12, 10))
            .await
            .unwrap_err();
        assert!(matches!(err, WorkflowError::Validation(_)));
        assert!(h.services.leave.list(&h.manager).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_list_scope() {
        let h = Harness::new().await;
        h.services
            .leave
            .request_leave(&h.alice, input(1, 2))
            .await
            .unwrap();
        h.services
            .leave
            .request_leave(&h.bob, input(3, 4))
            .await
            .unwrap();

        let own = h.services.leave.list(&h.alice).await.unwrap();
        assert_eq!(own.len(), 1);
        assert_eq!(own[0].user, h.alice.id);

        assert_eq!(h.services.leave.list(&h.lead).await.unwrap().len(), 2);
        assert_eq!(h.services.leave.list(&h.manager).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_racing_approvals_have_one_winner() {
        let h = Harness::new().await;
        let leave = h
            .services
            .leave
            .request_leave(&h.alice, input(7, 8))
            .await
            .unwrap();

        let attempts = (0..8).map(|_| {
            let leave_service = h.services.leave.clone();
            let lead = h.lead;
            tokio::spawn(async move { leave_service.approve_by_team_lead(&lead, leave.id).await })
        });
        let results: Vec<_> = join_all(attempts)
            .await
            .into_iter()
            .map(|joined| joined.unwrap())
            .collect();

        let winners = results.iter().filter(|r| r.is_ok()).count();
        assert_eq!(winners, 1);
        assert!(results.iter().filter_map(|r| r.as_ref().err()).all(|err| matches!(
            err,
            WorkflowError::InvalidState { .. } | WorkflowError::Conflict(_)
        )));
    }

    #[tokio::test]
    async fn test_events_emitted_on_final_transitions_only() {
        let mut sink = MockNotificationSink::new();
        sink.expect_publish()
            .withf(|event| event.name() == "leaveApproved")
            .times(1)
            .return_const(());
        sink.expect_publish()
            .withf(|event| event.name() == "leaveRejected")
            .times(1)
            .return_const(());
        let h = Harness::with_sink(Arc::new(sink)).await;

        let first = h
            .services
            .leave
            .request_leave(&h.alice, input(1, 1))
            .await
            .unwrap();
        h.services
            .leave
            .approve_by_team_lead(&h.lead, first.id)
            .await
            .unwrap();
        h.services
            .leave
            .approve_by_manager(&h.manager, first.id)
            .await
            .unwrap();

        let second = h
            .services
            .leave
            .request_leave(&h.bob, input(2, 2))
            .await
            .unwrap();
        h.services
            .leave
            .reject(&h.manager, second.id)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_failed_transition_emits_nothing() {
        let mut sink = MockNotificationSink::new();
        sink.expect_publish().times(0);
        let h = Harness::with_sink(Arc::new(sink)).await;

        let err = h
            .services
            .leave
            .approve_by_manager(&h.manager, LeaveRequestId::new())
            .await
            .unwrap_err();
        assert!(matches!(err, WorkflowError::NotFound { .. }));
    }
}
