use async_trait::async_trait;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set, TransactionTrait,
};

use rota_core::access::EntityKind;
use rota_core::model::LeaveRequest;
use rota_core::store::{LeaveFilter, LeavePatch, LeaveStore, StoreError, StoreResult};
use rota_core::workflow::LeaveStatus as CoreLeaveStatus;
use rota_shared::types::{LeaveRequestId, UserId};

use super::{SeaOrmStore, store_err};
use crate::entities::{leave_requests, sea_orm_active_enums::LeaveStatus};

impl From<leave_requests::Model> for LeaveRequest {
    fn from(model: leave_requests::Model) -> Self {
        Self {
            id: LeaveRequestId::from_uuid(model.id),
            user: UserId::from_uuid(model.user_id),
            start_date: model.start_date,
            end_date: model.end_date,
            reason: model.reason,
            status: model.status.into(),
            team_lead_approver: model.team_lead_approver.map(UserId::from_uuid),
            manager_approver: model.manager_approver.map(UserId::from_uuid),
            rejected_by: model.rejected_by.map(UserId::from_uuid),
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

#[async_trait]
impl LeaveStore for SeaOrmStore {
    async fn insert_leave(&self, leave: LeaveRequest) -> StoreResult<LeaveRequest> {
        let active = leave_requests::ActiveModel {
            id: Set(leave.id.into_inner()),
            user_id: Set(leave.user.into_inner()),
            start_date: Set(leave.start_date),
            end_date: Set(leave.end_date),
            reason: Set(leave.reason),
            status: Set(LeaveStatus::from(leave.status)),
            team_lead_approver: Set(leave.team_lead_approver.map(UserId::into_inner)),
            manager_approver: Set(leave.manager_approver.map(UserId::into_inner)),
            rejected_by: Set(leave.rejected_by.map(UserId::into_inner)),
            created_at: Set(leave.created_at),
            updated_at: Set(leave.updated_at),
        };
        let model = active.insert(&self.db).await.map_err(store_err)?;
        Ok(model.into())
    }

    async fn find_leave(&self, id: LeaveRequestId) -> StoreResult<Option<LeaveRequest>> {
        let model = leave_requests::Entity::find_by_id(id.into_inner())
            .one(&self.db)
            .await
            .map_err(store_err)?;
        Ok(model.map(LeaveRequest::from))
    }

    async fn find_leaves(&self, filter: &LeaveFilter) -> StoreResult<Vec<LeaveRequest>> {
        let mut query = leave_requests::Entity::find();
        if let Some(user) = filter.user {
            query = query.filter(leave_requests::Column::UserId.eq(user.into_inner()));
        }
        let models = query
            .order_by_asc(leave_requests::Column::CreatedAt)
            .order_by_asc(leave_requests::Column::Id)
            .all(&self.db)
            .await
            .map_err(store_err)?;
        Ok(models.into_iter().map(LeaveRequest::from).collect())
    }

    async fn update_leave_if_status(
        &self,
        id: LeaveRequestId,
        expected: CoreLeaveStatus,
        patch: &LeavePatch,
    ) -> StoreResult<LeaveRequest> {
        let mut update = leave_requests::Entity::update_many()
            .col_expr(
                leave_requests::Column::Status,
                Expr::value(LeaveStatus::from(patch.status)),
            )
            .col_expr(
                leave_requests::Column::UpdatedAt,
                Expr::value(patch.updated_at),
            );
        if let Some(user) = patch.team_lead_approver {
            update = update.col_expr(
                leave_requests::Column::TeamLeadApprover,
                Expr::value(user.into_inner()),
            );
        }
        if let Some(user) = patch.manager_approver {
            update = update.col_expr(
                leave_requests::Column::ManagerApprover,
                Expr::value(user.into_inner()),
            );
        }
        if let Some(user) = patch.rejected_by {
            update = update.col_expr(
                leave_requests::Column::RejectedBy,
                Expr::value(user.into_inner()),
            );
        }

        let txn = self.db.begin().await.map_err(store_err)?;
        let result = update
            .filter(leave_requests::Column::Id.eq(id.into_inner()))
            .filter(leave_requests::Column::Status.eq(LeaveStatus::from(expected)))
            .exec(&txn)
            .await
            .map_err(store_err)?;
        let current = leave_requests::Entity::find_by_id(id.into_inner())
            .one(&txn)
            .await
            .map_err(store_err)?
            .map(LeaveRequest::from)
            .ok_or(StoreError::NotFound {
                entity: EntityKind::Leave,
                id: id.into_inner(),
            })?;
        txn.commit().await.map_err(store_err)?;

        if result.rows_affected == 0 {
            tracing::debug!(
                leave_id = %id,
                expected = %expected,
                actual = %current.status,
                "conditional leave update matched no row"
            );
            return Err(StoreError::StatusMismatch {
                entity: EntityKind::Leave,
                id: id.into_inner(),
                expected: expected.as_str(),
                actual: current.status.to_string(),
            });
        }
        Ok(current)
    }
}
