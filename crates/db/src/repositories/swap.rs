use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder, Set,
    TransactionTrait,
};

use rota_core::access::EntityKind;
use rota_core::model::SwapRequest;
use rota_core::store::{ShiftMove, StoreError, StoreResult, SwapApproval, SwapPatch, SwapStore};
use rota_core::workflow::SwapStatus as CoreSwapStatus;
use rota_shared::types::{ShiftId, SwapRequestId, UserId};

use super::{SeaOrmStore, store_err};
use crate::entities::{sea_orm_active_enums::SwapStatus, shifts, swap_requests};

impl From<swap_requests::Model> for SwapRequest {
    fn from(model: swap_requests::Model) -> Self {
        Self {
            id: SwapRequestId::from_uuid(model.id),
            initiator: UserId::from_uuid(model.initiator_id),
            target: UserId::from_uuid(model.target_id),
            initiator_shift: ShiftId::from_uuid(model.initiator_shift_id),
            target_shift: ShiftId::from_uuid(model.target_shift_id),
            status: model.status.into(),
            manager_approver: model.manager_approver.map(UserId::from_uuid),
            rejected_by: model.rejected_by.map(UserId::from_uuid),
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

/// Loads a swap through `conn`, failing with `NotFound` when absent.
async fn load_swap<C: ConnectionTrait>(conn: &C, id: SwapRequestId) -> StoreResult<SwapRequest> {
    swap_requests::Entity::find_by_id(id.into_inner())
        .one(conn)
        .await
        .map_err(store_err)?
        .map(SwapRequest::from)
        .ok_or(StoreError::NotFound {
            entity: EntityKind::Swap,
            id: id.into_inner(),
        })
}

fn mismatch(id: SwapRequestId, expected: CoreSwapStatus, actual: CoreSwapStatus) -> StoreError {
    StoreError::StatusMismatch {
        entity: EntityKind::Swap,
        id: id.into_inner(),
        expected: expected.as_str(),
        actual: actual.to_string(),
    }
}

#[async_trait]
impl SwapStore for SeaOrmStore {
    async fn insert_swap(&self, swap: SwapRequest) -> StoreResult<SwapRequest> {
        let active = swap_requests::ActiveModel {
            id: Set(swap.id.into_inner()),
            initiator_id: Set(swap.initiator.into_inner()),
            target_id: Set(swap.target.into_inner()),
            initiator_shift_id: Set(swap.initiator_shift.into_inner()),
            target_shift_id: Set(swap.target_shift.into_inner()),
            status: Set(SwapStatus::from(swap.status)),
            manager_approver: Set(swap.manager_approver.map(UserId::into_inner)),
            rejected_by: Set(swap.rejected_by.map(UserId::into_inner)),
            created_at: Set(swap.created_at),
            updated_at: Set(swap.updated_at),
        };
        let model = active.insert(&self.db).await.map_err(store_err)?;
        Ok(model.into())
    }

    async fn find_swap(&self, id: SwapRequestId) -> StoreResult<Option<SwapRequest>> {
        let model = swap_requests::Entity::find_by_id(id.into_inner())
            .one(&self.db)
            .await
            .map_err(store_err)?;
        Ok(model.map(SwapRequest::from))
    }

    async fn find_swaps(&self) -> StoreResult<Vec<SwapRequest>> {
        let models = swap_requests::Entity::find()
            .order_by_asc(swap_requests::Column::CreatedAt)
            .order_by_asc(swap_requests::Column::Id)
            .all(&self.db)
            .await
            .map_err(store_err)?;
        Ok(models.into_iter().map(SwapRequest::from).collect())
    }

    async fn update_swap_if_status(
        &self,
        id: SwapRequestId,
        expected: CoreSwapStatus,
        patch: &SwapPatch,
    ) -> StoreResult<SwapRequest> {
        let mut update = swap_requests::Entity::update_many()
            .col_expr(
                swap_requests::Column::Status,
                Expr::value(SwapStatus::from(patch.status)),
            )
            .col_expr(
                swap_requests::Column::UpdatedAt,
                Expr::value(patch.updated_at),
            );
        if let Some(user) = patch.rejected_by {
            update = update.col_expr(
                swap_requests::Column::RejectedBy,
                Expr::value(user.into_inner()),
            );
        }

        let txn = self.db.begin().await.map_err(store_err)?;
        let result = update
            .filter(swap_requests::Column::Id.eq(id.into_inner()))
            .filter(swap_requests::Column::Status.eq(SwapStatus::from(expected)))
            .exec(&txn)
            .await
            .map_err(store_err)?;
        let current = load_swap(&txn, id).await?;
        txn.commit().await.map_err(store_err)?;

        if result.rows_affected == 0 {
            tracing::debug!(
                swap_id = %id,
                expected = %expected,
                actual = %current.status,
                "conditional swap update matched no row"
            );
            return Err(mismatch(id, expected, current.status));
        }
        Ok(current)
    }

    async fn commit_swap_approval(&self, approval: &SwapApproval) -> StoreResult<SwapRequest> {
        let txn = self.db.begin().await.map_err(store_err)?;

        let result = swap_requests::Entity::update_many()
            .col_expr(
                swap_requests::Column::Status,
                Expr::value(SwapStatus::Approved),
            )
            .col_expr(
                swap_requests::Column::ManagerApprover,
                Expr::value(approval.approved_by.into_inner()),
            )
            .col_expr(
                swap_requests::Column::UpdatedAt,
                Expr::value(approval.approved_at),
            )
            .filter(swap_requests::Column::Id.eq(approval.swap_id.into_inner()))
            .filter(swap_requests::Column::Status.eq(SwapStatus::PendingManager))
            .exec(&txn)
            .await
            .map_err(store_err)?;
        if result.rows_affected == 0 {
            let current = load_swap(&txn, approval.swap_id).await;
            txn.rollback().await.map_err(store_err)?;
            return Err(match current {
                Ok(swap) => mismatch(approval.swap_id, CoreSwapStatus::PendingManager, swap.status),
                Err(err) => err,
            });
        }

        for shift_move in approval.moves() {
            let shift_id = shift_move.shift_id;
            let moved = reassign_shift(&txn, &shift_move, approval.approved_at).await?;
            if !moved {
                txn.rollback().await.map_err(store_err)?;
                tracing::warn!(
                    swap_id = %approval.swap_id,
                    shift_id = %shift_id,
                    "swap commit rolled back, shift changed hands"
                );
                return Err(StoreError::OwnershipChanged {
                    shift_id: shift_id.into_inner(),
                });
            }
        }

        let swap = load_swap(&txn, approval.swap_id).await?;
        txn.commit().await.map_err(store_err)?;
        Ok(swap)
    }
}

/// Applies one move. Returns false if `from` no longer holds the shift.
async fn reassign_shift<C: ConnectionTrait>(
    conn: &C,
    shift_move: &ShiftMove,
    at: DateTime<Utc>,
) -> StoreResult<bool> {
    let result = shifts::Entity::update_many()
        .col_expr(
            shifts::Column::AssignedTo,
            Expr::value(shift_move.to.into_inner()),
        )
        .col_expr(shifts::Column::UpdatedAt, Expr::value(at))
        .filter(shifts::Column::Id.eq(shift_move.shift_id.into_inner()))
        .filter(shifts::Column::AssignedTo.eq(shift_move.from.into_inner()))
        .exec(conn)
        .await
        .map_err(store_err)?;
    Ok(result.rows_affected == 1)
}
