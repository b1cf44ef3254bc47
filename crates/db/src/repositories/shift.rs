use async_trait::async_trait;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set};

use rota_core::access::EntityKind;
use rota_core::model::Shift;
use rota_core::store::{ShiftFilter, ShiftStore, StoreError, StoreResult};
use rota_shared::types::{ShiftId, UserId};

use super::{SeaOrmStore, store_err};
use crate::entities::{shifts, users};

impl From<shifts::Model> for Shift {
    fn from(model: shifts::Model) -> Self {
        Self {
            id: ShiftId::from_uuid(model.id),
            date: model.date,
            assigned_to: UserId::from_uuid(model.assigned_to),
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

#[async_trait]
impl ShiftStore for SeaOrmStore {
    async fn insert_shift(&self, shift: Shift) -> StoreResult<Shift> {
        // SQLite does not enforce foreign keys by default.
        let holder = users::Entity::find_by_id(shift.assigned_to.into_inner())
            .one(&self.db)
            .await
            .map_err(store_err)?;
        if holder.is_none() {
            return Err(StoreError::NotFound {
                entity: EntityKind::User,
                id: shift.assigned_to.into_inner(),
            });
        }

        let active = shifts::ActiveModel {
            id: Set(shift.id.into_inner()),
            date: Set(shift.date),
            assigned_to: Set(shift.assigned_to.into_inner()),
            created_at: Set(shift.created_at),
            updated_at: Set(shift.updated_at),
        };
        let model = active.insert(&self.db).await.map_err(store_err)?;
        Ok(model.into())
    }

    async fn find_shift(&self, id: ShiftId) -> StoreResult<Option<Shift>> {
        let model = shifts::Entity::find_by_id(id.into_inner())
            .one(&self.db)
            .await
            .map_err(store_err)?;
        Ok(model.map(Shift::from))
    }

    async fn find_shifts(&self, filter: &ShiftFilter) -> StoreResult<Vec<Shift>> {
        let mut query = shifts::Entity::find();
        if let Some(user) = filter.assigned_to {
            query = query.filter(shifts::Column::AssignedTo.eq(user.into_inner()));
        }
        let models = query
            .order_by_asc(shifts::Column::Date)
            .order_by_asc(shifts::Column::Id)
            .all(&self.db)
            .await
            .map_err(store_err)?;
        Ok(models.into_iter().map(Shift::from).collect())
    }
}
