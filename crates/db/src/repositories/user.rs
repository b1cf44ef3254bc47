use async_trait::async_trait;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set};

use rota_core::model::User;
use rota_core::store::{StoreResult, UserFilter, UserStore};
use rota_shared::types::UserId;

use super::{SeaOrmStore, store_err};
use crate::entities::{sea_orm_active_enums::UserRole, users};

impl From<users::Model> for User {
    fn from(model: users::Model) -> Self {
        Self {
            id: UserId::from_uuid(model.id),
            name: model.name,
            email: model.email,
            role: model.role.into(),
            created_at: model.created_at,
        }
    }
}

#[async_trait]
impl UserStore for SeaOrmStore {
    async fn insert_user(&self, user: User) -> StoreResult<User> {
        let active = users::ActiveModel {
            id: Set(user.id.into_inner()),
            name: Set(user.name),
            email: Set(user.email),
            role: Set(UserRole::from(user.role)),
            created_at: Set(user.created_at),
        };
        let model = active.insert(&self.db).await.map_err(store_err)?;
        Ok(model.into())
    }

    async fn find_user(&self, id: UserId) -> StoreResult<Option<User>> {
        let model = users::Entity::find_by_id(id.into_inner())
            .one(&self.db)
            .await
            .map_err(store_err)?;
        Ok(model.map(User::from))
    }

    async fn find_users(&self, filter: &UserFilter) -> StoreResult<Vec<User>> {
        let mut query = users::Entity::find();
        if let Some(email) = &filter.email {
            query = query.filter(users::Column::Email.eq(email.as_str()));
        }
        let models = query
            .order_by_asc(users::Column::CreatedAt)
            .order_by_asc(users::Column::Id)
            .all(&self.db)
            .await
            .map_err(store_err)?;
        Ok(models.into_iter().map(User::from).collect())
    }
}
