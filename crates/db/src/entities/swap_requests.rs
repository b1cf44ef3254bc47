//! `SeaORM` Entity for swap_requests table.
//!
//! Both parties and both shifts reference the same tables, so no `Related`
//! impls are derived.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::sea_orm_active_enums::SwapStatus;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "swap_requests")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub initiator_id: Uuid,
    pub target_id: Uuid,
    pub initiator_shift_id: Uuid,
    pub target_shift_id: Uuid,
    pub status: SwapStatus,
    pub manager_approver: Option<Uuid>,
    pub rejected_by: Option<Uuid>,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
