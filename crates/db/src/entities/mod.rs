//! `SeaORM` entity definitions.

pub mod leave_requests;
pub mod sea_orm_active_enums;
pub mod shifts;
pub mod swap_requests;
pub mod users;
