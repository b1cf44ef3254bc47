//! Initial schema: users, shifts, leave and swap requests.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Users::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Users::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Users::Name).string_len(200).not_null())
                    .col(
                        ColumnDef::new(Users::Email)
                            .string_len(320)
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Users::Role).string_len(24).not_null())
                    .col(
                        ColumnDef::new(Users::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Shifts::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Shifts::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Shifts::Date).date().not_null())
                    .col(ColumnDef::new(Shifts::AssignedTo).uuid().not_null())
                    .col(
                        ColumnDef::new(Shifts::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Shifts::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_shifts_assigned_to")
                            .from(Shifts::Table, Shifts::AssignedTo)
                            .to(Users::Table, Users::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(LeaveRequests::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(LeaveRequests::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(LeaveRequests::UserId).uuid().not_null())
                    .col(ColumnDef::new(LeaveRequests::StartDate).date().not_null())
                    .col(ColumnDef::new(LeaveRequests::EndDate).date().not_null())
                    .col(ColumnDef::new(LeaveRequests::Reason).text().not_null())
                    .col(
                        ColumnDef::new(LeaveRequests::Status)
                            .string_len(24)
                            .not_null(),
                    )
                    .col(ColumnDef::new(LeaveRequests::TeamLeadApprover).uuid().null())
                    .col(ColumnDef::new(LeaveRequests::ManagerApprover).uuid().null())
                    .col(ColumnDef::new(LeaveRequests::RejectedBy).uuid().null())
                    .col(
                        ColumnDef::new(LeaveRequests::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(LeaveRequests::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_leave_requests_user")
                            .from(LeaveRequests::Table, LeaveRequests::UserId)
                            .to(Users::Table, Users::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(SwapRequests::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(SwapRequests::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(SwapRequests::InitiatorId).uuid().not_null())
                    .col(ColumnDef::new(SwapRequests::TargetId).uuid().not_null())
                    .col(
                        ColumnDef::new(SwapRequests::InitiatorShiftId)
                            .uuid()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(SwapRequests::TargetShiftId)
                            .uuid()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(SwapRequests::Status)
                            .string_len(24)
                            .not_null(),
                    )
                    .col(ColumnDef::new(SwapRequests::ManagerApprover).uuid().null())
                    .col(ColumnDef::new(SwapRequests::RejectedBy).uuid().null())
                    .col(
                        ColumnDef::new(SwapRequests::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(SwapRequests::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_swap_requests_initiator")
                            .from(SwapRequests::Table, SwapRequests::InitiatorId)
                            .to(Users::Table, Users::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_swap_requests_target")
                            .from(SwapRequests::Table, SwapRequests::TargetId)
                            .to(Users::Table, Users::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_swap_requests_initiator_shift")
                            .from(SwapRequests::Table, SwapRequests::InitiatorShiftId)
                            .to(Shifts::Table, Shifts::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_swap_requests_target_shift")
                            .from(SwapRequests::Table, SwapRequests::TargetShiftId)
                            .to(Shifts::Table, Shifts::Id),
                    )
                    .to_owned(),
            )
            .await?;

        // Listing filters
        manager
            .create_index(
                Index::create()
                    .name("idx_shifts_assigned_to")
                    .table(Shifts::Table)
                    .col(Shifts::AssignedTo)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_leave_requests_user_status")
                    .table(LeaveRequests::Table)
                    .col(LeaveRequests::UserId)
                    .col(LeaveRequests::Status)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_swap_requests_status")
                    .table(SwapRequests::Table)
                    .col(SwapRequests::Status)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(SwapRequests::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(LeaveRequests::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Shifts::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Users::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Users {
    Table,
    Id,
    Name,
    Email,
    Role,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Shifts {
    Table,
    Id,
    Date,
    AssignedTo,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum LeaveRequests {
    Table,
    Id,
    UserId,
    StartDate,
    EndDate,
    Reason,
    Status,
    TeamLeadApprover,
    ManagerApprover,
    RejectedBy,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum SwapRequests {
    Table,
    Id,
    InitiatorId,
    TargetId,
    InitiatorShiftId,
    TargetShiftId,
    Status,
    ManagerApprover,
    RejectedBy,
    CreatedAt,
    UpdatedAt,
}
