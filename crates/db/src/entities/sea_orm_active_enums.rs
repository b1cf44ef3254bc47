//! String-backed enums shared by several tables.
//!
//! Values are stored as their upper-case names so the schema stays portable
//! between PostgreSQL and SQLite.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use rota_core::access::Role;
use rota_core::workflow::{LeaveStatus as CoreLeaveStatus, SwapStatus as CoreSwapStatus};

/// Persisted staff role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
pub enum UserRole {
    /// Employee.
    #[sea_orm(string_value = "EMPLOYEE")]
    Employee,
    /// Team lead.
    #[sea_orm(string_value = "TEAM_LEAD")]
    TeamLead,
    /// Manager.
    #[sea_orm(string_value = "MANAGER")]
    Manager,
}

/// Persisted leave request status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
pub enum LeaveStatus {
    /// Awaiting team lead or manager.
    #[sea_orm(string_value = "PENDING")]
    Pending,
    /// Approved by a team lead.
    #[sea_orm(string_value = "TL_APPROVED")]
    TlApproved,
    /// Finally approved.
    #[sea_orm(string_value = "APPROVED")]
    Approved,
    /// Rejected.
    #[sea_orm(string_value = "REJECTED")]
    Rejected,
}

/// Persisted swap request status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
pub enum SwapStatus {
    /// Awaiting the peer.
    #[sea_orm(string_value = "PENDING_PEER")]
    PendingPeer,
    /// Awaiting a manager.
    #[sea_orm(string_value = "PENDING_MANAGER")]
    PendingManager,
    /// Approved; shifts exchanged.
    #[sea_orm(string_value = "APPROVED")]
    Approved,
    /// Declined by the peer.
    #[sea_orm(string_value = "REJECTED_PEER")]
    RejectedPeer,
    /// Declined by a manager.
    #[sea_orm(string_value = "REJECTED_MANAGER")]
    RejectedManager,
}

impl From<Role> for UserRole {
    fn from(role: Role) -> Self {
        match role {
            Role::Employee => Self::Employee,
            Role::TeamLead => Self::TeamLead,
            Role::Manager => Self::Manager,
        }
    }
}

impl From<UserRole> for Role {
    fn from(role: UserRole) -> Self {
        match role {
            UserRole::Employee => Self::Employee,
            UserRole::TeamLead => Self::TeamLead,
            UserRole::Manager => Self::Manager,
        }
    }
}

impl From<CoreLeaveStatus> for LeaveStatus {
    fn from(status: CoreLeaveStatus) -> Self {
        match status {
            CoreLeaveStatus::Pending => Self::Pending,
            CoreLeaveStatus::TlApproved => Self::TlApproved,
            CoreLeaveStatus::Approved => Self::Approved,
            CoreLeaveStatus::Rejected => Self::Rejected,
        }
    }
}

impl From<LeaveStatus> for CoreLeaveStatus {
    fn from(status: LeaveStatus) -> Self {
        match status {
            LeaveStatus::Pending => Self::Pending,
            LeaveStatus::TlApproved => Self::TlApproved,
            LeaveStatus::Approved => Self::Approved,
            LeaveStatus::Rejected => Self::Rejected,
        }
    }
}

impl From<CoreSwapStatus> for SwapStatus {
    fn from(status: CoreSwapStatus) -> Self {
        match status {
            CoreSwapStatus::PendingPeer => Self::PendingPeer,
            CoreSwapStatus::PendingManager => Self::PendingManager,
            CoreSwapStatus::Approved => Self::Approved,
            CoreSwapStatus::RejectedPeer => Self::RejectedPeer,
            CoreSwapStatus::RejectedManager => Self::RejectedManager,
        }
    }
}

impl From<SwapStatus> for CoreSwapStatus {
    fn from(status: SwapStatus) -> Self {
        match status {
            SwapStatus::PendingPeer => Self::PendingPeer,
            SwapStatus::PendingManager => Self::PendingManager,
            SwapStatus::Approved => Self::Approved,
            SwapStatus::RejectedPeer => Self::RejectedPeer,
            SwapStatus::RejectedManager => Self::RejectedManager,
        }
    }
}
