use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use rota_shared::types::{LeaveRequestId, UserId};

use super::required;
use crate::workflow::{LeaveStatus, WorkflowError};

/// A leave request moving through team-lead and manager approval.
///
/// `team_lead_approver` is set only on the TlApproved path and
/// `manager_approver` only once the request is Approved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaveRequest {
    /// Leave request ID.
    pub id: LeaveRequestId,
    /// The requesting employee.
    pub user: UserId,
    /// First day of leave.
    pub start_date: NaiveDate,
    /// Last day of leave (inclusive).
    pub end_date: NaiveDate,
    /// Free-text reason.
    pub reason: String,
    /// Current status.
    pub status: LeaveStatus,
    /// Team lead who gave first-level approval.
    pub team_lead_approver: Option<UserId>,
    /// Manager who gave final approval.
    pub manager_approver: Option<UserId>,
    /// Team lead or manager who rejected the request.
    pub rejected_by: Option<UserId>,
    /// When the request was filed.
    pub created_at: DateTime<Utc>,
    /// When the request last changed status.
    pub updated_at: DateTime<Utc>,
}

/// Employee payload for requesting leave.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaveRequestInput {
    /// First day of leave.
    pub start_date: Option<NaiveDate>,
    /// Last day of leave (inclusive).
    pub end_date: Option<NaiveDate>,
    /// Free-text reason.
    pub reason: Option<String>,
}

impl LeaveRequestInput {
    /// Validates the payload and builds a Pending request owned by `owner`.
    pub fn into_request(self, owner: UserId) -> Result<LeaveRequest, WorkflowError> {
        let start_date = required(self.start_date, "startDate")?;
        let end_date = required(self.end_date, "endDate")?;
        let reason = required(self.reason, "reason")?.trim().to_string();
        if reason.is_empty() {
            return Err(WorkflowError::Validation("reason is required".to_string()));
        }
        if end_date < start_date {
            return Err(WorkflowError::Validation(format!(
                "endDate {end_date} is before startDate {start_date}"
            )));
        }

        let now = Utc::now();
        Ok(LeaveRequest {
            id: LeaveRequestId::new(),
            user: owner,
            start_date,
            end_date,
            reason,
            status: LeaveStatus::Pending,
            team_lead_approver: None,
            manager_approver: None,
            rejected_by: None,
            created_at: now,
            updated_at: now,
        })
    }
}
