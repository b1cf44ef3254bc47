use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use rota_shared::types::{ShiftId, UserId};

use super::required;
use crate::workflow::WorkflowError;

/// A rostered shift on a given date.
///
/// `assigned_to` changes only through an approved swap.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Shift {
    /// Shift ID.
    pub id: ShiftId,
    /// Day of the shift.
    pub date: NaiveDate,
    /// The user currently working the shift.
    pub assigned_to: UserId,
    /// When the shift was assigned.
    pub created_at: DateTime<Utc>,
    /// When the assignment last changed.
    pub updated_at: DateTime<Utc>,
}

/// Manager payload for assigning a shift.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShiftAssignment {
    /// The user to assign.
    pub user_id: Option<UserId>,
    /// Day of the shift.
    pub date: Option<NaiveDate>,
}

impl ShiftAssignment {
    /// Validates the payload and builds the shift record.
    pub fn into_shift(self) -> Result<Shift, WorkflowError> {
        let assigned_to = required(self.user_id, "userId")?;
        let date = required(self.date, "date")?;
        let now = Utc::now();
        Ok(Shift {
            id: ShiftId::new(),
            date,
            assigned_to,
            created_at: now,
            updated_at: now,
        })
    }
}
