use std::sync::Arc;

use crate::access::{AccessPolicy, Action, EntityKind, ListScope, Principal};
use crate::model::{Shift, ShiftAssignment};
use crate::store::{EntityStore, ShiftFilter};
use crate::workflow::WorkflowError;

/// Shift assignment and listing.
///
/// Assignment only creates shifts. Reassignment happens solely through an
/// approved swap.
#[derive(Clone)]
pub struct ShiftRoster {
    store: Arc<dyn EntityStore>,
}

impl ShiftRoster {
    /// Creates the roster over `store`.
    #[must_use]
    pub fn new(store: Arc<dyn EntityStore>) -> Self {
        Self { store }
    }

    /// Assigns a new shift to a user. Manager only.
    ///
    /// # Errors
    ///
    /// `Validation` if a field is missing, `NotFound` if the user does not exist.
    pub async fn assign_shift(
        &self,
        principal: &Principal,
        assignment: ShiftAssignment,
    ) -> Result<Shift, WorkflowError> {
        AccessPolicy::authorize(principal, Action::AssignShift)?;
        let shift = assignment.into_shift()?;
        if self.store.find_user(shift.assigned_to).await?.is_none() {
            return Err(WorkflowError::NotFound {
                entity: EntityKind::User,
                id: shift.assigned_to.into_inner(),
            });
        }

        let shift = self.store.insert_shift(shift).await?;
        tracing::info!(
            shift_id = %shift.id,
            assigned_to = %shift.assigned_to,
            date = %shift.date,
            by = %principal.id,
            "shift assigned"
        );
        Ok(shift)
    }

    /// Lists shifts: all for a manager, own assignments otherwise.
    pub async fn list_shifts(&self, principal: &Principal) -> Result<Vec<Shift>, WorkflowError> {
        AccessPolicy::authorize(principal, Action::ListShifts)?;
        let filter = match AccessPolicy::list_scope(principal.role, EntityKind::Shift) {
            ListScope::Own => ShiftFilter {
                assigned_to: Some(principal.id),
            },
            ListScope::All => ShiftFilter::default(),
        };
        Ok(self.store.find_shifts(&filter).await?)
    }
}
