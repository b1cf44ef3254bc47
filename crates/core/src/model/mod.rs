//! Persisted entities and the plain-data payloads that create them.
//!
//! - `user` - Registered staff members
//! - `shift` - Rostered shifts
//! - `leave` - Leave requests
//! - `swap` - Shift-swap requests

mod leave;
mod shift;
mod swap;
mod user;

pub use leave::{LeaveRequest, LeaveRequestInput};
pub use shift::{Shift, ShiftAssignment};
pub use swap::{SwapProposal, SwapRequest};
pub use user::{NewUser, User};

use crate::workflow::WorkflowError;

/// Unwraps a required payload field, failing validation when it is absent.
pub(crate) fn required<T>(value: Option<T>, field: &str) -> Result<T, WorkflowError> {
    value.ok_or_else(|| WorkflowError::Validation(format!("{field} is required")))
}
