//! Approval workflow engine for Rota.
//!
//! This module implements the leave and shift-swap lifecycle state machines.
//! Transitions are pure functions of (current status, actor); loading,
//! persisting and side effects live in [`crate::service`].
//!
//! # Modules
//!
//! - `types` - Workflow domain types (statuses, actions, transitions)
//! - `error` - Workflow-specific error types
//! - `leave` - Leave request transitions
//! - `swap` - Swap request transitions

pub mod error;
pub mod leave;
pub mod swap;
pub mod types;

#[cfg(test)]
mod leave_props;
#[cfg(test)]
mod swap_props;

pub use error::WorkflowError;
pub use leave::LeaveMachine;
pub use swap::SwapMachine;
pub use types::{
    LeaveAction, LeaveStatus, LeaveTransition, SwapAction, SwapStatus, SwapTransition,
};
