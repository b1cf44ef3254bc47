//! Core workflow logic for Rota.
//!
//! This crate contains the staffing approval engine with ZERO web or database
//! dependencies. Persistence is reached through the ports in [`store`].
//!
//! # Modules
//!
//! - `access` - Roles, principals and the role → action policy table
//! - `model` - Users, shifts, leave and swap requests
//! - `workflow` - Pure leave and swap state machines
//! - `store` - Entity store ports and the in-memory adapter
//! - `notify` - Domain events and notification sinks
//! - `service` - Async workflow services tying the above together

pub mod access;
pub mod model;
pub mod notify;
pub mod service;
pub mod store;
pub mod workflow;

pub use access::{AccessPolicy, Action, Principal, Role};
pub use service::{LeaveWorkflow, Services, ShiftRoster, SwapWorkflow, UserDirectory};
pub use workflow::WorkflowError;
