//! Async workflow services.
//!
//! Each operation follows the same sequence: access policy gate, load,
//! pure transition check, conditional persist, notify. Services hold their
//! collaborators behind `Arc` so one set can be shared across tasks.

mod leave;
mod shift;
mod swap;
mod user;

#[cfg(test)]
mod fixtures;

pub use leave::LeaveWorkflow;
pub use shift::ShiftRoster;
pub use swap::SwapWorkflow;
pub use user::UserDirectory;

use std::sync::Arc;

use crate::notify::NotificationSink;
use crate::store::EntityStore;

/// Every workflow service wired to one store and one sink.
#[derive(Clone)]
pub struct Services {
    /// User registration and lookup.
    pub users: UserDirectory,
    /// Shift assignment and listing.
    pub shifts: ShiftRoster,
    /// Leave request lifecycle.
    pub leave: LeaveWorkflow,
    /// Shift-swap lifecycle.
    pub swaps: SwapWorkflow,
}

impl Services {
    /// Builds all services over the given store and sink.
    #[must_use]
    pub fn new(store: Arc<dyn EntityStore>, sink: Arc<dyn NotificationSink>) -> Self {
        Self {
            users: UserDirectory::new(Arc::clone(&store)),
            shifts: ShiftRoster::new(Arc::clone(&store)),
            leave: LeaveWorkflow::new(Arc::clone(&store), Arc::clone(&sink)),
            swaps: SwapWorkflow::new(store, sink),
        }
    }
}
