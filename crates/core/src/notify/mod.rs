//! Domain event notifications.
//!
//! Workflow services publish a [`DomainEvent`] after a terminal transition
//! has been persisted. Publishing is fire-and-forget: a sink never blocks the
//! caller and never fails the transition.

use serde::Serialize;
use tokio::sync::broadcast;

use rota_shared::config::NotificationConfig;

use crate::model::{LeaveRequest, SwapRequest};

/// Event emitted when a request reaches a terminal status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event", content = "payload", rename_all = "camelCase")]
pub enum DomainEvent {
    /// A leave request was finally approved by a manager.
    LeaveApproved(LeaveRequest),
    /// A leave request was rejected.
    LeaveRejected(LeaveRequest),
    /// A swap was approved and both shifts reassigned.
    SwapApproved(SwapRequest),
    /// A swap was declined by the peer or the manager.
    SwapRejected(SwapRequest),
}

impl DomainEvent {
    /// Event name as seen by subscribers.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::LeaveApproved(_) => "leaveApproved",
            Self::LeaveRejected(_) => "leaveRejected",
            Self::SwapApproved(_) => "swapApproved",
            Self::SwapRejected(_) => "swapRejected",
        }
    }
}

/// Receiver of domain events.
#[cfg_attr(test, mockall::automock)]
pub trait NotificationSink: Send + Sync {
    /// Publishes an event. Must not block.
    fn publish(&self, event: DomainEvent);
}

/// Sink that records every event as a structured log line.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl NotificationSink for TracingSink {
    fn publish(&self, event: DomainEvent) {
        match &event {
            DomainEvent::LeaveApproved(leave) | DomainEvent::LeaveRejected(leave) => {
                tracing::info!(
                    event = event.name(),
                    leave_id = %leave.id,
                    user_id = %leave.user,
                    status = %leave.status,
                    "leave request finalized"
                );
            }
            DomainEvent::SwapApproved(swap) | DomainEvent::SwapRejected(swap) => {
                tracing::info!(
                    event = event.name(),
                    swap_id = %swap.id,
                    initiator = %swap.initiator,
                    target = %swap.target,
                    status = %swap.status,
                    "swap request finalized"
                );
            }
        }
    }
}

/// Sink that fans events out to in-process subscribers.
#[derive(Debug, Clone)]
pub struct BroadcastSink {
    sender: broadcast::Sender<DomainEvent>,
}

impl BroadcastSink {
    /// Creates a sink buffering up to `capacity` events per subscriber.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    /// Creates a sink sized from configuration.
    #[must_use]
    pub fn from_config(config: &NotificationConfig) -> Self {
        Self::new(config.channel_capacity)
    }

    /// Registers a new subscriber. It sees only events published afterwards.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<DomainEvent> {
        self.sender.subscribe()
    }
}

impl NotificationSink for BroadcastSink {
    fn publish(&self, event: DomainEvent) {
        let name = event.name();
        // No subscribers is not an error.
        if self.sender.send(event).is_err() {
            tracing::trace!(event = name, "no notification subscribers");
        }
    }
}
