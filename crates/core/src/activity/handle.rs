use chrono::{DateTime, Utc};
use tokio::sync::mpsc;

use super::{ActivityEvent, Actor};
use crate::metrics::ACTIVITY_EVENTS_DROPPED;

/// Envelope wrapping an activity event with metadata
#[derive(Debug, Clone)]
pub struct ActivityEnvelope {
    pub timestamp: DateTime<Utc>,
    pub actor: Actor,
    pub event: ActivityEvent,
}

/// Handle for emitting activity events
///
/// This is cheaply cloneable and can be shared across tasks.
/// Events are sent through an async channel to be written by the ActivityWriter.
#[derive(Clone)]
pub struct ActivityHandle {
    tx: mpsc::Sender<ActivityEnvelope>,
}

impl ActivityHandle {
    /// Create a new activity handle from a channel sender
    pub fn new(tx: mpsc::Sender<ActivityEnvelope>) -> Self {
        Self { tx }
    }

    /// Try to emit an activity event without blocking
    ///
    /// Returns true if the event was queued, false if the queue was full or closed.
    pub fn try_emit(&self, actor: Actor, event: ActivityEvent) -> bool {
        let envelope = ActivityEnvelope {
            timestamp: Utc::now(),
            actor,
            event,
        };
        match self.tx.try_send(envelope) {
            Ok(()) => true,
            Err(e) => {
                ACTIVITY_EVENTS_DROPPED.inc();
                tracing::error!("Failed to emit activity event: {}", e);
                false
            }
        }
    }
}
