//! Progress event stream
//!
//! A `tokio::sync::broadcast`-based bus so host surfaces (a log pane,
//! a progress bar) can follow a running job without touching engine
//! state. Emission is fire-and-forget: a missing or slow subscriber
//! never affects the run or the report.

use crate::report::SyncStats;
use core_match::MatchTier;
use serde::Serialize;
use tokio::sync::broadcast;

/// Events emitted over the lifetime of a migration job
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SyncEvent {
    /// A job began running
    Started { job_id: String, target: String },
    /// One source track finished resolution
    TrackResolved {
        target: String,
        track: String,
        matched: bool,
        tier: Option<MatchTier>,
    },
    /// Per-track progress within one collection
    Progress {
        target: String,
        processed: u64,
        total: u64,
        percent: u8,
    },
    /// A job finished with these aggregate counters
    Completed { job_id: String, stats: SyncStats },
    /// A job failed and stopped early
    Failed { job_id: String, message: String },
    /// A job stopped at a cancellation check
    Cancelled { job_id: String, processed: u64 },
}

/// Broadcast bus for sync events
#[derive(Debug, Clone)]
pub struct EventBus {
    sender: broadcast::Sender<SyncEvent>,
}

impl EventBus {
    /// Create a bus with the given buffer size
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Emit an event to all current subscribers
    ///
    /// Returns `Err` when there are no subscribers; callers ignore it.
    pub fn emit(&self, event: SyncEvent) -> Result<usize, broadcast::error::SendError<SyncEvent>> {
        self.sender.send(event)
    }

    /// Subscribe to events emitted after this call
    pub fn subscribe(&self) -> broadcast::Receiver<SyncEvent> {
        self.sender.subscribe()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(100)
    }
}
