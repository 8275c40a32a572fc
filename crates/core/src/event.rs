//! Run events — progress of a panel run, decoupled from whoever displays it.
//!
//! The orchestrator publishes events as a run moves through its phases.
//! Reporting front-ends subscribe and render progress without the core
//! knowing they exist.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::broadcast;

use crate::role::Role;

/// Lifecycle of a single orchestration run.
///
/// `Created → FanningOut → Barrier → Synthesizing → Done`; no transition
/// skips the barrier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunPhase {
    Created,
    FanningOut,
    Barrier,
    Synthesizing,
    Done,
}

/// All events a run publishes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum RunEvent {
    /// The run entered a new phase
    PhaseChanged {
        run_id: String,
        phase: RunPhase,
        timestamp: DateTime<Utc>,
    },

    /// A specialist task acquired a worker slot
    SpecialistStarted {
        run_id: String,
        role: Role,
        timestamp: DateTime<Utc>,
    },

    /// A specialist task reached its outcome
    SpecialistFinished {
        run_id: String,
        role: Role,
        success: bool,
        completed: usize,
        total: usize,
        elapsed_ms: u64,
        timestamp: DateTime<Utc>,
    },

    /// The synthesis task reached its outcome
    SynthesisFinished {
        run_id: String,
        role: Role,
        success: bool,
        elapsed_ms: u64,
        timestamp: DateTime<Utc>,
    },
}

/// A broadcast-based event bus for run events.
///
/// Uses `tokio::sync::broadcast` for multi-consumer pub/sub.
pub struct EventBus {
    sender: broadcast::Sender<Arc<RunEvent>>,
}

impl EventBus {
    /// Create a new event bus with the given capacity.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Publish an event to all subscribers.
    pub fn publish(&self, event: RunEvent) {
        // No subscribers is fine
        let _ = self.sender.send(Arc::new(event));
    }

    /// Subscribe to receive events.
    pub fn subscribe(&self) -> broadcast::Receiver<Arc<RunEvent>> {
        self.sender.subscribe()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(256)
    }
}
