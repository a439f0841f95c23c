//! Animation worker state machine
//!
//! Defines the states a circle's worker moves through and the pure
//! transition function driving them. The worker thread feeds events in; the
//! controller only ever observes the result.

use std::sync::atomic::{AtomicU8, Ordering};

/// Lifecycle of one animation worker
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WorkerState {
    /// Blocked on the circle's condition variable until the run flag is set
    #[default]
    Waiting,
    /// Stepping the circle and requesting redraws
    Active,
    /// Loop exited after a stop request; the thread is joinable
    Stopped,
}

/// Events observed by a worker
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkerEvent {
    /// Run flag seen set under the lock
    Resumed,
    /// Run flag seen cleared after a step
    Paused,
    /// Shutdown requested
    StopRequested,
}

impl WorkerState {
    /// Processes a worker event and returns the new state
    pub fn process_event(self, event: WorkerEvent) -> WorkerState {
        match (self, event) {
            (WorkerState::Stopped, _) => WorkerState::Stopped,
            (_, WorkerEvent::StopRequested) => WorkerState::Stopped,
            (_, WorkerEvent::Resumed) => WorkerState::Active,
            (_, WorkerEvent::Paused) => WorkerState::Waiting,
        }
    }

    fn to_u8(self) -> u8 {
        match self {
            WorkerState::Waiting => 0,
            WorkerState::Active => 1,
            WorkerState::Stopped => 2,
        }
    }

    fn from_u8(value: u8) -> Self {
        match value {
            1 => WorkerState::Active,
            2 => WorkerState::Stopped,
            _ => WorkerState::Waiting,
        }
    }
}

/// Worker state shared between the worker thread and its observers
#[derive(Debug, Default)]
pub struct WorkerStatus {
    state: AtomicU8,
}

impl WorkerStatus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self) -> WorkerState {
        WorkerState::from_u8(self.state.load(Ordering::Acquire))
    }

    pub fn set(&self, state: WorkerState) {
        self.state.store(state.to_u8(), Ordering::Release);
    }
}
