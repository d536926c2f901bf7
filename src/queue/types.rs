//! Type definitions for the queue chain
//!
//! This module contains the core data structures shared between the public
//! chain contract, the internal monitor state, and the worker state machine.

/// Opaque, zero-argument, no-return unit of deferred work.
///
/// Ownership stays with whichever buffer slot holds the task until the worker
/// pops it for invocation; a task still enqueued when the chain stops is
/// dropped unexecuted.
pub type Task = Box<dyn FnOnce() + Send + 'static>;

/// Role a buffer slot currently plays in the chain.
///
/// Exactly one slot holds each role at all times; `swap` reassigns the roles
/// without moving buffer storage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum_macros::Display)]
pub enum Role {
    /// Currently drained by the worker
    Front = 0,
    /// In transit between producer and worker
    Middle = 1,
    /// Currently filled by producers
    Back = 2,
}

/// Phases of the worker state machine.
///
/// The worker loops WaitingForWork → Draining → WaitingForWork until a stop
/// request is observed at the wait boundary, which is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum_macros::Display)]
pub(crate) enum WorkerPhase {
    /// Blocked on the condition variable until readiness or stop
    WaitingForWork,
    /// Emptying the slot that held Front when the cycle was armed
    Draining {
        /// Slot index pinned for this drain cycle
        front_slot: usize,
    },
    /// Terminal; the thread is about to exit
    Stopped,
}

/// Occupancy and liveness snapshot of the chain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChainStats {
    /// Tasks currently in the Front slot
    pub front_len: usize,
    /// Tasks currently in the Middle slot
    pub middle_len: usize,
    /// Tasks currently in the Back slot
    pub back_len: usize,
    /// Whether the worker thread is running
    pub worker_alive: bool,
}
