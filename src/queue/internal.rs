//! Internal monitor state for the queue chain
//!
//! This module provides the shared record behind the chain's single mutex:
//! - Three buffer slots addressed through a role-to-slot indirection
//! - The two rendezvous flags (producer-ready, worker-ready)
//! - The stop flag and worker liveness
//!
//! The role indirection is the pivot of the design: rotation reassigns which
//! slot holds which role, so buffer storage never moves and no task is ever
//! copied between slots.

use crate::queue::buffer::TaskBuffer;
use crate::queue::types::{ChainStats, Role, Task};
use std::sync::{Condvar, Mutex};

/// State record guarded by [`ChainShared::state`].
///
/// Invariant: `roles` is always a permutation of the three slot indices, and
/// it is mutated only by [`ChainState::rotate_roles`].
#[derive(Debug)]
pub(crate) struct ChainState {
    /// The three buffer slots; storage is fixed, only roles are reassigned
    slots: [TaskBuffer; 3],
    /// Role-to-slot indirection, indexed by `Role as usize`
    roles: [usize; 3],
    /// Set by `swap`/`notify_producer_done`, consumed by the worker when it
    /// begins a drain cycle
    pub producer_ready: bool,
    /// Set by the worker after a completed drain, consumed by
    /// `wait_for_completion`
    pub worker_ready: bool,
    /// Observed by the worker only at its outer wait boundary
    pub stop_requested: bool,
    /// False until `start`, false again once the worker has exited
    pub worker_alive: bool,
}

impl ChainState {
    pub fn new() -> Self {
        Self {
            slots: [TaskBuffer::new(), TaskBuffer::new(), TaskBuffer::new()],
            roles: [0, 1, 2],
            producer_ready: false,
            worker_ready: false,
            stop_requested: false,
            worker_alive: false,
        }
    }

    /// Slot index currently holding `role`.
    pub fn slot_of(&self, role: Role) -> usize {
        self.roles[role as usize]
    }

    pub fn buffer(&self, role: Role) -> &TaskBuffer {
        &self.slots[self.slot_of(role)]
    }

    pub fn buffer_mut(&mut self, role: Role) -> &mut TaskBuffer {
        let slot = self.slot_of(role);
        &mut self.slots[slot]
    }

    /// Pop the oldest task from a slot addressed by index.
    ///
    /// The worker drains by pinned slot index rather than by role, so a
    /// rotation that happens mid-drain cannot retarget the drain to another
    /// cycle's content.
    pub fn pop_slot(&mut self, slot: usize) -> Option<Task> {
        self.slots[slot].pop_front()
    }

    /// Reassign roles one stage toward the worker: the slot that held Middle
    /// becomes Front, the slot that held Back becomes Middle, and the old
    /// Front slot is recycled as Back.
    pub fn rotate_roles(&mut self) {
        let front = self.roles[Role::Front as usize];
        self.roles[Role::Front as usize] = self.roles[Role::Middle as usize];
        self.roles[Role::Middle as usize] = self.roles[Role::Back as usize];
        self.roles[Role::Back as usize] = front;
    }

    pub fn stats(&self) -> ChainStats {
        ChainStats {
            front_len: self.buffer(Role::Front).len(),
            middle_len: self.buffer(Role::Middle).len(),
            back_len: self.buffer(Role::Back).len(),
            worker_alive: self.worker_alive,
        }
    }
}

/// The chain's monitor: one mutex, one condition variable.
///
/// The condition variable is the sole suspension point for both the worker's
/// wait-for-work and the producer's wait-for-completion; all wakes use
/// `notify_all`.
#[derive(Debug)]
pub(crate) struct ChainShared {
    pub state: Mutex<ChainState>,
    pub signal: Condvar,
}

impl ChainShared {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(ChainState::new()),
            signal: Condvar::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn noop() -> Task {
        Box::new(|| {})
    }

    #[test]
    fn test_initial_role_assignment() {
        let state = ChainState::new();

        assert_eq!(state.slot_of(Role::Front), 0);
        assert_eq!(state.slot_of(Role::Middle), 1);
        assert_eq!(state.slot_of(Role::Back), 2);
    }

    #[test]
    fn test_rotation_is_a_permutation() {
        let mut state = ChainState::new();

        for _ in 0..7 {
            state.rotate_roles();
            let mut slots = [
                state.slot_of(Role::Front),
                state.slot_of(Role::Middle),
                state.slot_of(Role::Back),
            ];
            slots.sort_unstable();
            assert_eq!(slots, [0, 1, 2]);
        }
    }

    #[test]
    fn test_three_rotations_restore_initial_assignment() {
        let mut state = ChainState::new();

        for _ in 0..3 {
            state.rotate_roles();
        }

        assert_eq!(state.slot_of(Role::Front), 0);
        assert_eq!(state.slot_of(Role::Middle), 1);
        assert_eq!(state.slot_of(Role::Back), 2);
    }

    #[test]
    fn test_content_transits_back_to_front_in_two_rotations() {
        let mut state = ChainState::new();

        state.buffer_mut(Role::Back).push(noop());
        let loaded_slot = state.slot_of(Role::Back);

        state.rotate_roles();
        assert_eq!(state.slot_of(Role::Middle), loaded_slot);
        assert_eq!(state.buffer(Role::Middle).len(), 1);
        assert!(state.buffer(Role::Front).is_empty());

        state.rotate_roles();
        assert_eq!(state.slot_of(Role::Front), loaded_slot);
        assert_eq!(state.buffer(Role::Front).len(), 1);
        assert!(state.buffer(Role::Back).is_empty());
    }

    #[test]
    fn test_stats_reflect_slot_occupancy_by_role() {
        let mut state = ChainState::new();

        state.buffer_mut(Role::Back).push(noop());
        state.buffer_mut(Role::Back).push(noop());
        state.rotate_roles();
        state.buffer_mut(Role::Back).push(noop());

        let stats = state.stats();
        assert_eq!(stats.front_len, 0);
        assert_eq!(stats.middle_len, 2);
        assert_eq!(stats.back_len, 1);
        assert!(!stats.worker_alive);
    }
}
