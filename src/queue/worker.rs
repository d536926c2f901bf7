//! Worker thread state machine
//!
//! The single consumer runs the three-phase machine below until stopped.
//! It sleeps until producer-readiness (or a stop request) is signalled, pins
//! the slot holding Front for that cycle, drains the slot with the lock
//! released around every task body, then signals completion and returns to
//! waiting.
//!
//! Stop requests are observed only at the outer wait boundary: an in-flight
//! task is never interrupted, and a stop that arrives mid-drain takes effect
//! after the pinned slot is empty. Tasks still enqueued elsewhere in the
//! chain at that point are abandoned, which the worker reports before
//! exiting.

use crate::queue::internal::ChainShared;
use crate::queue::types::{Role, WorkerPhase};
use std::panic::{catch_unwind, AssertUnwindSafe};

/// Marks the worker dead and wakes all waiters when the thread exits.
///
/// Runs on every exit path, including an unwind that escapes the state
/// machine itself, so a blocked `wait_for_completion` observes the death
/// instead of sleeping forever.
struct AliveGuard<'a> {
    shared: &'a ChainShared,
}

impl Drop for AliveGuard<'_> {
    fn drop(&mut self) {
        let mut state = match self.shared.state.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        state.worker_alive = false;
        self.shared.signal.notify_all();
    }
}

/// Run the consumer state machine to completion.
pub(crate) fn run(shared: &ChainShared) {
    let _alive = AliveGuard { shared };
    let mut phase = WorkerPhase::WaitingForWork;
    loop {
        phase = match phase {
            WorkerPhase::WaitingForWork => wait_for_work(shared),
            WorkerPhase::Draining { front_slot } => drain_slot(shared, front_slot),
            WorkerPhase::Stopped => break,
        };
        log::trace!("worker transitioning to {phase}");
    }
}

/// Block until a drain cycle is armed or shutdown is requested.
///
/// A stop request wins over pending readiness: undrained Front tasks are
/// abandoned rather than executed during shutdown.
fn wait_for_work(shared: &ChainShared) -> WorkerPhase {
    let mut state = match shared.state.lock() {
        Ok(guard) => guard,
        Err(_) => return poisoned_exit(),
    };

    while !state.producer_ready && !state.stop_requested {
        state = match shared.signal.wait(state) {
            Ok(guard) => guard,
            Err(_) => return poisoned_exit(),
        };
    }

    if state.stop_requested {
        let undrained = state.buffer(Role::Front).len();
        if undrained > 0 {
            log::warn!("worker stopping with {undrained} undrained task(s) in the front slot");
        }
        // AliveGuard marks the worker dead and wakes waiters on thread exit.
        return WorkerPhase::Stopped;
    }

    // Consume the readiness token. This pins the drain to the cycle that
    // armed it: a later rotation reassigns roles but not this drain's slot.
    state.producer_ready = false;
    WorkerPhase::Draining {
        front_slot: state.slot_of(Role::Front),
    }
}

/// Empty the pinned slot, then signal completion.
///
/// The lock is held only around each pop; task bodies run unlocked, so
/// producers keep appending to the Back slot while the drain is in flight.
fn drain_slot(shared: &ChainShared, front_slot: usize) -> WorkerPhase {
    let mut drained = 0usize;
    loop {
        let task = {
            let mut state = match shared.state.lock() {
                Ok(guard) => guard,
                Err(_) => return poisoned_exit(),
            };
            state.pop_slot(front_slot)
        };
        let Some(task) = task else { break };

        // A panicking task must not kill the consumer permanently; report it
        // and keep draining.
        if catch_unwind(AssertUnwindSafe(task)).is_err() {
            log::error!("task panicked; continuing to drain the front slot");
        }
        drained += 1;
    }

    let mut state = match shared.state.lock() {
        Ok(guard) => guard,
        Err(_) => return poisoned_exit(),
    };
    state.worker_ready = true;
    shared.signal.notify_all();
    log::trace!("drain cycle complete: {drained} task(s) executed");

    WorkerPhase::WaitingForWork
}

fn poisoned_exit() -> WorkerPhase {
    log::error!("chain state mutex poisoned; worker exiting");
    WorkerPhase::Stopped
}
