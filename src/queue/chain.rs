//! QueueChain - the public task-offload contract
//!
//! The QueueChain is the coordination point between any number of producer
//! threads and the single worker thread. Producers append deferred work to
//! the Back slot, rotate the chain, and rendezvous with the worker through
//! the readiness flags; the worker drains the Front slot one cycle at a time.

use crate::core::sync::handle_mutex_poison;
use crate::queue::error::{ChainError, ChainResult};
use crate::queue::internal::{ChainShared, ChainState};
use crate::queue::types::{ChainStats, Role};
use crate::queue::worker;
use std::sync::{Arc, Mutex, MutexGuard};
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

/// Lifecycle slot for the single worker thread.
#[derive(Debug)]
enum WorkerHandle {
    NotStarted,
    Running(JoinHandle<()>),
    Stopped,
}

/// Triple-buffered task-offload chain with a dedicated worker thread.
///
/// The chain is constructed with three empty buffers and the role assignment
/// Front/Middle/Back; `start` spawns the worker, `stop` joins it. Between the
/// two, producers drive the pipeline with `write_to_back`, `swap`,
/// `notify_producer_done` and `wait_for_completion`.
///
/// # Thread Safety
///
/// The chain is fully thread-safe and is typically shared across producer
/// threads as `Arc<QueueChain>`. All shared state sits behind a single mutex;
/// one condition variable is the sole suspension point for both sides of the
/// rendezvous.
///
/// # Rendezvous discipline
///
/// Each `swap` of a non-empty Back slot (or `notify_producer_done`) arms one
/// drain cycle; `wait_for_completion` consumes the completion of one cycle.
/// Arming is a flag, not a counter: several arms before the worker wakes
/// coalesce into a single drain. Producers that need a completion guarantee
/// should therefore pair each wait with exactly one arming call.
///
/// # Example
///
/// ```rust,no_run
/// use std::sync::Arc;
/// use taskchain::queue::QueueChain;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let chain = Arc::new(QueueChain::new());
/// chain.start()?;
///
/// for i in 0..3 {
///     chain.write_to_back(move || println!("task {i}"))?;
/// }
///
/// // Two rotations move the batch Back -> Middle -> Front; the second cycle
/// // carries fresh Back content so the rotation is not short-circuited.
/// chain.swap()?;
/// chain.wait_for_completion()?;
/// chain.write_to_back(|| {})?;
/// chain.swap()?;
/// chain.wait_for_completion()?;
///
/// chain.stop()?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct QueueChain {
    shared: Arc<ChainShared>,
    worker: Mutex<WorkerHandle>,
}

impl QueueChain {
    /// Create a chain with three empty buffers and no worker thread.
    pub fn new() -> Self {
        Self {
            shared: Arc::new(ChainShared::new()),
            worker: Mutex::new(WorkerHandle::NotStarted),
        }
    }

    /// Spawn the single worker thread.
    ///
    /// # Errors
    ///
    /// - `AlreadyStarted` if the worker is already running
    /// - `AlreadyStopped` if the chain has been stopped
    /// - `Spawn` if the OS refuses the thread
    pub fn start(&self) -> ChainResult<()> {
        let mut handle = self.lock_worker()?;
        match *handle {
            WorkerHandle::Running(_) => return Err(ChainError::AlreadyStarted),
            WorkerHandle::Stopped => return Err(ChainError::AlreadyStopped),
            WorkerHandle::NotStarted => {}
        }

        // Mark the worker alive before it runs so a producer that waits
        // immediately after `start` blocks instead of failing a liveness
        // check against a thread that has not been scheduled yet.
        self.lock_state()?.worker_alive = true;

        let shared = Arc::clone(&self.shared);
        let spawned = std::thread::Builder::new()
            .name("taskchain-worker".to_string())
            .spawn(move || worker::run(&shared));

        match spawned {
            Ok(join_handle) => {
                *handle = WorkerHandle::Running(join_handle);
                log::debug!("worker thread started");
                Ok(())
            }
            Err(err) => {
                self.lock_state()?.worker_alive = false;
                Err(ChainError::Spawn(err))
            }
        }
    }

    /// Flag shutdown, wake all waiters, and join the worker thread.
    ///
    /// Idempotent: a second call is a safe no-op. Tasks still enqueued when
    /// the stop request is observed are dropped unexecuted; the worker logs
    /// how many it abandoned.
    ///
    /// # Errors
    ///
    /// `WorkerPanicked` if the join observes a panic that escaped the worker
    /// outside a task boundary.
    pub fn stop(&self) -> ChainResult<()> {
        let mut handle = self.lock_worker()?;
        if matches!(*handle, WorkerHandle::Stopped) {
            return Ok(());
        }

        {
            let mut state = self.lock_state()?;
            state.stop_requested = true;
            self.shared.signal.notify_all();
        }

        let previous = std::mem::replace(&mut *handle, WorkerHandle::Stopped);
        if let WorkerHandle::Running(join_handle) = previous {
            if join_handle.join().is_err() {
                return Err(ChainError::WorkerPanicked);
            }
            log::debug!("worker thread joined");
        }
        Ok(())
    }

    /// Append a task to the tail of the Back slot.
    ///
    /// Never blocks on execution and is safe to call from any number of
    /// producer threads; calls are serialized by the chain's lock. The Back
    /// slot is unbounded: nothing throttles a producer that outruns the
    /// worker.
    ///
    /// # Errors
    ///
    /// `AlreadyStopped` after `stop`.
    pub fn write_to_back<F>(&self, task: F) -> ChainResult<()>
    where
        F: FnOnce() + Send + 'static,
    {
        let mut state = self.lock_state()?;
        if state.stop_requested {
            return Err(ChainError::AlreadyStopped);
        }
        state.buffer_mut(Role::Back).push(Box::new(task));
        Ok(())
    }

    /// Rotate the roles one stage and arm a drain cycle.
    ///
    /// Returns `Ok(false)` without rotating or waking anyone when the Back
    /// slot is empty; the short-circuit avoids spurious worker wake-ups.
    /// Otherwise the slot holding Middle becomes Front, Back becomes Middle,
    /// and the old Front slot (assumed already drained by a prior cycle) is
    /// recycled as Back.
    ///
    /// # Errors
    ///
    /// `AlreadyStopped` after `stop`.
    pub fn swap(&self) -> ChainResult<bool> {
        let mut state = self.lock_state()?;
        if state.stop_requested {
            return Err(ChainError::AlreadyStopped);
        }
        if state.buffer(Role::Back).is_empty() {
            return Ok(false);
        }

        state.rotate_roles();
        state.producer_ready = true;
        self.shared.signal.notify_all();
        Ok(true)
    }

    /// Arm a drain cycle without rotating.
    ///
    /// Releases the worker to process whatever currently holds the Front
    /// role, independent of `swap`.
    ///
    /// # Errors
    ///
    /// `AlreadyStopped` after `stop`.
    pub fn notify_producer_done(&self) -> ChainResult<()> {
        let mut state = self.lock_state()?;
        if state.stop_requested {
            return Err(ChainError::AlreadyStopped);
        }
        state.producer_ready = true;
        self.shared.signal.notify_all();
        Ok(())
    }

    /// Block until the worker signals a completed drain cycle, then consume
    /// the signal.
    ///
    /// This is the producer's synchronization barrier: when it returns, every
    /// task that was in the Front slot for the armed cycle has been invoked.
    ///
    /// # Errors
    ///
    /// `WorkerUnavailable` when the worker is not running (never started,
    /// stopped, or dead) instead of blocking forever.
    pub fn wait_for_completion(&self) -> ChainResult<()> {
        self.wait_for_completion_inner(None)
    }

    /// Bounded-wait variant of [`wait_for_completion`](Self::wait_for_completion).
    ///
    /// # Errors
    ///
    /// `CompletionTimeout` if no drain cycle completes within `timeout`;
    /// `WorkerUnavailable` as for the unbounded wait.
    pub fn wait_for_completion_timeout(&self, timeout: Duration) -> ChainResult<()> {
        self.wait_for_completion_inner(Some(timeout))
    }

    /// Whether the worker thread is currently running.
    pub fn is_worker_alive(&self) -> ChainResult<bool> {
        Ok(self.lock_state()?.worker_alive)
    }

    /// Occupancy and liveness snapshot.
    pub fn stats(&self) -> ChainResult<ChainStats> {
        Ok(self.lock_state()?.stats())
    }

    fn wait_for_completion_inner(&self, timeout: Option<Duration>) -> ChainResult<()> {
        let started = Instant::now();
        let mut state = self.lock_state()?;
        loop {
            if state.worker_ready {
                state.worker_ready = false;
                return Ok(());
            }
            if !state.worker_alive {
                return Err(ChainError::WorkerUnavailable);
            }

            state = match timeout {
                None => handle_mutex_poison(self.shared.signal.wait(state), |message| {
                    ChainError::OperationFailed { message }
                })?,
                Some(limit) => {
                    let Some(remaining) = limit.checked_sub(started.elapsed()) else {
                        return Err(ChainError::CompletionTimeout {
                            waited: started.elapsed(),
                        });
                    };
                    let (guard, _) = handle_mutex_poison(
                        self.shared.signal.wait_timeout(state, remaining),
                        |message| ChainError::OperationFailed { message },
                    )?;
                    guard
                }
            };
        }
    }

    fn lock_state(&self) -> ChainResult<MutexGuard<'_, ChainState>> {
        handle_mutex_poison(self.shared.state.lock(), |message| {
            ChainError::OperationFailed { message }
        })
    }

    fn lock_worker(&self) -> ChainResult<MutexGuard<'_, WorkerHandle>> {
        handle_mutex_poison(self.worker.lock(), |message| ChainError::OperationFailed {
            message,
        })
    }
}

impl Default for QueueChain {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for QueueChain {
    fn drop(&mut self) {
        // Best-effort shutdown so the worker thread never outlives the chain.
        let _ = self.stop();
    }
}
