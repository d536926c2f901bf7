//! Stress scenarios for the queue chain driver
//!
//! Each scenario builds its own chain, drives it through the public contract,
//! and returns an execution report. The sequences mirror classic
//! swapchain-style driver patterns: bulk submission, rapid rotation,
//! concurrent producers, empty rotations, mixed call orders, and sustained
//! load with a matrix-multiply payload.

use crate::app::cli::Args;
use crate::queue::api::{ChainError, ChainResult, QueueChain};
use crate::workload;
use serde::Serialize;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use strum::IntoEnumIterator;
use strum_macros::EnumIter;

/// Stress scenario options for the driver
#[derive(EnumIter, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Scenario {
    /// A large batch enqueued up front, then drained
    HighVolume,
    /// One task per rotation, a thousand rotations
    RapidSwapping,
    /// Unsynchronized producer threads appending concurrently
    ConcurrentSubmission,
    /// Rotations and rendezvous against empty slots
    EmptyQueue,
    /// Submissions, rotations and waits in an arbitrary order
    MixedOperations,
    /// Sustained matrix-multiply load until a deadline
    Continuous,
}

impl Scenario {
    pub fn name(&self) -> &'static str {
        match self {
            Self::HighVolume => "high-volume",
            Self::RapidSwapping => "rapid-swapping",
            Self::ConcurrentSubmission => "concurrent-submission",
            Self::EmptyQueue => "empty-queue",
            Self::MixedOperations => "mixed-operations",
            Self::Continuous => "continuous",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::iter().find(|scenario| scenario.name() == name)
    }
}

/// Outcome of one scenario run.
#[derive(Debug, Clone, Serialize)]
pub struct ScenarioReport {
    pub name: String,
    pub tasks_executed: usize,
    pub elapsed_ms: u128,
}

pub fn run_scenario(scenario: Scenario, args: &Args) -> ChainResult<ScenarioReport> {
    log::info!("scenario {} starting", scenario.name());
    let started = Instant::now();

    let tasks_executed = match scenario {
        Scenario::HighVolume => high_volume(args.tasks)?,
        Scenario::RapidSwapping => rapid_swapping()?,
        Scenario::ConcurrentSubmission => {
            concurrent_submission(args.producers, args.tasks_per_producer)?
        }
        Scenario::EmptyQueue => empty_queue()?,
        Scenario::MixedOperations => mixed_operations()?,
        Scenario::Continuous => continuous(Duration::from_secs(args.duration_secs))?,
    };

    Ok(ScenarioReport {
        name: scenario.name().to_string(),
        tasks_executed,
        elapsed_ms: started.elapsed().as_millis(),
    })
}

/// One full driver beat: rotate, release the worker, wait for the drain.
fn drive_cycle(chain: &QueueChain) -> ChainResult<()> {
    chain.swap()?;
    chain.notify_producer_done()?;
    chain.wait_for_completion()
}

/// Keep cycling with filler tasks until `target` executions are observed.
///
/// A batch needs two rotations to reach the Front slot and rotations
/// short-circuit on an empty Back slot, so each cycle carries a no-op filler;
/// the spare iterations absorb coalesced readiness signals.
fn drain_pipeline(
    chain: &QueueChain,
    executed: &Arc<AtomicUsize>,
    target: usize,
) -> ChainResult<()> {
    for _ in 0..32 {
        if executed.load(Ordering::Relaxed) >= target {
            return Ok(());
        }
        chain.write_to_back(|| {})?;
        drive_cycle(chain)?;
    }

    let observed = executed.load(Ordering::Relaxed);
    if observed < target {
        log::warn!("pipeline drain fell short: {observed} of {target} task(s) executed");
    }
    Ok(())
}

fn counting_task(executed: &Arc<AtomicUsize>) -> impl FnOnce() + Send + 'static {
    let executed = Arc::clone(executed);
    move || {
        executed.fetch_add(1, Ordering::Relaxed);
    }
}

fn high_volume(task_count: usize) -> ChainResult<usize> {
    let chain = QueueChain::new();
    chain.start()?;

    let executed = Arc::new(AtomicUsize::new(0));
    for _ in 0..task_count {
        chain.write_to_back(counting_task(&executed))?;
    }
    log::debug!("high-volume: {task_count} task(s) enqueued");

    drain_pipeline(&chain, &executed, task_count)?;
    chain.stop()?;

    Ok(executed.load(Ordering::Relaxed))
}

fn rapid_swapping() -> ChainResult<usize> {
    const SWAP_COUNT: usize = 1000;

    let chain = QueueChain::new();
    chain.start()?;

    let executed = Arc::new(AtomicUsize::new(0));
    for _ in 0..SWAP_COUNT {
        chain.write_to_back(counting_task(&executed))?;
        chain.swap()?;
    }

    drain_pipeline(&chain, &executed, SWAP_COUNT)?;
    chain.stop()?;

    Ok(executed.load(Ordering::Relaxed))
}

fn concurrent_submission(producers: usize, tasks_per_producer: usize) -> ChainResult<usize> {
    let chain = Arc::new(QueueChain::new());
    chain.start()?;

    let executed = Arc::new(AtomicUsize::new(0));
    let mut handles = Vec::with_capacity(producers);

    for _ in 0..producers {
        let chain = Arc::clone(&chain);
        let executed = Arc::clone(&executed);
        handles.push(std::thread::spawn(move || -> ChainResult<()> {
            for _ in 0..tasks_per_producer {
                chain.write_to_back(counting_task(&executed))?;
            }
            Ok(())
        }));
    }

    for handle in handles {
        handle.join().map_err(|_| ChainError::OperationFailed {
            message: "producer thread panicked".to_string(),
        })??;
    }
    log::debug!(
        "concurrent-submission: {} task(s) enqueued by {producers} producer(s)",
        producers * tasks_per_producer
    );

    drain_pipeline(&chain, &executed, producers * tasks_per_producer)?;
    chain.stop()?;

    Ok(executed.load(Ordering::Relaxed))
}

fn empty_queue() -> ChainResult<usize> {
    let chain = QueueChain::new();
    chain.start()?;

    // Rotation with an empty Back slot is a deliberate no-op; the notify
    // still releases the worker for an empty drain.
    let rotated = chain.swap()?;
    chain.notify_producer_done()?;
    chain.wait_for_completion()?;
    log::debug!("empty-queue: rotation performed: {rotated}");

    let executed = Arc::new(AtomicUsize::new(0));
    chain.write_to_back(counting_task(&executed))?;
    drain_pipeline(&chain, &executed, 1)?;
    chain.stop()?;

    Ok(executed.load(Ordering::Relaxed))
}

fn mixed_operations() -> ChainResult<usize> {
    let chain = QueueChain::new();
    chain.start()?;

    let executed = Arc::new(AtomicUsize::new(0));
    let mut enqueued = 0usize;

    for i in 0..100 {
        if i % 2 == 0 {
            chain.write_to_back(counting_task(&executed))?;
            enqueued += 1;
        } else if i % 3 == 0 {
            chain.swap()?;
        } else {
            chain.notify_producer_done()?;
            chain.wait_for_completion()?;
        }
    }

    drain_pipeline(&chain, &executed, enqueued)?;
    chain.stop()?;

    Ok(executed.load(Ordering::Relaxed))
}

fn continuous(duration: Duration) -> ChainResult<usize> {
    let chain = QueueChain::new();
    chain.start()?;

    let executed = Arc::new(AtomicUsize::new(0));
    let deadline = Instant::now() + duration;
    let mut cycles = 0usize;

    while Instant::now() < deadline {
        let executed_in_task = Arc::clone(&executed);
        chain.write_to_back(move || {
            let a = workload::generate_matrix(4, 4, 100);
            let b = workload::generate_matrix(4, 4, 100);
            let product = workload::multiply(&a, &b);
            log::trace!("matrix product computed: {product:?}");
            executed_in_task.fetch_add(1, Ordering::Relaxed);
        })?;
        drive_cycle(&chain)?;
        cycles += 1;
    }

    drain_pipeline(&chain, &executed, cycles)?;
    chain.stop()?;

    log::debug!("continuous: {cycles} cycle(s) driven before the deadline");
    Ok(executed.load(Ordering::Relaxed))
}
