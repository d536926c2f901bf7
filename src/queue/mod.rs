//! Queue Chain Component
//!
//! A triple-buffered task-offload primitive: producers enqueue deferred,
//! zero-argument units of work without blocking on their execution, while a
//! single dedicated worker thread drains a rotating buffer under an explicit
//! two-flag rendezvous.
//!
//! # Overview
//!
//! The chain owns three task buffers under a role indirection
//! (Front/Middle/Back). Producers append to the Back slot; `swap` rotates the
//! roles so enqueued work migrates toward Front; the worker drains the Front
//! slot and signals completion back to the producer side. Key features:
//!
//! - **Non-blocking producers**: `write_to_back` never waits on execution
//! - **Single consumer**: exactly one worker thread drains the Front slot
//! - **FIFO within a cycle**: tasks in a slot execute in enqueue order
//! - **Two-flag rendezvous**: producer-readiness releases the worker,
//!   worker-readiness releases `wait_for_completion`
//! - **Hardened lifecycle**: structural misuse, task panics, and missed
//!   wakes surface as typed errors instead of hanging or dying silently
//!
//! # Architecture
//!
//! ```text
//! ┌────────────┐   ┌────────────┐   ┌────────────┐
//! │ Producer A │   │ Producer B │   │ Producer C │
//! └─────┬──────┘   └─────┬──────┘   └─────┬──────┘
//!       │ write_to_back  │                │
//!       ▼                ▼                ▼
//! ┌──────────────────────────────────────────────────┐
//! │ QueueChain                                       │
//! │                                                  │
//! │    Back ──swap──► Middle ──swap──► Front         │
//! │   [t4 t5]         [t2 t3]         [t0 t1]        │
//! │                                      │           │
//! └──────────────────────────────────────┼───────────┘
//!                                        │ drain (FIFO)
//!                                ┌───────▼───────┐
//!                                │ worker thread │
//!                                └───────────────┘
//! ```
//!
//! Content reaches the Front slot two rotations after it is enqueued, and a
//! rotation with an empty Back slot is a deliberate no-op, so a pipeline
//! under light load needs fresh Back content to keep advancing.
//!
//! # Example Usage
//!
//! ```rust,no_run
//! use taskchain::queue::QueueChain;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let chain = QueueChain::new();
//! chain.start()?;
//!
//! chain.write_to_back(|| println!("deferred work"))?;
//! chain.swap()?;
//! chain.wait_for_completion()?;
//!
//! // The task is now in the Middle slot; a second cycle (carrying fresh
//! // Back content past the empty-rotate short-circuit) lands it in Front.
//! chain.write_to_back(|| {})?;
//! chain.swap()?;
//! chain.wait_for_completion()?;
//!
//! chain.stop()?;
//! # Ok(())
//! # }
//! ```

mod buffer;
mod chain;
mod error;
mod internal;
mod types;
mod worker;

pub mod api;

pub use buffer::TaskBuffer;
pub use chain::QueueChain;
pub use error::{ChainError, ChainResult};
pub use types::{ChainStats, Role, Task};

#[cfg(test)]
mod tests;
