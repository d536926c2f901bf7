//! Queue Chain Error Types

use std::time::Duration;

#[derive(Debug, thiserror::Error)]
pub enum ChainError {
    #[error("Worker already started")]
    AlreadyStarted,

    #[error("Chain already stopped")]
    AlreadyStopped,

    #[error("Worker thread is not running")]
    WorkerUnavailable,

    #[error("Timed out after {waited:?} waiting for the worker to finish draining")]
    CompletionTimeout { waited: Duration },

    #[error("Failed to spawn worker thread: {0}")]
    Spawn(#[from] std::io::Error),

    #[error("Worker thread panicked outside a task boundary")]
    WorkerPanicked,

    #[error("Operation failed: {message}")]
    OperationFailed { message: String },
}

/// Result type for chain operations
pub type ChainResult<T> = Result<T, ChainError>;
