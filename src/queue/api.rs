//! Public API for the queue chain
//!
//! This module provides the complete public API for the task-offload chain.
//! External modules should import from here rather than directly from the
//! internal modules. See the module documentation for usage examples and
//! architecture details.

// Core chain component
pub use crate::queue::chain::QueueChain;

// Buffer and shared types
pub use crate::queue::buffer::TaskBuffer;
pub use crate::queue::types::{ChainStats, Role, Task};

// Error handling
pub use crate::queue::error::{ChainError, ChainResult};
