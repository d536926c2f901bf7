//! Core ambient services shared by the driver and the queue chain
//!
//! - `logging`: leveled console/file sink initialization and formats
//! - `sync`: poisoned-lock handling utilities

pub mod logging;
pub mod sync;
