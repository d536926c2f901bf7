//! Synchronization utilities for robust mutex handling
//!
//! This module provides utilities for handling mutex poisoning in a
//! consistent manner across the codebase. A poisoned lock means a thread
//! panicked while holding it; the helpers convert that condition into an
//! application-specific error instead of propagating the panic.

use std::sync::LockResult;

/// Handle poisoned lock results with consistent error handling
///
/// Converts a poison error from a mutex lock or condition-variable wait into
/// an application error built by the provided constructor. Both operations
/// yield `LockResult`-shaped values, so one helper serves both call sites.
///
/// # Arguments
/// * `result` - The result from a lock or wait operation
/// * `error_constructor` - Function to create the appropriate error type
///
/// # Returns
/// The guard (or guard/timeout pair) on success, or an application error on
/// poison
///
/// # Examples
/// ```
/// use std::sync::Mutex;
/// use taskchain::core::sync::handle_mutex_poison;
/// use taskchain::queue::ChainError;
///
/// let mutex = Mutex::new(42);
/// let guard = handle_mutex_poison(
///     mutex.lock(),
///     |message| ChainError::OperationFailed { message }
/// ).unwrap();
/// assert_eq!(*guard, 42);
/// ```
pub fn handle_mutex_poison<T, E>(
    result: LockResult<T>,
    error_constructor: impl FnOnce(String) -> E,
) -> Result<T, E> {
    result.map_err(|poison_err| {
        error_constructor(format!(
            "Internal synchronisation error (lock poisoned). This indicates a panic occurred while holding a lock. PoisonError: {:?}",
            poison_err
        ))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Condvar, Mutex};
    use std::thread;
    use std::time::Duration;

    #[derive(Debug, PartialEq)]
    struct TestError {
        message: String,
    }

    #[test]
    fn test_handle_mutex_poison_success() {
        let mutex = Arc::new(Mutex::new(42));
        let result = handle_mutex_poison(mutex.lock(), |message| TestError { message });

        assert!(result.is_ok());
        assert_eq!(*result.unwrap(), 42);
    }

    #[test]
    fn test_handle_mutex_poison_with_poisoned_mutex() {
        let mutex = Arc::new(Mutex::new(42));
        let mutex_clone = Arc::clone(&mutex);

        // Poison the mutex by panicking while holding the lock
        let _ = thread::spawn(move || {
            let _guard = mutex_clone.lock().unwrap();
            panic!("Intentional panic to poison mutex");
        })
        .join();

        let result = handle_mutex_poison(mutex.lock(), |message| TestError { message });

        assert!(result.is_err());
        let error = result.unwrap_err();
        assert!(error.message.contains("lock poisoned"));
        assert!(error.message.contains("panic occurred"));
    }

    #[test]
    fn test_handle_mutex_poison_covers_condvar_wait() {
        let mutex = Mutex::new(false);
        let condvar = Condvar::new();

        let guard = mutex.lock().unwrap();
        let result = handle_mutex_poison(
            condvar.wait_timeout(guard, Duration::from_millis(10)),
            |message| TestError { message },
        );

        let (guard, timeout) = result.unwrap();
        assert!(!*guard);
        assert!(timeout.timed_out());
    }
}
