//! Tests for concurrent producers against the single worker

#[cfg(test)]
mod tests {
    use crate::queue::api::QueueChain;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn test_concurrent_producers_execute_exactly_once() {
        const PRODUCERS: usize = 10;
        const TASKS_PER_PRODUCER: usize = 1000;

        let chain = Arc::new(QueueChain::new());
        chain.start().unwrap();

        let executed = Arc::new(AtomicUsize::new(0));

        let mut handles = Vec::with_capacity(PRODUCERS);
        for _ in 0..PRODUCERS {
            let chain = Arc::clone(&chain);
            let executed = Arc::clone(&executed);
            handles.push(thread::spawn(move || {
                for _ in 0..TASKS_PER_PRODUCER {
                    let executed = Arc::clone(&executed);
                    chain
                        .write_to_back(move || {
                            executed.fetch_add(1, Ordering::SeqCst);
                        })
                        .unwrap();
                }
            }));
        }
        for handle in handles {
            handle.join().unwrap();
        }

        // One rotation only moves the batch to the Middle slot: nothing has
        // reached Front yet, so nothing executes in this cycle.
        assert!(chain.swap().unwrap());
        chain.wait_for_completion().unwrap();
        assert_eq!(executed.load(Ordering::SeqCst), 0);

        // The remainder executes on a later cycle.
        chain.write_to_back(|| {}).unwrap();
        assert!(chain.swap().unwrap());
        chain.wait_for_completion().unwrap();
        assert_eq!(
            executed.load(Ordering::SeqCst),
            PRODUCERS * TASKS_PER_PRODUCER,
            "every enqueued task must execute exactly once"
        );

        chain.stop().unwrap();
    }

    #[test]
    fn test_producers_keep_appending_while_the_worker_drains() {
        const PRODUCERS: usize = 4;
        const TASKS_PER_PRODUCER: usize = 500;
        const TARGET: usize = PRODUCERS * TASKS_PER_PRODUCER;

        let chain = Arc::new(QueueChain::new());
        chain.start().unwrap();

        let executed = Arc::new(AtomicUsize::new(0));

        let mut handles = Vec::with_capacity(PRODUCERS);
        for _ in 0..PRODUCERS {
            let chain = Arc::clone(&chain);
            let executed = Arc::clone(&executed);
            handles.push(thread::spawn(move || {
                for _ in 0..TASKS_PER_PRODUCER {
                    let executed = Arc::clone(&executed);
                    chain
                        .write_to_back(move || {
                            executed.fetch_add(1, Ordering::SeqCst);
                        })
                        .unwrap();
                }
            }));
        }

        // Drive cycles while the producers are still appending; each cycle
        // carries a filler so rotations never short-circuit.
        let mut cycles = 0usize;
        while executed.load(Ordering::SeqCst) < TARGET && cycles < 2 * TARGET {
            chain.write_to_back(|| {}).unwrap();
            assert!(chain.swap().unwrap());
            chain.wait_for_completion().unwrap();
            cycles += 1;
        }
        for handle in handles {
            handle.join().unwrap();
        }

        // Flush whatever the last producer appended after the final cycle.
        for _ in 0..3 {
            chain.write_to_back(|| {}).unwrap();
            assert!(chain.swap().unwrap());
            chain.wait_for_completion().unwrap();
        }

        assert_eq!(executed.load(Ordering::SeqCst), TARGET);

        chain.stop().unwrap();
    }
}
