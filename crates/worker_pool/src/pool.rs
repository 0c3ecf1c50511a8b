//! Fixed-size thread pool with queue-drain waiting.

use std::collections::VecDeque;
use std::panic::{self, AssertUnwindSafe};
use std::sync::{Arc, Condvar, Mutex, MutexGuard, PoisonError};
use std::thread::{self, JoinHandle};

use tracing::{debug, error, warn};

use crate::PoolError;

type Task = Box<dyn FnOnce() + Send + 'static>;

/// Shared pool state behind the lock
struct PoolState {
    /// Tasks waiting to start
    queue: VecDeque<Task>,
    /// Tasks currently executing on a worker
    active: usize,
    /// Set once by `stop`; no task starts after this
    stopped: bool,
}

struct PoolShared {
    state: Mutex<PoolState>,
    /// Signaled when a task is queued or the pool stops
    task_ready: Condvar,
    /// Signaled when the queue drains (no queued or active tasks)
    queue_drained: Condvar,
}

impl PoolShared {
    fn lock_state(&self) -> MutexGuard<'_, PoolState> {
        // A panicking task must not wedge the pool for everyone else.
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Fixed-size set of background worker threads.
///
/// Worker count is fixed at construction. Tasks are picked up by any idle
/// worker; there is no ordering guarantee across workers.
pub struct WorkerPool {
    shared: Arc<PoolShared>,
    workers: Vec<JoinHandle<()>>,
}

impl WorkerPool {
    /// Create a pool with `num_workers` threads (must be >= 1)
    pub fn new(num_workers: usize) -> Result<Self, PoolError> {
        if num_workers == 0 {
            return Err(PoolError::InvalidWorkerCount { num_workers });
        }

        let shared = Arc::new(PoolShared {
            state: Mutex::new(PoolState {
                queue: VecDeque::new(),
                active: 0,
                stopped: false,
            }),
            task_ready: Condvar::new(),
            queue_drained: Condvar::new(),
        });

        let mut workers = Vec::with_capacity(num_workers);
        for i in 0..num_workers {
            let worker_shared = Arc::clone(&shared);
            let spawn_result = thread::Builder::new()
                .name(format!("pool-worker-{i}"))
                .spawn(move || worker_loop(worker_shared, i));

            match spawn_result {
                Ok(handle) => workers.push(handle),
                Err(e) => {
                    // Roll back the workers spawned so far before failing.
                    let mut pool = Self { shared, workers };
                    pool.stop();
                    return Err(PoolError::Spawn(e));
                }
            }
        }

        debug!(num_workers, "worker pool started");
        Ok(Self { shared, workers })
    }

    /// Schedule `task` for execution on any idle worker.
    ///
    /// Returns immediately. Returns `false` (and logs) if the pool has been
    /// stopped, in which case the task is discarded.
    pub fn enqueue(&self, task: impl FnOnce() + Send + 'static) -> bool {
        let mut state = self.shared.lock_state();
        if state.stopped {
            warn!("task enqueued after pool stop, discarding");
            return false;
        }
        state.queue.push_back(Box::new(task));
        metrics::gauge!("pool_queue_depth").set(state.queue.len() as f64);
        drop(state);

        self.shared.task_ready.notify_one();
        true
    }

    /// Block until no tasks remain queued or executing.
    ///
    /// Returns immediately if the pool has been stopped.
    pub fn wait_for_empty_queue(&self) {
        let mut state = self.shared.lock_state();
        while !state.stopped && !(state.queue.is_empty() && state.active == 0) {
            state = self
                .shared
                .queue_drained
                .wait(state)
                .unwrap_or_else(PoisonError::into_inner);
        }
    }

    /// Number of tasks queued but not yet started
    pub fn queue_len(&self) -> usize {
        self.shared.lock_state().queue.len()
    }

    /// Stop the pool: discard queued tasks, let in-flight tasks finish,
    /// join all workers. Idempotent.
    pub fn stop(&mut self) {
        {
            let mut state = self.shared.lock_state();
            if state.stopped {
                return;
            }
            state.stopped = true;
            let discarded = state.queue.len();
            state.queue.clear();
            if discarded > 0 {
                debug!(discarded, "discarding queued tasks on stop");
            }
        }
        self.shared.task_ready.notify_all();
        self.shared.queue_drained.notify_all();

        for handle in self.workers.drain(..) {
            if handle.join().is_err() {
                warn!("worker thread terminated by panic");
            }
        }
        debug!("worker pool stopped");
    }
}

impl Drop for WorkerPool {
    fn drop(&mut self) {
        self.stop();
    }
}

fn worker_loop(shared: Arc<PoolShared>, worker_index: usize) {
    loop {
        let task = {
            let mut state = shared.lock_state();
            loop {
                if state.stopped {
                    return;
                }
                if let Some(task) = state.queue.pop_front() {
                    state.active += 1;
                    metrics::gauge!("pool_queue_depth").set(state.queue.len() as f64);
                    break task;
                }
                state = shared
                    .task_ready
                    .wait(state)
                    .unwrap_or_else(PoisonError::into_inner);
            }
        };

        if panic::catch_unwind(AssertUnwindSafe(task)).is_err() {
            error!(worker_index, "task panicked");
            metrics::counter!("pool_task_panics_total").increment(1);
        }
        metrics::counter!("pool_tasks_executed_total").increment(1);

        let mut state = shared.lock_state();
        state.active -= 1;
        if state.queue.is_empty() && state.active == 0 {
            shared.queue_drained.notify_all();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    #[test]
    fn test_zero_workers_rejected() {
        assert!(matches!(
            WorkerPool::new(0),
            Err(PoolError::InvalidWorkerCount { num_workers: 0 })
        ));
    }

    #[test]
    fn test_runs_all_tasks() {
        let pool = WorkerPool::new(4).unwrap();
        let counter = Arc::new(AtomicUsize::new(0));

        for _ in 0..100 {
            let counter = Arc::clone(&counter);
            assert!(pool.enqueue(move || {
                counter.fetch_add(1, Ordering::SeqCst);
            }));
        }

        pool.wait_for_empty_queue();
        assert_eq!(counter.load(Ordering::SeqCst), 100);
    }

    #[test]
    fn test_wait_covers_in_flight_tasks() {
        let pool = WorkerPool::new(1).unwrap();
        let counter = Arc::new(AtomicUsize::new(0));

        let task_counter = Arc::clone(&counter);
        pool.enqueue(move || {
            thread::sleep(Duration::from_millis(50));
            task_counter.fetch_add(1, Ordering::SeqCst);
        });

        pool.wait_for_empty_queue();
        assert_eq!(counter.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_enqueue_after_stop_is_rejected() {
        let mut pool = WorkerPool::new(2).unwrap();
        pool.stop();

        let counter = Arc::new(AtomicUsize::new(0));
        let task_counter = Arc::clone(&counter);
        assert!(!pool.enqueue(move || {
            task_counter.fetch_add(1, Ordering::SeqCst);
        }));
        assert_eq!(counter.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_stop_is_idempotent() {
        let mut pool = WorkerPool::new(2).unwrap();
        pool.stop();
        pool.stop();
    }

    #[test]
    fn test_panicking_task_does_not_wedge_pool() {
        let pool = WorkerPool::new(1).unwrap();
        pool.enqueue(|| panic!("boom"));

        let counter = Arc::new(AtomicUsize::new(0));
        let task_counter = Arc::clone(&counter);
        pool.enqueue(move || {
            task_counter.fetch_add(1, Ordering::SeqCst);
        });

        pool.wait_for_empty_queue();
        assert_eq!(counter.load(Ordering::SeqCst), 1);
    }
}
