//! # Worker Pool
//!
//! Fixed-size blocking thread pool for per-camera processing tasks.
//!
//! - `enqueue` never blocks the caller
//! - `wait_for_empty_queue` blocks until nothing is queued or running
//! - `stop` cancels queued tasks, lets in-flight tasks finish, joins workers
//!
//! Tasks run in arrival order per worker, with no cross-worker ordering
//! guarantee. Callers must not depend on execution order.

mod error;
mod pool;

pub use error::PoolError;
pub use pool::WorkerPool;
