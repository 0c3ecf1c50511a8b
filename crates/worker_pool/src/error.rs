//! Worker pool error definitions

use thiserror::Error;

/// Worker pool errors
#[derive(Debug, Error)]
pub enum PoolError {
    /// Worker count rejected at construction
    #[error("invalid worker count {num_workers}: must be at least 1")]
    InvalidWorkerCount { num_workers: usize },

    /// OS-level thread spawn failure
    #[error("failed to spawn worker thread: {0}")]
    Spawn(#[from] std::io::Error),
}
