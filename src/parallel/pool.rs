//! Rayon thread pool sizing for whole-catalogue work.

use rayon::ThreadPoolBuilder;
use tracing::warn;

/// Worker count for catalogue validation. `0` uses Rayon's global pool.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WorkerPool {
    pub workers: usize,
}

impl WorkerPool {
    pub fn with_workers(workers: usize) -> Self {
        Self { workers }
    }

    /// Run `f` on a pool of [WorkerPool::workers] threads. Falls back to the
    /// global pool when none is requested or the dedicated pool cannot start.
    pub fn install<F, R>(&self, f: F) -> R
    where
        F: FnOnce() -> R + Send,
        R: Send,
    {
        if self.workers == 0 {
            return f();
        }
        match ThreadPoolBuilder::new().num_threads(self.workers).build() {
            Ok(pool) => pool.install(f),
            Err(err) => {
                warn!(workers = self.workers, error = %err, "falling back to global rayon pool");
                f()
            }
        }
    }
}
