//! Reusable bounded task pool
//!
//! One pool is created per analyzer and shared by every stage and BFS
//! level. Capacity is enforced with semaphore permits: submission of a
//! batch item waits for a free permit, so backpressure is explicit and no
//! stage ever spawns more than the configured number of concurrent tasks.

use std::future::Future;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;

/// A fixed-capacity pool for running batches of homogeneous async tasks
pub struct TaskPool {
    permits: Arc<Semaphore>,
}

impl TaskPool {
    /// Creates a pool that runs at most `workers` tasks concurrently
    pub fn new(workers: usize) -> Self {
        Self {
            permits: Arc::new(Semaphore::new(workers)),
        }
    }

    /// Runs one task per item, bounded by the pool capacity
    ///
    /// Results come back in completion order, not submission order. A task
    /// that panics contributes nothing to the results; the rest of the
    /// batch is unaffected.
    pub async fn run_batch<I, T, F, Fut>(&self, items: Vec<I>, task: F) -> Vec<T>
    where
        I: Send + 'static,
        T: Send + 'static,
        F: Fn(I) -> Fut + Clone + Send + 'static,
        Fut: Future<Output = T> + Send + 'static,
    {
        let mut join_set = JoinSet::new();
        for item in items {
            // Only fails if the semaphore is closed, which never happens here
            let permit = match self.permits.clone().acquire_owned().await {
                Ok(permit) => permit,
                Err(_) => break,
            };
            let task = task.clone();
            join_set.spawn(async move {
                let _permit = permit;
                task(item).await
            });
        }

        let mut results = Vec::with_capacity(join_set.len());
        while let Some(joined) = join_set.join_next().await {
            match joined {
                Ok(value) => results.push(value),
                Err(e) => tracing::warn!("Pool task did not complete: {}", e),
            }
        }
        results
    }
}
