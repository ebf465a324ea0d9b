//! Bounded worker pool backing blocking node bodies (§4.4, §5: "the
//! worker-pool boundary is the only place where preemptive OS threads
//! appear").

use std::future::Future;
use std::sync::Arc;
use tokio::sync::Semaphore;

/// A process-wide, shared-across-workflows pool bounding how many
/// blocking node bodies run concurrently. Cooperative (async) node bodies
/// never touch this pool; they run in-place on the scheduler's own
/// concurrency domain.
#[derive(Clone)]
pub struct WorkerPool {
    semaphore: Arc<Semaphore>,
}

impl WorkerPool {
    pub fn new(size: usize) -> Self {
        Self {
            semaphore: Arc::new(Semaphore::new(size.max(1))),
        }
    }

    /// Default worker count per §4.4.
    pub fn default_sized() -> Self {
        Self::new(4)
    }

    /// Run a blocking closure on `tokio`'s blocking thread pool, bounded
    /// by this pool's permit count.
    pub async fn run_blocking<F, T>(&self, f: F) -> Result<T, String>
    where
        F: FnOnce() -> T + Send + 'static,
        T: Send + 'static,
    {
        let permit = self
            .semaphore
            .clone()
            .acquire_owned()
            .await
            .map_err(|e| e.to_string())?;
        let result = tokio::task::spawn_blocking(move || {
            let _permit = permit;
            f()
        })
        .await
        .map_err(|e| e.to_string())?;
        Ok(result)
    }

    /// Await a cooperative future through the same permit accounting, so
    /// callers can treat both dispatch styles uniformly if desired.
    pub async fn run_cooperative<F, T>(&self, fut: F) -> Result<T, String>
    where
        F: Future<Output = T>,
    {
        let _permit = self.semaphore.acquire().await.map_err(|e| e.to_string())?;
        Ok(fut.await)
    }

    pub fn available_permits(&self) -> usize {
        self.semaphore.available_permits()
    }

    /// Drive an async node body to completion on a dedicated blocking
    /// thread, for node types marked non-`is_async` in their descriptor.
    /// Bridges the worker pool (OS-thread bounded) with node bodies whose
    /// contract is `async fn invoke` regardless of whether their
    /// implementation is actually cooperative.
    pub async fn run_blocking_future<Fut, T>(&self, fut: Fut) -> Result<T, String>
    where
        Fut: Future<Output = T> + Send + 'static,
        T: Send + 'static,
    {
        let permit = self
            .semaphore
            .clone()
            .acquire_owned()
            .await
            .map_err(|e| e.to_string())?;
        let handle = tokio::runtime::Handle::current();
        tokio::task::spawn_blocking(move || {
            let _permit = permit;
            handle.block_on(fut)
        })
        .await
        .map_err(|e| e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn default_pool_has_four_workers() {
        let pool = WorkerPool::default_sized();
        assert_eq!(pool.available_permits(), 4);
    }

    #[tokio::test]
    async fn run_blocking_returns_closure_result() {
        let pool = WorkerPool::new(2);
        let result = pool.run_blocking(|| 2 + 2).await.unwrap();
        assert_eq!(result, 4);
    }

    #[tokio::test]
    async fn pool_bounds_concurrent_blocking_work() {
        use std::sync::atomic::{AtomicUsize, Ordering};
        let pool = WorkerPool::new(1);
        let concurrent = Arc::new(AtomicUsize::new(0));
        let max_seen = Arc::new(AtomicUsize::new(0));

        let mut handles = Vec::new();
        for _ in 0..3 {
            let pool = pool.clone();
            let concurrent = concurrent.clone();
            let max_seen = max_seen.clone();
            handles.push(tokio::spawn(async move {
                pool.run_blocking(move || {
                    let now = concurrent.fetch_add(1, Ordering::SeqCst) + 1;
                    max_seen.fetch_max(now, Ordering::SeqCst);
                    std::thread::sleep(std::time::Duration::from_millis(20));
                    concurrent.fetch_sub(1, Ordering::SeqCst);
                })
                .await
                .unwrap();
            }));
        }
        for h in handles {
            h.await.unwrap();
        }
        assert_eq!(max_seen.load(Ordering::SeqCst), 1);
    }
}
