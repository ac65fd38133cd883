//! The bounded worker pool every fan-out in the crate runs on.

use futures_util::stream::{self, StreamExt};
use std::future::Future;
use std::thread;

/// How many fetch tasks may be in flight at once.
///
/// `Parallel` drives up to `workers` tasks concurrently and yields results in
/// completion order. `Sequential` awaits one task at a time in input order,
/// which makes runs reproducible when debugging or testing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkerPool {
    Parallel { workers: usize },
    Sequential,
}

impl Default for WorkerPool {
    fn default() -> Self {
        Self::from_available_parallelism()
    }
}

impl WorkerPool {
    /// `max(available_parallelism - 1, 1)` workers.
    pub fn from_available_parallelism() -> Self {
        let cores = thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(1);
        Self::parallel(cores.saturating_sub(1))
    }

    /// A parallel pool; zero is raised to one worker.
    pub fn parallel(workers: usize) -> Self {
        Self::Parallel {
            workers: workers.max(1),
        }
    }

    pub fn workers(&self) -> usize {
        match self {
            WorkerPool::Parallel { workers } => *workers,
            WorkerPool::Sequential => 1,
        }
    }

    /// Runs `task` for every item and collects all outputs.
    ///
    /// This is a join barrier: it returns only once every task has finished.
    /// Output order is unspecified for `Parallel`.
    pub async fn run<I, F, Fut>(&self, items: I, task: F) -> Vec<Fut::Output>
    where
        I: IntoIterator,
        F: FnMut(I::Item) -> Fut,
        Fut: Future,
    {
        match self {
            WorkerPool::Sequential => {
                let mut task = task;
                let mut outputs = Vec::new();
                for item in items {
                    outputs.push(task(item).await);
                }
                outputs
            }
            WorkerPool::Parallel { workers } => {
                stream::iter(items)
                    .map(task)
                    .buffer_unordered(*workers)
                    .collect()
                    .await
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::time::Duration;

    #[test]
    fn test_pool_size_floor_is_one() {
        assert_eq!(WorkerPool::parallel(0).workers(), 1);
        assert!(WorkerPool::from_available_parallelism().workers() >= 1);
        assert_eq!(WorkerPool::Sequential.workers(), 1);
    }

    #[tokio::test]
    async fn test_sequential_keeps_input_order() {
        let out = WorkerPool::Sequential
            .run(vec![3u64, 1, 2], |n| async move {
                tokio::time::sleep(Duration::from_millis(n)).await;
                n
            })
            .await;
        assert_eq!(out, vec![3, 1, 2]);
    }

    #[tokio::test]
    async fn test_parallel_is_bounded_and_complete() {
        let in_flight = Arc::new(AtomicUsize::new(0));
        let peak = Arc::new(AtomicUsize::new(0));

        let out = WorkerPool::parallel(2)
            .run(0..8u64, |n| {
                let in_flight = in_flight.clone();
                let peak = peak.clone();
                async move {
                    let now = in_flight.fetch_add(1, Ordering::SeqCst) + 1;
                    peak.fetch_max(now, Ordering::SeqCst);
                    tokio::time::sleep(Duration::from_millis(5)).await;
                    in_flight.fetch_sub(1, Ordering::SeqCst);
                    n
                }
            })
            .await;

        let mut sorted = out.clone();
        sorted.sort();
        assert_eq!(sorted, (0..8).collect::<Vec<_>>());
        assert!(peak.load(Ordering::SeqCst) <= 2);
    }
}
