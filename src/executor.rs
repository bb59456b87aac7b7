//! # Executor Module
//!
//! Execution modes and the worker pool that runs blocking or offloaded
//! handler chains.
//!
//! ## Overview
//!
//! The event-loop coroutines that accept requests must never run a call
//! known to block. The binder therefore dispatches such chains to a
//! [`WorkerPool`] — N worker coroutines sharing an MPSC task queue — or to a
//! route-scoped [`Executor`] supplied by the application.
//!
//! ## Configuration
//!
//! - `BRRTP_EXECUTION_MODE`: `event_loop`, `worker`, or `custom` (default: `event_loop`)
//! - `BRRTP_WORKERS`: number of worker coroutines (default: 4)
//! - `BRRTP_QUEUE_BOUND`: advisory queue depth for metrics (default: 1024)
//! - `BRRTP_STACK_SIZE`: worker coroutine stack size (default: 0x10000)

use may::sync::mpsc;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;
use tracing::{debug, error, info};

use crate::runtime_config::parse_size;

/// A unit of work moved onto another coroutine.
pub type Task = Box<dyn FnOnce() + Send + 'static>;

/// Something that can run tasks away from the calling coroutine.
///
/// Implementations must not run the task inline; the caller relies on
/// `execute` returning immediately.
pub trait Executor: Send + Sync {
    fn execute(&self, task: Task);
}

/// Process-wide execution mode, chosen at startup and immutable thereafter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecutionMode {
    /// Run non-blocking chains directly on the event loop; offload anything
    /// flagged blocking to the worker pool.
    EventLoop,
    /// Offload every chain to the worker pool.
    Worker,
    /// Run everything directly; the caller has already arranged execution.
    Custom,
}

impl ExecutionMode {
    /// Parse an execution mode from string.
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "event_loop" => Some(Self::EventLoop),
            "worker" => Some(Self::Worker),
            "custom" => Some(Self::Custom),
            _ => None,
        }
    }

    /// Load the mode from `BRRTP_EXECUTION_MODE`, defaulting to event loop.
    #[must_use]
    pub fn from_env() -> Self {
        std::env::var("BRRTP_EXECUTION_MODE")
            .ok()
            .and_then(|s| Self::from_str(&s))
            .unwrap_or_default()
    }
}

impl Default for ExecutionMode {
    fn default() -> Self {
        Self::EventLoop
    }
}

/// Configuration for the worker pool.
#[derive(Debug, Clone)]
pub struct WorkerPoolConfig {
    /// Number of worker coroutines
    pub num_workers: usize,
    /// Advisory queue depth, tracked by metrics
    pub queue_bound: usize,
    /// Stack size for worker coroutines
    pub stack_size: usize,
}

impl WorkerPoolConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let num_workers = std::env::var("BRRTP_WORKERS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(4);

        let queue_bound = std::env::var("BRRTP_QUEUE_BOUND")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(1024);

        let stack_size = std::env::var("BRRTP_STACK_SIZE")
            .ok()
            .and_then(|s| parse_size(&s))
            .unwrap_or(0x10000);

        Self {
            num_workers,
            queue_bound,
            stack_size,
        }
    }

    /// Create a custom configuration.
    pub fn new(num_workers: usize, queue_bound: usize, stack_size: usize) -> Self {
        Self {
            num_workers,
            queue_bound,
            stack_size,
        }
    }
}

impl Default for WorkerPoolConfig {
    fn default() -> Self {
        Self {
            num_workers: 4,
            queue_bound: 1024,
            stack_size: 0x10000, // 64KB
        }
    }
}

/// Metrics for a worker pool.
#[derive(Debug, Default)]
pub struct WorkerPoolMetrics {
    /// Current queue depth (approximate)
    pub queue_depth: AtomicUsize,
    /// Total tasks dispatched
    pub dispatched_count: AtomicU64,
    /// Total tasks completed
    pub completed_count: AtomicU64,
}

impl WorkerPoolMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_dispatch(&self) {
        self.dispatched_count.fetch_add(1, Ordering::Relaxed);
        self.queue_depth.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_completion(&self) {
        self.completed_count.fetch_add(1, Ordering::Relaxed);
        self.queue_depth.fetch_sub(1, Ordering::Relaxed);
    }

    pub fn get_queue_depth(&self) -> usize {
        self.queue_depth.load(Ordering::Relaxed)
    }

    pub fn get_dispatched_count(&self) -> u64 {
        self.dispatched_count.load(Ordering::Relaxed)
    }

    pub fn get_completed_count(&self) -> u64 {
        self.completed_count.load(Ordering::Relaxed)
    }
}

/// A pool of worker coroutines sharing one task queue.
///
/// Workers automatically load balance across the queue; a panicking task is
/// caught and logged without taking the worker down.
pub struct WorkerPool {
    config: WorkerPoolConfig,
    sender: mpsc::Sender<Task>,
    metrics: Arc<WorkerPoolMetrics>,
    name: String,
}

impl WorkerPool {
    /// Create a new worker pool with the given configuration.
    ///
    /// # Safety
    ///
    /// This function is marked unsafe because it spawns coroutines using
    /// `may::coroutine::Builder::spawn()`, which is unsafe in the `may`
    /// runtime. The caller must ensure the May coroutine runtime is properly
    /// initialized.
    pub unsafe fn new(name: &str, config: WorkerPoolConfig) -> Self {
        let (tx, rx) = mpsc::channel::<Task>();
        let metrics = Arc::new(WorkerPoolMetrics::new());
        let rx = Arc::new(rx);

        info!(
            pool = name,
            num_workers = config.num_workers,
            queue_bound = config.queue_bound,
            stack_size = config.stack_size,
            "Creating worker pool"
        );

        for worker_id in 0..config.num_workers {
            let rx = Arc::clone(&rx);
            let metrics = Arc::clone(&metrics);
            let pool_name = name.to_string();

            // SAFETY: may::coroutine::Builder::spawn() is marked unsafe by the
            // may runtime. The task closures are Send + 'static and workers
            // only touch the shared receiver and metrics, both of which
            // outlive them through their Arcs.
            let spawn_result = unsafe {
                may::coroutine::Builder::new()
                    .stack_size(config.stack_size)
                    .spawn(move || {
                        debug!(pool = %pool_name, worker_id, "Worker coroutine started");
                        loop {
                            match rx.recv() {
                                Ok(task) => {
                                    if let Err(panic) = std::panic::catch_unwind(
                                        std::panic::AssertUnwindSafe(task),
                                    ) {
                                        error!(
                                            pool = %pool_name,
                                            worker_id,
                                            panic_message = ?panic,
                                            "Task panicked - CRITICAL"
                                        );
                                    }
                                    metrics.record_completion();
                                }
                                Err(_) => {
                                    // Channel closed, exit worker
                                    break;
                                }
                            }
                        }
                        debug!(pool = %pool_name, worker_id, "Worker coroutine exiting");
                    })
            };

            if let Err(e) = spawn_result {
                error!(
                    pool = name,
                    worker_id,
                    error = %e,
                    "Failed to spawn worker coroutine"
                );
            }
        }

        Self {
            config,
            sender: tx,
            metrics,
            name: name.to_string(),
        }
    }

    /// Get metrics for this worker pool.
    pub fn metrics(&self) -> &Arc<WorkerPoolMetrics> {
        &self.metrics
    }

    /// Get configuration for this worker pool.
    pub fn config(&self) -> &WorkerPoolConfig {
        &self.config
    }
}

impl Executor for WorkerPool {
    fn execute(&self, task: Task) {
        self.metrics.record_dispatch();
        if self.sender.send(task).is_err() {
            // Channel disconnected - workers are gone
            error!(pool = %self.name, "Worker pool channel disconnected");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_execution_mode_from_str() {
        assert_eq!(
            ExecutionMode::from_str("event_loop"),
            Some(ExecutionMode::EventLoop)
        );
        assert_eq!(
            ExecutionMode::from_str("WORKER"),
            Some(ExecutionMode::Worker)
        );
        assert_eq!(
            ExecutionMode::from_str("Custom"),
            Some(ExecutionMode::Custom)
        );
        assert_eq!(ExecutionMode::from_str("invalid"), None);
        assert_eq!(ExecutionMode::default(), ExecutionMode::EventLoop);
    }

    #[test]
    fn test_worker_pool_config_default() {
        let config = WorkerPoolConfig::default();
        assert_eq!(config.num_workers, 4);
        assert_eq!(config.queue_bound, 1024);
        assert_eq!(config.stack_size, 0x10000);
    }

    #[test]
    fn test_worker_pool_metrics() {
        let metrics = WorkerPoolMetrics::new();

        assert_eq!(metrics.get_queue_depth(), 0);
        assert_eq!(metrics.get_dispatched_count(), 0);
        assert_eq!(metrics.get_completed_count(), 0);

        metrics.record_dispatch();
        assert_eq!(metrics.get_dispatched_count(), 1);
        assert_eq!(metrics.get_queue_depth(), 1);

        metrics.record_completion();
        assert_eq!(metrics.get_completed_count(), 1);
        assert_eq!(metrics.get_queue_depth(), 0);
    }

    #[test]
    fn test_worker_pool_runs_tasks() {
        let pool = unsafe { WorkerPool::new("test", WorkerPoolConfig::default()) };
        let (done_tx, done_rx) = mpsc::channel();
        pool.execute(Box::new(move || {
            let _ = done_tx.send(21 + 21);
        }));
        assert_eq!(done_rx.recv().unwrap(), 42);
    }
}
