// SPDX-FileCopyrightText: 2026 Strongbox Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Worker pool implementation.

use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::pin::Pin;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use futures::FutureExt;
use strongbox_core::StrongboxError;
use tokio::sync::{Mutex, mpsc, oneshot};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

/// An opaque unit of work. Results travel back through channels captured by the job.
pub type Job = Pin<Box<dyn Future<Output = ()> + Send + 'static>>;

/// Snapshot of pool counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PoolStats {
    /// Jobs accepted into the queue.
    pub submitted: u64,
    /// Jobs that ran to completion.
    pub completed: u64,
    /// Jobs that panicked. The executor survives each one.
    pub panicked: u64,
    /// Submissions refused because the pool was shutting down.
    pub rejected: u64,
}

#[derive(Default)]
struct Counters {
    submitted: AtomicU64,
    completed: AtomicU64,
    panicked: AtomicU64,
    rejected: AtomicU64,
}

/// Fixed-size pool of executor tasks fed by a bounded queue.
pub struct WorkerPool {
    size: usize,
    tx: mpsc::Sender<Job>,
    rx: Arc<Mutex<mpsc::Receiver<Job>>>,
    cancel: CancellationToken,
    workers: Mutex<Vec<JoinHandle<()>>>,
    counters: Arc<Counters>,
}

impl std::fmt::Debug for WorkerPool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WorkerPool")
            .field("size", &self.size)
            .field("shutting_down", &self.cancel.is_cancelled())
            .finish_non_exhaustive()
    }
}

impl WorkerPool {
    /// Start `size` executors sharing a queue of `size * queue_factor` slots.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn new(size: usize, queue_factor: usize) -> Result<Self, StrongboxError> {
        if size == 0 {
            return Err(StrongboxError::InvalidInput(
                "worker pool size must be greater than zero".into(),
            ));
        }
        let capacity = size.saturating_mul(queue_factor.max(1));
        let (tx, rx) = mpsc::channel::<Job>(capacity);
        let rx = Arc::new(Mutex::new(rx));
        let cancel = CancellationToken::new();
        let counters = Arc::new(Counters::default());

        let workers = (0..size)
            .map(|index| {
                tokio::spawn(executor_loop(
                    index,
                    Arc::clone(&rx),
                    cancel.clone(),
                    Arc::clone(&counters),
                ))
            })
            .collect();

        info!(size, capacity, "worker pool started");
        Ok(Self {
            size,
            tx,
            rx,
            cancel,
            workers: Mutex::new(workers),
            counters,
        })
    }

    /// Number of executor tasks.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Whether [`shutdown`](Self::shutdown) has begun.
    pub fn is_shutting_down(&self) -> bool {
        self.cancel.is_cancelled()
    }

    /// Enqueue a job for any free executor.
    ///
    /// Waits for a queue slot when the queue is full. Once shutdown has begun
    /// the job is dropped without running and [`StrongboxError::PoolUnavailable`]
    /// is returned immediately.
    pub async fn submit(&self, job: Job) -> Result<(), StrongboxError> {
        if self.cancel.is_cancelled() {
            self.counters.rejected.fetch_add(1, Ordering::Relaxed);
            return Err(StrongboxError::PoolUnavailable);
        }
        let sent = tokio::select! {
            biased;
            _ = self.cancel.cancelled() => false,
            res = self.tx.send(job) => res.is_ok(),
        };
        if sent {
            self.counters.submitted.fetch_add(1, Ordering::Relaxed);
            Ok(())
        } else {
            self.counters.rejected.fetch_add(1, Ordering::Relaxed);
            Err(StrongboxError::PoolUnavailable)
        }
    }

    /// Run `f` on the pool and wait for its result.
    ///
    /// Returns [`StrongboxError::Cancelled`] as soon as `cancel` fires. A job
    /// that is already running is not interrupted; it finishes and its result
    /// is discarded. A job that panics yields [`StrongboxError::Internal`] to
    /// this caller only.
    pub async fn run<F, Fut, T>(&self, cancel: &CancellationToken, f: F) -> Result<T, StrongboxError>
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = Result<T, StrongboxError>> + Send + 'static,
        T: Send + 'static,
    {
        if cancel.is_cancelled() {
            return Err(StrongboxError::Cancelled);
        }

        let (done_tx, done_rx) = oneshot::channel();
        let job: Job = Box::pin(async move {
            let outcome = match AssertUnwindSafe(async move { f().await })
                .catch_unwind()
                .await
            {
                Ok(result) => result,
                Err(panic) => Err(StrongboxError::Internal(format!(
                    "job panicked: {}",
                    panic_message(panic.as_ref())
                ))),
            };
            // The caller may have given up; the result is dropped in that case.
            let _ = done_tx.send(outcome);
        });

        tokio::select! {
            biased;
            _ = cancel.cancelled() => return Err(StrongboxError::Cancelled),
            submitted = self.submit(job) => submitted?,
        }

        tokio::select! {
            biased;
            _ = cancel.cancelled() => Err(StrongboxError::Cancelled),
            // A dropped sender means the job was abandoned in the queue at shutdown.
            outcome = done_rx => outcome.unwrap_or(Err(StrongboxError::PoolUnavailable)),
        }
    }

    /// Stop all executors and wait for them to exit.
    ///
    /// Jobs already running finish; jobs still queued are dropped without
    /// running. Idempotent.
    pub async fn shutdown(&self) {
        self.cancel.cancel();

        let handles: Vec<_> = self.workers.lock().await.drain(..).collect();
        if handles.is_empty() {
            return;
        }
        for handle in handles {
            if let Err(e) = handle.await {
                error!(error = %e, "pool executor terminated abnormally");
            }
        }

        let mut rx = self.rx.lock().await;
        rx.close();
        let mut abandoned = 0usize;
        while rx.try_recv().is_ok() {
            abandoned += 1;
        }
        if abandoned > 0 {
            warn!(abandoned, "queued jobs abandoned at shutdown");
        }
        info!(stats = ?self.stats(), "worker pool stopped");
    }

    /// Current counter values.
    pub fn stats(&self) -> PoolStats {
        PoolStats {
            submitted: self.counters.submitted.load(Ordering::Relaxed),
            completed: self.counters.completed.load(Ordering::Relaxed),
            panicked: self.counters.panicked.load(Ordering::Relaxed),
            rejected: self.counters.rejected.load(Ordering::Relaxed),
        }
    }
}

impl Drop for WorkerPool {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

async fn executor_loop(
    index: usize,
    rx: Arc<Mutex<mpsc::Receiver<Job>>>,
    cancel: CancellationToken,
    counters: Arc<Counters>,
) {
    debug!(worker = index, "pool executor started");
    loop {
        let job = tokio::select! {
            biased;
            _ = cancel.cancelled() => break,
            job = async { rx.lock().await.recv().await } => match job {
                Some(job) => job,
                None => break,
            },
        };

        match AssertUnwindSafe(job).catch_unwind().await {
            Ok(()) => {
                counters.completed.fetch_add(1, Ordering::Relaxed);
            }
            Err(panic) => {
                counters.panicked.fetch_add(1, Ordering::Relaxed);
                error!(
                    worker = index,
                    panic = %panic_message(panic.as_ref()),
                    "pool job panicked"
                );
            }
        }
    }
    debug!(worker = index, "pool executor stopped");
}

fn panic_message(panic: &(dyn std::any::Any + Send)) -> &str {
    if let Some(s) = panic.downcast_ref::<&'static str>() {
        s
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.as_str()
    } else {
        "non-string panic payload"
    }
}
