// SPDX-FileCopyrightText: 2026 Strongbox Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Generic single-consumer bounded pipeline with drop-newest overflow.

use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use futures::FutureExt;
use strongbox_core::StrongboxError;
use tokio::sync::Mutex;
use tokio::sync::mpsc::{self, error::TrySendError};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, trace, warn};

const FLUSH_POLL_INTERVAL: Duration = Duration::from_millis(5);

/// Snapshot of pipeline counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PipelineStats {
    /// Items placed in the buffer.
    pub accepted: u64,
    /// Items refused because the buffer was full or the pipeline was stopped.
    pub dropped: u64,
    /// Items the handler finished successfully.
    pub processed: u64,
    /// Items the handler returned an error for or panicked on.
    pub failed: u64,
}

#[derive(Default)]
struct Counters {
    accepted: AtomicU64,
    dropped: AtomicU64,
    processed: AtomicU64,
    failed: AtomicU64,
}

/// A bounded buffer drained by one background task, one item at a time.
pub struct BoundedPipeline<T> {
    name: &'static str,
    tx: mpsc::Sender<T>,
    cancel: CancellationToken,
    consumer: Mutex<Option<JoinHandle<()>>>,
    counters: Arc<Counters>,
}

impl<T: Send + 'static> BoundedPipeline<T> {
    /// Spawn the consumer task, which calls `handler` for each item in FIFO order.
    ///
    /// Must be called from within a Tokio runtime. A `capacity` of zero is
    /// treated as one.
    pub fn spawn<F, Fut>(name: &'static str, capacity: usize, handler: F) -> Self
    where
        F: Fn(T) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<(), StrongboxError>> + Send + 'static,
    {
        let (tx, mut rx) = mpsc::channel::<T>(capacity.max(1));
        let cancel = CancellationToken::new();
        let counters = Arc::new(Counters::default());

        let consumer = {
            let cancel = cancel.clone();
            let counters = Arc::clone(&counters);
            tokio::spawn(async move {
                debug!(pipeline = name, "consumer started");
                loop {
                    tokio::select! {
                        biased;
                        _ = cancel.cancelled() => break,
                        item = rx.recv() => {
                            let Some(item) = item else { break };
                            let outcome = AssertUnwindSafe(async { handler(item).await })
                                .catch_unwind()
                                .await;
                            match outcome {
                                Ok(Ok(())) => {
                                    counters.processed.fetch_add(1, Ordering::Relaxed);
                                }
                                Ok(Err(e)) => {
                                    counters.failed.fetch_add(1, Ordering::Relaxed);
                                    warn!(pipeline = name, error = %e, "pipeline handler failed");
                                }
                                Err(panic) => {
                                    counters.failed.fetch_add(1, Ordering::Relaxed);
                                    error!(
                                        pipeline = name,
                                        panic = %panic_message(panic.as_ref()),
                                        "pipeline handler panicked"
                                    );
                                }
                            }
                        }
                    }
                }
                debug!(pipeline = name, "consumer stopped");
            })
        };

        Self {
            name,
            tx,
            cancel,
            consumer: Mutex::new(Some(consumer)),
            counters,
        }
    }

    /// Offer an item without waiting. Returns whether it was buffered.
    pub fn try_push(&self, item: T) -> bool {
        if self.cancel.is_cancelled() {
            self.counters.dropped.fetch_add(1, Ordering::Relaxed);
            trace!(pipeline = self.name, "pipeline stopped, item dropped");
            return false;
        }
        match self.tx.try_send(item) {
            Ok(()) => {
                self.counters.accepted.fetch_add(1, Ordering::Relaxed);
                true
            }
            Err(TrySendError::Full(_)) => {
                self.counters.dropped.fetch_add(1, Ordering::Relaxed);
                trace!(pipeline = self.name, "buffer full, item dropped");
                false
            }
            Err(TrySendError::Closed(_)) => {
                self.counters.dropped.fetch_add(1, Ordering::Relaxed);
                false
            }
        }
    }

    /// Wait up to `deadline` for every accepted item to be handled.
    ///
    /// Returns `false` if items are still pending when the deadline passes.
    /// Does not stop the consumer; callers usually follow with [`shutdown`](Self::shutdown).
    pub async fn flush(&self, deadline: Duration) -> bool {
        tokio::time::timeout(deadline, async {
            while self.pending() > 0 && !self.cancel.is_cancelled() {
                tokio::time::sleep(FLUSH_POLL_INTERVAL).await;
            }
        })
        .await
        .is_ok()
            && self.pending() == 0
    }

    fn pending(&self) -> u64 {
        let stats = self.stats();
        stats
            .accepted
            .saturating_sub(stats.processed + stats.failed)
    }

    /// Stop the consumer and wait up to `deadline` for it to exit.
    ///
    /// The item being handled when shutdown begins is allowed to finish;
    /// items still buffered are abandoned. If the consumer does not exit in
    /// time it is aborted and [`StrongboxError::Timeout`] is returned.
    /// Calling this again after it has returned is a no-op.
    pub async fn shutdown(&self, deadline: Duration) -> Result<(), StrongboxError> {
        self.cancel.cancel();
        let Some(mut handle) = self.consumer.lock().await.take() else {
            return Ok(());
        };

        match tokio::time::timeout(deadline, &mut handle).await {
            Ok(Ok(())) => {
                info!(pipeline = self.name, stats = ?self.stats(), "pipeline stopped");
                Ok(())
            }
            Ok(Err(e)) => Err(StrongboxError::Internal(format!(
                "{} consumer terminated abnormally: {e}",
                self.name
            ))),
            Err(_) => {
                handle.abort();
                warn!(pipeline = self.name, ?deadline, "pipeline shutdown timed out");
                Err(StrongboxError::Timeout { duration: deadline })
            }
        }
    }

    /// Current counter values.
    pub fn stats(&self) -> PipelineStats {
        PipelineStats {
            accepted: self.counters.accepted.load(Ordering::Relaxed),
            dropped: self.counters.dropped.load(Ordering::Relaxed),
            processed: self.counters.processed.load(Ordering::Relaxed),
            failed: self.counters.failed.load(Ordering::Relaxed),
        }
    }
}

impl<T> Drop for BoundedPipeline<T> {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
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
