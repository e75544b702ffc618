// SPDX-FileCopyrightText: 2026 Strongbox Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Best-effort audit pipeline for the Strongbox secret store.
//!
//! Producers hand events to [`AuditPipeline::log_event`], which never blocks
//! and never fails: when the bounded buffer is full, or the pipeline has been
//! shut down, the event is dropped and counted. A single background consumer
//! forwards the remaining events to an [`AuditSink`](strongbox_core::AuditSink)
//! in arrival order.
//!
//! The underlying [`BoundedPipeline`] is generic so other fire-and-forget
//! side effects can share the same overflow and shutdown semantics.

pub mod pipeline;
pub mod sink;

use std::sync::Arc;
use std::time::Duration;

use strongbox_core::{AuditEvent, AuditSink, StrongboxError};

pub use pipeline::{BoundedPipeline, PipelineStats};
pub use sink::TracingSink;

/// Audit event recorder with a bounded buffer and one consumer task.
pub struct AuditPipeline {
    inner: BoundedPipeline<AuditEvent>,
}

impl AuditPipeline {
    /// Spawn the consumer task. Must be called from within a Tokio runtime.
    pub fn new(sink: Arc<dyn AuditSink>, capacity: usize) -> Self {
        tracing::info!(sink = sink.name(), capacity, "audit pipeline started");
        let inner = BoundedPipeline::spawn("audit", capacity, move |event: AuditEvent| {
            let sink = Arc::clone(&sink);
            async move { sink.record(&event).await }
        });
        Self { inner }
    }

    /// Enqueue an event without waiting. Drops it if the buffer is full or
    /// the pipeline is shut down.
    pub fn log_event(&self, event: AuditEvent) {
        self.inner.try_push(event);
    }

    /// Wait up to `deadline` for buffered events to reach the sink.
    pub async fn flush(&self, deadline: Duration) -> bool {
        self.inner.flush(deadline).await
    }

    /// Stop the consumer after its in-flight event and wait up to `deadline`.
    ///
    /// Events still buffered are abandoned.
    pub async fn shutdown(&self, deadline: Duration) -> Result<(), StrongboxError> {
        self.inner.shutdown(deadline).await
    }

    pub fn stats(&self) -> PipelineStats {
        self.inner.stats()
    }
}

impl std::fmt::Debug for AuditPipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuditPipeline")
            .field("stats", &self.inner.stats())
            .finish()
    }
}
