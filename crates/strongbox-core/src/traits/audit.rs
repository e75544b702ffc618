// SPDX-FileCopyrightText: 2026 Strongbox Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Audit sink trait.

use async_trait::async_trait;

use crate::error::StrongboxError;
use crate::types::AuditEvent;

/// Destination for audit events.
///
/// The audit pipeline calls `record` from a single consumer task, one event
/// at a time, in arrival order. A durable sink is a drop-in replacement for
/// the reference log-line sink.
#[async_trait]
pub trait AuditSink: Send + Sync + 'static {
    /// Returns the human-readable name of this sink.
    fn name(&self) -> &str;

    /// Records one event. Errors are counted by the pipeline and never
    /// reach the request path.
    async fn record(&self, event: &AuditEvent) -> Result<(), StrongboxError>;
}
