// SPDX-FileCopyrightText: 2026 Strongbox Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Reference audit sink that emits one structured log record per event.

use async_trait::async_trait;
use strongbox_core::{AuditEvent, AuditSink, StrongboxError};

/// Log target used for audit records, so operators can route them separately.
pub const AUDIT_TARGET: &str = "strongbox::audit";

/// Writes each event as an `info` record on the [`AUDIT_TARGET`] target.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

#[async_trait]
impl AuditSink for TracingSink {
    fn name(&self) -> &str {
        "tracing"
    }

    async fn record(&self, event: &AuditEvent) -> Result<(), StrongboxError> {
        tracing::info!(
            target: AUDIT_TARGET,
            actor = %event.actor,
            resource = %event.resource,
            action = %event.action,
            timestamp = %event.timestamp.to_rfc3339(),
            "audit"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strongbox_core::{AuditAction, EntryId, OwnerId};
    use tracing_test::traced_test;

    #[tokio::test]
    #[traced_test]
    async fn record_emits_structured_fields() {
        let sink = TracingSink;
        let event = AuditEvent::now(OwnerId(4), EntryId(17), AuditAction::Accessed);
        sink.record(&event).await.unwrap();

        assert!(logs_contain("actor=4"));
        assert!(logs_contain("resource=17"));
        assert!(logs_contain("action=accessed"));
    }
}
