// SPDX-FileCopyrightText: 2026 Strongbox Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Bounded background updater for `last_accessed_at`.
//!
//! Reads enqueue a touch instead of spawning a task each, so a burst of
//! reads costs at most `capacity` pending updates. Overflow drops the newest
//! touch; the timestamp is advisory.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use strongbox_audit::{BoundedPipeline, PipelineStats};
use strongbox_core::{EntryId, OwnerId, StrongboxError, VaultStore};

/// One pending timestamp update.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TouchRequest {
    pub owner: OwnerId,
    pub id: EntryId,
    pub at: DateTime<Utc>,
}

/// Fire-and-forget `last_accessed_at` writer with a single consumer task.
pub struct AccessTracker {
    inner: BoundedPipeline<TouchRequest>,
}

impl AccessTracker {
    /// Spawn the consumer. Must be called from within a Tokio runtime.
    pub fn new(store: Arc<dyn VaultStore>, capacity: usize) -> Self {
        let inner = BoundedPipeline::spawn("access-tracker", capacity, move |req: TouchRequest| {
            let store = Arc::clone(&store);
            async move { store.touch_last_accessed(req.owner, req.id, req.at).await }
        });
        Self { inner }
    }

    /// Queue a touch stamped now. Never blocks; returns whether it was queued.
    pub fn touch(&self, owner: OwnerId, id: EntryId) -> bool {
        self.inner.try_push(TouchRequest {
            owner,
            id,
            at: Utc::now(),
        })
    }

    /// Wait up to `deadline` for queued touches to be written.
    pub async fn flush(&self, deadline: Duration) -> bool {
        self.inner.flush(deadline).await
    }

    pub async fn shutdown(&self, deadline: Duration) -> Result<(), StrongboxError> {
        self.inner.shutdown(deadline).await
    }

    pub fn stats(&self) -> PipelineStats {
        self.inner.stats()
    }
}

impl std::fmt::Debug for AccessTracker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AccessTracker")
            .field("stats", &self.inner.stats())
            .finish()
    }
}
