// SPDX-FileCopyrightText: 2026 Strongbox Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Request boundary: every vault call runs as a job on the worker pool.
//!
//! Callers suspend on the job's completion signal and may give up through
//! their [`CancellationToken`]; a job that has started keeps running and its
//! result is discarded.

use std::sync::Arc;

use strongbox_core::{Entry, EntryDraft, EntryId, OwnerId, StrongboxError};
use strongbox_pool::WorkerPool;
use tokio_util::sync::CancellationToken;

use crate::service::VaultService;

/// Pool-backed front for [`VaultService`].
#[derive(Debug, Clone)]
pub struct VaultGateway {
    service: Arc<VaultService>,
    pool: Arc<WorkerPool>,
}

impl VaultGateway {
    pub fn new(service: Arc<VaultService>, pool: Arc<WorkerPool>) -> Self {
        Self { service, pool }
    }

    pub async fn list(
        &self,
        owner: OwnerId,
        cancel: &CancellationToken,
    ) -> Result<Vec<Entry>, StrongboxError> {
        let service = Arc::clone(&self.service);
        self.pool
            .run(cancel, move || async move { service.list(owner).await })
            .await
    }

    pub async fn get(
        &self,
        owner: OwnerId,
        id: EntryId,
        cancel: &CancellationToken,
    ) -> Result<Entry, StrongboxError> {
        let service = Arc::clone(&self.service);
        self.pool
            .run(cancel, move || async move { service.get(owner, id).await })
            .await
    }

    pub async fn search(
        &self,
        owner: OwnerId,
        query: impl Into<String>,
        cancel: &CancellationToken,
    ) -> Result<Vec<Entry>, StrongboxError> {
        let service = Arc::clone(&self.service);
        let query = query.into();
        let job_cancel = cancel.clone();
        self.pool
            .run(cancel, move || async move {
                service.search(owner, &query, &job_cancel).await
            })
            .await
    }

    pub async fn create(
        &self,
        owner: OwnerId,
        draft: EntryDraft,
        cancel: &CancellationToken,
    ) -> Result<EntryId, StrongboxError> {
        let service = Arc::clone(&self.service);
        self.pool
            .run(cancel, move || async move { service.create(owner, draft).await })
            .await
    }

    pub async fn update(
        &self,
        owner: OwnerId,
        id: EntryId,
        draft: EntryDraft,
        cancel: &CancellationToken,
    ) -> Result<(), StrongboxError> {
        let service = Arc::clone(&self.service);
        self.pool
            .run(cancel, move || async move {
                service.update(owner, id, draft).await
            })
            .await
    }

    pub async fn delete(
        &self,
        owner: OwnerId,
        id: EntryId,
        cancel: &CancellationToken,
    ) -> Result<(), StrongboxError> {
        let service = Arc::clone(&self.service);
        self.pool
            .run(cancel, move || async move { service.delete(owner, id).await })
            .await
    }
}
