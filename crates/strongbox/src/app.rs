// SPDX-FileCopyrightText: 2026 Strongbox Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Component wiring and ordered shutdown.

use std::sync::Arc;

use secrecy::SecretString;
use strongbox_audit::{AuditPipeline, TracingSink};
use strongbox_config::StrongboxConfig;
use strongbox_core::{HealthStatus, OwnerId, StrongboxError, VaultStore};
use strongbox_pool::WorkerPool;
use strongbox_storage::SqliteStore;
use strongbox_vault::{AccessTracker, AccountService, SecretCipher, VaultGateway, VaultService};
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

/// Every long-lived component of a running store.
pub struct App {
    config: StrongboxConfig,
    store: Arc<SqliteStore>,
    pool: Arc<WorkerPool>,
    audit: Arc<AuditPipeline>,
    tracker: Arc<AccessTracker>,
    accounts: Arc<AccountService>,
    gateway: VaultGateway,
}

impl App {
    /// Validate the key, open storage and start the background tasks.
    pub async fn bootstrap(config: StrongboxConfig) -> Result<Self, StrongboxError> {
        let key = config
            .vault
            .encryption_key
            .as_deref()
            .ok_or_else(|| StrongboxError::Config("vault.encryption_key is not set".into()))?;
        let cipher = Arc::new(SecretCipher::from_base64(key)?);

        let store = Arc::new(SqliteStore::new(config.storage.clone()));
        store.initialize().await?;
        let vault_store: Arc<dyn VaultStore> = store.clone();

        let audit = Arc::new(AuditPipeline::new(
            Arc::new(TracingSink),
            config.audit.buffer_capacity,
        ));
        let tracker = Arc::new(AccessTracker::new(
            Arc::clone(&vault_store),
            config.tracker.buffer_capacity,
        ));
        let service = Arc::new(VaultService::new(
            vault_store,
            cipher,
            Arc::clone(&audit),
            Arc::clone(&tracker),
        ));
        let pool = Arc::new(WorkerPool::new(config.pool.size, config.pool.queue_factor)?);
        let gateway = VaultGateway::new(service, Arc::clone(&pool));
        let accounts = Arc::new(AccountService::new(store.clone(), &config.auth)?);

        info!(
            database = %config.storage.database_path,
            pool_size = config.pool.size,
            "strongbox ready"
        );
        Ok(Self {
            config,
            store,
            pool,
            audit,
            tracker,
            accounts,
            gateway,
        })
    }

    pub fn gateway(&self) -> &VaultGateway {
        &self.gateway
    }

    pub async fn health(&self) -> HealthStatus {
        self.store.health_check().await
    }

    /// Register an account on the worker pool.
    pub async fn register_user(
        &self,
        email: &str,
        password: SecretString,
        cancel: &CancellationToken,
    ) -> Result<OwnerId, StrongboxError> {
        let accounts = Arc::clone(&self.accounts);
        let email = email.to_string();
        self.pool
            .run(cancel, move || async move { accounts.register(&email, password).await })
            .await
    }

    /// Stop everything in dependency order: pool, access tracker, audit, storage.
    ///
    /// Each pipeline first gets a chance to drain what it already accepted.
    /// Every step runs even if an earlier one failed; the first error is returned.
    pub async fn shutdown(self) -> Result<(), StrongboxError> {
        let mut first_err: Option<StrongboxError> = None;

        self.pool.shutdown().await;

        let tracker_deadline = self.config.tracker.shutdown_timeout();
        if !self.tracker.flush(tracker_deadline).await {
            warn!("access tracker did not drain before shutdown");
        }
        if let Err(e) = self.tracker.shutdown(tracker_deadline).await {
            warn!(error = %e, "access tracker shutdown failed");
            first_err.get_or_insert(e);
        }

        let audit_deadline = self.config.audit.shutdown_timeout();
        if !self.audit.flush(audit_deadline).await {
            warn!("audit pipeline did not drain before shutdown");
        }
        if let Err(e) = self.audit.shutdown(audit_deadline).await {
            warn!(error = %e, "audit pipeline shutdown failed");
            first_err.get_or_insert(e);
        }

        if let Err(e) = self.store.close().await {
            warn!(error = %e, "storage close failed");
            first_err.get_or_insert(e);
        }

        info!("strongbox stopped");
        first_err.map_or(Ok(()), Err)
    }
}
