// SPDX-FileCopyrightText: 2026 Strongbox Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SQLite implementation of the [`VaultStore`] and [`UserStore`] traits.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::OnceCell;
use tracing::debug;

use strongbox_config::model::StorageConfig;
use strongbox_core::{
    EntryId, HealthStatus, OwnerId, StoredEntry, StrongboxError, User, UserStore, VaultStore,
};

use crate::database::Database;
use crate::queries;

/// SQLite-backed store.
///
/// The database is opened lazily by [`SqliteStore::initialize`]; every other
/// call fails with a storage error until then.
pub struct SqliteStore {
    config: StorageConfig,
    db: OnceCell<Database>,
}

impl SqliteStore {
    /// Create a store for the given configuration without touching the disk.
    pub fn new(config: StorageConfig) -> Self {
        Self {
            config,
            db: OnceCell::new(),
        }
    }

    fn db(&self) -> Result<&Database, StrongboxError> {
        self.db
            .get()
            .ok_or_else(|| StrongboxError::storage("storage not initialized -- call initialize() first"))
    }

    /// Open the database and apply migrations.
    pub async fn initialize(&self) -> Result<(), StrongboxError> {
        let db = Database::open_with(&self.config.database_path, self.config.wal_mode).await?;
        self.db
            .set(db)
            .map_err(|_| StrongboxError::storage("storage already initialized"))?;
        debug!(path = %self.config.database_path, "SQLite storage initialized");
        Ok(())
    }

    /// Checkpoint the WAL. Safe to call on a store that was never initialized.
    pub async fn close(&self) -> Result<(), StrongboxError> {
        match self.db.get() {
            Some(db) => db.checkpoint().await,
            None => Ok(()),
        }
    }

    /// Report whether the connection thread answers a trivial query.
    pub async fn health_check(&self) -> HealthStatus {
        let db = match self.db() {
            Ok(db) => db,
            Err(_) => return HealthStatus::Unhealthy("not initialized".into()),
        };
        match db.ping().await {
            Ok(()) => HealthStatus::Healthy,
            Err(e) => HealthStatus::Unhealthy(e.to_string()),
        }
    }
}

#[async_trait]
impl VaultStore for SqliteStore {
    async fn insert_entry(&self, entry: &StoredEntry) -> Result<EntryId, StrongboxError> {
        queries::entries::insert_entry(self.db()?, entry).await
    }

    async fn get_entry(
        &self,
        owner: OwnerId,
        id: EntryId,
    ) -> Result<Option<StoredEntry>, StrongboxError> {
        queries::entries::get_entry(self.db()?, owner, id).await
    }

    async fn list_entries(&self, owner: OwnerId) -> Result<Vec<StoredEntry>, StrongboxError> {
        queries::entries::list_entries(self.db()?, owner).await
    }

    async fn search_entries(
        &self,
        owner: OwnerId,
        query: &str,
    ) -> Result<Vec<StoredEntry>, StrongboxError> {
        queries::entries::search_entries(self.db()?, owner, query).await
    }

    async fn update_entry(&self, entry: &StoredEntry) -> Result<(), StrongboxError> {
        match queries::entries::update_entry(self.db()?, entry).await? {
            0 => Err(StrongboxError::NotFound(format!("entry {}", entry.id))),
            _ => Ok(()),
        }
    }

    async fn delete_entry(&self, owner: OwnerId, id: EntryId) -> Result<(), StrongboxError> {
        queries::entries::delete_entry(self.db()?, owner, id).await?;
        Ok(())
    }

    async fn touch_last_accessed(
        &self,
        owner: OwnerId,
        id: EntryId,
        at: DateTime<Utc>,
    ) -> Result<(), StrongboxError> {
        queries::entries::touch_last_accessed(self.db()?, owner, id, at).await
    }
}

#[async_trait]
impl UserStore for SqliteStore {
    async fn create_user(
        &self,
        email: &str,
        password_hash: &str,
    ) -> Result<OwnerId, StrongboxError> {
        queries::users::create_user(self.db()?, email, password_hash).await
    }

    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>, StrongboxError> {
        queries::users::get_user_by_email(self.db()?, email).await
    }

    async fn get_user(&self, id: OwnerId) -> Result<Option<User>, StrongboxError> {
        queries::users::get_user(self.db()?, id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strongbox_core::ErrorKind;
    use tempfile::tempdir;

    fn make_config(path: &str) -> StorageConfig {
        StorageConfig {
            database_path: path.to_string(),
            wal_mode: true,
        }
    }

    fn make_entry(owner: i64, title: &str) -> StoredEntry {
        let now = Utc::now();
        StoredEntry {
            id: EntryId(0),
            owner: OwnerId(owner),
            title: title.to_string(),
            username: String::new(),
            url: String::new(),
            category: String::new(),
            notes: String::new(),
            password_enc: "sealed".to_string(),
            created_at: now,
            updated_at: now,
            last_accessed_at: None,
        }
    }

    #[tokio::test]
    async fn initialize_opens_database_at_configured_path() {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("init_test.db");
        let store = SqliteStore::new(make_config(db_path.to_str().unwrap()));

        store.initialize().await.unwrap();
        assert!(db_path.exists(), "database file should be created");
        assert_eq!(store.health_check().await, HealthStatus::Healthy);
    }

    #[tokio::test]
    async fn operations_before_initialize_fail() {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("uninit.db");
        let store = SqliteStore::new(make_config(db_path.to_str().unwrap()));

        let err = store.list_entries(OwnerId(1)).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Storage);
        assert!(matches!(
            store.health_check().await,
            HealthStatus::Unhealthy(_)
        ));
        store.close().await.unwrap();
    }

    #[tokio::test]
    async fn double_initialize_is_rejected() {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("double.db");
        let store = SqliteStore::new(make_config(db_path.to_str().unwrap()));

        store.initialize().await.unwrap();
        assert!(store.initialize().await.is_err());
    }

    #[tokio::test]
    async fn update_of_foreign_row_is_not_found() {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("update.db");
        let store = SqliteStore::new(make_config(db_path.to_str().unwrap()));
        store.initialize().await.unwrap();

        let id = store.insert_entry(&make_entry(1, "mine")).await.unwrap();
        let mut foreign = store.get_entry(OwnerId(1), id).await.unwrap().unwrap();
        foreign.owner = OwnerId(2);
        let err = store.update_entry(&foreign).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    #[tokio::test]
    async fn delete_of_absent_row_succeeds() {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("delete.db");
        let store = SqliteStore::new(make_config(db_path.to_str().unwrap()));
        store.initialize().await.unwrap();

        store.delete_entry(OwnerId(1), EntryId(42)).await.unwrap();
    }

    #[tokio::test]
    async fn close_checkpoints_and_data_survives_reopen() {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("persist.db");
        let path = db_path.to_str().unwrap();

        let store = SqliteStore::new(make_config(path));
        store.initialize().await.unwrap();
        let id = store.insert_entry(&make_entry(1, "kept")).await.unwrap();
        let owner = store.create_user("k@example.com", "hash").await.unwrap();
        store.close().await.unwrap();
        drop(store);

        let reopened = SqliteStore::new(make_config(path));
        reopened.initialize().await.unwrap();
        let entry = reopened.get_entry(OwnerId(1), id).await.unwrap().unwrap();
        assert_eq!(entry.title, "kept");
        let user = reopened.get_user(owner).await.unwrap().unwrap();
        assert_eq!(user.email, "k@example.com");
    }
}
