// SPDX-FileCopyrightText: 2026 Strongbox Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Storage traits for vault entries and user credentials.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::error::StrongboxError;
use crate::types::{EntryId, OwnerId, StoredEntry, User};

/// Row storage for vault entries.
///
/// Every read and write is scoped by [`OwnerId`]: implementations must filter
/// on the owner inside the query itself, so a caller can never reach another
/// owner's row by guessing an id.
#[async_trait]
pub trait VaultStore: Send + Sync + 'static {
    /// Inserts a new row and returns its assigned id. `entry.id` is ignored.
    async fn insert_entry(&self, entry: &StoredEntry) -> Result<EntryId, StrongboxError>;

    /// Fetches one row, or `None` if the owner has no row with that id.
    async fn get_entry(
        &self,
        owner: OwnerId,
        id: EntryId,
    ) -> Result<Option<StoredEntry>, StrongboxError>;

    /// Fetches all rows of an owner, newest first.
    async fn list_entries(&self, owner: OwnerId) -> Result<Vec<StoredEntry>, StrongboxError>;

    /// Substring search across title, url, and username, newest first.
    async fn search_entries(
        &self,
        owner: OwnerId,
        query: &str,
    ) -> Result<Vec<StoredEntry>, StrongboxError>;

    /// Rewrites the mutable columns of an existing row in place.
    async fn update_entry(&self, entry: &StoredEntry) -> Result<(), StrongboxError>;

    /// Deletes a row. Deleting an absent row is not an error.
    async fn delete_entry(&self, owner: OwnerId, id: EntryId) -> Result<(), StrongboxError>;

    /// Updates only the last-accessed timestamp.
    async fn touch_last_accessed(
        &self,
        owner: OwnerId,
        id: EntryId,
        at: DateTime<Utc>,
    ) -> Result<(), StrongboxError>;
}

/// Storage for account credentials.
#[async_trait]
pub trait UserStore: Send + Sync + 'static {
    /// Creates an account. Returns [`StrongboxError::Conflict`] if the email is taken.
    async fn create_user(&self, email: &str, password_hash: &str)
    -> Result<OwnerId, StrongboxError>;

    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>, StrongboxError>;

    async fn get_user(&self, id: OwnerId) -> Result<Option<User>, StrongboxError>;
}
