// SPDX-FileCopyrightText: 2026 Strongbox Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Secret-store semantics over plain row storage.
//!
//! [`VaultService`] is the only place that combines the cipher, the store
//! and the audit pipeline. Plaintext passwords exist only in memory: they are
//! sealed before a row is written and opened only for a single-entry read.

use std::sync::Arc;

use chrono::Utc;
use secrecy::ExposeSecret;
use strongbox_audit::AuditPipeline;
use strongbox_core::{
    AuditAction, AuditEvent, Entry, EntryDraft, EntryId, OwnerId, StoredEntry, StrongboxError,
    VaultStore,
};
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::crypto::SecretCipher;
use crate::touch::AccessTracker;

/// Vault operations, scoped by owner.
pub struct VaultService {
    store: Arc<dyn VaultStore>,
    cipher: Arc<SecretCipher>,
    audit: Arc<AuditPipeline>,
    tracker: Arc<AccessTracker>,
}

impl std::fmt::Debug for VaultService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VaultService").finish_non_exhaustive()
    }
}

impl VaultService {
    pub fn new(
        store: Arc<dyn VaultStore>,
        cipher: Arc<SecretCipher>,
        audit: Arc<AuditPipeline>,
        tracker: Arc<AccessTracker>,
    ) -> Self {
        Self {
            store,
            cipher,
            audit,
            tracker,
        }
    }

    /// All entries of `owner`, newest first, without passwords.
    pub async fn list(&self, owner: OwnerId) -> Result<Vec<Entry>, StrongboxError> {
        let rows = self.store.list_entries(owner).await?;
        Ok(strip_passwords(rows))
    }

    /// One entry with its decrypted password.
    ///
    /// Records an `accessed` event and queues a last-accessed touch; neither
    /// can fail or delay the read.
    pub async fn get(&self, owner: OwnerId, id: EntryId) -> Result<Entry, StrongboxError> {
        let row = self
            .store
            .get_entry(owner, id)
            .await?
            .ok_or_else(|| StrongboxError::NotFound(format!("entry {id}")))?;

        let password = self.cipher.decrypt(&row.password_enc).inspect_err(|e| {
            warn!(owner = %owner, entry_id = %id, error = %e, "stored password failed to decrypt");
        })?;

        self.audit
            .log_event(AuditEvent::now(owner, id, AuditAction::Accessed));
        if !self.tracker.touch(owner, id) {
            debug!(owner = %owner, entry_id = %id, "last-accessed touch dropped");
        }

        Ok(Entry::from_stored(row, Some(password)))
    }

    /// Substring search over title, url and username.
    ///
    /// Fails with [`StrongboxError::Cancelled`] if `cancel` has already fired.
    /// An empty query is the same as [`list`](Self::list). Whitespace is
    /// matched literally.
    pub async fn search(
        &self,
        owner: OwnerId,
        query: &str,
        cancel: &CancellationToken,
    ) -> Result<Vec<Entry>, StrongboxError> {
        if cancel.is_cancelled() {
            return Err(StrongboxError::Cancelled);
        }
        if query.is_empty() {
            return self.list(owner).await;
        }
        let rows = self.store.search_entries(owner, query).await?;
        Ok(strip_passwords(rows))
    }

    /// Seal the draft's password and persist a new entry.
    pub async fn create(&self, owner: OwnerId, draft: EntryDraft) -> Result<EntryId, StrongboxError> {
        if draft.title.is_empty() {
            return Err(StrongboxError::InvalidInput("title is required".into()));
        }
        if draft.password.expose_secret().is_empty() {
            return Err(StrongboxError::InvalidInput("password is required".into()));
        }

        let password_enc = self.cipher.encrypt(draft.password.expose_secret())?;
        let now = Utc::now();
        let row = StoredEntry {
            id: EntryId(0),
            owner,
            title: draft.title,
            username: draft.username,
            url: draft.url,
            category: draft.category,
            notes: draft.notes,
            password_enc,
            created_at: now,
            updated_at: now,
            last_accessed_at: None,
        };
        let id = self.store.insert_entry(&row).await?;

        self.audit
            .log_event(AuditEvent::now(owner, id, AuditAction::Created));
        debug!(owner = %owner, entry_id = %id, "entry created");
        Ok(id)
    }

    /// Merge the draft into an existing entry.
    ///
    /// An empty draft password keeps the current envelope untouched.
    pub async fn update(
        &self,
        owner: OwnerId,
        id: EntryId,
        draft: EntryDraft,
    ) -> Result<(), StrongboxError> {
        if draft.title.is_empty() {
            return Err(StrongboxError::InvalidInput("title is required".into()));
        }
        let mut row = self
            .store
            .get_entry(owner, id)
            .await?
            .ok_or_else(|| StrongboxError::NotFound(format!("entry {id}")))?;

        row.title = draft.title;
        row.username = draft.username;
        row.url = draft.url;
        row.category = draft.category;
        row.notes = draft.notes;
        if !draft.password.expose_secret().is_empty() {
            row.password_enc = self.cipher.encrypt(draft.password.expose_secret())?;
        }
        row.updated_at = Utc::now();
        self.store.update_entry(&row).await?;

        self.audit
            .log_event(AuditEvent::now(owner, id, AuditAction::Updated));
        debug!(owner = %owner, entry_id = %id, "entry updated");
        Ok(())
    }

    /// Remove an entry. Removing an absent entry succeeds.
    pub async fn delete(&self, owner: OwnerId, id: EntryId) -> Result<(), StrongboxError> {
        self.store.delete_entry(owner, id).await?;
        self.audit
            .log_event(AuditEvent::now(owner, id, AuditAction::Deleted));
        debug!(owner = %owner, entry_id = %id, "entry deleted");
        Ok(())
    }
}

fn strip_passwords(rows: Vec<StoredEntry>) -> Vec<Entry> {
    rows.into_iter()
        .map(|row| Entry::from_stored(row, None))
        .collect()
}
