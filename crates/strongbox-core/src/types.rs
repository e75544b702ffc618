// SPDX-FileCopyrightText: 2026 Strongbox Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Common types used across the collaborator traits and the vault service.

use std::fmt;

use chrono::{DateTime, Utc};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Identity of the account that owns a set of vault entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OwnerId(pub i64);

impl fmt::Display for OwnerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Row identity of a vault entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntryId(pub i64);

impl fmt::Display for EntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Health status reported by storage health checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HealthStatus {
    /// Backend is fully operational.
    Healthy,
    /// Backend is operational but experiencing issues.
    Degraded(String),
    /// Backend is not operational.
    Unhealthy(String),
}

/// A vault entry as it is persisted.
///
/// `password_enc` is always a sealed envelope; plaintext passwords never
/// reach this type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredEntry {
    /// Assigned by the store on insert; ignored by `insert_entry`.
    pub id: EntryId,
    pub owner: OwnerId,
    pub title: String,
    pub username: String,
    pub url: String,
    pub category: String,
    pub notes: String,
    /// Base64 envelope: `nonce || ciphertext || tag`.
    pub password_enc: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub last_accessed_at: Option<DateTime<Utc>>,
}

/// A vault entry as returned to callers.
///
/// `password` is populated only by a single-entry read; bulk reads
/// (list, search) always carry `None`.
#[derive(Debug)]
pub struct Entry {
    pub id: EntryId,
    pub owner: OwnerId,
    pub title: String,
    pub username: String,
    pub url: String,
    pub category: String,
    pub notes: String,
    pub password: Option<SecretString>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub last_accessed_at: Option<DateTime<Utc>>,
}

impl Entry {
    /// Builds the caller-facing view of a stored row, discarding the envelope.
    pub fn from_stored(stored: StoredEntry, password: Option<SecretString>) -> Self {
        Self {
            id: stored.id,
            owner: stored.owner,
            title: stored.title,
            username: stored.username,
            url: stored.url,
            category: stored.category,
            notes: stored.notes,
            password,
            created_at: stored.created_at,
            updated_at: stored.updated_at,
            last_accessed_at: stored.last_accessed_at,
        }
    }
}

/// Caller input for creating or updating an entry.
///
/// On update an empty `password` means "keep the current secret".
#[derive(Debug)]
pub struct EntryDraft {
    pub title: String,
    pub username: String,
    pub url: String,
    pub category: String,
    pub notes: String,
    pub password: SecretString,
}

impl EntryDraft {
    /// Creates a draft with the given title and password and empty metadata.
    pub fn new(title: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            username: String::new(),
            url: String::new(),
            category: String::new(),
            notes: String::new(),
            password: SecretString::from(password.into()),
        }
    }

    pub fn with_username(mut self, username: impl Into<String>) -> Self {
        self.username = username.into();
        self
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = url.into();
        self
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into();
        self
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = notes.into();
        self
    }
}

/// What happened to a vault entry.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum AuditAction {
    Accessed,
    Created,
    Updated,
    Deleted,
}

/// A single access record handed to the audit pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditEvent {
    pub actor: OwnerId,
    pub resource: EntryId,
    pub action: AuditAction,
    pub timestamp: DateTime<Utc>,
}

impl AuditEvent {
    /// Creates an event stamped with the current time.
    pub fn now(actor: OwnerId, resource: EntryId, action: AuditAction) -> Self {
        Self {
            actor,
            resource,
            action,
            timestamp: Utc::now(),
        }
    }
}

/// A registered account.
#[derive(Clone, PartialEq, Eq)]
pub struct User {
    pub id: OwnerId,
    pub email: String,
    /// Argon2id PHC string.
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

impl fmt::Debug for User {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("User")
            .field("id", &self.id)
            .field("email", &self.email)
            .field("password_hash", &"[REDACTED]")
            .field("created_at", &self.created_at)
            .finish()
    }
}
