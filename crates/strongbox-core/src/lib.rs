// SPDX-FileCopyrightText: 2026 Strongbox Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the Strongbox secret store.
//!
//! This crate provides the error taxonomy, the domain types shared across the
//! workspace, and the collaborator traits (storage and audit sink) that the
//! vault service is written against.

pub mod error;
pub mod traits;
pub mod types;

// Re-export key items at crate root for ergonomic imports.
pub use error::{ErrorKind, StrongboxError};
pub use types::{
    AuditAction, AuditEvent, Entry, EntryDraft, EntryId, HealthStatus, OwnerId, StoredEntry,
    User,
};

pub use traits::{AuditSink, UserStore, VaultStore};
