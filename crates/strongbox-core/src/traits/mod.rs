// SPDX-FileCopyrightText: 2026 Strongbox Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Collaborator traits the vault service is written against.
//!
//! All traits use `#[async_trait]` for dynamic dispatch compatibility so the
//! service can hold `Arc<dyn VaultStore>` and `Arc<dyn AuditSink>`.

pub mod audit;
pub mod storage;

pub use audit::AuditSink;
pub use storage::{UserStore, VaultStore};
