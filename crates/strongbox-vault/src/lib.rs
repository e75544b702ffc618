// SPDX-FileCopyrightText: 2026 Strongbox Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Encrypted secret vault for the Strongbox secret store.
//!
//! - [`crypto`]: AES-256-GCM envelopes under one process-wide key.
//! - [`service`]: list/get/create/update/delete/search with owner scoping.
//! - [`gateway`]: runs each service call on the worker pool with caller cancellation.
//! - [`touch`]: bounded background writer for last-accessed timestamps.
//! - [`accounts`]: Argon2id account registration and login checks.

pub mod accounts;
pub mod crypto;
pub mod gateway;
pub mod service;
pub mod touch;

pub use accounts::AccountService;
pub use crypto::{SecretCipher, generate_key};
pub use gateway::VaultGateway;
pub use service::VaultService;
pub use touch::AccessTracker;
