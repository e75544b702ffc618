// SPDX-FileCopyrightText: 2026 Strongbox Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the Strongbox secret store.

use std::time::Duration;

use strum::Display;
use thiserror::Error;

/// The primary error type used across all Strongbox crates.
///
/// Every variant maps to exactly one [`ErrorKind`], so the request boundary
/// can always translate a failure into a distinguishable status.
#[derive(Debug, Error)]
pub enum StrongboxError {
    /// Malformed or missing required fields. Not retryable.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// No matching owner-scoped row.
    #[error("not found: {0}")]
    NotFound(String),

    /// Envelope failed tag verification (corruption or wrong key).
    #[error("authentication failed: {0}")]
    AuthenticationFailed(String),

    /// The configured encryption key is not a base64-encoded 256-bit key.
    #[error("invalid encryption key: {0}")]
    InvalidKey(String),

    /// Account login failed. Deliberately does not say which half was wrong.
    #[error("invalid credentials")]
    InvalidCredentials,

    /// A uniqueness constraint was violated (e.g. duplicate account email).
    #[error("conflict: {0}")]
    Conflict(String),

    /// The caller gave up before the result arrived.
    #[error("operation cancelled")]
    Cancelled,

    /// The worker pool is shutting down; the job was dropped without running.
    #[error("worker pool unavailable: job dropped")]
    PoolUnavailable,

    /// A graceful-shutdown deadline was exceeded.
    #[error("operation timed out after {duration:?}")]
    Timeout { duration: Duration },

    /// Storage backend errors (database connection, query failure, row decoding).
    #[error("storage error: {source}")]
    Storage {
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Configuration errors surfaced at runtime.
    #[error("configuration error: {0}")]
    Config(String),

    /// Cryptographic primitive failures other than tag verification
    /// (RNG failure, key setup, password hashing).
    #[error("crypto error: {0}")]
    Crypto(String),

    /// Internal or unexpected errors, including panicked jobs.
    #[error("internal error: {0}")]
    Internal(String),
}

/// Fieldless classification of a [`StrongboxError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
#[strum(serialize_all = "snake_case")]
pub enum ErrorKind {
    InvalidInput,
    NotFound,
    AuthenticationFailed,
    InvalidKey,
    InvalidCredentials,
    Conflict,
    Cancelled,
    PoolUnavailable,
    Timeout,
    Storage,
    Config,
    Crypto,
    Internal,
}

impl StrongboxError {
    /// Returns the kind of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidInput(_) => ErrorKind::InvalidInput,
            Self::NotFound(_) => ErrorKind::NotFound,
            Self::AuthenticationFailed(_) => ErrorKind::AuthenticationFailed,
            Self::InvalidKey(_) => ErrorKind::InvalidKey,
            Self::InvalidCredentials => ErrorKind::InvalidCredentials,
            Self::Conflict(_) => ErrorKind::Conflict,
            Self::Cancelled => ErrorKind::Cancelled,
            Self::PoolUnavailable => ErrorKind::PoolUnavailable,
            Self::Timeout { .. } => ErrorKind::Timeout,
            Self::Storage { .. } => ErrorKind::Storage,
            Self::Config(_) => ErrorKind::Config,
            Self::Crypto(_) => ErrorKind::Crypto,
            Self::Internal(_) => ErrorKind::Internal,
        }
    }

    /// Wraps any error as a storage failure.
    pub fn storage(source: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> Self {
        Self::Storage {
            source: source.into(),
        }
    }
}
