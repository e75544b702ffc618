// SPDX-FileCopyrightText: 2026 Strongbox Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for the Strongbox secret store.
//!
//! All structs use `#[serde(deny_unknown_fields)]` to reject unrecognized
//! config keys at startup, providing actionable error messages.

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Top-level Strongbox configuration.
///
/// All sections are optional and default to sensible values, except
/// `vault.encryption_key`, which validation requires.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct StrongboxConfig {
    /// Logging settings.
    #[serde(default)]
    pub log: LogConfig,

    /// Storage backend settings.
    #[serde(default)]
    pub storage: StorageConfig,

    /// Encryption key for secrets at rest.
    #[serde(default)]
    pub vault: VaultConfig,

    /// Worker pool sizing.
    #[serde(default)]
    pub pool: PoolConfig,

    /// Audit pipeline settings.
    #[serde(default)]
    pub audit: AuditConfig,

    /// Last-accessed tracker settings.
    #[serde(default)]
    pub tracker: TrackerConfig,

    /// Account password hashing settings.
    #[serde(default)]
    pub auth: AuthConfig,
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct LogConfig {
    /// Log level for the `strongbox` targets (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Storage backend configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct StorageConfig {
    /// Path to the SQLite database file.
    #[serde(default = "default_database_path")]
    pub database_path: String,

    /// Enable WAL (Write-Ahead Logging) mode for SQLite.
    #[serde(default = "default_wal_mode")]
    pub wal_mode: bool,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            database_path: default_database_path(),
            wal_mode: default_wal_mode(),
        }
    }
}

fn default_database_path() -> String {
    dirs::data_dir()
        .map(|p| p.join("strongbox").join("strongbox.db"))
        .unwrap_or_else(|| std::path::PathBuf::from("strongbox.db"))
        .to_string_lossy()
        .into_owned()
}

fn default_wal_mode() -> bool {
    true
}

/// Secret encryption configuration.
///
/// The key is fixed for the lifetime of the process. There is no rotation.
#[derive(Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct VaultConfig {
    /// Standard base64 encoding of a 32-byte AES-256-GCM key.
    #[serde(default)]
    pub encryption_key: Option<String>,
}

impl fmt::Debug for VaultConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VaultConfig")
            .field(
                "encryption_key",
                &self.encryption_key.as_ref().map(|_| "[REDACTED]"),
            )
            .finish()
    }
}

/// Worker pool configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct PoolConfig {
    /// Number of executor tasks, i.e. the concurrency cap (default: 8).
    #[serde(default = "default_pool_size")]
    pub size: usize,

    /// Job queue capacity as a multiple of `size` (default: 2).
    #[serde(default = "default_queue_factor")]
    pub queue_factor: usize,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            size: default_pool_size(),
            queue_factor: default_queue_factor(),
        }
    }
}

impl PoolConfig {
    /// Capacity of the bounded job queue.
    pub fn queue_capacity(&self) -> usize {
        self.size.saturating_mul(self.queue_factor).max(1)
    }
}

fn default_pool_size() -> usize {
    8
}

fn default_queue_factor() -> usize {
    2
}

/// Audit pipeline configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct AuditConfig {
    /// Events buffered before new ones are dropped (default: 100).
    #[serde(default = "default_audit_buffer_capacity")]
    pub buffer_capacity: usize,

    /// How long shutdown waits for the consumer to exit (default: 5s).
    #[serde(default = "default_shutdown_timeout_secs")]
    pub shutdown_timeout_secs: u64,
}

impl Default for AuditConfig {
    fn default() -> Self {
        Self {
            buffer_capacity: default_audit_buffer_capacity(),
            shutdown_timeout_secs: default_shutdown_timeout_secs(),
        }
    }
}

impl AuditConfig {
    pub fn shutdown_timeout(&self) -> Duration {
        Duration::from_secs(self.shutdown_timeout_secs)
    }
}

fn default_audit_buffer_capacity() -> usize {
    100
}

fn default_shutdown_timeout_secs() -> u64 {
    5
}

/// Last-accessed timestamp tracker configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct TrackerConfig {
    /// Pending touches buffered before new ones are dropped (default: 256).
    #[serde(default = "default_tracker_buffer_capacity")]
    pub buffer_capacity: usize,

    /// How long shutdown waits for the consumer to exit (default: 5s).
    #[serde(default = "default_shutdown_timeout_secs")]
    pub shutdown_timeout_secs: u64,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            buffer_capacity: default_tracker_buffer_capacity(),
            shutdown_timeout_secs: default_shutdown_timeout_secs(),
        }
    }
}

impl TrackerConfig {
    pub fn shutdown_timeout(&self) -> Duration {
        Duration::from_secs(self.shutdown_timeout_secs)
    }
}

fn default_tracker_buffer_capacity() -> usize {
    256
}

/// Account password hashing configuration.
///
/// Argon2id parameters for stored account password hashes. Defaults follow
/// OWASP recommendations.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct AuthConfig {
    /// Argon2id memory cost in KiB (default: 65536 = 64 MiB).
    #[serde(default = "default_kdf_memory_cost")]
    pub kdf_memory_cost: u32,

    /// Argon2id iteration count (default: 3).
    #[serde(default = "default_kdf_iterations")]
    pub kdf_iterations: u32,

    /// Argon2id parallelism lanes (default: 4).
    #[serde(default = "default_kdf_parallelism")]
    pub kdf_parallelism: u32,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            kdf_memory_cost: default_kdf_memory_cost(),
            kdf_iterations: default_kdf_iterations(),
            kdf_parallelism: default_kdf_parallelism(),
        }
    }
}

fn default_kdf_memory_cost() -> u32 {
    65536
}

fn default_kdf_iterations() -> u32 {
    3
}

fn default_kdf_parallelism() -> u32 {
    4
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_values() {
        let config = StrongboxConfig::default();
        assert_eq!(config.pool.size, 8);
        assert_eq!(config.pool.queue_capacity(), 16);
        assert_eq!(config.audit.buffer_capacity, 100);
        assert_eq!(config.audit.shutdown_timeout(), Duration::from_secs(5));
        assert_eq!(config.tracker.buffer_capacity, 256);
        assert!(config.storage.wal_mode);
        assert!(config.vault.encryption_key.is_none());
    }

    #[test]
    fn vault_config_debug_redacts_key() {
        let vault = VaultConfig {
            encryption_key: Some("c2VjcmV0".to_string()),
        };
        let debug = format!("{vault:?}");
        assert!(!debug.contains("c2VjcmV0"));
        assert!(debug.contains("REDACTED"));
    }
}
