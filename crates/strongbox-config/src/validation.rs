// SPDX-FileCopyrightText: 2026 Strongbox Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.
//!
//! Checks semantic constraints serde attributes cannot express. All failures
//! are collected rather than failing fast.

use crate::diagnostic::ConfigError;
use crate::model::StrongboxConfig;

const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// Validate a deserialized configuration for semantic correctness.
pub fn validate_config(config: &StrongboxConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();

    if !LOG_LEVELS.contains(&config.log.level.to_ascii_lowercase().as_str()) {
        errors.push(ConfigError::Validation {
            message: format!(
                "log.level `{}` must be one of: {}",
                config.log.level,
                LOG_LEVELS.join(", ")
            ),
        });
    }

    if config.storage.database_path.trim().is_empty() {
        errors.push(ConfigError::Validation {
            message: "storage.database_path must not be empty".to_string(),
        });
    }

    match config.vault.encryption_key.as_deref().map(str::trim) {
        None => errors.push(ConfigError::MissingKey {
            key: "vault.encryption_key".to_string(),
        }),
        Some("") => errors.push(ConfigError::Validation {
            message: "vault.encryption_key must not be empty".to_string(),
        }),
        Some(_) => {}
    }

    if config.pool.size == 0 {
        errors.push(ConfigError::Validation {
            message: "pool.size must be at least 1".to_string(),
        });
    }

    if config.pool.queue_factor == 0 {
        errors.push(ConfigError::Validation {
            message: "pool.queue_factor must be at least 1".to_string(),
        });
    }

    if config.audit.buffer_capacity == 0 {
        errors.push(ConfigError::Validation {
            message: "audit.buffer_capacity must be at least 1".to_string(),
        });
    }

    if config.audit.shutdown_timeout_secs == 0 {
        errors.push(ConfigError::Validation {
            message: "audit.shutdown_timeout_secs must be at least 1".to_string(),
        });
    }

    if config.tracker.buffer_capacity == 0 {
        errors.push(ConfigError::Validation {
            message: "tracker.buffer_capacity must be at least 1".to_string(),
        });
    }

    if config.tracker.shutdown_timeout_secs == 0 {
        errors.push(ConfigError::Validation {
            message: "tracker.shutdown_timeout_secs must be at least 1".to_string(),
        });
    }

    if config.auth.kdf_memory_cost < 32768 {
        errors.push(ConfigError::Validation {
            message: format!(
                "auth.kdf_memory_cost must be at least 32768 (32 MiB), got {}",
                config.auth.kdf_memory_cost
            ),
        });
    }

    if config.auth.kdf_iterations < 2 {
        errors.push(ConfigError::Validation {
            message: format!(
                "auth.kdf_iterations must be at least 2, got {}",
                config.auth.kdf_iterations
            ),
        });
    }

    if config.auth.kdf_parallelism < 1 {
        errors.push(ConfigError::Validation {
            message: format!(
                "auth.kdf_parallelism must be at least 1, got {}",
                config.auth.kdf_parallelism
            ),
        });
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
