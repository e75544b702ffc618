// SPDX-FileCopyrightText: 2026 Strongbox Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Integration tests for the Strongbox configuration system.

use figment::Jail;
use strongbox_config::diagnostic::ConfigError;
use strongbox_config::{load_and_validate_str, load_config, load_config_from_str};

const KEY: &str = "AAECAwQFBgcICQoLDA0ODxAREhMUFRYXGBkaGxwdHh8=";

/// Valid TOML with all known fields deserializes successfully.
#[test]
fn valid_toml_deserializes_into_strongbox_config() {
    let toml = format!(
        r#"
[log]
level = "debug"

[storage]
database_path = "/tmp/strongbox-test.db"
wal_mode = false

[vault]
encryption_key = "{KEY}"

[pool]
size = 4
queue_factor = 3

[audit]
buffer_capacity = 50
shutdown_timeout_secs = 2

[tracker]
buffer_capacity = 64

[auth]
kdf_memory_cost = 32768
kdf_iterations = 2
kdf_parallelism = 1
"#
    );

    let config = load_and_validate_str(&toml).expect("valid TOML should load");
    assert_eq!(config.log.level, "debug");
    assert_eq!(config.storage.database_path, "/tmp/strongbox-test.db");
    assert!(!config.storage.wal_mode);
    assert_eq!(config.vault.encryption_key.as_deref(), Some(KEY));
    assert_eq!(config.pool.size, 4);
    assert_eq!(config.pool.queue_capacity(), 12);
    assert_eq!(config.audit.buffer_capacity, 50);
    assert_eq!(config.audit.shutdown_timeout_secs, 2);
    assert_eq!(config.tracker.buffer_capacity, 64);
    assert_eq!(config.auth.kdf_iterations, 2);
}

/// Unknown field in [pool] is rejected with a suggestion.
#[test]
fn unknown_field_in_pool_produces_suggestion() {
    let toml = format!("[vault]\nencryption_key = \"{KEY}\"\n\n[pool]\nsise = 4\n");

    let errors = load_and_validate_str(&toml).expect_err("should reject unknown field");
    let unknown = errors
        .iter()
        .find_map(|e| match e {
            ConfigError::UnknownKey {
                key, suggestion, ..
            } => Some((key.clone(), suggestion.clone())),
            _ => None,
        })
        .expect("should produce an UnknownKey error");
    assert_eq!(unknown.0, "sise");
    assert_eq!(unknown.1.as_deref(), Some("size"));
}

/// Unknown top-level section is rejected.
#[test]
fn unknown_section_is_rejected() {
    let err = load_config_from_str("[telemetry]\nenabled = true\n")
        .expect_err("should reject unknown section");
    let err_str = format!("{err}");
    assert!(
        err_str.contains("unknown field") || err_str.contains("telemetry"),
        "error should mention the unknown section, got: {err_str}"
    );
}

/// Wrong value type is reported as InvalidType.
#[test]
fn wrong_type_is_reported() {
    let toml = format!("[vault]\nencryption_key = \"{KEY}\"\n\n[pool]\nsize = \"eight\"\n");
    let errors = load_and_validate_str(&toml).expect_err("should reject string pool size");
    assert!(errors
        .iter()
        .any(|e| matches!(e, ConfigError::InvalidType { key, .. } if key.contains("size"))));
}

/// Empty TOML uses defaults but fails validation without a key.
#[test]
fn empty_toml_requires_encryption_key() {
    let errors = load_and_validate_str("").expect_err("key is required");
    assert!(errors
        .iter()
        .any(|e| matches!(e, ConfigError::MissingKey { .. })));
}

/// Environment variables override file values.
#[test]
fn env_overrides_local_file() {
    Jail::expect_with(|jail| {
        jail.create_file(
            "strongbox.toml",
            &format!("[vault]\nencryption_key = \"{KEY}\"\n\n[pool]\nsize = 2\n"),
        )?;
        jail.set_env("STRONGBOX_POOL_SIZE", "12");
        jail.set_env("STRONGBOX_AUDIT_BUFFER_CAPACITY", "7");
        jail.set_env("STRONGBOX_ENTRY_PASSWORD", "not-a-config-key");

        let config = load_config()?;
        assert_eq!(config.pool.size, 12);
        assert_eq!(config.audit.buffer_capacity, 7);
        assert_eq!(config.vault.encryption_key.as_deref(), Some(KEY));
        Ok(())
    });
}

/// The encryption key can come from the environment alone.
#[test]
fn encryption_key_from_env() {
    Jail::expect_with(|jail| {
        jail.set_env("STRONGBOX_VAULT_ENCRYPTION_KEY", KEY);
        let config = load_config()?;
        assert_eq!(config.vault.encryption_key.as_deref(), Some(KEY));
        Ok(())
    });
}
