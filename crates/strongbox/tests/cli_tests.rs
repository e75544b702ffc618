// SPDX-FileCopyrightText: 2026 Strongbox Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! End-to-end tests driving the compiled `strongbox` binary.

use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use tempfile::TempDir;

fn strongbox() -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_strongbox"));
    for (key, _) in std::env::vars() {
        if key.starts_with("STRONGBOX_") {
            cmd.env_remove(key);
        }
    }
    cmd.env("RUST_LOG", "off");
    cmd
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

/// Write a config with a fresh key and a database inside `dir`.
fn write_config(dir: &Path) -> PathBuf {
    let keygen = strongbox().arg("keygen").output().unwrap();
    assert!(keygen.status.success());
    let key = stdout(&keygen).trim().to_string();

    let db = dir.join("data").join("strongbox.db");
    let path = dir.join("strongbox.toml");
    std::fs::write(
        &path,
        format!(
            "[storage]\ndatabase_path = {db:?}\n\n[vault]\nencryption_key = \"{key}\"\n\n[pool]\nsize = 2\n\n\
             [auth]\nkdf_memory_cost = 32768\nkdf_iterations = 2\nkdf_parallelism = 1\n",
            db = db.to_str().unwrap()
        ),
    )
    .unwrap();
    path
}

fn run(config: &Path, args: &[&str]) -> Output {
    strongbox()
        .arg("--config")
        .arg(config)
        .args(args)
        .output()
        .unwrap()
}

#[test]
fn keygen_prints_a_32_byte_key() {
    let output = strongbox().arg("keygen").output().unwrap();
    assert!(output.status.success());
    // 32 bytes in padded base64 is 44 characters.
    assert_eq!(stdout(&output).trim().len(), 44);
}

#[test]
fn check_passes_with_valid_config() {
    let dir = TempDir::new().unwrap();
    let config = write_config(dir.path());
    let output = run(&config, &["check"]);
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
    assert!(stdout(&output).contains("storage         ok"));
}

#[test]
fn missing_key_fails_config_validation() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("strongbox.toml");
    std::fs::write(&path, "[pool]\nsize = 2\n").unwrap();
    let output = run(&path, &["check"]);
    assert!(!output.status.success());
}

#[test]
fn entry_lifecycle_through_the_cli() {
    let dir = TempDir::new().unwrap();
    let config = write_config(dir.path());

    let added = strongbox()
        .arg("--config")
        .arg(&config)
        .args(["entry", "--owner", "1", "add", "bank", "--username", "alice"])
        .env("STRONGBOX_ENTRY_PASSWORD", "p@ss")
        .output()
        .unwrap();
    assert!(added.status.success(), "{}", String::from_utf8_lossy(&added.stderr));
    assert!(stdout(&added).contains("created entry 1"));

    let got = run(&config, &["entry", "--owner", "1", "get", "1"]);
    assert!(got.status.success());
    assert!(stdout(&got).contains("password:  p@ss"));

    // No password source and no TTY: the update keeps the stored secret.
    let updated = run(&config, &["entry", "--owner", "1", "update", "1", "bank2"]);
    assert!(updated.status.success(), "{}", String::from_utf8_lossy(&updated.stderr));
    let got = run(&config, &["entry", "--owner", "1", "get", "1"]);
    assert!(stdout(&got).contains("title:     bank2"));
    assert!(stdout(&got).contains("password:  p@ss"));

    let listed = run(&config, &["entry", "--owner", "1", "list"]);
    assert!(stdout(&listed).contains("bank2"));
    assert!(!stdout(&listed).contains("p@ss"));

    let other = run(&config, &["entry", "--owner", "2", "get", "1"]);
    assert!(!other.status.success());
    assert!(String::from_utf8_lossy(&other.stderr).contains("not_found"));

    let removed = run(&config, &["entry", "--owner", "1", "rm", "1"]);
    assert!(removed.status.success());
    let listed = run(&config, &["entry", "--owner", "1", "list"]);
    assert!(stdout(&listed).contains("no entries"));
}

#[test]
fn user_register_rejects_duplicates() {
    let dir = TempDir::new().unwrap();
    let config = write_config(dir.path());

    let register = || {
        strongbox()
            .arg("--config")
            .arg(&config)
            .args(["user", "register", "a@example.com"])
            .env("STRONGBOX_ACCOUNT_PASSWORD", "hunter2")
            .output()
            .unwrap()
    };

    let first = register();
    assert!(first.status.success(), "{}", String::from_utf8_lossy(&first.stderr));
    assert!(stdout(&first).contains("as owner 1"));

    let second = register();
    assert!(!second.status.success());
    assert!(String::from_utf8_lossy(&second.stderr).contains("conflict"));
}
