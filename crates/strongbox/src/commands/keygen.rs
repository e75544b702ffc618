// SPDX-FileCopyrightText: 2026 Strongbox Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `strongbox keygen` command implementation.

use strongbox_core::StrongboxError;

/// Print a fresh encryption key to stdout.
pub fn run() -> Result<(), StrongboxError> {
    let key = strongbox_vault::generate_key()?;
    println!("{key}");
    eprintln!("Store this as vault.encryption_key (or STRONGBOX_VAULT_ENCRYPTION_KEY).");
    eprintln!("Losing it makes every stored password unreadable.");
    Ok(())
}
