// SPDX-FileCopyrightText: 2026 Strongbox Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Secret acquisition via environment variable or TTY prompt.

use secrecy::SecretString;
use strongbox_core::StrongboxError;

/// Environment variable carrying the password for `entry add` / `entry update`.
pub const ENTRY_PASSWORD_ENV_VAR: &str = "STRONGBOX_ENTRY_PASSWORD";

/// Environment variable carrying the password for `user register`.
pub const ACCOUNT_PASSWORD_ENV_VAR: &str = "STRONGBOX_ACCOUNT_PASSWORD";

/// Read a secret from `env_var`, falling back to an interactive prompt.
///
/// With `allow_empty`, an empty answer (or no source at all when stdin is not
/// a terminal) yields an empty secret; `entry update` uses that to keep the
/// stored password.
pub fn read_secret(
    env_var: &str,
    label: &str,
    allow_empty: bool,
) -> Result<SecretString, StrongboxError> {
    if let Ok(value) = std::env::var(env_var)
        && !value.is_empty()
    {
        return Ok(SecretString::from(value));
    }

    if std::io::IsTerminal::is_terminal(&std::io::stdin()) {
        eprint!("{label}: ");
        let value = rpassword::read_password()
            .map_err(|e| StrongboxError::InvalidInput(format!("failed to read {label}: {e}")))?;
        if value.is_empty() && !allow_empty {
            return Err(StrongboxError::InvalidInput(format!("empty {label} not allowed")));
        }
        return Ok(SecretString::from(value));
    }

    if allow_empty {
        return Ok(SecretString::from(String::new()));
    }
    Err(StrongboxError::InvalidInput(format!(
        "no {label} provided. Set {env_var} or run interactively."
    )))
}
