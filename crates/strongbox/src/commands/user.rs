// SPDX-FileCopyrightText: 2026 Strongbox Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `strongbox user` command implementations.

use strongbox_config::StrongboxConfig;
use strongbox_core::StrongboxError;

use crate::app::App;
use crate::prompt::{ACCOUNT_PASSWORD_ENV_VAR, read_secret};
use crate::shutdown::install_signal_handler;

/// Register an account and print its owner id.
pub async fn register(config: StrongboxConfig, email: &str) -> Result<(), StrongboxError> {
    let password = read_secret(ACCOUNT_PASSWORD_ENV_VAR, "Account password", false)?;

    let app = App::bootstrap(config).await?;
    let cancel = install_signal_handler();
    let result = app
        .register_user(email, password, &cancel)
        .await
        .map(|id| println!("registered {email} as owner {id}"));

    result.and(app.shutdown().await)
}
