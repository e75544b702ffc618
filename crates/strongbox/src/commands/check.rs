// SPDX-FileCopyrightText: 2026 Strongbox Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `strongbox check` command implementation.
//!
//! Configuration has already been loaded and validated by the time this
//! runs; here the key is decoded, storage is opened and migrated, and the
//! background tasks are started and stopped once.

use strongbox_config::StrongboxConfig;
use strongbox_core::{HealthStatus, StrongboxError};

use crate::app::App;

pub async fn run(config: StrongboxConfig) -> Result<(), StrongboxError> {
    println!("  config          ok");

    let database = config.storage.database_path.clone();
    let app = App::bootstrap(config).await?;
    println!("  encryption key  ok");

    let health = app.health().await;
    let outcome = match &health {
        HealthStatus::Healthy => {
            println!("  storage         ok ({database})");
            Ok(())
        }
        HealthStatus::Degraded(reason) => {
            println!("  storage         degraded: {reason}");
            Ok(())
        }
        HealthStatus::Unhealthy(reason) => {
            println!("  storage         FAILED: {reason}");
            Err(StrongboxError::storage(reason.clone()))
        }
    };

    outcome.and(app.shutdown().await)
}
