// SPDX-FileCopyrightText: 2026 Strongbox Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Strongbox - an encrypted credential store.
//!
//! This is the binary entry point. Every vault command bootstraps the full
//! stack (storage, worker pool, audit and access pipelines), runs one
//! operation through the pool-backed gateway, then shuts down in order.

mod app;
mod commands;
mod prompt;
mod shutdown;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand};
use strongbox_config::StrongboxConfig;

/// Strongbox - an encrypted credential store.
#[derive(Parser, Debug)]
#[command(name = "strongbox", version, about, long_about = None)]
struct Cli {
    /// Load configuration from this file instead of the standard locations.
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Print a fresh base64 encryption key for `vault.encryption_key`.
    Keygen,
    /// Validate configuration, the encryption key and storage.
    Check,
    /// Manage accounts.
    #[command(subcommand)]
    User(UserCommand),
    /// Manage vault entries.
    Entry(EntryArgs),
}

#[derive(Subcommand, Debug)]
enum UserCommand {
    /// Register an account. Reads the password from STRONGBOX_ACCOUNT_PASSWORD or a prompt.
    Register {
        /// Account email.
        email: String,
    },
}

#[derive(Args, Debug)]
struct EntryArgs {
    /// Owner (account id) the entries belong to.
    #[arg(long, short)]
    owner: i64,

    #[command(subcommand)]
    command: EntryCommand,
}

/// Non-secret entry fields shared by `add` and `update`.
#[derive(Args, Debug)]
struct EntryFields {
    #[arg(long, default_value = "")]
    username: String,
    #[arg(long, default_value = "")]
    url: String,
    #[arg(long, default_value = "")]
    category: String,
    #[arg(long, default_value = "")]
    notes: String,
}

#[derive(Subcommand, Debug)]
enum EntryCommand {
    /// List entries, newest first (passwords hidden).
    List,
    /// Show one entry including its password.
    Get { id: i64 },
    /// Add an entry. Reads the password from STRONGBOX_ENTRY_PASSWORD or a prompt.
    Add {
        title: String,
        #[command(flatten)]
        fields: EntryFields,
    },
    /// Replace an entry's fields. An empty password keeps the stored one.
    Update {
        id: i64,
        title: String,
        #[command(flatten)]
        fields: EntryFields,
    },
    /// Delete an entry.
    Rm { id: i64 },
    /// Search title, url and username.
    Search { query: String },
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let result = match cli.command {
        // Needs no configuration; the key it prints is what makes one valid.
        Commands::Keygen => commands::keygen::run(),
        command => {
            let Some(config) = load_config(cli.config.as_deref()) else {
                return ExitCode::FAILURE;
            };
            init_tracing(&config.log.level);
            dispatch(config, command).await
        }
    };
    report(result)
}

async fn dispatch(
    config: StrongboxConfig,
    command: Commands,
) -> Result<(), strongbox_core::StrongboxError> {
    match command {
        Commands::Keygen => commands::keygen::run(),
        Commands::Check => commands::check::run(config).await,
        Commands::User(UserCommand::Register { email }) => {
            commands::user::register(config, &email).await
        }
        Commands::Entry(args) => commands::entry::run(config, args).await,
    }
}

fn load_config(path: Option<&std::path::Path>) -> Option<StrongboxConfig> {
    let loaded = match path {
        Some(path) => strongbox_config::load_and_validate_path(path),
        None => strongbox_config::load_and_validate(),
    };
    match loaded {
        Ok(config) => Some(config),
        Err(errors) => {
            strongbox_config::render_errors(&errors);
            None
        }
    }
}

fn report(result: Result<(), strongbox_core::StrongboxError>) -> ExitCode {
    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("strongbox: {} ({})", e, e.kind());
            ExitCode::FAILURE
        }
    }
}

/// Initialize the tracing subscriber with an env filter.
fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("strongbox={log_level},warn")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();
}
