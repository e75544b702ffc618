// SPDX-FileCopyrightText: 2026 Strongbox Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `strongbox entry` command implementations.

use secrecy::{ExposeSecret, SecretString};
use strongbox_config::StrongboxConfig;
use strongbox_core::{Entry, EntryDraft, EntryId, OwnerId, StrongboxError};
use tokio_util::sync::CancellationToken;

use crate::app::App;
use crate::prompt::{ENTRY_PASSWORD_ENV_VAR, read_secret};
use crate::shutdown::install_signal_handler;
use crate::{EntryArgs, EntryCommand, EntryFields};

/// Run one entry command against a freshly bootstrapped store.
pub async fn run(config: StrongboxConfig, args: EntryArgs) -> Result<(), StrongboxError> {
    // Prompt before starting anything so a refused prompt leaves nothing to stop.
    let password = match &args.command {
        EntryCommand::Add { .. } => Some(read_secret(ENTRY_PASSWORD_ENV_VAR, "Password", false)?),
        EntryCommand::Update { .. } => Some(read_secret(
            ENTRY_PASSWORD_ENV_VAR,
            "New password (empty keeps current)",
            true,
        )?),
        _ => None,
    };

    let app = App::bootstrap(config).await?;
    let cancel = install_signal_handler();
    let result = execute(&app, OwnerId(args.owner), args.command, password, &cancel).await;

    result.and(app.shutdown().await)
}

async fn execute(
    app: &App,
    owner: OwnerId,
    command: EntryCommand,
    password: Option<SecretString>,
    cancel: &CancellationToken,
) -> Result<(), StrongboxError> {
    let gateway = app.gateway();
    let password = password.unwrap_or_else(|| SecretString::from(String::new()));

    match command {
        EntryCommand::List => {
            let entries = gateway.list(owner, cancel).await?;
            print_table(&entries);
        }
        EntryCommand::Search { query } => {
            let entries = gateway.search(owner, query, cancel).await?;
            print_table(&entries);
        }
        EntryCommand::Get { id } => {
            let entry = gateway.get(owner, EntryId(id), cancel).await?;
            print_entry(&entry);
        }
        EntryCommand::Add { title, fields } => {
            let id = gateway
                .create(owner, draft(title, fields, password), cancel)
                .await?;
            println!("created entry {id}");
        }
        EntryCommand::Update { id, title, fields } => {
            gateway
                .update(owner, EntryId(id), draft(title, fields, password), cancel)
                .await?;
            println!("updated entry {id}");
        }
        EntryCommand::Rm { id } => {
            gateway.delete(owner, EntryId(id), cancel).await?;
            println!("deleted entry {id}");
        }
    }
    Ok(())
}

fn draft(title: String, fields: EntryFields, password: SecretString) -> EntryDraft {
    let mut draft = EntryDraft::new(title, String::new())
        .with_username(fields.username)
        .with_url(fields.url)
        .with_category(fields.category)
        .with_notes(fields.notes);
    draft.password = password;
    draft
}

fn print_table(entries: &[Entry]) {
    if entries.is_empty() {
        println!("no entries");
        return;
    }
    println!("{:<6} {:<24} {:<20} {:<32} {}", "ID", "TITLE", "USERNAME", "URL", "UPDATED");
    for entry in entries {
        println!(
            "{:<6} {:<24} {:<20} {:<32} {}",
            entry.id,
            entry.title,
            entry.username,
            entry.url,
            entry.updated_at.format("%Y-%m-%d %H:%M")
        );
    }
}

fn print_entry(entry: &Entry) {
    println!("id:        {}", entry.id);
    println!("title:     {}", entry.title);
    println!("username:  {}", entry.username);
    println!("url:       {}", entry.url);
    println!("category:  {}", entry.category);
    println!("notes:     {}", entry.notes);
    if let Some(password) = &entry.password {
        println!("password:  {}", password.expose_secret());
    }
    println!("created:   {}", entry.created_at.to_rfc3339());
    println!("updated:   {}", entry.updated_at.to_rfc3339());
    match entry.last_accessed_at {
        Some(at) => println!("accessed:  {}", at.to_rfc3339()),
        None => println!("accessed:  never"),
    }
}
