// SPDX-FileCopyrightText: 2026 Strongbox Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Vault entry CRUD operations.
//!
//! Every statement filters on `user_id`, so a row owned by someone else is
//! indistinguishable from a missing one.

use chrono::{DateTime, Utc};
use rusqlite::{Row, params};
use strongbox_core::{EntryId, OwnerId, StoredEntry, StrongboxError};

use super::like_pattern;
use crate::database::{Database, map_tr_err};

const ENTRY_COLUMNS: &str = "id, user_id, title, username, url, category, notes, password_enc, \
     created_at, updated_at, last_accessed_at";

fn row_to_entry(row: &Row<'_>) -> rusqlite::Result<StoredEntry> {
    Ok(StoredEntry {
        id: EntryId(row.get(0)?),
        owner: OwnerId(row.get(1)?),
        title: row.get(2)?,
        username: row.get(3)?,
        url: row.get(4)?,
        category: row.get(5)?,
        notes: row.get(6)?,
        password_enc: row.get(7)?,
        created_at: row.get(8)?,
        updated_at: row.get(9)?,
        last_accessed_at: row.get(10)?,
    })
}

/// Insert a new entry and return its assigned id. `entry.id` is ignored.
pub async fn insert_entry(db: &Database, entry: &StoredEntry) -> Result<EntryId, StrongboxError> {
    let entry = entry.clone();
    db.connection()
        .call(move |conn| -> Result<EntryId, rusqlite::Error> {
            conn.execute(
                "INSERT INTO vault_entries
                     (user_id, title, username, url, category, notes, password_enc,
                      created_at, updated_at, last_accessed_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
                params![
                    entry.owner.0,
                    entry.title,
                    entry.username,
                    entry.url,
                    entry.category,
                    entry.notes,
                    entry.password_enc,
                    entry.created_at,
                    entry.updated_at,
                    entry.last_accessed_at,
                ],
            )?;
            Ok(EntryId(conn.last_insert_rowid()))
        })
        .await
        .map_err(map_tr_err)
}

/// Fetch one entry by owner and id.
pub async fn get_entry(
    db: &Database,
    owner: OwnerId,
    id: EntryId,
) -> Result<Option<StoredEntry>, StrongboxError> {
    db.connection()
        .call(move |conn| -> Result<Option<StoredEntry>, rusqlite::Error> {
            let mut stmt = conn.prepare(&format!(
                "SELECT {ENTRY_COLUMNS} FROM vault_entries WHERE user_id = ?1 AND id = ?2"
            ))?;
            match stmt.query_row(params![owner.0, id.0], row_to_entry) {
                Ok(entry) => Ok(Some(entry)),
                Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                Err(e) => Err(e),
            }
        })
        .await
        .map_err(map_tr_err)
}

/// All entries for an owner, newest first.
pub async fn list_entries(
    db: &Database,
    owner: OwnerId,
) -> Result<Vec<StoredEntry>, StrongboxError> {
    db.connection()
        .call(move |conn| -> Result<Vec<StoredEntry>, rusqlite::Error> {
            let mut stmt = conn.prepare(&format!(
                "SELECT {ENTRY_COLUMNS} FROM vault_entries WHERE user_id = ?1 ORDER BY id DESC"
            ))?;
            let rows = stmt.query_map(params![owner.0], row_to_entry)?;
            rows.collect()
        })
        .await
        .map_err(map_tr_err)
}

/// Entries whose title, url or username contain `query`, newest first.
///
/// Matching is case-insensitive for ASCII and treats LIKE wildcards in the
/// query as literal characters.
pub async fn search_entries(
    db: &Database,
    owner: OwnerId,
    query: &str,
) -> Result<Vec<StoredEntry>, StrongboxError> {
    let pattern = like_pattern(query);
    db.connection()
        .call(move |conn| -> Result<Vec<StoredEntry>, rusqlite::Error> {
            let mut stmt = conn.prepare(&format!(
                "SELECT {ENTRY_COLUMNS} FROM vault_entries
                 WHERE user_id = ?1
                   AND (title LIKE ?2 ESCAPE '\\'
                        OR url LIKE ?2 ESCAPE '\\'
                        OR username LIKE ?2 ESCAPE '\\')
                 ORDER BY id DESC"
            ))?;
            let rows = stmt.query_map(params![owner.0, pattern], row_to_entry)?;
            rows.collect()
        })
        .await
        .map_err(map_tr_err)
}

/// Overwrite the mutable columns of an existing entry.
///
/// Returns the number of rows changed (0 when the owner/id pair does not exist).
pub async fn update_entry(db: &Database, entry: &StoredEntry) -> Result<usize, StrongboxError> {
    let entry = entry.clone();
    db.connection()
        .call(move |conn| -> Result<usize, rusqlite::Error> {
            conn.execute(
                "UPDATE vault_entries
                 SET title = ?3, username = ?4, url = ?5, category = ?6, notes = ?7,
                     password_enc = ?8, updated_at = ?9
                 WHERE user_id = ?1 AND id = ?2",
                params![
                    entry.owner.0,
                    entry.id.0,
                    entry.title,
                    entry.username,
                    entry.url,
                    entry.category,
                    entry.notes,
                    entry.password_enc,
                    entry.updated_at,
                ],
            )
        })
        .await
        .map_err(map_tr_err)
}

/// Delete an entry. Returns the number of rows removed.
pub async fn delete_entry(
    db: &Database,
    owner: OwnerId,
    id: EntryId,
) -> Result<usize, StrongboxError> {
    db.connection()
        .call(move |conn| -> Result<usize, rusqlite::Error> {
            conn.execute(
                "DELETE FROM vault_entries WHERE user_id = ?1 AND id = ?2",
                params![owner.0, id.0],
            )
        })
        .await
        .map_err(map_tr_err)
}

/// Stamp `last_accessed_at`. A missing row is not an error.
pub async fn touch_last_accessed(
    db: &Database,
    owner: OwnerId,
    id: EntryId,
    at: DateTime<Utc>,
) -> Result<(), StrongboxError> {
    db.connection()
        .call(move |conn| -> Result<(), rusqlite::Error> {
            conn.execute(
                "UPDATE vault_entries SET last_accessed_at = ?3 WHERE user_id = ?1 AND id = ?2",
                params![owner.0, id.0, at],
            )?;
            Ok(())
        })
        .await
        .map_err(map_tr_err)
}
