// SPDX-FileCopyrightText: 2026 Strongbox Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Account rows.

use chrono::Utc;
use rusqlite::{ErrorCode, Row, params};
use strongbox_core::{OwnerId, StrongboxError, User};

use crate::database::{Database, map_tr_err};

fn row_to_user(row: &Row<'_>) -> rusqlite::Result<User> {
    Ok(User {
        id: OwnerId(row.get(0)?),
        email: row.get(1)?,
        password_hash: row.get(2)?,
        created_at: row.get(3)?,
    })
}

fn is_unique_violation(err: &rusqlite::Error) -> bool {
    matches!(
        err,
        rusqlite::Error::SqliteFailure(e, _) if e.code == ErrorCode::ConstraintViolation
    )
}

/// Insert a user and return the new id. A duplicate email yields [`StrongboxError::Conflict`].
pub async fn create_user(
    db: &Database,
    email: &str,
    password_hash: &str,
) -> Result<OwnerId, StrongboxError> {
    let email = email.to_string();
    let password_hash = password_hash.to_string();
    let created_at = Utc::now();
    // The inner `None` marks a duplicate email.
    let inserted = db
        .connection()
        .call(move |conn| -> Result<Option<OwnerId>, rusqlite::Error> {
            match conn.execute(
                "INSERT INTO users (email, password_hash, created_at) VALUES (?1, ?2, ?3)",
                params![email, password_hash, created_at],
            ) {
                Ok(_) => Ok(Some(OwnerId(conn.last_insert_rowid()))),
                Err(e) if is_unique_violation(&e) => Ok(None),
                Err(e) => Err(e),
            }
        })
        .await
        .map_err(map_tr_err)?;
    inserted.ok_or_else(|| StrongboxError::Conflict("email already registered".into()))
}

/// Look up a user by email.
pub async fn get_user_by_email(db: &Database, email: &str) -> Result<Option<User>, StrongboxError> {
    let email = email.to_string();
    db.connection()
        .call(move |conn| -> Result<Option<User>, rusqlite::Error> {
            let mut stmt = conn.prepare(
                "SELECT id, email, password_hash, created_at FROM users WHERE email = ?1",
            )?;
            match stmt.query_row(params![email], row_to_user) {
                Ok(user) => Ok(Some(user)),
                Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                Err(e) => Err(e),
            }
        })
        .await
        .map_err(map_tr_err)
}

/// Look up a user by id.
pub async fn get_user(db: &Database, id: OwnerId) -> Result<Option<User>, StrongboxError> {
    db.connection()
        .call(move |conn| -> Result<Option<User>, rusqlite::Error> {
            let mut stmt =
                conn.prepare("SELECT id, email, password_hash, created_at FROM users WHERE id = ?1")?;
            match stmt.query_row(params![id.0], row_to_user) {
                Ok(user) => Ok(Some(user)),
                Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                Err(e) => Err(e),
            }
        })
        .await
        .map_err(map_tr_err)
}

#[cfg(test)]
mod tests {
    use super::*;
    use strongbox_core::ErrorKind;
    use tempfile::tempdir;

    async fn test_db() -> (Database, tempfile::TempDir) {
        let dir = tempdir().unwrap();
        let path = dir.path().join("users.db");
        let db = Database::open(path.to_str().unwrap()).await.unwrap();
        (db, dir)
    }

    #[tokio::test]
    async fn create_and_lookup() {
        let (db, _dir) = test_db().await;
        let id = create_user(&db, "a@example.com", "$argon2id$hash")
            .await
            .unwrap();

        let by_email = get_user_by_email(&db, "a@example.com")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(by_email.id, id);
        assert_eq!(by_email.password_hash, "$argon2id$hash");

        let by_id = get_user(&db, id).await.unwrap().unwrap();
        assert_eq!(by_id.email, "a@example.com");

        assert!(get_user_by_email(&db, "b@example.com").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn duplicate_email_is_conflict() {
        let (db, _dir) = test_db().await;
        create_user(&db, "dup@example.com", "h1").await.unwrap();
        let err = create_user(&db, "dup@example.com", "h2").await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Conflict);
    }
}
