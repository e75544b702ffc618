// SPDX-FileCopyrightText: 2026 Strongbox Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Account registration and password verification.
//!
//! Passwords are stored as Argon2id PHC strings (`$argon2id$v=19$...`).
//! Hashing runs on the blocking thread pool so it never stalls an executor.

use std::sync::Arc;

use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::{Algorithm, Argon2, Params, Version};
use ring::rand::{SecureRandom, SystemRandom};
use secrecy::{ExposeSecret, SecretString};
use strongbox_config::model::AuthConfig;
use strongbox_core::{OwnerId, StrongboxError, User, UserStore};
use tracing::{debug, info};

const SALT_LEN: usize = 16;

/// Registers accounts and checks their passwords.
pub struct AccountService {
    store: Arc<dyn UserStore>,
    params: Params,
}

impl std::fmt::Debug for AccountService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AccountService")
            .field("params", &self.params)
            .finish_non_exhaustive()
    }
}

impl AccountService {
    /// Build the service with Argon2id cost parameters from configuration.
    pub fn new(store: Arc<dyn UserStore>, auth: &AuthConfig) -> Result<Self, StrongboxError> {
        let params = Params::new(
            auth.kdf_memory_cost,
            auth.kdf_iterations,
            auth.kdf_parallelism,
            None,
        )
        .map_err(|e| StrongboxError::Config(format!("invalid Argon2id parameters: {e}")))?;
        Ok(Self { store, params })
    }

    /// Create an account. A taken email yields [`StrongboxError::Conflict`].
    pub async fn register(
        &self,
        email: &str,
        password: SecretString,
    ) -> Result<OwnerId, StrongboxError> {
        let email = email.trim();
        if email.is_empty() {
            return Err(StrongboxError::InvalidInput("email is required".into()));
        }
        if password.expose_secret().is_empty() {
            return Err(StrongboxError::InvalidInput("password is required".into()));
        }

        let hash = hash_password(self.params.clone(), password).await?;
        let id = self.store.create_user(email, &hash).await?;
        info!(user_id = %id, "account registered");
        Ok(id)
    }

    /// Check a login. Unknown email and wrong password are indistinguishable.
    pub async fn verify(&self, email: &str, password: SecretString) -> Result<User, StrongboxError> {
        let Some(user) = self.store.get_user_by_email(email.trim()).await? else {
            debug!("login for unknown email");
            return Err(StrongboxError::InvalidCredentials);
        };

        let stored = user.password_hash.clone();
        let matches = tokio::task::spawn_blocking(move || -> Result<bool, StrongboxError> {
            let parsed = PasswordHash::new(&stored)
                .map_err(|e| StrongboxError::Crypto(format!("stored hash is malformed: {e}")))?;
            match Argon2::default().verify_password(password.expose_secret().as_bytes(), &parsed) {
                Ok(()) => Ok(true),
                Err(argon2::password_hash::Error::Password) => Ok(false),
                Err(e) => Err(StrongboxError::Crypto(format!("password verification failed: {e}"))),
            }
        })
        .await
        .map_err(|e| StrongboxError::Internal(format!("password verification task failed: {e}")))??;

        if matches {
            Ok(user)
        } else {
            debug!(user_id = %user.id, "login with wrong password");
            Err(StrongboxError::InvalidCredentials)
        }
    }
}

async fn hash_password(params: Params, password: SecretString) -> Result<String, StrongboxError> {
    tokio::task::spawn_blocking(move || -> Result<String, StrongboxError> {
        let mut salt_bytes = [0u8; SALT_LEN];
        SystemRandom::new()
            .fill(&mut salt_bytes)
            .map_err(|_| StrongboxError::Crypto("failed to generate random salt".into()))?;
        let salt = SaltString::encode_b64(&salt_bytes)
            .map_err(|e| StrongboxError::Crypto(format!("failed to encode salt: {e}")))?;

        let argon2 = Argon2::new(Algorithm::Argon2id, Version::V0x13, params);
        let hash = argon2
            .hash_password(password.expose_secret().as_bytes(), &salt)
            .map_err(|e| StrongboxError::Crypto(format!("password hashing failed: {e}")))?;
        Ok(hash.to_string())
    })
    .await
    .map_err(|e| StrongboxError::Internal(format!("password hashing task failed: {e}")))?
}

#[cfg(test)]
mod tests {
    use super::*;
    use strongbox_config::model::StorageConfig;
    use strongbox_core::ErrorKind;
    use strongbox_storage::SqliteStore;
    use tempfile::tempdir;

    // Low cost for fast tests.
    fn fast_auth() -> AuthConfig {
        AuthConfig {
            kdf_memory_cost: 32768,
            kdf_iterations: 2,
            kdf_parallelism: 1,
        }
    }

    async fn service() -> (AccountService, tempfile::TempDir) {
        let dir = tempdir().unwrap();
        let store = SqliteStore::new(StorageConfig {
            database_path: dir.path().join("accounts.db").to_str().unwrap().to_string(),
            wal_mode: true,
        });
        store.initialize().await.unwrap();
        (AccountService::new(Arc::new(store), &fast_auth()).unwrap(), dir)
    }

    fn secret(s: &str) -> SecretString {
        SecretString::from(s.to_string())
    }

    #[tokio::test]
    async fn register_then_verify() {
        let (accounts, _dir) = service().await;
        let id = accounts
            .register("alice@example.com", secret("correct horse"))
            .await
            .unwrap();

        let user = accounts
            .verify("alice@example.com", secret("correct horse"))
            .await
            .unwrap();
        assert_eq!(user.id, id);
        assert!(user.password_hash.starts_with("$argon2id$v=19$"));
    }

    #[tokio::test]
    async fn wrong_password_and_unknown_email_look_the_same() {
        let (accounts, _dir) = service().await;
        accounts
            .register("bob@example.com", secret("pw"))
            .await
            .unwrap();

        let wrong = accounts
            .verify("bob@example.com", secret("nope"))
            .await
            .unwrap_err();
        let unknown = accounts
            .verify("nobody@example.com", secret("pw"))
            .await
            .unwrap_err();
        assert_eq!(wrong.kind(), ErrorKind::InvalidCredentials);
        assert_eq!(unknown.kind(), ErrorKind::InvalidCredentials);
        assert_eq!(wrong.to_string(), unknown.to_string());
    }

    #[tokio::test]
    async fn duplicate_email_conflicts() {
        let (accounts, _dir) = service().await;
        accounts.register("dup@example.com", secret("a")).await.unwrap();
        let err = accounts
            .register("dup@example.com", secret("b"))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Conflict);
    }

    #[tokio::test]
    async fn empty_fields_are_rejected() {
        let (accounts, _dir) = service().await;
        let err = accounts.register("  ", secret("pw")).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidInput);
        let err = accounts
            .register("c@example.com", secret(""))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidInput);
    }

    #[test]
    fn invalid_params_are_a_config_error() {
        let dir = tempdir().unwrap();
        let store = SqliteStore::new(StorageConfig {
            database_path: dir.path().join("unused.db").to_str().unwrap().to_string(),
            wal_mode: true,
        });
        let auth = AuthConfig {
            kdf_memory_cost: 1,
            kdf_iterations: 0,
            kdf_parallelism: 0,
        };
        let err = AccountService::new(Arc::new(store), &auth).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Config);
    }
}
