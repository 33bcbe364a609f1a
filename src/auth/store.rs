//! Flat-file user store.
//!
//! The whole user list is one JSON file; every registration rewrites it.
//! That makes the read-modify-write sequence the critical section, so
//! registration runs under a mutex — one writer at a time, which also makes
//! the `len + 1` id assignment and the duplicate-email check safe against
//! concurrent registrations. Reads (login, verify) go straight to the file.

use argon2::password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;
use tokio::sync::Mutex;
use tracing::{error, warn};

/// One registered user, as persisted in the users file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserRecord {
    pub id: u64,
    pub email: String,
    pub username: String,
    pub created_at: String,
    /// Argon2 PHC string; absent for provider-only accounts.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    #[serde(default)]
    pub provider: Option<String>,
    #[serde(default)]
    pub provider_id: Option<String>,
    #[serde(default)]
    pub avatar: Option<String>,
}

#[derive(Debug, Error)]
pub enum AuthStoreError {
    #[error("Email already registered")]
    DuplicateEmail,

    #[error("could not persist users file '{path}': {source}")]
    Persist {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("could not serialise user list: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("password hashing failed: {0}")]
    Hash(String),
}

/// The flat-file user list.
///
/// Cheap to clone-by-Arc via [`crate::AppState`]; the embedded mutex
/// serializes writers.
pub struct UserStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl UserStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    /// Load the user list. Missing or unreadable file degrades to empty.
    pub async fn load(&self) -> Vec<UserRecord> {
        match tokio::fs::read(&self.path).await {
            Ok(bytes) => match serde_json::from_slice(&bytes) {
                Ok(users) => users,
                Err(e) => {
                    warn!("users file '{}' is corrupt: {e}", self.path.display());
                    Vec::new()
                }
            },
            Err(_) => Vec::new(),
        }
    }

    async fn save(&self, users: &[UserRecord]) -> Result<(), AuthStoreError> {
        let json = serde_json::to_vec_pretty(users)?;
        tokio::fs::write(&self.path, json)
            .await
            .map_err(|source| AuthStoreError::Persist {
                path: self.path.clone(),
                source,
            })
    }

    /// Register a new local user.
    ///
    /// Load, duplicate check, id assignment, append, and save all happen
    /// under the write lock, so concurrent registrations cannot race the
    /// file or hand out the same id.
    pub async fn register(
        &self,
        email: &str,
        username: &str,
        password: &str,
    ) -> Result<UserRecord, AuthStoreError> {
        let _guard = self.write_lock.lock().await;

        let mut users = self.load().await;
        if find_by_email(&users, email).is_some() {
            return Err(AuthStoreError::DuplicateEmail);
        }

        let user = UserRecord {
            id: users.len() as u64 + 1,
            email: email.to_lowercase(),
            username: username.to_string(),
            created_at: Utc::now().to_rfc3339(),
            password: Some(hash_password(password)?),
            provider: Some("local".to_string()),
            provider_id: None,
            avatar: None,
        };

        users.push(user.clone());
        self.save(&users).await?;
        Ok(user)
    }

    /// Look up a user by email, case-insensitively.
    pub async fn user_by_email(&self, email: &str) -> Option<UserRecord> {
        let users = self.load().await;
        find_by_email(&users, email).cloned()
    }

    /// Look up a user by id.
    pub async fn user_by_id(&self, id: u64) -> Option<UserRecord> {
        self.load().await.into_iter().find(|u| u.id == id)
    }
}

fn find_by_email<'a>(users: &'a [UserRecord], email: &str) -> Option<&'a UserRecord> {
    users
        .iter()
        .find(|u| u.email.eq_ignore_ascii_case(email))
}

fn hash_password(password: &str) -> Result<String, AuthStoreError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|h| h.to_string())
        .map_err(|e| AuthStoreError::Hash(e.to_string()))
}

/// Check a password against a stored hash. Any failure — absent hash,
/// unparseable hash, mismatch — is just "wrong password".
pub fn verify_password(stored_hash: Option<&str>, provided: &str) -> bool {
    let Some(stored) = stored_hash else {
        return false;
    };
    let Ok(parsed) = PasswordHash::new(stored) else {
        error!("stored password hash is unparseable");
        return false;
    };
    Argon2::default()
        .verify_password(provided.as_bytes(), &parsed)
        .is_ok()
}
