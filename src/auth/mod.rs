//! Authentication: password digests, bearer-token sessions, and
//! per-request principal resolution.
//!
//! Tokens are opaque uuids held in an in-memory table; restarting the
//! server logs everyone out. The resolved [`Principal`] is passed
//! explicitly into engine calls rather than living in any global state.

use std::collections::HashMap;
use std::sync::Arc;

use sha2::{Digest, Sha256};
use thiserror::Error;
use tokio::sync::RwLock;
use tracing::info;
use uuid::Uuid;

use crate::domain::{Principal, Role, User, UserView};
use crate::store::{ResourceStore, StoreError};

/// Errors from login/registration.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Unknown username or wrong password (indistinguishable on purpose)
    #[error("invalid username or password")]
    InvalidCredentials,

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Hex-encoded SHA-256 of salt + password.
pub fn hash_password(password: &str, salt: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(salt.as_bytes());
    hasher.update(password.as_bytes());
    hex::encode(hasher.finalize())
}

/// Fresh random salt for a new account.
pub fn generate_salt() -> String {
    Uuid::new_v4().simple().to_string()
}

/// Build an unsaved user record with hashed credentials. The store
/// assigns the real id on insert.
pub fn new_user(username: &str, password: &str, name: &str, role: Role) -> User {
    let salt = generate_salt();
    User {
        id: 0,
        username: username.to_string(),
        password_hash: hash_password(password, &salt),
        salt,
        role,
        name: name.to_string(),
        created_at: chrono::Utc::now(),
    }
}

/// Maps bearer tokens to user ids and resolves principals per request.
pub struct SessionManager {
    store: Arc<dyn ResourceStore>,

    /// token -> user id
    sessions: RwLock<HashMap<String, i64>>,
}

impl SessionManager {
    pub fn new(store: Arc<dyn ResourceStore>) -> Self {
        Self {
            store,
            sessions: RwLock::new(HashMap::new()),
        }
    }

    /// Register a new account and return its sanitized view.
    pub async fn register(
        &self,
        username: &str,
        password: &str,
        name: &str,
        role: Role,
    ) -> Result<UserView, AuthError> {
        let user = self.store.create_user(new_user(username, password, name, role)).await?;
        info!(%username, "user registered");
        Ok(user.view())
    }

    /// Verify credentials and mint a session token.
    pub async fn login(&self, username: &str, password: &str) -> Result<(String, UserView), AuthError> {
        let user = self
            .store
            .find_user_by_username(username)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        if hash_password(password, &user.salt) != user.password_hash {
            return Err(AuthError::InvalidCredentials);
        }

        let token = Uuid::new_v4().to_string();
        self.sessions.write().await.insert(token.clone(), user.id);
        info!(%username, "user logged in");
        Ok((token, user.view()))
    }

    /// Drop a session. Unknown tokens are ignored.
    pub async fn logout(&self, token: &str) {
        self.sessions.write().await.remove(token);
    }

    /// Resolve a bearer token to a principal.
    ///
    /// The user record is re-read on every request so a role change takes
    /// effect without a new login.
    pub async fn resolve(&self, token: &str) -> Result<Option<Principal>, StoreError> {
        let user_id = {
            let sessions = self.sessions.read().await;
            match sessions.get(token) {
                Some(id) => *id,
                None => return Ok(None),
            }
        };

        Ok(self
            .store
            .find_user(user_id)
            .await?
            .map(|user| Principal::new(user.id, user.role)))
    }

    /// The sanitized user behind a token, for `GET /api/user`.
    pub async fn current_user(&self, token: &str) -> Result<Option<UserView>, StoreError> {
        let user_id = {
            let sessions = self.sessions.read().await;
            match sessions.get(token) {
                Some(id) => *id,
                None => return Ok(None),
            }
        };

        Ok(self.store.find_user(user_id).await?.map(|u| u.view()))
    }
}
