//! Users, roles, and the request-scoped principal.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Access level of a back-office user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Full access, including content and campaign management
    Admin,

    /// CRM access only
    Employee,
}

impl Role {
    pub fn is_admin(&self) -> bool {
        matches!(self, Role::Admin)
    }
}

impl Default for Role {
    fn default() -> Self {
        Role::Employee
    }
}

/// A back-office user account.
///
/// `password_hash` and `salt` never leave the server; API responses go
/// through [`UserView`].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: i64,

    /// Unique login name
    pub username: String,

    /// Salted SHA-256 digest of the password, hex-encoded
    pub password_hash: String,

    /// Per-user random salt, hex-encoded
    pub salt: String,

    pub role: Role,

    /// Display name
    pub name: String,

    pub created_at: DateTime<Utc>,
}

impl User {
    /// Strip credential material for API responses.
    pub fn view(&self) -> UserView {
        UserView {
            id: self.id,
            username: self.username.clone(),
            role: self.role,
            name: self.name.clone(),
            created_at: self.created_at,
        }
    }
}

/// A user as exposed over the API (no credential material).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserView {
    pub id: i64,
    pub username: String,
    pub role: Role,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

/// The authenticated actor behind a single request.
///
/// Resolved from the bearer token at the API boundary and passed
/// explicitly into every engine call; there is no process-wide
/// current-user state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Principal {
    pub user_id: i64,
    pub role: Role,
}

impl Principal {
    pub fn new(user_id: i64, role: Role) -> Self {
        Self { user_id, role }
    }

    pub fn is_admin(&self) -> bool {
        self.role.is_admin()
    }
}
