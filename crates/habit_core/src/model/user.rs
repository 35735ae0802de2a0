//! User identity and credential records.
//!
//! # Invariants
//! - `CredentialRecord` is never handed to view code; callers get `User`.
//! - Exactly one credential record exists per unique `email`.

use serde::{Deserialize, Serialize};

/// Stable user identifier, opaque to callers.
pub type UserId = String;

/// Public user identity held by the session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub username: String,
    pub email: String,
}

/// Stored credential entry in the `users` collection.
///
/// Passwords are compared as plaintext; the stored shape matches existing
/// `users` documents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CredentialRecord {
    pub id: UserId,
    pub username: String,
    pub email: String,
    pub password: String,
}

impl CredentialRecord {
    /// Returns the public identity without the password.
    pub fn to_user(&self) -> User {
        User {
            id: self.id.clone(),
            username: self.username.clone(),
            email: self.email.clone(),
        }
    }

    /// Exact, case-sensitive match on both email and password.
    pub fn matches(&self, email: &str, password: &str) -> bool {
        self.email == email && self.password == password
    }
}
