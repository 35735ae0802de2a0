//! Auth use-case service: registration, login and session lifecycle.
//!
//! # Responsibility
//! - Own credential records under `users` and the session mirror under `user`.
//! - Hold the current session in memory.
//!
//! # Invariants
//! - At most one credential record exists per email.
//! - Returned `User` values never carry a password.
//! - Failed operations leave the in-memory session and the store unchanged;
//!   a register whose session write fails removes its credential record again.
//! - Passwords and emails are never written to logs.

use crate::model::ids::new_record_id;
use crate::model::user::{CredentialRecord, User};
use crate::model::validation::{require_non_blank, ValidationError, MIN_PASSWORD_CHARS};
use crate::repo::document::{load_collection, save_collection, save_document};
use crate::store::{KeyValueStore, StorageKey, StoreError};
use log::{error, info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type AuthResult<T> = Result<T, AuthError>;

/// Failure of an auth operation.
#[derive(Debug)]
pub enum AuthError {
    Validation(ValidationError),
    /// A credential record with this email already exists.
    DuplicateEmail,
    /// No credential record matches both email and password.
    InvalidCredentials,
    Store(StoreError),
}

impl AuthError {
    fn code(&self) -> &'static str {
        match self {
            Self::Validation(_) => "validation_failed",
            Self::DuplicateEmail => "duplicate_email",
            Self::InvalidCredentials => "invalid_credentials",
            Self::Store(_) => "store_failed",
        }
    }
}

impl Display for AuthError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::DuplicateEmail => write!(f, "email already exists"),
            Self::InvalidCredentials => write!(f, "invalid credentials"),
            Self::Store(err) => write!(f, "{err}"),
        }
    }
}

impl Error for AuthError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Store(err) => Some(err),
            Self::DuplicateEmail | Self::InvalidCredentials => None,
        }
    }
}

impl From<ValidationError> for AuthError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<StoreError> for AuthError {
    fn from(value: StoreError) -> Self {
        Self::Store(value)
    }
}

/// Session owner backed by a key-value store.
pub struct AuthService<'s, S: KeyValueStore + ?Sized> {
    store: &'s S,
    session: Option<User>,
}

impl<'s, S: KeyValueStore + ?Sized> AuthService<'s, S> {
    /// Creates a signed-out service; call `restore_session` to pick up a
    /// persisted session.
    pub fn new(store: &'s S) -> Self {
        Self {
            store,
            session: None,
        }
    }

    /// Current session user.
    pub fn current_session(&self) -> Option<&User> {
        self.session.as_ref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.session.is_some()
    }

    /// Creates a credential record and signs the new user in.
    ///
    /// # Errors
    /// - `Validation` when a field is blank or the password is too short.
    /// - `DuplicateEmail` when the email is already registered.
    pub fn register(&mut self, username: &str, email: &str, password: &str) -> AuthResult<User> {
        let result = self.try_register(username, email, password);
        match &result {
            Ok(user) => info!(
                "event=auth_register module=auth status=ok user_id={}",
                user.id
            ),
            Err(err) => warn!(
                "event=auth_register module=auth status=rejected error_code={}",
                err.code()
            ),
        }
        result
    }

    fn try_register(&mut self, username: &str, email: &str, password: &str) -> AuthResult<User> {
        require_non_blank("username", username)?;
        require_non_blank("email", email)?;
        require_non_blank("password", password)?;
        if password.chars().count() < MIN_PASSWORD_CHARS {
            return Err(ValidationError::PasswordTooShort {
                min: MIN_PASSWORD_CHARS,
            }
            .into());
        }

        let mut records: Vec<CredentialRecord> =
            load_collection(self.store, StorageKey::USERS)?;
        if records.iter().any(|record| record.email == email) {
            return Err(AuthError::DuplicateEmail);
        }

        let record = CredentialRecord {
            id: new_record_id(),
            username: username.to_string(),
            email: email.to_string(),
            password: password.to_string(),
        };
        let user = record.to_user();
        records.push(record);
        save_collection(self.store, StorageKey::USERS, &records)?;

        if let Err(err) = self.establish(user.clone()) {
            // Undo the credential append so a retry is not a duplicate.
            records.pop();
            if let Err(rollback_err) = save_collection(self.store, StorageKey::USERS, &records) {
                error!(
                    "event=auth_register module=auth status=error error_code=rollback_failed error={}",
                    rollback_err
                );
            }
            return Err(err);
        }
        Ok(user)
    }

    /// Signs in with an exact email and password match.
    pub fn login(&mut self, email: &str, password: &str) -> AuthResult<User> {
        let result = self.try_login(email, password);
        match &result {
            Ok(user) => info!("event=auth_login module=auth status=ok user_id={}", user.id),
            Err(err) => warn!(
                "event=auth_login module=auth status=rejected error_code={}",
                err.code()
            ),
        }
        result
    }

    fn try_login(&mut self, email: &str, password: &str) -> AuthResult<User> {
        let records: Vec<CredentialRecord> = load_collection(self.store, StorageKey::USERS)?;
        let user = records
            .iter()
            .find(|record| record.matches(email, password))
            .map(CredentialRecord::to_user)
            .ok_or(AuthError::InvalidCredentials)?;

        self.establish(user.clone())?;
        Ok(user)
    }

    /// Clears the session. Always succeeds in memory; a failure to drop the
    /// persisted mirror is logged and otherwise ignored.
    pub fn logout(&mut self) {
        self.session = None;
        match self.store.remove(StorageKey::SESSION_USER) {
            Ok(()) => info!("event=auth_logout module=auth status=ok"),
            Err(err) => error!(
                "event=auth_logout module=auth status=error error_code=session_clear_failed error={}",
                err
            ),
        }
    }

    /// Re-establishes a persisted session at startup.
    ///
    /// Missing, undecodable or incomplete session records yield `None`.
    /// Only a record that is present but malformed is dropped from the store;
    /// a failed read leaves the persisted record alone.
    pub fn restore_session(&mut self) -> Option<User> {
        let raw = match self.store.get(StorageKey::SESSION_USER) {
            Ok(Some(raw)) => raw,
            Ok(None) => {
                info!("event=auth_restore module=auth status=ok session=none");
                return None;
            }
            Err(err) => {
                error!(
                    "event=auth_restore module=auth status=error error_code=session_read_failed error={}",
                    err
                );
                return None;
            }
        };

        match serde_json::from_str::<User>(&raw) {
            Ok(user) if !user.id.trim().is_empty() => {
                info!(
                    "event=auth_restore module=auth status=ok user_id={}",
                    user.id
                );
                self.session = Some(user.clone());
                Some(user)
            }
            _ => {
                warn!(
                    "event=auth_restore module=auth status=degraded error_code=malformed_session"
                );
                self.logout();
                None
            }
        }
    }

    fn establish(&mut self, user: User) -> AuthResult<()> {
        save_document(self.store, StorageKey::SESSION_USER, &user)?;
        self.session = Some(user);
        Ok(())
    }
}
