use std::error::Error;
use std::fmt;

use habit_core::db::DbError;
use habit_core::{AuthError, BehaviorError, LoggingError, StoreError, ValidationError};

#[derive(Debug)]
pub enum CliError {
    Db(DbError),
    Store(StoreError),
    Auth(AuthError),
    Behavior(BehaviorError),
    Validation(ValidationError),
    Logging(LoggingError),
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::Db(err) => write!(f, "database error: {err}"),
            CliError::Store(err) => write!(f, "{err}"),
            CliError::Auth(err) => write!(f, "{err}"),
            CliError::Behavior(err) => write!(f, "{err}"),
            CliError::Validation(err) => write!(f, "invalid input: {err}"),
            CliError::Logging(err) => write!(f, "logging setup failed: {err}"),
        }
    }
}

impl Error for CliError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            CliError::Db(err) => Some(err),
            CliError::Store(err) => Some(err),
            CliError::Auth(err) => Some(err),
            CliError::Behavior(err) => Some(err),
            CliError::Validation(err) => Some(err),
            CliError::Logging(err) => Some(err),
        }
    }
}

impl From<DbError> for CliError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<StoreError> for CliError {
    fn from(value: StoreError) -> Self {
        Self::Store(value)
    }
}

impl From<AuthError> for CliError {
    fn from(value: AuthError) -> Self {
        Self::Auth(value)
    }
}

impl From<BehaviorError> for CliError {
    fn from(value: BehaviorError) -> Self {
        Self::Behavior(value)
    }
}

impl From<LoggingError> for CliError {
    fn from(value: LoggingError) -> Self {
        Self::Logging(value)
    }
}

impl From<ValidationError> for CliError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
    }
}
