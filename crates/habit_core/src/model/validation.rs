//! Input validation failures shared by the auth and behavior use-cases.

use std::error::Error;
use std::fmt::{Display, Formatter};

/// Minimum accepted password length, in characters.
pub const MIN_PASSWORD_CHARS: usize = 6;

/// Rejected user input. Never carries secret values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Behavior title is empty after trimming.
    EmptyTitle,
    /// Improvement item text is empty after trimming.
    EmptyItemText,
    /// A required registration field is empty after trimming.
    EmptyField(&'static str),
    /// Password shorter than the accepted minimum.
    PasswordTooShort { min: usize },
    /// Color name outside the behavior palette.
    UnknownColor(String),
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyTitle => write!(f, "title is required"),
            Self::EmptyItemText => write!(f, "item text is required"),
            Self::EmptyField(field) => write!(f, "{field} is required"),
            Self::PasswordTooShort { min } => {
                write!(f, "password must be at least {min} characters")
            }
            Self::UnknownColor(value) => write!(f, "unknown behavior color `{value}`"),
        }
    }
}

impl Error for ValidationError {}

/// Fails with `EmptyField(field)` when `value` is blank.
pub(crate) fn require_non_blank(field: &'static str, value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::EmptyField(field));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{require_non_blank, ValidationError};

    #[test]
    fn blank_values_are_rejected_with_field_name() {
        assert_eq!(
            require_non_blank("email", " \t "),
            Err(ValidationError::EmptyField("email"))
        );
        assert!(require_non_blank("email", "a@x.com").is_ok());
    }

    #[test]
    fn display_is_human_readable() {
        assert_eq!(
            ValidationError::PasswordTooShort { min: 6 }.to_string(),
            "password must be at least 6 characters"
        );
        assert_eq!(ValidationError::EmptyField("username").to_string(), "username is required");
    }
}
