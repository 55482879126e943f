//! Domain records and the validation/derivation rules that apply to them.

pub mod comment;
pub mod post;
pub mod user;

use chrono::{SecondsFormat, Utc};
use thiserror::Error;

pub use comment::Comment;
pub use post::{Post, PostDetail};
pub use user::User;

/// Rejected input for a user, post or comment field.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Email address must contain '@'")]
    InvalidEmail,

    #[error("Password must be at least {min} characters")]
    PasswordTooShort { min: usize },

    #[error("{field} cannot be empty")]
    Empty { field: &'static str },

    #[error("{field} must be {max} characters or less")]
    TooLong { field: &'static str, max: usize },

    #[error("Failed to hash password: {0}")]
    Hashing(String),
}

/// Checks that `value` is non-blank and at most `max` characters, returning
/// it trimmed.
pub fn require_text<'a>(
    field: &'static str,
    value: &'a str,
    max: usize,
) -> Result<&'a str, ValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::Empty { field });
    }
    if trimmed.chars().count() > max {
        return Err(ValidationError::TooLong { field, max });
    }
    Ok(trimmed)
}

/// Current UTC time as stored in `created_at` / `updated_at`.
///
/// Fixed-width microsecond RFC 3339, so ordering the text column orders by
/// time.
#[must_use]
pub fn now_timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn require_text_trims_and_bounds() {
        assert_eq!(require_text("Title", "  hello ", 10), Ok("hello"));
        assert_eq!(
            require_text("Title", "   ", 10),
            Err(ValidationError::Empty { field: "Title" })
        );
        assert_eq!(
            require_text("Title", "abcdef", 5),
            Err(ValidationError::TooLong {
                field: "Title",
                max: 5
            })
        );
    }

    #[test]
    fn require_text_counts_characters_not_bytes() {
        assert!(require_text("Title", "ééééé", 5).is_ok());
    }

    #[test]
    fn timestamps_have_fixed_width() {
        let a = now_timestamp();
        let b = now_timestamp();
        assert_eq!(a.len(), b.len());
        assert!(a.ends_with('Z'));
        assert!(a <= b);
    }
}
