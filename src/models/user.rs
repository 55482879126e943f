use argon2::{
    Algorithm, Argon2, Params, Version,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use serde::Serialize;

use super::{ValidationError, require_text};
use crate::config::SecurityConfig;
use crate::entities::users;

pub const MAX_USERNAME_LEN: usize = 50;
pub const MAX_EMAIL_LEN: usize = 50;

/// User data without the password hash.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct User {
    pub id: i32,
    pub username: String,
    pub email: String,
    pub created_at: String,
}

impl From<users::Model> for User {
    fn from(model: users::Model) -> Self {
        Self {
            id: model.id,
            username: model.username,
            email: model.email,
            created_at: model.created_at,
        }
    }
}

pub fn validate_username(candidate: &str) -> Result<String, ValidationError> {
    require_text("Username", candidate, MAX_USERNAME_LEN).map(str::to_string)
}

/// Accepts any address containing '@'.
pub fn validate_email(candidate: &str) -> Result<String, ValidationError> {
    let email = require_text("Email", candidate, MAX_EMAIL_LEN)?;
    if !email.contains('@') {
        return Err(ValidationError::InvalidEmail);
    }
    Ok(email.to_string())
}

/// Checks the minimum length and returns the salted hash to store in place
/// of the password.
///
/// CPU-heavy: call from `spawn_blocking` inside async code.
pub fn validate_password(
    candidate: &str,
    security: &SecurityConfig,
) -> Result<String, ValidationError> {
    let min = security.min_password_length;
    if candidate.chars().count() < min {
        return Err(ValidationError::PasswordTooShort { min });
    }
    hash_password(candidate, security)
}

/// Hash a password using Argon2id with a fresh random salt.
pub fn hash_password(password: &str, security: &SecurityConfig) -> Result<String, ValidationError> {
    let salt = SaltString::generate(&mut OsRng);

    let params = Params::new(
        security.argon2_memory_cost_kib,
        security.argon2_time_cost,
        security.argon2_parallelism,
        None,
    )
    .map_err(|e| ValidationError::Hashing(format!("invalid Argon2 params: {e}")))?;

    Argon2::new(Algorithm::Argon2id, Version::V0x13, params)
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| ValidationError::Hashing(e.to_string()))
}

/// True iff `candidate` hashes to `stored_hash`. The parameters and salt are
/// read from the PHC string, so hashes made under older settings still
/// verify. A malformed hash never matches.
#[must_use]
pub fn verify_password(candidate: &str, stored_hash: &str) -> bool {
    let parsed = match PasswordHash::new(stored_hash) {
        Ok(parsed) => parsed,
        Err(e) => {
            tracing::warn!("Stored password hash is malformed: {e}");
            return false;
        }
    };

    Argon2::default()
        .verify_password(candidate.as_bytes(), &parsed)
        .is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cheap_security() -> SecurityConfig {
        SecurityConfig {
            argon2_memory_cost_kib: 1024,
            argon2_time_cost: 1,
            argon2_parallelism: 1,
            ..SecurityConfig::default()
        }
    }

    #[test]
    fn email_requires_at_sign() {
        assert_eq!(validate_email("a@b.com").unwrap(), "a@b.com");
        assert_eq!(validate_email("no-at-sign.com"), Err(ValidationError::InvalidEmail));
        assert_eq!(validate_email("plain"), Err(ValidationError::InvalidEmail));
        assert!(validate_email("").is_err());
    }

    #[test]
    fn email_length_is_bounded() {
        let long = format!("{}@example.com", "a".repeat(60));
        assert!(matches!(
            validate_email(&long),
            Err(ValidationError::TooLong { .. })
        ));
    }

    #[test]
    fn username_must_be_present() {
        assert_eq!(validate_username(" u1 ").unwrap(), "u1");
        assert!(validate_username("").is_err());
        assert!(validate_username(&"x".repeat(51)).is_err());
    }

    #[test]
    fn short_passwords_are_rejected() {
        let security = cheap_security();
        for candidate in ["", "a", "abcd", "1234"] {
            assert_eq!(
                validate_password(candidate, &security),
                Err(ValidationError::PasswordTooShort { min: 5 })
            );
        }
    }

    #[test]
    fn password_is_stored_as_hash() {
        let security = cheap_security();
        let hash = validate_password("pass1", &security).unwrap();
        assert_ne!(hash, "pass1");
        assert!(hash.starts_with("$argon2id$"));
        assert!(verify_password("pass1", &hash));
    }

    #[test]
    fn wrong_password_does_not_verify() {
        let security = cheap_security();
        let hash = hash_password("correct horse", &security).unwrap();
        assert!(!verify_password("correct hors", &hash));
        assert!(!verify_password("Correct horse", &hash));
        assert!(!verify_password("", &hash));
    }

    #[test]
    fn same_password_gets_different_salts() {
        let security = cheap_security();
        let first = hash_password("pass1", &security).unwrap();
        let second = hash_password("pass1", &security).unwrap();
        assert_ne!(first, second);
        assert!(verify_password("pass1", &first));
        assert!(verify_password("pass1", &second));
    }

    #[test]
    fn malformed_hash_never_matches() {
        assert!(!verify_password("pass1", "not-a-hash"));
        assert!(!verify_password("pass1", ""));
    }
}
