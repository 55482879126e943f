//! Domain service for accounts and credentials.
//!
//! Handles signup and login. Session state itself lives in the HTTP layer;
//! this service only decides who the caller is.

use thiserror::Error;

use crate::models::{User, ValidationError};

/// Errors specific to authentication operations.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Unknown email and wrong password both end up here.
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("User not found: {0}")]
    UserNotFound(i32),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<sea_orm::DbErr> for AuthError {
    fn from(err: sea_orm::DbErr) -> Self {
        Self::Database(err.to_string())
    }
}

/// Domain service trait for authentication.
#[async_trait::async_trait]
pub trait AuthService: Send + Sync {
    /// Validates and stores a new user, returning its id.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::Validation`] for a malformed username, email or
    /// password and [`AuthError::Database`] when the insert fails (for
    /// example a duplicate email).
    async fn create_user(
        &self,
        username: &str,
        email: &str,
        password: &str,
    ) -> Result<i32, AuthError>;

    /// Checks credentials and returns the user id.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::InvalidCredentials`] unless exactly one user has
    /// this email and the password matches.
    async fn login(&self, email: &str, password: &str) -> Result<i32, AuthError>;

    /// The account behind a session.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::UserNotFound`] when no user has this id.
    async fn get_user(&self, id: i32) -> Result<User, AuthError>;
}
