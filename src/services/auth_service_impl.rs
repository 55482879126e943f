//! `SeaORM` implementation of the `AuthService` trait.

use async_trait::async_trait;
use tokio::task;
use tracing::{debug, info};

use crate::config::SecurityConfig;
use crate::db::Store;
use crate::db::repositories::UserRepository;
use crate::models::User;
use crate::models::user::{validate_email, validate_password, validate_username, verify_password};
use crate::services::auth_service::{AuthError, AuthService};

pub struct SeaOrmAuthService {
    store: Store,
    security: SecurityConfig,
}

impl SeaOrmAuthService {
    #[must_use]
    pub const fn new(store: Store, security: SecurityConfig) -> Self {
        Self { store, security }
    }
}

#[async_trait]
impl AuthService for SeaOrmAuthService {
    async fn create_user(
        &self,
        username: &str,
        email: &str,
        password: &str,
    ) -> Result<i32, AuthError> {
        let username = validate_username(username)?;
        let email = validate_email(email)?;

        // Argon2 is CPU-bound; keep it off the async workers.
        let password = password.to_string();
        let security = self.security.clone();
        let password_hash = task::spawn_blocking(move || validate_password(&password, &security))
            .await
            .map_err(|e| AuthError::Internal(format!("Password hashing task failed: {e}")))??;

        let mut db = self.store.session();
        let user = UserRepository::new(db.handle().await?)
            .insert(username, email, password_hash)
            .await?;
        db.commit().await?;

        info!(user_id = user.id, "Created user {}", user.username);
        Ok(user.id)
    }

    async fn login(&self, email: &str, password: &str) -> Result<i32, AuthError> {
        let matches = UserRepository::new(&self.store.conn)
            .find_by_email(email.trim(), 2)
            .await?;

        let [user] = matches.as_slice() else {
            debug!(matches = matches.len(), "Login rejected: email does not match exactly one user");
            return Err(AuthError::InvalidCredentials);
        };

        let user_id = user.id;
        let stored_hash = user.password_hash.clone();
        let password = password.to_string();
        let is_valid = task::spawn_blocking(move || verify_password(&password, &stored_hash))
            .await
            .map_err(|e| AuthError::Internal(format!("Password verification task failed: {e}")))?;

        if !is_valid {
            debug!(user_id, "Login rejected: password mismatch");
            return Err(AuthError::InvalidCredentials);
        }

        info!(user_id, "User logged in");
        Ok(user_id)
    }

    async fn get_user(&self, id: i32) -> Result<User, AuthError> {
        UserRepository::new(&self.store.conn)
            .get_by_id(id)
            .await?
            .ok_or(AuthError::UserNotFound(id))
    }
}
