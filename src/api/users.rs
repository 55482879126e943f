use axum::{Extension, Json, extract::State, http::StatusCode, response::IntoResponse};
use serde::Deserialize;
use std::sync::Arc;
use tower_sessions::Session;

use super::auth::{Identity, end_session, establish_session};
use super::{ApiError, AppState, IdResponse};
use crate::models::User;
use crate::services::AuthError;

#[derive(Deserialize)]
pub struct SignupRequest {
    pub username: String,
    pub email: String,
    pub password: String,
}

#[derive(Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// POST /users
/// Create an account and log it in.
pub async fn signup(
    State(state): State<Arc<AppState>>,
    session: Session,
    Json(payload): Json<SignupRequest>,
) -> Result<Json<IdResponse>, ApiError> {
    let id = state
        .auth_service()
        .create_user(&payload.username, &payload.email, &payload.password)
        .await
        .map_err(|e| ApiError::failed("Signup failed", e))?;

    establish_session(&session, id).await?;

    Ok(Json(IdResponse { id }))
}

/// POST /users/login
pub async fn login(
    State(state): State<Arc<AppState>>,
    session: Session,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<IdResponse>, ApiError> {
    let id = state
        .auth_service()
        .login(&payload.email, &payload.password)
        .await
        .map_err(|e| match e {
            AuthError::InvalidCredentials => ApiError::InvalidCredentials,
            other => ApiError::internal(format!("Authentication error: {other}")),
        })?;

    establish_session(&session, id).await?;

    Ok(Json(IdResponse { id }))
}

/// POST /users/logout
pub async fn logout(session: Session) -> impl IntoResponse {
    end_session(&session).await;
    StatusCode::NO_CONTENT
}

/// GET /users/me
/// The session user's account, without the password hash.
pub async fn me(
    State(state): State<Arc<AppState>>,
    Extension(identity): Extension<Identity>,
) -> Result<Json<User>, ApiError> {
    let user = state
        .auth_service()
        .get_user(identity.user_id)
        .await
        .map_err(|e| match e {
            AuthError::UserNotFound(id) => ApiError::not_found("User", id),
            other => ApiError::internal(other.to_string()),
        })?;

    Ok(Json(user))
}
