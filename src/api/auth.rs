//! Session handling and the access gate for protected routes.
//!
//! A logged-in session holds two keys: `user_id` and `logged_in`. Signup and
//! login replace whatever the session held before; logout wipes it.

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use std::sync::Arc;
use tower_sessions::Session;

use super::{ApiError, AppState};

pub const USER_ID_KEY: &str = "user_id";
pub const LOGGED_IN_KEY: &str = "logged_in";

/// The authenticated caller, placed in request extensions by
/// [`require_session`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Identity {
    pub user_id: i32,
}

/// Runs the wrapped handler only for a logged-in session. Anyone else is
/// redirected to the configured login path and the handler never runs.
pub async fn require_session(
    State(state): State<Arc<AppState>>,
    session: Session,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let Some(identity) = current_identity(&session).await? else {
        tracing::info!(
            method = %request.method(),
            uri = %request.uri(),
            "No active session, redirecting to login"
        );
        return Ok(Redirect::to(&state.config().server.login_path).into_response());
    };

    tracing::Span::current().record("user_id", identity.user_id);
    tracing::debug!(
        user_id = identity.user_id,
        method = %request.method(),
        uri = %request.uri(),
        "Session accepted"
    );

    request.extensions_mut().insert(identity);
    Ok(next.run(request).await)
}

/// The session's identity, if it is flagged as logged in and carries a user
/// id.
pub async fn current_identity(session: &Session) -> Result<Option<Identity>, ApiError> {
    let logged_in = session
        .get::<bool>(LOGGED_IN_KEY)
        .await
        .map_err(|e| ApiError::internal(format!("Session error: {e}")))?
        .unwrap_or(false);

    if !logged_in {
        return Ok(None);
    }

    let user_id = session
        .get::<i32>(USER_ID_KEY)
        .await
        .map_err(|e| ApiError::internal(format!("Session error: {e}")))?;

    Ok(user_id.map(|user_id| Identity { user_id }))
}

/// Drops any previous session state and logs `user_id` in under a fresh
/// session id.
pub async fn establish_session(session: &Session, user_id: i32) -> Result<(), ApiError> {
    session.clear().await;
    session
        .cycle_id()
        .await
        .map_err(|e| ApiError::internal(format!("Failed to rotate session: {e}")))?;
    session
        .insert(USER_ID_KEY, user_id)
        .await
        .map_err(|e| ApiError::internal(format!("Failed to create session: {e}")))?;
    session
        .insert(LOGGED_IN_KEY, true)
        .await
        .map_err(|e| ApiError::internal(format!("Failed to create session: {e}")))?;
    Ok(())
}

/// Removes all session state. Safe to call on an empty session.
pub async fn end_session(session: &Session) {
    if let Err(e) = session.flush().await {
        tracing::warn!("Failed to flush session: {e}");
    }
}
