use axum::{Extension, Json, extract::State};
use serde::Deserialize;
use std::sync::Arc;

use super::auth::Identity;
use super::{ApiError, AppState, IdResponse};

#[derive(Deserialize)]
pub struct CreateCommentRequest {
    pub comment_text: String,
    pub post_id: i32,
}

/// POST /comments
/// The author is always the session user.
pub async fn create_comment(
    State(state): State<Arc<AppState>>,
    Extension(identity): Extension<Identity>,
    Json(payload): Json<CreateCommentRequest>,
) -> Result<Json<IdResponse>, ApiError> {
    let id = state
        .post_service()
        .create_comment(&payload.comment_text, payload.post_id, identity.user_id)
        .await
        .map_err(|e| ApiError::failed("Comment failed", e))?;

    Ok(Json(IdResponse { id }))
}
