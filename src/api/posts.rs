use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde::Deserialize;
use std::sync::Arc;

use super::auth::Identity;
use super::{ApiError, AppState, IdResponse};
use crate::models::{Comment, Post, PostDetail};

#[derive(Deserialize)]
pub struct CreatePostRequest {
    pub title: String,
    pub post_url: String,
}

#[derive(Deserialize)]
pub struct UpdatePostRequest {
    pub title: String,
}

#[derive(Deserialize)]
pub struct UpvoteRequest {
    pub post_id: i32,
}

/// GET /posts
pub async fn list_posts(State(state): State<Arc<AppState>>) -> Result<Json<Vec<Post>>, ApiError> {
    let posts = state
        .post_service()
        .list_posts()
        .await
        .map_err(|e| ApiError::internal(e.to_string()))?;

    Ok(Json(posts))
}

/// GET /posts/{id}
pub async fn get_post(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> Result<Json<PostDetail>, ApiError> {
    let post = state
        .post_service()
        .get_post(id)
        .await
        .map_err(|e| ApiError::from_post_error(e, "Failed to load post"))?;

    Ok(Json(post))
}

/// GET /posts/{id}/comments
pub async fn list_comments(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> Result<Json<Vec<Comment>>, ApiError> {
    let comments = state
        .post_service()
        .list_comments(id)
        .await
        .map_err(|e| ApiError::internal(e.to_string()))?;

    Ok(Json(comments))
}

/// GET /dashboard/posts
/// The caller's own posts.
pub async fn dashboard_posts(
    State(state): State<Arc<AppState>>,
    Extension(identity): Extension<Identity>,
) -> Result<Json<Vec<Post>>, ApiError> {
    let posts = state
        .post_service()
        .list_posts_by_user(identity.user_id)
        .await
        .map_err(|e| ApiError::internal(e.to_string()))?;

    Ok(Json(posts))
}

/// POST /posts
pub async fn create_post(
    State(state): State<Arc<AppState>>,
    Extension(identity): Extension<Identity>,
    Json(payload): Json<CreatePostRequest>,
) -> Result<Json<IdResponse>, ApiError> {
    let id = state
        .post_service()
        .create_post(&payload.title, &payload.post_url, identity.user_id)
        .await
        .map_err(|e| ApiError::failed("Post failed", e))?;

    Ok(Json(IdResponse { id }))
}

/// PUT /posts/{id}
pub async fn update_post(
    State(state): State<Arc<AppState>>,
    Extension(identity): Extension<Identity>,
    Path(id): Path<i32>,
    Json(payload): Json<UpdatePostRequest>,
) -> Result<StatusCode, ApiError> {
    state
        .post_service()
        .update_post(id, identity.user_id, &payload.title)
        .await
        .map_err(|e| ApiError::from_post_error(e, "Post not updated"))?;

    Ok(StatusCode::NO_CONTENT)
}

/// DELETE /posts/{id}
pub async fn delete_post(
    State(state): State<Arc<AppState>>,
    Extension(identity): Extension<Identity>,
    Path(id): Path<i32>,
) -> Result<StatusCode, ApiError> {
    state
        .post_service()
        .delete_post(id, identity.user_id)
        .await
        .map_err(|e| ApiError::from_post_error(e, "Post not deleted"))?;

    Ok(StatusCode::NO_CONTENT)
}

/// PUT /posts/upvote
pub async fn upvote(
    State(state): State<Arc<AppState>>,
    Extension(identity): Extension<Identity>,
    Json(payload): Json<UpvoteRequest>,
) -> Result<StatusCode, ApiError> {
    state
        .post_service()
        .upvote(payload.post_id, identity.user_id)
        .await
        .map_err(|e| ApiError::failed("Upvote failed", e))?;

    Ok(StatusCode::NO_CONTENT)
}
