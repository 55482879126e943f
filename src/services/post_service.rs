//! Domain service for posts and the comments and votes attached to them.
//!
//! Every mutation runs in its own transaction and is attributed to the
//! caller's session identity, never to an id supplied by the client.

use thiserror::Error;

use crate::models::{Comment, Post, PostDetail, ValidationError};

/// Errors specific to post, comment and vote operations.
#[derive(Debug, Error)]
pub enum PostError {
    #[error("Post not found: {0}")]
    NotFound(i32),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Database error: {0}")]
    Database(String),
}

impl From<sea_orm::DbErr> for PostError {
    fn from(err: sea_orm::DbErr) -> Self {
        Self::Database(err.to_string())
    }
}

/// Domain service trait for posts.
#[async_trait::async_trait]
pub trait PostService: Send + Sync {
    async fn create_post(&self, title: &str, post_url: &str, owner_id: i32)
    -> Result<i32, PostError>;

    /// Renames a post owned by `owner_id`.
    ///
    /// # Errors
    ///
    /// Returns [`PostError::NotFound`] unless exactly one post with this id
    /// belongs to the owner.
    async fn update_post(&self, id: i32, owner_id: i32, title: &str) -> Result<(), PostError>;

    /// Deletes a post owned by `owner_id` along with its comments and votes.
    ///
    /// # Errors
    ///
    /// Returns [`PostError::NotFound`] unless exactly one post with this id
    /// belongs to the owner.
    async fn delete_post(&self, id: i32, owner_id: i32) -> Result<(), PostError>;

    async fn create_comment(
        &self,
        comment_text: &str,
        post_id: i32,
        author_id: i32,
    ) -> Result<i32, PostError>;

    /// Records one upvote. Repeat votes by the same user are kept.
    async fn upvote(&self, post_id: i32, voter_id: i32) -> Result<i32, PostError>;

    /// Number of vote rows for the post, counted now.
    async fn vote_count(&self, post_id: i32) -> Result<i64, PostError>;

    /// All posts, newest first.
    async fn list_posts(&self) -> Result<Vec<Post>, PostError>;

    /// Posts owned by one user, newest first.
    async fn list_posts_by_user(&self, user_id: i32) -> Result<Vec<Post>, PostError>;

    async fn get_post(&self, id: i32) -> Result<PostDetail, PostError>;

    /// Comments on a post, oldest first. Empty for unknown posts.
    async fn list_comments(&self, post_id: i32) -> Result<Vec<Comment>, PostError>;
}
