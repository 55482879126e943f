use serde::Serialize;

use super::{ValidationError, require_text};
use crate::entities::{comments, users};

pub const MAX_COMMENT_LEN: usize = 255;

/// A comment together with its author's name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Comment {
    pub id: i32,
    pub comment_text: String,
    pub post_id: i32,
    pub user_id: i32,
    pub username: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl Comment {
    #[must_use]
    pub fn from_row(comment: comments::Model, author: Option<users::Model>) -> Self {
        Self {
            id: comment.id,
            comment_text: comment.comment_text,
            post_id: comment.post_id,
            user_id: comment.user_id,
            username: author.map(|u| u.username),
            created_at: comment.created_at,
            updated_at: comment.updated_at,
        }
    }
}

pub fn validate_comment_text(candidate: &str) -> Result<String, ValidationError> {
    require_text("Comment", candidate, MAX_COMMENT_LEN).map(str::to_string)
}
