use serde::Serialize;

use super::{Comment, ValidationError, require_text};
use crate::entities::{posts, users};

pub const MAX_TITLE_LEN: usize = 100;
pub const MAX_URL_LEN: usize = 100;

/// A post as read back from the database, with its derived counts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Post {
    pub id: i32,
    pub title: String,
    pub post_url: String,
    pub domain: String,
    pub user_id: i32,
    pub username: Option<String>,
    pub created_at: String,
    pub updated_at: String,
    pub vote_count: i64,
    pub comment_count: i64,
}

impl Post {
    #[must_use]
    pub fn from_row(
        post: posts::Model,
        author: Option<users::Model>,
        vote_count: i64,
        comment_count: i64,
    ) -> Self {
        Self {
            id: post.id,
            domain: format_url(&post.post_url),
            title: post.title,
            post_url: post.post_url,
            user_id: post.user_id,
            username: author.map(|u| u.username),
            created_at: post.created_at,
            updated_at: post.updated_at,
            vote_count,
            comment_count,
        }
    }
}

/// Single-post view: the post plus its comments, oldest first.
#[derive(Debug, Clone, Serialize)]
pub struct PostDetail {
    #[serde(flatten)]
    pub post: Post,
    pub comments: Vec<Comment>,
}

pub fn validate_title(candidate: &str) -> Result<String, ValidationError> {
    require_text("Title", candidate, MAX_TITLE_LEN).map(str::to_string)
}

pub fn validate_post_url(candidate: &str) -> Result<String, ValidationError> {
    require_text("Post URL", candidate, MAX_URL_LEN).map(str::to_string)
}

/// Reduces a link to the bare host shown next to a post title:
/// `https://www.example.com/a?b` becomes `example.com`.
#[must_use]
pub fn format_url(url: &str) -> String {
    let stripped = url
        .replace("http://", "")
        .replace("https://", "")
        .replace("www.", "");

    stripped
        .split('/')
        .next()
        .and_then(|s| s.split('?').next())
        .unwrap_or_default()
        .to_string()
}
