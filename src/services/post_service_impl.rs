//! `SeaORM` implementation of the `PostService` trait.

use async_trait::async_trait;
use tracing::info;

use crate::db::Store;
use crate::db::repositories::post::PostWithAuthor;
use crate::db::repositories::{CommentRepository, PostRepository, VoteRepository};
use crate::models::comment::validate_comment_text;
use crate::models::post::{validate_post_url, validate_title};
use crate::models::{Comment, Post, PostDetail};
use crate::services::post_service::{PostError, PostService};

pub struct SeaOrmPostService {
    store: Store,
}

impl SeaOrmPostService {
    #[must_use]
    pub const fn new(store: Store) -> Self {
        Self { store }
    }

    async fn with_counts(&self, rows: Vec<PostWithAuthor>) -> Result<Vec<Post>, PostError> {
        let ids: Vec<i32> = rows.iter().map(|(post, _)| post.id).collect();
        let votes = VoteRepository::new(&self.store.conn)
            .counts_for_posts(&ids)
            .await?;
        let comments = CommentRepository::new(&self.store.conn)
            .counts_for_posts(&ids)
            .await?;

        Ok(rows
            .into_iter()
            .map(|(post, author)| {
                let vote_count = votes.get(&post.id).copied().unwrap_or(0);
                let comment_count = comments.get(&post.id).copied().unwrap_or(0);
                Post::from_row(post, author, vote_count, comment_count)
            })
            .collect())
    }
}

/// A mutation keyed on the primary key touches exactly one row; anything
/// else means the post is missing or not owned by the caller.
const fn exactly_one(rows_affected: u64, id: i32) -> Result<(), PostError> {
    if rows_affected == 1 {
        Ok(())
    } else {
        Err(PostError::NotFound(id))
    }
}

fn to_i64(count: u64) -> i64 {
    i64::try_from(count).unwrap_or(i64::MAX)
}

#[async_trait]
impl PostService for SeaOrmPostService {
    async fn create_post(
        &self,
        title: &str,
        post_url: &str,
        owner_id: i32,
    ) -> Result<i32, PostError> {
        let title = validate_title(title)?;
        let post_url = validate_post_url(post_url)?;

        let mut db = self.store.session();
        let post = PostRepository::new(db.handle().await?)
            .insert(title, post_url, owner_id)
            .await?;
        db.commit().await?;

        info!(post_id = post.id, user_id = owner_id, "Created post");
        Ok(post.id)
    }

    async fn update_post(&self, id: i32, owner_id: i32, title: &str) -> Result<(), PostError> {
        let title = validate_title(title)?;

        let mut db = self.store.session();
        let changed = PostRepository::new(db.handle().await?)
            .update_owned_title(id, owner_id, title)
            .await?;
        exactly_one(changed, id)?;
        db.commit().await?;

        info!(post_id = id, user_id = owner_id, "Updated post");
        Ok(())
    }

    async fn delete_post(&self, id: i32, owner_id: i32) -> Result<(), PostError> {
        let mut db = self.store.session();
        let removed = PostRepository::new(db.handle().await?)
            .delete_owned_with_dependents(id, owner_id)
            .await?;
        exactly_one(removed, id)?;
        db.commit().await?;

        info!(post_id = id, user_id = owner_id, "Deleted post with its comments and votes");
        Ok(())
    }

    async fn create_comment(
        &self,
        comment_text: &str,
        post_id: i32,
        author_id: i32,
    ) -> Result<i32, PostError> {
        let comment_text = validate_comment_text(comment_text)?;

        let mut db = self.store.session();
        let comment = CommentRepository::new(db.handle().await?)
            .insert(comment_text, post_id, author_id)
            .await?;
        db.commit().await?;

        info!(comment_id = comment.id, post_id, user_id = author_id, "Created comment");
        Ok(comment.id)
    }

    async fn upvote(&self, post_id: i32, voter_id: i32) -> Result<i32, PostError> {
        let mut db = self.store.session();
        let vote = VoteRepository::new(db.handle().await?)
            .insert(post_id, voter_id)
            .await?;
        db.commit().await?;

        info!(post_id, user_id = voter_id, "Recorded upvote");
        Ok(vote.id)
    }

    async fn vote_count(&self, post_id: i32) -> Result<i64, PostError> {
        let count = VoteRepository::new(&self.store.conn)
            .count_for_post(post_id)
            .await?;
        Ok(to_i64(count))
    }

    async fn list_posts(&self) -> Result<Vec<Post>, PostError> {
        let rows = PostRepository::new(&self.store.conn).list(None).await?;
        self.with_counts(rows).await
    }

    async fn list_posts_by_user(&self, user_id: i32) -> Result<Vec<Post>, PostError> {
        let rows = PostRepository::new(&self.store.conn)
            .list(Some(user_id))
            .await?;
        self.with_counts(rows).await
    }

    async fn get_post(&self, id: i32) -> Result<PostDetail, PostError> {
        let (post, author) = PostRepository::new(&self.store.conn)
            .get(id)
            .await?
            .ok_or(PostError::NotFound(id))?;

        let vote_count = self.vote_count(id).await?;
        let comments = self.list_comments(id).await?;
        let comment_count = i64::try_from(comments.len()).unwrap_or(i64::MAX);

        Ok(PostDetail {
            post: Post::from_row(post, author, vote_count, comment_count),
            comments,
        })
    }

    async fn list_comments(&self, post_id: i32) -> Result<Vec<Comment>, PostError> {
        let rows = CommentRepository::new(&self.store.conn)
            .list_for_post(post_id)
            .await?;

        Ok(rows
            .into_iter()
            .map(|(comment, author)| Comment::from_row(comment, author))
            .collect())
    }
}
