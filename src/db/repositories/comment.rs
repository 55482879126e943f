use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DbErr, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, Set,
};
use std::collections::HashMap;

use crate::entities::{comments, users};
use crate::models::now_timestamp;

pub struct CommentRepository<'a, C> {
    conn: &'a C,
}

impl<'a, C: ConnectionTrait> CommentRepository<'a, C> {
    #[must_use]
    pub const fn new(conn: &'a C) -> Self {
        Self { conn }
    }

    pub async fn insert(
        &self,
        comment_text: String,
        post_id: i32,
        user_id: i32,
    ) -> Result<comments::Model, DbErr> {
        let now = now_timestamp();

        comments::ActiveModel {
            comment_text: Set(comment_text),
            post_id: Set(post_id),
            user_id: Set(user_id),
            created_at: Set(now.clone()),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(self.conn)
        .await
    }

    /// Comments on a post with their authors, oldest first.
    pub async fn list_for_post(
        &self,
        post_id: i32,
    ) -> Result<Vec<(comments::Model, Option<users::Model>)>, DbErr> {
        comments::Entity::find()
            .filter(comments::Column::PostId.eq(post_id))
            .order_by_asc(comments::Column::CreatedAt)
            .order_by_asc(comments::Column::Id)
            .find_also_related(users::Entity)
            .all(self.conn)
            .await
    }

    pub async fn count_for_post(&self, post_id: i32) -> Result<u64, DbErr> {
        comments::Entity::find()
            .filter(comments::Column::PostId.eq(post_id))
            .count(self.conn)
            .await
    }

    /// Comment counts keyed by post id. Posts without comments are absent.
    pub async fn counts_for_posts(&self, post_ids: &[i32]) -> Result<HashMap<i32, i64>, DbErr> {
        if post_ids.is_empty() {
            return Ok(HashMap::new());
        }

        let rows: Vec<(i32, i64)> = comments::Entity::find()
            .select_only()
            .column(comments::Column::PostId)
            .column_as(comments::Column::Id.count(), "comment_count")
            .filter(comments::Column::PostId.is_in(post_ids.iter().copied()))
            .group_by(comments::Column::PostId)
            .into_tuple()
            .all(self.conn)
            .await?;

        Ok(rows.into_iter().collect())
    }
}
