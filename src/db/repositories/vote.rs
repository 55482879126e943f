use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DbErr, EntityTrait, PaginatorTrait,
    QueryFilter, QuerySelect, Set,
};
use std::collections::HashMap;

use crate::entities::votes;

/// Vote rows. A post's vote count is always counted here at read time.
pub struct VoteRepository<'a, C> {
    conn: &'a C,
}

impl<'a, C: ConnectionTrait> VoteRepository<'a, C> {
    #[must_use]
    pub const fn new(conn: &'a C) -> Self {
        Self { conn }
    }

    pub async fn insert(&self, post_id: i32, user_id: i32) -> Result<votes::Model, DbErr> {
        votes::ActiveModel {
            post_id: Set(post_id),
            user_id: Set(user_id),
            ..Default::default()
        }
        .insert(self.conn)
        .await
    }

    pub async fn count_for_post(&self, post_id: i32) -> Result<u64, DbErr> {
        votes::Entity::find()
            .filter(votes::Column::PostId.eq(post_id))
            .count(self.conn)
            .await
    }

    /// Vote counts keyed by post id, in one grouped query. Posts without
    /// votes are absent.
    pub async fn counts_for_posts(&self, post_ids: &[i32]) -> Result<HashMap<i32, i64>, DbErr> {
        if post_ids.is_empty() {
            return Ok(HashMap::new());
        }

        let rows: Vec<(i32, i64)> = votes::Entity::find()
            .select_only()
            .column(votes::Column::PostId)
            .column_as(votes::Column::Id.count(), "vote_count")
            .filter(votes::Column::PostId.is_in(post_ids.iter().copied()))
            .group_by(votes::Column::PostId)
            .into_tuple()
            .all(self.conn)
            .await?;

        Ok(rows.into_iter().collect())
    }
}
