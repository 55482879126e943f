use sea_orm::sea_query::{Expr, SelectStatement};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DbErr, EntityTrait, QueryFilter, QueryOrder,
    QuerySelect, QueryTrait, Set,
};

use crate::entities::{comments, posts, users, votes};
use crate::models::now_timestamp;

pub type PostWithAuthor = (posts::Model, Option<users::Model>);

pub struct PostRepository<'a, C> {
    conn: &'a C,
}

impl<'a, C: ConnectionTrait> PostRepository<'a, C> {
    #[must_use]
    pub const fn new(conn: &'a C) -> Self {
        Self { conn }
    }

    pub async fn insert(
        &self,
        title: String,
        post_url: String,
        user_id: i32,
    ) -> Result<posts::Model, DbErr> {
        let now = now_timestamp();

        posts::ActiveModel {
            title: Set(title),
            post_url: Set(post_url),
            user_id: Set(user_id),
            created_at: Set(now.clone()),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(self.conn)
        .await
    }

    pub async fn get(&self, id: i32) -> Result<Option<PostWithAuthor>, DbErr> {
        posts::Entity::find_by_id(id)
            .find_also_related(users::Entity)
            .one(self.conn)
            .await
    }

    /// Newest first, optionally restricted to one owner. Unbounded.
    pub async fn list(&self, owner: Option<i32>) -> Result<Vec<PostWithAuthor>, DbErr> {
        let mut query = posts::Entity::find();
        if let Some(user_id) = owner {
            query = query.filter(posts::Column::UserId.eq(user_id));
        }

        query
            .order_by_desc(posts::Column::CreatedAt)
            .order_by_desc(posts::Column::Id)
            .find_also_related(users::Entity)
            .all(self.conn)
            .await
    }

    /// Renames the post if `user_id` owns it. Returns the number of rows
    /// changed, so 0 means missing or not owned.
    ///
    /// Ownership is filtered in the UPDATE itself, so this is the
    /// transaction's first statement and takes the write lock up front.
    pub async fn update_owned_title(
        &self,
        id: i32,
        user_id: i32,
        title: String,
    ) -> Result<u64, DbErr> {
        let result = posts::Entity::update_many()
            .col_expr(posts::Column::Title, Expr::value(title))
            .col_expr(posts::Column::UpdatedAt, Expr::value(now_timestamp()))
            .filter(posts::Column::Id.eq(id))
            .filter(posts::Column::UserId.eq(user_id))
            .exec(self.conn)
            .await?;
        Ok(result.rows_affected)
    }

    /// Deletes the post's comments and votes, then the post, all restricted
    /// to a post `user_id` owns. Returns the number of posts removed. Run
    /// inside a transaction so the three deletes land together.
    pub async fn delete_owned_with_dependents(&self, id: i32, user_id: i32) -> Result<u64, DbErr> {
        comments::Entity::delete_many()
            .filter(comments::Column::PostId.in_subquery(owned_post_ids(id, user_id)))
            .exec(self.conn)
            .await?;

        votes::Entity::delete_many()
            .filter(votes::Column::PostId.in_subquery(owned_post_ids(id, user_id)))
            .exec(self.conn)
            .await?;

        let result = posts::Entity::delete_many()
            .filter(posts::Column::Id.eq(id))
            .filter(posts::Column::UserId.eq(user_id))
            .exec(self.conn)
            .await?;
        Ok(result.rows_affected)
    }
}

fn owned_post_ids(id: i32, user_id: i32) -> SelectStatement {
    posts::Entity::find()
        .select_only()
        .column(posts::Column::Id)
        .filter(posts::Column::Id.eq(id))
        .filter(posts::Column::UserId.eq(user_id))
        .into_query()
}
