use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DbErr, EntityTrait, QueryFilter, QuerySelect,
    Set,
};

use crate::entities::users;
use crate::models::{User, now_timestamp};

pub struct UserRepository<'a, C> {
    conn: &'a C,
}

impl<'a, C: ConnectionTrait> UserRepository<'a, C> {
    #[must_use]
    pub const fn new(conn: &'a C) -> Self {
        Self { conn }
    }

    /// Inserts an already-validated user. `password_hash` must be a hash,
    /// never the submitted password.
    pub async fn insert(
        &self,
        username: String,
        email: String,
        password_hash: String,
    ) -> Result<users::Model, DbErr> {
        let now = now_timestamp();

        users::ActiveModel {
            username: Set(username),
            email: Set(email),
            password_hash: Set(password_hash),
            created_at: Set(now.clone()),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(self.conn)
        .await
    }

    pub async fn get_by_id(&self, id: i32) -> Result<Option<User>, DbErr> {
        let user = users::Entity::find_by_id(id).one(self.conn).await?;
        Ok(user.map(User::from))
    }

    /// Rows whose email matches, at most `limit` of them. Used for login,
    /// which must see a second match to reject it.
    pub async fn find_by_email(&self, email: &str, limit: u64) -> Result<Vec<users::Model>, DbErr> {
        users::Entity::find()
            .filter(users::Column::Email.eq(email))
            .limit(limit)
            .all(self.conn)
            .await
    }
}
