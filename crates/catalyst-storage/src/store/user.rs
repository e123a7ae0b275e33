use chrono::{DateTime, Utc};
use sea_orm::{ActiveModelTrait, ActiveValue::Set, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter};

use crate::entities::user::{self, Column, Entity};
use crate::error::Result;
use crate::store::ContentStore;

/// An admin account.
#[derive(Debug, Clone)]
pub struct UserRow {
    pub id: String,
    pub username: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

fn to_user(m: user::Model) -> UserRow {
    UserRow {
        id: m.id,
        username: m.username,
        password_hash: m.password_hash,
        created_at: m.created_at.with_timezone(&Utc),
        updated_at: m.updated_at.with_timezone(&Utc),
    }
}

impl ContentStore {
    pub async fn get_user_by_username(&self, username: &str) -> Result<Option<UserRow>> {
        let model = Entity::find()
            .filter(Column::Username.eq(username))
            .one(self.db())
            .await?;
        Ok(model.map(to_user))
    }

    pub async fn get_user(&self, id: &str) -> Result<Option<UserRow>> {
        Ok(Entity::find_by_id(id).one(self.db()).await?.map(to_user))
    }

    pub async fn create_user(&self, username: &str, password_hash: &str) -> Result<String> {
        let id = catalyst_common::id::next_id();
        let now = Utc::now().fixed_offset();
        let am = user::ActiveModel {
            id: Set(id.clone()),
            username: Set(username.to_owned()),
            password_hash: Set(password_hash.to_owned()),
            created_at: Set(now),
            updated_at: Set(now),
        };
        am.insert(self.db()).await?;
        Ok(id)
    }

    pub async fn count_users(&self) -> Result<u64> {
        Ok(Entity::find().count(self.db()).await?)
    }
}
