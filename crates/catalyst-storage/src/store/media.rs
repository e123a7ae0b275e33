use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, EntityTrait, Order, QueryFilter, QueryOrder,
    QuerySelect,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::entities::media_file::{self, Column, Entity};
use crate::error::Result;
use crate::store::ContentStore;

/// Index entry for one uploaded blob.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct MediaFileRow {
    pub id: String,
    /// Object key inside the media bucket.
    pub name: String,
    pub mime_type: String,
    pub size: i64,
    pub created_at: DateTime<Utc>,
}

fn to_row(m: media_file::Model) -> MediaFileRow {
    MediaFileRow {
        id: m.id,
        name: m.name,
        mime_type: m.mime_type,
        size: m.size,
        created_at: m.created_at.with_timezone(&Utc),
    }
}

impl ContentStore {
    pub async fn insert_media_file(
        &self,
        name: &str,
        mime_type: &str,
        size: i64,
    ) -> Result<MediaFileRow> {
        let am = media_file::ActiveModel {
            id: Set(catalyst_common::id::next_id()),
            name: Set(name.to_owned()),
            mime_type: Set(mime_type.to_owned()),
            size: Set(size),
            created_at: Set(Utc::now().fixed_offset()),
        };
        Ok(to_row(am.insert(self.db()).await?))
    }

    pub async fn get_media_file(&self, name: &str) -> Result<Option<MediaFileRow>> {
        Ok(Entity::find()
            .filter(Column::Name.eq(name))
            .one(self.db())
            .await?
            .map(to_row))
    }

    /// Newest first.
    pub async fn list_media_files(&self, limit: usize) -> Result<Vec<MediaFileRow>> {
        let rows = Entity::find()
            .order_by(Column::CreatedAt, Order::Desc)
            .limit(limit as u64)
            .all(self.db())
            .await?;
        Ok(rows.into_iter().map(to_row).collect())
    }

    pub async fn delete_media_file(&self, name: &str) -> Result<bool> {
        let res = Entity::delete_many()
            .filter(Column::Name.eq(name))
            .exec(self.db())
            .await?;
        Ok(res.rows_affected > 0)
    }
}
