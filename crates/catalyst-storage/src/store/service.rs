use catalyst_common::icon::Icon;
use chrono::{DateTime, Utc};
use sea_orm::prelude::DateTimeWithTimeZone;
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, EntityTrait, Order, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::entities::service::{self, Column, Entity};
use crate::error::Result;
use crate::store::{default_true, ContentStore, NewRecord};

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ServiceRow {
    pub id: String,
    pub title: String,
    pub description: String,
    #[schema(value_type = String, example = "Zap")]
    pub icon: Icon,
    pub sort_order: i32,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct NewService {
    pub title: String,
    pub description: String,
    #[serde(default = "default_icon")]
    #[schema(value_type = String, example = "Zap")]
    pub icon: Icon,
    #[serde(default)]
    pub sort_order: i32,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

fn default_icon() -> Icon {
    Icon::Zap
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct ServiceUpdate {
    pub title: Option<String>,
    pub description: Option<String>,
    #[schema(value_type = Option<String>)]
    pub icon: Option<Icon>,
    pub sort_order: Option<i32>,
    pub is_active: Option<bool>,
}

fn to_row(m: service::Model) -> ServiceRow {
    ServiceRow {
        id: m.id,
        title: m.title,
        description: m.description,
        icon: Icon::from_name(&m.icon),
        sort_order: m.sort_order,
        is_active: m.is_active,
        created_at: m.created_at.with_timezone(&Utc),
        updated_at: m.updated_at.with_timezone(&Utc),
    }
}

impl NewRecord for NewService {
    type ActiveModel = service::ActiveModel;

    fn into_active_model(
        self,
        id: String,
        created_at: DateTimeWithTimeZone,
        updated_at: DateTimeWithTimeZone,
    ) -> service::ActiveModel {
        service::ActiveModel {
            id: Set(id),
            title: Set(self.title),
            description: Set(self.description),
            icon: Set(self.icon.to_string()),
            sort_order: Set(self.sort_order),
            is_active: Set(self.is_active),
            created_at: Set(created_at),
            updated_at: Set(updated_at),
        }
    }
}

impl ContentStore {
    pub async fn insert_service(&self, new: NewService) -> Result<ServiceRow> {
        let now = Utc::now().fixed_offset();
        let am = new.into_active_model(catalyst_common::id::next_id(), now, now);
        Ok(to_row(am.insert(self.db()).await?))
    }

    pub async fn get_service(&self, id: &str) -> Result<Option<ServiceRow>> {
        Ok(Entity::find_by_id(id).one(self.db()).await?.map(to_row))
    }

    /// Every service in display order, active or not.
    pub async fn list_services(&self, limit: usize, offset: usize) -> Result<Vec<ServiceRow>> {
        let rows = Entity::find()
            .order_by(Column::SortOrder, Order::Asc)
            .order_by(Column::CreatedAt, Order::Asc)
            .limit(limit as u64)
            .offset(offset as u64)
            .all(self.db())
            .await?;
        Ok(rows.into_iter().map(to_row).collect())
    }

    pub async fn count_services(&self) -> Result<u64> {
        Ok(Entity::find().count(self.db()).await?)
    }

    pub async fn list_active_services(&self) -> Result<Vec<ServiceRow>> {
        let rows = Entity::find()
            .filter(Column::IsActive.eq(true))
            .order_by(Column::SortOrder, Order::Asc)
            .order_by(Column::CreatedAt, Order::Asc)
            .all(self.db())
            .await?;
        Ok(rows.into_iter().map(to_row).collect())
    }

    pub async fn update_service(&self, id: &str, update: ServiceUpdate) -> Result<Option<ServiceRow>> {
        let Some(model) = Entity::find_by_id(id).one(self.db()).await? else {
            return Ok(None);
        };
        let mut am: service::ActiveModel = model.into();
        if let Some(v) = update.title {
            am.title = Set(v);
        }
        if let Some(v) = update.description {
            am.description = Set(v);
        }
        if let Some(v) = update.icon {
            am.icon = Set(v.to_string());
        }
        if let Some(v) = update.sort_order {
            am.sort_order = Set(v);
        }
        if let Some(v) = update.is_active {
            am.is_active = Set(v);
        }
        am.updated_at = Set(Utc::now().fixed_offset());
        Ok(Some(to_row(am.update(self.db()).await?)))
    }

    pub async fn delete_service(&self, id: &str) -> Result<bool> {
        let res = Entity::delete_by_id(id).exec(self.db()).await?;
        Ok(res.rows_affected > 0)
    }
}
