use catalyst_common::icon::Icon;
use chrono::{DateTime, Utc};
use sea_orm::prelude::DateTimeWithTimeZone;
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, EntityTrait, Order, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::entities::process_step::{self, Column, Entity};
use crate::error::Result;
use crate::store::{default_true, ContentStore, NewRecord};

/// One stage of the engagement timeline ("Week 1-2", "Discovery", ...).
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ProcessStepRow {
    pub id: String,
    pub week: String,
    pub title: String,
    pub description: String,
    #[schema(value_type = String, example = "Target")]
    pub icon: Icon,
    pub sort_order: i32,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct NewProcessStep {
    pub week: String,
    pub title: String,
    pub description: String,
    #[serde(default = "default_icon")]
    #[schema(value_type = String, example = "Target")]
    pub icon: Icon,
    #[serde(default)]
    pub sort_order: i32,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

fn default_icon() -> Icon {
    Icon::Target
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct ProcessStepUpdate {
    pub week: Option<String>,
    pub title: Option<String>,
    pub description: Option<String>,
    #[schema(value_type = Option<String>)]
    pub icon: Option<Icon>,
    pub sort_order: Option<i32>,
    pub is_active: Option<bool>,
}

fn to_row(m: process_step::Model) -> ProcessStepRow {
    ProcessStepRow {
        id: m.id,
        week: m.week,
        title: m.title,
        description: m.description,
        icon: Icon::from_name(&m.icon),
        sort_order: m.sort_order,
        is_active: m.is_active,
        created_at: m.created_at.with_timezone(&Utc),
        updated_at: m.updated_at.with_timezone(&Utc),
    }
}

impl NewRecord for NewProcessStep {
    type ActiveModel = process_step::ActiveModel;

    fn into_active_model(
        self,
        id: String,
        created_at: DateTimeWithTimeZone,
        updated_at: DateTimeWithTimeZone,
    ) -> process_step::ActiveModel {
        process_step::ActiveModel {
            id: Set(id),
            week: Set(self.week),
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
    pub async fn insert_process_step(&self, new: NewProcessStep) -> Result<ProcessStepRow> {
        let now = Utc::now().fixed_offset();
        let am = new.into_active_model(catalyst_common::id::next_id(), now, now);
        Ok(to_row(am.insert(self.db()).await?))
    }

    pub async fn get_process_step(&self, id: &str) -> Result<Option<ProcessStepRow>> {
        Ok(Entity::find_by_id(id).one(self.db()).await?.map(to_row))
    }

    pub async fn list_process_steps(
        &self,
        limit: usize,
        offset: usize,
    ) -> Result<Vec<ProcessStepRow>> {
        let rows = Entity::find()
            .order_by(Column::SortOrder, Order::Asc)
            .order_by(Column::CreatedAt, Order::Asc)
            .limit(limit as u64)
            .offset(offset as u64)
            .all(self.db())
            .await?;
        Ok(rows.into_iter().map(to_row).collect())
    }

    pub async fn count_process_steps(&self) -> Result<u64> {
        Ok(Entity::find().count(self.db()).await?)
    }

    pub async fn list_active_process_steps(&self) -> Result<Vec<ProcessStepRow>> {
        let rows = Entity::find()
            .filter(Column::IsActive.eq(true))
            .order_by(Column::SortOrder, Order::Asc)
            .order_by(Column::CreatedAt, Order::Asc)
            .all(self.db())
            .await?;
        Ok(rows.into_iter().map(to_row).collect())
    }

    pub async fn update_process_step(
        &self,
        id: &str,
        update: ProcessStepUpdate,
    ) -> Result<Option<ProcessStepRow>> {
        let Some(model) = Entity::find_by_id(id).one(self.db()).await? else {
            return Ok(None);
        };
        let mut am: process_step::ActiveModel = model.into();
        if let Some(v) = update.week {
            am.week = Set(v);
        }
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

    pub async fn delete_process_step(&self, id: &str) -> Result<bool> {
        let res = Entity::delete_by_id(id).exec(self.db()).await?;
        Ok(res.rows_affected > 0)
    }
}
