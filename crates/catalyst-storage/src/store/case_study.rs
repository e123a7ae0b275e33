use catalyst_common::icon::Icon;
use chrono::{DateTime, Utc};
use sea_orm::prelude::DateTimeWithTimeZone;
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, EntityTrait, Order, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::entities::case_study::{self, Column, Entity};
use crate::error::Result;
use crate::store::{default_true, ContentStore, NewRecord};

/// A client result shown as a headline metric, e.g. "3x" / "pipeline growth".
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CaseStudyRow {
    pub id: String,
    pub client: String,
    pub metric: String,
    pub label: String,
    pub description: String,
    #[schema(value_type = String, example = "TrendingUp")]
    pub icon: Icon,
    pub sort_order: i32,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct NewCaseStudy {
    pub client: String,
    pub metric: String,
    pub label: String,
    pub description: String,
    #[serde(default = "default_icon")]
    #[schema(value_type = String, example = "TrendingUp")]
    pub icon: Icon,
    #[serde(default)]
    pub sort_order: i32,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

fn default_icon() -> Icon {
    Icon::TrendingUp
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct CaseStudyUpdate {
    pub client: Option<String>,
    pub metric: Option<String>,
    pub label: Option<String>,
    pub description: Option<String>,
    #[schema(value_type = Option<String>)]
    pub icon: Option<Icon>,
    pub sort_order: Option<i32>,
    pub is_active: Option<bool>,
}

fn to_row(m: case_study::Model) -> CaseStudyRow {
    CaseStudyRow {
        id: m.id,
        client: m.client,
        metric: m.metric,
        label: m.label,
        description: m.description,
        icon: Icon::from_name(&m.icon),
        sort_order: m.sort_order,
        is_active: m.is_active,
        created_at: m.created_at.with_timezone(&Utc),
        updated_at: m.updated_at.with_timezone(&Utc),
    }
}

impl NewRecord for NewCaseStudy {
    type ActiveModel = case_study::ActiveModel;

    fn into_active_model(
        self,
        id: String,
        created_at: DateTimeWithTimeZone,
        updated_at: DateTimeWithTimeZone,
    ) -> case_study::ActiveModel {
        case_study::ActiveModel {
            id: Set(id),
            client: Set(self.client),
            metric: Set(self.metric),
            label: Set(self.label),
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
    pub async fn insert_case_study(&self, new: NewCaseStudy) -> Result<CaseStudyRow> {
        let now = Utc::now().fixed_offset();
        let am = new.into_active_model(catalyst_common::id::next_id(), now, now);
        Ok(to_row(am.insert(self.db()).await?))
    }

    pub async fn get_case_study(&self, id: &str) -> Result<Option<CaseStudyRow>> {
        Ok(Entity::find_by_id(id).one(self.db()).await?.map(to_row))
    }

    pub async fn list_case_studies(&self, limit: usize, offset: usize) -> Result<Vec<CaseStudyRow>> {
        let rows = Entity::find()
            .order_by(Column::SortOrder, Order::Asc)
            .order_by(Column::CreatedAt, Order::Asc)
            .limit(limit as u64)
            .offset(offset as u64)
            .all(self.db())
            .await?;
        Ok(rows.into_iter().map(to_row).collect())
    }

    pub async fn count_case_studies(&self) -> Result<u64> {
        Ok(Entity::find().count(self.db()).await?)
    }

    pub async fn list_active_case_studies(&self) -> Result<Vec<CaseStudyRow>> {
        let rows = Entity::find()
            .filter(Column::IsActive.eq(true))
            .order_by(Column::SortOrder, Order::Asc)
            .order_by(Column::CreatedAt, Order::Asc)
            .all(self.db())
            .await?;
        Ok(rows.into_iter().map(to_row).collect())
    }

    pub async fn update_case_study(
        &self,
        id: &str,
        update: CaseStudyUpdate,
    ) -> Result<Option<CaseStudyRow>> {
        let Some(model) = Entity::find_by_id(id).one(self.db()).await? else {
            return Ok(None);
        };
        let mut am: case_study::ActiveModel = model.into();
        if let Some(v) = update.client {
            am.client = Set(v);
        }
        if let Some(v) = update.metric {
            am.metric = Set(v);
        }
        if let Some(v) = update.label {
            am.label = Set(v);
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

    pub async fn delete_case_study(&self, id: &str) -> Result<bool> {
        let res = Entity::delete_by_id(id).exec(self.db()).await?;
        Ok(res.rows_affected > 0)
    }
}
