use chrono::{DateTime, Utc};
use sea_orm::prelude::DateTimeWithTimeZone;
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, EntityTrait, Order, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::entities::career::{self, Column, Entity};
use crate::error::Result;
use crate::store::{default_true, ContentStore, NewRecord};

/// An open position.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CareerRow {
    pub id: String,
    pub title: String,
    pub department: String,
    pub location: String,
    /// Employment type, e.g. `Full-time`.
    #[serde(rename = "type")]
    pub employment_type: String,
    pub description: String,
    pub requirements: Vec<String>,
    pub is_active: bool,
    pub sort_order: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct NewCareer {
    pub title: String,
    pub department: String,
    pub location: String,
    #[serde(rename = "type", default = "default_employment_type")]
    pub employment_type: String,
    pub description: String,
    #[serde(default)]
    pub requirements: Vec<String>,
    #[serde(default = "default_true")]
    pub is_active: bool,
    #[serde(default)]
    pub sort_order: i32,
}

fn default_employment_type() -> String {
    "Full-time".to_string()
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct CareerUpdate {
    pub title: Option<String>,
    pub department: Option<String>,
    pub location: Option<String>,
    #[serde(rename = "type")]
    pub employment_type: Option<String>,
    pub description: Option<String>,
    pub requirements: Option<Vec<String>>,
    pub is_active: Option<bool>,
    pub sort_order: Option<i32>,
}

/// Trims each requirement and drops the blank ones.
pub fn normalize_requirements(requirements: Vec<String>) -> Vec<String> {
    requirements
        .into_iter()
        .map(|r| r.trim().to_string())
        .filter(|r| !r.is_empty())
        .collect()
}

fn encode_requirements(requirements: Vec<String>) -> String {
    let normalized = normalize_requirements(requirements);
    serde_json::to_string(&normalized).unwrap_or_else(|_| "[]".to_string())
}

fn to_row(m: career::Model) -> CareerRow {
    let requirements = serde_json::from_str(&m.requirements_json).unwrap_or_else(|e| {
        tracing::warn!(career_id = %m.id, error = %e, "Unreadable requirements_json");
        Vec::new()
    });
    CareerRow {
        id: m.id,
        title: m.title,
        department: m.department,
        location: m.location,
        employment_type: m.employment_type,
        description: m.description,
        requirements,
        is_active: m.is_active,
        sort_order: m.sort_order,
        created_at: m.created_at.with_timezone(&Utc),
        updated_at: m.updated_at.with_timezone(&Utc),
    }
}

impl NewRecord for NewCareer {
    type ActiveModel = career::ActiveModel;

    fn into_active_model(
        self,
        id: String,
        created_at: DateTimeWithTimeZone,
        updated_at: DateTimeWithTimeZone,
    ) -> career::ActiveModel {
        career::ActiveModel {
            id: Set(id),
            title: Set(self.title),
            department: Set(self.department),
            location: Set(self.location),
            employment_type: Set(self.employment_type),
            description: Set(self.description),
            requirements_json: Set(encode_requirements(self.requirements)),
            is_active: Set(self.is_active),
            sort_order: Set(self.sort_order),
            created_at: Set(created_at),
            updated_at: Set(updated_at),
        }
    }
}

impl ContentStore {
    pub async fn insert_career(&self, new: NewCareer) -> Result<CareerRow> {
        let now = Utc::now().fixed_offset();
        let am = new.into_active_model(catalyst_common::id::next_id(), now, now);
        Ok(to_row(am.insert(self.db()).await?))
    }

    pub async fn get_career(&self, id: &str) -> Result<Option<CareerRow>> {
        Ok(Entity::find_by_id(id).one(self.db()).await?.map(to_row))
    }

    pub async fn list_careers(&self, limit: usize, offset: usize) -> Result<Vec<CareerRow>> {
        let rows = Entity::find()
            .order_by(Column::SortOrder, Order::Asc)
            .order_by(Column::CreatedAt, Order::Asc)
            .limit(limit as u64)
            .offset(offset as u64)
            .all(self.db())
            .await?;
        Ok(rows.into_iter().map(to_row).collect())
    }

    pub async fn count_careers(&self) -> Result<u64> {
        Ok(Entity::find().count(self.db()).await?)
    }

    pub async fn list_active_careers(&self) -> Result<Vec<CareerRow>> {
        let rows = Entity::find()
            .filter(Column::IsActive.eq(true))
            .order_by(Column::SortOrder, Order::Asc)
            .order_by(Column::CreatedAt, Order::Asc)
            .all(self.db())
            .await?;
        Ok(rows.into_iter().map(to_row).collect())
    }

    pub async fn update_career(&self, id: &str, update: CareerUpdate) -> Result<Option<CareerRow>> {
        let Some(model) = Entity::find_by_id(id).one(self.db()).await? else {
            return Ok(None);
        };
        let mut am: career::ActiveModel = model.into();
        if let Some(v) = update.title {
            am.title = Set(v);
        }
        if let Some(v) = update.department {
            am.department = Set(v);
        }
        if let Some(v) = update.location {
            am.location = Set(v);
        }
        if let Some(v) = update.employment_type {
            am.employment_type = Set(v);
        }
        if let Some(v) = update.description {
            am.description = Set(v);
        }
        if let Some(v) = update.requirements {
            am.requirements_json = Set(encode_requirements(v));
        }
        if let Some(v) = update.is_active {
            am.is_active = Set(v);
        }
        if let Some(v) = update.sort_order {
            am.sort_order = Set(v);
        }
        am.updated_at = Set(Utc::now().fixed_offset());
        Ok(Some(to_row(am.update(self.db()).await?)))
    }

    pub async fn delete_career(&self, id: &str) -> Result<bool> {
        let res = Entity::delete_by_id(id).exec(self.db()).await?;
        Ok(res.rows_affected > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::normalize_requirements;

    #[test]
    fn requirements_are_trimmed_and_blanks_dropped() {
        let reqs = normalize_requirements(vec![
            "  3+ years Rust ".to_string(),
            "".to_string(),
            "   ".to_string(),
            "SQL".to_string(),
        ]);
        assert_eq!(reqs, vec!["3+ years Rust", "SQL"]);
    }
}
