use chrono::{DateTime, Utc};
use sea_orm::prelude::DateTimeWithTimeZone;
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, EntityTrait, Order, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::entities::tech_item::{self, Column, Entity};
use crate::error::Result;
use crate::store::{default_true, ContentStore, NewRecord};

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct TechItemRow {
    pub id: String,
    pub name: String,
    pub category: String,
    pub sort_order: i32,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct NewTechItem {
    pub name: String,
    pub category: String,
    #[serde(default)]
    pub sort_order: i32,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct TechItemUpdate {
    pub name: Option<String>,
    pub category: Option<String>,
    pub sort_order: Option<i32>,
    pub is_active: Option<bool>,
}

/// Tech items sharing one category, in display order.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct TechCategory {
    pub category: String,
    pub items: Vec<TechItemRow>,
}

/// Groups items by category. Categories appear in the order their first
/// item appears in `items`.
pub fn group_by_category(items: Vec<TechItemRow>) -> Vec<TechCategory> {
    let mut groups: Vec<TechCategory> = Vec::new();
    for item in items {
        match groups.iter_mut().find(|g| g.category == item.category) {
            Some(group) => group.items.push(item),
            None => groups.push(TechCategory {
                category: item.category.clone(),
                items: vec![item],
            }),
        }
    }
    groups
}

fn to_row(m: tech_item::Model) -> TechItemRow {
    TechItemRow {
        id: m.id,
        name: m.name,
        category: m.category,
        sort_order: m.sort_order,
        is_active: m.is_active,
        created_at: m.created_at.with_timezone(&Utc),
        updated_at: m.updated_at.with_timezone(&Utc),
    }
}

impl NewRecord for NewTechItem {
    type ActiveModel = tech_item::ActiveModel;

    fn into_active_model(
        self,
        id: String,
        created_at: DateTimeWithTimeZone,
        updated_at: DateTimeWithTimeZone,
    ) -> tech_item::ActiveModel {
        tech_item::ActiveModel {
            id: Set(id),
            name: Set(self.name),
            category: Set(self.category),
            sort_order: Set(self.sort_order),
            is_active: Set(self.is_active),
            created_at: Set(created_at),
            updated_at: Set(updated_at),
        }
    }
}

impl ContentStore {
    pub async fn insert_tech_item(&self, new: NewTechItem) -> Result<TechItemRow> {
        let now = Utc::now().fixed_offset();
        let am = new.into_active_model(catalyst_common::id::next_id(), now, now);
        Ok(to_row(am.insert(self.db()).await?))
    }

    pub async fn get_tech_item(&self, id: &str) -> Result<Option<TechItemRow>> {
        Ok(Entity::find_by_id(id).one(self.db()).await?.map(to_row))
    }

    pub async fn list_tech_items(&self, limit: usize, offset: usize) -> Result<Vec<TechItemRow>> {
        let rows = Entity::find()
            .order_by(Column::SortOrder, Order::Asc)
            .order_by(Column::CreatedAt, Order::Asc)
            .limit(limit as u64)
            .offset(offset as u64)
            .all(self.db())
            .await?;
        Ok(rows.into_iter().map(to_row).collect())
    }

    pub async fn count_tech_items(&self) -> Result<u64> {
        Ok(Entity::find().count(self.db()).await?)
    }

    pub async fn list_active_tech_items(&self) -> Result<Vec<TechItemRow>> {
        let rows = Entity::find()
            .filter(Column::IsActive.eq(true))
            .order_by(Column::SortOrder, Order::Asc)
            .order_by(Column::CreatedAt, Order::Asc)
            .all(self.db())
            .await?;
        Ok(rows.into_iter().map(to_row).collect())
    }

    pub async fn update_tech_item(
        &self,
        id: &str,
        update: TechItemUpdate,
    ) -> Result<Option<TechItemRow>> {
        let Some(model) = Entity::find_by_id(id).one(self.db()).await? else {
            return Ok(None);
        };
        let mut am: tech_item::ActiveModel = model.into();
        if let Some(v) = update.name {
            am.name = Set(v);
        }
        if let Some(v) = update.category {
            am.category = Set(v);
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

    pub async fn delete_tech_item(&self, id: &str) -> Result<bool> {
        let res = Entity::delete_by_id(id).exec(self.db()).await?;
        Ok(res.rows_affected > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(name: &str, category: &str) -> TechItemRow {
        let now = Utc::now();
        TechItemRow {
            id: name.to_string(),
            name: name.to_string(),
            category: category.to_string(),
            sort_order: 0,
            is_active: true,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn groups_keep_first_seen_category_order() {
        let groups = group_by_category(vec![
            item("OpenAI", "AI"),
            item("HubSpot", "CRM"),
            item("Claude", "AI"),
        ]);
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].category, "AI");
        assert_eq!(groups[0].items.len(), 2);
        assert_eq!(groups[0].items[1].name, "Claude");
        assert_eq!(groups[1].category, "CRM");
    }
}
