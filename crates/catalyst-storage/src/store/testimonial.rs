use chrono::{DateTime, Utc};
use sea_orm::prelude::DateTimeWithTimeZone;
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, EntityTrait, Order, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::entities::testimonial::{self, Column, Entity};
use crate::error::Result;
use crate::store::{default_true, ContentStore, NewRecord};

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct TestimonialRow {
    pub id: String,
    pub quote: String,
    pub author: String,
    pub role: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct NewTestimonial {
    pub quote: String,
    pub author: String,
    pub role: String,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct TestimonialUpdate {
    pub quote: Option<String>,
    pub author: Option<String>,
    pub role: Option<String>,
    pub is_active: Option<bool>,
}

fn to_row(m: testimonial::Model) -> TestimonialRow {
    TestimonialRow {
        id: m.id,
        quote: m.quote,
        author: m.author,
        role: m.role,
        is_active: m.is_active,
        created_at: m.created_at.with_timezone(&Utc),
        updated_at: m.updated_at.with_timezone(&Utc),
    }
}

impl NewRecord for NewTestimonial {
    type ActiveModel = testimonial::ActiveModel;

    fn into_active_model(
        self,
        id: String,
        created_at: DateTimeWithTimeZone,
        updated_at: DateTimeWithTimeZone,
    ) -> testimonial::ActiveModel {
        testimonial::ActiveModel {
            id: Set(id),
            quote: Set(self.quote),
            author: Set(self.author),
            role: Set(self.role),
            is_active: Set(self.is_active),
            created_at: Set(created_at),
            updated_at: Set(updated_at),
        }
    }
}

impl ContentStore {
    pub async fn insert_testimonial(&self, new: NewTestimonial) -> Result<TestimonialRow> {
        let now = Utc::now().fixed_offset();
        let am = new.into_active_model(catalyst_common::id::next_id(), now, now);
        Ok(to_row(am.insert(self.db()).await?))
    }

    pub async fn get_testimonial(&self, id: &str) -> Result<Option<TestimonialRow>> {
        Ok(Entity::find_by_id(id).one(self.db()).await?.map(to_row))
    }

    /// Newest first; testimonials have no manual ordering.
    pub async fn list_testimonials(
        &self,
        limit: usize,
        offset: usize,
    ) -> Result<Vec<TestimonialRow>> {
        let rows = Entity::find()
            .order_by(Column::CreatedAt, Order::Desc)
            .limit(limit as u64)
            .offset(offset as u64)
            .all(self.db())
            .await?;
        Ok(rows.into_iter().map(to_row).collect())
    }

    pub async fn count_testimonials(&self) -> Result<u64> {
        Ok(Entity::find().count(self.db()).await?)
    }

    pub async fn list_active_testimonials(&self) -> Result<Vec<TestimonialRow>> {
        let rows = Entity::find()
            .filter(Column::IsActive.eq(true))
            .order_by(Column::CreatedAt, Order::Desc)
            .all(self.db())
            .await?;
        Ok(rows.into_iter().map(to_row).collect())
    }

    pub async fn update_testimonial(
        &self,
        id: &str,
        update: TestimonialUpdate,
    ) -> Result<Option<TestimonialRow>> {
        let Some(model) = Entity::find_by_id(id).one(self.db()).await? else {
            return Ok(None);
        };
        let mut am: testimonial::ActiveModel = model.into();
        if let Some(v) = update.quote {
            am.quote = Set(v);
        }
        if let Some(v) = update.author {
            am.author = Set(v);
        }
        if let Some(v) = update.role {
            am.role = Set(v);
        }
        if let Some(v) = update.is_active {
            am.is_active = Set(v);
        }
        am.updated_at = Set(Utc::now().fixed_offset());
        Ok(Some(to_row(am.update(self.db()).await?)))
    }

    pub async fn delete_testimonial(&self, id: &str) -> Result<bool> {
        let res = Entity::delete_by_id(id).exec(self.db()).await?;
        Ok(res.rows_affected > 0)
    }
}
