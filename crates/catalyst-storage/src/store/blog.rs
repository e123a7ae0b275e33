use catalyst_common::types::slugify;
use chrono::{DateTime, Utc};
use sea_orm::prelude::DateTimeWithTimeZone;
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, EntityTrait, Order, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::entities::blog_post::{self, Column, Entity};
use crate::error::Result;
use crate::store::{non_empty, ContentStore, NewRecord};

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct BlogPostRow {
    pub id: String,
    pub slug: String,
    pub title: String,
    pub excerpt: String,
    /// HTML body.
    pub content: Option<String>,
    pub image_url: Option<String>,
    pub category: String,
    pub read_time: Option<String>,
    pub is_published: bool,
    pub published_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct NewBlogPost {
    /// Derived from the title when empty.
    #[serde(default)]
    pub slug: String,
    pub title: String,
    #[serde(default)]
    pub excerpt: String,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub category: String,
    #[serde(default = "default_read_time")]
    pub read_time: Option<String>,
    #[serde(default)]
    pub is_published: bool,
    /// Only honoured for published posts; defaults to the insert time.
    #[serde(default)]
    pub published_at: Option<DateTime<Utc>>,
}

fn default_read_time() -> Option<String> {
    Some("5 min read".to_string())
}

/// Partial update. An empty string clears `content`, `image_url` and
/// `read_time`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct BlogPostUpdate {
    pub slug: Option<String>,
    pub title: Option<String>,
    pub excerpt: Option<String>,
    pub content: Option<String>,
    pub image_url: Option<String>,
    pub category: Option<String>,
    pub read_time: Option<String>,
    pub is_published: Option<bool>,
}

fn to_row(m: blog_post::Model) -> BlogPostRow {
    BlogPostRow {
        id: m.id,
        slug: m.slug,
        title: m.title,
        excerpt: m.excerpt,
        content: m.content,
        image_url: m.image_url,
        category: m.category,
        read_time: m.read_time,
        is_published: m.is_published,
        published_at: m.published_at.map(|t| t.with_timezone(&Utc)),
        created_at: m.created_at.with_timezone(&Utc),
        updated_at: m.updated_at.with_timezone(&Utc),
    }
}

/// Slug for a post: the explicit one when given, else one derived from the
/// title, else the row id.
fn resolve_slug(explicit: &str, title: &str, id: &str) -> String {
    let explicit = explicit.trim();
    if !explicit.is_empty() {
        return explicit.to_string();
    }
    let derived = slugify(title);
    if derived.is_empty() {
        id.to_string()
    } else {
        derived
    }
}

impl NewRecord for NewBlogPost {
    type ActiveModel = blog_post::ActiveModel;

    fn into_active_model(
        self,
        id: String,
        created_at: DateTimeWithTimeZone,
        updated_at: DateTimeWithTimeZone,
    ) -> blog_post::ActiveModel {
        let published_at = if self.is_published {
            Some(
                self.published_at
                    .map(|t| t.fixed_offset())
                    .unwrap_or(created_at),
            )
        } else {
            None
        };
        blog_post::ActiveModel {
            slug: Set(resolve_slug(&self.slug, &self.title, &id)),
            id: Set(id),
            title: Set(self.title),
            excerpt: Set(self.excerpt),
            content: Set(non_empty(self.content)),
            image_url: Set(non_empty(self.image_url)),
            category: Set(self.category),
            read_time: Set(non_empty(self.read_time)),
            is_published: Set(self.is_published),
            published_at: Set(published_at),
            created_at: Set(created_at),
            updated_at: Set(updated_at),
        }
    }
}

impl ContentStore {
    pub async fn insert_blog_post(&self, new: NewBlogPost) -> Result<BlogPostRow> {
        let now = Utc::now().fixed_offset();
        let am = new.into_active_model(catalyst_common::id::next_id(), now, now);
        Ok(to_row(am.insert(self.db()).await?))
    }

    pub async fn get_blog_post(&self, id: &str) -> Result<Option<BlogPostRow>> {
        Ok(Entity::find_by_id(id).one(self.db()).await?.map(to_row))
    }

    /// Newest first, drafts included.
    pub async fn list_blog_posts(&self, limit: usize, offset: usize) -> Result<Vec<BlogPostRow>> {
        let rows = Entity::find()
            .order_by(Column::CreatedAt, Order::Desc)
            .limit(limit as u64)
            .offset(offset as u64)
            .all(self.db())
            .await?;
        Ok(rows.into_iter().map(to_row).collect())
    }

    pub async fn count_blog_posts(&self) -> Result<u64> {
        Ok(Entity::find().count(self.db()).await?)
    }

    /// Published posts, most recently published first.
    pub async fn list_published_blog_posts(&self) -> Result<Vec<BlogPostRow>> {
        let rows = Entity::find()
            .filter(Column::IsPublished.eq(true))
            .order_by(Column::PublishedAt, Order::Desc)
            .order_by(Column::CreatedAt, Order::Desc)
            .all(self.db())
            .await?;
        Ok(rows.into_iter().map(to_row).collect())
    }

    /// A published post by slug. Drafts are reported as absent.
    pub async fn get_published_blog_post(&self, slug: &str) -> Result<Option<BlogPostRow>> {
        Ok(Entity::find()
            .filter(Column::Slug.eq(slug))
            .filter(Column::IsPublished.eq(true))
            .one(self.db())
            .await?
            .map(to_row))
    }

    /// Applies a partial update. Publishing a draft stamps `published_at`;
    /// unpublishing clears it; saving an already published post keeps the
    /// original stamp.
    pub async fn update_blog_post(
        &self,
        id: &str,
        update: BlogPostUpdate,
    ) -> Result<Option<BlogPostRow>> {
        let Some(model) = Entity::find_by_id(id).one(self.db()).await? else {
            return Ok(None);
        };
        let now = Utc::now().fixed_offset();
        let was_published = model.is_published;
        let mut am: blog_post::ActiveModel = model.into();
        if let Some(v) = update.title {
            am.title = Set(v);
        }
        if let Some(v) = update.slug.filter(|s| !s.trim().is_empty()) {
            am.slug = Set(v.trim().to_string());
        }
        if let Some(v) = update.excerpt {
            am.excerpt = Set(v);
        }
        if let Some(v) = update.content {
            am.content = Set(non_empty(Some(v)));
        }
        if let Some(v) = update.image_url {
            am.image_url = Set(non_empty(Some(v)));
        }
        if let Some(v) = update.category {
            am.category = Set(v);
        }
        if let Some(v) = update.read_time {
            am.read_time = Set(non_empty(Some(v)));
        }
        if let Some(publish) = update.is_published {
            if publish && !was_published {
                am.published_at = Set(Some(now));
            } else if !publish {
                am.published_at = Set(None);
            }
            am.is_published = Set(publish);
        }
        am.updated_at = Set(now);
        Ok(Some(to_row(am.update(self.db()).await?)))
    }

    pub async fn delete_blog_post(&self, id: &str) -> Result<bool> {
        let res = Entity::delete_by_id(id).exec(self.db()).await?;
        Ok(res.rows_affected > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::resolve_slug;

    #[test]
    fn explicit_slug_wins() {
        assert_eq!(resolve_slug(" my-post ", "Other", "1"), "my-post");
    }

    #[test]
    fn slug_falls_back_to_title_then_id() {
        assert_eq!(resolve_slug("", "Scaling Outbound With AI", "1"), "scaling-outbound-with-ai");
        assert_eq!(resolve_slug("", "!!!", "42"), "42");
    }
}
