use chrono::{DateTime, Utc};
use sea_orm::prelude::DateTimeWithTimeZone;
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, EntityTrait, Order, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::entities::team_member::{self, Column, Entity};
use crate::error::Result;
use crate::store::{default_true, non_empty, ContentStore, NewRecord};

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct TeamMemberRow {
    pub id: String,
    pub name: String,
    pub role: String,
    pub bio: Option<String>,
    pub email: Option<String>,
    pub photo_url: Option<String>,
    pub linkedin_url: Option<String>,
    pub twitter_url: Option<String>,
    pub github_url: Option<String>,
    pub is_active: bool,
    pub sort_order: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct NewTeamMember {
    pub name: String,
    pub role: String,
    #[serde(default)]
    pub bio: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub photo_url: Option<String>,
    #[serde(default)]
    pub linkedin_url: Option<String>,
    #[serde(default)]
    pub twitter_url: Option<String>,
    #[serde(default)]
    pub github_url: Option<String>,
    #[serde(default = "default_true")]
    pub is_active: bool,
    #[serde(default)]
    pub sort_order: i32,
}

/// Partial update. An empty string clears an optional field.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct TeamMemberUpdate {
    pub name: Option<String>,
    pub role: Option<String>,
    pub bio: Option<String>,
    pub email: Option<String>,
    pub photo_url: Option<String>,
    pub linkedin_url: Option<String>,
    pub twitter_url: Option<String>,
    pub github_url: Option<String>,
    pub is_active: Option<bool>,
    pub sort_order: Option<i32>,
}

fn to_row(m: team_member::Model) -> TeamMemberRow {
    TeamMemberRow {
        id: m.id,
        name: m.name,
        role: m.role,
        bio: m.bio,
        email: m.email,
        photo_url: m.photo_url,
        linkedin_url: m.linkedin_url,
        twitter_url: m.twitter_url,
        github_url: m.github_url,
        is_active: m.is_active,
        sort_order: m.sort_order,
        created_at: m.created_at.with_timezone(&Utc),
        updated_at: m.updated_at.with_timezone(&Utc),
    }
}

impl NewRecord for NewTeamMember {
    type ActiveModel = team_member::ActiveModel;

    fn into_active_model(
        self,
        id: String,
        created_at: DateTimeWithTimeZone,
        updated_at: DateTimeWithTimeZone,
    ) -> team_member::ActiveModel {
        team_member::ActiveModel {
            id: Set(id),
            name: Set(self.name),
            role: Set(self.role),
            bio: Set(non_empty(self.bio)),
            email: Set(non_empty(self.email)),
            photo_url: Set(non_empty(self.photo_url)),
            linkedin_url: Set(non_empty(self.linkedin_url)),
            twitter_url: Set(non_empty(self.twitter_url)),
            github_url: Set(non_empty(self.github_url)),
            is_active: Set(self.is_active),
            sort_order: Set(self.sort_order),
            created_at: Set(created_at),
            updated_at: Set(updated_at),
        }
    }
}

impl ContentStore {
    pub async fn insert_team_member(&self, new: NewTeamMember) -> Result<TeamMemberRow> {
        let now = Utc::now().fixed_offset();
        let am = new.into_active_model(catalyst_common::id::next_id(), now, now);
        Ok(to_row(am.insert(self.db()).await?))
    }

    pub async fn get_team_member(&self, id: &str) -> Result<Option<TeamMemberRow>> {
        Ok(Entity::find_by_id(id).one(self.db()).await?.map(to_row))
    }

    pub async fn list_team_members(
        &self,
        limit: usize,
        offset: usize,
    ) -> Result<Vec<TeamMemberRow>> {
        let rows = Entity::find()
            .order_by(Column::SortOrder, Order::Asc)
            .order_by(Column::CreatedAt, Order::Asc)
            .limit(limit as u64)
            .offset(offset as u64)
            .all(self.db())
            .await?;
        Ok(rows.into_iter().map(to_row).collect())
    }

    pub async fn count_team_members(&self) -> Result<u64> {
        Ok(Entity::find().count(self.db()).await?)
    }

    pub async fn list_active_team_members(&self) -> Result<Vec<TeamMemberRow>> {
        let rows = Entity::find()
            .filter(Column::IsActive.eq(true))
            .order_by(Column::SortOrder, Order::Asc)
            .order_by(Column::CreatedAt, Order::Asc)
            .all(self.db())
            .await?;
        Ok(rows.into_iter().map(to_row).collect())
    }

    pub async fn update_team_member(
        &self,
        id: &str,
        update: TeamMemberUpdate,
    ) -> Result<Option<TeamMemberRow>> {
        let Some(model) = Entity::find_by_id(id).one(self.db()).await? else {
            return Ok(None);
        };
        let mut am: team_member::ActiveModel = model.into();
        if let Some(v) = update.name {
            am.name = Set(v);
        }
        if let Some(v) = update.role {
            am.role = Set(v);
        }
        if let Some(v) = update.bio {
            am.bio = Set(non_empty(Some(v)));
        }
        if let Some(v) = update.email {
            am.email = Set(non_empty(Some(v)));
        }
        if let Some(v) = update.photo_url {
            am.photo_url = Set(non_empty(Some(v)));
        }
        if let Some(v) = update.linkedin_url {
            am.linkedin_url = Set(non_empty(Some(v)));
        }
        if let Some(v) = update.twitter_url {
            am.twitter_url = Set(non_empty(Some(v)));
        }
        if let Some(v) = update.github_url {
            am.github_url = Set(non_empty(Some(v)));
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

    pub async fn delete_team_member(&self, id: &str) -> Result<bool> {
        let res = Entity::delete_by_id(id).exec(self.db()).await?;
        Ok(res.rows_affected > 0)
    }
}
