use catalyst_common::types::{ContactMessage, ContactStatus};
use chrono::{DateTime, Utc};
use sea_orm::prelude::DateTimeWithTimeZone;
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, EntityTrait, Order, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::entities::contact_submission::{self, Column, Entity};
use crate::error::Result;
use crate::store::{ContentStore, NewRecord};

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ContactSubmissionRow {
    pub id: String,
    pub name: String,
    pub email: String,
    pub message: String,
    pub status: ContactStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct NewContactSubmission {
    pub name: String,
    pub email: String,
    pub message: String,
    #[serde(default)]
    pub status: ContactStatus,
}

impl From<ContactMessage> for NewContactSubmission {
    fn from(msg: ContactMessage) -> Self {
        Self {
            name: msg.name,
            email: msg.email,
            message: msg.message,
            status: ContactStatus::New,
        }
    }
}

fn to_row(m: contact_submission::Model) -> ContactSubmissionRow {
    let status = m.status.parse::<ContactStatus>().unwrap_or_else(|e| {
        tracing::warn!(submission_id = %m.id, error = %e, "Unknown contact status, treating as new");
        ContactStatus::New
    });
    ContactSubmissionRow {
        id: m.id,
        name: m.name,
        email: m.email,
        message: m.message,
        status,
        created_at: m.created_at.with_timezone(&Utc),
        updated_at: m.updated_at.with_timezone(&Utc),
    }
}

impl NewRecord for NewContactSubmission {
    type ActiveModel = contact_submission::ActiveModel;

    fn into_active_model(
        self,
        id: String,
        created_at: DateTimeWithTimeZone,
        updated_at: DateTimeWithTimeZone,
    ) -> contact_submission::ActiveModel {
        contact_submission::ActiveModel {
            id: Set(id),
            name: Set(self.name),
            email: Set(self.email),
            message: Set(self.message),
            status: Set(self.status.to_string()),
            created_at: Set(created_at),
            updated_at: Set(updated_at),
        }
    }
}

impl ContentStore {
    pub async fn insert_contact_submission(
        &self,
        new: NewContactSubmission,
    ) -> Result<ContactSubmissionRow> {
        let now = Utc::now().fixed_offset();
        let am = new.into_active_model(catalyst_common::id::next_id(), now, now);
        let row = to_row(am.insert(self.db()).await?);
        tracing::info!(submission_id = %row.id, "Stored contact submission");
        Ok(row)
    }

    pub async fn get_contact_submission(&self, id: &str) -> Result<Option<ContactSubmissionRow>> {
        Ok(Entity::find_by_id(id).one(self.db()).await?.map(to_row))
    }

    /// Newest first.
    pub async fn list_contact_submissions(
        &self,
        status: Option<ContactStatus>,
        limit: usize,
        offset: usize,
    ) -> Result<Vec<ContactSubmissionRow>> {
        let mut q = Entity::find();
        if let Some(status) = status {
            q = q.filter(Column::Status.eq(status.as_str()));
        }
        let rows = q
            .order_by(Column::CreatedAt, Order::Desc)
            .limit(limit as u64)
            .offset(offset as u64)
            .all(self.db())
            .await?;
        Ok(rows.into_iter().map(to_row).collect())
    }

    pub async fn count_contact_submissions(&self, status: Option<ContactStatus>) -> Result<u64> {
        let mut q = Entity::find();
        if let Some(status) = status {
            q = q.filter(Column::Status.eq(status.as_str()));
        }
        Ok(q.count(self.db()).await?)
    }

    pub async fn update_contact_status(
        &self,
        id: &str,
        status: ContactStatus,
    ) -> Result<Option<ContactSubmissionRow>> {
        let Some(model) = Entity::find_by_id(id).one(self.db()).await? else {
            return Ok(None);
        };
        let mut am: contact_submission::ActiveModel = model.into();
        am.status = Set(status.to_string());
        am.updated_at = Set(Utc::now().fixed_offset());
        Ok(Some(to_row(am.update(self.db()).await?)))
    }

    pub async fn delete_contact_submission(&self, id: &str) -> Result<bool> {
        let res = Entity::delete_by_id(id).exec(self.db()).await?;
        Ok(res.rows_affected > 0)
    }
}
