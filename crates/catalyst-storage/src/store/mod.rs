use catalyst_common::types::ContentTable;
use chrono::{DateTime, Utc};
use migration::{Migrator, MigratorTrait};
use sea_orm::prelude::DateTimeWithTimeZone;
use sea_orm::{
    ActiveModelBehavior, ActiveModelTrait, ConnectionTrait, Database, DatabaseConnection, EntityTrait, IntoActiveModel,
    TransactionTrait,
};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;

use crate::error::{Result, StorageError};

pub mod blog;
pub mod career;
pub mod case_study;
pub mod contact;
pub mod dashboard;
pub mod media;
pub mod process_step;
pub mod service;
pub mod settings;
pub mod team;
pub mod tech_stack;
pub mod testimonial;
pub mod user;

pub use blog::{BlogPostRow, BlogPostUpdate, NewBlogPost};
pub use career::{CareerRow, CareerUpdate, NewCareer};
pub use case_study::{CaseStudyRow, CaseStudyUpdate, NewCaseStudy};
pub use contact::{ContactSubmissionRow, NewContactSubmission};
pub use dashboard::DashboardCounts;
pub use media::MediaFileRow;
pub use process_step::{NewProcessStep, ProcessStepRow, ProcessStepUpdate};
pub use service::{NewService, ServiceRow, ServiceUpdate};
pub use settings::{ImportedSetting, SettingRow};
pub use team::{NewTeamMember, TeamMemberRow, TeamMemberUpdate};
pub use tech_stack::{group_by_category, NewTechItem, TechCategory, TechItemRow, TechItemUpdate};
pub use testimonial::{NewTestimonial, TestimonialRow, TestimonialUpdate};
pub use user::UserRow;

/// Typed access to every content table.
///
/// All methods are `async fn` over a SeaORM connection pool. The schema is
/// brought up to date by the `migration` crate when the store connects.
pub struct ContentStore {
    pub(crate) db: DatabaseConnection,
}

impl ContentStore {
    /// Connects and migrates the content database.
    ///
    /// SQLite example: `sqlite://data/catalyst.db?mode=rwc`. Parent
    /// directories of a file-backed SQLite URL are created first.
    pub async fn new(db_url: &str) -> Result<Self> {
        if let Some(dir) = sqlite_parent_dir(db_url) {
            std::fs::create_dir_all(dir).map_err(|e| StorageError::Other(e.to_string()))?;
        }
        let db = Database::connect(db_url).await?;

        if db_url.starts_with("sqlite:") {
            db.execute_unprepared("PRAGMA journal_mode=WAL;").await?;
        }

        Migrator::up(&db, None).await?;
        tracing::info!(db_url = %db_url, "Initialized content store");

        Ok(Self { db })
    }

    pub(crate) fn db(&self) -> &DatabaseConnection {
        &self.db
    }

    /// Inserts a chunk of exported rows into `table` in one transaction.
    ///
    /// Each element must decode into the table's insert shape; `id`,
    /// `created_at` and `updated_at` are kept when present. Returns the
    /// number of rows written. Either every row lands or none does.
    pub async fn import_rows(&self, table: ContentTable, rows: Vec<Value>) -> Result<u64> {
        match table {
            ContentTable::Services => self.import_as::<NewService>(rows).await,
            ContentTable::CaseStudies => self.import_as::<NewCaseStudy>(rows).await,
            ContentTable::Testimonials => self.import_as::<NewTestimonial>(rows).await,
            ContentTable::ProcessSteps => self.import_as::<NewProcessStep>(rows).await,
            ContentTable::TechStack => self.import_as::<NewTechItem>(rows).await,
            ContentTable::BlogPosts => self.import_as::<NewBlogPost>(rows).await,
            ContentTable::Careers => self.import_as::<NewCareer>(rows).await,
            ContentTable::TeamMembers => self.import_as::<NewTeamMember>(rows).await,
            ContentTable::ContactSubmissions => self.import_as::<NewContactSubmission>(rows).await,
            ContentTable::SiteSettings => self.import_as::<settings::ImportedSetting>(rows).await,
        }
    }

    async fn import_as<R>(&self, rows: Vec<Value>) -> Result<u64>
    where
        R: NewRecord,
        ModelOf<R>: IntoActiveModel<R::ActiveModel>,
    {
        let now = Utc::now().fixed_offset();
        let mut models = Vec::with_capacity(rows.len());
        for (index, value) in rows.into_iter().enumerate() {
            let imported: Imported<R> = serde_json::from_value(value)
                .map_err(|source| StorageError::InvalidRow { index, source })?;
            models.push(imported.into_active_model(now));
        }
        if models.is_empty() {
            return Ok(0);
        }

        let count = models.len() as u64;
        let txn = self.db().begin().await?;
        <EntityOf<R> as EntityTrait>::insert_many(models)
            .exec_without_returning(&txn)
            .await?;
        txn.commit().await?;
        tracing::info!(rows = count, "Imported rows");
        Ok(count)
    }
}

/// Insert shape of one table.
///
/// Implementors are the `New*` request types; the same shape is used for
/// admin creates and for bulk imports.
pub trait NewRecord: DeserializeOwned + Send {
    type ActiveModel: ActiveModelTrait + ActiveModelBehavior + Send;

    fn into_active_model(
        self,
        id: String,
        created_at: DateTimeWithTimeZone,
        updated_at: DateTimeWithTimeZone,
    ) -> Self::ActiveModel;
}

type EntityOf<R> = <<R as NewRecord>::ActiveModel as ActiveModelTrait>::Entity;
type ModelOf<R> = <EntityOf<R> as EntityTrait>::Model;

/// One exported row: the insert shape plus optional identity columns.
#[derive(Debug, Deserialize)]
pub struct Imported<R> {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(flatten)]
    pub record: R,
}

impl<R: NewRecord> Imported<R> {
    fn into_active_model(self, now: DateTimeWithTimeZone) -> R::ActiveModel {
        let id = self
            .id
            .filter(|id| !id.is_empty())
            .unwrap_or_else(catalyst_common::id::next_id);
        let created_at = self.created_at.map(|t| t.fixed_offset()).unwrap_or(now);
        let updated_at = self
            .updated_at
            .map(|t| t.fixed_offset())
            .unwrap_or(created_at);
        self.record.into_active_model(id, created_at, updated_at)
    }
}

/// Result of a bulk import, as reported by the import endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ImportSummary {
    pub table: String,
    pub inserted: u64,
}

pub(crate) fn default_true() -> bool {
    true
}

pub(crate) fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

fn sqlite_parent_dir(db_url: &str) -> Option<&std::path::Path> {
    let rest = db_url
        .strip_prefix("sqlite://")
        .or_else(|| db_url.strip_prefix("sqlite:"))?;
    let path = rest.split('?').next()?;
    if path.is_empty() || path == ":memory:" {
        return None;
    }
    std::path::Path::new(path)
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
}

#[cfg(test)]
mod tests {
    use super::sqlite_parent_dir;
    use std::path::Path;

    #[test]
    fn sqlite_parent_dir_strips_scheme_and_query() {
        assert_eq!(
            sqlite_parent_dir("sqlite://data/catalyst.db?mode=rwc"),
            Some(Path::new("data"))
        );
        assert_eq!(sqlite_parent_dir("sqlite::memory:"), None);
        assert_eq!(sqlite_parent_dir("sqlite://catalyst.db"), None);
        assert_eq!(sqlite_parent_dir("postgres://u:p@localhost/db"), None);
    }
}
