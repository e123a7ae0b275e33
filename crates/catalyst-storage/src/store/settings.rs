use catalyst_common::settings::{SiteSetting, SiteSettings};
use chrono::{DateTime, Utc};
use sea_orm::prelude::DateTimeWithTimeZone;
use sea_orm::sea_query::OnConflict;
use sea_orm::{ActiveValue::Set, ColumnTrait, EntityTrait, QueryFilter};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;

use crate::entities::site_setting::{self, Column, Entity};
use crate::error::{Result, StorageError};
use crate::store::{ContentStore, NewRecord};

/// A stored setting row. `value` is the decoded `value_json` column.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SettingRow {
    pub id: String,
    pub key: String,
    pub value: Value,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

fn to_row(m: site_setting::Model) -> Result<SettingRow> {
    Ok(SettingRow {
        value: serde_json::from_str(&m.value_json)?,
        id: m.id,
        key: m.key,
        created_at: m.created_at.with_timezone(&Utc),
        updated_at: m.updated_at.with_timezone(&Utc),
    })
}

#[derive(Deserialize)]
struct RawSetting {
    key: String,
    value: Value,
}

/// Import shape of `site_settings`: a `{key, value}` pair that must decode
/// as one of the known settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(try_from = "RawSetting")]
pub struct ImportedSetting(pub SiteSetting);

impl TryFrom<RawSetting> for ImportedSetting {
    type Error = String;

    fn try_from(raw: RawSetting) -> std::result::Result<Self, Self::Error> {
        SiteSetting::from_parts(&raw.key, raw.value)
            .map(ImportedSetting)
            .map_err(|e| format!("setting '{}': {e}", raw.key))
    }
}

impl NewRecord for ImportedSetting {
    type ActiveModel = site_setting::ActiveModel;

    fn into_active_model(
        self,
        id: String,
        created_at: DateTimeWithTimeZone,
        updated_at: DateTimeWithTimeZone,
    ) -> site_setting::ActiveModel {
        site_setting::ActiveModel {
            id: Set(id),
            key: Set(self.0.key().to_string()),
            value_json: Set(self.0.value().to_string()),
            created_at: Set(created_at),
            updated_at: Set(updated_at),
        }
    }
}

impl ContentStore {
    /// Writes one setting, replacing any stored value for the same key.
    pub async fn upsert_setting(&self, setting: &SiteSetting) -> Result<SettingRow> {
        let now = Utc::now().fixed_offset();
        let am = site_setting::ActiveModel {
            id: Set(catalyst_common::id::next_id()),
            key: Set(setting.key().to_string()),
            value_json: Set(setting.value().to_string()),
            created_at: Set(now),
            updated_at: Set(now),
        };
        Entity::insert(am)
            .on_conflict(
                OnConflict::column(Column::Key)
                    .update_columns([Column::ValueJson, Column::UpdatedAt])
                    .to_owned(),
            )
            .exec_without_returning(self.db())
            .await?;

        let model = Entity::find()
            .filter(Column::Key.eq(setting.key()))
            .one(self.db())
            .await?
            .ok_or_else(|| StorageError::NotFound {
                entity: "site_setting",
                id: setting.key().to_string(),
            })?;
        to_row(model)
    }

    pub async fn get_setting_row(&self, key: &str) -> Result<Option<SettingRow>> {
        Entity::find()
            .filter(Column::Key.eq(key))
            .one(self.db())
            .await?
            .map(to_row)
            .transpose()
    }

    /// The typed settings, with defaults for anything missing. Rows with an
    /// unknown key or an undecodable value are skipped.
    pub async fn load_site_settings(&self) -> Result<SiteSettings> {
        let rows = Entity::find().all(self.db()).await?;
        let mut settings = SiteSettings::default();
        for row in rows {
            let decoded = serde_json::from_str::<Value>(&row.value_json)
                .and_then(|value| SiteSetting::from_parts(&row.key, value));
            match decoded {
                Ok(setting) => settings.apply(setting),
                Err(e) => {
                    tracing::warn!(key = %row.key, error = %e, "Skipping unusable site setting");
                }
            }
        }
        Ok(settings)
    }

    /// Upserts every section of `settings`.
    pub async fn save_site_settings(&self, settings: SiteSettings) -> Result<SiteSettings> {
        for setting in settings.clone().into_settings() {
            self.upsert_setting(&setting).await?;
        }
        Ok(settings)
    }
}
