//! Typed site settings.
//!
//! The `site_settings` table holds one JSON blob per key. Only three keys are
//! meaningful to the site (`hero`, `contact`, `social`), so the blob is
//! modelled as the [`SiteSetting`] union rather than an open map. A row is
//! decoded with [`SiteSetting::from_parts`]; rows with any other key are
//! rejected there and skipped by callers.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;

/// Homepage hero block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(default)]
pub struct HeroSettings {
    pub title: String,
    pub subtitle: String,
    /// Stored as `ctaText`; `cta_text` is accepted on input.
    #[serde(rename = "ctaText", alias = "cta_text")]
    pub cta_text: String,
}

impl Default for HeroSettings {
    fn default() -> Self {
        Self {
            title: "AI-Powered Growth for Modern Businesses".to_string(),
            subtitle: "We build intelligent automation systems that generate leads, nurture prospects, and close deals while you focus on what matters.".to_string(),
            cta_text: "Book a Strategy Call".to_string(),
        }
    }
}

/// Public contact details shown in the footer and on the contact page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(default)]
pub struct ContactSettings {
    pub email: String,
    pub location: String,
}

impl Default for ContactSettings {
    fn default() -> Self {
        Self {
            email: "hello@catalyst-ai.com".to_string(),
            location: "San Francisco, CA".to_string(),
        }
    }
}

/// Social profile links. Empty strings mean "not shown".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(default)]
pub struct SocialSettings {
    pub twitter: String,
    pub linkedin: String,
    pub github: String,
}

/// One row of `site_settings`, keyed by its variant.
///
/// Serialized adjacently tagged, which is exactly the row shape:
///
/// ```
/// use catalyst_common::settings::{SiteSetting, SocialSettings};
///
/// let setting = SiteSetting::Social(SocialSettings {
///     github: "https://github.com/catalyst".into(),
///     ..Default::default()
/// });
/// let json = serde_json::to_value(&setting).unwrap();
/// assert_eq!(json["key"], "social");
/// assert_eq!(json["value"]["github"], "https://github.com/catalyst");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "key", content = "value", rename_all = "snake_case")]
pub enum SiteSetting {
    Hero(HeroSettings),
    Contact(ContactSettings),
    Social(SocialSettings),
}

impl SiteSetting {
    pub const KEYS: [&'static str; 3] = ["hero", "contact", "social"];

    pub fn key(&self) -> &'static str {
        match self {
            SiteSetting::Hero(_) => "hero",
            SiteSetting::Contact(_) => "contact",
            SiteSetting::Social(_) => "social",
        }
    }

    /// The value half of the row, as stored in the `value_json` column.
    pub fn value(&self) -> Value {
        let encoded = match self {
            SiteSetting::Hero(v) => serde_json::to_value(v),
            SiteSetting::Contact(v) => serde_json::to_value(v),
            SiteSetting::Social(v) => serde_json::to_value(v),
        };
        // Plain string structs always encode.
        encoded.unwrap_or(Value::Null)
    }

    /// Decodes a stored `(key, value)` pair. Unknown keys and values of the
    /// wrong shape are errors.
    pub fn from_parts(key: &str, value: Value) -> Result<Self, serde_json::Error> {
        serde_json::from_value(serde_json::json!({ "key": key, "value": value }))
    }
}

/// All settings the site renders, with defaults for anything not stored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(default)]
pub struct SiteSettings {
    pub hero: HeroSettings,
    pub contact: ContactSettings,
    pub social: SocialSettings,
}

impl SiteSettings {
    pub fn apply(&mut self, setting: SiteSetting) {
        match setting {
            SiteSetting::Hero(v) => self.hero = v,
            SiteSetting::Contact(v) => self.contact = v,
            SiteSetting::Social(v) => self.social = v,
        }
    }

    pub fn into_settings(self) -> [SiteSetting; 3] {
        [
            SiteSetting::Hero(self.hero),
            SiteSetting::Contact(self.contact),
            SiteSetting::Social(self.social),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn decodes_stored_hero_blob() {
        let setting = SiteSetting::from_parts(
            "hero",
            json!({"title": "T", "subtitle": "S", "ctaText": "Go"}),
        )
        .unwrap();
        assert_eq!(
            setting,
            SiteSetting::Hero(HeroSettings {
                title: "T".into(),
                subtitle: "S".into(),
                cta_text: "Go".into(),
            })
        );
    }

    #[test]
    fn partial_blob_keeps_defaults_for_missing_fields() {
        let setting = SiteSetting::from_parts("contact", json!({"email": "a@b.c"})).unwrap();
        match setting {
            SiteSetting::Contact(c) => {
                assert_eq!(c.email, "a@b.c");
                assert_eq!(c.location, ContactSettings::default().location);
            }
            other => panic!("unexpected variant: {other:?}"),
        }
    }

    #[test]
    fn unknown_key_is_rejected() {
        assert!(SiteSetting::from_parts("footer", json!({})).is_err());
    }

    #[test]
    fn value_round_trips_through_from_parts() {
        let original = SiteSetting::Hero(HeroSettings::default());
        let decoded = SiteSetting::from_parts(original.key(), original.value()).unwrap();
        assert_eq!(decoded, original);
    }

    #[test]
    fn apply_replaces_only_the_matching_section() {
        let mut settings = SiteSettings::default();
        settings.apply(SiteSetting::Social(SocialSettings {
            twitter: "https://x.com/catalyst".into(),
            ..Default::default()
        }));
        assert_eq!(settings.social.twitter, "https://x.com/catalyst");
        assert_eq!(settings.hero, HeroSettings::default());
    }
}
