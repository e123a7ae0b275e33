use anyhow::Context;
use serde::{Deserialize, Serialize};

/// Server configuration, read from TOML with a default for every field.
/// Secrets can be supplied through the environment instead of the file; see
/// [`ServerConfig::apply_env`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_http_port")]
    pub http_port: u16,
    /// Absolute base URL the site is reachable at; media URLs are built from it.
    #[serde(default = "default_public_base_url")]
    pub public_base_url: String,
    /// Allowed CORS origins. Empty allows any origin.
    #[serde(default)]
    pub cors_allowed_origins: Vec<String>,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub auth: AuthConfig,
    #[serde(default)]
    pub media: MediaConfig,
    #[serde(default)]
    pub mail: MailConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            http_port: default_http_port(),
            public_base_url: default_public_base_url(),
            cors_allowed_origins: Vec::new(),
            database: DatabaseConfig::default(),
            auth: AuthConfig::default(),
            media: MediaConfig::default(),
            mail: MailConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// Any SeaORM connection URL.
    #[serde(default = "default_database_url")]
    pub url: String,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: default_database_url(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// HS256 signing secret. A random one is generated at startup when unset,
    /// which invalidates tokens on restart.
    #[serde(default)]
    pub jwt_secret: Option<String>,
    #[serde(default = "default_token_expire_secs")]
    pub token_expire_secs: u64,
    /// Bearer credential for machine clients such as `catalyst-migrate`.
    #[serde(default)]
    pub service_key: Option<String>,
    #[serde(default = "default_username")]
    pub default_username: String,
    #[serde(default = "default_password")]
    pub default_password: String,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: None,
            token_expire_secs: default_token_expire_secs(),
            service_key: None,
            default_username: default_username(),
            default_password: default_password(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaBackend {
    #[default]
    Local,
    S3,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MediaConfig {
    #[serde(default)]
    pub backend: MediaBackend,
    /// Root directory for the local backend; blobs live in `<root>/media`.
    #[serde(default = "default_media_root")]
    pub local_root: String,
    #[serde(default = "default_media_bucket")]
    pub s3_bucket: String,
    #[serde(default = "default_max_upload_bytes")]
    pub max_upload_bytes: usize,
}

impl Default for MediaConfig {
    fn default() -> Self {
        Self {
            backend: MediaBackend::default(),
            local_root: default_media_root(),
            s3_bucket: default_media_bucket(),
            max_upload_bytes: default_max_upload_bytes(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MailProvider {
    #[default]
    Resend,
    Smtp,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MailConfig {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default)]
    pub provider: MailProvider,
    /// Send the contact notification in the background after each form
    /// submission.
    #[serde(default = "default_true")]
    pub notify_on_submit: bool,
    #[serde(default = "default_mail_api_base")]
    pub api_base: String,
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default = "default_admin_recipients")]
    pub admin_recipients: Vec<String>,
    #[serde(default = "default_notify_from")]
    pub notify_from: String,
    #[serde(default = "default_reply_from")]
    pub reply_from: String,
    #[serde(default = "default_site_name")]
    pub site_name: String,
    #[serde(default)]
    pub smtp: SmtpConfig,
}

impl Default for MailConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            provider: MailProvider::default(),
            notify_on_submit: true,
            api_base: default_mail_api_base(),
            api_key: None,
            admin_recipients: default_admin_recipients(),
            notify_from: default_notify_from(),
            reply_from: default_reply_from(),
            site_name: default_site_name(),
            smtp: SmtpConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SmtpConfig {
    #[serde(default = "default_smtp_host")]
    pub host: String,
    #[serde(default = "default_smtp_port")]
    pub port: u16,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
}

impl Default for SmtpConfig {
    fn default() -> Self {
        Self {
            host: default_smtp_host(),
            port: default_smtp_port(),
            username: None,
            password: None,
        }
    }
}

fn default_http_port() -> u16 {
    8080
}

fn default_public_base_url() -> String {
    "http://localhost:8080".to_string()
}

fn default_database_url() -> String {
    "sqlite://data/catalyst.db?mode=rwc".to_string()
}

fn default_token_expire_secs() -> u64 {
    86400
}

fn default_username() -> String {
    "admin".to_string()
}

fn default_password() -> String {
    "changeme".to_string()
}

fn default_media_root() -> String {
    "data".to_string()
}

fn default_media_bucket() -> String {
    catalyst_storage::media::MEDIA_BUCKET.to_string()
}

fn default_max_upload_bytes() -> usize {
    10 * 1024 * 1024
}

fn default_true() -> bool {
    true
}

fn default_mail_api_base() -> String {
    catalyst_notify::resend::DEFAULT_API_BASE.to_string()
}

fn default_admin_recipients() -> Vec<String> {
    vec!["hello@catalyst-ai.com".to_string()]
}

fn default_notify_from() -> String {
    "Contact Form <onboarding@resend.dev>".to_string()
}

fn default_reply_from() -> String {
    "Catalyst AI <onboarding@resend.dev>".to_string()
}

fn default_site_name() -> String {
    "Catalyst AI".to_string()
}

fn default_smtp_host() -> String {
    "localhost".to_string()
}

fn default_smtp_port() -> u16 {
    587
}

impl ServerConfig {
    pub fn load(path: &str) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {path}"))?;
        let mut config: Self =
            toml::from_str(&content).with_context(|| format!("invalid config file {path}"))?;
        config.apply_env(|key| std::env::var(key).ok());
        Ok(config)
    }

    /// Overrides secrets and the database URL from the environment. Empty
    /// values are ignored.
    pub fn apply_env(&mut self, get: impl Fn(&str) -> Option<String>) {
        let lookup = |key: &str| get(key).filter(|v| !v.trim().is_empty());
        if let Some(v) = lookup("CATALYST_JWT_SECRET") {
            self.auth.jwt_secret = Some(v);
        }
        if let Some(v) = lookup("CATALYST_SERVICE_KEY") {
            self.auth.service_key = Some(v);
        }
        if let Some(v) = lookup("CATALYST_MAIL_API_KEY") {
            self.mail.api_key = Some(v);
        }
        if let Some(v) = lookup("CATALYST_DATABASE_URL") {
            self.database.url = v;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn empty_file_uses_defaults() {
        let config: ServerConfig = toml::from_str("").unwrap();
        assert_eq!(config.http_port, 8080);
        assert_eq!(config.database.url, "sqlite://data/catalyst.db?mode=rwc");
        assert_eq!(config.media.backend, MediaBackend::Local);
        assert!(!config.mail.enabled);
        assert!(config.mail.notify_on_submit);
        assert_eq!(config.mail.smtp.port, 587);
    }

    #[test]
    fn nested_sections_parse() {
        let config: ServerConfig = toml::from_str(
            r#"
            http_port = 9000
            [media]
            backend = "s3"
            s3_bucket = "site-media"
            [mail]
            enabled = true
            provider = "smtp"
            admin_recipients = ["ops@example.com"]
            [mail.smtp]
            host = "smtp.example.com"
            "#,
        )
        .unwrap();
        assert_eq!(config.http_port, 9000);
        assert_eq!(config.media.backend, MediaBackend::S3);
        assert_eq!(config.media.s3_bucket, "site-media");
        assert_eq!(config.mail.provider, MailProvider::Smtp);
        assert_eq!(config.mail.admin_recipients, vec!["ops@example.com"]);
        assert_eq!(config.mail.smtp.host, "smtp.example.com");
    }

    #[test]
    fn env_overrides_secrets() {
        let env: HashMap<&str, &str> = [
            ("CATALYST_JWT_SECRET", "jwt"),
            ("CATALYST_SERVICE_KEY", "svc"),
            ("CATALYST_MAIL_API_KEY", ""),
            ("CATALYST_DATABASE_URL", "sqlite::memory:"),
        ]
        .into_iter()
        .collect();
        let mut config = ServerConfig::default();
        config.mail.api_key = Some("from-file".into());
        config.apply_env(|k| env.get(k).map(|v| v.to_string()));
        assert_eq!(config.auth.jwt_secret.as_deref(), Some("jwt"));
        assert_eq!(config.auth.service_key.as_deref(), Some("svc"));
        assert_eq!(config.mail.api_key.as_deref(), Some("from-file"));
        assert_eq!(config.database.url, "sqlite::memory:");
    }

    #[test]
    fn shipped_example_config_parses() {
        let config: ServerConfig =
            toml::from_str(include_str!("../../../config/server.toml")).unwrap();
        assert_eq!(config.http_port, 8080);
        assert_eq!(config.auth.default_username, "admin");
        assert_eq!(config.media.max_upload_bytes, 10 * 1024 * 1024);
    }
}
