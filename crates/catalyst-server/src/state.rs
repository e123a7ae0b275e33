use crate::config::ServerConfig;
use catalyst_notify::ContactNotifier;
use catalyst_storage::{ContentStore, MediaLibrary};
use chrono::{DateTime, Utc};
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<ContentStore>,
    pub media: Arc<MediaLibrary>,
    /// Present when mail is configured.
    pub contact_notifier: Option<Arc<ContactNotifier>>,
    pub start_time: DateTime<Utc>,
    pub jwt_secret: Arc<String>,
    pub service_key: Option<Arc<String>>,
    pub token_expire_secs: u64,
    pub config: Arc<ServerConfig>,
}
