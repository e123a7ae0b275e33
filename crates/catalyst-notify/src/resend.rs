use async_trait::async_trait;
use serde::Deserialize;

use crate::error::{NotifyError, Result};
use crate::utils::{truncate_string, MAX_BODY_LENGTH};
use crate::{Mailer, OutboundEmail, SendReceipt};

pub const DEFAULT_API_BASE: &str = "https://api.resend.com";

/// Hosted transactional mail API (`POST {api_base}/emails`, bearer key).
pub struct ResendMailer {
    client: reqwest::Client,
    api_base: String,
    api_key: String,
}

#[derive(Deserialize)]
struct SendResponse {
    id: Option<String>,
}

impl ResendMailer {
    pub fn new(api_base: &str, api_key: &str) -> Result<Self> {
        if api_key.trim().is_empty() {
            return Err(NotifyError::InvalidConfig("mail api_key is empty".to_string()));
        }
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(15))
            .build()?;
        Ok(Self {
            client,
            api_base: api_base.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
        })
    }
}

#[async_trait]
impl Mailer for ResendMailer {
    async fn send(&self, email: &OutboundEmail) -> Result<SendReceipt> {
        let url = format!("{}/emails", self.api_base);
        let resp = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(email)
            .send()
            .await?;

        let status = resp.status();
        let body = resp.text().await.unwrap_or_default();
        if !status.is_success() {
            tracing::warn!(status = status.as_u16(), subject = %email.subject, "Mail API rejected message");
            return Err(NotifyError::ApiError {
                service: self.provider().to_string(),
                status: status.as_u16(),
                body: truncate_string(&body, MAX_BODY_LENGTH),
            });
        }

        let id = serde_json::from_str::<SendResponse>(&body)
            .ok()
            .and_then(|r| r.id);
        tracing::debug!(id = ?id, subject = %email.subject, "Mail accepted");
        Ok(SendReceipt {
            id,
            provider: self.provider().to_string(),
        })
    }

    fn provider(&self) -> &str {
        "resend"
    }
}
