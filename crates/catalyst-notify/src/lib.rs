//! Outbound mail for the contact pipeline.
//!
//! [`Mailer`] is the transport seam: [`resend::ResendMailer`] talks to a
//! hosted transactional mail API, [`smtp::SmtpMailer`] to an SMTP relay.
//! [`contact::ContactNotifier`] renders the two contact-form mails and sends
//! them through whichever transport is configured.

pub mod contact;
pub mod error;
pub mod resend;
pub mod smtp;
pub mod utils;

#[cfg(test)]
mod tests;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

pub use contact::{ContactMailSettings, ContactNotifier, ContactReceipts};
pub use error::{NotifyError, Result};

/// A rendered HTML mail.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutboundEmail {
    pub from: String,
    pub to: Vec<String>,
    pub subject: String,
    pub html: String,
}

/// What the transport reported for one accepted mail.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SendReceipt {
    /// Provider message id, when the provider returns one.
    pub id: Option<String>,
    pub provider: String,
}

/// A mail transport. Implementations send once and report failure; there is
/// no retry at this layer.
#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, email: &OutboundEmail) -> Result<SendReceipt>;

    /// Short transport name used in logs and receipts.
    fn provider(&self) -> &str;
}
