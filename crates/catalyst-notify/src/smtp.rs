use async_trait::async_trait;
use lettre::message::header::ContentType;
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};

use crate::error::{NotifyError, Result};
use crate::{Mailer, OutboundEmail, SendReceipt};

pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
}

impl SmtpMailer {
    pub fn new(host: &str, port: u16, username: Option<&str>, password: Option<&str>) -> Result<Self> {
        let mut builder = AsyncSmtpTransport::<Tokio1Executor>::relay(host)
            .map_err(|e| NotifyError::InvalidConfig(format!("smtp host '{host}': {e}")))?
            .port(port);

        if let (Some(user), Some(pass)) = (username, password) {
            builder = builder.credentials(Credentials::new(user.to_string(), pass.to_string()));
        }

        Ok(Self {
            transport: builder.build(),
        })
    }
}

fn mailbox(addr: &str) -> Result<Mailbox> {
    addr.parse()
        .map_err(|_| NotifyError::InvalidAddress(addr.to_string()))
}

#[async_trait]
impl Mailer for SmtpMailer {
    async fn send(&self, email: &OutboundEmail) -> Result<SendReceipt> {
        if email.to.is_empty() {
            return Err(NotifyError::Other("mail has no recipients".to_string()));
        }
        let mut builder = Message::builder()
            .from(mailbox(&email.from)?)
            .subject(&email.subject)
            .header(ContentType::TEXT_HTML);
        for to in &email.to {
            builder = builder.to(mailbox(to)?);
        }
        let message = builder
            .body(email.html.clone())
            .map_err(|e| NotifyError::SmtpError(e.to_string()))?;

        let response = self
            .transport
            .send(message)
            .await
            .map_err(|e| NotifyError::SmtpError(e.to_string()))?;
        let id = response.message().next().map(|line| line.to_string());
        Ok(SendReceipt {
            id,
            provider: self.provider().to_string(),
        })
    }

    fn provider(&self) -> &str {
        "smtp"
    }
}
