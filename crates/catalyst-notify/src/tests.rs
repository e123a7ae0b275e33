use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use catalyst_common::types::ContactMessage;

use crate::contact::{ContactMailSettings, ContactNotifier};
use crate::error::{NotifyError, Result};
use crate::{Mailer, OutboundEmail, SendReceipt};

/// Records every mail; fails the `fail_on`-th send (1-based) when set.
#[derive(Default)]
struct RecordingMailer {
    sent: Mutex<Vec<OutboundEmail>>,
    fail_on: Option<usize>,
}

#[async_trait]
impl Mailer for RecordingMailer {
    async fn send(&self, email: &OutboundEmail) -> Result<SendReceipt> {
        let mut sent = self.sent.lock().unwrap();
        sent.push(email.clone());
        if self.fail_on == Some(sent.len()) {
            return Err(NotifyError::ApiError {
                service: "test".into(),
                status: 500,
                body: "boom".into(),
            });
        }
        Ok(SendReceipt {
            id: Some(format!("msg-{}", sent.len())),
            provider: "test".into(),
        })
    }

    fn provider(&self) -> &str {
        "test"
    }
}

fn message() -> ContactMessage {
    ContactMessage {
        name: "Jane <Doe>".into(),
        email: "jane@x.com".into(),
        message: "Line one\nLine two".into(),
    }
}

#[tokio::test]
async fn sends_admin_mail_then_auto_reply() {
    let mailer = Arc::new(RecordingMailer::default());
    let notifier = ContactNotifier::new(mailer.clone(), ContactMailSettings::default());

    let receipts = notifier.notify(&message()).await.unwrap();
    assert_eq!(receipts.admin_email.id.as_deref(), Some("msg-1"));
    assert_eq!(receipts.user_email.id.as_deref(), Some("msg-2"));

    let sent = mailer.sent.lock().unwrap();
    assert_eq!(sent.len(), 2);
    assert_eq!(sent[0].to, vec!["hello@catalyst-ai.com"]);
    assert_eq!(sent[0].subject, "New Contact Form Submission from Jane <Doe>");
    assert_eq!(sent[0].from, "Contact Form <onboarding@resend.dev>");
    assert_eq!(sent[1].to, vec!["jane@x.com"]);
    assert_eq!(sent[1].subject, "We received your message!");
}

#[tokio::test]
async fn bodies_escape_user_text() {
    let notifier = ContactNotifier::new(
        Arc::new(RecordingMailer::default()),
        ContactMailSettings::default(),
    );
    let admin = notifier.admin_email(&message());
    assert!(admin.html.contains("Jane &lt;Doe&gt;"));
    assert!(admin.html.contains("Line one<br>Line two"));
    assert!(!admin.html.contains("<Doe>"));

    let reply = notifier.auto_reply(&message());
    assert!(reply.html.contains("Thank you for contacting us, Jane &lt;Doe&gt;!"));
    assert!(reply.html.contains("The Catalyst AI Team"));
}

#[tokio::test]
async fn auto_reply_goes_to_trimmed_address() {
    let notifier = ContactNotifier::new(
        Arc::new(RecordingMailer::default()),
        ContactMailSettings::default(),
    );
    let msg = ContactMessage {
        email: " jane@x.com\n".to_string(),
        ..message()
    };
    assert_eq!(notifier.auto_reply(&msg).to, vec!["jane@x.com"]);
}

#[tokio::test]
async fn admin_failure_skips_auto_reply() {
    let mailer = Arc::new(RecordingMailer {
        fail_on: Some(1),
        ..Default::default()
    });
    let notifier = ContactNotifier::new(mailer.clone(), ContactMailSettings::default());

    let err = notifier.notify(&message()).await.unwrap_err();
    assert!(matches!(err, NotifyError::ApiError { status: 500, .. }));
    assert_eq!(mailer.sent.lock().unwrap().len(), 1);
}

#[test]
fn resend_mailer_requires_api_key() {
    let err = crate::resend::ResendMailer::new(crate::resend::DEFAULT_API_BASE, "  ");
    assert!(matches!(err, Err(NotifyError::InvalidConfig(_))));
}
