use std::sync::Arc;

use catalyst_common::types::ContactMessage;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::utils::{escape_html, html_multiline};
use crate::{Mailer, OutboundEmail, SendReceipt};

/// Addresses and branding for contact-form mail.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContactMailSettings {
    pub admin_recipients: Vec<String>,
    pub notify_from: String,
    pub reply_from: String,
    pub site_name: String,
}

impl Default for ContactMailSettings {
    fn default() -> Self {
        Self {
            admin_recipients: vec!["hello@catalyst-ai.com".to_string()],
            notify_from: "Contact Form <onboarding@resend.dev>".to_string(),
            reply_from: "Catalyst AI <onboarding@resend.dev>".to_string(),
            site_name: "Catalyst AI".to_string(),
        }
    }
}

/// Receipts for the two mails sent per submission.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContactReceipts {
    pub admin_email: SendReceipt,
    pub user_email: SendReceipt,
}

/// Sends the admin notification and then the auto-reply for a contact form
/// submission.
pub struct ContactNotifier {
    mailer: Arc<dyn Mailer>,
    settings: ContactMailSettings,
}

impl ContactNotifier {
    pub fn new(mailer: Arc<dyn Mailer>, settings: ContactMailSettings) -> Self {
        Self { mailer, settings }
    }

    /// Sends both mails in order. A failed admin mail stops before the
    /// auto-reply is attempted.
    pub async fn notify(&self, msg: &ContactMessage) -> Result<ContactReceipts> {
        let admin = self.admin_email(msg);
        let admin_email = self.mailer.send(&admin).await?;
        tracing::info!(
            provider = self.mailer.provider(),
            id = ?admin_email.id,
            "Admin contact notification sent"
        );

        let reply = self.auto_reply(msg);
        let user_email = self.mailer.send(&reply).await?;
        tracing::info!(
            provider = self.mailer.provider(),
            id = ?user_email.id,
            "Contact auto-reply sent"
        );

        Ok(ContactReceipts {
            admin_email,
            user_email,
        })
    }

    pub fn admin_email(&self, msg: &ContactMessage) -> OutboundEmail {
        let html = format!(
            "<h1>New Contact Form Submission</h1>\n\
             <p><strong>Name:</strong> {name}</p>\n\
             <p><strong>Email:</strong> {email}</p>\n\
             <p><strong>Message:</strong></p>\n\
             <p>{message}</p>\n\
             <hr>\n\
             <p><em>Submitted via {site} contact form</em></p>",
            name = escape_html(&msg.name),
            email = escape_html(&msg.email),
            message = html_multiline(&msg.message),
            site = escape_html(&self.settings.site_name),
        );
        OutboundEmail {
            from: self.settings.notify_from.clone(),
            to: self.settings.admin_recipients.clone(),
            subject: format!("New Contact Form Submission from {}", msg.name),
            html,
        }
    }

    pub fn auto_reply(&self, msg: &ContactMessage) -> OutboundEmail {
        let html = format!(
            "<h1>Thank you for contacting us, {name}!</h1>\n\
             <p>We have received your message and will get back to you within 24 hours.</p>\n\
             <p><strong>Your message:</strong></p>\n\
             <blockquote style=\"background: #f4f4f4; padding: 16px; border-radius: 8px;\">\n\
             {message}\n\
             </blockquote>\n\
             <p>Best regards,<br>The {site} Team</p>",
            name = escape_html(&msg.name),
            message = html_multiline(&msg.message),
            site = escape_html(&self.settings.site_name),
        );
        OutboundEmail {
            from: self.settings.reply_from.clone(),
            to: vec![msg.email.trim().to_string()],
            subject: "We received your message!".to_string(),
            html,
        }
    }
}
