//! Outbound email for the contact form.

use std::time::Duration;

use async_trait::async_trait;
use serde::Serialize;
use thiserror::Error;

use crate::config::MailConfig;
use crate::entity::contact_message;

#[derive(Debug, Error)]
pub enum MailError {
    #[error("mail transport error: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("mail API rejected message with status {status}: {body}")]
    Rejected { status: u16, body: String },
    #[error("mail configuration error: {0}")]
    Config(String),
}

/// A rendered email ready to hand to a transport.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OutgoingEmail {
    pub from: String,
    pub to: Vec<String>,
    pub reply_to: String,
    pub subject: String,
    pub text: String,
}

#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, email: &OutgoingEmail) -> Result<(), MailError>;
}

/// Build the notification email for a stored contact message.
pub fn contact_notification(cfg: &MailConfig, msg: &contact_message::Model) -> OutgoingEmail {
    let company = msg.company.as_deref().unwrap_or("-");
    OutgoingEmail {
        from: cfg.from.clone(),
        to: vec![cfg.to.clone()],
        reply_to: msg.email.clone(),
        subject: format!("Nuevo mensaje de contacto: {}", msg.name),
        text: format!(
            "Nombre: {}\nEmail: {}\nEmpresa: {}\n\n{}\n",
            msg.name, msg.email, company, msg.message
        ),
    }
}

/// Posts emails as JSON to an HTTP email API using a bearer key.
pub struct HttpMailer {
    client: reqwest::Client,
    endpoint: String,
    api_key: String,
}

impl HttpMailer {
    pub fn new(cfg: &MailConfig) -> Result<Self, MailError> {
        if cfg.endpoint.trim().is_empty() {
            return Err(MailError::Config("mail.endpoint must be set".into()));
        }
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(cfg.timeout_secs))
            .build()?;
        Ok(Self {
            client,
            endpoint: cfg.endpoint.clone(),
            api_key: cfg.api_key.clone(),
        })
    }
}

#[async_trait]
impl Mailer for HttpMailer {
    async fn send(&self, email: &OutgoingEmail) -> Result<(), MailError> {
        let res = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(email)
            .send()
            .await?;

        let status = res.status();
        if !status.is_success() {
            let body = res.text().await.unwrap_or_default();
            return Err(MailError::Rejected {
                status: status.as_u16(),
                body,
            });
        }
        Ok(())
    }
}

/// Used when mail is disabled: records the message in the log only.
pub struct LogMailer;

#[async_trait]
impl Mailer for LogMailer {
    async fn send(&self, email: &OutgoingEmail) -> Result<(), MailError> {
        tracing::info!(
            to = ?email.to,
            reply_to = %email.reply_to,
            subject = %email.subject,
            "Mail disabled, not sending"
        );
        Ok(())
    }
}
