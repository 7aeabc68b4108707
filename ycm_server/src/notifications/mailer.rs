use std::{future::Future, sync::Arc};

use log::*;
use reqwest::{header::CONTENT_TYPE, Client};
use serde::Serialize;
use ycm_common::Secret;

use crate::{config::MailConfig, errors::MailerError};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EmailAttachment {
    pub filename: String,
    pub content_type: String,
    #[serde(serialize_with = "as_base64")]
    pub content: Vec<u8>,
}

fn as_base64<S: serde::Serializer>(content: &[u8], s: S) -> Result<S::Ok, S::Error> {
    s.serialize_str(&base64::encode(content))
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OutgoingEmail {
    pub to: String,
    pub subject: String,
    pub text: String,
    pub attachments: Vec<EmailAttachment>,
}

impl OutgoingEmail {
    pub fn new<S: Into<String>>(to: S, subject: S, text: S) -> Self {
        Self { to: to.into(), subject: subject.into(), text: text.into(), attachments: Vec::new() }
    }

    pub fn with_attachment(mut self, attachment: EmailAttachment) -> Self {
        self.attachments.push(attachment);
        self
    }
}

/// Delivers notification emails. Implementations are shared between event handler tasks.
pub trait Mailer: Clone + Send + Sync + 'static {
    fn send(&self, email: OutgoingEmail) -> impl Future<Output = Result<(), MailerError>> + Send;
}

//-------------------------------------------------   RelayMailer   ----------------------------------------------------
/// Posts each email as JSON to an HTTP mail relay. Attachments are base64-encoded.
#[derive(Clone)]
pub struct RelayMailer {
    url: String,
    token: Secret<String>,
    from: String,
    client: Arc<Client>,
}

#[derive(Serialize)]
struct RelayMessage<'a> {
    from: &'a str,
    #[serde(flatten)]
    email: &'a OutgoingEmail,
}

impl RelayMailer {
    pub fn new(url: &str, token: Secret<String>, from: &str) -> Result<Self, MailerError> {
        let client = Client::builder().build().map_err(|e| MailerError::RelayUnavailable(e.to_string()))?;
        Ok(Self { url: url.to_string(), token, from: from.to_string(), client: Arc::new(client) })
    }
}

impl Mailer for RelayMailer {
    async fn send(&self, email: OutgoingEmail) -> Result<(), MailerError> {
        if email.to.trim().is_empty() {
            return Err(MailerError::InvalidEmail("No recipient".into()));
        }
        let message = RelayMessage { from: &self.from, email: &email };
        let mut req = self.client.post(&self.url).header(CONTENT_TYPE, "application/json").json(&message);
        if !self.token.is_empty() {
            req = req.bearer_auth(self.token.reveal());
        }
        let response = req.send().await.map_err(|e| MailerError::RelayUnavailable(e.to_string()))?;
        let status = response.status();
        if status.is_success() {
            debug!("📧️ '{}' sent to {}", email.subject, email.to);
            Ok(())
        } else {
            let body = response.text().await.unwrap_or_default();
            Err(MailerError::Rejected { status: status.as_u16(), body })
        }
    }
}

//-------------------------------------------------    LogMailer    ----------------------------------------------------
/// Writes emails to the log instead of sending them. Used when no mail relay is configured.
#[derive(Clone, Default)]
pub struct LogMailer;

impl Mailer for LogMailer {
    async fn send(&self, email: OutgoingEmail) -> Result<(), MailerError> {
        let files = email.attachments.iter().map(|a| a.filename.as_str()).collect::<Vec<_>>().join(", ");
        info!("📧️ [not sent] To: {}. Subject: {}. Attachments: [{files}]", email.to, email.subject);
        debug!("📧️ [not sent] {}", email.text);
        Ok(())
    }
}

//-------------------------------------------------   AnyMailer     ----------------------------------------------------
/// The mailer selected by configuration.
#[derive(Clone)]
pub enum AnyMailer {
    Relay(RelayMailer),
    Log(LogMailer),
}

impl AnyMailer {
    pub fn from_config(config: &MailConfig) -> Result<Self, MailerError> {
        match &config.relay_url {
            Some(url) => {
                info!("📧️ Emails will be delivered through the relay at {url}");
                Ok(Self::Relay(RelayMailer::new(url, config.relay_token.clone(), &config.from)?))
            },
            None => {
                info!("📧️ No mail relay is configured. Emails will be logged only.");
                Ok(Self::Log(LogMailer))
            },
        }
    }
}

impl Mailer for AnyMailer {
    async fn send(&self, email: OutgoingEmail) -> Result<(), MailerError> {
        match self {
            Self::Relay(m) => m.send(email).await,
            Self::Log(m) => m.send(email).await,
        }
    }
}
