use async_trait::async_trait;
use thiserror::Error;

pub type MessageId = String;

#[derive(Debug, Error)]
pub enum NotifierError {
    #[error("mail delivery is not configured: {0}")]
    NotConfigured(&'static str),

    #[error("mail provider returned {status_code}: {body}")]
    Provider { status_code: u16, body: String },

    #[error("mail transport failed: {0}")]
    Transport(String),
}

pub type NotifierResult<T> = Result<T, NotifierError>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutgoingEmail {
    pub from: String,
    pub to: String,
    pub subject: String,
    pub html: String,
}

/// Email-sending capability. One call, one message, no retries.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn send(&self, email: &OutgoingEmail) -> NotifierResult<MessageId>;
}
