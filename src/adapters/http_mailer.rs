use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::config::MailConfig;
use crate::ports::{MessageId, Notifier, NotifierError, NotifierResult, OutgoingEmail};

const REQUEST_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SendRequest<'a> {
    sender: Address<'a>,
    to: Vec<Address<'a>>,
    subject: &'a str,
    html_content: &'a str,
}

#[derive(Debug, Serialize)]
struct Address<'a> {
    email: &'a str,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SendResponse {
    #[serde(default)]
    message_id: Option<String>,
}

/// HTTP client for a transactional email API.
///
/// Each call posts one message to `{api_url}/smtp/email` and authenticates with the
/// `api-key` header. Non-2xx responses are surfaced as provider errors carrying the
/// status and body.
#[derive(Clone)]
pub struct HttpMailer {
    client: Client,
    api_url: Option<String>,
    api_key: Option<String>,
}

impl HttpMailer {
    pub fn new(api_url: Option<String>, api_key: Option<String>) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .unwrap_or_default();

        HttpMailer {
            client,
            api_url,
            api_key,
        }
    }

    pub fn from_config(config: &MailConfig) -> Self {
        Self::new(config.api_url.clone(), config.api_key.clone())
    }

    fn endpoint(&self) -> NotifierResult<String> {
        let base = self
            .api_url
            .as_deref()
            .ok_or(NotifierError::NotConfigured("MAIL_API_URL"))?;
        Ok(format!("{}/smtp/email", base.trim_end_matches('/')))
    }
}

#[async_trait]
impl Notifier for HttpMailer {
    async fn send(&self, email: &OutgoingEmail) -> NotifierResult<MessageId> {
        let url = self.endpoint()?;
        let api_key = self
            .api_key
            .as_deref()
            .ok_or(NotifierError::NotConfigured("MAIL_API_KEY"))?;

        let request = SendRequest {
            sender: Address { email: &email.from },
            to: vec![Address { email: &email.to }],
            subject: &email.subject,
            html_content: &email.html,
        };

        let response = self
            .client
            .post(&url)
            .header("api-key", api_key)
            .header("accept", "application/json")
            .json(&request)
            .send()
            .await
            .map_err(|e| NotifierError::Transport(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| NotifierError::Transport(e.to_string()))?;

        if !status.is_success() {
            return Err(NotifierError::Provider {
                status_code: status.as_u16(),
                body,
            });
        }

        let parsed: SendResponse = serde_json::from_str(&body).unwrap_or_default();
        let message_id = parsed.message_id.unwrap_or_default();
        tracing::debug!(message_id = %message_id, to = %email.to, "Email accepted by provider");

        Ok(message_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn email() -> OutgoingEmail {
        OutgoingEmail {
            from: "noreply@example.com".to_string(),
            to: "client@example.com".to_string(),
            subject: "Hello".to_string(),
            html: "<p>Hi</p>".to_string(),
        }
    }

    #[test]
    fn endpoint_strips_trailing_slash() {
        let mailer = HttpMailer::new(Some("https://mail.example.com/v3/".to_string()), None);
        assert_eq!(
            mailer.endpoint().unwrap(),
            "https://mail.example.com/v3/smtp/email"
        );
    }

    #[tokio::test]
    async fn missing_key_is_not_configured() {
        let mailer = HttpMailer::new(Some("https://mail.example.com".to_string()), None);
        let result = mailer.send(&email()).await;
        assert!(matches!(
            result,
            Err(NotifierError::NotConfigured("MAIL_API_KEY"))
        ));
    }

    #[tokio::test]
    async fn missing_url_is_not_configured() {
        let mailer = HttpMailer::from_config(&MailConfig::default());
        let result = mailer.send(&email()).await;
        assert!(matches!(
            result,
            Err(NotifierError::NotConfigured("MAIL_API_URL"))
        ));
    }
}
